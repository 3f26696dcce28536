//! The embedded view's side of the embedding contract.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;

use accesskit::{Action, ActionData};
use treegraft_core::LocalId;

use crate::event::PointerEvent;
use crate::node::ForeignNode;

/// A foreign UI component whose accessibility tree can be embedded.
///
/// The bridge never creates or destroys a view; it only references one the
/// host hands it. Views that do not expose a [`NodeProvider`] cannot be
/// embedded beyond their root.
pub trait EmbeddedView {
    /// Materialize the view's root accessibility node.
    fn create_root_node(&self) -> Option<Box<dyn ForeignNode>>;

    /// The view's virtualized node tree, if it has one.
    fn node_provider(&self) -> Option<&dyn NodeProvider>;

    /// Dispatch a pointer event, already translated into the view's local
    /// coordinate space. Returns whether the view handled it.
    fn dispatch_pointer(&self, event: PointerEvent) -> bool;
}

/// Per-view access to individual nodes of a virtualized tree.
pub trait NodeProvider {
    /// Fetch the node with the given local id.
    fn node(&self, id: LocalId) -> Option<Box<dyn ForeignNode>>;

    /// Perform an accessibility action on the node with the given local
    /// id. Returns whether the action was performed.
    fn perform_action(&self, id: LocalId, action: Action, data: Option<ActionData>) -> bool;
}

/// A shared handle to an [`EmbeddedView`] with identity semantics.
///
/// Two handles compare equal iff they refer to the same view instance;
/// hashing follows the same identity. This is what makes `(view, local id)`
/// a usable map key while the view itself stays an opaque trait object.
#[derive(Clone)]
pub struct ViewHandle(Rc<dyn EmbeddedView>);

impl ViewHandle {
    /// Wrap a view in an identity handle.
    pub fn new(view: Rc<dyn EmbeddedView>) -> Self {
        Self(view)
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const u8 as usize
    }
}

impl Deref for ViewHandle {
    type Target = dyn EmbeddedView;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for ViewHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ViewHandle {}

impl Hash for ViewHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.addr());
    }
}

impl fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewHandle({:#x})", self.addr())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::snapshot::SnapshotView;

    #[test]
    fn test_handle_identity() {
        let view: Rc<dyn EmbeddedView> = Rc::new(SnapshotView::new());
        let other: Rc<dyn EmbeddedView> = Rc::new(SnapshotView::new());

        let a = ViewHandle::new(view.clone());
        let b = ViewHandle::new(view);
        let c = ViewHandle::new(other);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_handle_as_map_key() {
        let view: Rc<dyn EmbeddedView> = Rc::new(SnapshotView::new());
        let a = ViewHandle::new(view.clone());
        let b = ViewHandle::new(view);

        let mut map = HashMap::new();
        map.insert(a, 1);
        map.insert(b, 2);
        assert_eq!(map.len(), 1);
    }
}
