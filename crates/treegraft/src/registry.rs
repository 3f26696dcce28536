//! The bidirectional identity registry.

use std::collections::HashMap;

use treegraft_core::logging::targets;
use treegraft_core::{LocalId, Rect, VirtualId};

use crate::view::ViewHandle;

/// The identity of a node within its owning view's tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OriginKey {
    pub view: ViewHandle,
    pub local: LocalId,
}

/// Bidirectional store mapping `(view, local id)` pairs to host virtual
/// ids, plus cached per-view display bounds.
///
/// The two directions are kept in lockstep by a single internal insert
/// path; no other code writes to either map, so they cannot diverge. No
/// entry is ever removed or remapped: assistive-technology clients may
/// cache virtual ids across calls, so remapping or reuse would be a
/// correctness bug. The registry lives exactly as long as its bridge.
#[derive(Debug)]
pub struct IdentityRegistry {
    origin_to_virtual: HashMap<OriginKey, VirtualId>,
    virtual_to_origin: HashMap<VirtualId, OriginKey>,
    display_bounds: HashMap<ViewHandle, Rect>,
    next_virtual_id: VirtualId,
}

impl IdentityRegistry {
    /// Create a registry that allocates ids starting at
    /// `first_virtual_id`. The host reserves a disjoint numeric range for
    /// the bridge.
    pub fn new(first_virtual_id: VirtualId) -> Self {
        Self {
            origin_to_virtual: HashMap::new(),
            virtual_to_origin: HashMap::new(),
            display_bounds: HashMap::new(),
            next_virtual_id: first_virtual_id,
        }
    }

    /// Return the virtual id for `key`, allocating the next unused id on
    /// first sight. Idempotent: a key keeps its id forever.
    pub fn allocate(&mut self, key: OriginKey) -> VirtualId {
        if let Some(&id) = self.origin_to_virtual.get(&key) {
            return id;
        }
        let id = self.next_virtual_id;
        self.next_virtual_id = id.next();
        self.bind(key, id);
        id
    }

    /// Register a host-assigned virtual id for a root node.
    ///
    /// The host pre-allocates root ids before asking the bridge to embed,
    /// so the id comes from the caller here. If the key is already mapped,
    /// the existing id wins (entries are never remapped) and is returned
    /// so the caller can use it. If the id itself is already bound to a
    /// different node, the binding is refused and a fresh id is allocated
    /// instead; either way the returned id is the one in effect.
    pub fn bind_root(&mut self, key: OriginKey, id: VirtualId) -> VirtualId {
        if let Some(&existing) = self.origin_to_virtual.get(&key) {
            if existing != id {
                tracing::warn!(
                    target: targets::REGISTRY,
                    assigned = id.0,
                    existing = existing.0,
                    "root already mapped; keeping existing virtual id"
                );
            }
            return existing;
        }
        if self.virtual_to_origin.contains_key(&id) {
            tracing::warn!(
                target: targets::REGISTRY,
                assigned = id.0,
                "root id already bound to another node; allocating a fresh id"
            );
            return self.allocate(key);
        }
        // Keep the allocator clear of the bound id so it can never be
        // handed out a second time.
        if id >= self.next_virtual_id {
            self.next_virtual_id = id.next();
        }
        self.bind(key, id);
        id
    }

    /// The single insert path for both directions of the mapping.
    fn bind(&mut self, key: OriginKey, id: VirtualId) {
        tracing::trace!(
            target: targets::REGISTRY,
            virtual_id = id.0,
            local_id = key.local.0,
            view = ?key.view,
            "cached virtual id mapping"
        );
        self.origin_to_virtual.insert(key.clone(), id);
        self.virtual_to_origin.insert(id, key);
    }

    /// Pure lookup by origin. Never allocates.
    pub fn lookup_by_origin(&self, key: &OriginKey) -> Option<VirtualId> {
        self.origin_to_virtual.get(key).copied()
    }

    /// Pure lookup by virtual id.
    pub fn lookup_by_virtual(&self, id: VirtualId) -> Option<&OriginKey> {
        self.virtual_to_origin.get(&id)
    }

    /// Record the view's current display bounds in host screen space.
    /// Refreshing on re-materialization is allowed.
    pub fn set_bounds(&mut self, view: ViewHandle, bounds: Rect) {
        self.display_bounds.insert(view, bounds);
    }

    /// The view's cached display bounds, if its root has been materialized.
    pub fn bounds(&self, view: &ViewHandle) -> Option<Rect> {
        self.display_bounds.get(view).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::snapshot::SnapshotView;
    use crate::view::EmbeddedView;

    fn test_view() -> ViewHandle {
        let view: Rc<dyn EmbeddedView> = Rc::new(SnapshotView::new());
        ViewHandle::new(view)
    }

    fn key(view: &ViewHandle, local: i32) -> OriginKey {
        OriginKey {
            view: view.clone(),
            local: LocalId(local),
        }
    }

    #[test]
    fn test_monotonic_allocation() {
        let mut registry = IdentityRegistry::new(VirtualId(100));
        let view = test_view();
        for expected in 0..5 {
            let id = registry.allocate(key(&view, expected));
            assert_eq!(id, VirtualId(100 + expected as u64));
        }
    }

    #[test]
    fn test_idempotent_allocation() {
        let mut registry = IdentityRegistry::new(VirtualId(100));
        let view = test_view();
        let first = registry.allocate(key(&view, 7));
        let second = registry.allocate(key(&view, 7));
        assert_eq!(first, second);
        // The repeat did not consume an id.
        assert_eq!(registry.allocate(key(&view, 8)), first.next());
    }

    #[test]
    fn test_bijection() {
        let mut registry = IdentityRegistry::new(VirtualId(0));
        let view = test_view();
        let other = test_view();
        let ids: Vec<_> = [(&view, 1), (&view, 2), (&other, 1), (&other, 9)]
            .into_iter()
            .map(|(v, local)| (key(v, local), registry.allocate(key(v, local))))
            .collect();
        for (k, id) in &ids {
            assert_eq!(registry.lookup_by_origin(k), Some(*id));
            assert_eq!(registry.lookup_by_virtual(*id), Some(k));
        }
    }

    #[test]
    fn test_same_local_id_in_different_views() {
        let mut registry = IdentityRegistry::new(VirtualId(10));
        let a = test_view();
        let b = test_view();
        let id_a = registry.allocate(key(&a, 5));
        let id_b = registry.allocate(key(&b, 5));
        assert_ne!(id_a, id_b);
    }

    #[test]
    fn test_id_stability_across_operations() {
        let mut registry = IdentityRegistry::new(VirtualId(0));
        let view = test_view();
        let id = registry.allocate(key(&view, 3));
        registry.allocate(key(&view, 4));
        registry.bind_root(key(&view, 3), VirtualId(99));
        assert_eq!(registry.lookup_by_origin(&key(&view, 3)), Some(id));
    }

    #[test]
    fn test_bind_root_advances_allocator() {
        let mut registry = IdentityRegistry::new(VirtualId(1000));
        let view = test_view();
        let bound = registry.bind_root(key(&view, 0), VirtualId(1000));
        assert_eq!(bound, VirtualId(1000));
        assert_eq!(registry.allocate(key(&view, 5)), VirtualId(1001));
        assert_eq!(registry.allocate(key(&view, 6)), VirtualId(1002));
    }

    #[test]
    fn test_bind_root_below_range_does_not_disturb_allocator() {
        let mut registry = IdentityRegistry::new(VirtualId(1000));
        let view = test_view();
        registry.bind_root(key(&view, 0), VirtualId(42));
        assert_eq!(registry.allocate(key(&view, 1)), VirtualId(1000));
    }

    #[test]
    fn test_bind_root_refuses_taken_id() {
        let mut registry = IdentityRegistry::new(VirtualId(1000));
        let view = test_view();
        let taken = registry.allocate(key(&view, 1));
        // A host-assigned id colliding with an allocated one must not
        // steal the reverse mapping.
        let bound = registry.bind_root(key(&view, 0), taken);
        assert_ne!(bound, taken);
        assert_eq!(registry.lookup_by_virtual(taken), Some(&key(&view, 1)));
        assert_eq!(registry.lookup_by_origin(&key(&view, 0)), Some(bound));
    }

    #[test]
    fn test_bounds_cache() {
        let mut registry = IdentityRegistry::new(VirtualId(0));
        let view = test_view();
        assert_eq!(registry.bounds(&view), None);
        registry.set_bounds(view.clone(), Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(registry.bounds(&view), Some(Rect::new(10.0, 20.0, 30.0, 40.0)));
        // Re-materialization refreshes.
        registry.set_bounds(view.clone(), Rect::new(0.0, 0.0, 30.0, 40.0));
        assert_eq!(registry.bounds(&view), Some(Rect::new(0.0, 0.0, 30.0, 40.0)));
    }
}
