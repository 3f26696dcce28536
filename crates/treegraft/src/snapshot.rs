//! In-process backend for foreign trees that live in the host's process.
//!
//! Embedders whose foreign component runs in the same process don't need
//! platform reflection: node identity can be stored right on the node.
//! [`SnapshotNode`] is that plain-data node, [`SnapshotIntrospection`] the
//! matching introspection variant, and [`SnapshotView`] a map-backed view
//! that implements both sides of the per-view contract. The bridge's test
//! suite is built on this backend.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use accesskit::{Action, ActionData};
use treegraft_core::logging::targets;
use treegraft_core::{LocalId, PackedId, Rect};

use crate::event::{ForeignEvent, ForeignRecord, PointerEvent};
use crate::introspect::NodeIntrospection;
use crate::node::{ForeignNode, NodeAttributes};
use crate::view::{EmbeddedView, NodeProvider};

/// A foreign node whose identity is stored inline.
///
/// `source`, `parent` and each `children` slot are `Option` so tests and
/// partially cooperative trees can model introspection gaps per query.
#[derive(Debug, Clone, Default)]
pub struct SnapshotNode {
    pub attributes: NodeAttributes,
    pub bounds_in_screen: Rect,
    pub bounds_in_parent: Rect,
    pub source: Option<PackedId>,
    pub parent: Option<PackedId>,
    pub children: Vec<Option<PackedId>>,
}

impl SnapshotNode {
    /// A node whose source id packs the given local id.
    pub fn for_local(local: LocalId) -> Self {
        Self {
            source: Some(PackedId::from_local(local)),
            ..Self::default()
        }
    }

    /// Set the parent edge to the given local id.
    pub fn with_parent(mut self, parent: LocalId) -> Self {
        self.parent = Some(PackedId::from_local(parent));
        self
    }

    /// Append child edges for the given local ids.
    pub fn with_children(mut self, children: impl IntoIterator<Item = LocalId>) -> Self {
        self.children
            .extend(children.into_iter().map(|c| Some(PackedId::from_local(c))));
        self
    }
}

impl ForeignNode for SnapshotNode {
    fn attributes(&self) -> &NodeAttributes {
        &self.attributes
    }

    fn bounds_in_screen(&self) -> Rect {
        self.bounds_in_screen
    }

    fn bounds_in_parent(&self) -> Rect {
        self.bounds_in_parent
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Introspection over [`SnapshotNode`]s.
///
/// Nodes from a different backend fail to downcast and every query on them
/// answers `None`, the uniform degradation for unsupported node shapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotIntrospection;

impl SnapshotIntrospection {
    fn snapshot<'a>(&self, node: &'a dyn ForeignNode) -> Option<&'a SnapshotNode> {
        let snapshot = node.as_any().downcast_ref::<SnapshotNode>();
        if snapshot.is_none() {
            tracing::warn!(
                target: targets::INTROSPECTION,
                "foreign node is not a snapshot node; cannot extract ids"
            );
        }
        snapshot
    }
}

impl NodeIntrospection for SnapshotIntrospection {
    fn source_id(&self, node: &dyn ForeignNode) -> Option<PackedId> {
        self.snapshot(node)?.source
    }

    fn parent_id(&self, node: &dyn ForeignNode) -> Option<PackedId> {
        self.snapshot(node)?.parent
    }

    fn child_id(&self, node: &dyn ForeignNode, index: usize) -> Option<PackedId> {
        self.snapshot(node)?.children.get(index).copied().flatten()
    }

    fn event_source_id(&self, event: &ForeignEvent) -> Option<PackedId> {
        event.source
    }

    fn record_source_id(&self, record: &ForeignRecord) -> Option<PackedId> {
        record.source
    }
}

/// A map-backed embedded view.
///
/// Holds its tree as `LocalId -> SnapshotNode`, hands out clones through
/// its own [`NodeProvider`], and records everything delegated to it.
/// Delegation results are configurable so failure paths can be exercised.
#[derive(Debug)]
pub struct SnapshotView {
    root: Cell<Option<LocalId>>,
    nodes: RefCell<HashMap<LocalId, SnapshotNode>>,
    provider_enabled: Cell<bool>,
    action_result: Cell<bool>,
    pointer_result: Cell<bool>,
    performed_actions: RefCell<Vec<(LocalId, Action)>>,
    dispatched_pointers: RefCell<Vec<PointerEvent>>,
}

impl Default for SnapshotView {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotView {
    pub fn new() -> Self {
        Self {
            root: Cell::new(None),
            nodes: RefCell::new(HashMap::new()),
            provider_enabled: Cell::new(true),
            action_result: Cell::new(true),
            pointer_result: Cell::new(true),
            performed_actions: RefCell::new(Vec::new()),
            dispatched_pointers: RefCell::new(Vec::new()),
        }
    }

    /// Insert or replace a node. The first inserted node becomes the root
    /// unless [`set_root`](Self::set_root) chose one explicitly.
    pub fn insert_node(&self, local: LocalId, node: SnapshotNode) {
        if self.root.get().is_none() {
            self.root.set(Some(local));
        }
        self.nodes.borrow_mut().insert(local, node);
    }

    /// Choose which node materializes as the view's root.
    pub fn set_root(&self, local: LocalId) {
        self.root.set(Some(local));
    }

    /// Disable or re-enable the node provider, modelling views without a
    /// virtualized tree.
    pub fn set_provider_enabled(&self, enabled: bool) {
        self.provider_enabled.set(enabled);
    }

    /// Result future action delegations will report.
    pub fn set_action_result(&self, result: bool) {
        self.action_result.set(result);
    }

    /// Result future pointer dispatches will report.
    pub fn set_pointer_result(&self, result: bool) {
        self.pointer_result.set(result);
    }

    /// Actions delegated to this view so far.
    pub fn performed_actions(&self) -> Vec<(LocalId, Action)> {
        self.performed_actions.borrow().clone()
    }

    /// Pointer events dispatched to this view so far.
    pub fn dispatched_pointers(&self) -> Vec<PointerEvent> {
        self.dispatched_pointers.borrow().clone()
    }
}

impl EmbeddedView for SnapshotView {
    fn create_root_node(&self) -> Option<Box<dyn ForeignNode>> {
        let root = self.root.get()?;
        let node = self.nodes.borrow().get(&root).cloned()?;
        Some(Box::new(node))
    }

    fn node_provider(&self) -> Option<&dyn NodeProvider> {
        if self.provider_enabled.get() {
            Some(self)
        } else {
            None
        }
    }

    fn dispatch_pointer(&self, event: PointerEvent) -> bool {
        self.dispatched_pointers.borrow_mut().push(event);
        self.pointer_result.get()
    }
}

impl NodeProvider for SnapshotView {
    fn node(&self, id: LocalId) -> Option<Box<dyn ForeignNode>> {
        let node = self.nodes.borrow().get(&id).cloned()?;
        Some(Box::new(node))
    }

    fn perform_action(&self, id: LocalId, action: Action, _data: Option<ActionData>) -> bool {
        if !self.nodes.borrow().contains_key(&id) {
            return false;
        }
        self.performed_actions.borrow_mut().push((id, action));
        self.action_result.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Pointer, PointerPhase};
    use treegraft_core::Point;

    #[test]
    fn test_snapshot_introspection_reads_inline_ids() {
        let node = SnapshotNode::for_local(LocalId(3))
            .with_parent(LocalId(1))
            .with_children([LocalId(4), LocalId(5)]);
        let introspection = SnapshotIntrospection;

        assert_eq!(
            introspection.source_id(&node).map(PackedId::local),
            Some(LocalId(3))
        );
        assert_eq!(
            introspection.parent_id(&node).map(PackedId::local),
            Some(LocalId(1))
        );
        assert_eq!(
            introspection.child_id(&node, 1).map(PackedId::local),
            Some(LocalId(5))
        );
        assert_eq!(introspection.child_id(&node, 2), None);
    }

    #[test]
    fn test_snapshot_introspection_models_gaps() {
        let mut node = SnapshotNode::for_local(LocalId(3)).with_children([LocalId(4)]);
        node.children.push(None);
        let introspection = SnapshotIntrospection;

        assert_eq!(introspection.parent_id(&node), None);
        assert!(introspection.child_id(&node, 0).is_some());
        assert_eq!(introspection.child_id(&node, 1), None);
    }

    #[test]
    fn test_view_provider_hands_out_nodes() {
        let view = SnapshotView::new();
        view.insert_node(LocalId(0), SnapshotNode::for_local(LocalId(0)));
        view.insert_node(LocalId(1), SnapshotNode::for_local(LocalId(1)));

        let provider = view.node_provider().unwrap();
        assert!(provider.node(LocalId(1)).is_some());
        assert!(provider.node(LocalId(9)).is_none());

        view.set_provider_enabled(false);
        assert!(view.node_provider().is_none());
    }

    #[test]
    fn test_view_records_delegations() {
        let view = SnapshotView::new();
        view.insert_node(LocalId(0), SnapshotNode::for_local(LocalId(0)));

        assert!(view.node_provider().unwrap().perform_action(
            LocalId(0),
            Action::Click,
            None
        ));
        assert!(!view
            .node_provider()
            .unwrap()
            .perform_action(LocalId(7), Action::Click, None));

        view.set_pointer_result(false);
        let event = PointerEvent {
            phase: PointerPhase::HoverMove,
            pointers: vec![Pointer {
                id: 0,
                position: Point::new(1.0, 2.0),
            }],
        };
        assert!(!view.dispatch_pointer(event.clone()));

        assert_eq!(view.performed_actions(), vec![(LocalId(0), Action::Click)]);
        assert_eq!(view.dispatched_pointers(), vec![event]);
    }
}
