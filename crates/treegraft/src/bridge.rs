//! The embedding bridge: tree mirroring and event/action translation.

use accesskit::{Action, ActionData};
use treegraft_core::logging::targets;
use treegraft_core::{EmbedError, EmbedResult, Point, Rect, VirtualId};

use crate::event::{ForeignEvent, ForeignRecord, HostEvent, HostRecord, HostSink, PointerEvent};
use crate::introspect::NodeIntrospection;
use crate::node::{ForeignNode, MirroredNode};
use crate::registry::{IdentityRegistry, OriginKey};
use crate::view::ViewHandle;

/// Embeds foreign accessibility trees as mirrored subtrees of the host
/// accessibility tree.
///
/// One bridge exists per host accessibility session; its registry state
/// lives exactly as long as the bridge. All operations are synchronous and
/// expected on the single thread that owns the host tree; the bridge is
/// deliberately `!Send`.
///
/// Mirroring is lazy: the host materializes a view's root when the view
/// first becomes visible, and subtree nodes acquire virtual ids as they
/// are discovered through child edges or event sources. Deep trees are
/// walked by repeated top-down [`resolve_node`](Self::resolve_node) calls
/// driven by the host, never by recursive self-walk.
pub struct EmbedBridge {
    registry: IdentityRegistry,
    introspection: Box<dyn NodeIntrospection>,
    sink: Box<dyn HostSink>,
}

impl EmbedBridge {
    /// Create a bridge that delivers translated events to `sink` and
    /// allocates virtual ids starting at `first_virtual_id`.
    ///
    /// The introspection capability is chosen by the platform backend;
    /// see [`NodeIntrospection`].
    pub fn new(
        sink: Box<dyn HostSink>,
        introspection: Box<dyn NodeIntrospection>,
        first_virtual_id: VirtualId,
    ) -> Self {
        Self {
            registry: IdentityRegistry::new(first_virtual_id),
            introspection,
            sink,
        }
    }

    /// Read access to the identity registry.
    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Materialize the root node of an embedded view.
    ///
    /// Called when the view first becomes visible. The host pre-allocates
    /// `virtual_id` for the root; `bounds` are the view's screen rectangle,
    /// recorded as the offset for all geometry under this view. Returns
    /// `None`, with no mapping or bounds recorded, if the root's identity
    /// cannot be established; such a view is simply never embedded.
    pub fn materialize_root(
        &mut self,
        view: &ViewHandle,
        virtual_id: VirtualId,
        bounds: Rect,
    ) -> Option<MirroredNode> {
        match self.try_materialize_root(view, virtual_id, bounds) {
            Ok(node) => Some(node),
            Err(err) => {
                tracing::debug!(
                    target: targets::BRIDGE,
                    virtual_id = virtual_id.0,
                    %err,
                    "root materialization failed"
                );
                None
            }
        }
    }

    /// [`materialize_root`](Self::materialize_root), reporting which
    /// degradation fired.
    pub fn try_materialize_root(
        &mut self,
        view: &ViewHandle,
        virtual_id: VirtualId,
        bounds: Rect,
    ) -> EmbedResult<MirroredNode> {
        let node = view.create_root_node().ok_or(EmbedError::NodeUnavailable)?;
        let packed = self
            .introspection
            .source_id(node.as_ref())
            .ok_or(EmbedError::UnavailableIntrospection)?;

        self.registry.set_bounds(view.clone(), bounds);
        let key = OriginKey {
            view: view.clone(),
            local: packed.local(),
        };
        // The host may re-materialize an already-embedded root; the
        // registry keeps the original id in that case.
        let root_id = self.registry.bind_root(key, virtual_id);

        Ok(self.translate(node.as_ref(), root_id, view, bounds.origin))
    }

    /// Reconstruct the host-shaped node identified by `virtual_id`.
    ///
    /// The result is transient: it is rebuilt from the foreign tree on
    /// every call and never cached.
    pub fn resolve_node(&mut self, virtual_id: VirtualId) -> Option<MirroredNode> {
        match self.try_resolve_node(virtual_id) {
            Ok(node) => Some(node),
            Err(err) => {
                tracing::debug!(
                    target: targets::BRIDGE,
                    virtual_id = virtual_id.0,
                    %err,
                    "node resolution failed"
                );
                None
            }
        }
    }

    /// [`resolve_node`](Self::resolve_node), reporting which degradation
    /// fired.
    pub fn try_resolve_node(&mut self, virtual_id: VirtualId) -> EmbedResult<MirroredNode> {
        let origin = self
            .registry
            .lookup_by_virtual(virtual_id)
            .cloned()
            .ok_or(EmbedError::UnknownMapping)?;
        // An embedded view can emit accessibility activity before the host
        // has run its first layout pass; without bounds the node's
        // geometry would be undefined, so fail silently until they arrive.
        let display = self
            .registry
            .bounds(&origin.view)
            .ok_or(EmbedError::BoundsNotYetKnown)?;
        // Only views exposing a virtualized tree of their own can be
        // embedded beyond the root.
        let provider = origin
            .view
            .node_provider()
            .ok_or(EmbedError::NoNodeProvider)?;
        let node = provider
            .node(origin.local)
            .ok_or(EmbedError::NodeUnavailable)?;

        Ok(self.translate(node.as_ref(), virtual_id, &origin.view, display.origin))
    }

    /// Build the host-shaped copy of a foreign node.
    ///
    /// Children may freshly mint virtual ids; this is how the mirror
    /// discovers subtree nodes lazily. Parent resolution never allocates:
    /// a parent the host has not discovered top-down is indistinguishable
    /// from "no parent in this mirrored tree", and fabricating an id here
    /// would create an edge to a node the host has never been told exists.
    fn translate(
        &mut self,
        node: &dyn ForeignNode,
        virtual_id: VirtualId,
        view: &ViewHandle,
        display_origin: Point,
    ) -> MirroredNode {
        let attributes = node.attributes().clone();
        let bounds_in_parent = node.bounds_in_parent();
        let bounds_in_screen = node.bounds_in_screen().translated(display_origin);

        let mut children = Vec::with_capacity(node.child_count());
        for index in 0..node.child_count() {
            let Some(packed) = self.introspection.child_id(node, index) else {
                tracing::warn!(
                    target: targets::INTROSPECTION,
                    virtual_id = virtual_id.0,
                    index,
                    "child id unavailable; dropping edge"
                );
                continue;
            };
            let key = OriginKey {
                view: view.clone(),
                local: packed.local(),
            };
            children.push(self.registry.allocate(key));
        }

        let parent = self.introspection.parent_id(node).and_then(|packed| {
            self.registry.lookup_by_origin(&OriginKey {
                view: view.clone(),
                local: packed.local(),
            })
        });

        MirroredNode {
            virtual_id,
            attributes,
            bounds_in_screen,
            bounds_in_parent,
            parent,
            children,
        }
    }

    /// Delegate an accessibility action from the host to the embedded
    /// view's node provider. Returns the provider's success flag.
    pub fn perform_action(
        &self,
        virtual_id: VirtualId,
        action: Action,
        data: Option<ActionData>,
    ) -> bool {
        self.try_perform_action(virtual_id, action, data)
            .unwrap_or_else(|err| {
                tracing::debug!(
                    target: targets::EVENTS,
                    virtual_id = virtual_id.0,
                    %err,
                    "action delegation failed"
                );
                false
            })
    }

    /// [`perform_action`](Self::perform_action), reporting which
    /// degradation fired.
    pub fn try_perform_action(
        &self,
        virtual_id: VirtualId,
        action: Action,
        data: Option<ActionData>,
    ) -> EmbedResult<bool> {
        let origin = self
            .registry
            .lookup_by_virtual(virtual_id)
            .ok_or(EmbedError::UnknownMapping)?;
        let provider = origin
            .view
            .node_provider()
            .ok_or(EmbedError::NoNodeProvider)?;
        Ok(provider.perform_action(origin.local, action, data))
    }

    /// Forward a hover/motion event to the embedded view that owns
    /// `root_virtual_id`, re-basing every pointer from host screen
    /// coordinates into the view's local space.
    pub fn translate_hover_event(&self, root_virtual_id: VirtualId, event: &PointerEvent) -> bool {
        self.try_translate_hover_event(root_virtual_id, event)
            .unwrap_or_else(|err| {
                tracing::debug!(
                    target: targets::EVENTS,
                    virtual_id = root_virtual_id.0,
                    %err,
                    "hover translation failed"
                );
                false
            })
    }

    /// [`translate_hover_event`](Self::translate_hover_event), reporting
    /// which degradation fired.
    pub fn try_translate_hover_event(
        &self,
        root_virtual_id: VirtualId,
        event: &PointerEvent,
    ) -> EmbedResult<bool> {
        let origin = self
            .registry
            .lookup_by_virtual(root_virtual_id)
            .ok_or(EmbedError::UnknownMapping)?;
        let display = self
            .registry
            .bounds(&origin.view)
            .ok_or(EmbedError::BoundsNotYetKnown)?;

        let mut translated = event.clone();
        for pointer in &mut translated.pointers {
            pointer.position = pointer.position - display.origin;
        }
        Ok(origin.view.dispatch_pointer(translated))
    }

    /// Translate an accessibility event raised by an embedded view and
    /// forward it to the host sink.
    ///
    /// Translation is all-or-nothing: the primary source may mint a fresh
    /// virtual id (symmetric with child discovery), but a nested record
    /// whose source is unmapped aborts the whole translation and nothing
    /// reaches the sink. Returns the sink's dispatch result.
    pub fn dispatch_event(&mut self, view: &ViewHandle, event: &ForeignEvent) -> bool {
        self.try_dispatch_event(view, event).unwrap_or_else(|err| {
            tracing::debug!(
                target: targets::EVENTS,
                kind = ?event.kind,
                %err,
                "event translation failed"
            );
            false
        })
    }

    /// [`dispatch_event`](Self::dispatch_event), reporting which
    /// degradation fired.
    pub fn try_dispatch_event(
        &mut self,
        view: &ViewHandle,
        event: &ForeignEvent,
    ) -> EmbedResult<bool> {
        let packed = self
            .introspection
            .event_source_id(event)
            .ok_or(EmbedError::UnavailableIntrospection)?;
        let source = self.registry.allocate(OriginKey {
            view: view.clone(),
            local: packed.local(),
        });

        let mut records = Vec::with_capacity(event.records.len());
        for record in &event.records {
            let packed = self
                .introspection
                .record_source_id(record)
                .ok_or(EmbedError::UnavailableIntrospection)?;
            let mapped = self
                .registry
                .lookup_by_origin(&OriginKey {
                    view: view.clone(),
                    local: packed.local(),
                })
                .ok_or(EmbedError::UnknownMapping)?;
            records.push(HostRecord {
                source: mapped,
                payload: record.payload.clone(),
            });
        }

        let translated = HostEvent {
            kind: event.kind,
            source,
            payload: event.payload.clone(),
            records,
        };
        Ok(self.sink.send_event(translated))
    }

    /// The virtual id for a nested event record, or `None` if no mapping
    /// exists. Never allocates; callers use this to test mapping
    /// existence before acting.
    pub fn record_virtual_id(
        &self,
        view: &ViewHandle,
        record: &ForeignRecord,
    ) -> Option<VirtualId> {
        let packed = self.introspection.record_source_id(record)?;
        self.registry.lookup_by_origin(&OriginKey {
            view: view.clone(),
            local: packed.local(),
        })
    }

    /// The embedded view that owns the node identified by `virtual_id`.
    pub fn view_of_node(&self, virtual_id: VirtualId) -> Option<ViewHandle> {
        self.registry
            .lookup_by_virtual(virtual_id)
            .map(|origin| origin.view.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::snapshot::{SnapshotIntrospection, SnapshotNode, SnapshotView};
    use crate::view::EmbeddedView;
    use treegraft_core::LocalId;

    struct NullSink;

    impl HostSink for NullSink {
        fn send_event(&self, _event: HostEvent) -> bool {
            true
        }
    }

    struct RecordingSink {
        events: Rc<RefCell<Vec<HostEvent>>>,
    }

    impl HostSink for RecordingSink {
        fn send_event(&self, event: HostEvent) -> bool {
            self.events.borrow_mut().push(event);
            true
        }
    }

    fn bridge(first: u64) -> EmbedBridge {
        EmbedBridge::new(
            Box::new(NullSink),
            Box::new(SnapshotIntrospection),
            VirtualId(first),
        )
    }

    fn handle(view: &Rc<SnapshotView>) -> ViewHandle {
        ViewHandle::new(view.clone() as Rc<dyn EmbeddedView>)
    }

    #[test]
    fn test_materialize_without_source_id_records_nothing() {
        let view = Rc::new(SnapshotView::new());
        // Root exists, but introspection cannot identify it.
        view.insert_node(LocalId(0), SnapshotNode::default());
        let handle = handle(&view);
        let mut bridge = bridge(100);

        assert!(bridge.materialize_root(&handle, VirtualId(1), Rect::ZERO).is_none());
        assert_eq!(
            bridge.try_materialize_root(&handle, VirtualId(1), Rect::ZERO),
            Err(EmbedError::UnavailableIntrospection)
        );
        assert_eq!(bridge.registry().bounds(&handle), None);
        assert!(bridge.registry().lookup_by_virtual(VirtualId(1)).is_none());
    }

    #[test]
    fn test_materialize_without_root_node() {
        let view = Rc::new(SnapshotView::new());
        let handle = handle(&view);
        let mut bridge = bridge(100);

        assert_eq!(
            bridge.try_materialize_root(&handle, VirtualId(1), Rect::ZERO),
            Err(EmbedError::NodeUnavailable)
        );
    }

    #[test]
    fn test_resolve_unknown_virtual_id() {
        let mut bridge = bridge(100);
        assert!(bridge.resolve_node(VirtualId(77)).is_none());
        assert_eq!(
            bridge.try_resolve_node(VirtualId(77)),
            Err(EmbedError::UnknownMapping)
        );
    }

    #[test]
    fn test_translate_skips_unintrospectable_children() {
        let view = Rc::new(SnapshotView::new());
        let mut root = SnapshotNode::for_local(LocalId(0)).with_children([LocalId(1)]);
        root.children.push(None);
        root.children
            .push(Some(treegraft_core::PackedId::from_local(LocalId(2))));
        view.insert_node(LocalId(0), root);
        let handle = handle(&view);
        let mut bridge = bridge(100);

        let node = bridge
            .materialize_root(&handle, VirtualId(10), Rect::ZERO)
            .unwrap();
        // Three child slots, one unanswerable: two edges survive.
        assert_eq!(node.children, vec![VirtualId(100), VirtualId(101)]);
    }

    #[test]
    fn test_rematerialization_keeps_original_root_id() {
        let view = Rc::new(SnapshotView::new());
        view.insert_node(LocalId(0), SnapshotNode::for_local(LocalId(0)));
        let handle = handle(&view);
        let mut bridge = bridge(100);

        let first = bridge
            .materialize_root(&handle, VirtualId(7), Rect::ZERO)
            .unwrap();
        let second = bridge
            .materialize_root(&handle, VirtualId(8), Rect::new(5.0, 5.0, 10.0, 10.0))
            .unwrap();
        assert_eq!(first.virtual_id, VirtualId(7));
        assert_eq!(second.virtual_id, VirtualId(7));
        // Bounds did refresh.
        assert_eq!(
            bridge.registry().bounds(&handle),
            Some(Rect::new(5.0, 5.0, 10.0, 10.0))
        );
    }

    #[test]
    fn test_dispatch_event_propagates_sink_result() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let view = Rc::new(SnapshotView::new());
        let handle = handle(&view);
        let mut bridge = EmbedBridge::new(
            Box::new(RecordingSink {
                events: events.clone(),
            }),
            Box::new(SnapshotIntrospection),
            VirtualId(100),
        );

        let event = ForeignEvent {
            kind: crate::event::EventKind::Focused,
            source: Some(treegraft_core::PackedId::from_local(LocalId(4))),
            payload: Default::default(),
            records: Vec::new(),
        };
        assert!(bridge.dispatch_event(&handle, &event));
        let sent = events.borrow();
        assert_eq!(sent.len(), 1);
        // The primary source was allowed to mint a fresh id.
        assert_eq!(sent[0].source, VirtualId(100));
    }
}
