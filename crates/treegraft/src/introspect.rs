//! Best-effort introspection of opaque foreign nodes and events.

use treegraft_core::PackedId;

use crate::event::{ForeignEvent, ForeignRecord};
use crate::node::ForeignNode;

/// Capability for extracting packed ids out of opaque foreign nodes,
/// events and records.
///
/// Every query is best-effort: `None` means the backend cannot answer
/// (a platform version gap, a permission denial, or a node shape it does
/// not understand), and the bridge treats that as silent, permanent
/// failure for that query. No method may panic or block.
///
/// Platform backends implement one variant per platform generation and
/// select the capable one at startup; all fragile extraction lives behind
/// this boundary. The in-process variant is
/// [`SnapshotIntrospection`](crate::snapshot::SnapshotIntrospection).
pub trait NodeIntrospection {
    /// The node's own packed source id.
    fn source_id(&self, node: &dyn ForeignNode) -> Option<PackedId>;

    /// The packed id of the node's parent.
    fn parent_id(&self, node: &dyn ForeignNode) -> Option<PackedId>;

    /// The packed id of the node's `index`-th child.
    fn child_id(&self, node: &dyn ForeignNode, index: usize) -> Option<PackedId>;

    /// The packed source id of an event.
    fn event_source_id(&self, event: &ForeignEvent) -> Option<PackedId>;

    /// The packed source id of a nested event record.
    fn record_source_id(&self, record: &ForeignRecord) -> Option<PackedId>;
}
