//! Foreign node access and the host-shaped mirrored node.

use std::any::Any;

use accesskit::{Live, Role, Toggled};
use treegraft_core::{Rect, VirtualId};

/// A node in an embedded view's accessibility tree, as handed to the
/// bridge by a platform backend.
///
/// The handle is opaque beyond this surface: attributes and geometry are
/// readable directly, but the node's identity (its packed source id, its
/// parent's id, its children's ids) can only be extracted through a
/// [`NodeIntrospection`](crate::introspect::NodeIntrospection) capability,
/// which may fail for any query.
pub trait ForeignNode {
    /// The node's accessibility attributes.
    fn attributes(&self) -> &NodeAttributes;

    /// Bounds in the embedded view's own screen coordinate space.
    fn bounds_in_screen(&self) -> Rect;

    /// Bounds relative to the node's parent.
    fn bounds_in_parent(&self) -> Rect;

    /// Number of children the node reports.
    fn child_count(&self) -> usize;

    /// Downcast support for introspection backends that know the concrete
    /// node type.
    fn as_any(&self) -> &dyn Any;
}

/// The full accessibility attribute set copied from a foreign node into
/// its mirrored counterpart.
///
/// This struct is the fixed attribute table: the mirror copies it wholesale
/// (`Clone`), so a field added here is automatically carried into every
/// mirrored node. Omitting an attribute silently degrades accessibility
/// fidelity for end users, which is the main externally observable
/// correctness criterion of the bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAttributes {
    /// Semantic role.
    pub role: Role,
    /// Accessible name / content description.
    pub label: Option<String>,
    /// Text content.
    pub text: Option<String>,
    /// Hint text shown when the node's text is empty.
    pub hint_text: Option<String>,
    pub showing_hint_text: bool,
    /// Validation error text, if the content is invalid.
    pub error_text: Option<String>,
    pub max_text_length: Option<u32>,
    /// Platform input-type bits, copied opaquely.
    pub input_type: u32,
    pub accessibility_focused: bool,
    pub checkable: bool,
    /// Check/toggle state, if the node has one.
    pub toggled: Option<Toggled>,
    pub enabled: bool,
    pub clickable: bool,
    pub long_clickable: bool,
    pub context_clickable: bool,
    pub focusable: bool,
    pub focused: bool,
    /// Text movement granularity bits, copied opaquely.
    pub movement_granularities: u32,
    pub password: bool,
    pub scrollable: bool,
    pub selected: bool,
    pub visible_to_user: bool,
    pub editable: bool,
    pub can_open_popup: bool,
    pub content_invalid: bool,
    pub dismissable: bool,
    pub multi_line: bool,
    /// Live-region politeness.
    pub live: Live,
    pub drawing_order: u32,
    pub important_for_accessibility: bool,
    /// Extra data keys the node can supply on request.
    pub extra_data_keys: Vec<String>,
    /// Collection (table/list/grid) information.
    pub collection: Option<CollectionInfo>,
    /// Position of this node within its parent collection.
    pub collection_item: Option<CollectionItemInfo>,
    /// Numeric range information for sliders and progress indicators.
    pub range: Option<RangeInfo>,
}

impl Default for NodeAttributes {
    fn default() -> Self {
        Self {
            role: Role::Unknown,
            label: None,
            text: None,
            hint_text: None,
            showing_hint_text: false,
            error_text: None,
            max_text_length: None,
            input_type: 0,
            accessibility_focused: false,
            checkable: false,
            toggled: None,
            enabled: true,
            clickable: false,
            long_clickable: false,
            context_clickable: false,
            focusable: false,
            focused: false,
            movement_granularities: 0,
            password: false,
            scrollable: false,
            selected: false,
            visible_to_user: true,
            editable: false,
            can_open_popup: false,
            content_invalid: false,
            dismissable: false,
            multi_line: false,
            live: Live::Off,
            drawing_order: 0,
            important_for_accessibility: true,
            extra_data_keys: Vec::new(),
            collection: None,
            collection_item: None,
            range: None,
        }
    }
}

/// Row/column structure of a collection node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionInfo {
    pub row_count: u32,
    pub column_count: u32,
    pub hierarchical: bool,
}

/// Position of an item within its parent collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionItemInfo {
    pub row_index: u32,
    pub row_span: u32,
    pub column_index: u32,
    pub column_span: u32,
    pub heading: bool,
}

/// Numeric range of a slider, scrollbar or progress indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeInfo {
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

/// A host-shaped copy of a foreign node.
///
/// Transient: recomputed on every resolution request and never stored by
/// the bridge. Screen bounds have been offset into host screen space;
/// parent-relative bounds are copied unmodified. The parent edge is only
/// present if the parent's mapping already existed at translation time;
/// the mirror never fabricates an edge to a node the host has not been
/// told about.
#[derive(Debug, Clone, PartialEq)]
pub struct MirroredNode {
    /// The node's id in the host virtual tree.
    pub virtual_id: VirtualId,
    /// Attributes copied from the foreign node.
    pub attributes: NodeAttributes,
    /// Bounds in host screen space.
    pub bounds_in_screen: Rect,
    /// Bounds relative to the parent, unchanged by the embedding.
    pub bounds_in_parent: Rect,
    /// The parent's virtual id, if its mapping already exists.
    pub parent: Option<VirtualId>,
    /// Child virtual ids, in the foreign node's child order.
    pub children: Vec<VirtualId>,
}
