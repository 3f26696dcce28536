//! Embedding of foreign accessibility subtrees into a host tree.
//!
//! A host UI exposes one flat virtual-id space to assistive technology.
//! An embedded foreign component (a web view, a native map widget, another
//! toolkit's surface) exposes its own accessibility tree, addressed by node
//! ids that only mean something inside that component. Treegraft bridges
//! the two: it mirrors each embedded tree as a subtree of the host tree,
//! maintaining a stable bijection between `(view, local id)` pairs and
//! host virtual ids, and translating nodes, events, hover input and action
//! requests between the two id spaces.
//!
//! # Architecture
//!
//! - [`EmbedBridge`]: the bridge instance; one per host accessibility
//!   session
//! - [`IdentityRegistry`]: the bidirectional `(view, local id) <-> virtual
//!   id` store, plus cached per-view display bounds
//! - [`NodeIntrospection`]: best-effort capability for extracting packed
//!   ids from opaque foreign nodes; every query may fail, and failure is
//!   silent degradation rather than an error
//! - [`EmbeddedView`] / [`NodeProvider`]: the foreign component's side of
//!   the contract
//! - [`HostSink`]: where fully translated events are delivered
//! - [`snapshot`]: an in-process backend for same-process foreign trees,
//!   also used by the test suite
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use treegraft::{EmbedBridge, ViewHandle, VirtualId, Rect};
//! use treegraft::snapshot::SnapshotIntrospection;
//!
//! let mut bridge = EmbedBridge::new(
//!     Box::new(sink),
//!     Box::new(SnapshotIntrospection),
//!     VirtualId(65_536),
//! );
//!
//! // When an embedded view first becomes visible, the host hands the
//! // bridge a pre-allocated virtual id and the view's screen bounds.
//! let view = ViewHandle::new(Rc::new(my_view));
//! let root = bridge.materialize_root(&view, VirtualId(42), bounds);
//!
//! // Later, the host resolves arbitrary virtual ids for tree traversal.
//! let node = bridge.resolve_node(VirtualId(65_536));
//! ```
//!
//! # Failure model
//!
//! There are no fatal errors. Introspection gaps, unknown mappings and
//! not-yet-known bounds all degrade to "no node/edge/event"; losing some
//! accessibility fidelity is always preferable to corrupting the host
//! tree. See [`EmbedError`] for the taxonomy.

pub mod bridge;
pub mod event;
pub mod introspect;
pub mod node;
pub mod registry;
pub mod snapshot;
pub mod view;

pub use bridge::EmbedBridge;
pub use event::{
    EventKind, EventPayload, ForeignEvent, ForeignRecord, HostEvent, HostRecord, HostSink, Pointer,
    PointerEvent, PointerPhase,
};
pub use introspect::NodeIntrospection;
pub use node::{
    CollectionInfo, CollectionItemInfo, ForeignNode, MirroredNode, NodeAttributes, RangeInfo,
};
pub use registry::{IdentityRegistry, OriginKey};
pub use view::{EmbeddedView, NodeProvider, ViewHandle};

pub use treegraft_core::{EmbedError, EmbedResult, LocalId, PackedId, Point, Rect, Size, VirtualId};
