//! Foundation types for the Treegraft embedding bridge.
//!
//! This crate provides the building blocks shared by the bridge and by
//! platform backends:
//!
//! - **Geometry**: [`Point`], [`Size`] and [`Rect`] in screen space
//! - **Id spaces**: [`PackedId`], [`LocalId`] and [`VirtualId`], the three
//!   identifier domains the bridge translates between
//! - **Errors**: the [`EmbedError`] taxonomy for degraded operations
//! - **Logging**: tracing target constants for log filtering
//!
//! # Id spaces
//!
//! An embedded view addresses its own accessibility tree with *local* ids
//! that are meaningless outside that view. The platform hands them to us in
//! an opaque *packed* form. The host accessibility tree works in a single
//! flat *virtual* id space. The bridge's job is a stable mapping between
//! `(view, local id)` pairs and virtual ids; these types keep the three
//! domains apart at compile time.

pub mod error;
pub mod geometry;
pub mod id;
pub mod logging;

pub use error::{EmbedError, EmbedResult};
pub use geometry::{Point, Rect, Size};
pub use id::{LocalId, PackedId, VirtualId};
