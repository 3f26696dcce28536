//! Error types for Treegraft.
//!
//! None of these are fatal: every bridge operation degrades to "this
//! node/edge/event is unavailable" rather than destabilizing the host tree.
//! The error value records which degradation fired, for callers and logs
//! that want more than the bare `Option`/`bool` surface.

use thiserror::Error;

/// Why a bridge operation produced no result.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedError {
    /// Platform introspection could not answer a query. Permanent for the
    /// query in question; the bridge never retries.
    #[error("platform introspection could not answer the query")]
    UnavailableIntrospection,

    /// An id has no registered mapping and the call site is not permitted
    /// to allocate one.
    #[error("no virtual id mapping exists for the requested node")]
    UnknownMapping,

    /// The embedded view has emitted accessibility activity before its
    /// first layout pass recorded display bounds. Transient; resolves
    /// itself once the host supplies bounds.
    #[error("display bounds are not yet known for the embedded view")]
    BoundsNotYetKnown,

    /// The embedded view does not expose a virtualized node tree of its
    /// own. Only views with a node provider can be embedded.
    #[error("embedded view exposes no node provider")]
    NoNodeProvider,

    /// The embedded view returned no node for the requested id.
    #[error("embedded view returned no node for the requested id")]
    NodeUnavailable,
}

/// A specialized Result type for Treegraft operations.
pub type EmbedResult<T> = Result<T, EmbedError>;
