//! Logging facilities for Treegraft.
//!
//! Treegraft uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!     // Your application code...
//! }
//! ```
//!
//! Introspection failures are logged at `warn`, denied translations at
//! `debug`, and registry insertions at `trace`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Bridge operations (materialization, resolution, translation).
    pub const BRIDGE: &str = "treegraft::bridge";
    /// Identity registry mutations.
    pub const REGISTRY: &str = "treegraft::registry";
    /// Platform introspection queries.
    pub const INTROSPECTION: &str = "treegraft::introspect";
    /// Event and action translation.
    pub const EVENTS: &str = "treegraft::events";
}
