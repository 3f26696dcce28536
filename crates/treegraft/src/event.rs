//! Accessibility events and pointer input, in both id spaces.
//!
//! Events arrive from the embedded view addressed with packed foreign ids
//! ([`ForeignEvent`]); the bridge rewrites them into host virtual ids
//! ([`HostEvent`]) before forwarding to the [`HostSink`]. The two are
//! distinct types so an untranslated event can never reach the host by
//! accident.

use treegraft_core::{PackedId, Point, VirtualId};

/// The class of an accessibility event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Focused,
    Clicked,
    LongClicked,
    TextChanged,
    TextSelectionChanged,
    Scrolled,
    ContentChanged,
    HoverEnter,
    HoverExit,
    Announcement,
}

/// Payload fields copied verbatim during event translation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventPayload {
    /// Text fragments associated with the event.
    pub text: Vec<String>,
    /// Content description of the source node.
    pub description: Option<String>,
    /// Scroll offset, for scroll events.
    pub scroll: Option<Point>,
}

/// A secondary payload nested inside an event, describing an additional
/// affected node.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignRecord {
    /// The affected node's packed id, if the platform supplied one.
    pub source: Option<PackedId>,
    pub payload: EventPayload,
}

/// An accessibility event raised by an embedded view, still addressed in
/// the view's own id space.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignEvent {
    pub kind: EventKind,
    /// The source node's packed id, if the platform supplied one.
    pub source: Option<PackedId>,
    pub payload: EventPayload,
    /// Nested records for related state changes.
    pub records: Vec<ForeignRecord>,
}

/// A nested record after translation into the host id space.
#[derive(Debug, Clone, PartialEq)]
pub struct HostRecord {
    pub source: VirtualId,
    pub payload: EventPayload,
}

/// A fully translated accessibility event, addressed in host virtual ids.
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent {
    pub kind: EventKind,
    pub source: VirtualId,
    pub payload: EventPayload,
    pub records: Vec<HostRecord>,
}

/// Receiver for translated events on the host side.
///
/// The bridge hands this sink only fully translated [`HostEvent`]s; a
/// translation that fails partway delivers nothing.
pub trait HostSink {
    /// Deliver a translated event. Returns whether the host dispatched it.
    fn send_event(&self, event: HostEvent) -> bool;
}

/// The phase of a pointer/motion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
    HoverEnter,
    HoverMove,
    HoverExit,
}

/// One pointer within a motion event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub id: u32,
    /// Position in the coordinate space of whoever owns the event.
    pub position: Point,
}

/// A normalized pointer/motion event.
///
/// Hover events reach the bridge in host screen coordinates; the bridge
/// re-bases every pointer into the embedded view's local space before
/// forwarding.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub pointers: Vec<Pointer>,
}
