//! The three identifier spaces the bridge translates between.

use std::fmt;

/// A node id inside one embedded view's own accessibility tree.
///
/// Local ids are only meaningful in the scope of the view that produced
/// them; two views may both have a node `5` with no relation between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(pub i32);

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node id in the host's global virtual accessibility tree.
///
/// Virtual ids are allocated monotonically from a caller-supplied starting
/// id and are never reused for the lifetime of the bridge; assistive
/// technology clients may cache them across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtualId(pub u64);

impl VirtualId {
    /// The id following this one in allocation order.
    #[inline]
    pub const fn next(self) -> VirtualId {
        VirtualId(self.0 + 1)
    }
}

impl fmt::Display for VirtualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque platform identifier from which a [`LocalId`] can be decoded.
///
/// The platform stores the local id in the upper 32 bits; the lower 32 bits
/// carry platform data the bridge does not interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedId(pub u64);

impl PackedId {
    /// Decode the local id component.
    #[inline]
    pub const fn local(self) -> LocalId {
        LocalId((self.0 >> 32) as u32 as i32)
    }

    /// Pack a bare local id, leaving the platform bits zeroed.
    ///
    /// Used by backends whose node handles carry local ids directly.
    #[inline]
    pub const fn from_local(local: LocalId) -> PackedId {
        PackedId((local.0 as u32 as u64) << 32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_id_roundtrip() {
        for raw in [0, 1, 5, 42, i32::MAX] {
            let local = LocalId(raw);
            assert_eq!(PackedId::from_local(local).local(), local);
        }
    }

    #[test]
    fn test_packed_id_negative_local() {
        // The host-view sentinel id is -1 on some platforms.
        let local = LocalId(-1);
        assert_eq!(PackedId::from_local(local).local(), local);
    }

    #[test]
    fn test_packed_id_ignores_low_bits() {
        let packed = PackedId(((7u64) << 32) | 0xdead_beef);
        assert_eq!(packed.local(), LocalId(7));
    }

    #[test]
    fn test_virtual_id_next() {
        assert_eq!(VirtualId(1000).next(), VirtualId(1001));
    }
}
