//! PMP configuration byte (`pmpcfg`).
//!
//! Each entry carries one configuration byte: permission bits, the
//! address-match mode, and the lock bit (RISC-V Privileged spec §3.7.1).

use crate::addr_match::AddressMatch;

/// Read permission bit.
pub const R: u8 = 1 << 0;
/// Write permission bit.
pub const W: u8 = 1 << 1;
/// Execute permission bit.
pub const X: u8 = 1 << 2;
/// Lock bit — the entry (and, for TOR, its lower-bound neighbor) becomes
/// immutable until reset unless RLB is set.
pub const L: u8 = 1 << 7;

/// Bits 5:6 of a pmpcfg byte are reserved and read as zero.
const RESERVED_MASK: u8 = 0b0110_0000;

/// A single entry's configuration byte, wrapping the raw bit pattern.
///
/// Mirrors the layout of a hardware pmpcfg byte exactly: `.raw()` returns
/// precisely what a CSR read would return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfigByte(u8);

impl ConfigByte {
    /// Wraps a raw byte, clearing the reserved bits (they are always
    /// read-as-zero; a well-behaved write never sets them, but a defensive
    /// clear keeps `raw()` bit-exact even if a caller passes garbage).
    pub(crate) fn from_raw(raw: u8) -> Self {
        Self(raw & !RESERVED_MASK)
    }

    /// Returns the raw byte exactly as a CSR read would return it.
    pub fn raw(self) -> u8 {
        self.0
    }

    /// Returns the address-matching mode.
    pub fn match_mode(self) -> AddressMatch {
        AddressMatch::from_bits(self.0 >> super::addr_match::A_SHIFT)
    }

    /// Returns true if the R (read) permission bit is set.
    pub fn readable(self) -> bool {
        self.0 & R != 0
    }

    /// Returns true if the W (write) permission bit is set.
    pub fn writable(self) -> bool {
        self.0 & W != 0
    }

    /// Returns true if the X (execute) permission bit is set.
    pub fn executable(self) -> bool {
        self.0 & X != 0
    }

    /// Returns true if the L (lock) bit is set.
    pub fn locked(self) -> bool {
        self.0 & L != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_bits_are_cleared() {
        let c = ConfigByte::from_raw(0xFF);
        assert_eq!(c.raw(), 0xFF & !RESERVED_MASK);
    }

    #[test]
    fn accessors_match_bit_positions() {
        let c = ConfigByte::from_raw(R | X | L);
        assert!(c.readable());
        assert!(!c.writable());
        assert!(c.executable());
        assert!(c.locked());
    }
}
