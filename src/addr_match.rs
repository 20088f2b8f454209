//! PMP address-matching modes.
//!
//! The two-bit `A` field of a pmpcfg byte selects how the entry's
//! `pmpaddr` register is interpreted to derive a physical address range
//! (RISC-V Privileged spec §3.7).

/// Bit position of the `A` field within a pmpcfg byte.
pub(crate) const A_SHIFT: u8 = 3;
/// Width of the `A` field.
pub(crate) const A_MASK: u8 = 0x3;

/// Address-matching mode decoded from the `A` field of a pmpcfg byte.
///
/// An entry whose mode is [`AddressMatch::Off`] never matches any address;
/// its `pmpaddr` register is otherwise just storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressMatch {
    /// Entry disabled — never matches.
    Off = 0,
    /// Top of Range — region is `[pmpaddr[i-1] << 2, pmpaddr[i] << 2)`.
    Tor = 1,
    /// Naturally aligned 4-byte region.
    Na4 = 2,
    /// Naturally aligned power-of-two region (trailing-ones encoding).
    Napot = 3,
}

impl AddressMatch {
    /// Decodes the mode from the raw `A` field (bits 4:3 of pmpcfg).
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & A_MASK {
            0 => Self::Off,
            1 => Self::Tor,
            2 => Self::Na4,
            3 => Self::Napot,
            _ => unreachable!("A field is masked to two bits"),
        }
    }
}
