//! ePMP security-configuration register (`mseccfg`).
//!
//! Holds the three ePMP policy bits. The register's own bit layout is pure
//! data — the sticky/RLB-lockdown write semantics belong to the Write Gate
//! in [`crate::pmp`], since admitting a proposed RLB value requires
//! inspecting the Rule Store's lock bits.

/// Machine Mode Lockdown bit position.
pub const MML_BIT: u64 = 1 << 0;
/// Machine Mode Whitelist Policy bit position.
pub const MMWP_BIT: u64 = 1 << 1;
/// Rule Locking Bypass bit position.
pub const RLB_BIT: u64 = 1 << 2;

/// The three independent ePMP policy flags (RISC-V ePMP spec §2).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mseccfg {
    /// Machine Mode Lockdown — reinterprets (L,R,W,X) via the MML truth
    /// table and forbids unmatched M-mode execution. Sticky: 1 → 0 writes
    /// are ignored.
    pub mml: bool,
    /// Machine Mode Whitelist Policy — flips the default M-mode policy for
    /// unmatched accesses from allow to deny. Sticky: 1 → 0 writes are
    /// ignored.
    pub mmwp: bool,
    /// Rule Locking Bypass — while set, locked entries may be edited and
    /// the MML executable-forbidden filter is suspended.
    pub rlb: bool,
}

impl Mseccfg {
    /// Decodes a raw CSR value into its three constituent flags.
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self {
            mml: raw & MML_BIT != 0,
            mmwp: raw & MMWP_BIT != 0,
            rlb: raw & RLB_BIT != 0,
        }
    }

    /// Encodes the flags back into the bit layout a CSR read returns.
    pub fn raw(self) -> u64 {
        (self.mml as u64 * MML_BIT) | (self.mmwp as u64 * MMWP_BIT) | (self.rlb as u64 * RLB_BIT)
    }
}
