//! The PMP core: Rule Store, Write Gate, Range Table cache, and Reset
//! Controller combined behind [`Pmp`]'s public API (§2, §6).
//!
//! Rule Store and Range Table are kept together deliberately — every write
//! that mutates one immediately re-derives the other, so there is never an
//! observable moment where they disagree.

use crate::addr_match::AddressMatch;
use crate::cfg::ConfigByte;
use crate::config::Config;
use crate::error::PmpError;
use crate::mseccfg::Mseccfg;
use crate::oracle;
use crate::perm::Perm;
use crate::privilege::PrivilegeMode;
use crate::range::Range;

/// Physical Memory Protection / Enhanced PMP permission engine.
///
/// Owns exactly the registers and derived state described in §3: `N`
/// address registers, `N` configuration bytes, the `mseccfg` register, a
/// cached active-rule count, and the `N` derived ranges. Construct with
/// [`Pmp::new`]; every method after that is infallible.
#[derive(Clone, Debug)]
pub struct Pmp {
    config: Config,
    entries_per_word: usize,
    addr_mask: u64,
    addr: Vec<u64>,
    cfg: Vec<ConfigByte>,
    ranges: Vec<Range>,
    mseccfg: Mseccfg,
    active_count: usize,
}

impl Pmp {
    /// Builds a new table from `config`, with all entries disabled and
    /// `mseccfg` zeroed — identical to the state [`Pmp::reset`] produces.
    ///
    /// # Errors
    ///
    /// Returns [`PmpError`] if `config.xlen` is not 32 or 64, or if
    /// `config.entry_count` is not a positive multiple of the pmpcfg word
    /// width implied by `xlen`.
    pub fn new(config: Config) -> Result<Self, PmpError> {
        let entries_per_word = config.validate()?;
        let addr_mask = addr_mask_for(config.xlen);
        let n = config.entry_count;
        Ok(Self {
            config,
            entries_per_word,
            addr_mask,
            addr: vec![0; n],
            cfg: vec![ConfigByte::default(); n],
            ranges: vec![Range::EMPTY; n],
            mseccfg: Mseccfg::default(),
            active_count: 0,
        })
    }

    /// Number of configured entries.
    pub fn entry_count(&self) -> usize {
        self.config.entry_count
    }

    /// Number of entries whose address-match mode is not `Off` (§3).
    pub fn active_rule_count(&self) -> usize {
        self.active_count
    }

    /// Zeroes every address register, configuration byte, and `mseccfg`,
    /// and rebuilds an empty range table (§4.3). Releases all stickiness.
    pub fn reset(&mut self) {
        self.addr.fill(0);
        self.cfg.fill(ConfigByte::default());
        self.ranges.fill(Range::EMPTY);
        self.mseccfg = Mseccfg::default();
        self.active_count = 0;
    }

    /// Reads entry `i`'s raw `pmpaddr` value. Out-of-range `i` reads as 0,
    /// per the WARL "reserved → unused" convention (§7).
    pub fn read_pmpaddr(&self, i: usize) -> u64 {
        self.addr.get(i).copied().unwrap_or(0)
    }

    /// Writes entry `i`'s `pmpaddr` register (§4.2).
    ///
    /// A no-op (WARL-discarded) if entry `i` is locked without RLB, or if
    /// entry `i + 1` is a locked TOR entry without RLB (its lower bound
    /// depends on this register). Out-of-range `i` is a no-op. Otherwise
    /// the value is masked to `xlen - 2` bits and stored, and the ranges
    /// for entries `i` and `i + 1` are re-derived.
    pub fn write_pmpaddr(&mut self, i: usize, value: u64) {
        let Some(&cfg_i) = self.cfg.get(i) else {
            return;
        };
        if cfg_i.locked() && !self.mseccfg.rlb {
            tracing::trace!(entry = i, "pmpaddr write ignored: entry locked, RLB clear");
            return;
        }
        if let Some(&next) = self.cfg.get(i + 1) {
            if next.match_mode() == AddressMatch::Tor
                && next.locked()
                && !self.mseccfg.rlb
            {
                tracing::trace!(
                    entry = i,
                    "pmpaddr write ignored: successor is a locked TOR entry"
                );
                return;
            }
        }
        self.addr[i] = value & self.addr_mask;
        self.rederive_range(i);
        self.rederive_range(i + 1);
    }

    /// Reads the packed pmpcfg CSR word at `word_index` (§6). Byte `j`
    /// within the word corresponds to entry `self.pmpcfg_base(word_index) +
    /// j`; bytes past `entry_count` read as 0.
    pub fn read_pmpcfg(&self, word_index: usize) -> u64 {
        let base = self.pmpcfg_base(word_index);
        let mut word = 0u64;
        for j in 0..self.entries_per_word {
            if let Some(&c) = self.cfg.get(base + j) {
                word |= u64::from(c.raw()) << (j * 8);
            }
        }
        word
    }

    /// Writes the packed pmpcfg CSR word at `word_index` (§4.2). Each byte
    /// of `value` is applied to its entry independently via
    /// [`Pmp::write_pmpcfg_entry`]'s admission rules; a rejected byte
    /// leaves its entry untouched without affecting its siblings in the
    /// same word.
    pub fn write_pmpcfg(&mut self, word_index: usize, value: u64) {
        let base = self.pmpcfg_base(word_index);
        for j in 0..self.entries_per_word {
            let byte = ((value >> (j * 8)) & 0xFF) as u8;
            self.write_pmpcfg_entry(base + j, byte);
        }
    }

    /// Maps a `pmpcfg` `word_index` to the base entry index it covers
    /// (§6). On RV32 every `word_index` names a real 4-byte register, so
    /// the mapping is dense. On RV64 each real register is 8 bytes wide
    /// but the ISA still numbers registers in 4-byte steps, so only even
    /// `word_index` values name one (pmpcfg0, pmpcfg2, …); odd values name
    /// no register the hardware defines.
    fn pmpcfg_base(&self, word_index: usize) -> usize {
        if self.config.xlen == 64 {
            (word_index / 2) * self.entries_per_word
        } else {
            word_index * self.entries_per_word
        }
    }

    /// Writes a single entry's configuration byte (§4.2). Out-of-range `i`
    /// is a no-op.
    pub fn write_pmpcfg_entry(&mut self, i: usize, proposed: u8) {
        let Some(&current) = self.cfg.get(i) else {
            return;
        };
        if current.locked() && !self.mseccfg.rlb {
            tracing::trace!(entry = i, "pmpcfg write ignored: entry locked, RLB clear");
            return;
        }
        let candidate = ConfigByte::from_raw(proposed);
        if self.mseccfg.mml && !self.mseccfg.rlb && is_executable_forbidden(candidate) {
            tracing::debug!(
                entry = i,
                byte = proposed,
                "pmpcfg write rejected: MML executable-forbidden combination"
            );
            return;
        }
        self.set_cfg(i, candidate);
    }

    /// Reads `mseccfg` (§3, §6).
    pub fn read_mseccfg(&self) -> u64 {
        self.mseccfg.raw()
    }

    /// Writes `mseccfg` (§4.2): MML and MMWP are sticky (1→0 writes are
    /// ignored); RLB is locked at 0 whenever it currently reads 0 and any
    /// entry has its lock bit set, regardless of that entry's
    /// address-match mode.
    pub fn write_mseccfg(&mut self, value: u64) {
        let proposed = Mseccfg::from_raw(value);
        let current = self.mseccfg;
        let any_locked = self.cfg.iter().any(|c| c.locked());
        let rlb = if !current.rlb && any_locked {
            tracing::trace!("mseccfg RLB write ignored: a locked entry exists and RLB is clear");
            false
        } else {
            proposed.rlb
        };
        self.mseccfg = Mseccfg {
            mml: current.mml || proposed.mml,
            mmwp: current.mmwp || proposed.mmwp,
            rlb,
        };
    }

    /// The Decision Oracle (§4.4): does `mode` have `requested` access to
    /// `[address, address + size)`?
    ///
    /// Scans entries in index order for the first whose range fully
    /// contains the access, then evaluates that rule's configuration byte
    /// (or the no-match default, if none matched) against the current
    /// `mseccfg` policy. Never fails.
    pub fn has_privs(
        &self,
        address: u64,
        size: u64,
        requested: Perm,
        mode: PrivilegeMode,
    ) -> bool {
        let matched = self
            .ranges
            .iter()
            .position(|r| r.contains(address, size))
            .map(|i| self.cfg[i]);
        oracle::decide(matched, requested, mode, self.mseccfg)
    }

    fn set_cfg(&mut self, i: usize, new: ConfigByte) {
        let was_active = self.cfg[i].match_mode() != AddressMatch::Off;
        let is_active = new.match_mode() != AddressMatch::Off;
        self.cfg[i] = new;
        match (was_active, is_active) {
            (false, true) => self.active_count += 1,
            (true, false) => self.active_count -= 1,
            _ => {}
        }
        self.rederive_range(i);
    }

    fn rederive_range(&mut self, i: usize) {
        let Some(&addr) = self.addr.get(i) else {
            return;
        };
        let cfg = self.cfg[i];
        let prev_addr = if i == 0 { 0 } else { self.addr[i - 1] };
        self.ranges[i] = Range::derive(addr, cfg, prev_addr);
    }
}

/// Mask applied to every `pmpaddr` write: the register is `xlen - 2` bits
/// wide.
fn addr_mask_for(xlen: u32) -> u64 {
    let width = xlen - 2;
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// §4.2's executable-forbidden filter, in raw-bit form: forbidden under
/// MML+!RLB iff `(L=1 ∧ X=1)` or `(L=0 ∧ W=1 ∧ X=1)`.
fn is_executable_forbidden(cfg: ConfigByte) -> bool {
    (cfg.locked() && cfg.executable()) || (!cfg.locked() && cfg.writable() && cfg.executable())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::{L, R, W, X};

    const A_TOR: u8 = 1 << 3;
    const A_NA4: u8 = 2 << 3;

    fn pmp() -> Pmp {
        Pmp::new(Config::default()).expect("default config is valid")
    }

    #[test]
    fn fresh_table_has_no_active_rules() {
        assert_eq!(pmp().active_rule_count(), 0);
    }

    #[test]
    fn writing_a_tor_entry_activates_it() {
        let mut p = pmp();
        p.write_pmpaddr(0, 0x2000);
        p.write_pmpcfg_entry(0, A_TOR | R);
        assert_eq!(p.active_rule_count(), 1);
    }

    #[test]
    fn locked_entry_rejects_cfg_and_addr_writes() {
        let mut p = pmp();
        p.write_pmpaddr(0, 0x2000);
        p.write_pmpcfg_entry(0, A_TOR | R | L);

        p.write_pmpcfg_entry(0, A_TOR | R | W | X);
        assert_eq!(p.read_pmpcfg(0) as u8, A_TOR | R | L);

        p.write_pmpaddr(0, 0x4000);
        assert_eq!(p.read_pmpaddr(0), 0x2000);
    }

    #[test]
    fn tor_successor_lock_blocks_predecessor_addr_write() {
        let mut p = pmp();
        p.write_pmpaddr(0, 0x1000);
        p.write_pmpcfg_entry(0, 0); // entry 0 itself unlocked, Off
        p.write_pmpaddr(1, 0x2000);
        p.write_pmpcfg_entry(1, A_TOR | R | L);

        // Entry 0 is unlocked, but entry 1 is a locked TOR whose lower
        // bound depends on pmpaddr[0].
        p.write_pmpaddr(0, 0x1800);
        assert_eq!(p.read_pmpaddr(0), 0x1000);
    }

    #[test]
    fn reset_clears_everything_including_stickiness() {
        let mut p = pmp();
        p.write_mseccfg(crate::mseccfg::MML_BIT);
        p.write_pmpcfg_entry(0, A_NA4 | R);
        p.reset();
        assert_eq!(p.read_mseccfg(), 0);
        assert_eq!(p.read_pmpcfg(0), 0);
        assert_eq!(p.active_rule_count(), 0);
    }

    #[test]
    fn pmpcfg_word_packing_round_trips() {
        let mut p = pmp();
        p.write_pmpcfg(0, u64::from(R) | (u64::from(A_NA4 | W) << 8));
        assert_eq!(p.read_pmpcfg(0), u64::from(R) | (u64::from(A_NA4 | W) << 8));
    }

    #[test]
    fn rv64_even_word_index_skips_to_the_next_real_register() {
        let mut p = pmp(); // default config: xlen=64, entries_per_word=8
        p.write_pmpcfg(2, u64::from(R | A_NA4));
        assert_eq!(p.read_pmpcfg(2), u64::from(R | A_NA4));
        assert_eq!(p.read_pmpcfg(0), 0);
        assert_eq!(p.active_rule_count(), 1);
    }
}
