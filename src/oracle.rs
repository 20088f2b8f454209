//! The Decision Oracle (§4.4): combines a matched rule's configuration
//! byte with the current `mseccfg` policy to produce an allow/deny result.
//!
//! This module holds no state of its own — [`decide`] is a pure function
//! of (matched rule, requested permissions, privilege mode, mseccfg) — and
//! the Rule Store's matching scan (first matching range wins) lives in
//! [`crate::pmp::Pmp::has_privs`] alongside the Write Gate it shares state
//! with.

use crate::cfg::ConfigByte;
use crate::mseccfg::Mseccfg;
use crate::perm::Perm;
use crate::privilege::PrivilegeMode;

/// MML truth table (§4.4), indexed by the nibble `L<<3 | R<<2 | W<<1 | X`
/// taken from the matched rule's configuration byte. Each entry is the
/// `(machine_mode_perms, user_mode_perms)` pair of permission bitmasks
/// that the row grants.
#[rustfmt::skip]
const MML_TABLE: [(u8, u8); 16] = [
    // L R W X                  M-mode          U/S-mode
    /* 0 0 0 0 */ (0,                     0),
    /* 0 0 0 1 */ (0,                     crate::cfg::X),
    /* 0 0 1 0 */ (crate::cfg::R | crate::cfg::W, crate::cfg::R),
    /* 0 0 1 1 */ (crate::cfg::R | crate::cfg::W, crate::cfg::R | crate::cfg::W),
    /* 0 1 0 0 */ (0,                     crate::cfg::R),
    /* 0 1 0 1 */ (0,                     crate::cfg::R | crate::cfg::X),
    /* 0 1 1 0 */ (0,                     crate::cfg::R | crate::cfg::W),
    /* 0 1 1 1 */ (0,                     crate::cfg::R | crate::cfg::W | crate::cfg::X),
    /* 1 0 0 0 */ (0,                     0),
    /* 1 0 0 1 */ (crate::cfg::X,               0),
    /* 1 0 1 0 */ (crate::cfg::R | crate::cfg::X, crate::cfg::X),
    /* 1 0 1 1 */ (crate::cfg::R | crate::cfg::X, crate::cfg::R | crate::cfg::X),
    /* 1 1 0 0 */ (crate::cfg::R,               0),
    /* 1 1 0 1 */ (crate::cfg::R | crate::cfg::X, 0),
    /* 1 1 1 0 */ (crate::cfg::R | crate::cfg::W, 0),
    /* 1 1 1 1 */ (crate::cfg::R | crate::cfg::W | crate::cfg::X, 0),
];

/// Looks up the `(L,R,W,X)` nibble of a matched rule's configuration byte
/// in the MML truth table and returns the permissions it grants to the
/// requesting mode.
fn mml_grant(cfg: ConfigByte, mode: PrivilegeMode) -> Perm {
    let nibble = ((cfg.locked() as u8) << 3)
        | ((cfg.readable() as u8) << 2)
        | ((cfg.writable() as u8) << 1)
        | (cfg.executable() as u8);
    let (m_mask, u_mask) = MML_TABLE[nibble as usize];
    Perm::from_bits(if mode.is_machine() { m_mask } else { u_mask })
}

/// Decides whether `requested` is permitted, given the first matched
/// rule's configuration byte (`None` if no entry matched), the requesting
/// `mode`, and the current `mseccfg` policy.
///
/// This is the entire Decision Oracle: it never fails and never mutates
/// anything, so a host may call it freely from its memory-access path.
pub(crate) fn decide(
    matched: Option<ConfigByte>,
    requested: Perm,
    mode: PrivilegeMode,
    mseccfg: Mseccfg,
) -> bool {
    if mseccfg.mml {
        decide_mml(matched, requested, mode, mseccfg)
    } else {
        decide_legacy(matched, requested, mode, mseccfg)
    }
}

fn decide_legacy(
    matched: Option<ConfigByte>,
    requested: Perm,
    mode: PrivilegeMode,
    mseccfg: Mseccfg,
) -> bool {
    match matched {
        Some(cfg) => {
            if mode.is_machine() && !cfg.locked() {
                // M-mode bypasses unlocked rules entirely.
                true
            } else {
                requested.is_subset_of(Perm::from_bits(cfg.raw()))
            }
        }
        None => mode.is_machine() && !mseccfg.mmwp,
    }
}

fn decide_mml(
    matched: Option<ConfigByte>,
    requested: Perm,
    mode: PrivilegeMode,
    mseccfg: Mseccfg,
) -> bool {
    match matched {
        Some(cfg) => requested.is_subset_of(mml_grant(cfg, mode)),
        None => {
            if mode.is_machine() {
                !mseccfg.mmwp && requested.is_subset_of(Perm::READ | Perm::WRITE)
            } else {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_unlocked_rule_always_allows_machine_mode() {
        let cfg = ConfigByte::from_raw(crate::cfg::R);
        assert!(decide(
            Some(cfg),
            Perm::WRITE | Perm::EXEC,
            PrivilegeMode::Machine,
            Mseccfg::default()
        ));
    }

    #[test]
    fn legacy_locked_rule_applies_to_machine_mode() {
        let cfg = ConfigByte::from_raw(crate::cfg::R | crate::cfg::L);
        assert!(!decide(
            Some(cfg),
            Perm::WRITE,
            PrivilegeMode::Machine,
            Mseccfg::default()
        ));
    }

    #[test]
    fn legacy_unmatched_denies_user_mode() {
        assert!(!decide(
            None,
            Perm::READ,
            PrivilegeMode::User,
            Mseccfg::default()
        ));
    }

    #[test]
    fn legacy_unmatched_allows_machine_mode_without_mmwp() {
        assert!(decide(
            None,
            Perm::READ | Perm::WRITE | Perm::EXEC,
            PrivilegeMode::Machine,
            Mseccfg::default()
        ));
    }

    #[test]
    fn mml_unmatched_machine_mode_denies_execute() {
        let mseccfg = Mseccfg {
            mml: true,
            ..Mseccfg::default()
        };
        assert!(!decide(None, Perm::EXEC, PrivilegeMode::Machine, mseccfg));
        assert!(decide(
            None,
            Perm::READ | Perm::WRITE,
            PrivilegeMode::Machine,
            mseccfg
        ));
    }

    #[test]
    fn mml_unmatched_user_mode_always_denies() {
        let mseccfg = Mseccfg {
            mml: true,
            ..Mseccfg::default()
        };
        assert!(!decide(None, Perm::NONE, PrivilegeMode::User, mseccfg));
    }

    #[test]
    fn mml_shared_rw_row_grants_read_only_to_user() {
        // L=0 R=0 W=1 X=0 → M: R,W  U: R
        let cfg = ConfigByte::from_raw(crate::cfg::W);
        let mseccfg = Mseccfg {
            mml: true,
            ..Mseccfg::default()
        };
        assert!(decide(Some(cfg), Perm::READ, PrivilegeMode::User, mseccfg));
        assert!(!decide(Some(cfg), Perm::WRITE, PrivilegeMode::User, mseccfg));
        assert!(decide(
            Some(cfg),
            Perm::READ | Perm::WRITE,
            PrivilegeMode::Machine,
            mseccfg
        ));
    }
}
