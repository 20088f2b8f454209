//! RISC-V Physical Memory Protection (PMP) and Enhanced PMP (ePMP)
//! permission engine.
//!
//! This crate implements the register-level semantics of the RISC-V PMP
//! extension with the following pieces:
//! 1. **Range Table:** decodes each entry's `pmpaddr`/pmpcfg pair (OFF, TOR,
//!    NA4, NAPOT) into a half-open physical address range.
//! 2. **Rule Store:** the `N` configuration bytes and address registers,
//!    plus the ePMP `mseccfg` register.
//! 3. **Write Gate:** the WARL admission rules that govern every CSR write —
//!    lock-bit immutability, TOR predecessor locking, RLB lockdown, and the
//!    MML executable-forbidden filter.
//! 4. **Decision Oracle:** combines a matched rule with the current
//!    `mseccfg` policy (legacy or MML) to answer an access query.
//! 5. **Reset Controller:** returns the whole table to its power-on state.
//!
//! None of this crate performs address translation, raises traps, or owns
//! CSR numbering — it is the permission-decision core a host CPU embeds
//! behind its own CSR and trap-handling layer.

/// Two-bit `A` field: OFF/TOR/NA4/NAPOT address-matching modes.
pub mod addr_match;
/// Per-entry configuration byte (permission bits, `A` field, lock bit).
pub mod cfg;
/// Table-construction configuration (`Config`, `defaults`).
pub mod config;
/// Construction-time error type.
pub mod error;
/// The `mseccfg` register (MML/MMWP/RLB).
pub mod mseccfg;
/// The Decision Oracle: legacy and MML permission evaluation.
pub mod oracle;
/// Requested/granted permission sets (R/W/X).
pub mod perm;
/// The PMP core: Rule Store, Write Gate, Range Table, Reset Controller.
pub mod pmp;
/// RISC-V privilege modes as seen by the oracle.
pub mod privilege;
/// Derived half-open physical address ranges.
pub mod range;

/// Per-entry configuration byte; see [`cfg::ConfigByte`].
pub use crate::cfg::ConfigByte;
/// Table-construction configuration; use `Config::default()` or deserialize
/// it alongside the rest of a host's machine configuration.
pub use crate::config::Config;
/// Construction-time error; see [`error::PmpError`].
pub use crate::error::PmpError;
/// Requested or granted permission set; see [`perm::Perm`].
pub use crate::perm::Perm;
/// The PMP/ePMP engine itself; see [`pmp::Pmp`].
pub use crate::pmp::Pmp;
/// RISC-V privilege mode; see [`privilege::PrivilegeMode`].
pub use crate::privilege::PrivilegeMode;
