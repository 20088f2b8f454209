//! Configuration for constructing a [`crate::Pmp`].
//!
//! Mirrors the host simulator's configuration style: a `defaults` module of
//! baseline constants plus a small, `serde`-deserializable struct so a host
//! CPU can source PMP sizing from the same configuration surface (JSON,
//! TOML, ...) it uses for the rest of its machine.

use serde::Deserialize;

use crate::error::PmpError;

/// Default configuration constants.
mod defaults {
    /// Default number of PMP entries (RISC-V allows up to 64; 16 is the
    /// common case and matches the host simulator's `PMP_COUNT`).
    pub const ENTRY_COUNT: usize = 16;

    /// Default register width in bits.
    pub const XLEN: u32 = 64;
}

/// Number of pmpcfg entries packed into one CSR word for a given `xlen`.
pub(crate) fn entries_per_word(xlen: u32) -> usize {
    // One configuration byte per entry; pmpcfg CSRs are `xlen`/8 bytes wide.
    (xlen / 8) as usize
}

/// Sizing configuration for a [`crate::Pmp`] table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Number of PMP entries (typically 16 or 64).
    pub entry_count: usize,
    /// Register width in bits (32 or 64); governs `pmpaddr` masking width
    /// and pmpcfg word packing.
    pub xlen: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry_count: defaults::ENTRY_COUNT,
            xlen: defaults::XLEN,
        }
    }
}

impl Config {
    /// Validates the configuration, returning the entries-per-word packing
    /// factor on success.
    pub(crate) fn validate(self) -> Result<usize, PmpError> {
        if self.xlen != 32 && self.xlen != 64 {
            return Err(PmpError::InvalidXlen { got: self.xlen });
        }
        let per_word = entries_per_word(self.xlen);
        if self.entry_count == 0 || self.entry_count % per_word != 0 {
            return Err(PmpError::InvalidEntryCount {
                got: self.entry_count,
                xlen: self.xlen,
            });
        }
        Ok(per_word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_entries() {
        let cfg = Config {
            entry_count: 0,
            xlen: 64,
        };
        assert_eq!(
            cfg.validate(),
            Err(PmpError::InvalidEntryCount { got: 0, xlen: 64 })
        );
    }

    #[test]
    fn rejects_entry_count_not_a_multiple_of_word_width() {
        let cfg = Config {
            entry_count: 15,
            xlen: 64,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_unsupported_xlen() {
        let cfg = Config {
            entry_count: 16,
            xlen: 16,
        };
        assert_eq!(
            cfg.validate(),
            Err(PmpError::InvalidXlen { got: 16 })
        );
    }
}
