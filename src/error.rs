//! Construction-time errors.
//!
//! Every *runtime* operation on a constructed [`crate::Pmp`] is infallible
//! (§7): writes are WARL, and the oracle returns a plain `bool`. The only
//! fallible step in the whole crate is building the table in the first
//! place from a caller-supplied [`crate::Config`].

/// Errors that can occur while constructing a [`crate::Pmp`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PmpError {
    /// `entry_count` was zero, or not a whole multiple of the pmpcfg word
    /// width implied by `xlen` (4 entries/word on RV32, 8 on RV64).
    #[error(
        "pmp entry count {got} is not a positive multiple of the pmpcfg word width for xlen={xlen}"
    )]
    InvalidEntryCount {
        /// The rejected entry count.
        got: usize,
        /// The `xlen` it was validated against.
        xlen: u32,
    },

    /// `xlen` was neither 32 nor 64.
    #[error("xlen {got} is not 32 or 64")]
    InvalidXlen {
        /// The rejected `xlen` value.
        got: u32,
    },
}
