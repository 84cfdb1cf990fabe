//! Errors returned when building a [`crate::PatriciaTree`].

use thiserror::Error;

/// Errors that can occur when creating or modifying a [`crate::PatriciaTree`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The prefix is longer than the address width of the tree. The tree is left unchanged.
    #[error("prefix length {len} exceeds the address width of {width} bits")]
    InvalidLength {
        /// Length of the rejected prefix.
        len: u8,
        /// Address width of the tree.
        width: u8,
    },

    /// The requested address width is zero or does not fit into the prefix representation.
    #[error("address width {width} is invalid, must be between 1 and {max}")]
    InvalidWidth {
        /// The requested width.
        width: u8,
        /// Number of bits in the prefix representation.
        max: u8,
    },
}
