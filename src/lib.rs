//! This crate provides a path-compressed binary trie (a patricia tree) for longest-prefix-match
//! lookups. Given a set of prefixes (for instance IPv4 or IPv6 networks), each bound to a value
//! such as a next hop or a route identifier, [`PatriciaTree::lookup`] returns the value of the
//! longest stored prefix containing an address, or `None`.
//!
//! Prefixes can be any tuple `(R, u8)`, where `R` is an unsigned primitive integer (`u8`, `u16`,
//! `u32`, `u64`, `u128`) holding the bits left-aligned, and the `u8` is the prefix length. With
//! the `ipnet` feature (enabled by default), [`ipnet::Ipv4Net`] and [`ipnet::Ipv6Net`] are
//! supported, and with the `ipnetwork` feature the types of
//! [ipnetwork](https://crates.io/crates/ipnetwork).
//!
//! ```
//! # use patricia_lpm::*;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pt: PatriciaTree<(u32, u8), &str> = PatriciaTree::new();
//! pt.insert((0x0a000000, 8), "10.0.0.0/8")?;
//! pt.insert((0x0a010000, 16), "10.1.0.0/16")?;
//! assert_eq!(pt.lookup(0x0a010203), Some(&"10.1.0.0/16"));
//! assert_eq!(pt.lookup(0x0a020203), Some(&"10.0.0.0/8"));
//! assert_eq!(pt.lookup(0x0b000000), None);
//! # Ok(())
//! # }
//! ```
//!
//! # Description of the Tree
//!
//! Each node consists of a prefix, a container for a potential value (`Option`), and two
//! optional children. The length of the node's prefix is the bit index at which its children
//! diverge: we look at the most significant bit that is **not** part of the node's prefix. If it
//! is not set, then we take the left branch, and otherwise, we take the right one. Runs of bits
//! without any branching are skipped entirely, so the depth of the tree depends on the number of
//! divergence points, not on the address width.
//!
//! The root is the zero-length prefix and always exists. A value stored at the root acts as the
//! default route.
//!
//! Except for the root, every node either carries a value or has two children. [`PatriciaTree::remove`]
//! and [`PatriciaTree::retain`] merge nodes that would break this rule, so the tree after any
//! sequence of insertions and removals is identical to the tree obtained by only inserting the
//! remaining prefixes.
//!
//! # Width
//!
//! A tree is created with an address width `W` ([`PatriciaTree::with_width`]); inserting a prefix
//! longer than `W` fails with [`Error::InvalidLength`]. [`PatriciaTree::new`] uses all bits of the
//! representation.
//!
//! # Concurrency
//!
//! The tree performs no internal synchronization. Lookups only take `&self`, so any number of
//! threads may look up addresses in a shared tree at the same time. Modifications need `&mut
//! self`; if they must happen while other threads perform lookups, wrap the tree in a lock or
//! swap in a freshly built tree.
//!
//! # Operations on the tree
//!
//! The following are the computational complexities of the functions, where `n` is the number of
//! elements in the tree and `W` the address width.
//!
//! | Operation                                   | Complexity          |
//! |---------------------------------------------|---------------------|
//! | `insert`                                    | `O(min(W, log n))`  |
//! | `remove`                                    | `O(min(W, log n))`  |
//! | `get`, `get_lpm`, `lookup`, `get_mut`       | `O(min(W, log n))`  |
//! | `retain`, `clear`, `clear_with`, `destroy`  | `O(n)`              |
//! | `len` and `is_empty`                        | `O(1)`              |

#![allow(clippy::collapsible_else_if)]
#![deny(missing_docs)]

mod error;
mod fmt;
mod prefix;
#[cfg(feature = "serde")]
mod serde;

pub mod tree;

pub use error::Error;
pub use prefix::Prefix;
pub use tree::PatriciaTree;

#[inline(always)]
pub(crate) fn to_right<P: Prefix>(branch_p: &P, child_p: &P) -> bool {
    child_p.is_bit_set(branch_p.prefix_len())
}
