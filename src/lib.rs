#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Errors reported when a table's invariants have been broken by its caller.
pub mod error;

/// A HashMap implementation using Robin Hood hashing.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers.
pub mod hash_map;

pub mod hash_table;

/// A hash set implementation using Robin Hood hashing.
///
/// This module provides a `HashSet` that wraps the `HashTable` and provides
/// a standard set interface with configurable hashers.
pub mod hash_set;

pub use error::ContractViolation;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by [`HashMap`] and [`HashSet`] when none is
        /// specified.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by [`HashMap`] and [`HashSet`] when none is
        /// specified.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// Placeholder default hasher for builds with neither `foldhash` nor
        /// `std`. It cannot be constructed, so maps and sets must be created
        /// with `with_hasher`.
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}
