//! [![github]](https://github.com/spinney-rs/spinney)&ensp;
//! [![crates-io]](https://crates.io/crates/spinney)&ensp;
//!
//! [github]: https://img.shields.io/badge/github-8da0cb?style=for-the-badge&labelColor=555555&logo=github
//! [crates-io]: https://img.shields.io/badge/crates.io-fc8d62?style=for-the-badge&labelColor=555555&logo=rust
//!
//! ## Introduction
//!
//! This crate implements ordered collections based on plain, unbalanced binary search trees,
//! together with a growable array. The trees keep their keys sorted and unique by pairwise
//! comparison, and their shape is decided purely by the order of insertion: there are no
//! rotations and no balancing bookkeeping. What that trades away in worst-case depth it gives
//! back in stability, since a key and its position never move once inserted.
//!
//! ## Benefits
//!
//! The crate complements the standard `std::collection` routines, but provides the following
//! benefits:
//!
//! - Keys stored in the collections do not need to be hashable, only ordered.
//! - Keys in the collections do not need to implement `Clone`, `Copy` or `Default`.
//! - Every key has a stable [`Pos`] that survives any insertion or removal of other keys.
//!   Removal hands back the position of the next key, so a walk can continue across it, and
//!   swapping two whole sets is a constant-time move that disturbs no position at all.
//! - Range queries (`lower_bound`/`upper_bound`) and bidirectional stepping come with the
//!   containers, so ranges of neighbouring keys are cheap to visit.
//! - The crate is small and `#![no_std]`.
//! - The storage of the keys is separate to the storage of the structure of the tree. Keys are
//!   moved when inserted and when the backing array grows, but otherwise do not move as slots
//!   are removed and recycled around them.
//!
//! ## Contents
//!
//! The initial release of the `spinney` crate includes the following types
//!
//! <center>
//!
//! | Type        | Stores     | Sorts By        | Iterator            |
//! |:------------|:-----------|:----------------|---------------------|
//! | `Set`       | Key        | Ord             | `SetIterator`       |
//! | `StringSet` | String     | Ord             | `StringSetIterator` |
//! | `Array`     | Items      | Insertion index | `slice::Iter`       |
//!
//! </center>
//!
//! The crate exposes an additional type `util::Tree` that provides the foundation of the set
//! types. This can be thought of as a utility that manages a set of `usize` indices into an
//! external vector of keys, without storing the vector itself. It is provided to support
//! development of additional collection types.
//!
//! A small companion binary, `needle`, streams a file in bounded chunks and prints the byte
//! offset of every occurrence of a pattern, using `Array` for its carry window.

#![no_std]
#![warn(missing_docs)]

#[cfg(test)]
extern crate std;

mod array;
mod set;
pub mod util;

pub use array::*;
pub use set::*;
