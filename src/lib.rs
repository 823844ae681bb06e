//! # mapops
//!
//! Insertion-ordered map utilities with synchronous and concurrent
//! transformation operations.
//!
//! ## Overview
//!
//! This library provides [`OrderedHashMap`](ordered::OrderedHashMap), a
//! mutable key-unique map whose iteration order is the insertion order of
//! its keys, together with a small set of generic operations over it:
//!
//! - **Element-wise transformation**: `map_values` produces a new map with
//!   the same keys and transformed values
//! - **Filtering**: `keep_if` retains entries matching a predicate;
//!   `filter_map` narrows values while filtering
//! - **Concurrent transformation**: `try_map_values_async` (fail-fast) and
//!   `settle_values_async` (fail-tolerant) run one asynchronous transform
//!   per entry, all concurrently, and reassemble the results in input order
//! - **Get-or-initialize**: `get_or_insert` and `get_or_insert_with`
//!
//! The concurrent operations are executor-agnostic: they join their futures
//! with the `futures` crate's combinators and run on whatever runtime the
//! caller awaits them from.
//!
//! ## Feature Flags
//!
//! - `ordered`: The [`OrderedHashMap`](ordered::OrderedHashMap) container
//!   and its synchronous operations
//! - `async`: Concurrent map operations and the
//!   [`Outcome`](concurrent::Outcome) settled-result record
//! - `serde`: `Serialize`/`Deserialize` for the container
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use mapops::prelude::*;
//!
//! let mut map = OrderedHashMap::new();
//! map.insert("a", 1);
//! map.insert("b", 2);
//! map.insert("c", 3);
//!
//! let scaled = map.map_values(|_, value| value * 10);
//! assert_eq!(scaled.get("b"), Some(&20));
//!
//! let even = map.keep_if(|_, value| value % 2 == 0);
//! assert_eq!(even.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use mapops::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "ordered")]
    pub use crate::ordered::*;

    #[cfg(feature = "async")]
    pub use crate::concurrent::*;
}

#[cfg(feature = "ordered")]
pub mod ordered;

#[cfg(feature = "async")]
pub mod concurrent;

#[cfg(test)]
mod tests {
    #[test]
    fn library_compiles() {
        // Basic smoke test to ensure the library compiles
        assert!(true);
    }
}
