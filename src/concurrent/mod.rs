//! Concurrent map transformations.
//!
//! This module provides the asynchronous counterparts of
//! [`OrderedHashMap::map_values`]: one transform invocation per entry, all
//! of them driven concurrently, with the results reassembled under the
//! original keys in the original insertion order.
//!
//! Two failure models are offered:
//!
//! - [`try_map_values_async`](OrderedHashMap::try_map_values_async) is
//!   **fail-fast**: the first failing invocation fails the whole
//!   operation and no result map is produced.
//! - [`settle_values_async`](OrderedHashMap::settle_values_async) is
//!   **fail-tolerant**: every invocation settles into an [`Outcome`]
//!   record, and the operation itself always completes.
//!
//! A third form, [`map_values_async`](OrderedHashMap::map_values_async),
//! covers transforms that cannot fail.
//!
//! # Scheduling Model
//!
//! All three operations follow the same discipline: a single pass over
//! the map snapshots the key sequence and creates one future per entry,
//! then the whole batch is awaited at a single suspension point
//! (`futures::future::join_all` / `try_join_all`). The futures progress
//! cooperatively and may complete in any order; the snapshot is what the
//! results are zipped against, so the output order is always the input
//! order. No tasks are spawned and no executor is assumed: the batch
//! runs on whatever runtime the caller awaits it from.
//!
//! The map is borrowed shared for the whole operation, so the borrow
//! checker enforces the read-only contract: the map cannot be mutated
//! while a concurrent transformation over it is in flight.
//!
//! # Examples
//!
//! ```rust
//! use mapops::ordered::OrderedHashMap;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut map = OrderedHashMap::new();
//! map.insert("a".to_string(), 1);
//! map.insert("b".to_string(), 2);
//!
//! let doubled: Result<_, String> = map
//!     .try_map_values_async(|_, value| {
//!         let value = *value;
//!         async move { Ok(value * 2) }
//!     })
//!     .await;
//!
//! let doubled = doubled.unwrap();
//! assert_eq!(doubled.get("a"), Some(&2));
//! assert_eq!(doubled.get("b"), Some(&4));
//! # }
//! ```

mod outcome;

pub use outcome::Outcome;

use std::future::Future;
use std::hash::Hash;

use futures::future;

use crate::ordered::OrderedHashMap;

// =============================================================================
// Concurrent Operations
// =============================================================================

impl<K: Clone + Hash + Eq, V> OrderedHashMap<K, V> {
    /// Applies an infallible asynchronous transform to every entry
    /// concurrently, producing a new map with the same keys.
    ///
    /// All per-entry futures are created before any is awaited and are
    /// then driven concurrently at a single join point. The result map
    /// has the same key set as this map, and its entries are in this
    /// map's insertion order regardless of the order the futures
    /// complete in.
    ///
    /// The transform is called with each key and value while the map is
    /// enumerated; the future it returns must own whatever it needs
    /// (clone or copy out of the references before the `async move`
    /// block).
    ///
    /// # Type Parameters
    ///
    /// * `W` - The type of the transformed values
    /// * `F` - The transformation function type
    /// * `Fut` - The future type returned by the transform
    ///
    /// # Arguments
    ///
    /// * `transform` - A function receiving the key and value of each
    ///   entry, returning a future that produces the new value
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let mut map = OrderedHashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// let scaled = map
    ///     .map_values_async(|_, value| {
    ///         let value = *value;
    ///         async move { value * 10 }
    ///     })
    ///     .await;
    ///
    /// assert_eq!(scaled.get("a"), Some(&10));
    /// assert_eq!(scaled.get("b"), Some(&20));
    /// # }
    /// ```
    pub async fn map_values_async<W, F, Fut>(&self, mut transform: F) -> OrderedHashMap<K, W>
    where
        F: FnMut(&K, &V) -> Fut,
        Fut: Future<Output = W>,
    {
        let mut keys = Vec::with_capacity(self.len());
        let mut pending = Vec::with_capacity(self.len());
        for (key, value) in self.iter() {
            keys.push(key.clone());
            pending.push(transform(key, value));
        }

        let results = future::join_all(pending).await;
        debug_assert_eq!(keys.len(), results.len());

        keys.into_iter().zip(results).collect()
    }

    /// Applies a fallible asynchronous transform to every entry
    /// concurrently, failing fast on the first failure.
    ///
    /// All per-entry futures are created before any is awaited and are
    /// then driven concurrently at a single join point
    /// (`futures::future::try_join_all`):
    ///
    /// - If every invocation succeeds, returns a new map with the same
    ///   key set as this map, entries in this map's insertion order,
    ///   each value replaced by the corresponding transform result.
    /// - If any invocation fails, the whole operation fails with one of
    ///   the underlying errors and no map is returned. When several
    ///   invocations fail, which error surfaces is unspecified. The
    ///   remaining futures are dropped, not cancelled mid-effect: side
    ///   effects they already performed are not undone, only their
    ///   results are discarded.
    ///
    /// An empty map resolves immediately to an empty map with no work
    /// scheduled.
    ///
    /// # Type Parameters
    ///
    /// * `W` - The type of the transformed values
    /// * `E` - The error type of the transform
    /// * `F` - The transformation function type
    /// * `Fut` - The future type returned by the transform
    ///
    /// # Arguments
    ///
    /// * `transform` - A function receiving the key and value of each
    ///   entry, returning a future that produces the new value or fails
    ///
    /// # Errors
    ///
    /// Returns the first error encountered by the join primitive when
    /// any invocation fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let mut map = OrderedHashMap::new();
    /// map.insert("a", 2);
    /// map.insert("b", 0);
    ///
    /// let inverted = map
    ///     .try_map_values_async(|_, value| {
    ///         let value = *value;
    ///         async move {
    ///             if value == 0 {
    ///                 Err("division by zero".to_string())
    ///             } else {
    ///                 Ok(100 / value)
    ///             }
    ///         }
    ///     })
    ///     .await;
    ///
    /// assert_eq!(inverted, Err("division by zero".to_string()));
    /// # }
    /// ```
    pub async fn try_map_values_async<W, E, F, Fut>(
        &self,
        mut transform: F,
    ) -> Result<OrderedHashMap<K, W>, E>
    where
        F: FnMut(&K, &V) -> Fut,
        Fut: Future<Output = Result<W, E>>,
    {
        let mut keys = Vec::with_capacity(self.len());
        let mut pending = Vec::with_capacity(self.len());
        for (key, value) in self.iter() {
            keys.push(key.clone());
            pending.push(transform(key, value));
        }

        let results = future::try_join_all(pending).await?;
        debug_assert_eq!(keys.len(), results.len());

        Ok(keys.into_iter().zip(results).collect())
    }

    /// Applies a fallible asynchronous transform to every entry
    /// concurrently, settling every invocation into an [`Outcome`].
    ///
    /// Identical scheduling to
    /// [`try_map_values_async`](Self::try_map_values_async), but no
    /// individual failure can abort the batch: each invocation's
    /// completion is converted into an [`Outcome`] record before the
    /// join boundary, and the operation always completes with a map from
    /// every original key to its outcome, in this map's insertion order.
    ///
    /// # Type Parameters
    ///
    /// * `W` - The type of the fulfilled values
    /// * `E` - The rejection reason type of the transform
    /// * `F` - The transformation function type
    /// * `Fut` - The future type returned by the transform
    ///
    /// # Arguments
    ///
    /// * `transform` - A function receiving the key and value of each
    ///   entry, returning a future that produces the new value or fails
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::concurrent::Outcome;
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let mut map = OrderedHashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// let settled = map
    ///     .settle_values_async(|_, value| {
    ///         let value = *value;
    ///         async move {
    ///             if value % 2 == 0 {
    ///                 Err(format!("{value} is even"))
    ///             } else {
    ///                 Ok(value * 10)
    ///             }
    ///         }
    ///     })
    ///     .await;
    ///
    /// assert_eq!(settled.get("a"), Some(&Outcome::Fulfilled(10)));
    /// assert_eq!(
    ///     settled.get("b"),
    ///     Some(&Outcome::Rejected("2 is even".to_string()))
    /// );
    /// # }
    /// ```
    pub async fn settle_values_async<W, E, F, Fut>(
        &self,
        mut transform: F,
    ) -> OrderedHashMap<K, Outcome<W, E>>
    where
        F: FnMut(&K, &V) -> Fut,
        Fut: Future<Output = Result<W, E>>,
    {
        let mut keys = Vec::with_capacity(self.len());
        let mut pending = Vec::with_capacity(self.len());
        for (key, value) in self.iter() {
            keys.push(key.clone());
            let invocation = transform(key, value);
            // Settle inside the future so no failure crosses the join.
            pending.push(async move {
                match invocation.await {
                    Ok(value) => Outcome::Fulfilled(value),
                    Err(reason) => Outcome::Rejected(reason),
                }
            });
        }

        let outcomes = future::join_all(pending).await;
        debug_assert_eq!(keys.len(), outcomes.len());

        keys.into_iter().zip(outcomes).collect()
    }
}
