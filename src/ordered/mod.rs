//! Insertion-ordered associative containers.
//!
//! This module provides [`OrderedHashMap`], a mutable key-unique map whose
//! iteration order is the insertion order of its keys, together with the
//! synchronous transformation operations over it:
//!
//! - [`OrderedHashMap::map_values`]: new map, same keys, transformed values
//! - [`OrderedHashMap::keep_if`]: new map retaining the entries matching a
//!   predicate
//! - [`OrderedHashMap::filter_map`]: filtering and value narrowing in one
//!   pass
//! - [`OrderedHashMap::get_or_insert`] /
//!   [`OrderedHashMap::get_or_insert_with`]: get-or-initialize in place
//!
//! # Ordering Discipline
//!
//! Every operation that produces a new map enumerates the source entries
//! in insertion order and preserves that order in the result. Keys are
//! opaque: they are only ever hashed and compared for equality, never
//! sorted or otherwise inspected.
//!
//! # Examples
//!
//! ```rust
//! use mapops::ordered::OrderedHashMap;
//!
//! let mut population = OrderedHashMap::new();
//! population.insert("osaka".to_string(), 2_750_000);
//! population.insert("nagoya".to_string(), 2_330_000);
//! population.insert("sapporo".to_string(), 1_970_000);
//!
//! let millions = population.map_values(|_, count| count / 1_000_000);
//! assert_eq!(millions.get("osaka"), Some(&2));
//!
//! let big = population.keep_if(|_, count| *count > 2_000_000);
//! assert_eq!(big.len(), 2);
//!
//! // Results keep the source's insertion order
//! let keys: Vec<&str> = big.keys().map(|key| key.as_str()).collect();
//! assert_eq!(keys, vec!["osaka", "nagoya"]);
//! ```

mod hashmap;

pub use hashmap::{OrderedHashMap, OrderedHashMapIntoIterator, OrderedHashMapIterator};
