//! Mutable insertion-ordered hash map with automatic state transitions.
//!
//! This module provides [`OrderedHashMap`], a key-unique associative
//! container whose iteration order is the insertion order of its keys,
//! with automatic state transitions between small (inline) and large
//! (indexed) representations.
//!
//! # Overview
//!
//! `OrderedHashMap` stores entries in the order their keys were first
//! inserted and keeps that order stable across value updates:
//!
//! - Using inline storage (`SmallVec`) with linear scans for small maps
//!   (up to 8 entries)
//! - Automatically promoting to an entry vector plus a position index
//!   (`HashMap<K, usize>`) when exceeding 8 entries
//! - Automatically demoting back to inline storage when size drops to 8
//!   or fewer
//!
//! Re-inserting an existing key replaces its value in place; the entry
//! keeps its original position.
//!
//! # Time Complexity
//!
//! | Operation       | Small (n <= 8)    | Large (n > 8)       |
//! |-----------------|-------------------|---------------------|
//! | `get`           | O(n)              | O(1) expected       |
//! | `insert`        | O(n)              | O(1) expected       |
//! | `remove`        | O(n)              | O(n)                |
//! | `contains_key`  | O(n)              | O(1) expected       |
//! | `len`           | O(1)              | O(1)                |
//! | `is_empty`      | O(1)              | O(1)                |
//! | `iter`          | O(1) + O(n)       | O(1) + O(n)         |
//! | `map_values`    | O(n)              | O(n)                |
//! | `keep_if`       | O(n)              | O(n)                |
//!
//! **Note**: `remove` preserves the insertion order of the remaining
//! entries, which requires shifting the entry vector and rebuilding the
//! affected index positions in the Large state.
//!
//! # Examples
//!
//! ```rust
//! use mapops::ordered::OrderedHashMap;
//!
//! let mut map = OrderedHashMap::new();
//! map.insert("one".to_string(), 1);
//! map.insert("two".to_string(), 2);
//! map.insert("three".to_string(), 3);
//!
//! assert_eq!(map.get("one"), Some(&1));
//! assert_eq!(map.len(), 3);
//!
//! // Iteration follows insertion order, not key order
//! let keys: Vec<&str> = map.keys().map(|key| key.as_str()).collect();
//! assert_eq!(keys, vec!["one", "two", "three"]);
//!
//! // Updating a value keeps the entry's position
//! map.insert("one".to_string(), 100);
//! let first = map.first().map(|(key, value)| (key.as_str(), *value));
//! assert_eq!(first, Some(("one", 100)));
//! ```
//!
//! # State Transitions
//!
//! ```text
//!                    insert (n == 1)
//!     Empty ─────────────────────────────► Small
//!       ▲                                    │
//!       │ remove (n == 0)                    │ insert (n == 9)
//!       │                                    ▼
//!       └─────────────── Small ◄──────── Large
//!                     remove (n == 8)
//! ```

use smallvec::SmallVec;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::iter::FromIterator;

/// The threshold for transitioning between Small and Large states.
/// Maps with more than this many entries use an indexed entry vector.
const SMALL_THRESHOLD: usize = 8;

/// Entry vector with a key-to-position index for O(1) expected lookups.
#[derive(Clone)]
struct LargeEntries<K, V> {
    /// Entries in insertion order.
    entries: Vec<(K, V)>,
    /// Position of each key within `entries`.
    index: HashMap<K, usize>,
}

impl<K: Hash + Eq, V> LargeEntries<K, V> {
    fn position_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.position_of(key)
            .map(|position| &self.entries[position].1)
    }

    fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.position_of(key)
            .map(|position| &mut self.entries[position].1)
    }

    /// Removes an entry, shifting later entries down one position.
    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = self.index.remove(key)?;
        let (_, value) = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(value)
    }
}

impl<K: Clone + Hash + Eq, V> LargeEntries<K, V> {
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(position) = self.position_of(&key) {
            return Some(std::mem::replace(&mut self.entries[position].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }
}

/// Internal representation of the map state.
#[derive(Clone)]
enum OrderedHashMapInner<K, V> {
    Empty,
    Small(SmallVec<[(K, V); SMALL_THRESHOLD]>),
    Large(LargeEntries<K, V>),
}

/// A mutable insertion-ordered hash map with automatic state transitions.
///
/// This map automatically transitions between three states based on size:
/// - Empty: No entries
/// - Small: Up to 8 entries stored inline in a `SmallVec`, linear scans
/// - Large: More than 8 entries stored in an entry vector with a
///   key-to-position index
///
/// Iteration order is always the insertion order of keys, independent of
/// the internal state. Keys are never inspected beyond hashing and
/// equality.
///
/// # Type Parameters
///
/// * `K` - The key type. Keyed operations require `Clone + Hash + Eq`.
/// * `V` - The value type.
///
/// # Examples
///
/// ```rust
/// use mapops::ordered::OrderedHashMap;
///
/// let mut map = OrderedHashMap::new();
/// map.insert(3, "three");
/// map.insert(1, "one");
///
/// // Insertion order, not key order
/// let keys: Vec<i32> = map.keys().copied().collect();
/// assert_eq!(keys, vec![3, 1]);
/// ```
#[derive(Clone)]
pub struct OrderedHashMap<K, V> {
    inner: OrderedHashMapInner<K, V>,
}

impl<K, V> OrderedHashMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let map: OrderedHashMap<String, i32> = OrderedHashMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: OrderedHashMapInner::Empty,
        }
    }

    /// Creates a new empty map with space for at least `capacity` entries.
    ///
    /// A capacity above the inline threshold starts the map directly in
    /// the Large state so the first inserts do not pay for a promotion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let map: OrderedHashMap<String, i32> = OrderedHashMap::with_capacity(100);
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        if capacity > SMALL_THRESHOLD {
            Self {
                inner: OrderedHashMapInner::Large(LargeEntries {
                    entries: Vec::with_capacity(capacity),
                    index: HashMap::with_capacity(capacity),
                }),
            }
        } else {
            Self::new()
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1) for all states.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// assert_eq!(map.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries_slice().len()
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let empty: OrderedHashMap<String, i32> = OrderedHashMap::new();
    /// assert!(empty.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries_slice().is_empty()
    }

    /// Removes all entries from the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    /// map.insert("a", 1);
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.inner = OrderedHashMapInner::Empty;
    }

    /// Returns the first entry in insertion order, or `None` if empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    /// map.insert("b", 2);
    /// map.insert("a", 1);
    /// assert_eq!(map.first(), Some((&"b", &2)));
    /// ```
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.entries_slice().first().map(|(key, value)| (key, value))
    }

    /// Returns the most recently inserted entry, or `None` if empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    /// map.insert("b", 2);
    /// map.insert("a", 1);
    /// assert_eq!(map.last(), Some((&"a", &1)));
    /// ```
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        self.entries_slice().last().map(|(key, value)| (key, value))
    }

    /// Returns an iterator over key-value pairs in insertion order.
    ///
    /// # Complexity
    ///
    /// O(1) for iterator creation, O(n) for full traversal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// let pairs: Vec<(&&str, &i32)> = map.iter().collect();
    /// assert_eq!(pairs, vec![(&"a", &1), (&"b", &2)]);
    /// ```
    #[inline]
    #[must_use]
    pub fn iter(&self) -> OrderedHashMapIterator<'_, K, V> {
        OrderedHashMapIterator {
            inner: self.entries_slice().iter(),
        }
    }

    /// Returns an iterator over key-value pairs in insertion order.
    ///
    /// This is an alias for [`iter`](Self::iter), provided for API
    /// consistency with other map-like containers.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> OrderedHashMapIterator<'_, K, V> {
        self.iter()
    }

    /// Returns an iterator over the keys in insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// let keys: Vec<&&str> = map.keys().collect();
    /// assert_eq!(keys, vec![&"a", &"b"]);
    /// ```
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values in insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// let total: i32 = map.values().sum();
    /// assert_eq!(total, 3);
    /// ```
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// The entries in insertion order, independent of state.
    #[inline]
    fn entries_slice(&self) -> &[(K, V)] {
        match &self.inner {
            OrderedHashMapInner::Empty => &[],
            OrderedHashMapInner::Small(entries) => entries,
            OrderedHashMapInner::Large(large) => &large.entries,
        }
    }

    /// Consumes the map, returning the entries in insertion order.
    fn into_entries(self) -> Vec<(K, V)> {
        match self.inner {
            OrderedHashMapInner::Empty => Vec::new(),
            OrderedHashMapInner::Small(entries) => entries.into_vec(),
            OrderedHashMapInner::Large(large) => large.entries,
        }
    }

    /// Returns `true` if the map is in the Small state.
    ///
    /// This is primarily useful for testing state transitions.
    #[cfg(test)]
    const fn is_small_state(&self) -> bool {
        matches!(self.inner, OrderedHashMapInner::Small(_))
    }

    /// Returns `true` if the map is in the Large state.
    ///
    /// This is primarily useful for testing state transitions.
    #[cfg(test)]
    const fn is_large_state(&self) -> bool {
        matches!(self.inner, OrderedHashMapInner::Large(_))
    }
}

impl<K: Hash + Eq, V> OrderedHashMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but `Hash`
    /// and `Eq` on the borrowed form must match those for the key type.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to look up
    ///
    /// # Complexity
    ///
    /// O(n) for the Small state, O(1) expected for the Large state.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    /// map.insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &self.inner {
            OrderedHashMapInner::Empty => None,
            OrderedHashMapInner::Small(entries) => entries
                .iter()
                .find(|(existing, _)| K::borrow(existing) == key)
                .map(|(_, value)| value),
            OrderedHashMapInner::Large(large) => large.get(key),
        }
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to look up
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    /// map.insert("count", 1);
    /// if let Some(value) = map.get_mut("count") {
    ///     *value += 1;
    /// }
    /// assert_eq!(map.get("count"), Some(&2));
    /// ```
    #[must_use]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &mut self.inner {
            OrderedHashMapInner::Empty => None,
            OrderedHashMapInner::Small(entries) => entries
                .iter_mut()
                .find(|(existing, _)| K::borrow(existing) == key)
                .map(|(_, value)| value),
            OrderedHashMapInner::Large(large) => large.get_mut(key),
        }
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to check
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    /// map.insert("key", 42);
    ///
    /// assert!(map.contains_key("key"));
    /// assert!(!map.contains_key("other"));
    /// ```
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// The position of a key in insertion order, if present.
    fn position_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &self.inner {
            OrderedHashMapInner::Empty => None,
            OrderedHashMapInner::Small(entries) => entries
                .iter()
                .position(|(existing, _)| K::borrow(existing) == key),
            OrderedHashMapInner::Large(large) => large.position_of(key),
        }
    }

    /// Mutable access to the value at an insertion-order position.
    fn value_at_mut(&mut self, position: usize) -> Option<&mut V> {
        match &mut self.inner {
            OrderedHashMapInner::Empty => None,
            OrderedHashMapInner::Small(entries) => {
                entries.get_mut(position).map(|(_, value)| value)
            }
            OrderedHashMapInner::Large(large) => {
                large.entries.get_mut(position).map(|(_, value)| value)
            }
        }
    }
}

impl<K: Clone + Hash + Eq, V> OrderedHashMap<K, V> {
    /// Creates a map containing a single key-value pair.
    ///
    /// # Arguments
    ///
    /// * `key` - The key
    /// * `value` - The value
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let map = OrderedHashMap::singleton("key".to_string(), 42);
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get("key"), Some(&42));
    /// ```
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        let mut map = Self::new();
        map.insert(key, value);
        map
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contains the key, the value is replaced in
    /// place and the previous value is returned; the entry keeps its
    /// original position in the insertion order. A new key is appended at
    /// the end of the order.
    ///
    /// # State Transitions
    ///
    /// - `Empty` -> `Small` when inserting the first entry
    /// - `Small` -> `Large` when inserting the 9th entry
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert
    /// * `value` - The value to insert
    ///
    /// # Complexity
    ///
    /// O(n) for the Small state (duplicate scan), O(1) expected for the
    /// Large state; promotion at the threshold is O(n).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    /// assert_eq!(map.insert("key", 1), None);
    /// assert_eq!(map.insert("key", 2), Some(1));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = match &mut self.inner {
            OrderedHashMapInner::Empty => {
                let mut entries = SmallVec::new();
                entries.push((key, value));
                self.inner = OrderedHashMapInner::Small(entries);
                None
            }
            OrderedHashMapInner::Small(entries) => {
                if let Some(position) =
                    entries.iter().position(|(existing, _)| *existing == key)
                {
                    Some(std::mem::replace(&mut entries[position].1, value))
                } else {
                    entries.push((key, value));
                    None
                }
            }
            OrderedHashMapInner::Large(large) => large.insert(key, value),
        };
        if previous.is_none() {
            self.promote_if_needed();
        }
        previous
    }

    /// Removes a key from the map, returning the value if it was present.
    ///
    /// The insertion order of the remaining entries is preserved.
    ///
    /// # State Transitions
    ///
    /// - `Small` -> `Empty` when removing the last entry
    /// - `Large` -> `Small` when size drops to 8 or fewer entries
    ///
    /// # Arguments
    ///
    /// * `key` - The key to remove
    ///
    /// # Complexity
    ///
    /// O(n) for both states (the entry vector is shifted).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    /// map.insert("a".to_string(), 1);
    /// map.insert("b".to_string(), 2);
    ///
    /// // Can remove using &str
    /// assert_eq!(map.remove("a"), Some(1));
    /// assert_eq!(map.remove("a"), None);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = match &mut self.inner {
            OrderedHashMapInner::Empty => None,
            OrderedHashMapInner::Small(entries) => entries
                .iter()
                .position(|(existing, _)| K::borrow(existing) == key)
                .map(|position| entries.remove(position).1),
            OrderedHashMapInner::Large(large) => large.remove(key),
        };
        if removed.is_some() {
            self.demote_if_needed();
        }
        removed
    }

    /// Returns the value stored for the key, inserting the default first
    /// if the key is absent.
    ///
    /// Exactly one of {no mutation, one insertion} occurs per call. A
    /// newly inserted default is appended at the end of the insertion
    /// order. The default is evaluated by the caller before the call;
    /// use [`get_or_insert_with`](Self::get_or_insert_with) when
    /// constructing it is expensive.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to look up
    /// * `default` - The value to insert if the key is absent
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    ///
    /// assert_eq!(*map.get_or_insert("x", 5), 5);
    /// assert_eq!(map.get("x"), Some(&5));
    ///
    /// // The key is now present, so the new default is ignored
    /// assert_eq!(*map.get_or_insert("x", 9), 5);
    /// assert_eq!(map.get("x"), Some(&5));
    /// ```
    pub fn get_or_insert(&mut self, key: K, default: V) -> &mut V {
        self.get_or_insert_with(key, move || default)
    }

    /// Returns the value stored for the key, inserting the result of the
    /// default function first if the key is absent.
    ///
    /// The lazy counterpart of [`get_or_insert`](Self::get_or_insert):
    /// the default function is only called when the key is absent.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to look up
    /// * `default` - Called to produce the value if the key is absent
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map: OrderedHashMap<&str, Vec<i32>> = OrderedHashMap::new();
    /// map.get_or_insert_with("xs", Vec::new).push(1);
    /// map.get_or_insert_with("xs", Vec::new).push(2);
    /// assert_eq!(map.get("xs"), Some(&vec![1, 2]));
    /// ```
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let position = match self.position_of(&key) {
            Some(position) => position,
            None => {
                self.insert(key, default());
                self.len() - 1
            }
        };
        match self.value_at_mut(position) {
            Some(value) => value,
            None => unreachable!("entry present at the position just resolved"),
        }
    }

    /// Applies a function to every entry, producing a new map with the
    /// same keys and transformed values.
    ///
    /// The key set and insertion order of the result are identical to
    /// this map's. Single pass, no failure handling: the transform is
    /// infallible by signature, and a panic propagates to the caller
    /// without a partial map escaping.
    ///
    /// # Type Parameters
    ///
    /// * `W` - The type of the transformed values
    /// * `F` - The transformation function type
    ///
    /// # Arguments
    ///
    /// * `transform` - A function receiving the key and value of each
    ///   entry, returning the new value
    ///
    /// # Complexity
    ///
    /// O(n) where n is the number of entries
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// map.insert("c", 3);
    ///
    /// let scaled = map.map_values(|_, value| value * 10);
    /// assert_eq!(scaled.get("a"), Some(&10));
    /// assert_eq!(scaled.get("b"), Some(&20));
    /// assert_eq!(scaled.get("c"), Some(&30));
    /// ```
    #[must_use]
    pub fn map_values<W, F>(&self, mut transform: F) -> OrderedHashMap<K, W>
    where
        F: FnMut(&K, &V) -> W,
    {
        self.iter()
            .map(|(key, value)| (key.clone(), transform(key, value)))
            .collect()
    }

    /// Keeps only entries for which the predicate returns true.
    ///
    /// Returns a new map containing exactly the matching entries, in
    /// their original relative insertion order.
    ///
    /// # Arguments
    ///
    /// * `predicate` - A function that receives the key and value, and
    ///   returns true if the entry should be kept
    ///
    /// # Complexity
    ///
    /// O(n) where n is the number of entries
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// map.insert("c", 3);
    ///
    /// let even = map.keep_if(|_, value| value % 2 == 0);
    /// assert_eq!(even.len(), 1);
    /// assert_eq!(even.get("b"), Some(&2));
    /// ```
    #[must_use]
    pub fn keep_if<P>(&self, mut predicate: P) -> Self
    where
        V: Clone,
        P: FnMut(&K, &V) -> bool,
    {
        self.iter()
            .filter(|(key, value)| predicate(key, value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Applies a function to each entry, keeping only those that return
    /// `Some`.
    ///
    /// This combines filtering and narrowing in a single operation:
    /// returning `Some(narrowed)` keeps the entry with the narrowed
    /// value, returning `None` drops it. The result preserves the
    /// relative insertion order of the retained entries.
    ///
    /// # Type Parameters
    ///
    /// * `W` - The type of the narrowed values
    /// * `F` - The filter-map function type
    ///
    /// # Arguments
    ///
    /// * `filter_transform` - A function that receives the key and value,
    ///   and returns `Some(new_value)` to include or `None` to exclude
    ///
    /// # Complexity
    ///
    /// O(n) where n is the number of entries
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mapops::ordered::OrderedHashMap;
    ///
    /// let mut map = OrderedHashMap::new();
    /// map.insert(1, "1".to_string());
    /// map.insert(2, "abc".to_string());
    /// map.insert(3, "42".to_string());
    ///
    /// let parsed = map.filter_map(|_, value| value.parse::<i32>().ok());
    /// assert_eq!(parsed.len(), 2);
    /// assert_eq!(parsed.get(&1), Some(&1));
    /// assert_eq!(parsed.get(&3), Some(&42));
    /// ```
    #[must_use]
    pub fn filter_map<W, F>(&self, mut filter_transform: F) -> OrderedHashMap<K, W>
    where
        F: FnMut(&K, &V) -> Option<W>,
    {
        self.iter()
            .filter_map(|(key, value)| {
                filter_transform(key, value).map(|new_value| (key.clone(), new_value))
            })
            .collect()
    }

    /// Promotes Small to Large once the length exceeds the threshold.
    fn promote_if_needed(&mut self) {
        let exceeds_threshold = match &self.inner {
            OrderedHashMapInner::Small(entries) => entries.len() > SMALL_THRESHOLD,
            OrderedHashMapInner::Empty | OrderedHashMapInner::Large(_) => false,
        };
        if !exceeds_threshold {
            return;
        }
        if let OrderedHashMapInner::Small(entries) =
            std::mem::replace(&mut self.inner, OrderedHashMapInner::Empty)
        {
            let entries = entries.into_vec();
            let index: HashMap<K, usize> = entries
                .iter()
                .enumerate()
                .map(|(position, (key, _))| (key.clone(), position))
                .collect();
            debug_assert_eq!(index.len(), entries.len());
            self.inner = OrderedHashMapInner::Large(LargeEntries { entries, index });
        }
    }

    /// Demotes Large to Small (or Small to Empty) after a removal.
    fn demote_if_needed(&mut self) {
        let shrunk = match &self.inner {
            OrderedHashMapInner::Empty => false,
            OrderedHashMapInner::Small(entries) => entries.is_empty(),
            OrderedHashMapInner::Large(large) => large.entries.len() <= SMALL_THRESHOLD,
        };
        if !shrunk {
            return;
        }
        match std::mem::replace(&mut self.inner, OrderedHashMapInner::Empty) {
            OrderedHashMapInner::Empty | OrderedHashMapInner::Small(_) => {}
            OrderedHashMapInner::Large(large) => {
                if !large.entries.is_empty() {
                    self.inner =
                        OrderedHashMapInner::Small(large.entries.into_iter().collect());
                }
            }
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over references to the entries of an [`OrderedHashMap`].
pub struct OrderedHashMapIterator<'a, K, V> {
    inner: std::slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for OrderedHashMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for OrderedHashMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Owning iterator over the entries of an [`OrderedHashMap`].
pub struct OrderedHashMapIntoIterator<K, V> {
    inner: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for OrderedHashMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for OrderedHashMapIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for OrderedHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Hash + Eq, V> FromIterator<(K, V)> for OrderedHashMap<K, V> {
    /// Builds a map from key-value pairs.
    ///
    /// The first occurrence of a key fixes its position in the insertion
    /// order; a later occurrence of the same key replaces the value
    /// without moving the entry.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iterable: I) -> Self {
        let mut map = Self::new();
        map.extend(iterable);
        map
    }
}

impl<K: Clone + Hash + Eq, V> Extend<(K, V)> for OrderedHashMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iterable: I) {
        for (key, value) in iterable {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for OrderedHashMap<K, V> {
    type Item = (K, V);
    type IntoIter = OrderedHashMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        OrderedHashMapIntoIterator {
            inner: self.into_entries().into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedHashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = OrderedHashMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Entry-wise equality, insensitive to insertion order.
///
/// Two maps compare equal when they contain the same key-value pairs,
/// regardless of the order the keys were inserted. Use
/// `iter().eq(other.iter())` for an order-sensitive comparison.
impl<K: Hash + Eq, V: PartialEq> PartialEq for OrderedHashMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Hash + Eq, V: Eq> Eq for OrderedHashMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedHashMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for OrderedHashMap<K, V> {
    /// Renders the map as `{key: value, ...}` in insertion order.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        for (position, (key, value)) in self.entries_slice().iter().enumerate() {
            if position > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

static_assertions::assert_impl_all!(OrderedHashMap<String, i32>: Clone, Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for OrderedHashMap<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct OrderedHashMapVisitor<K, V> {
    key_marker: std::marker::PhantomData<K>,
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<K, V> OrderedHashMapVisitor<K, V> {
    const fn new() -> Self {
        Self {
            key_marker: std::marker::PhantomData,
            value_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for OrderedHashMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de>,
{
    type Value = OrderedHashMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = access
            .size_hint()
            .map_or_else(OrderedHashMap::new, OrderedHashMap::with_capacity);
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for OrderedHashMap<K, V>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(OrderedHashMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[rstest]
    fn test_display_empty_map() {
        let map: OrderedHashMap<i32, String> = OrderedHashMap::new();
        assert_eq!(format!("{map}"), "{}");
    }

    #[rstest]
    fn test_display_single_entry_map() {
        let map = OrderedHashMap::singleton(1, "one".to_string());
        assert_eq!(format!("{map}"), "{1: one}");
    }

    #[rstest]
    fn test_display_follows_insertion_order() {
        let mut map = OrderedHashMap::new();
        map.insert(3, "three".to_string());
        map.insert(1, "one".to_string());
        map.insert(2, "two".to_string());
        assert_eq!(format!("{map}"), "{3: three, 1: one, 2: two}");
    }

    // =========================================================================
    // State Transition Tests
    // =========================================================================

    #[rstest]
    fn test_small_state_up_to_threshold() {
        let mut map = OrderedHashMap::new();
        for n in 0..SMALL_THRESHOLD {
            map.insert(n, n * 10);
        }
        assert!(map.is_small_state());
        assert_eq!(map.len(), SMALL_THRESHOLD);
    }

    #[rstest]
    fn test_promotes_to_large_above_threshold() {
        let mut map = OrderedHashMap::new();
        for n in 0..=SMALL_THRESHOLD {
            map.insert(n, n * 10);
        }
        assert!(map.is_large_state());
        assert_eq!(map.len(), SMALL_THRESHOLD + 1);
    }

    #[rstest]
    fn test_promotion_preserves_order_and_lookups() {
        let mut map = OrderedHashMap::new();
        for n in 0..20 {
            map.insert(n, n * 10);
        }
        let keys: Vec<usize> = map.keys().copied().collect();
        assert_eq!(keys, (0..20).collect::<Vec<_>>());
        for n in 0..20 {
            assert_eq!(map.get(&n), Some(&(n * 10)));
        }
    }

    #[rstest]
    fn test_value_update_does_not_promote() {
        let mut map = OrderedHashMap::new();
        for n in 0..SMALL_THRESHOLD {
            map.insert(n, n);
        }
        // Overwriting an existing key adds no entry
        map.insert(0, 99);
        assert!(map.is_small_state());
        assert_eq!(map.get(&0), Some(&99));
    }

    #[rstest]
    fn test_demotes_to_small_at_threshold() {
        let mut map = OrderedHashMap::new();
        for n in 0..=SMALL_THRESHOLD {
            map.insert(n, n);
        }
        assert!(map.is_large_state());
        map.remove(&0);
        assert!(map.is_small_state());
        assert_eq!(map.len(), SMALL_THRESHOLD);
    }

    #[rstest]
    fn test_demotion_preserves_order() {
        let mut map = OrderedHashMap::new();
        for n in 0..=SMALL_THRESHOLD {
            map.insert(n, n);
        }
        map.remove(&4);
        let keys: Vec<usize> = map.keys().copied().collect();
        assert_eq!(keys, vec![0, 1, 2, 3, 5, 6, 7, 8]);
    }

    #[rstest]
    fn test_large_state_removal_keeps_index_consistent() {
        let mut map = OrderedHashMap::new();
        for n in 0..20 {
            map.insert(n, n * 10);
        }
        map.remove(&5);
        assert!(map.is_large_state());
        for n in (0..20).filter(|n| *n != 5) {
            assert_eq!(map.get(&n), Some(&(n * 10)));
        }
        let keys: Vec<usize> = map.keys().copied().collect();
        assert_eq!(keys, (0..20).filter(|n| *n != 5).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_with_capacity_above_threshold_starts_large() {
        let mut map: OrderedHashMap<i32, i32> = OrderedHashMap::with_capacity(100);
        assert!(map.is_empty());
        map.insert(1, 1);
        assert!(map.is_large_state());
    }

    // =========================================================================
    // Positional Accessor Tests
    // =========================================================================

    #[rstest]
    fn test_position_of_matches_insertion_order() {
        let mut map = OrderedHashMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.position_of("a"), Some(0));
        assert_eq!(map.position_of("b"), Some(1));
        assert_eq!(map.position_of("c"), None);
    }

    #[rstest]
    fn test_value_at_mut_out_of_bounds_is_none() {
        let mut map: OrderedHashMap<&str, i32> = OrderedHashMap::new();
        assert!(map.value_at_mut(0).is_none());
        map.insert("a", 1);
        assert!(map.value_at_mut(1).is_none());
    }
}
