use derive_where::derive_where;
use index_list::{Index, IndexList};
use std::collections::HashMap;
use std::fmt;
use std::ops;

mod auto_key;
mod entry;
mod error;
mod normalize;

pub use auto_key::AutoKey;
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use error::{Error, Result};
pub use normalize::{AsciiCaseInsensitive, CaseInsensitive, Identity, KeyNormalizer};

use entry::{slot, slot_mut};

type Normalized<K, N> = <N as KeyNormalizer<K>>::Normalized;

/// An insertion‑ordered map whose key identity is decided by a [`KeyNormalizer`] rather than by
/// the key's own equality.
///
/// Two keys that normalize to the same value address the same entry. The map stores and reports
/// the original key that was most recently assigned to that entry, so a case-insensitive map
/// queried with `"foo"` still iterates the `"FOO"` it was given.
///
/// Assigning a key whose normalized form is already present replaces the whole entry: the old
/// key and value are dropped from the map (and handed back to the caller) and the new pair is
/// appended at the end of the iteration order.
///
/// Internally the structure keeps a `HashMap<N::Normalized, Index>` which maps each normalized key
/// to a node of an `IndexList<(K, V)>`. The list is an arena-backed doubly‑linked list, so
/// removal from the middle unlinks a node in O(1) without shifting the other entries. `insert`,
/// `get`, `contains_key` and `remove` are O(1) on average plus the cost of one normalization.
///
/// Debug assertions check that the index and the list always have the same length, and that the
/// key stored in each node normalizes to the index entry referencing it.
///
/// ```
/// use hash_normalized_map::{CaseInsensitive, HashNormalizedMap};
///
/// let mut m = HashNormalizedMap::<String, i32, _>::with_normalizer(CaseInsensitive);
/// m.insert("Foo".to_string(), 1);
/// m.insert("FOO".to_string(), 2);
/// assert_eq!(m.len(), 1);
/// assert_eq!(m.get("foo"), Ok(&2));
/// assert_eq!(m.keys().collect::<Vec<_>>(), [&"FOO".to_string()]);
/// ```
#[derive_where(Default; N)]
pub struct HashNormalizedMap<K, V, N: KeyNormalizer<K>> {
    index: HashMap<N::Normalized, Index>,
    order: IndexList<(K, V)>,
    normalizer: N,
    next_position: usize,
}

impl<K, V, N: KeyNormalizer<K> + Default> HashNormalizedMap<K, V, N> {
    pub fn new() -> Self {
        Self::with_normalizer(N::default())
    }
}

impl<K, V, N: KeyNormalizer<K>> HashNormalizedMap<K, V, N> {
    pub fn with_normalizer(normalizer: N) -> Self {
        Self::with_capacity_and_normalizer(0, normalizer)
    }

    /// Preallocates room in the normalized-key index for `capacity` entries.
    pub fn with_capacity_and_normalizer(capacity: usize, normalizer: N) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            order: IndexList::new(),
            normalizer,
            next_position: 0,
        }
    }

    /// Builds a map from `entries`, inserted in order with the usual replacement rule: a later
    /// pair whose key normalizes like an earlier one wins and takes the later position.
    pub fn from_entries<I: IntoIterator<Item = (K, V)>>(normalizer: N, entries: I) -> Self {
        let mut map = Self::with_normalizer(normalizer);
        map.extend(entries);
        map
    }

    pub fn normalizer(&self) -> &N {
        &self.normalizer
    }

    pub fn len(&self) -> usize {
        let Self { index, order, .. } = self;
        debug_assert_eq!(index.len(), order.len());
        order.len()
    }

    pub fn is_empty(&self) -> bool {
        let Self { index, order, .. } = self;
        debug_assert_eq!(index.is_empty(), order.is_empty());
        order.is_empty()
    }

    /// Assigns `value` to `key`.
    /// - If no stored key normalizes like `key`: appends to the end; returns `None`.
    /// - Otherwise: removes the old entry, appends `(key, value)` to the end and returns the
    ///   displaced `(old_key, old_value)`.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.insert_full(key, value).1
    }

    fn insert_full(&mut self, key: K, value: V) -> (Index, Option<(K, V)>) {
        match self.entry(key) {
            Entry::Occupied(occupied_entry) => {
                let (idx, old) = occupied_entry.replace(value);
                log::trace!("replaced an entry with a colliding key; len={}", self.order.len());
                (idx, Some(old))
            }
            Entry::Vacant(vacant_entry) => {
                let (_, idx) = vacant_entry.append(value);
                (idx, None)
            }
        }
    }

    /// Appends `value` under a synthesized positional key and returns that key.
    ///
    /// Positions come from a per-map counter that starts at 0, only ever increases and is not
    /// affected by explicitly inserted keys: after `insert(5, ..)` on an empty map the first
    /// push still yields `0`, not `6`. A position whose key already normalizes to a stored entry
    /// is skipped, so pushing never displaces an entry unless the normalizer maps every candidate
    /// onto an occupied slot.
    pub fn push(&mut self, value: V) -> &K
    where
        K: AutoKey,
    {
        let mut key = self.next_auto_key();
        for _ in 0..self.len() {
            if !self.index.contains_key(&self.normalize(&key)) {
                break;
            }
            log::trace!("synthesized key is taken; position={}", self.next_position - 1);
            key = self.next_auto_key();
        }
        let (idx, _) = self.insert_full(key, value);
        &slot(&self.order, idx).0
    }

    fn next_auto_key(&mut self) -> K
    where
        K: AutoKey,
    {
        let key = K::from_position(self.next_position);
        self.next_position += 1;
        key
    }

    /// Gets the slot for `key`'s normalized form, for in-place manipulation.
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, N::Normalized> {
        let hash = self.normalize(&key);
        let Self { index, order, .. } = self;
        Entry::new(index.entry(hash), order, key)
    }

    /// Returns the value whose key normalizes like `key`.
    ///
    /// `key` may be any form the normalizer also accepts with the same normalized type, e.g.
    /// `&str` for a `String`-keyed [`CaseInsensitive`] map.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Result<&V>
    where
        N: KeyNormalizer<Q, Normalized = Normalized<K, N>>,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Like [`get`](Self::get), also reporting the original key of record.
    pub fn get_key_value<Q: ?Sized>(&self, key: &Q) -> Result<(&K, &V)>
    where
        N: KeyNormalizer<Q, Normalized = Normalized<K, N>>,
    {
        let idx = self.find(key)?;
        let (k, v) = slot(&self.order, idx);
        debug_assert!(self.index.get(&self.normalize(k)) == Some(&idx));
        Ok((k, v))
    }

    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Result<&mut V>
    where
        N: KeyNormalizer<Q, Normalized = Normalized<K, N>>,
    {
        let idx = self.find(key)?;
        Ok(&mut slot_mut(&mut self.order, idx).1)
    }

    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
    where
        N: KeyNormalizer<Q, Normalized = Normalized<K, N>>,
    {
        self.find(key).is_ok()
    }

    /// Removes the entry whose key normalizes like `key` and returns its value, in O(1).
    /// Fails with [`Error::KeyNotFound`] if there is none.
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Result<V>
    where
        N: KeyNormalizer<Q, Normalized = Normalized<K, N>>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q: ?Sized>(&mut self, key: &Q) -> Result<(K, V)>
    where
        N: KeyNormalizer<Q, Normalized = Normalized<K, N>>,
    {
        let hash = <N as KeyNormalizer<Q>>::normalize(&self.normalizer, key);
        let Self { index, order, .. } = self;
        let idx = index.remove(&hash).ok_or(Error::KeyNotFound)?;
        let removed = order.remove(idx).expect("index points at a removed slot");
        log::trace!("removed entry; len={}", order.len());
        Ok(removed)
    }

    pub fn clear(&mut self) {
        let Self { index, order, .. } = self;
        index.clear();
        order.clear();
    }

    /// Iterator over (&K, &V) in insertion order, reporting original keys.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            order: &self.order,
            next: self.order.first_index(),
            remaining: self.order.len(),
        }
    }

    /// Returns an iterator over original keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// Returns an iterator over values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    fn normalize(&self, key: &K) -> N::Normalized {
        self.normalizer.normalize(key)
    }

    fn find<Q: ?Sized>(&self, key: &Q) -> Result<Index>
    where
        N: KeyNormalizer<Q, Normalized = Normalized<K, N>>,
    {
        let hash = <N as KeyNormalizer<Q>>::normalize(&self.normalizer, key);
        self.index.get(&hash).copied().ok_or(Error::KeyNotFound)
    }
}

impl<K, V, N> Clone for HashNormalizedMap<K, V, N>
where
    K: Clone,
    V: Clone,
    N: KeyNormalizer<K> + Clone,
{
    /// Rebuilds the index and the list from the current entries, in order.
    fn clone(&self) -> Self {
        let mut map = Self::with_capacity_and_normalizer(self.len(), self.normalizer.clone());
        map.extend(self.iter().map(|(k, v)| (k.clone(), v.clone())));
        map.next_position = self.next_position;
        map
    }
}

/// Iterator over the entries of a [`HashNormalizedMap`] in insertion order.
pub struct Iter<'a, K, V> {
    order: &'a IndexList<(K, V)>,
    next: Index,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (k, v) = self.order.get(self.next)?;
        self.next = self.order.next_index(self.next);
        self.remaining -= 1;
        Some((k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, N: KeyNormalizer<K>> IntoIterator for &'a HashNormalizedMap<K, V, N> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, N: KeyNormalizer<K>> Extend<(K, V)> for HashNormalizedMap<K, V, N> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, N: KeyNormalizer<K> + Default> FromIterator<(K, V)> for HashNormalizedMap<K, V, N> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(N::default(), iter)
    }
}

/// Panics with [`Error::KeyNotFound`]'s message if no key normalizes like `key`.
impl<K, V, N, Q> ops::Index<&Q> for HashNormalizedMap<K, V, N>
where
    Q: ?Sized,
    N: KeyNormalizer<K> + KeyNormalizer<Q, Normalized = Normalized<K, N>>,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<K, V, N> fmt::Debug for HashNormalizedMap<K, V, N>
where
    K: fmt::Debug,
    V: fmt::Debug,
    N: KeyNormalizer<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
