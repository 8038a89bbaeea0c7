use index_list::{Index, IndexList};
use std::collections::hash_map::{
    Entry as StdEntry, OccupiedEntry as StdOccupiedEntry, VacantEntry as StdVacantEntry,
};

/// A view into a single normalized slot of a [`HashNormalizedMap`](crate::HashNormalizedMap),
/// obtained from [`entry`](crate::HashNormalizedMap::entry).
///
/// The entry remembers the key it was probed with. That key may differ from the stored one while
/// still normalizing to the same value.
pub enum Entry<'a, K, V, H> {
    Occupied(OccupiedEntry<'a, K, V, H>),
    Vacant(VacantEntry<'a, K, V, H>),
}

pub struct OccupiedEntry<'a, K, V, H> {
    entry: StdOccupiedEntry<'a, H, Index>,
    order: &'a mut IndexList<(K, V)>,
    key: K,
}

pub struct VacantEntry<'a, K, V, H> {
    entry: StdVacantEntry<'a, H, Index>,
    order: &'a mut IndexList<(K, V)>,
    key: K,
}

pub(crate) fn slot<K, V>(order: &IndexList<(K, V)>, idx: Index) -> &(K, V) {
    order.get(idx).expect("index points at a removed slot")
}

pub(crate) fn slot_mut<K, V>(order: &mut IndexList<(K, V)>, idx: Index) -> &mut (K, V) {
    order.get_mut(idx).expect("index points at a removed slot")
}

impl<'a, K, V, H> Entry<'a, K, V, H> {
    pub(crate) fn new(
        entry: StdEntry<'a, H, Index>,
        order: &'a mut IndexList<(K, V)>,
        key: K,
    ) -> Self {
        match entry {
            StdEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry, order, key }),
            StdEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, order, key }),
        }
    }

    /// The key this entry was probed with.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(occ) => occ.probe_key(),
            Entry::Vacant(vac) => vac.key(),
        }
    }

    /// Returns the stored value, inserting `default` under the probe key if the slot is vacant.
    /// An occupied slot keeps its original key.
    pub fn or_insert(self, default: V) -> &'a mut V {
        self.or_insert_with(|| default)
    }

    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(occ) => occ.into_mut(),
            Entry::Vacant(vac) => vac.insert(default()),
        }
    }

    pub fn or_insert_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
}

impl<'a, K, V, H> OccupiedEntry<'a, K, V, H> {
    /// The original key of record, i.e. the most recently assigned key for this slot.
    pub fn key(&self) -> &K {
        let Self { entry, order, .. } = self;
        &slot(order, *entry.get()).0
    }

    pub fn probe_key(&self) -> &K {
        &self.key
    }

    pub fn get(&self) -> &V {
        let Self { entry, order, .. } = self;
        &slot(order, *entry.get()).1
    }

    pub fn get_mut(&mut self) -> &mut V {
        let Self { entry, order, .. } = self;
        &mut slot_mut(order, *entry.get()).1
    }

    pub fn into_mut(self) -> &'a mut V {
        let Self { entry, order, .. } = self;
        &mut slot_mut(order, *entry.get()).1
    }

    /// Replaces both key and value with the probe key and `value`, moving the entry to the end of
    /// the iteration order. Returns the displaced pair.
    pub fn insert(self, value: V) -> (K, V) {
        self.replace(value).1
    }

    pub(crate) fn replace(self, value: V) -> (Index, (K, V)) {
        let Self { mut entry, order, key } = self;
        let old = order.remove(*entry.get()).expect("index points at a removed slot");
        let idx = order.insert_last((key, value));
        *entry.get_mut() = idx;
        (idx, old)
    }

    pub fn remove_entry(self) -> (K, V) {
        let Self { entry, order, .. } = self;
        let idx = entry.remove();
        order.remove(idx).expect("index points at a removed slot")
    }

    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}

impl<'a, K, V, H> VacantEntry<'a, K, V, H> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn into_key(self) -> K {
        self.key
    }

    /// Insert a new entry into the map appended to the end.
    pub fn insert(self, value: V) -> &'a mut V {
        let (order, idx) = self.append(value);
        &mut slot_mut(order, idx).1
    }

    pub(crate) fn append(self, value: V) -> (&'a mut IndexList<(K, V)>, Index) {
        let Self { entry, order, key } = self;
        let idx = order.insert_last((key, value));
        entry.insert(idx);
        (order, idx)
    }
}
