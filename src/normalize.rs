use std::hash::Hash;

/// Defines key identity for a [`HashNormalizedMap`](crate::HashNormalizedMap).
///
/// Two keys are considered the same entry exactly when their normalized forms compare equal.
/// `normalize` must be deterministic for the lifetime of the map: calling it twice on equal keys
/// has to yield equal results, otherwise lookups silently miss.
///
/// Any `Fn(&K) -> H` closure or function item is a normalizer, so most specializations never
/// need to implement this trait by hand:
///
/// ```
/// use hash_normalized_map::HashNormalizedMap;
///
/// let mut m = HashNormalizedMap::with_normalizer(|k: &String| k.trim().to_owned());
/// m.insert("  a ".to_string(), 1);
/// assert_eq!(m.get(&"a".to_string()), Ok(&1));
/// ```
pub trait KeyNormalizer<K: ?Sized> {
    type Normalized: Eq + Hash;

    fn normalize(&self, key: &K) -> Self::Normalized;
}

impl<K: ?Sized, H: Eq + Hash, F: Fn(&K) -> H> KeyNormalizer<K> for F {
    type Normalized = H;

    fn normalize(&self, key: &K) -> H {
        self(key)
    }
}

/// Keys keep their native equality. The map then behaves like a plain insertion-ordered map,
/// except that reassigning a key moves it to the end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Identity;

impl<K: Clone + Eq + Hash> KeyNormalizer<K> for Identity {
    type Normalized = K;

    fn normalize(&self, key: &K) -> K {
        key.clone()
    }
}

/// Unicode case-insensitive string keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaseInsensitive;

impl<K: AsRef<str> + ?Sized> KeyNormalizer<K> for CaseInsensitive {
    type Normalized = String;

    fn normalize(&self, key: &K) -> String {
        key.as_ref().to_lowercase()
    }
}

/// ASCII case-insensitive string keys; non-ASCII characters compare exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AsciiCaseInsensitive;

impl<K: AsRef<str> + ?Sized> KeyNormalizer<K> for AsciiCaseInsensitive {
    type Normalized = String;

    fn normalize(&self, key: &K) -> String {
        key.as_ref().to_ascii_lowercase()
    }
}
