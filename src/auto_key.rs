/// Keys that [`HashNormalizedMap::push`](crate::HashNormalizedMap::push) can synthesize from a
/// positional index.
///
/// The position is the map's own push counter; keys inserted explicitly do not advance it.
pub trait AutoKey {
    fn from_position(position: usize) -> Self;
}

macro_rules! impl_auto_key {
    ($($t:ty),*) => {
        $(
            impl AutoKey for $t {
                fn from_position(position: usize) -> Self {
                    position as $t
                }
            }
        )*
    };
}

impl_auto_key!(usize, u64, u128, i64, i128);

/// Decimal rendering, so `"3"` is the key pushed at position 3.
impl AutoKey for String {
    fn from_position(position: usize) -> Self {
        position.to_string()
    }
}
