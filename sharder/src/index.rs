use std::fmt::Display;

/// The position of a shard within an ordered set of shards.
///
/// At most 256 shards are addressable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ShardIndex(u8);

impl ShardIndex {
    /// The largest addressable [`ShardIndex`].
    pub const MAX: Self = Self(u8::MAX);

    pub const fn new(v: u8) -> Self {
        Self(v)
    }

    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Return this index as a `usize`, suitable for slice lookups.
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl From<u8> for ShardIndex {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<ShardIndex> for u8 {
    fn from(value: ShardIndex) -> Self {
        value.0
    }
}

impl Display for ShardIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
