use std::sync::Arc;

use crate::ShardIndex;

/// Routing information carried alongside a single call.
///
/// A [`ShardContext`] may hold an explicit [`ShardIndex`], a sharding key, both
/// or neither. When both are present the explicit index takes precedence and
/// the key is never consulted.
///
/// The context is passed by reference through the router and handed, unchanged,
/// to the pool the call is dispatched to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardContext {
    shard_index: Option<ShardIndex>,
    sharding_key: Option<Arc<str>>,
}

impl ShardContext {
    /// Construct an empty [`ShardContext`] carrying no routing information.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route the call to the shard at `index`, bypassing the picker.
    pub fn with_shard_index(self, index: impl Into<ShardIndex>) -> Self {
        Self {
            shard_index: Some(index.into()),
            ..self
        }
    }

    /// Route the call to the shard the picker maps `key` to.
    pub fn with_sharding_key(self, key: impl Into<Arc<str>>) -> Self {
        Self {
            sharding_key: Some(key.into()),
            ..self
        }
    }

    /// The explicit shard index, if any.
    pub fn shard_index(&self) -> Option<ShardIndex> {
        self.shard_index
    }

    /// The sharding key, if any.
    pub fn sharding_key(&self) -> Option<&str> {
        self.sharding_key.as_deref()
    }
}
