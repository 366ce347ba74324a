use sharder::ShardIndex;
use thiserror::Error;

/// Errors resolving the target shard of a single call.
///
/// The error type of a [`Pool`](crate::Pool) wrapped by a
/// [`ShardedPool`](crate::ShardedPool) must be constructable from a
/// [`RouteError`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    /// The call context contains neither a shard index nor a sharding key.
    #[error("could not get shard index or sharding key from context")]
    UnresolvedShard,

    /// The resolved shard index does not identify a configured shard.
    #[error("shard index {index} out of range for {shard_count} configured shards")]
    ShardIndexOutOfRange {
        /// The resolved index.
        index: ShardIndex,
        /// The number of configured shards.
        shard_count: usize,
    },
}

/// Errors building a [`ShardedPool`](crate::ShardedPool) from a
/// [`Builder`](crate::Builder).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// The builder was configured with zero shards.
    #[error("shards pool size must be greater than zero")]
    InvalidPoolSize,

    /// No picker was provided.
    #[error("no shard picker provided")]
    MissingPicker,

    /// No pool was assigned to the given index. Only the lowest missing index
    /// is reported.
    #[error("shard not found for key {0}")]
    MissingShard(ShardIndex),
}
