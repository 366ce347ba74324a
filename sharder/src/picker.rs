use crate::{ShardContext, ShardIndex};

/// A strategy mapping a sharding key to a [`ShardIndex`].
///
/// Implementations must not fail. A key that cannot be mapped should produce an
/// index outside of the configured shard range, which the caller is expected to
/// reject.
///
/// Routing a given key consistently to the same shard requires a deterministic
/// implementation; [`RoundRobin`](crate::RoundRobin) is an example of a picker
/// that is not.
pub trait Picker: Send + Sync {
    /// Map `key` to a [`ShardIndex`].
    ///
    /// `ctx` is the context of the call being routed.
    fn pick(&self, ctx: &ShardContext, key: &str) -> ShardIndex;
}

impl<F> Picker for F
where
    F: Fn(&ShardContext, &str) -> ShardIndex + Send + Sync,
{
    fn pick(&self, ctx: &ShardContext, key: &str) -> ShardIndex {
        (self)(ctx, key)
    }
}
