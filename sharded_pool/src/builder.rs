use std::{fmt::Debug, sync::Arc};

use hashbrown::HashMap;
use observability_deps::tracing::*;
use sharder::{Picker, ShardIndex};

use crate::{BuildError, ShardedPool};

/// Assemble and validate a [`ShardedPool`].
///
/// The pool size is fixed when the [`Builder`] is constructed. Pools are
/// assigned to indices with [`Builder::shard()`] in any order; assigning a pool
/// to an index that already has one replaces it.
///
/// ```
/// # use std::sync::Arc;
/// # use sharded_pool::Builder;
/// # use sharder::JumpHash;
/// let sharded = Builder::new(2)
///     .shard_picker(Arc::new(JumpHash::new(2)))
///     .shard(1u8, Arc::new("pool-b"))
///     .shard(0u8, Arc::new("pool-a"))
///     .build()
///     .expect("all shards assigned");
///
/// assert_eq!(sharded.shard_count(), 2);
/// ```
pub struct Builder<P> {
    size: u8,
    shards: HashMap<ShardIndex, Arc<P>>,
    picker: Option<Arc<dyn Picker>>,
}

impl<P> Debug for Builder<P>
where
    P: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("size", &self.size)
            .field("shards", &self.shards)
            .field("picker", &self.picker.is_some())
            .finish()
    }
}

impl<P> Builder<P> {
    /// Initialise a [`Builder`] for a [`ShardedPool`] of `pool_size` shards.
    pub fn new(pool_size: u8) -> Self {
        Self {
            size: pool_size,
            shards: HashMap::with_capacity(usize::from(pool_size)),
            picker: None,
        }
    }

    /// Map sharding keys to shards with `picker`.
    pub fn shard_picker(self, picker: Arc<dyn Picker>) -> Self {
        Self {
            picker: Some(picker),
            ..self
        }
    }

    /// Serve shard `index` with `pool`.
    pub fn shard(mut self, index: impl Into<ShardIndex>, pool: Arc<P>) -> Self {
        self.shards.insert(index.into(), pool);
        self
    }

    /// Validate the configuration and build the [`ShardedPool`].
    ///
    /// Validation checks, in order, that the pool size is non-zero, that a
    /// picker is set, and that every index in `[0, pool_size)` has a pool. Only
    /// the lowest unassigned index is reported.
    ///
    /// Pools assigned at indices beyond the pool size are dropped.
    pub fn build(self) -> Result<ShardedPool<P>, BuildError> {
        if self.size == 0 {
            return Err(BuildError::InvalidPoolSize);
        }

        let picker = self.picker.ok_or(BuildError::MissingPicker)?;

        let mut shards = self.shards;
        let ordered = (0..self.size)
            .map(ShardIndex::new)
            .map(|index| shards.remove(&index).ok_or(BuildError::MissingShard(index)))
            .collect::<Result<Vec<_>, _>>()?;

        for index in shards.keys() {
            warn!(
                shard_index = %index,
                pool_size = self.size,
                "ignoring shard assigned beyond the configured pool size"
            );
        }

        debug!(shard_count = ordered.len(), "built sharded pool");

        Ok(ShardedPool::new(ordered, picker))
    }
}
