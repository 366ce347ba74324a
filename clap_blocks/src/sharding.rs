//! CLI config for shard resolution.

use std::sync::Arc;

use sharded_pool::Builder;
use sharder::{JumpHash, Picker, RoundRobin};

/// The [`Picker`] used to map sharding keys to shard indices.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PickerKind {
    /// Consistent jump hashing over the sharding key.
    #[default]
    JumpHash,

    /// Ignore the key and cycle through the shards.
    RoundRobin,
}

/// CLI config for routing requests over a fixed set of shards.
#[derive(Debug, Clone, clap::Parser)]
#[allow(missing_copy_implementations)]
pub struct ShardingConfig {
    /// The number of shards (and database pools) requests are routed over.
    #[clap(
        long = "shard-count",
        env = "SHARDED_POOL_SHARD_COUNT",
        value_parser = clap::value_parser!(u8).range(1..),
        action
    )]
    pub shard_count: u8,

    /// How sharding keys are mapped to shards.
    #[clap(
        value_enum,
        long = "shard-picker",
        env = "SHARDED_POOL_SHARD_PICKER",
        default_value = "jump-hash",
        action
    )]
    pub picker: PickerKind,

    /// Key for the jump-hash picker, as 32 hex digits.
    ///
    /// Every process routing over the same shards must use the same key.
    /// Ignored by other pickers.
    #[clap(
        long = "shard-seed-key",
        env = "SHARDED_POOL_SHARD_SEED_KEY",
        value_parser = parse_seed_key,
        action
    )]
    pub seed_key: Option<[u8; 16]>,
}

impl ShardingConfig {
    /// Build the configured [`Picker`].
    ///
    /// Returns [`None`] if `shard_count` is 0, which has no valid picker.
    pub fn picker(&self) -> Option<Arc<dyn Picker>> {
        if self.shard_count == 0 {
            return None;
        }

        let picker: Arc<dyn Picker> = match self.picker {
            PickerKind::JumpHash => match &self.seed_key {
                Some(key) => Arc::new(JumpHash::new(self.shard_count).with_seed_key(key)),
                None => Arc::new(JumpHash::new(self.shard_count)),
            },
            PickerKind::RoundRobin => Arc::new(RoundRobin::new(self.shard_count)),
        };

        Some(picker)
    }

    /// A [`Builder`] sized and configured with the [`Picker`] from this
    /// config. The caller assigns the shard pools.
    pub fn builder<P>(&self) -> Builder<P> {
        let builder = Builder::new(self.shard_count);
        match self.picker() {
            Some(picker) => builder.shard_picker(picker),
            None => builder,
        }
    }
}

fn parse_seed_key(s: &str) -> Result<[u8; 16], Box<dyn std::error::Error + Send + Sync + 'static>> {
    let bytes = hex::decode(s)?;
    let key = <[u8; 16]>::try_from(bytes.as_slice())
        .map_err(|_| format!("seed key must be 16 bytes, got {}", bytes.len()))?;
    Ok(key)
}
