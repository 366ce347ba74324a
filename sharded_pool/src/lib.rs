//! Shard resolution and request routing over a fixed set of database pools.
//!
//! A [`ShardedPool`] sits in front of N otherwise independent [`Pool`]
//! implementations, one per shard. Every call carries a [`ShardContext`] from
//! which the target shard is resolved:
//!
//! ```text
//!                    ┌──────────────┐
//!                    │    Caller    │
//!                    └──────────────┘
//!                            │  ShardContext
//!                            ▼
//!   ┌────────┐      ┌──────────────────┐
//!   │ Picker │◀ ─ ─ │   ShardedPool    │
//!   └────────┘ key  └──────────────────┘
//!                            │  shard index
//!            ┌───────────────┼───────────────┐
//!            ▼               ▼               ▼
//!     ┌────────────┐  ┌────────────┐  ┌────────────┐
//!     │  Pool [0]  │  │  Pool [1]  │  │  Pool [N]  │
//!     └────────────┘  └────────────┘  └────────────┘
//! ```
//!
//! An explicit [`ShardIndex`] in the context always wins; otherwise the
//! sharding key is mapped to an index by the configured [`Picker`]. The
//! resolved index is bounds checked before the call, with its arguments
//! unchanged, is forwarded to the selected pool.
//!
//! A [`ShardedPool`] is assembled and validated by a [`Builder`], and is
//! immutable once built. It implements [`Pool`] itself, so it can be used
//! anywhere a single pool is expected.
//!
//! [`InstrumentationDecorator`] wraps any [`Pool`] to record call latencies.
//!
//! [`ShardContext`]: sharder::ShardContext
//! [`ShardIndex`]: sharder::ShardIndex
//! [`Picker`]: sharder::Picker

mod builder;
pub use builder::*;

mod error;
pub use error::*;

mod instrumentation;
pub use instrumentation::*;

mod pool;
pub use pool::*;

mod row;
pub use row::*;

mod sharded;
pub use sharded::*;

#[cfg(test)]
mod mock;
