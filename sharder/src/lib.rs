//! Shard index resolution primitives.
//!
//! A call destined for a sharded set of pools carries a [`ShardContext`]
//! describing where it should be routed: either an explicit [`ShardIndex`],
//! or a sharding key that a [`Picker`] maps to a [`ShardIndex`].
//!
//! Two stock [`Picker`] implementations are provided:
//!
//!   * [`JumpHash`]: consistently maps a key to the same shard, with near
//!     perfect distribution.
//!   * [`RoundRobin`]: ignores the key and spreads calls uniformly across all
//!     shards.
//!
//! Any `Fn(&ShardContext, &str) -> ShardIndex` closure is also a [`Picker`].

mod context;
pub use context::*;

mod index;
pub use index::*;

mod picker;
pub use picker::*;

mod jumphash;
pub use jumphash::*;

mod round_robin;
pub use round_robin::*;
