use std::cell::RefCell;

use crate::{Picker, ShardContext, ShardIndex};

thread_local! {
    /// A per-thread counter incremented once per call to
    /// [`RoundRobin::next()`].
    static COUNTER: RefCell<usize>  = const { RefCell::new(0) };
}

/// A round-robin picker (with no data locality) that arbitrarily maps calls to
/// a shard with an approximately uniform distribution.
///
/// The sharding key is ignored, so two calls with the same key are not routed
/// to the same shard.
///
/// # Distribution
///
/// Requests are distributed uniformly across all shards **per thread**. Given
/// enough requests (where `N` is significantly larger than the number of
/// threads) an approximately uniform distribution is achieved.
#[derive(Debug, Clone, Copy)]
pub struct RoundRobin {
    shard_count: u8,
}

impl RoundRobin {
    /// Construct a new [`RoundRobin`] picker that maps requests to each of
    /// `shard_count` shards.
    ///
    /// # Panics
    ///
    /// This constructor panics if `shard_count` is 0.
    pub fn new(shard_count: u8) -> Self {
        assert!(shard_count > 0, "empty shard set given to sharder");
        Self { shard_count }
    }

    /// Return the next [`ShardIndex`] to be used.
    pub fn next(&self) -> ShardIndex {
        // Grab and increment the current counter.
        let counter = COUNTER.with(|cell| {
            let mut cell = cell.borrow_mut();
            let new_value = cell.wrapping_add(1);
            *cell = new_value;
            new_value
        });

        // Reduce it to the range of [0, N) where N is the number of shards in
        // this picker.
        ShardIndex::new((counter % usize::from(self.shard_count)) as u8)
    }
}

impl Picker for RoundRobin {
    fn pick(&self, _ctx: &ShardContext, _key: &str) -> ShardIndex {
        self.next()
    }
}
