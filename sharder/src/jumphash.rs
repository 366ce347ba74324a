use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher13;

use crate::{Picker, ShardContext, ShardIndex};

/// A [`JumpHash`] maps sharding keys consistently to the same [`ShardIndex`]
/// with near perfect distribution.
///
/// Different instances of a [`JumpHash`] using the same seed key and the same
/// shard count will always map the same input key to the same shard.
///
/// This type uses `O(1)` memory and `O(ln N)` lookup for `N` shards, utilising
/// Google's [jump hash] internally. Adding 1 additional shard causes
/// approximately `1/N` keys to be remapped, and every remapped key moves to the
/// new shard.
///
/// [jump hash]: https://arxiv.org/ftp/arxiv/papers/1406/1406.2294.pdf
#[derive(Debug, Clone, Copy)]
pub struct JumpHash {
    hasher: SipHasher13,
    shard_count: u8,
}

impl JumpHash {
    /// Initialise a [`JumpHash`] that consistently maps keys to one of
    /// `shard_count` shards, in the range `[0, shard_count)`.
    ///
    /// # Correctness
    ///
    /// Changing the shard count between two instances changes the mapping
    /// produced.
    ///
    /// # Panics
    ///
    /// This constructor panics if `shard_count` is 0.
    pub fn new(shard_count: u8) -> Self {
        // A randomly generated static siphash key to ensure all instances hash
        // the same input to the same u64 sharding key.
        //
        // Generated with: xxd -i -l 16 /dev/urandom
        let key = [
            0x6d, 0x83, 0x93, 0x52, 0xa3, 0x7c, 0xe6, 0x02, 0xac, 0x01, 0x11, 0x94, 0x79, 0x0c,
            0x64, 0x42,
        ];

        assert!(shard_count > 0, "empty shard set given to sharder");

        Self {
            hasher: SipHasher13::new_with_key(&key),
            shard_count,
        }
    }

    /// Reinitialise [`Self`] with a new key.
    ///
    /// Re-keying [`Self`] will change the mapping of inputs to output shards.
    pub fn with_seed_key(self, key: &[u8; 16]) -> Self {
        let hasher = SipHasher13::new_with_key(key);
        Self { hasher, ..self }
    }

    /// The number of shards keys are mapped across.
    pub fn shard_count(&self) -> u8 {
        self.shard_count
    }

    /// Consistently hash `key` to a [`ShardIndex`] in `[0, shard_count)`.
    pub fn hash<H>(&self, key: &H) -> ShardIndex
    where
        H: Hash + ?Sized,
    {
        let mut state = self.hasher;
        key.hash(&mut state);
        let mut key = state.finish();

        let mut b = -1;
        let mut j = 0;
        while j < i64::from(self.shard_count) {
            b = j;
            key = key.wrapping_mul(2862933555777941757).wrapping_add(1);
            j = ((b.wrapping_add(1) as f64) * (((1u64 << 31) as f64) / (((key >> 33) + 1) as f64)))
                as i64
        }

        assert!((0..i64::from(self.shard_count)).contains(&b));
        ShardIndex::new(b as u8)
    }
}

impl Picker for JumpHash {
    fn pick(&self, _ctx: &ShardContext, key: &str) -> ShardIndex {
        self.hash(key)
    }
}
