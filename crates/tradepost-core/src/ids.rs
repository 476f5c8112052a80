//! Item id allocation
//!
//! The host requires every item id to be unique across its whole database.
//! Allocators are the only source of ids; nothing downstream re-checks them.

use crate::identity::ItemId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of globally unique item ids
pub trait IdAllocator {
    /// Allocate the next id
    fn allocate(&mut self) -> ItemId;
}

impl<F: FnMut() -> ItemId> IdAllocator for F {
    fn allocate(&mut self) -> ItemId {
        self()
    }
}

/// Allocates host-style object ids: 8 hex chars of timestamp followed by
/// 16 hex chars from an xorshift64 sequence
///
/// xorshift64 never repeats within its period, so one allocator never hands
/// out the same id twice. Two allocators built from the same seed in the
/// same second produce the same ids; use [`ProcessIdAllocator`] when several
/// independent allocators write into one database.
#[derive(Debug, Clone)]
pub struct ObjectIdAllocator {
    timestamp: u32,
    state: u64,
}

impl ObjectIdAllocator {
    /// Create an allocator stamped with the current time
    pub fn new(seed: u64) -> Self {
        Self::with_timestamp(unix_seconds(), seed)
    }

    /// Create an allocator with a fixed timestamp (reproducible ids)
    pub fn with_timestamp(timestamp: u32, seed: u64) -> Self {
        // xorshift requires a non-zero state
        let state = if seed == 0 { 1 } else { seed };
        Self { timestamp, state }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl IdAllocator for ObjectIdAllocator {
    fn allocate(&mut self) -> ItemId {
        let tail = self.next_u64();
        ItemId::new(format!("{:08x}{:016x}", self.timestamp, tail))
    }
}

/// Current time as the 32-bit object id prefix
fn unix_seconds() -> u32 {
    seconds_prefix(chrono::Utc::now().timestamp())
}

/// Clamp a unix timestamp into the 8 hex chars of an object id prefix
///
/// Saturates at `u32::MAX` instead of wrapping after 2106.
fn seconds_prefix(timestamp: i64) -> u32 {
    u32::try_from(timestamp.max(0)).unwrap_or(u32::MAX)
}

static PROCESS_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// splitmix64 finalizer; a bijection on `u64`
fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Allocates object ids from one sequence shared by the whole process
///
/// Every instance draws the next value of the same counter, so any number of
/// these can write into one database without colliding. The tail is the
/// counter passed through a bijective mix, so distinct counter values always
/// give distinct ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessIdAllocator;

impl ProcessIdAllocator {
    /// Create a handle onto the process-wide sequence
    pub fn new() -> Self {
        Self
    }
}

impl IdAllocator for ProcessIdAllocator {
    fn allocate(&mut self) -> ItemId {
        let n = PROCESS_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        ItemId::new(format!("{:08x}{:016x}", unix_seconds(), mix(n)))
    }
}

/// Allocates `<prefix>_<n>` ids, for demos and tests
#[derive(Debug, Clone)]
pub struct SequentialIdAllocator {
    prefix: String,
    next: u64,
}

impl SequentialIdAllocator {
    /// Create an allocator starting at `<prefix>_0`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl IdAllocator for SequentialIdAllocator {
    fn allocate(&mut self) -> ItemId {
        let id = ItemId::new(format!("{}_{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}
