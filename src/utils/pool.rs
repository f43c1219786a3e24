/*
 * Reusable BigUint scratch pool for the quote hot path
 */

use num_bigint::BigUint;
use num_traits::Zero;
use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;

pub const DEFAULT_MAX_RETAINED: usize = 1024;

static GLOBAL_POOL: LazyLock<BigUintPool> =
    LazyLock::new(|| BigUintPool::new(DEFAULT_MAX_RETAINED));

/// Process-wide pool shared by every quote computation.
#[must_use]
pub fn global() -> &'static BigUintPool {
    &GLOBAL_POOL
}

#[derive(Debug, Default)]
pub struct PoolStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub releases: AtomicU64,
}

impl PoolStats {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            return 0.0;
        }
        hits as f64 / total as f64 * 100.0
    }
}

/// Free list of zeroed `BigUint`s. The lock is only held for the push or pop
/// itself, never while a borrower is computing.
#[derive(Debug)]
pub struct BigUintPool {
    free: Mutex<Vec<BigUint>>,
    max_retained: usize,
    stats: PoolStats,
}

impl Default for BigUintPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETAINED)
    }
}

impl BigUintPool {
    #[must_use]
    pub fn new(max_retained: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_retained,
            stats: PoolStats::default(),
        }
    }

    /// Borrow a scratch integer. Its value is unspecified; set it before
    /// reading. Falls back to a fresh allocation when the free list is empty.
    pub fn acquire(&self) -> Scratch<'_> {
        let popped = self.free.lock().pop();
        let value = match popped {
            Some(value) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                value
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                BigUint::zero()
            }
        };
        Scratch { value, pool: self }
    }

    /// Reset `value` to zero and hand it back. Integers beyond
    /// `max_retained` are dropped.
    pub fn release(&self, mut value: BigUint) {
        value.set_zero();
        self.stats.releases.fetch_add(1, Ordering::Relaxed);
        let mut free = self.free.lock();
        if free.len() < self.max_retained {
            free.push(value);
        }
    }

    #[must_use]
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    #[must_use]
    pub fn available(&self) -> usize {
        self.free.lock().len()
    }
}

/// A borrowed scratch integer. Returned to its pool on drop, so the borrower
/// cannot observe it after release.
#[derive(Debug)]
pub struct Scratch<'a> {
    value: BigUint,
    pool: &'a BigUintPool,
}

impl Scratch<'_> {
    pub fn set(&mut self, other: &BigUint) {
        self.value.clone_from(other);
    }
}

impl Deref for Scratch<'_> {
    type Target = BigUint;

    fn deref(&self) -> &BigUint {
        &self.value
    }
}

impl DerefMut for Scratch<'_> {
    fn deref_mut(&mut self) -> &mut BigUint {
        &mut self.value
    }
}

impl Drop for Scratch<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.value));
    }
}
