//! Rolling cardinality window over a ring of time buckets.
//!
//! The window slices its duration into a fixed ring of buckets, each owning
//! a membership tester plus `uniques`/`total` counters. Writes rotate the
//! ring lazily: when an add lands in a new time chunk, the oldest bucket is
//! reset in place and becomes the current one. Reads never rotate.

use crate::config::{CardinalConfig, DEFAULT_BUCKET_COUNT};
use crate::error::{CardinalError, Result};
use crate::membership::{ExactMembership, MembershipTester, ScalableBloom};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};

/// [`Cardinal`] window backed by growable Bloom filters.
pub type BloomCardinal = Cardinal<ScalableBloom>;

/// [`Cardinal`] window backed by exact hash sets.
pub type ExactCardinal = Cardinal<ExactMembership>;

struct Bucket<M> {
    membership: M,
    uniques: u64,
    total: u64,
}

impl<M: MembershipTester> Bucket<M> {
    fn reset(&mut self) -> Result<()> {
        self.membership.clear()?;
        self.uniques = 0;
        self.total = 0;
        Ok(())
    }
}

struct WindowState<M> {
    buckets: Vec<Bucket<M>>,
    /// Start of the current bucket's chunk, in nanoseconds since the epoch
    /// truncated to a chunk boundary.
    last_bucket_at: u128,
    rotations: u64,
}

/// Snapshot of a window's counters, taken under the lock.
#[derive(Debug, Clone, Serialize)]
pub struct WindowStats {
    /// Observations recorded inside the window.
    pub count: u64,
    /// Observations that were new to the window when recorded.
    pub uniques: u64,
    /// `uniques / count`; NaN while the window is empty.
    pub cardinality: f64,
    /// Bucket rotations since construction.
    pub rotations: u64,
    /// Number of buckets in the ring.
    pub buckets: usize,
    /// Tokens currently held across all membership testers.
    pub tracked: u64,
}

/// Approximate distinct-ratio estimator over a rolling time window.
///
/// `Cardinal` answers "out of everything observed in the last `window`, how
/// much was new?" with bounded memory. The window is sliced into
/// [`buckets`](CardinalConfig::buckets) time chunks; every observation is
/// deduplicated against all live chunks, so a token counts as unique at
/// most once per window pass. As the wall clock crosses chunk boundaries,
/// writes recycle the oldest bucket and its tokens age out.
///
/// All methods take `&self`; the mutable state sits behind a [`Mutex`], so
/// a window can be shared across threads in an `Arc`.
pub struct Cardinal<M> {
    window: Duration,
    chunk: Duration,
    chunk_nanos: u128,
    state: Mutex<WindowState<M>>,
}

impl<M: MembershipTester> Cardinal<M> {
    /// Creates a window covering `window`, sliced into
    /// [`DEFAULT_BUCKET_COUNT`] buckets.
    pub fn new(window: Duration) -> Result<Self> {
        Self::with_config(CardinalConfig {
            window,
            buckets: DEFAULT_BUCKET_COUNT,
            capacity_hint: None,
        })
    }

    /// Creates a window sized for roughly `capacity_hint` distinct tokens.
    pub fn with_capacity(
        window: Duration,
        capacity_hint: usize,
    ) -> Result<Self> {
        Self::with_config(CardinalConfig {
            window,
            buckets: DEFAULT_BUCKET_COUNT,
            capacity_hint: Some(capacity_hint),
        })
    }

    /// Creates a window from a full [`CardinalConfig`].
    pub fn with_config(config: CardinalConfig) -> Result<Self> {
        Self::with_config_at(config, SystemTime::now())
    }

    fn with_config_at(config: CardinalConfig, at: SystemTime) -> Result<Self> {
        config.validate()?;
        debug!("Creating cardinal window with config: {:?}", config);

        let chunk_nanos = config.window.as_nanos() / config.buckets as u128;
        let capacity = config.bucket_capacity();
        let mut buckets = Vec::with_capacity(config.buckets);
        for _ in 0..config.buckets {
            buckets.push(Bucket {
                membership: M::with_capacity(capacity)?,
                uniques: 0,
                total: 0,
            });
        }

        Ok(Self {
            window: config.window,
            chunk: Duration::from_nanos(chunk_nanos as u64),
            chunk_nanos,
            state: Mutex::new(WindowState {
                buckets,
                last_bucket_at: truncate(epoch_nanos(at)?, chunk_nanos),
                rotations: 0,
            }),
        })
    }

    /// Records an observation of `token` at the current wall-clock time.
    ///
    /// The token is deduplicated against every live bucket: it increments
    /// `uniques` only if no bucket has seen it, while `count` grows on
    /// every call.
    pub fn add(&self, token: &[u8]) -> Result<()> {
        self.add_at(token, SystemTime::now())
    }

    pub(crate) fn add_at(&self, token: &[u8], at: SystemTime) -> Result<()> {
        let at_nanos = epoch_nanos(at)?;
        let mut state = self.lock_state()?;
        self.rotate_if_due(&mut state, at_nanos)?;

        let seen = Self::any_bucket_contains(&state, token)?;
        let slot = (state.rotations as usize) % state.buckets.len();
        let current = &mut state.buckets[slot];
        if !seen {
            current.membership.insert(token)?;
            current.uniques += 1;
        }
        current.total += 1;
        Ok(())
    }

    /// Checks whether `token` was observed inside the current window.
    ///
    /// With a probabilistic tester this may rarely report `true` for a
    /// token that was never added. It never rotates buckets.
    pub fn check(&self, token: &[u8]) -> Result<bool> {
        let state = self.lock_state()?;
        Self::any_bucket_contains(&state, token)
    }

    /// Total observations recorded inside the window.
    pub fn count(&self) -> Result<u64> {
        let state = self.lock_state()?;
        Ok(state.buckets.iter().map(|bucket| bucket.total).sum())
    }

    /// Observations that were new to the window when recorded.
    pub fn uniques(&self) -> Result<u64> {
        let state = self.lock_state()?;
        Ok(state.buckets.iter().map(|bucket| bucket.uniques).sum())
    }

    /// Ratio of unique to total observations in the window.
    ///
    /// Returns 1.0 when every observation was distinct, approaching 0.0 as
    /// repeats dominate, and NaN while the window is empty.
    pub fn cardinality(&self) -> Result<f64> {
        let state = self.lock_state()?;
        let uniques: u64 =
            state.buckets.iter().map(|bucket| bucket.uniques).sum();
        let total: u64 = state.buckets.iter().map(|bucket| bucket.total).sum();
        Ok(uniques as f64 / total as f64)
    }

    /// Empties every bucket while keeping the rotation clock intact, so the
    /// next add lands in the same chunk it would have without the reset.
    pub fn reset(&self) -> Result<()> {
        let mut state = self.lock_state()?;
        for bucket in &mut state.buckets {
            bucket.reset()?;
        }
        debug!("Reset cardinal window");
        Ok(())
    }

    /// Snapshot of all counters under a single lock acquisition.
    pub fn stats(&self) -> Result<WindowStats> {
        let state = self.lock_state()?;
        let count: u64 =
            state.buckets.iter().map(|bucket| bucket.total).sum();
        let uniques: u64 =
            state.buckets.iter().map(|bucket| bucket.uniques).sum();
        let tracked = state
            .buckets
            .iter()
            .map(|bucket| bucket.membership.count())
            .sum();
        Ok(WindowStats {
            count,
            uniques,
            cardinality: uniques as f64 / count as f64,
            rotations: state.rotations,
            buckets: state.buckets.len(),
            tracked,
        })
    }

    /// Total rolling duration covered by the ring.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wall-clock span of a single bucket.
    pub fn chunk(&self) -> Duration {
        self.chunk
    }

    fn rotate_if_due(
        &self,
        state: &mut WindowState<M>,
        at_nanos: u128,
    ) -> Result<()> {
        let bucket_at = truncate(at_nanos, self.chunk_nanos);
        if bucket_at != state.last_bucket_at {
            // One step per boundary crossing, regardless of how many chunks
            // elapsed while the window sat idle.
            state.rotations += 1;
            let slot = (state.rotations as usize) % state.buckets.len();
            state.buckets[slot].reset()?;
            state.last_bucket_at = bucket_at;
            trace!(
                "Rotated window into bucket {} (rotation {})",
                slot, state.rotations
            );
        }
        Ok(())
    }

    fn any_bucket_contains(
        state: &WindowState<M>,
        token: &[u8],
    ) -> Result<bool> {
        for bucket in &state.buckets {
            if bucket.membership.contains(token)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, WindowState<M>>> {
        self.state
            .lock()
            .map_err(|e| CardinalError::LockError(e.to_string()))
    }
}

fn epoch_nanos(at: SystemTime) -> Result<u128> {
    Ok(at.duration_since(UNIX_EPOCH)?.as_nanos())
}

fn truncate(nanos: u128, chunk_nanos: u128) -> u128 {
    nanos - nanos % chunk_nanos
}
