//! Set-membership testers backing the window's time buckets.
//!
//! A bucket only needs approximate "have I seen this token?" answers, so the
//! window is generic over [`MembershipTester`]. Two implementations ship with
//! the crate:
//!
//! - [`ScalableBloom`], a growable Bloom filter that keeps memory bounded and
//!   may report rare false positives;
//! - [`ExactMembership`], a plain hash set for workloads where exactness
//!   matters more than memory.

use crate::error::Result;

mod bloom;
mod exact;

pub use bloom::{DEFAULT_FPR, ScalableBloom};
pub use exact::ExactMembership;

/// Capability required from a per-bucket set-membership tester.
pub trait MembershipTester {
    /// Creates a tester sized for roughly `capacity` distinct elements.
    fn with_capacity(capacity: usize) -> Result<Self>
    where
        Self: Sized;

    /// Records a token in the tester.
    fn insert(&mut self, token: &[u8]) -> Result<()>;

    /// Checks whether a token was (probably) recorded before.
    fn contains(&self, token: &[u8]) -> Result<bool>;

    /// Exact number of [`insert`] calls since creation or the last
    /// [`clear`].
    ///
    /// [`insert`]: MembershipTester::insert
    /// [`clear`]: MembershipTester::clear
    fn count(&self) -> u64;

    /// Empties the tester, keeping its configured capacity.
    fn clear(&mut self) -> Result<()>;
}
