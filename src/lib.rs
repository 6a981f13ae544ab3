//! Sliding-window cardinality estimation over rotating membership buckets.
//!
//! This crate answers "how much of the traffic seen in the last N minutes
//! was new?" with bounded memory, by slicing the window into a ring of time
//! buckets that are recycled as the wall clock moves on.
//!
//! HowTo:
//!    * Buckets: the window duration is divided into N buckets B_1, B_2, …, B_N,
//!      each owning a set-membership tester plus unique/total counters.
//!    * Chunks: each bucket covers a fixed wall-clock chunk of window / N.
//!    * Rotation: buckets are reused in a circular manner, so the ring always
//!      represents the most recent window of time.
//!
//! Insertion:
//!     * When a token is added at time t, every live bucket is asked whether
//!       it has seen the token before.
//!     * Only unseen tokens are inserted into the current bucket B_{current}
//!       and counted as unique; the total counter grows on every add.
//! Query:
//!     * Membership checks consult all buckets and report present if any
//!       bucket claims the token.
//! Expiration:
//!     * When an add lands past the current chunk boundary, the oldest
//!       bucket is cleared in place and becomes B_{current}.
//!     * Tokens that lived only in that bucket are forgotten, so the
//!       unique ratio reflects roughly the configured window.
//!
//! Obvious problems:
//!     * False positives: the default Bloom-backed tester can claim a token
//!       was seen when it was not, slightly undercounting uniques. Use the
//!       exact hash-set tester when that matters more than memory.
//!     * Idle streams: rotation happens one bucket per add, so after a long
//!       quiet period the ring drains gradually instead of all at once.

mod config;
mod error;
mod hash;
pub mod membership;
mod window;

pub use config::{
    CardinalConfig, CardinalConfigBuilder, CardinalConfigBuilderError,
    DEFAULT_BUCKET_CAPACITY, DEFAULT_BUCKET_COUNT, MIN_BUCKET_CAPACITY,
};
pub use error::{CardinalError, Result};
pub use hash::{optimal_bit_vector_size, optimal_num_hashes};
pub use membership::{
    DEFAULT_FPR, ExactMembership, MembershipTester, ScalableBloom,
};
pub use window::{BloomCardinal, Cardinal, ExactCardinal, WindowStats};
