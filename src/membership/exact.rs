use super::MembershipTester;
use crate::error::{CardinalError, Result};
use fnv::FnvHashSet;

/// Exact membership tester backed by a hash set.
///
/// Trades the bounded memory of [`ScalableBloom`](super::ScalableBloom) for
/// exact answers: no false positives, memory proportional to the number of
/// distinct tokens retained.
pub struct ExactMembership {
    tokens: FnvHashSet<Vec<u8>>,
    inserts: u64,
}

impl MembershipTester for ExactMembership {
    fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CardinalError::InvalidConfig(
                "Tester capacity must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            tokens: FnvHashSet::with_capacity_and_hasher(
                capacity,
                Default::default(),
            ),
            inserts: 0,
        })
    }

    fn insert(&mut self, token: &[u8]) -> Result<()> {
        self.tokens.insert(token.to_vec());
        self.inserts += 1;
        Ok(())
    }

    fn contains(&self, token: &[u8]) -> Result<bool> {
        Ok(self.tokens.contains(token))
    }

    fn count(&self) -> u64 {
        self.inserts
    }

    fn clear(&mut self) -> Result<()> {
        self.tokens.clear();
        self.inserts = 0;
        Ok(())
    }
}
