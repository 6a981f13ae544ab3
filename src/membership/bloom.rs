use super::MembershipTester;
use crate::error::{CardinalError, Result};
use crate::hash::{bit_indices, optimal_bit_vector_size, optimal_num_hashes};
use bitvec::prelude::*;
use tracing::debug;

/// False positive rate a [`ScalableBloom`] targets when created through
/// [`MembershipTester::with_capacity`].
pub const DEFAULT_FPR: f64 = 0.01;

const GROWTH_FACTOR: usize = 2;
const FPR_TIGHTENING: f64 = 0.5;

/// One fixed-size Bloom filter inside a [`ScalableBloom`].
struct BloomSlice {
    bits: BitVec<usize, Lsb0>,
    bit_len: usize,
    num_hashes: usize,
    capacity: usize,
    fpr: f64,
    inserts: u64,
}

impl BloomSlice {
    fn new(capacity: usize, fpr: f64) -> Result<Self> {
        if capacity == 0 {
            return Err(CardinalError::InvalidConfig(
                "Filter capacity must be greater than 0".to_string(),
            ));
        }
        if fpr <= 0.0 || fpr >= 1.0 {
            return Err(CardinalError::InvalidConfig(format!(
                "False positive rate must be between 0 and 1, got {}",
                fpr
            )));
        }

        let bit_len = optimal_bit_vector_size(capacity, fpr);
        let num_hashes = optimal_num_hashes(capacity, bit_len).max(1);
        Ok(Self {
            bits: bitvec![0; bit_len],
            bit_len,
            num_hashes,
            capacity,
            fpr,
            inserts: 0,
        })
    }

    fn insert(&mut self, token: &[u8]) -> Result<()> {
        for index in bit_indices(token, self.num_hashes, self.bit_len) {
            let index = index as usize;
            if index >= self.bits.len() {
                return Err(CardinalError::IndexOutOfBounds {
                    index,
                    capacity: self.bits.len(),
                });
            }
            self.bits.set(index, true);
        }
        self.inserts += 1;
        Ok(())
    }

    fn contains(&self, token: &[u8]) -> Result<bool> {
        for index in bit_indices(token, self.num_hashes, self.bit_len) {
            let index = index as usize;
            if index >= self.bits.len() {
                return Err(CardinalError::IndexOutOfBounds {
                    index,
                    capacity: self.bits.len(),
                });
            }
            if !self.bits[index] {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn clear(&mut self) {
        self.bits.fill(false);
        self.inserts = 0;
    }

    fn is_saturated(&self) -> bool {
        self.inserts >= self.capacity as u64
    }
}

/// Growable Bloom filter, the default membership tester.
///
/// Starts with a single slice sized for the requested capacity. When the
/// active slice has absorbed as many inserts as it was sized for, a new
/// slice is appended with twice the capacity and a tightened false
/// positive rate, so the compound error rate stays close to the configured
/// target as the filter grows. Lookups consult every slice.
pub struct ScalableBloom {
    slices: Vec<BloomSlice>,
    initial_capacity: usize,
    initial_fpr: f64,
}

impl ScalableBloom {
    /// Creates a filter with an explicit false positive rate instead of
    /// [`DEFAULT_FPR`].
    pub fn with_params(capacity: usize, fpr: f64) -> Result<Self> {
        Ok(Self {
            slices: vec![BloomSlice::new(capacity, fpr)?],
            initial_capacity: capacity,
            initial_fpr: fpr,
        })
    }

    /// Number of slices currently allocated.
    pub fn slices(&self) -> usize {
        self.slices.len()
    }

    /// Total bits allocated across all slices.
    pub fn bit_size(&self) -> usize {
        self.slices.iter().map(|slice| slice.bit_len).sum()
    }

    fn grow(&mut self) -> Result<()> {
        let (capacity, fpr) = match self.slices.last() {
            Some(active) => (
                active.capacity.saturating_mul(GROWTH_FACTOR),
                active.fpr * FPR_TIGHTENING,
            ),
            None => (self.initial_capacity, self.initial_fpr),
        };
        debug!(
            "Growing scalable bloom to slice {} (capacity: {}, fpr: {})",
            self.slices.len() + 1,
            capacity,
            fpr
        );
        self.slices.push(BloomSlice::new(capacity, fpr)?);
        Ok(())
    }
}

impl MembershipTester for ScalableBloom {
    fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_params(capacity, DEFAULT_FPR)
    }

    fn insert(&mut self, token: &[u8]) -> Result<()> {
        if self.slices[self.slices.len() - 1].is_saturated() {
            self.grow()?;
        }
        let active = self.slices.len() - 1;
        self.slices[active].insert(token)
    }

    fn contains(&self, token: &[u8]) -> Result<bool> {
        for slice in self.slices.iter().rev() {
            if slice.contains(token)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn count(&self) -> u64 {
        self.slices.iter().map(|slice| slice.inserts).sum()
    }

    fn clear(&mut self) -> Result<()> {
        self.slices.truncate(1);
        if let Some(base) = self.slices.first_mut() {
            base.clear();
        }
        Ok(())
    }
}
