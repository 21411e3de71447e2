//! Binary arithmetic coding (BAC) sampler: the same cumulative-distribution
//! idea as the CDT sampler, but the table is a fixed-point integer
//! frequency table (as an arithmetic decoder would use) instead of a
//! floating-point CDF, and a symbol is decoded by comparing against a
//! fixed-point target rather than binary-searching floats.

use super::{half_pmf_table, BaseSampler, BoxedRng, Sampler, SamplerConfig};
use rand::RngCore;

const TOTAL_BITS: u32 = 32;

pub struct BacSampler {
    /// `cum_freq[i]` is the fixed-point cumulative frequency (out of
    /// `1 << TOTAL_BITS`) of outcomes `<= i - bound`.
    cum_freq: Vec<u64>,
    bound: i64,
    sigma: f64,
    blinding: bool,
    rng: BoxedRng,
}

impl BacSampler {
    pub fn new(cfg: SamplerConfig, rng: BoxedRng) -> Self {
        let half = half_pmf_table(cfg.sigma, cfg.tail);
        let bound = (half.len() - 1) as i64;
        let mut pmf = vec![0.0; 2 * half.len() - 1];
        for (i, &p) in half.iter().enumerate() {
            pmf[(bound - i as i64) as usize] = p;
            pmf[(bound + i as i64) as usize] = p;
        }

        let total = 1u64 << TOTAL_BITS;
        let mut cum_freq = Vec::with_capacity(pmf.len());
        let mut running = 0u64;
        let scale = total as f64;
        for (i, &p) in pmf.iter().enumerate() {
            running += (p * scale).round() as u64;
            // Force monotonic strictly-increasing-or-equal table even under
            // floating rounding, and clamp the final entry to `total`.
            if i == pmf.len() - 1 {
                running = total;
            }
            cum_freq.push(running);
        }

        Self {
            cum_freq,
            bound,
            sigma: cfg.sigma,
            blinding: cfg.blinding,
            rng,
        }
    }

    fn decode_target(&mut self) -> u64 {
        self.rng.next_u64() >> (64 - TOTAL_BITS)
    }

    fn locate_binary(&self, target: u64) -> usize {
        match self.cum_freq.binary_search(&target) {
            Ok(i) => i,
            Err(i) => i.min(self.cum_freq.len() - 1),
        }
    }

    fn locate_linear(&self, target: u64) -> usize {
        let mut found = self.cum_freq.len() - 1;
        let mut resolved = false;
        for (i, &f) in self.cum_freq.iter().enumerate() {
            let hit = f > target && !resolved;
            found = if hit { i } else { found };
            resolved |= hit;
        }
        found
    }
}

impl BaseSampler for BacSampler {
    fn sample_zero(&mut self) -> i64 {
        let target = self.decode_target();
        let idx = if self.blinding {
            self.locate_linear(target)
        } else {
            self.locate_binary(target)
        };
        idx as i64 - self.bound
    }

    fn sigma(&self) -> f64 {
        self.sigma
    }

    fn blinding(&self) -> bool {
        self.blinding
    }
}

impl Sampler for BacSampler {
    fn rng(&mut self) -> &mut dyn rand::RngCore {
        &mut *self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaussian::{Precision, SamplerVariant};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn make(sigma: f64, blinding: bool) -> BacSampler {
        let cfg = SamplerConfig {
            variant: SamplerVariant::Bac,
            precision: Precision::P64,
            sigma,
            tail: 10,
            blinding,
            bootstrap: false,
        };
        BacSampler::new(cfg, Box::new(ChaCha20Rng::seed_from_u64(11)))
    }

    #[test]
    fn cumulative_table_ends_at_full_scale() {
        let s = make(4.0, false);
        assert_eq!(*s.cum_freq.last().unwrap(), 1u64 << TOTAL_BITS);
    }

    #[test]
    fn empirical_mean_is_near_zero() {
        let mut s = make(6.0, false);
        let n = 20_000;
        let sum: i64 = (0..n).map(|_| s.sample_zero()).sum();
        let mean = sum as f64 / n as f64;
        assert!(mean.abs() < 1.0, "mean={mean}");
    }

    #[test]
    fn blinding_and_fast_path_agree() {
        let target = 1u64 << 30;
        let mut a = make(4.0, false);
        let mut b = make(4.0, true);
        assert_eq!(a.locate_linear(target), b.locate_linear(target));
    }
}
