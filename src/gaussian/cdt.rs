//! Cumulative distribution table sampler: precompute the CDF of
//! D_{Z,sigma} once, then draw a uniform real and locate its bucket. The
//! only variant compiled unconditionally (the reference implementation
//! treats it as the baseline every other variant is checked against).

use super::{half_pmf_table, uniform_unit, BaseSampler, BoxedRng, Sampler, SamplerConfig};

pub struct CdtSampler {
    /// `cdf[i]` is `Pr[Z <= i - bound]` for `i in 0..table.len()`, i.e. the
    /// table is indexed by offset from `-bound`.
    cdf: Vec<f64>,
    bound: i64,
    sigma: f64,
    blinding: bool,
    rng: BoxedRng,
}

impl CdtSampler {
    pub fn new(cfg: SamplerConfig, rng: BoxedRng) -> Self {
        let half = half_pmf_table(cfg.sigma, cfg.tail);
        let bound = (half.len() - 1) as i64;
        let mut pmf = vec![0.0; 2 * half.len() - 1];
        for (i, &p) in half.iter().enumerate().rev() {
            pmf[(bound - i as i64) as usize] = p;
            pmf[(bound + i as i64) as usize] = p;
        }
        let mut running = 0.0;
        let mut cdf = Vec::with_capacity(pmf.len());
        for p in pmf {
            running += p;
            cdf.push(running);
        }
        Self {
            cdf,
            bound,
            sigma: cfg.sigma,
            blinding: cfg.blinding,
            rng,
        }
    }

    /// Binary search, the normal fast path.
    fn locate_binary(&self, u: f64) -> usize {
        match self.cdf.binary_search_by(|p| p.partial_cmp(&u).unwrap()) {
            Ok(i) => i,
            Err(i) => i.min(self.cdf.len() - 1),
        }
    }

    /// Linear scan: every table entry is visited regardless of `u`, so the
    /// scan time is independent of the sampled value (the blinding path).
    fn locate_linear(&self, u: f64) -> usize {
        let mut found = self.cdf.len() - 1;
        let mut resolved = false;
        for (i, &p) in self.cdf.iter().enumerate() {
            let hit = p >= u && !resolved;
            found = if hit { i } else { found };
            resolved |= hit;
        }
        found
    }
}

impl BaseSampler for CdtSampler {
    fn sample_zero(&mut self) -> i64 {
        let u = uniform_unit(&mut *self.rng);
        let idx = if self.blinding {
            self.locate_linear(u)
        } else {
            self.locate_binary(u)
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

impl Sampler for CdtSampler {
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

    fn make(sigma: f64, blinding: bool) -> CdtSampler {
        let cfg = SamplerConfig {
            variant: SamplerVariant::Cdt,
            precision: Precision::P64,
            sigma,
            tail: 10,
            blinding,
            bootstrap: false,
        };
        CdtSampler::new(cfg, Box::new(ChaCha20Rng::seed_from_u64(42)))
    }

    #[test]
    fn binary_and_linear_search_agree_on_bucket() {
        let mut a = make(4.0, false);
        let mut b = make(4.0, true);
        // Same seed, same table construction: identical sample streams,
        // since both paths consume exactly one uniform draw per sample.
        for _ in 0..50 {
            assert_eq!(a.sample_zero(), b.sample_zero());
        }
    }

    #[test]
    fn empirical_mean_is_near_zero() {
        let mut s = make(8.0, false);
        let n = 20_000;
        let sum: i64 = (0..n).map(|_| s.sample_zero()).sum();
        let mean = sum as f64 / n as f64;
        assert!(mean.abs() < 1.0, "mean={mean}");
    }

    #[test]
    fn empirical_variance_matches_sigma_squared() {
        let sigma = 6.0;
        let mut s = make(sigma, false);
        let n = 50_000;
        let samples: Vec<i64> = (0..n).map(|_| s.sample_zero()).collect();
        let mean = samples.iter().sum::<i64>() as f64 / n as f64;
        let var = samples
            .iter()
            .map(|&x| {
                let d = x as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n as f64;
        let rel_err = (var - sigma * sigma).abs() / (sigma * sigma);
        assert!(rel_err < 0.05, "rel_err={rel_err}");
    }
}
