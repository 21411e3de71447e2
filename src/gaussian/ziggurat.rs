//! Ziggurat sampler: the nonnegative half of the support is partitioned
//! into layers of (approximately) equal probability mass; sampling picks a
//! layer uniformly, then a candidate offset within it, accepting by the
//! ratio of the true density to the layer's maximum (left-edge) density.

use super::{gaussian_weight, half_pmf_table, uniform_unit, BaseSampler, BoxedRng, Sampler, SamplerConfig};

const NUM_LAYERS: usize = 64;

struct Layer {
    lo: i64,
    hi: i64,
    peak: f64,
}

pub struct ZigguratSampler {
    layers: Vec<Layer>,
    bound: i64,
    sigma: f64,
    blinding: bool,
    rng: BoxedRng,
}

impl ZigguratSampler {
    pub fn new(cfg: SamplerConfig, rng: BoxedRng) -> Self {
        let half = half_pmf_table(cfg.sigma, cfg.tail);
        let bound = (half.len() - 1) as i64;
        let total: f64 = half[0] / 2.0 + half[1..].iter().sum::<f64>();
        let target = total / NUM_LAYERS as f64;

        let mut layers = Vec::with_capacity(NUM_LAYERS);
        let mut x = 0i64;
        let mut acc = half[0] / 2.0;
        for _ in 0..NUM_LAYERS {
            let lo = x;
            while x < bound && acc < target {
                x += 1;
                acc += half[x as usize];
            }
            let hi = x.max(lo);
            layers.push(Layer {
                lo,
                hi,
                peak: gaussian_weight(lo as f64, cfg.sigma),
            });
            acc = 0.0;
            x = hi;
        }
        // Make sure the final layer reaches the truncation bound exactly.
        if let Some(last) = layers.last_mut() {
            last.hi = bound;
        }

        Self {
            layers,
            bound,
            sigma: cfg.sigma,
            blinding: cfg.blinding,
            rng,
        }
    }

    fn sample_nonnegative(&mut self) -> i64 {
        loop {
            let layer_idx = (self.rng.next_u64() as usize) % self.layers.len();
            // Under blinding, touch every layer's bounds regardless of
            // which one was selected, so the access pattern doesn't
            // depend on layer_idx.
            if self.blinding {
                for l in &self.layers {
                    std::hint::black_box((l.lo, l.hi));
                }
            }
            let layer = &self.layers[layer_idx];
            let span = (layer.hi - layer.lo + 1) as u64;
            let x = layer.lo + (self.rng.next_u64() % span) as i64;
            let f = gaussian_weight(x as f64, self.sigma);
            let u = uniform_unit(&mut *self.rng);
            if u < f / layer.peak {
                return x;
            }
        }
    }
}

impl BaseSampler for ZigguratSampler {
    fn sample_zero(&mut self) -> i64 {
        let mag = self.sample_nonnegative();
        if mag == 0 {
            return 0;
        }
        let sign_bit = self.rng.next_u64() & 1;
        if sign_bit == 0 {
            mag
        } else {
            -mag
        }
    }

    fn sigma(&self) -> f64 {
        self.sigma
    }

    fn blinding(&self) -> bool {
        self.blinding
    }
}

impl Sampler for ZigguratSampler {
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

    fn make(sigma: f64) -> ZigguratSampler {
        let cfg = SamplerConfig {
            variant: SamplerVariant::Ziggurat,
            precision: Precision::P64,
            sigma,
            tail: 10,
            blinding: false,
            bootstrap: false,
        };
        ZigguratSampler::new(cfg, Box::new(ChaCha20Rng::seed_from_u64(5)))
    }

    #[test]
    fn empirical_mean_is_near_zero() {
        let mut s = make(6.0);
        let n = 20_000;
        let sum: i64 = (0..n).map(|_| s.sample_zero()).sum();
        let mean = sum as f64 / n as f64;
        assert!(mean.abs() < 1.0, "mean={mean}");
    }

    #[test]
    fn samples_stay_within_bound() {
        let mut s = make(4.0);
        for _ in 0..5000 {
            assert!(s.sample_zero().unsigned_abs() as i64 <= s.bound);
        }
    }
}
