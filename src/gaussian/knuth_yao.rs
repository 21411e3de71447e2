//! Knuth-Yao sampler: the discrete distribution generating (DDG) tree
//! walk. Each outcome's probability is expanded into a column of bits;
//! sampling consumes one random bit per tree level until the running
//! distance hits a leaf.

use super::{half_pmf_table, BaseSampler, BoxedRng, Sampler, SamplerConfig};
use rand::RngCore;

pub struct KnuthYaoSampler {
    /// `bits[outcome][column]`: the `column`-th bit (MSB-first) of that
    /// outcome's probability mass, at table-construction precision.
    bits: Vec<Vec<u8>>,
    bound: i64,
    precision: u32,
    sigma: f64,
    blinding: bool,
    rng: BoxedRng,
    bit_buffer: u64,
    bits_left: u32,
}

impl KnuthYaoSampler {
    pub fn new(cfg: SamplerConfig, rng: BoxedRng) -> Self {
        let half = half_pmf_table(cfg.sigma, cfg.tail);
        let bound = (half.len() - 1) as i64;
        let n = 2 * half.len() - 1;
        let mut pmf = vec![0.0; n];
        for (i, &p) in half.iter().enumerate() {
            pmf[(bound - i as i64) as usize] = p;
            pmf[(bound + i as i64) as usize] = p;
        }
        let precision = cfg.precision.bits().min(62);
        let bits = pmf
            .iter()
            .map(|&p| expand_bits(p, precision))
            .collect();
        Self {
            bits,
            bound,
            precision,
            sigma: cfg.sigma,
            blinding: cfg.blinding,
            rng,
            bit_buffer: 0,
            bits_left: 0,
        }
    }

    fn next_bit(&mut self) -> u8 {
        if self.bits_left == 0 {
            self.bit_buffer = self.rng.next_u64();
            self.bits_left = 64;
        }
        self.bits_left -= 1;
        ((self.bit_buffer >> self.bits_left) & 1) as u8
    }
}

/// Binary fraction expansion of `p` to `precision` bits, MSB first.
fn expand_bits(p: f64, precision: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(precision as usize);
    let mut frac = p.clamp(0.0, 1.0);
    for _ in 0..precision {
        frac *= 2.0;
        if frac >= 1.0 {
            out.push(1);
            frac -= 1.0;
        } else {
            out.push(0);
        }
    }
    out
}

impl BaseSampler for KnuthYaoSampler {
    fn sample_zero(&mut self) -> i64 {
        let n = self.bits.len();
        let mut d: i64 = 0;
        for col in 0..self.precision as usize {
            let bit = self.next_bit() as i64;
            d = 2 * d + bit;
            // The blinding path always scans every outcome at this column
            // instead of breaking out as soon as a leaf is found.
            let mut result: Option<i64> = None;
            for row in 0..n {
                d -= self.bits[row][col] as i64;
                let hit = d == -1 && result.is_none();
                if hit {
                    result = Some(row as i64 - self.bound);
                }
                if hit && !self.blinding {
                    break;
                }
            }
            if let Some(v) = result {
                return v;
            }
        }
        // Precision exhausted without resolving (astronomically unlikely);
        // fall back to the mode.
        0
    }

    fn sigma(&self) -> f64 {
        self.sigma
    }

    fn blinding(&self) -> bool {
        self.blinding
    }
}

impl Sampler for KnuthYaoSampler {
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

    fn make(sigma: f64) -> KnuthYaoSampler {
        let cfg = SamplerConfig {
            variant: SamplerVariant::KnuthYao,
            precision: Precision::P64,
            sigma,
            tail: 10,
            blinding: false,
            bootstrap: false,
        };
        KnuthYaoSampler::new(cfg, Box::new(ChaCha20Rng::seed_from_u64(1)))
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
    fn samples_stay_within_truncated_tail() {
        let mut s = make(4.0);
        for _ in 0..5000 {
            let z = s.sample_zero();
            assert!(z.unsigned_abs() as i64 <= s.bound);
        }
    }
}
