//! Bernoulli sampler: draw a candidate uniformly over the truncated
//! support, then accept it with probability `exp(-k^2 / (2 sigma^2))` via a
//! bit-by-bit Bernoulli comparison rather than evaluating the exponential
//! directly against a single uniform float.

use super::{BaseSampler, BoxedRng, Sampler, SamplerConfig};
use rand::RngCore;

pub struct BernoulliSampler {
    bound: i64,
    sigma: f64,
    precision: u32,
    blinding: bool,
    rng: BoxedRng,
}

impl BernoulliSampler {
    pub fn new(cfg: SamplerConfig, rng: BoxedRng) -> Self {
        let bound = (cfg.tail as f64 * cfg.sigma).ceil() as i64;
        Self {
            bound,
            sigma: cfg.sigma,
            precision: cfg.precision.bits().min(62),
            blinding: cfg.blinding,
            rng,
        }
    }

    fn uniform_offset(&mut self) -> i64 {
        let span = (2 * self.bound + 1) as u64;
        let r = self.rng.next_u64() % span;
        r as i64 - self.bound
    }

    /// Flip a coin with probability `p` by comparing its binary expansion
    /// against a stream of random bits, bit by bit, deciding at the first
    /// point of disagreement. Under blinding, every precision bit is
    /// consumed regardless of when the decision is actually reached.
    fn bernoulli_flip(&mut self, p: f64) -> bool {
        let p_bits = expand_bits(p, self.precision);
        let mut decided: Option<bool> = None;
        for &pb in &p_bits {
            let rb = (self.rng.next_u64() & 1) as u8;
            let verdict = rb < pb; // random bit is 0, target bit is 1: accept
            let tie = rb == pb;
            if decided.is_none() && !tie {
                decided = Some(verdict);
                if !self.blinding {
                    break;
                }
            }
        }
        decided.unwrap_or(false)
    }
}

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

impl BaseSampler for BernoulliSampler {
    fn sample_zero(&mut self) -> i64 {
        loop {
            let k = self.uniform_offset();
            let p = (-(k as f64) * (k as f64) / (2.0 * self.sigma * self.sigma)).exp();
            if self.bernoulli_flip(p) {
                return k;
            }
        }
    }

    fn sigma(&self) -> f64 {
        self.sigma
    }

    fn blinding(&self) -> bool {
        self.blinding
    }
}

impl Sampler for BernoulliSampler {
    fn rng(&mut self) -> &mut dyn rand::RngCore {
        &mut *self.rng
    }
}
