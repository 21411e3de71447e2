//! Micciancio-Walter bootstrapped sampling: one long-lived base sampler at
//! sigma_max serves every row of the preimage walk by convolution, instead
//! of constructing a fresh table-based sampler per row's sigma.
//!
//! Convolution step: to draw from `D_{Z,sigma,c}` with `sigma > sigma_max`,
//! draw `y ~ D_{Z,sigma'}` (zero-centered, `sigma' = sqrt(sigma^2 -
//! sigma_max^2)`) via an ad hoc rejection sampler, then draw
//! `z ~ D_{Z,sigma_max,c-y}` from the persistent base sampler; `y + z`
//! approximates `D_{Z,sigma,c}`.

use super::{gaussian_weight, uniform_unit, Sampler};
use crate::error::{CoreError, CoreResult};
use tracing::error;

/// Smoothing-parameter safety margin the caller must maintain:
/// `sqrt(sigma^2 - sigma_max^2) > eta * sigma_smoothing`.
pub const ETA_SMOOTHING: f64 = 6.0;

pub struct BootstrapSampler<S: Sampler> {
    base: S,
    sigma_max: f64,
    sigma_smoothing: f64,
}

impl<S: Sampler> BootstrapSampler<S> {
    pub fn new(base: S, sigma_max: f64, sigma_smoothing: f64) -> Self {
        Self {
            base,
            sigma_max,
            sigma_smoothing,
        }
    }

    pub fn sigma_max(&self) -> f64 {
        self.sigma_max
    }

    /// Draw a sample from `D_{Z,sigma,center}` for any `sigma >= sigma_max`
    /// satisfying the smoothing-parameter bound above.
    pub fn sample(&mut self, sigma: f64, center: f64) -> CoreResult<i64> {
        if sigma < self.sigma_max {
            error!("bootstrap target sigma {sigma} below base sigma_max {}", self.sigma_max);
            return Err(CoreError::InvalidParameter);
        }
        let variance_gap = sigma * sigma - self.sigma_max * self.sigma_max;
        let sigma_prime = variance_gap.sqrt();
        if sigma_prime > 0.0 && sigma_prime <= ETA_SMOOTHING * self.sigma_smoothing {
            error!(
                "bootstrap convolution gap {sigma_prime} does not clear the smoothing bound"
            );
            return Err(CoreError::NumericInstability);
        }

        let y = if sigma_prime > 0.0 {
            sample_wide_zero(sigma_prime, self.base.rng())
        } else {
            0
        };
        let z = self.base.sample(center - y as f64);
        Ok(y + z)
    }
}

/// Zero-centered discrete Gaussian via plain rejection, used only for the
/// ad hoc convolution offset above: no precomputed table, since `sigma'`
/// changes with every row and rebuilding a table per row is exactly what
/// bootstrapping is meant to avoid.
fn sample_wide_zero(sigma: f64, rng: &mut dyn rand::RngCore) -> i64 {
    let bound = (8.0 * sigma).ceil() as i64;
    loop {
        let span = (2 * bound + 1) as u64;
        let k = (rng.next_u64() % span) as i64 - bound;
        let w = gaussian_weight(k as f64, sigma);
        if uniform_unit(rng) < w {
            return k;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaussian::cdt::CdtSampler;
    use crate::gaussian::{Precision, SamplerConfig, SamplerVariant};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn base_sampler(sigma_max: f64) -> CdtSampler {
        let cfg = SamplerConfig {
            variant: SamplerVariant::Cdt,
            precision: Precision::P64,
            sigma: sigma_max,
            tail: 10,
            blinding: false,
            bootstrap: true,
        };
        CdtSampler::new(cfg, Box::new(ChaCha20Rng::seed_from_u64(21)))
    }

    #[test]
    fn rejects_sigma_below_base() {
        let mut boot = BootstrapSampler::new(base_sampler(10.0), 10.0, 1.0);
        assert!(boot.sample(5.0, 0.0).is_err());
    }

    #[test]
    fn empirical_mean_tracks_requested_center() {
        let mut boot = BootstrapSampler::new(base_sampler(6.0), 6.0, 0.5);
        let n = 5000;
        let sum: f64 = (0..n).map(|_| boot.sample(20.0, 15.0).unwrap() as f64).sum();
        let mean = sum / n as f64;
        assert!((mean - 15.0).abs() < 2.0, "mean={mean}");
    }
}
