//! Discrete Gaussian samplers: a common interface over several distinct
//! table-construction/traversal algorithms that all realize D_{Z,sigma,c}.
//!
//! Every variant implements [`BaseSampler`], which draws from the
//! zero-centered distribution D_{Z,sigma}; the blanket [`Sampler::sample`]
//! built on top of it handles an arbitrary real center by rejection,
//! matching the "variable-σ bootstrapped" usage in GPV preimage sampling as
//! well as the "fixed-σ, mean zero" usage in basis generation.

pub mod bac;
pub mod bernoulli;
pub mod bootstrap;
pub mod cdt;
pub mod huffman;
pub mod knuth_yao;
pub mod ziggurat;

use crate::error::{CoreError, CoreResult};
use crate::rng::{seeded_rng, EntropySource, RngDomain};
use rand::RngCore;
use tracing::error;

/// Which table-construction/traversal algorithm backs a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerVariant {
    Cdt,
    KnuthYao,
    Bernoulli,
    Ziggurat,
    Huffman,
    Bac,
}

/// Sample precision, matching the reference implementation's enumerated
/// table-entry widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    P32,
    P64,
    P128,
    P192,
    P256,
}

impl Precision {
    /// Number of mantissa-equivalent bits used when building a CDF/PMF
    /// table; governs truncation error in the tail.
    pub fn bits(self) -> u32 {
        match self {
            Precision::P32 => 32,
            Precision::P64 => 64,
            Precision::P128 => 128,
            Precision::P192 => 192,
            Precision::P256 => 256,
        }
    }
}

/// Explicit, fully-enumerated configuration record (replaces a bit-packed
/// flag word): sampler variant, precision, blinding, and whether this
/// sampler participates in Micciancio-Walter bootstrap convolution.
#[derive(Debug, Clone, Copy)]
pub struct SamplerConfig {
    pub variant: SamplerVariant,
    pub precision: Precision,
    /// Base width; for a fixed-σ sampler this is σ itself, for a
    /// bootstrapped one it's σ_max.
    pub sigma: f64,
    /// Tail cutoff in multiples of σ beyond which PMF mass is truncated.
    pub tail: u32,
    /// When set, sampling avoids data-dependent branches/table-index
    /// shortcuts (linear scans instead of binary search, fixed iteration
    /// counts). Best-effort: a software-only guard, not a hardware
    /// constant-time guarantee.
    pub blinding: bool,
    pub bootstrap: bool,
}

impl SamplerConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            error!("invalid sampler sigma {}", self.sigma);
            return Err(CoreError::InvalidParameter);
        }
        if self.tail == 0 {
            error!("sampler tail must be nonzero");
            return Err(CoreError::InvalidParameter);
        }
        Ok(())
    }
}

/// Draws from the zero-centered discrete Gaussian D_{Z,sigma}. Each variant
/// owns its precomputed table and its own CSPRNG handle.
pub trait BaseSampler {
    fn sample_zero(&mut self) -> i64;
    fn sigma(&self) -> f64;
    fn blinding(&self) -> bool;
}

/// Draws from D_{Z,sigma,c} for an arbitrary real center `c`, built from a
/// `BaseSampler` by rejection sampling: candidate offsets are drawn from
/// the zero-centered base distribution shifted to round(c), then accepted
/// with probability proportional to the ratio of the true density at the
/// candidate to the density the base sampler actually drew from.
pub trait Sampler: BaseSampler {
    fn rng(&mut self) -> &mut dyn RngCore;

    fn sample(&mut self, center: f64) -> i64 {
        let c0 = center.round();
        let sigma = self.sigma();
        let two_sigma_sq = 2.0 * sigma * sigma;
        loop {
            let z = self.sample_zero();
            let candidate = z + c0 as i64;
            let d_candidate = candidate as f64 - center;
            let d_zero = z as f64;
            let log_ratio = -(d_candidate * d_candidate - d_zero * d_zero) / two_sigma_sq;
            if log_ratio >= 0.0 {
                return candidate;
            }
            let u: f64 = uniform_unit(self.rng());
            if u < log_ratio.exp() {
                return candidate;
            }
        }
    }
}

/// Type-erased CSPRNG handle so every sampler variant can be boxed behind
/// `dyn Sampler` despite `seeded_rng` returning an opaque `impl` type.
pub type BoxedRng = Box<dyn RngCore>;

/// Uniform real in `[0, 1)` from 53 bits of the CSPRNG, the usual
/// double-precision construction.
pub fn uniform_unit(rng: &mut dyn RngCore) -> f64 {
    let bits = rng.next_u64() >> 11;
    (bits as f64) * (1.0 / (1u64 << 53) as f64)
}

/// Unnormalized Gaussian weight `exp(-x^2 / (2 sigma^2))`.
pub fn gaussian_weight(x: f64, sigma: f64) -> f64 {
    (-x * x / (2.0 * sigma * sigma)).exp()
}

/// PMF over offsets `0..=tail*sigma` (the nonnegative half; by symmetry the
/// negative half mirrors it, and 0 is shared), normalized so that
/// `pmf[0] + 2*sum(pmf[1..])` sums to 1 (within truncation error).
pub fn half_pmf_table(sigma: f64, tail: u32) -> Vec<f64> {
    let bound = (tail as f64 * sigma).ceil() as i64;
    let mut weights: Vec<f64> = (0..=bound).map(|x| gaussian_weight(x as f64, sigma)).collect();
    let total: f64 = weights[0] + 2.0 * weights[1..].iter().sum::<f64>();
    for w in weights.iter_mut() {
        *w /= total;
    }
    weights
}

/// Construct a sampler for the given configuration, feature-gating each
/// non-default variant. Returns `SamplerFailure` for a variant whose
/// cargo feature isn't enabled in this build.
pub fn create_sampler(
    cfg: SamplerConfig,
    entropy: &EntropySource,
    nonce: &[u8],
) -> CoreResult<Box<dyn Sampler>> {
    cfg.validate()?;
    let rng: BoxedRng = Box::new(seeded_rng(entropy, RngDomain::SamplerTable, nonce)?);

    match cfg.variant {
        SamplerVariant::Cdt => Ok(Box::new(cdt::CdtSampler::new(cfg, rng))),
        #[cfg(feature = "knuth-yao")]
        SamplerVariant::KnuthYao => Ok(Box::new(knuth_yao::KnuthYaoSampler::new(cfg, rng))),
        #[cfg(not(feature = "knuth-yao"))]
        SamplerVariant::KnuthYao => {
            error!("knuth-yao sampler requested but feature is not enabled");
            Err(CoreError::SamplerFailure)
        }
        #[cfg(feature = "bernoulli")]
        SamplerVariant::Bernoulli => Ok(Box::new(bernoulli::BernoulliSampler::new(cfg, rng))),
        #[cfg(not(feature = "bernoulli"))]
        SamplerVariant::Bernoulli => {
            error!("bernoulli sampler requested but feature is not enabled");
            Err(CoreError::SamplerFailure)
        }
        #[cfg(feature = "ziggurat")]
        SamplerVariant::Ziggurat => Ok(Box::new(ziggurat::ZigguratSampler::new(cfg, rng))),
        #[cfg(not(feature = "ziggurat"))]
        SamplerVariant::Ziggurat => {
            error!("ziggurat sampler requested but feature is not enabled");
            Err(CoreError::SamplerFailure)
        }
        #[cfg(feature = "huffman")]
        SamplerVariant::Huffman => Ok(Box::new(huffman::HuffmanSampler::new(cfg, rng))),
        #[cfg(not(feature = "huffman"))]
        SamplerVariant::Huffman => {
            error!("huffman sampler requested but feature is not enabled");
            Err(CoreError::SamplerFailure)
        }
        #[cfg(feature = "bac")]
        SamplerVariant::Bac => Ok(Box::new(bac::BacSampler::new(cfg, rng))),
        #[cfg(not(feature = "bac"))]
        SamplerVariant::Bac => {
            error!("bac sampler requested but feature is not enabled");
            Err(CoreError::SamplerFailure)
        }
    }
}
