//! Ring parameters and the static parameter-set registry.
//!
//! `Params` is the immutable record shared by every other component; the
//! registry in this module exposes a small integer id that maps to a static
//! record, so callers can refer to a parameter set without re-stating its
//! fields, while the core's behaviour depends only on the numeric fields,
//! never on the id.

use crate::error::{CoreError, CoreResult};
use tracing::error;

/// Dimension N, modulus q, and the values derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    /// Ring dimension; must be a power of two.
    pub n: u32,
    /// Prime modulus; q ≡ 1 (mod 2N).
    pub q: u64,
    /// ⌈log2 q⌉
    pub q_bits: u32,
    /// Base tail parameter for Gaussian sampler table construction.
    pub tail: u32,
}

impl Params {
    /// Validate and construct: N must be a power of two, and q ≡ 1 (mod 2N)
    /// so that Z_q has a primitive 2N-th root of unity.
    pub fn new(n: u32, q: u64, tail: u32) -> CoreResult<Self> {
        if n == 0 || !n.is_power_of_two() {
            error!("invalid N={n}: not a power of two");
            return Err(CoreError::InvalidParameter);
        }
        if q < 3 || q % (2 * n as u64) != 1 {
            error!("invalid q={q} for N={n}: q mod 2N must equal 1");
            return Err(CoreError::InvalidParameter);
        }
        let q_bits = 64 - q.leading_zeros();
        Ok(Self { n, q, q_bits, tail })
    }

    /// sigma_key = sqrt(1.36 * q / (2N)), the Gaussian width used to sample
    /// the trapdoor polynomials f, g in GPV basis generation.
    pub fn sigma_key(&self) -> f64 {
        (1.36_f64 * self.q as f64 / (2.0 * self.n as f64)).sqrt()
    }

    /// 1.17 * sqrt(q), the Gram-Schmidt norm acceptance bound.
    pub fn gs_norm_bound(&self) -> f64 {
        1.17_f64 * (self.q as f64).sqrt()
    }

    /// Bit width of the signed coefficients of f, g in the persisted private
    /// key: 1 + ceil(log2(6 * 1.17 * sqrt(q / (2N)))).
    pub fn fg_coeff_bits(&self) -> u32 {
        let bound = 6.0_f64 * 1.17 * (self.q as f64 / (2.0 * self.n as f64)).sqrt();
        1 + bound.log2().ceil() as u32
    }

    /// Bit width of the signed coefficients of F, G: q_bits1 + 5.
    pub fn fg_big_coeff_bits(&self) -> u32 {
        self.fg_coeff_bits() + 5
    }
}

/// Small integer identifier for a static parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamSetId(pub u16);

/// A named, immutable parameter record. The `id` is opaque to the core; it
/// exists only so callers can refer to a parameter set without re-stating
/// its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSet {
    pub id: ParamSetId,
    pub name: &'static str,
    pub params: Params,
}

/// `N = 16` toy parameter set used by the deterministic small-keygen
/// end-to-end scenario. Not secure; test-only.
pub const TOY_16: ParamSet = ParamSet {
    id: ParamSetId(0),
    name: "toy-16",
    params: Params {
        n: 16,
        q: 12289,
        q_bits: 14,
        tail: 13,
    },
};

/// Falcon-512-shaped parameter set.
pub const FALCON_512: ParamSet = ParamSet {
    id: ParamSetId(1),
    name: "falcon-512",
    params: Params {
        n: 512,
        q: 12289,
        q_bits: 14,
        tail: 13,
    },
};

/// Falcon-1024-shaped parameter set.
pub const FALCON_1024: ParamSet = ParamSet {
    id: ParamSetId(2),
    name: "falcon-1024",
    params: Params {
        n: 1024,
        q: 12289,
        q_bits: 14,
        tail: 13,
    },
};

/// Look up a static parameter set by id.
pub fn by_id(id: ParamSetId) -> CoreResult<ParamSet> {
    [TOY_16, FALCON_512, FALCON_1024]
        .into_iter()
        .find(|set| set.id == id)
        .ok_or_else(|| {
            error!("unknown parameter set id {}", id.0);
            CoreError::InvalidParameter
        })
}
