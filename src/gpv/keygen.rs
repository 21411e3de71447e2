//! GPV trapdoor basis generation: sample short f, g, test their
//! Gram-Schmidt norm, then solve for F, G completing the NTRU identity
//! `f*G - g*F = q` via a chain of polynomial and integer extended-GCDs.

use super::basis::{gram_schmidt_norm, BasisB};
use crate::error::{CoreError, CoreResult};
use crate::gaussian::{create_sampler, Precision, SamplerConfig, SamplerVariant};
use crate::mpz::Mpz;
use crate::params::Params;
use crate::poly::mpz_poly::PolyMpz;
use crate::poly::small::PolyZ;
use crate::rng::EntropySource;
use tracing::{debug, warn};

/// Outer retry budget for the whole f,g sample-and-solve loop (sampling a
/// bad basis, an unlucky prime during XGCD, or an F,G reduction that
/// doesn't terminate all land back here to resample f, g from scratch).
const KEYGEN_RETRY_BUDGET: u32 = 1024;

/// Bound on the F, G reduction loop (subtracting multiples of f, g from a
/// candidate F, G until the quotient polynomial k vanishes).
const REDUCTION_LOOP_LIMIT: u32 = 16;

pub struct Keypair {
    pub basis: BasisB,
}

/// Generate a complete GPV trapdoor basis for the given ring parameters.
pub fn generate(params: &Params, entropy: &EntropySource, nonce: &[u8]) -> CoreResult<Keypair> {
    let n = params.n as usize;
    let q = params.q;
    let bound = params.gs_norm_bound();
    let sigma = params.sigma_key();

    for retry in 0..KEYGEN_RETRY_BUDGET {
        let mut rng_nonce = nonce.to_vec();
        rng_nonce.extend_from_slice(&retry.to_le_bytes());

        let (f, g) = sample_fg(n, sigma, entropy, &rng_nonce)?;

        let gs_norm = gram_schmidt_norm(&f, &g, q);
        if !gs_norm.is_finite() || gs_norm > bound {
            debug!("keygen retry {retry}: Gram-Schmidt norm {gs_norm} exceeds bound {bound}");
            continue;
        }

        match solve_fg(&f, &g, n, q) {
            Ok((big_f, big_g)) => {
                let basis = BasisB::new(f, g, big_f, big_g, q);
                if basis.verify_ntru_identity() {
                    return Ok(Keypair { basis });
                }
                debug!("keygen retry {retry}: NTRU identity check failed, resampling");
            }
            Err(CoreError::NumericInstability) => {
                debug!("keygen retry {retry}: XGCD chain did not stabilise, resampling");
            }
            Err(e) => return Err(e),
        }
    }
    warn!("keygen exhausted its retry budget without producing a valid basis");
    Err(CoreError::NumericInstability)
}

/// Public key `h = g * f^-1 mod q`, recomputed from a basis's trapdoor
/// polynomials. Fails if f is not invertible mod q, which a correctly
/// generated basis never exhibits.
pub fn public_key(basis: &BasisB, q: u64) -> CoreResult<PolyZ> {
    let n = basis.f().n();
    let f_mpz = PolyMpz::from_i64_coeffs(basis.f().coeffs());
    let (r_f, rho_f) = f_mpz.xgcd_mod_cyclotomic(n)?;
    let q_mpz = Mpz::from_u64(q);
    let inv_r_f = r_f
        .invmod(&q_mpz)
        .ok_or(CoreError::InvalidInput)?;
    let inv_f = rho_f.scale(&inv_r_f);

    let check = inv_f.mul(&f_mpz).reduce_cyclotomic(n);
    let check = mod_q_poly(&check, q);
    if check[0] != 1 || check[1..].iter().any(|&c| c != 0) {
        return Err(CoreError::InvalidInput);
    }

    let g_mpz = PolyMpz::from_i64_coeffs(basis.g().coeffs());
    let h = inv_f.mul(&g_mpz).reduce_cyclotomic(n);
    let h = mod_q_poly(&h, q);
    Ok(PolyZ::from_coeffs(h.iter().map(|&c| c as i64).collect()))
}

fn sample_fg(
    n: usize,
    sigma: f64,
    entropy: &EntropySource,
    nonce: &[u8],
) -> CoreResult<(PolyZ, PolyZ)> {
    let cfg = SamplerConfig {
        variant: SamplerVariant::Cdt,
        precision: Precision::P64,
        sigma,
        tail: 10,
        blinding: false,
        bootstrap: false,
    };
    let mut f_nonce = nonce.to_vec();
    f_nonce.push(0);
    let mut g_nonce = nonce.to_vec();
    g_nonce.push(1);

    let mut f_sampler = create_sampler(cfg, entropy, &f_nonce)?;
    let mut g_sampler = create_sampler(cfg, entropy, &g_nonce)?;
    let f: Vec<i64> = (0..n).map(|_| f_sampler.sample(0.0)).collect();
    let g: Vec<i64> = (0..n).map(|_| g_sampler.sample(0.0)).collect();
    Ok((PolyZ::from_coeffs(f), PolyZ::from_coeffs(g)))
}

/// Solve for F, G completing the NTRU identity, given accepted f, g.
fn solve_fg(f: &PolyZ, g: &PolyZ, n: usize, q: u64) -> CoreResult<(PolyZ, PolyZ)> {
    let f_mpz = PolyMpz::from_i64_coeffs(f.coeffs());
    let g_mpz = PolyMpz::from_i64_coeffs(g.coeffs());
    let q_mpz = Mpz::from_u64(q);

    let (r_f, rho_f) = f_mpz.xgcd_mod_cyclotomic(n)?;
    if r_f.gcd(&q_mpz).cmp_abs(&Mpz::from_i64(1)) != std::cmp::Ordering::Equal {
        return Err(CoreError::NumericInstability);
    }
    let (r_g, rho_g) = g_mpz.xgcd_mod_cyclotomic(n)?;
    if r_g.gcd(&q_mpz).cmp_abs(&Mpz::from_i64(1)) != std::cmp::Ordering::Equal {
        return Err(CoreError::NumericInstability);
    }

    let (gcd1, alpha, beta) = r_f.xgcd(&r_g);
    if gcd1.cmp_abs(&Mpz::from_i64(1)) != std::cmp::Ordering::Equal {
        return Err(CoreError::NumericInstability);
    }

    // F = -q * rho_g * beta, G = q * rho_f * alpha
    let neg_q_beta = beta.mul(&q_mpz).neg();
    let q_alpha = alpha.mul(&q_mpz);
    let mut big_f = rho_g.scale(&neg_q_beta);
    let mut big_g = rho_f.scale(&q_alpha);

    let f_bar = adjoint(&f_mpz, n);
    let g_bar = adjoint(&g_mpz, n);
    let den = f_mpz.mul(&f_bar).add(&g_mpz.mul(&g_bar)).reduce_cyclotomic(n);
    let (scale, rho_den) = den.xgcd_mod_cyclotomic(n)?;

    for j in 0..REDUCTION_LOOP_LIMIT {
        let num = big_f
            .mul(&f_bar)
            .add(&big_g.mul(&g_bar))
            .reduce_cyclotomic(n);
        let k = num.mul(&rho_den).reduce_cyclotomic(n);
        let k = divquo_poly(&k, &scale)?;

        if k.coeffs().iter().all(|c| *c == Mpz::zero()) {
            break;
        }
        if j == REDUCTION_LOOP_LIMIT - 1 {
            return Err(CoreError::NumericInstability);
        }

        big_f = big_f.sub(&k.mul(&f_mpz)).reduce_cyclotomic(n);
        big_g = big_g.sub(&k.mul(&g_mpz)).reduce_cyclotomic(n);
    }

    let f_out: Vec<i64> = big_f
        .coeffs()
        .iter()
        .map(|c| c.to_i64().unwrap_or(0))
        .collect();
    let g_out: Vec<i64> = big_g
        .coeffs()
        .iter()
        .map(|c| c.to_i64().unwrap_or(0))
        .collect();
    let mut f_out = f_out;
    let mut g_out = g_out;
    f_out.resize(n, 0);
    g_out.resize(n, 0);
    Ok((PolyZ::from_coeffs(f_out), PolyZ::from_coeffs(g_out)))
}

/// Cyclotomic adjoint over `PolyMpz`: `p_bar[0] = p[0]`, `p_bar[i] = -p[n-i]`.
fn adjoint(p: &PolyMpz, n: usize) -> PolyMpz {
    let mut out = vec![Mpz::zero(); n];
    let coeffs = p.coeffs();
    out[0] = coeffs.first().cloned().unwrap_or_else(Mpz::zero);
    for i in 1..n {
        let c = coeffs.get(n - i).cloned().unwrap_or_else(Mpz::zero);
        out[i] = c.neg();
    }
    PolyMpz::from_coeffs(out)
}

fn divquo_poly(p: &PolyMpz, divisor: &Mpz) -> CoreResult<PolyMpz> {
    let mut out = Vec::with_capacity(p.len());
    for c in p.coeffs() {
        out.push(c.divquo(divisor).ok_or(CoreError::NumericInstability)?);
    }
    Ok(PolyMpz::from_coeffs(out))
}

fn mod_q_poly(p: &PolyMpz, q: u64) -> Vec<i64> {
    let q_mpz = Mpz::from_u64(q);
    p.coeffs()
        .iter()
        .map(|c| c.modulo(&q_mpz).and_then(|m| m.to_i64()).unwrap_or(0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_a_verified_basis() {
        let params = Params::new(16, 12289, 10).unwrap();
        let entropy = EntropySource([7u8; 32]);
        let keypair = generate(&params, &entropy, b"keygen-test").unwrap();
        assert!(keypair.basis.verify_ntru_identity());
    }

    #[test]
    fn public_key_round_trips_through_inverse_f() {
        let params = Params::new(16, 12289, 10).unwrap();
        let entropy = EntropySource([11u8; 32]);
        let keypair = generate(&params, &entropy, b"keygen-pubkey").unwrap();
        let h = public_key(&keypair.basis, params.q).unwrap();
        assert_eq!(h.n(), params.n as usize);
    }
}
