//! GPV preimage sampling: given a target syndrome and an orthogonalized
//! trapdoor basis, walk the 2N Gram-Schmidt rows from the last to the
//! first, sampling a per-row Gaussian offset centered at that row's
//! projection coefficient and subtracting it from the running remainder.

use super::basis::{BasisB, BasisGs};
use crate::error::{CoreError, CoreResult};
use crate::gaussian::bootstrap::BootstrapSampler;
use crate::gaussian::cdt::CdtSampler;
use crate::gaussian::{Precision, Sampler, SamplerConfig, SamplerVariant};
use crate::poly::small::PolyZ;
use crate::rng::{seeded_rng, EntropySource, RngDomain};
use tracing::warn;

/// Sample a short vector `(v1, v2)` such that `v2 + h*v1 = target (mod q)`,
/// `h` the public key derived from this basis: `target` occupies the first
/// N coordinates of the 2N-dimensional syndrome, the remaining N are zero,
/// and every row of the basis satisfies the same relation with `target`
/// replaced by zero, so any integer combination of rows — including the
/// running remainder this function walks down to `(v1, v2)` — preserves it.
///
/// `bootstrap` selects the row-sampler construction strategy: `false`
/// builds an exact fresh sampler at each row's own width (`s_f / ||b*_j||`);
/// `true` shares one base sampler per half via Micciancio-Walter
/// convolution, trading a small amount of extra rejection-sampling work in
/// the convolution offset for not rebuilding a table every row.
pub fn sample_preimage(
    basis: &BasisB,
    gs: &BasisGs,
    target: &[i64],
    s_f: f64,
    bootstrap: bool,
    entropy: &EntropySource,
    nonce: &[u8],
) -> CoreResult<(PolyZ, PolyZ)> {
    let n = basis.n();
    let dim = gs.dim();
    if target.len() != n {
        return Err(CoreError::InvalidInput);
    }

    let mut ci: Vec<f64> = target.iter().map(|&x| x as f64).collect();
    ci.resize(dim, 0.0);

    let halves = [(n, dim), (0, n)];
    for (lo, hi) in halves {
        let sigmas: Vec<f64> = (lo..hi).map(|j| s_f * gs.inv_norm(j)).collect();
        let sigma_min = sigmas.iter().cloned().fold(f64::INFINITY, f64::min);
        let smoothing = smoothing_parameter(dim);

        let mut shared = if bootstrap {
            build_bootstrap(sigma_min, smoothing, entropy, nonce, lo)?
        } else {
            None
        };

        for j in (lo..hi).rev() {
            let row = gs.row(j);
            let dot: f64 = ci.iter().zip(row).map(|(a, b)| a * b).sum();
            let d = dot * gs.inv_norm(j) * gs.inv_norm(j);
            let sigma_j = s_f * gs.inv_norm(j);

            let z = match shared.as_mut() {
                Some(boot) => match boot.sample(sigma_j, d) {
                    Ok(z) => z,
                    Err(_) => {
                        warn!("bootstrap convolution unstable at row {j}, falling back to a direct sampler");
                        sample_direct(sigma_j, entropy, nonce, j)?
                    }
                },
                None => sample_direct(sigma_j, entropy, nonce, j)?,
            };

            let basis_row = basis.row(j);
            for (c, b) in ci.iter_mut().zip(&basis_row) {
                *c -= z as f64 * b;
            }
        }
    }

    let v1 = PolyZ::from_coeffs(ci[n..dim].iter().map(|&x| x.round() as i64).collect());
    let v2 = PolyZ::from_coeffs(ci[0..n].iter().map(|&x| x.round() as i64).collect());
    Ok((v1, v2))
}

fn build_bootstrap(
    sigma_max: f64,
    sigma_smoothing: f64,
    entropy: &EntropySource,
    nonce: &[u8],
    row_tag: usize,
) -> CoreResult<Option<BootstrapSampler<CdtSampler>>> {
    let cfg = SamplerConfig {
        variant: SamplerVariant::Cdt,
        precision: Precision::P64,
        sigma: sigma_max,
        tail: 10,
        blinding: false,
        bootstrap: true,
    };
    cfg.validate()?;
    let mut row_nonce = nonce.to_vec();
    row_nonce.extend_from_slice(&(row_tag as u64).to_le_bytes());
    let rng = Box::new(seeded_rng(entropy, RngDomain::Preimage, &row_nonce)?);
    let base = CdtSampler::new(cfg, rng);
    Ok(Some(BootstrapSampler::new(base, sigma_max, sigma_smoothing)))
}

fn sample_direct(sigma: f64, entropy: &EntropySource, nonce: &[u8], row_tag: usize) -> CoreResult<i64> {
    let cfg = SamplerConfig {
        variant: SamplerVariant::Cdt,
        precision: Precision::P64,
        sigma,
        tail: 10,
        blinding: false,
        bootstrap: false,
    };
    cfg.validate()?;
    let mut row_nonce = nonce.to_vec();
    row_nonce.extend_from_slice(&(row_tag as u64).to_le_bytes());
    let rng = Box::new(seeded_rng(entropy, RngDomain::Preimage, &row_nonce)?);
    let mut sampler = CdtSampler::new(cfg, rng);
    Ok(sampler.sample(0.0))
}

/// Conservative smoothing-parameter estimate for Z^dim at `eps = 2^-64`:
/// `sqrt(ln(2*dim/eps) / pi)`.
fn smoothing_parameter(dim: usize) -> f64 {
    let eps = 2f64.powi(-64);
    ((2.0 * dim as f64 / eps).ln() / std::f64::consts::PI).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpv::keygen::generate;
    use crate::params::Params;

    #[test]
    fn preimage_of_zero_target_is_small() {
        let params = Params::new(16, 12289, 10).unwrap();
        let entropy = EntropySource([3u8; 32]);
        let keypair = generate(&params, &entropy, b"preimage-test").unwrap();
        let gs = BasisGs::compute(&keypair.basis);
        let target = vec![0i64; params.n as usize];
        let (v1, v2) = sample_preimage(
            &keypair.basis,
            &gs,
            &target,
            params.gs_norm_bound(),
            false,
            &entropy,
            b"preimage-nonce",
        )
        .unwrap();
        let bound = (params.gs_norm_bound() * params.gs_norm_bound() * 4.0) as i128;
        assert!(v1.norm_squared() < bound);
        assert!(v2.norm_squared() < bound);
    }
}
