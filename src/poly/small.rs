//! `PolyZ`: a dense array of N signed machine integers representing an
//! element of Z\[x\]/(x^N+1). This is the type GPV basis generation and the
//! preimage sampler push through the discrete Gaussian samplers and the FFT
//! helper; the unbounded-precision `PolyMpz` in `mpz_poly` is reserved for
//! the XGCD/resultant machinery that needs it.

use zeroize::Zeroize;

/// Owned, fixed-length polynomial over Z, implicitly reduced mod (x^N+1).
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
pub struct PolyZ {
    coeffs: Vec<i64>,
}

impl PolyZ {
    pub fn zero(n: usize) -> Self {
        Self {
            coeffs: vec![0; n],
        }
    }

    pub fn from_coeffs(coeffs: Vec<i64>) -> Self {
        Self { coeffs }
    }

    pub fn n(&self) -> usize {
        self.coeffs.len()
    }

    pub fn coeffs(&self) -> &[i64] {
        &self.coeffs
    }

    pub fn coeffs_mut(&mut self) -> &mut [i64] {
        &mut self.coeffs
    }

    pub fn get(&self, i: usize) -> i64 {
        self.coeffs[i]
    }

    /// Squared Euclidean norm, `sum(c_i^2)`.
    pub fn norm_squared(&self) -> i128 {
        self.coeffs.iter().map(|&c| (c as i128) * (c as i128)).sum()
    }

    pub fn add(&self, other: &Self) -> Self {
        assert_eq!(self.n(), other.n());
        Self {
            coeffs: self
                .coeffs
                .iter()
                .zip(&other.coeffs)
                .map(|(a, b)| a + b)
                .collect(),
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        assert_eq!(self.n(), other.n());
        Self {
            coeffs: self
                .coeffs
                .iter()
                .zip(&other.coeffs)
                .map(|(a, b)| a - b)
                .collect(),
        }
    }

    pub fn neg(&self) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|&c| -c).collect(),
        }
    }

    pub fn scale(&self, k: i64) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|&c| c * k).collect(),
        }
    }

    /// Negacyclic convolution mod (x^N+1), schoolbook, with the reduction
    /// folded directly into the accumulation rather than computed as a
    /// separate pass, since `PolyZ` products never need the unreduced
    /// double-length result.
    pub fn mul_mod_cyclotomic(&self, other: &Self) -> Self {
        let n = self.n();
        assert_eq!(n, other.n());
        let mut out = vec![0i64; n];
        for i in 0..n {
            if self.coeffs[i] == 0 {
                continue;
            }
            for j in 0..n {
                if other.coeffs[j] == 0 {
                    continue;
                }
                let idx = i + j;
                let prod = self.coeffs[i] * other.coeffs[j];
                if idx < n {
                    out[idx] += prod;
                } else {
                    out[idx - n] -= prod;
                }
            }
        }
        Self { coeffs: out }
    }

    /// Adjoint under the cyclotomic involution: `f_bar(x) = f(1/x) mod (x^N+1)`,
    /// i.e. `f_bar_0 = f_0`, `f_bar_i = -f_{N-i}` for `i > 0`. Used by the
    /// Gram-Schmidt norm computation (`f * f_bar + g * g_bar`).
    pub fn adjoint(&self) -> Self {
        let n = self.n();
        let mut out = vec![0i64; n];
        out[0] = self.coeffs[0];
        for i in 1..n {
            out[i] = -self.coeffs[n - i];
        }
        Self { coeffs: out }
    }

    /// One step of the negacyclic rotation used by the fast MGS recurrence:
    /// shift every coefficient up by one index, and the coefficient that
    /// falls off the top re-enters at index 0 negated.
    pub fn rotate_negacyclic(&self) -> Self {
        let n = self.n();
        let mut out = vec![0i64; n];
        out[0] = -self.coeffs[n - 1];
        out[1..n].copy_from_slice(&self.coeffs[0..n - 1]);
        Self { coeffs: out }
    }

    pub fn to_f64(&self) -> Vec<f64> {
        self.coeffs.iter().map(|&c| c as f64).collect()
    }
}
