//! Radix-2 Cooley-Tukey FFT over `Complex64`, used to evaluate a ring
//! element at the 2N-th roots of unity so the Gram-Schmidt norm test can
//! work with pointwise magnitudes instead of a full coefficient-domain
//! Gram matrix.

use num_complex::Complex64;
use std::f64::consts::PI;

/// In-place-equivalent forward FFT; `input.len()` must be a power of two.
pub fn fft(input: &[Complex64]) -> Vec<Complex64> {
    let n = input.len();
    let mut a = input.to_vec();
    bit_reverse_permute(&mut a);

    let mut len = 2;
    while len <= n {
        let ang = -2.0 * PI / (len as f64);
        let wlen = Complex64::from_polar(1.0, ang);
        for i in (0..n).step_by(len) {
            let mut w = Complex64::new(1.0, 0.0);
            for j in 0..len / 2 {
                let u = a[i + j];
                let v = a[i + j + len / 2] * w;
                a[i + j] = u + v;
                a[i + j + len / 2] = u - v;
                w *= wlen;
            }
        }
        len <<= 1;
    }
    a
}

/// Inverse FFT, normalized by `1/n`.
pub fn ifft(input: &[Complex64]) -> Vec<Complex64> {
    let n = input.len();
    let mut conj: Vec<Complex64> = input.iter().map(|z| z.conj()).collect();
    conj = fft(&conj);
    conj.iter().map(|z| z.conj() / n as f64).collect()
}

fn bit_reverse_permute(a: &mut [Complex64]) {
    let n = a.len();
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            a.swap(i, j);
        }
    }
}

/// Evaluate a length-N integer polynomial at the N-th roots of unity,
/// zero-padding to the next power of two if N isn't already one.
pub fn eval_roots(coeffs: &[i64]) -> Vec<Complex64> {
    let n = coeffs.len().next_power_of_two();
    let mut padded: Vec<Complex64> = coeffs
        .iter()
        .map(|&c| Complex64::new(c as f64, 0.0))
        .collect();
    padded.resize(n, Complex64::new(0.0, 0.0));
    fft(&padded)
}

/// Squared Euclidean norm of a polynomial recovered from its FFT
/// evaluations via Parseval's theorem: `sum |c_i|^2 == (1/n) sum |F(w^k)|^2`.
pub fn norm_squared_from_evals(evals: &[Complex64]) -> f64 {
    let n = evals.len() as f64;
    evals.iter().map(|z| z.norm_sqr()).sum::<f64>() / n
}
