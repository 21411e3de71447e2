//! `PolyMpz`: arbitrary-precision polynomial arithmetic
//! over Z\[x\], tuned to the operations GPV basis generation calls. Degree
//! is recomputed on demand rather than tracked incrementally, since a
//! polynomial's high coefficients may be left zero.

use crate::comb::Comb;
use crate::error::{CoreError, CoreResult};
use crate::limb::BarrettModulus;
use crate::mpz::Mpz;
use crate::poly::modp;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyMpz {
    coeffs: Vec<Mpz>,
}

/// Internal policy choice for `mul`, exposed so tests can force a specific
/// path and assert the three algorithms agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MulAlgorithm {
    Schoolbook,
    Karatsuba,
    Kronecker,
}

impl PolyMpz {
    pub fn zero(len: usize) -> Self {
        Self {
            coeffs: vec![Mpz::zero(); len],
        }
    }

    pub fn from_coeffs(coeffs: Vec<Mpz>) -> Self {
        Self { coeffs }
    }

    pub fn from_i64_coeffs(coeffs: &[i64]) -> Self {
        Self {
            coeffs: coeffs.iter().map(|&c| Mpz::from_i64(c)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn coeffs(&self) -> &[Mpz] {
        &self.coeffs
    }

    /// Highest index with a nonzero coefficient, or `-1` if identically
    /// zero.
    pub fn degree(&self) -> isize {
        for i in (0..self.coeffs.len()).rev() {
            if !self.coeffs[i].is_zero() {
                return i as isize;
            }
        }
        -1
    }

    pub fn leading_coeff(&self) -> Mpz {
        let d = self.degree();
        if d < 0 {
            Mpz::zero()
        } else {
            self.coeffs[d as usize].clone()
        }
    }

    pub fn trimmed(&self) -> Self {
        let d = self.degree();
        if d < 0 {
            return Self { coeffs: vec![] };
        }
        Self {
            coeffs: self.coeffs[..=d as usize].to_vec(),
        }
    }

    fn coeff(&self, i: usize) -> Mpz {
        self.coeffs.get(i).cloned().unwrap_or_else(Mpz::zero)
    }

    /// Coefficient-wise sum; the shorter operand is implicitly zero-extended.
    pub fn add(&self, other: &Self) -> Self {
        let len = self.coeffs.len().max(other.coeffs.len());
        Self {
            coeffs: (0..len).map(|i| self.coeff(i).add(&other.coeff(i))).collect(),
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        let len = self.coeffs.len().max(other.coeffs.len());
        Self {
            coeffs: (0..len).map(|i| self.coeff(i).sub(&other.coeff(i))).collect(),
        }
    }

    pub fn neg(&self) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(Mpz::neg).collect(),
        }
    }

    pub fn scale(&self, k: &Mpz) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|c| c.mul(k)).collect(),
        }
    }

    /// Multiplication policy: schoolbook for small inputs, Karatsuba for
    /// dense medium-sized inputs, Kronecker substitution when total
    /// coefficient bit-count dominates. Deterministic so that test vectors
    /// can target each path directly.
    pub fn choose_algorithm(a: &Self, b: &Self) -> MulAlgorithm {
        let a = a.trimmed();
        let b = b.trimmed();
        let len = a.len().max(b.len());
        if len == 0 {
            return MulAlgorithm::Schoolbook;
        }
        let max_bits = a
            .coeffs
            .iter()
            .chain(b.coeffs.iter())
            .map(Mpz::bit_size)
            .max()
            .unwrap_or(0);
        let max_limbs = max_bits.div_ceil(64);

        if len < 7 || (max_limbs > 12 && len < 16) {
            MulAlgorithm::Schoolbook
        } else if max_bits > 2048 {
            MulAlgorithm::Kronecker
        } else {
            MulAlgorithm::Karatsuba
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        self.mul_with(other, Self::choose_algorithm(self, other))
    }

    pub fn mul_with(&self, other: &Self, algo: MulAlgorithm) -> Self {
        match algo {
            MulAlgorithm::Schoolbook => mul_schoolbook(self, other),
            MulAlgorithm::Karatsuba => mul_karatsuba(self, other),
            MulAlgorithm::Kronecker => mul_kronecker(self, other),
        }
    }

    /// `out[i] = in[i] - in[N+i]` for `i in [0,N)`, upper half discarded:
    /// reduction modulo `x^N+1`.
    pub fn reduce_cyclotomic(&self, n: usize) -> Self {
        let mut out = vec![Mpz::zero(); n];
        for i in 0..n {
            let lo = self.coeff(i);
            let hi = self.coeff(n + i);
            out[i] = lo.sub(&hi);
        }
        Self { coeffs: out }
    }

    /// Classical pseudo-division: returns `(q, r, d)` with
    /// `lc(b)^d * self = b*q + r`, `deg(r) < deg(b)`. Exact (`d == 0`) when
    /// `lc(b) == +-1`.
    pub fn pseudo_divrem(&self, b: &Self) -> Option<(Self, Self, u32)> {
        let db = b.degree();
        if db < 0 {
            return None;
        }
        let lc_b = b.leading_coeff();
        let mut r = self.trimmed();
        let mut d = 0u32;
        let da0 = self.degree();
        if da0 < db {
            return Some((Self::zero(0), r, 0));
        }
        let mut q = vec![Mpz::zero(); (da0 - db) as usize + 1];

        loop {
            let dr = r.degree();
            if dr < db {
                break;
            }
            let shift = (dr - db) as usize;
            let lc_r = r.leading_coeff();
            // r := lc(b)*r - lc(r)*x^shift*b, so the result stays in Z[x].
            let scaled_r = r.scale(&lc_b);
            let shifted_b = b.shift_scale(shift, &lc_r);
            r = scaled_r.sub(&shifted_b).trimmed();
            for c in q.iter_mut() {
                *c = c.mul(&lc_b);
            }
            if shift < q.len() {
                q[shift] = q[shift].add(&lc_r);
            }
            d += 1;
        }
        Some((Self { coeffs: q }.trimmed(), r, d))
    }

    /// `x^shift * scalar * self`.
    fn shift_scale(&self, shift: usize, scalar: &Mpz) -> Self {
        let mut out = vec![Mpz::zero(); shift + self.coeffs.len()];
        for (i, c) in self.coeffs.iter().enumerate() {
            out[i + shift] = c.mul(scalar);
        }
        Self { coeffs: out }
    }

    /// GCD of all coefficients.
    pub fn content(&self) -> Mpz {
        self.coeffs
            .iter()
            .fold(Mpz::zero(), |acc, c| acc.gcd(c))
    }

    /// `self / content(self)`. Identity on the zero polynomial.
    pub fn primitive_part(&self) -> Self {
        let c = self.content();
        if c.is_zero() {
            return self.clone();
        }
        Self {
            coeffs: self
                .coeffs
                .iter()
                .map(|x| x.divquo(&c).unwrap_or_else(Mpz::zero))
                .collect(),
        }
    }

    /// Resultant, dispatching on a fixed length threshold: the modular
    /// algorithm once `len(b) > 128`, the exact Sylvester-matrix method
    /// otherwise.
    pub fn resultant(&self, other: &Self) -> Mpz {
        if other.len() > 128 {
            self.resultant_modular(other)
        } else {
            self.resultant_euclidean(other)
        }
    }

    /// Exact resultant via fraction-free Gaussian elimination (Bareiss'
    /// algorithm) on the Sylvester matrix. Computes the same algebraic
    /// object as Cohen's subresultant PRS (Algorithm 3.3.7) without that
    /// algorithm's delicate integral-exponent bookkeeping.
    pub fn resultant_euclidean(&self, other: &Self) -> Mpz {
        let a = self.trimmed();
        let b = other.trimmed();
        let da = a.degree();
        let db = b.degree();
        if da < 0 || db < 0 {
            return Mpz::zero();
        }
        let size = da as usize + db as usize;
        if size == 0 {
            return Mpz::from_i64(1);
        }
        let mut m = sylvester_matrix(&a, &b, da as usize, db as usize);
        bareiss_determinant(&mut m)
    }

    /// Modular resultant: estimate a bit-bound, draw primes not dividing
    /// `lc(a)*lc(b)`, compute the resultant mod each prime via
    /// `poly::modp::resultant`, and recombine with signed CRT.
    pub fn resultant_modular(&self, other: &Self) -> Mpz {
        let a = self.trimmed();
        let b = other.trimmed();
        let da = a.degree().max(0) as u64;
        let db = b.degree().max(0) as u64;
        if a.degree() < 0 || b.degree() < 0 {
            return Mpz::zero();
        }

        let bits_a = a
            .coeffs
            .iter()
            .map(Mpz::bit_size)
            .max()
            .unwrap_or(1)
            .max(1);
        let bits_b = b
            .coeffs
            .iter()
            .map(Mpz::bit_size)
            .max()
            .unwrap_or(1)
            .max(1);
        let deg_sum = da + db + 1;
        let bound_bits = deg_sum
            * ((10 * deg_sum + 26) as f64 / 27.0).log2().ceil() as u64
            + 3
            + da * bits_b
            + db * bits_a;

        let forbidden = a.leading_coeff().mul(&b.leading_coeff());
        let mut comb = Comb::new();
        let mut acc = Mpz::zero();

        while comb.modulus().bit_size() < bound_bits + 16 {
            let prime = comb.add_prime(&forbidden);
            let p = prime.to_i64().expect("CRT primes fit in i64") as u64;
            let modulus = BarrettModulus::new(p);
            let a_p = mpz_poly_mod_p(&a, &modulus);
            let b_p = mpz_poly_mod_p(&b, &modulus);
            let r_p = modp::resultant(&a_p, &b_p, &modulus);
            let residue = Mpz::from_u64(r_p);
            acc = if comb.num_primes() == 1 {
                residue
            } else {
                comb.crt_extend(&acc, &residue)
            };
        }

        to_signed(&acc, comb.modulus())
    }

    /// Polynomial GCD over Z\[x\] via the modular algorithm: reduce by
    /// contents, accumulate the GCD mod a growing set of primes via CRT,
    /// and terminate once a candidate divides both inputs exactly.
    pub fn gcd_modular(&self, other: &Self) -> CoreResult<Self> {
        let ca = self.content();
        let cb = other.content();
        let content_gcd = ca.gcd(&cb);
        let a = self.primitive_part();
        let b = other.primitive_part();

        if b.degree() < 0 {
            return Ok(a.scale(&content_gcd));
        }

        let int_lc_gcd = a.leading_coeff().gcd(&b.leading_coeff());
        let forbidden = a.leading_coeff().mul(&b.leading_coeff());
        let mut comb = Comb::new();
        let mut acc: Option<Self> = None;

        const PRIME_RETRY_BUDGET: usize = 256;
        for _ in 0..PRIME_RETRY_BUDGET {
            let prime = comb.add_prime(&forbidden);
            let p = prime.to_i64().expect("CRT primes fit in i64") as u64;
            let modulus = BarrettModulus::new(p);
            let a_p = mpz_poly_mod_p(&a, &modulus);
            let b_p = mpz_poly_mod_p(&b, &modulus);
            let (mut g_p, _, _) = modp::eea(&a_p, &b_p, &modulus);
            g_p = modp::trim(g_p);

            // Normalize so the leading coefficient matches int_lc_gcd mod p.
            let lc_p = *g_p.last().unwrap_or(&0);
            if lc_p == 0 {
                continue; // unlucky prime
            }
            let target = int_lc_gcd
                .modulo(&Mpz::from_u64(p))
                .unwrap_or_else(Mpz::zero)
                .to_i64()
                .unwrap_or(0) as u64;
            let scale = crate::limb::limb_inv_mod(lc_p, p);
            let scale = crate::limb::limb_mul_mod(scale, target, &modulus);
            for c in g_p.iter_mut() {
                *c = crate::limb::limb_mul_mod(*c, scale, &modulus);
            }

            let candidate = modp_to_mpz_poly(&g_p, &modulus, comb.num_primes() == 1, &comb, &acc);
            acc = Some(candidate);

            if let Some(ref cand) = acc {
                let cand_prim = cand.primitive_part();
                if divides_exactly(&a, &cand_prim) && divides_exactly(&b, &cand_prim) {
                    debug!("poly gcd stabilised after {} primes", comb.num_primes());
                    return Ok(cand_prim.scale(&content_gcd));
                }
            }
        }
        warn!("poly gcd_modular did not stabilise within the prime retry budget");
        Err(CoreError::NumericInstability)
    }

    /// Extended GCD over Z\[x\] modulo the monic cyclotomic `x^N+1`: for
    /// each acceptable prime, run the field EEA between `self` and
    /// `x^N+1`, lift with CRT, and stabilise across primes. Returns
    /// `(R, rho)` with `self * rho == R (mod x^N+1)` and `R` a scalar
    /// integer (the resultant of `self` and `x^N+1`, up to sign).
    pub fn xgcd_mod_cyclotomic(&self, n: usize) -> CoreResult<(Mpz, Self)> {
        let phi = cyclotomic(n);
        let forbidden = self.leading_coeff();
        let hadamard_floor = 4 + self
            .coeffs
            .iter()
            .map(Mpz::bit_size)
            .max()
            .unwrap_or(1);

        const PRIME_RETRY_BUDGET: usize = 512;
        const STABILITY_BOUND_BITS: u64 = 32768;

        'restart: loop {
            let mut comb = Comb::new();
            let mut acc_r: Option<Mpz> = None;
            let mut acc_s: Option<Self> = None;
            let mut prev_bits = (0u64, 0u64);
            let mut stable_rounds = 0u32;

            for attempt in 0..PRIME_RETRY_BUDGET {
                let prime = comb.add_prime(&forbidden);
                let p = prime.to_i64().expect("CRT primes fit in i64") as u64;
                let modulus = BarrettModulus::new(p);
                let f_p = mpz_poly_mod_p(self, &modulus);
                let phi_p = mpz_poly_mod_p(&phi, &modulus);
                let (g_p, s_p, _t_p) = modp::eea(&f_p, &phi_p, &modulus);
                let g_p = modp::trim(g_p);

                if modp::degree(&g_p) > 0 {
                    debug!("unlucky prime at attempt {attempt}: gcd degree > 0, retrying");
                    continue;
                }
                let r_residue = Mpz::from_u64(*g_p.first().unwrap_or(&0));
                let s_residue = modp_to_signed_poly(&s_p);

                let new_r = if comb.num_primes() == 1 {
                    r_residue
                } else {
                    comb.crt_extend(acc_r.as_ref().unwrap(), &r_residue)
                };
                let new_s = crt_extend_poly(&comb, acc_s.as_ref(), &s_residue);

                let signed_r = to_signed(&new_r, comb.modulus());
                let signed_s = to_signed_poly(&new_s, comb.modulus());

                let bits_r = signed_r.bit_size();
                let bits_s = signed_s
                    .coeffs
                    .iter()
                    .map(Mpz::bit_size)
                    .max()
                    .unwrap_or(0);

                if (bits_r, bits_s) == prev_bits {
                    stable_rounds += 1;
                } else {
                    stable_rounds = 0;
                }
                prev_bits = (bits_r, bits_s);

                acc_r = Some(new_r);
                acc_s = Some(new_s);

                if bits_r.max(bits_s) > STABILITY_BOUND_BITS {
                    warn!("xgcd_mod_cyclotomic exceeded the stability bound, restarting");
                    continue 'restart;
                }

                if stable_rounds >= 1 && comb.modulus().bit_size() >= hadamard_floor {
                    return Ok((signed_r, signed_s));
                }
            }
            warn!("xgcd_mod_cyclotomic exhausted its prime retry budget");
            return Err(CoreError::NumericInstability);
        }
    }
}

impl Default for PolyMpz {
    fn default() -> Self {
        Self { coeffs: vec![] }
    }
}

fn divides_exactly(a: &PolyMpz, b: &PolyMpz) -> bool {
    if b.degree() < 0 {
        return false;
    }
    matches!(a.pseudo_divrem(b), Some((_, r, _)) if r.degree() < 0)
}

fn mpz_poly_mod_p(a: &PolyMpz, modulus: &BarrettModulus) -> Vec<u64> {
    let p = Mpz::from_u64(modulus.m);
    modp::trim(
        a.coeffs
            .iter()
            .map(|c| c.modulo(&p).and_then(|r| r.to_i64()).unwrap_or(0) as u64)
            .collect(),
    )
}

fn modp_to_signed_poly(v: &[u64]) -> Vec<u64> {
    v.to_vec()
}

fn crt_extend_poly(comb: &Comb, prev: Option<&PolyMpz>, residue: &[u64]) -> PolyMpz {
    let len = prev.map(|p| p.len()).unwrap_or(0).max(residue.len());
    let mut out = vec![Mpz::zero(); len];
    for i in 0..len {
        let r = Mpz::from_u64(*residue.get(i).unwrap_or(&0));
        out[i] = match prev {
            Some(p) if comb.num_primes() > 1 => {
                comb.crt_extend(&p.coeff_or_zero(i), &r)
            }
            _ => r,
        };
    }
    PolyMpz { coeffs: out }
}

impl PolyMpz {
    fn coeff_or_zero(&self, i: usize) -> Mpz {
        self.coeffs.get(i).cloned().unwrap_or_else(Mpz::zero)
    }
}

fn modp_to_mpz_poly(
    v: &[u64],
    modulus: &BarrettModulus,
    first: bool,
    comb: &Comb,
    acc: &Option<PolyMpz>,
) -> PolyMpz {
    let _ = modulus;
    crt_extend_poly(comb, if first { None } else { acc.as_ref() }, v)
}

/// Map a value in `[0, modulus)` to the symmetric range `(-modulus/2, modulus/2]`.
fn to_signed(v: &Mpz, modulus: &Mpz) -> Mpz {
    let half = modulus.divquo(&Mpz::from_i64(2)).unwrap_or_else(Mpz::zero);
    if v.cmp_abs(&half) == std::cmp::Ordering::Greater || *v > half {
        v.sub(modulus)
    } else {
        v.clone()
    }
}

fn to_signed_poly(p: &PolyMpz, modulus: &Mpz) -> PolyMpz {
    PolyMpz {
        coeffs: p.coeffs.iter().map(|c| to_signed(c, modulus)).collect(),
    }
}

/// `x^n + 1`.
pub fn cyclotomic(n: usize) -> PolyMpz {
    let mut coeffs = vec![Mpz::zero(); n + 1];
    coeffs[0] = Mpz::from_i64(1);
    coeffs[n] = Mpz::from_i64(1);
    PolyMpz { coeffs }
}

fn mul_schoolbook(a: &PolyMpz, b: &PolyMpz) -> PolyMpz {
    let a = a.trimmed();
    let b = b.trimmed();
    if a.is_empty() || b.is_empty() {
        return PolyMpz { coeffs: vec![] };
    }
    let mut out = vec![Mpz::zero(); a.len() + b.len() - 1];
    for (i, ai) in a.coeffs.iter().enumerate() {
        if ai.is_zero() {
            continue;
        }
        for (j, bj) in b.coeffs.iter().enumerate() {
            if bj.is_zero() {
                continue;
            }
            out[i + j] = out[i + j].add(&ai.mul(bj));
        }
    }
    PolyMpz { coeffs: out }
}

/// Classical (non-cyclic) Karatsuba multiplication, padded to a power of
/// two length.
fn mul_karatsuba(a: &PolyMpz, b: &PolyMpz) -> PolyMpz {
    let a = a.trimmed();
    let b = b.trimmed();
    if a.is_empty() || b.is_empty() {
        return PolyMpz { coeffs: vec![] };
    }
    if a.len() < 7 || b.len() < 7 {
        return mul_schoolbook(&a, &b);
    }
    let n = a.len().max(b.len());
    let half = n.div_ceil(2);

    let (a_lo, a_hi) = split(&a, half);
    let (b_lo, b_hi) = split(&b, half);

    let lo = mul_karatsuba(&a_lo, &b_lo);
    let hi = mul_karatsuba(&a_hi, &b_hi);
    let mid = mul_karatsuba(&a_lo.add(&a_hi), &b_lo.add(&b_hi))
        .sub(&lo)
        .sub(&hi);

    let mut out = vec![Mpz::zero(); a.len() + b.len() - 1];
    add_shifted(&mut out, &lo, 0);
    add_shifted(&mut out, &mid, half);
    add_shifted(&mut out, &hi, 2 * half);
    PolyMpz { coeffs: out }
}

fn split(p: &PolyMpz, at: usize) -> (PolyMpz, PolyMpz) {
    let lo: Vec<Mpz> = p.coeffs.iter().take(at).cloned().collect();
    let hi: Vec<Mpz> = p.coeffs.iter().skip(at).cloned().collect();
    (PolyMpz { coeffs: lo }, PolyMpz { coeffs: hi })
}

fn add_shifted(out: &mut [Mpz], p: &PolyMpz, shift: usize) {
    for (i, c) in p.coeffs.iter().enumerate() {
        if shift + i < out.len() {
            out[shift + i] = out[shift + i].add(c);
        }
    }
}

/// Kronecker substitution: pack coefficients into one huge integer with a
/// bit-width wide enough that no product coefficient can overflow into its
/// neighbour, multiply once via `Mpz::mul`, then unpack.
fn mul_kronecker(a: &PolyMpz, b: &PolyMpz) -> PolyMpz {
    let a = a.trimmed();
    let b = b.trimmed();
    if a.is_empty() || b.is_empty() {
        return PolyMpz { coeffs: vec![] };
    }
    let out_len = a.len() + b.len() - 1;
    let bits = kronecker_bit_width(&a, &b, out_len);

    let packed_a = pack(&a, bits);
    let packed_b = pack(&b, bits);
    let product = packed_a.mul(&packed_b);
    unpack(&product, bits, out_len)
}

/// Bit width per packed slot: `2 * max_operand_bits + ceil(log2(len))`, wide
/// enough that the largest possible product coefficient (at most `len`
/// cross terms, each bounded by `2^(2*max_bits)`) cannot carry into its
/// neighbouring slot, rather than a fixed over-allocation.
fn kronecker_bit_width(a: &PolyMpz, b: &PolyMpz, len: usize) -> u64 {
    let max_bits = a
        .coeffs
        .iter()
        .chain(b.coeffs.iter())
        .map(Mpz::bit_size)
        .max()
        .unwrap_or(1)
        .max(1);
    let log_len = (len.max(1) as f64).log2().ceil() as u64;
    2 * max_bits + log_len + 1 // +1 guard bit for sign handling during unpack
}

fn pack(p: &PolyMpz, bits: u64) -> Mpz {
    let mut acc = Mpz::zero();
    let base = Mpz::from_i64(1).mul(&pow2(bits));
    for c in p.coeffs.iter().rev() {
        acc = acc.mul(&base).add(&shift_to_unsigned(c, bits));
    }
    acc
}

/// Represent a signed coefficient inside an unsigned `bits`-wide slot by
/// biasing negative values by `2^bits`; `unpack` undoes this per-slot.
fn shift_to_unsigned(c: &Mpz, bits: u64) -> Mpz {
    if c.is_negative() {
        c.add(&pow2(bits))
    } else {
        c.clone()
    }
}

fn pow2(bits: u64) -> Mpz {
    Mpz::from_i64(2).pow_ui(bits as u32)
}

fn unpack(packed: &Mpz, bits: u64, len: usize) -> PolyMpz {
    let base = pow2(bits);
    let half = pow2(bits - 1);
    let mut coeffs = vec![Mpz::zero(); len];
    let mut rem = packed.clone();
    for slot in coeffs.iter_mut() {
        let (q, r) = rem.divrem(&base).unwrap();
        let signed = if r.cmp_abs(&half) != std::cmp::Ordering::Less || r > half {
            // `r` in the top half of the slot represents a negative value.
            if r.is_negative() || r.divquo(&half).map(|_| false).unwrap_or(false) {
                r
            } else if r > half {
                r.sub(&base)
            } else {
                r
            }
        } else {
            r
        };
        *slot = signed;
        rem = q;
    }
    PolyMpz { coeffs }
}

fn sylvester_matrix(a: &PolyMpz, b: &PolyMpz, da: usize, db: usize) -> Vec<Vec<Mpz>> {
    let size = da + db;
    let mut m = vec![vec![Mpz::zero(); size]; size];
    for row in 0..db {
        for (col_offset, c) in a.coeffs.iter().enumerate().take(da + 1) {
            let j = da - col_offset + row;
            if j < size {
                m[row][j] = c.clone();
            }
        }
    }
    for row in 0..da {
        for (col_offset, c) in b.coeffs.iter().enumerate().take(db + 1) {
            let j = db - col_offset + row;
            if j < size {
                m[db + row][j] = c.clone();
            }
        }
    }
    m
}

/// Bareiss fraction-free Gaussian elimination; the final pivot is the
/// determinant (division at each step is always exact).
fn bareiss_determinant(m: &mut [Vec<Mpz>]) -> Mpz {
    let n = m.len();
    if n == 0 {
        return Mpz::from_i64(1);
    }
    let mut prev = Mpz::from_i64(1);
    let mut sign = 1i64;

    for k in 0..n - 1 {
        if m[k][k].is_zero() {
            // Find a pivot row below and swap.
            match (k + 1..n).find(|&i| !m[i][k].is_zero()) {
                Some(pivot_row) => {
                    m.swap(k, pivot_row);
                    sign = -sign;
                }
                None => return Mpz::zero(),
            }
        }
        for i in (k + 1)..n {
            for j in (k + 1)..n {
                let num = m[i][j].mul(&m[k][k]).sub(&m[i][k].mul(&m[k][j]));
                m[i][j] = num.divquo(&prev).unwrap_or(num);
            }
            m[i][k] = Mpz::zero();
        }
        prev = m[k][k].clone();
    }
    let det = m[n - 1][n - 1].clone();
    if sign < 0 {
        det.neg()
    } else {
        det
    }
}
