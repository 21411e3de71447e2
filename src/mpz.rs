//! Arbitrary-precision signed integer, wrapping `num_bigint::BigInt`.
//!
//! Not `Zeroize`: `BigInt` keeps its magnitude in a heap buffer it doesn't
//! expose for in-place scrubbing, so there's no way to overwrite a value's
//! old allocation rather than merely dropping it. Trapdoor material that
//! needs scrub-on-drop (`f`, `g`, `F`, `G`) is kept in `poly::small::PolyZ`
//! instead, which is a plain `Vec<i64>` and can zeroize for real.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Mpz(BigInt);

/// Multiply-algorithm choice, exposed so tests can force a path and check
/// the two agree. Mirrors `poly::mpz_poly::MulAlgorithm` one level down, at
/// the digit-array level rather than the polynomial-coefficient level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MulAlgorithm {
    Schoolbook,
    Karatsuba,
}

/// Below this many base-2^32 digits, schoolbook's O(n^2) term count beats
/// Karatsuba's recursion/allocation overhead.
const KARATSUBA_THRESHOLD_DIGITS: usize = 24;

impl Mpz {
    pub fn zero() -> Self {
        Self(BigInt::zero())
    }

    pub fn from_i64(v: i64) -> Self {
        Self(BigInt::from(v))
    }

    pub fn from_u64(v: u64) -> Self {
        Self(BigInt::from(v))
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.0.to_i64()
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn neg(&self) -> Self {
        Self(-&self.0)
    }

    pub fn add(&self, other: &Self) -> Self {
        Self(&self.0 + &other.0)
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self(&self.0 - &other.0)
    }

    pub fn mul(&self, other: &Self) -> Self {
        self.mul_with(other, Self::choose_algorithm(self, other))
    }

    /// Digit count of the larger operand decides the algorithm: below
    /// `KARATSUBA_THRESHOLD_DIGITS` base-2^32 digits, schoolbook; at or
    /// above it, Karatsuba.
    pub fn choose_algorithm(a: &Self, b: &Self) -> MulAlgorithm {
        let digits = a.0.magnitude().to_u32_digits().len().max(b.0.magnitude().to_u32_digits().len());
        if digits < KARATSUBA_THRESHOLD_DIGITS {
            MulAlgorithm::Schoolbook
        } else {
            MulAlgorithm::Karatsuba
        }
    }

    pub fn mul_with(&self, other: &Self, algo: MulAlgorithm) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let a = self.0.magnitude().to_u32_digits();
        let b = other.0.magnitude().to_u32_digits();
        let product = match algo {
            MulAlgorithm::Schoolbook => digit_mul_schoolbook(&a, &b),
            MulAlgorithm::Karatsuba => digit_mul_karatsuba(&a, &b),
        };
        let sign = if self.0.sign() == other.0.sign() { Sign::Plus } else { Sign::Minus };
        Self(BigInt::from_biguint(sign, BigUint::new(product)))
    }

    /// Truncating division toward zero, with the corresponding remainder.
    /// Returns `None` on division by zero.
    pub fn divrem(&self, other: &Self) -> Option<(Self, Self)> {
        if other.is_zero() {
            return None;
        }
        let q = &self.0 / &other.0;
        let r = &self.0 - &q * &other.0;
        Some((Self(q), Self(r)))
    }

    /// Truncating quotient only.
    pub fn divquo(&self, other: &Self) -> Option<Self> {
        self.divrem(other).map(|(q, _)| q)
    }

    /// Euclidean remainder, always in `[0, |m|)`, distinct from the
    /// sign-of-dividend remainder of `divrem`.
    pub fn modulo(&self, m: &Self) -> Option<Self> {
        if m.is_zero() {
            return None;
        }
        let r = self.0.mod_floor(&m.0.abs());
        Some(Self(r))
    }

    pub fn mod_ui(&self, m: u64) -> Option<u64> {
        if m == 0 {
            return None;
        }
        let m_big = BigInt::from(m);
        Some(self.0.mod_floor(&m_big).to_u64().unwrap_or(0))
    }

    pub fn pow_ui(&self, e: u32) -> Self {
        Self(self.0.pow(e))
    }

    /// Floor integer square root. Panics on negative input, matching GMP's
    /// `mpz_sqrt` contract.
    pub fn sqrt(&self) -> Self {
        assert!(!self.is_negative(), "sqrt of negative Mpz");
        Self(self.0.sqrt())
    }

    pub fn cmp_abs(&self, other: &Self) -> std::cmp::Ordering {
        self.0.abs().cmp(&other.0.abs())
    }

    /// Modular inverse of `self` mod `m`. `None` when `gcd(self, m) != 1`.
    pub fn invmod(&self, m: &Self) -> Option<Self> {
        let (g, x, _y) = self.xgcd(m);
        if g.cmp_abs(&Mpz::from_i64(1)) != std::cmp::Ordering::Equal {
            return None;
        }
        let x = if g.is_negative() { x.neg() } else { x };
        Some(x.modulo(m).unwrap_or(x))
    }

    pub fn gcd(&self, other: &Self) -> Self {
        Self(self.0.gcd(&other.0))
    }

    /// Extended Euclidean algorithm: returns `(g, x, y)` with
    /// `self*x + other*y = g`, `g = gcd(self, other)` (up to sign), and
    /// minimal Bezout coefficients: `|x| <= |other|/(2g)`,
    /// `|y| <= |self|/(2g)`.
    ///
    /// The textbook iterative extended Euclidean algorithm already produces
    /// the minimal such pair; no post-hoc reduction step is needed.
    pub fn xgcd(&self, other: &Self) -> (Self, Self, Self) {
        let (mut old_r, mut r) = (self.0.clone(), other.0.clone());
        let (mut old_s, mut s) = (BigInt::from(1), BigInt::from(0));
        let (mut old_t, mut t) = (BigInt::from(0), BigInt::from(1));

        while !r.is_zero() {
            let q = &old_r / &r;
            let tmp_r = &old_r - &q * &r;
            old_r = std::mem::replace(&mut r, tmp_r);
            let tmp_s = &old_s - &q * &s;
            old_s = std::mem::replace(&mut s, tmp_s);
            let tmp_t = &old_t - &q * &t;
            old_t = std::mem::replace(&mut t, tmp_t);
        }

        (Self(old_r), Self(old_s), Self(old_t))
    }

    pub fn to_str_radix(&self, radix: u32) -> String {
        self.0.to_str_radix(radix)
    }

    pub fn from_str_radix(s: &str, radix: u32) -> Option<Self> {
        BigInt::parse_bytes(s.as_bytes(), radix).map(Self)
    }

    /// Bit length of the magnitude (0 for zero).
    pub fn bit_size(&self) -> u64 {
        self.0.bits()
    }

    /// Big-endian magnitude bytes, independent of sign; sign is carried
    /// out-of-band by callers, the same way the persisted-key layout packs
    /// a fixed signed width per coefficient rather than tagging a sign byte
    /// per integer.
    pub fn to_magnitude_be(&self) -> Vec<u8> {
        let (_, bytes) = self.0.to_bytes_be();
        bytes
    }

    pub fn from_magnitude_be(bytes: &[u8], negative: bool) -> Self {
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        Self(BigInt::from_bytes_be(sign, bytes))
    }

    pub(crate) fn inner(&self) -> &BigInt {
        &self.0
    }
}

impl From<BigInt> for Mpz {
    fn from(v: BigInt) -> Self {
        Self(v)
    }
}

impl From<i64> for Mpz {
    fn from(v: i64) -> Self {
        Self::from_i64(v)
    }
}

/// Base-2^32 schoolbook multiply-with-carry accumulator. `u64` cells never
/// overflow: the worst-case per-cell sum is `(2^32-1) + (2^32-1)^2 +
/// (2^32-1) = 2^64-1`.
fn digit_mul_schoolbook(a: &[u32], b: &[u32]) -> Vec<u32> {
    if a.is_empty() || b.is_empty() {
        return vec![];
    }
    let mut out = vec![0u64; a.len() + b.len()];
    for (i, &ai) in a.iter().enumerate() {
        let mut carry = 0u64;
        for (j, &bj) in b.iter().enumerate() {
            let sum = out[i + j] + (ai as u64) * (bj as u64) + carry;
            out[i + j] = sum & 0xFFFF_FFFF;
            carry = sum >> 32;
        }
        let mut k = i + b.len();
        while carry > 0 {
            let sum = out[k] + carry;
            out[k] = sum & 0xFFFF_FFFF;
            carry = sum >> 32;
            k += 1;
        }
    }
    out.into_iter().map(|d| d as u32).collect()
}

/// Classical (non-cyclic) recursive Karatsuba, mirroring
/// `poly::mpz_poly::mul_karatsuba`'s split/3-multiply structure one level
/// down at the digit-array level: `lo = a_lo*b_lo`, `hi = a_hi*b_hi`,
/// `mid = (a_lo+a_hi)*(b_lo+b_hi) - lo - hi`, combined by shifted add.
fn digit_mul_karatsuba(a: &[u32], b: &[u32]) -> Vec<u32> {
    if a.is_empty() || b.is_empty() {
        return vec![];
    }
    if a.len() < KARATSUBA_THRESHOLD_DIGITS || b.len() < KARATSUBA_THRESHOLD_DIGITS {
        return digit_mul_schoolbook(a, b);
    }
    let n = a.len().max(b.len());
    let half = n.div_ceil(2);
    let (a_lo, a_hi) = split_digits(a, half);
    let (b_lo, b_hi) = split_digits(b, half);

    let lo = digit_mul_karatsuba(a_lo, b_lo);
    let hi = digit_mul_karatsuba(a_hi, b_hi);
    let cross = digit_mul_karatsuba(&digit_add(a_lo, a_hi), &digit_add(b_lo, b_hi));
    // `cross >= lo` and `cross - lo >= hi` always hold given the identity
    // above, so unsigned digit subtraction never needs to represent a
    // negative intermediate value.
    let mid = digit_sub(&digit_sub(&cross, &lo), &hi);

    let mut acc = vec![0u64; 2 * (a.len() + b.len()) + 4];
    add_shifted_digits(&mut acc, &lo, 0);
    add_shifted_digits(&mut acc, &mid, half);
    add_shifted_digits(&mut acc, &hi, 2 * half);
    normalize_digits(acc)
}

fn split_digits(a: &[u32], at: usize) -> (&[u32], &[u32]) {
    if at >= a.len() {
        (a, &[])
    } else {
        (&a[..at], &a[at..])
    }
}

fn digit_add(a: &[u32], b: &[u32]) -> Vec<u32> {
    let len = a.len().max(b.len());
    let mut out = Vec::with_capacity(len + 1);
    let mut carry = 0u64;
    for i in 0..len {
        let sum = *a.get(i).unwrap_or(&0) as u64 + *b.get(i).unwrap_or(&0) as u64 + carry;
        out.push((sum & 0xFFFF_FFFF) as u32);
        carry = sum >> 32;
    }
    if carry > 0 {
        out.push(carry as u32);
    }
    out
}

/// Unsigned digit subtraction; callers are responsible for `a >= b`.
fn digit_sub(a: &[u32], b: &[u32]) -> Vec<u32> {
    let len = a.len().max(b.len());
    let mut out = Vec::with_capacity(len);
    let mut borrow = 0i64;
    for i in 0..len {
        let mut diff = *a.get(i).unwrap_or(&0) as i64 - *b.get(i).unwrap_or(&0) as i64 - borrow;
        if diff < 0 {
            diff += 1i64 << 32;
            borrow = 1;
        } else {
            borrow = 0;
        }
        out.push(diff as u32);
    }
    out
}

fn add_shifted_digits(acc: &mut [u64], digits: &[u32], shift: usize) {
    for (i, &d) in digits.iter().enumerate() {
        acc[shift + i] += d as u64;
    }
}

/// Propagate the per-cell carries left over from overlapping
/// `add_shifted_digits` calls into a clean base-2^32 digit array.
fn normalize_digits(acc: Vec<u64>) -> Vec<u32> {
    let mut out = Vec::with_capacity(acc.len() + 1);
    let mut carry = 0u64;
    for v in acc {
        let sum = v + carry;
        out.push((sum & 0xFFFF_FFFF) as u32);
        carry = sum >> 32;
    }
    while carry > 0 {
        out.push((carry & 0xFFFF_FFFF) as u32);
        carry >>= 32;
    }
    out
}

/// Combine `(a mod m_a)` with `(b mod m_b)` via Garner's formula, given
/// `gcd(m_a, m_b) = 1` and a precomputed `inv_ma_mod_mb = m_a^-1 mod m_b`.
/// Result is in `[0, m_a * m_b)`.
pub fn crt_combine(a: &Mpz, m_a: &Mpz, b: &Mpz, m_b: &Mpz, inv_ma_mod_mb: &Mpz) -> Mpz {
    let diff = b.sub(a);
    let k = diff.mul(inv_ma_mod_mb).modulo(m_b).unwrap_or_else(Mpz::zero);
    a.add(&m_a.mul(&k))
}
