//! Polynomial arithmetic over a word-sized prime field F_p, represented as
//! `Vec<u64>` in ascending-degree order. This is the per-prime worker used
//! by both branches of the modular machinery: the modular resultant and
//! the extended-GCD-modulo-(x^N+1) routine that GPV basis generation calls
//! to invert `f` and `g`.
//!
//! Kept separate from `mpz_poly` because, unlike `PolyMpz`, every
//! coefficient here fits in one machine word and every division is exact
//! (a field), which is what makes the classical recursive resultant
//! identity and a plain polynomial EEA safe to hand-implement directly.

use crate::limb::{limb_inv_mod, limb_mul_mod, BarrettModulus};

pub fn trim(mut v: Vec<u64>) -> Vec<u64> {
    while v.len() > 1 && *v.last().unwrap() == 0 {
        v.pop();
    }
    if v.is_empty() {
        v.push(0);
    }
    v
}

pub fn degree(v: &[u64]) -> isize {
    for i in (0..v.len()).rev() {
        if v[i] != 0 {
            return i as isize;
        }
    }
    -1
}

fn lc(v: &[u64]) -> u64 {
    let d = degree(v);
    if d < 0 {
        0
    } else {
        v[d as usize]
    }
}

fn add_mod(a: u64, b: u64, m: u64) -> u64 {
    let s = a + b;
    if s >= m {
        s - m
    } else {
        s
    }
}

fn sub_mod(a: u64, b: u64, m: u64) -> u64 {
    if a >= b {
        a - b
    } else {
        m - (b - a)
    }
}

/// `a mod b` in `F_p[x]` via long division; `b` must be nonzero.
pub fn rem(a: &[u64], b: &[u64], modulus: &BarrettModulus) -> Vec<u64> {
    let m = modulus.m;
    let db = degree(b);
    assert!(db >= 0, "division by the zero polynomial");
    let lc_b_inv = limb_inv_mod(lc(b), m);
    let mut r = a.to_vec();
    loop {
        let dr = degree(&r);
        if dr < db {
            break;
        }
        let shift = (dr - db) as usize;
        let factor = limb_mul_mod(r[dr as usize], lc_b_inv, modulus);
        for (i, &bi) in b.iter().enumerate().take(db as usize + 1) {
            if bi == 0 {
                continue;
            }
            let term = limb_mul_mod(factor, bi, modulus);
            r[i + shift] = sub_mod(r[i + shift], term, m);
        }
    }
    trim(r)
}

/// Extended Euclidean algorithm in `F_p[x]`: returns `(g, s, t)` with
/// `a*s + b*t = g`.
pub fn eea(a: &[u64], b: &[u64], modulus: &BarrettModulus) -> (Vec<u64>, Vec<u64>, Vec<u64>) {
    let m = modulus.m;
    let (mut old_r, mut r) = (trim(a.to_vec()), trim(b.to_vec()));
    let (mut old_s, mut s) = (vec![1u64], vec![0u64]);
    let (mut old_t, mut t) = (vec![0u64], vec![1u64]);

    while degree(&r) >= 0 && !(r.len() == 1 && r[0] == 0) {
        let (q, rem_) = divmod(&old_r, &r, modulus);
        old_r = std::mem::replace(&mut r, rem_);
        let tmp_s = sub_poly(&old_s, &mul(&q, &s, modulus), m);
        old_s = std::mem::replace(&mut s, tmp_s);
        let tmp_t = sub_poly(&old_t, &mul(&q, &t, modulus), m);
        old_t = std::mem::replace(&mut t, tmp_t);
    }
    (old_r, old_s, old_t)
}

fn divmod(a: &[u64], b: &[u64], modulus: &BarrettModulus) -> (Vec<u64>, Vec<u64>) {
    let m = modulus.m;
    let db = degree(b);
    assert!(db >= 0 && !(b.len() == 1 && b[0] == 0), "division by zero");
    let da = degree(a);
    if da < db {
        return (vec![0], trim(a.to_vec()));
    }
    let lc_b_inv = limb_inv_mod(lc(b), m);
    let mut r = a.to_vec();
    let mut q = vec![0u64; (da - db) as usize + 1];
    loop {
        let dr = degree(&r);
        if dr < db {
            break;
        }
        let shift = (dr - db) as usize;
        let factor = limb_mul_mod(r[dr as usize], lc_b_inv, modulus);
        q[shift] = factor;
        for (i, &bi) in b.iter().enumerate().take(db as usize + 1) {
            if bi == 0 {
                continue;
            }
            let term = limb_mul_mod(factor, bi, modulus);
            r[i + shift] = sub_mod(r[i + shift], term, m);
        }
    }
    (trim(q), trim(r))
}

fn sub_poly(a: &[u64], b: &[u64], m: u64) -> Vec<u64> {
    let len = a.len().max(b.len());
    let mut out = vec![0u64; len];
    for i in 0..len {
        let av = a.get(i).copied().unwrap_or(0);
        let bv = b.get(i).copied().unwrap_or(0);
        out[i] = sub_mod(av, bv, m);
    }
    trim(out)
}

fn mul(a: &[u64], b: &[u64], modulus: &BarrettModulus) -> Vec<u64> {
    let m = modulus.m;
    let da = degree(a);
    let db = degree(b);
    if da < 0 || db < 0 {
        return vec![0];
    }
    let mut out = vec![0u64; da as usize + db as usize + 1];
    for (i, &ai) in a.iter().enumerate().take(da as usize + 1) {
        if ai == 0 {
            continue;
        }
        for (j, &bj) in b.iter().enumerate().take(db as usize + 1) {
            if bj == 0 {
                continue;
            }
            let term = limb_mul_mod(ai, bj, modulus);
            out[i + j] = add_mod(out[i + j], term, m);
        }
    }
    trim(out)
}

/// Resultant of `a, b` in `F_p[x]` via the classical recursive identity
/// `Res(a,b) = (-1)^(deg a * deg b) * lc(b)^(deg a - deg r) * Res(b,r)`,
/// `r = a mod b`. Safe to apply directly over a field (every leading
/// coefficient met along the way is a unit).
pub fn resultant(a: &[u64], b: &[u64], modulus: &BarrettModulus) -> u64 {
    let m = modulus.m;
    let a = trim(a.to_vec());
    let b = trim(b.to_vec());
    let da = degree(&a);
    let db = degree(&b);

    if db < 0 {
        // b == 0: resultant is 0 unless a is a nonzero constant.
        return if da == 0 { 1 } else { 0 };
    }
    if da < db {
        let flip = (da * db) % 2 != 0;
        let val = resultant(&b, &a, modulus);
        return if flip { sub_mod(0, val, m) } else { val };
    }
    if db == 0 {
        return pow_mod_u64(b[0], da as u64, modulus);
    }

    let r = rem(&a, &b, modulus);
    let dr = degree(&r);
    let factor = pow_mod_u64(lc(&b), (da - dr.max(0)) as u64, modulus);
    let flip = (da * db) % 2 != 0;

    let rest = resultant(&b, &r, modulus);
    let mut val = limb_mul_mod(factor, rest, modulus);
    if flip {
        val = sub_mod(0, val, m);
    }
    val
}

fn pow_mod_u64(mut base: u64, mut exp: u64, modulus: &BarrettModulus) -> u64 {
    let m = modulus.m;
    let mut result = 1u64 % m;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = limb_mul_mod(result, base, modulus);
        }
        base = limb_mul_mod(base, base, modulus);
        exp >>= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eea_identity_holds_modp() {
        let modulus = BarrettModulus::new(12289);
        let a = vec![1, 0, 0, 0, 1]; // x^4 + 1
        let b = vec![5, 3, 1]; // x^2 + 3x + 5
        let (g, s, t) = eea(&a, &b, &modulus);
        // a*s + b*t == g (mod p)
        let lhs = {
            let as_ = mul(&a, &s, &modulus);
            let bt = mul(&b, &t, &modulus);
            let len = as_.len().max(bt.len());
            let mut out = vec![0u64; len];
            for i in 0..len {
                out[i] = add_mod(
                    *as_.get(i).unwrap_or(&0),
                    *bt.get(i).unwrap_or(&0),
                    modulus.m,
                );
            }
            trim(out)
        };
        assert_eq!(lhs, trim(g));
    }

    #[test]
    fn resultant_of_coprime_constants_matches_definition() {
        let modulus = BarrettModulus::new(101);
        // Res(x - 1, x - 2) = (1 - 2) * (-1) ... use direct known value:
        // Res(x+a, x+b) = b - a
        let a = vec![1, 1]; // x + 1
        let b = vec![2, 1]; // x + 2
        let r = resultant(&a, &b, &modulus);
        assert_eq!(r, 1); // 2 - 1 = 1
    }
}
