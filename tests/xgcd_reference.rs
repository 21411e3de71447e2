//! `PolyMpz::xgcd_mod_cyclotomic` against a small, hand-checkable case and
//! against the Euclidean/modular resultant paths agreeing with each other.

use latgpv::poly::mpz_poly::PolyMpz;

#[test]
fn xgcd_mod_cyclotomic_identity_holds_for_x_plus_one() {
    // f = x + 1, n = 16: gcd(f, x^16+1) is a unit since x = -1 is not a
    // root of x^16+1 (the 16th roots of unity omit -1 only when 16 is odd,
    // which it isn't here, but x+1 still only shares a root with x^16+1 at
    // x=-1, and (-1)^16+1 = 2 != 0, so f is invertible mod x^16+1).
    let n = 16;
    let mut coeffs = vec![0i64; n];
    coeffs[0] = 1;
    coeffs[1] = 1;
    let f = PolyMpz::from_i64_coeffs(&coeffs);

    let (r, rho) = f.xgcd_mod_cyclotomic(n).unwrap();
    assert!(!r.is_zero());

    let product = f.mul(&rho).reduce_cyclotomic(n);
    let zero = PolyMpz::zero(1).coeffs()[0].clone();
    for (i, c) in product.coeffs().iter().enumerate() {
        let expected = if i == 0 { &r } else { &zero };
        assert_eq!(c, expected, "coefficient {i} mismatch");
    }
}

#[test]
fn euclidean_and_modular_resultant_agree() {
    let n = 16;
    let mut coeffs = vec![0i64; n];
    coeffs[0] = 3;
    coeffs[2] = 1;
    coeffs[5] = -2;
    let f = PolyMpz::from_i64_coeffs(&coeffs);

    let phi = latgpv::poly::mpz_poly::cyclotomic(n);
    let via_euclid = f.resultant_euclidean(&phi);
    let via_modular = f.resultant_modular(&phi);
    assert_eq!(via_euclid, via_modular);
}
