//! Deterministic small-keygen scenario: a fixed all-zero entropy source and
//! the toy-16 parameter set produce a reproducible, valid trapdoor basis.

use latgpv::params::TOY_16;
use latgpv::rng::EntropySource;
use latgpv::generate;

#[test]
fn toy_16_with_zero_entropy_is_reproducible_and_valid() {
    let params = TOY_16.params;
    let entropy = EntropySource([0u8; 32]);

    let a = generate(&params, &entropy, b"keygen-small").unwrap();
    let b = generate(&params, &entropy, b"keygen-small").unwrap();

    assert!(a.basis.verify_ntru_identity());
    assert_eq!(a.basis.f().coeffs(), b.basis.f().coeffs());
    assert_eq!(a.basis.g().coeffs(), b.basis.g().coeffs());
    assert_eq!(a.basis.big_f().coeffs(), b.basis.big_f().coeffs());
    assert_eq!(a.basis.big_g().coeffs(), b.basis.big_g().coeffs());

    // f, g are short: sampled at sigma_key, so their norm should sit well
    // under the modulus.
    let norm_f = a.basis.f().norm_squared();
    let norm_g = a.basis.g().norm_squared();
    let q = params.q as i128;
    assert!(norm_f < q * q);
    assert!(norm_g < q * q);
}
