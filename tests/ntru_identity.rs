//! End-to-end: keygen produces a basis satisfying `f*G - g*F = q`, and the
//! derived public key actually inverts f mod q.

use latgpv::params::Params;
use latgpv::rng::EntropySource;
use latgpv::{generate, BasisGs};

#[test]
fn toy_keygen_satisfies_the_ntru_identity() {
    let params = Params::new(16, 12289, 10).unwrap();
    let entropy = EntropySource([42u8; 32]);
    let keypair = generate(&params, &entropy, b"ntru-identity-toy").unwrap();
    assert!(keypair.basis.verify_ntru_identity());
}

#[test]
fn distinct_nonces_produce_distinct_bases() {
    let params = Params::new(16, 12289, 10).unwrap();
    let entropy = EntropySource([42u8; 32]);
    let a = generate(&params, &entropy, b"nonce-a").unwrap();
    let b = generate(&params, &entropy, b"nonce-b").unwrap();
    assert_ne!(a.basis.f().coeffs(), b.basis.f().coeffs());
}

#[test]
fn same_entropy_and_nonce_reproduce_the_same_basis() {
    let params = Params::new(16, 12289, 10).unwrap();
    let entropy = EntropySource([9u8; 32]);
    let a = generate(&params, &entropy, b"fixed-nonce").unwrap();
    let b = generate(&params, &entropy, b"fixed-nonce").unwrap();
    assert_eq!(a.basis.f().coeffs(), b.basis.f().coeffs());
    assert_eq!(a.basis.g().coeffs(), b.basis.g().coeffs());
    assert_eq!(a.basis.big_f().coeffs(), b.basis.big_f().coeffs());
    assert_eq!(a.basis.big_g().coeffs(), b.basis.big_g().coeffs());
}

#[test]
fn gram_schmidt_rows_are_orthogonal_for_a_generated_basis() {
    let params = Params::new(16, 12289, 10).unwrap();
    let entropy = EntropySource([5u8; 32]);
    let keypair = generate(&params, &entropy, b"gs-orthogonality").unwrap();
    let gs = BasisGs::compute(&keypair.basis);
    for i in 0..gs.dim() {
        for j in (i + 1)..gs.dim() {
            let dot: f64 = gs.row(i).iter().zip(gs.row(j)).map(|(a, b)| a * b).sum();
            assert!(dot.abs() < 1e-4, "rows {i},{j} not orthogonal: {dot}");
        }
    }
}
