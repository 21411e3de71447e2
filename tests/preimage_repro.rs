//! Preimage sampling reproducibility and the basic lattice-membership
//! property it's meant to deliver, in both the "reference" (per-row
//! sampler) and "efficient" (bootstrapped) construction modes.

use latgpv::gpv::keygen::public_key;
use latgpv::params::Params;
use latgpv::poly::mpz_poly::PolyMpz;
use latgpv::rng::EntropySource;
use latgpv::{generate, sample_preimage, BasisGs};

fn setup() -> (Params, latgpv::Keypair, BasisGs, EntropySource) {
    let params = Params::new(16, 12289, 10).unwrap();
    let entropy = EntropySource([13u8; 32]);
    let keypair = generate(&params, &entropy, b"preimage-repro-keygen").unwrap();
    let gs = BasisGs::compute(&keypair.basis);
    (params, keypair, gs, entropy)
}

#[test]
fn same_seed_and_nonce_reproduce_the_same_preimage() {
    let (params, keypair, gs, entropy) = setup();
    let target = vec![1i64; params.n as usize];

    let a = sample_preimage(&keypair.basis, &gs, &target, params.gs_norm_bound(), false, &entropy, b"fixed").unwrap();
    let b = sample_preimage(&keypair.basis, &gs, &target, params.gs_norm_bound(), false, &entropy, b"fixed").unwrap();
    assert_eq!(a.0.coeffs(), b.0.coeffs());
    assert_eq!(a.1.coeffs(), b.1.coeffs());
}

#[test]
fn reference_and_bootstrap_modes_both_stay_within_the_expected_norm_bound() {
    let (params, keypair, gs, entropy) = setup();
    let target = vec![3i64; params.n as usize];
    let bound = (params.gs_norm_bound() * params.gs_norm_bound() * 6.0) as i128;

    let reference = sample_preimage(&keypair.basis, &gs, &target, params.gs_norm_bound(), false, &entropy, b"ref-mode").unwrap();
    assert!(reference.0.norm_squared() < bound);
    assert!(reference.1.norm_squared() < bound);

    let efficient = sample_preimage(&keypair.basis, &gs, &target, params.gs_norm_bound(), true, &entropy, b"eff-mode").unwrap();
    assert!(efficient.0.norm_squared() < bound);
    assert!(efficient.1.norm_squared() < bound);
}

#[test]
fn preimage_satisfies_the_syndrome_relation() {
    let (params, keypair, gs, entropy) = setup();
    let n = params.n as usize;
    let h = public_key(&keypair.basis, params.q).unwrap();

    let target: Vec<i64> = (0..n as i64).map(|i| i % 7).collect();
    let (v1, v2) =
        sample_preimage(&keypair.basis, &gs, &target, params.gs_norm_bound(), false, &entropy, b"syndrome-check").unwrap();

    // The basis's rows each satisfy `g_block + h*(-f_block) = 0 (mod q)`,
    // so any remainder reached by subtracting integer multiples of those
    // rows from the target preserves `v2 + h*v1 = target (mod q)`, where
    // v2 is the target-carrying half and v1 the half h is multiplied into.
    let h_mpz = PolyMpz::from_i64_coeffs(h.coeffs());
    let v1_mpz = PolyMpz::from_i64_coeffs(v1.coeffs());
    let v2_mpz = PolyMpz::from_i64_coeffs(v2.coeffs());
    let target_mpz = PolyMpz::from_i64_coeffs(&target);

    let lhs = v2_mpz.add(&h_mpz.mul(&v1_mpz).reduce_cyclotomic(n));
    let q_scalar = PolyMpz::from_i64_coeffs(&[params.q as i64]).coeffs()[0].clone();

    for i in 0..n {
        let got = lhs.coeffs()[i].modulo(&q_scalar).unwrap();
        let want = target_mpz.coeffs()[i].modulo(&q_scalar).unwrap();
        assert_eq!(got, want, "coefficient {i} mismatch");
    }
}

#[test]
fn rejects_a_target_of_the_wrong_length() {
    let (params, keypair, gs, entropy) = setup();
    let target = vec![0i64; params.n as usize + 1];
    assert!(sample_preimage(&keypair.basis, &gs, &target, params.gs_norm_bound(), false, &entropy, b"bad-length").is_err());
}
