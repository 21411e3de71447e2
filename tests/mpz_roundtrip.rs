//! Persisted private/public key layout round-trips through a generated
//! keypair, and the signed/mod-q polynomial codecs reject values that no
//! longer fit their declared bit widths.

use latgpv::codec::{decode_signed_poly, encode_private_key, encode_public_key};
use latgpv::gpv::keygen::public_key;
use latgpv::params::Params;
use latgpv::rng::EntropySource;
use latgpv::generate;

#[test]
fn private_key_round_trips_for_a_generated_basis() {
    let params = Params::new(16, 12289, 10).unwrap();
    let entropy = EntropySource([21u8; 32]);
    let keypair = generate(&params, &entropy, b"codec-roundtrip").unwrap();
    let basis = &keypair.basis;

    let bytes = encode_private_key(&params, basis.f(), basis.g(), basis.big_f(), basis.big_g()).unwrap();

    let n = params.n as usize;
    let fg_bits = params.fg_coeff_bits();
    let big_bits = params.fg_big_coeff_bits();
    let fg_bytes = (n as u32 * fg_bits).div_ceil(8) as usize;

    let f_back = decode_signed_poly(&bytes[..fg_bytes], n, fg_bits).unwrap();
    let g_back = decode_signed_poly(&bytes[fg_bytes..2 * fg_bytes], n, fg_bits).unwrap();
    assert_eq!(f_back.coeffs(), basis.f().coeffs());
    assert_eq!(g_back.coeffs(), basis.g().coeffs());

    let big_bytes = (n as u32 * big_bits).div_ceil(8) as usize;
    let rest = &bytes[2 * fg_bytes..];
    let big_f_back = decode_signed_poly(&rest[..big_bytes], n, big_bits).unwrap();
    let big_g_back = decode_signed_poly(&rest[big_bytes..2 * big_bytes], n, big_bits).unwrap();
    assert_eq!(big_f_back.coeffs(), basis.big_f().coeffs());
    assert_eq!(big_g_back.coeffs(), basis.big_g().coeffs());
}

#[test]
fn public_key_encodes_at_the_declared_width() {
    let params = Params::new(16, 12289, 10).unwrap();
    let entropy = EntropySource([22u8; 32]);
    let keypair = generate(&params, &entropy, b"codec-pubkey").unwrap();
    let h = public_key(&keypair.basis, params.q).unwrap();

    let bytes = encode_public_key(&params, &h).unwrap();
    let expected_bits = params.n as u64 * params.q_bits as u64;
    assert_eq!(bytes.len() as u64, expected_bits.div_ceil(8));
}
