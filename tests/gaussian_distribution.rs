//! Statistical sanity checks for the always-available CDT sampler: sample
//! mean/variance converge to the target distribution's, and two distinct
//! nonces diverge while identical ones reproduce exactly.

use latgpv::gaussian::{create_sampler, Precision, Sampler, SamplerConfig, SamplerVariant};
use latgpv::rng::EntropySource;

fn cdt_config(sigma: f64) -> SamplerConfig {
    SamplerConfig {
        variant: SamplerVariant::Cdt,
        precision: Precision::P64,
        sigma,
        tail: 10,
        blinding: false,
        bootstrap: false,
    }
}

#[test]
fn sample_mean_and_variance_are_close_to_target() {
    let entropy = EntropySource([1u8; 32]);
    let sigma = 4.0;
    let mut sampler = create_sampler(cdt_config(sigma), &entropy, b"gaussian-dist-stats").unwrap();

    let n = 20_000;
    let samples: Vec<f64> = (0..n).map(|_| sampler.sample(0.0) as f64).collect();
    let mean: f64 = samples.iter().sum::<f64>() / n as f64;
    let variance: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

    assert!(mean.abs() < 0.2, "sample mean {mean} too far from 0");
    let expected_var = sigma * sigma;
    assert!(
        (variance - expected_var).abs() / expected_var < 0.1,
        "sample variance {variance} too far from {expected_var}"
    );
}

#[test]
fn arbitrary_center_shifts_the_mean() {
    let entropy = EntropySource([2u8; 32]);
    let mut sampler = create_sampler(cdt_config(3.0), &entropy, b"gaussian-dist-center").unwrap();

    let center = 7.5;
    let n = 10_000;
    let samples: Vec<f64> = (0..n).map(|_| sampler.sample(center) as f64).collect();
    let mean: f64 = samples.iter().sum::<f64>() / n as f64;
    assert!((mean - center).abs() < 0.3, "sample mean {mean} too far from {center}");
}

#[test]
fn identical_seed_and_nonce_reproduce_the_same_stream() {
    let entropy = EntropySource([3u8; 32]);
    let mut a = create_sampler(cdt_config(2.0), &entropy, b"reproducible").unwrap();
    let mut b = create_sampler(cdt_config(2.0), &entropy, b"reproducible").unwrap();
    let seq_a: Vec<i64> = (0..50).map(|_| a.sample(0.0)).collect();
    let seq_b: Vec<i64> = (0..50).map(|_| b.sample(0.0)).collect();
    assert_eq!(seq_a, seq_b);
}

#[test]
fn distinct_nonces_diverge() {
    let entropy = EntropySource([3u8; 32]);
    let mut a = create_sampler(cdt_config(2.0), &entropy, b"nonce-one").unwrap();
    let mut b = create_sampler(cdt_config(2.0), &entropy, b"nonce-two").unwrap();
    let seq_a: Vec<i64> = (0..50).map(|_| a.sample(0.0)).collect();
    let seq_b: Vec<i64> = (0..50).map(|_| b.sample(0.0)).collect();
    assert_ne!(seq_a, seq_b);
}
