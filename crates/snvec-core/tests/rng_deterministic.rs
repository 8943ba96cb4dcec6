use snvec_core::rng::{derive_substream_seed, RandomSource, RngHandle};

#[test]
fn rng_emits_reproducible_sequence() {
    let mut rng_a = RngHandle::from_seed(1234);
    let mut rng_b = RngHandle::from_seed(1234);

    let seq_a: Vec<f64> = (0..100).map(|_| rng_a.uniform(0.0, 1.0)).collect();
    let seq_b: Vec<f64> = (0..100).map(|_| rng_b.uniform(0.0, 1.0)).collect();
    assert_eq!(seq_a, seq_b);

    let counts_a: Vec<u64> = (0..50).map(|_| rng_a.poisson(4.0)).collect();
    let counts_b: Vec<u64> = (0..50).map(|_| rng_b.poisson(4.0)).collect();
    assert_eq!(counts_a, counts_b);
}

#[test]
fn different_seeds_diverge() {
    let mut rng_a = RngHandle::from_seed(1234);
    let mut rng_b = RngHandle::from_seed(1235);
    let seq_a: Vec<f64> = (0..10).map(|_| rng_a.uniform(0.0, 1.0)).collect();
    let seq_b: Vec<f64> = (0..10).map(|_| rng_b.uniform(0.0, 1.0)).collect();
    assert_ne!(seq_a, seq_b);
}

#[test]
fn substreams_differ_from_each_other() {
    assert_ne!(derive_substream_seed(7, 0), derive_substream_seed(7, 1));
    assert_eq!(derive_substream_seed(7, 2), derive_substream_seed(7, 2));
}

#[test]
fn uniform_stays_inside_range() {
    let mut rng = RngHandle::from_seed(5);
    for _ in 0..10_000 {
        let x = rng.uniform(-2.5, 4.0);
        assert!((-2.5..4.0).contains(&x));
    }
}

#[test]
fn poisson_of_non_positive_mean_is_zero() {
    let mut rng = RngHandle::from_seed(9);
    assert_eq!(rng.poisson(0.0), 0);
    assert_eq!(rng.poisson(-3.0), 0);
    assert_eq!(rng.poisson(f64::NAN), 0);
}

#[test]
fn poisson_mean_matches_parameter() {
    let mut rng = RngHandle::from_seed(11);
    let trials = 20_000;
    let total: u64 = (0..trials).map(|_| rng.poisson(3.5)).sum();
    let mean = total as f64 / trials as f64;
    assert!((mean - 3.5).abs() < 0.1, "mean {mean}");
}
