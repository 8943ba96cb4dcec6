use snvec_core::constants::ELECTRON_MASS;
use snvec_core::{
    CrossSectionModel, DifferentialSample, Flavor, ReactionChannel, RngHandle, SnError,
};
use snvec_gen::{KinematicsConfig, KinematicsSampler};
use snvec_physics::{elastic, StandardCrossSections};

/// Flat in cosθ with a fixed outgoing energy.
struct Flat;

impl CrossSectionModel for Flat {
    fn total(&self, _channel: &ReactionChannel, _energy: f64) -> f64 {
        1.0e-42
    }

    fn differential(
        &self,
        _channel: &ReactionChannel,
        energy: f64,
        _cos_theta: f64,
    ) -> DifferentialSample {
        DifferentialSample {
            probability: 3.0,
            secondary_energy: energy - 1.0,
        }
    }
}

/// Non-zero only at the backward edge, which the scan sees but draws never hit.
struct BackwardSpike;

impl CrossSectionModel for BackwardSpike {
    fn total(&self, _channel: &ReactionChannel, _energy: f64) -> f64 {
        1.0e-42
    }

    fn differential(
        &self,
        _channel: &ReactionChannel,
        energy: f64,
        cos_theta: f64,
    ) -> DifferentialSample {
        DifferentialSample {
            probability: if cos_theta <= -1.0 { 1.0 } else { 0.0 },
            secondary_energy: energy,
        }
    }
}

fn sampler(max_iterations: u32) -> KinematicsSampler {
    KinematicsSampler::new(&KinematicsConfig {
        max_iterations,
        ..KinematicsConfig::default()
    })
}

#[test]
fn uniform_differential_accepts_every_draw() {
    let sampler = sampler(10);
    let mut rng = RngHandle::from_seed(3);
    for i in 0..500 {
        let energy = 10.0 + i as f64 * 0.1;
        let kin = sampler
            .sample(&Flat, &ReactionChannel::InverseBetaDecay, energy, &mut rng)
            .unwrap();
        assert_eq!(kin.attempts, 1);
        assert_eq!(kin.energy, energy - 1.0);
        assert!(kin.phi >= -std::f64::consts::PI && kin.phi < std::f64::consts::PI);
        assert!((kin.theta.cos() - kin.cos_theta).abs() < 1e-12);
    }
}

#[test]
fn unreachable_density_reports_envelope_failure() {
    let sampler = sampler(200);
    let mut rng = RngHandle::from_seed(5);
    let err = sampler
        .sample(&BackwardSpike, &ReactionChannel::InverseBetaDecay, 20.0, &mut rng)
        .unwrap_err();
    assert!(matches!(err, SnError::Envelope(_)));
    assert_eq!(err.info().code, "envelope-too-low");
    assert!(!err.is_recoverable());
}

#[test]
fn energy_below_threshold_is_a_kinematics_failure() {
    let sampler = sampler(1000);
    let mut rng = RngHandle::from_seed(7);
    let xsec = StandardCrossSections::default();
    let err = sampler
        .sample(&xsec, &ReactionChannel::InverseBetaDecay, 1.5, &mut rng)
        .unwrap_err();
    assert!(matches!(err, SnError::Kinematics(_)));
    assert!(err.is_recoverable());
}

#[test]
fn elastic_threshold_angle_beyond_unity_is_rejected() {
    let sampler = KinematicsSampler::new(&KinematicsConfig {
        elastic_min_total_energy: 50.0,
        ..KinematicsConfig::default()
    });
    let channel = ReactionChannel::ElasticScattering {
        flavor: Flavor::ElectronNeutrino,
    };
    let err = sampler.cos_range(&channel, 10.0).unwrap_err();
    assert_eq!(err.info().code, "no-kinematic-region");

    let mut rng = RngHandle::from_seed(9);
    let xsec = StandardCrossSections::default();
    let err = sampler.sample(&xsec, &channel, 10.0, &mut rng).unwrap_err();
    assert!(matches!(err, SnError::Kinematics(_)));
}

#[test]
fn elastic_threshold_at_the_kinematic_edge() {
    let energy = 10.0;
    let edge = elastic::max_recoil(energy) + ELECTRON_MASS;
    let channel = ReactionChannel::ElasticScattering {
        flavor: Flavor::ElectronNeutrino,
    };
    let below = KinematicsSampler::new(&KinematicsConfig {
        elastic_min_total_energy: edge - 1e-6,
        ..KinematicsConfig::default()
    });
    let (lo, hi) = below.cos_range(&channel, energy).unwrap();
    assert!(lo > 0.999 && lo < 1.0, "lower {lo}");
    assert_eq!(hi, 1.0);

    let above = KinematicsSampler::new(&KinematicsConfig {
        elastic_min_total_energy: edge + 1e-6,
        ..KinematicsConfig::default()
    });
    let err = above.cos_range(&channel, energy).unwrap_err();
    assert_eq!(err.info().code, "no-kinematic-region");
    assert!(err.is_recoverable());
}

#[test]
fn elastic_samples_stay_forward_and_above_minimum_energy() {
    let config = KinematicsConfig {
        elastic_min_total_energy: 3.0,
        ..KinematicsConfig::default()
    };
    let sampler = KinematicsSampler::new(&config);
    let xsec = StandardCrossSections::default();
    let mut rng = RngHandle::from_seed(13);
    let channel = ReactionChannel::ElasticScattering {
        flavor: Flavor::ElectronAntineutrino,
    };
    let (lo, hi) = sampler.cos_range(&channel, 20.0).unwrap();
    assert!(lo > 0.0 && hi == 1.0);
    for _ in 0..200 {
        let kin = sampler.sample(&xsec, &channel, 20.0, &mut rng).unwrap();
        assert!(kin.cos_theta >= lo);
        assert!(kin.energy >= 3.0 - 1e-6, "energy {}", kin.energy);
        assert!(kin.energy <= 20.0 + 0.511);
    }
}

#[test]
fn ibd_envelope_covers_the_scanned_density() {
    let sampler = sampler(1000);
    let xsec = StandardCrossSections::default();
    let ceiling = sampler.envelope(&xsec, &ReactionChannel::InverseBetaDecay, 30.0, -1.0, 1.0);
    for k in 0..=100 {
        let cos = -1.0 + 0.02 * k as f64;
        let p = xsec
            .differential(&ReactionChannel::InverseBetaDecay, 30.0, cos)
            .probability;
        assert!(p <= ceiling * (1.0 + 1e-9));
    }
}
