use snvec_core::constants::ELECTRON_MASS;
use snvec_core::{CrossSectionModel, Flavor, ReactionChannel};
use snvec_physics::{elastic, ibd, StandardCrossSections};

#[test]
fn ibd_total_is_zero_at_threshold() {
    assert_eq!(ibd::total_cross_section(ibd::THRESHOLD), 0.0);
    assert_eq!(ibd::total_cross_section(1.0), 0.0);
    assert!(ibd::total_cross_section(ibd::THRESHOLD + 0.01) > 0.0);
}

#[test]
fn ibd_total_has_expected_magnitude() {
    let sigma = ibd::total_cross_section(10.0);
    assert!(sigma > 5e-42 && sigma < 9e-42, "sigma {sigma}");
    assert!(ibd::total_cross_section(30.0) > sigma);
}

#[test]
fn ibd_differential_integrates_close_to_total() {
    let energy = 20.0;
    let bins = 2000;
    let width = 2.0 / bins as f64;
    let integral: f64 = (0..bins)
        .map(|i| {
            let cos = -1.0 + (i as f64 + 0.5) * width;
            ibd::differential(energy, cos).probability * width
        })
        .sum();
    let total = ibd::total_cross_section(energy);
    assert!((integral / total - 1.0).abs() < 0.05, "ratio {}", integral / total);
}

#[test]
fn ibd_positron_energy_inverts() {
    for (energy, cos) in [(12.0, -0.3), (30.0, 0.5), (55.0, 0.95)] {
        let positron = ibd::positron_energy(energy, cos);
        let recovered = ibd::neutrino_energy_for_positron(positron, cos).unwrap();
        assert!((recovered - energy).abs() < 1e-2, "{energy} -> {recovered}");
    }
    assert!(ibd::neutrino_energy_for_positron(0.3, 0.0).is_none());
}

#[test]
fn elastic_totals_are_ordered_by_coupling_strength() {
    let energy = 10.0;
    let cut = elastic::DEFAULT_MIN_TOTAL_ENERGY;
    let nue = elastic::total_cross_section(Flavor::ElectronNeutrino, energy, cut);
    let nuebar = elastic::total_cross_section(Flavor::ElectronAntineutrino, energy, cut);
    let nux = elastic::total_cross_section(Flavor::HeavyNeutrino, energy, cut);
    let nuxbar = elastic::total_cross_section(Flavor::HeavyAntineutrino, energy, cut);
    assert!(nue > 7e-44 && nue < 1.2e-43, "nue {nue}");
    assert!(nue > nuebar && nuebar > nux && nux > nuxbar);
}

#[test]
fn elastic_differential_integrates_to_total() {
    let energy = 15.0;
    let bins = 20_000;
    let width = 1.0 / bins as f64;
    let integral: f64 = (0..bins)
        .map(|i| {
            let cos = (i as f64 + 0.5) * width;
            elastic::differential(Flavor::ElectronNeutrino, energy, cos).probability * width
        })
        .sum();
    let total = elastic::total_cross_section(
        Flavor::ElectronNeutrino,
        energy,
        elastic::DEFAULT_MIN_TOTAL_ENERGY,
    );
    assert!((integral / total - 1.0).abs() < 1e-3, "ratio {}", integral / total);
}

#[test]
fn elastic_total_counts_only_recoils_above_the_cut() {
    let energy = 20.0;
    let min_total = 5.0;
    let t_min = min_total - ELECTRON_MASS;
    let t_max = elastic::max_recoil(energy);
    let bins = 20_000;
    let width = (t_max - t_min) / bins as f64;
    let integral: f64 = (0..bins)
        .map(|i| {
            let kinetic = t_min + (i as f64 + 0.5) * width;
            elastic::differential_in_recoil(Flavor::ElectronNeutrino, energy, kinetic) * width
        })
        .sum();
    let total = elastic::total_cross_section(Flavor::ElectronNeutrino, energy, min_total);
    assert!((integral / total - 1.0).abs() < 1e-6, "ratio {}", integral / total);

    let uncut = elastic::total_cross_section(
        Flavor::ElectronNeutrino,
        energy,
        elastic::DEFAULT_MIN_TOTAL_ENERGY,
    );
    assert!(total < uncut);
    assert_eq!(
        elastic::total_cross_section(Flavor::ElectronNeutrino, energy, t_max + ELECTRON_MASS + 0.1),
        0.0
    );
}

#[test]
fn elastic_threshold_energy_matches_recoil_cut() {
    let min_total = 5.0;
    let threshold = elastic::threshold_energy(min_total);
    assert!((elastic::max_recoil(threshold) + ELECTRON_MASS - min_total).abs() < 1e-9);
    assert_eq!(
        elastic::total_cross_section(Flavor::HeavyNeutrino, threshold * 0.999, min_total),
        0.0
    );
    assert!(elastic::total_cross_section(Flavor::HeavyNeutrino, threshold * 1.01, min_total) > 0.0);
}

#[test]
fn standard_model_applies_the_elastic_recoil_cut() {
    let channel = ReactionChannel::ElasticScattering {
        flavor: Flavor::ElectronNeutrino,
    };
    let cut = StandardCrossSections::default().with_elastic_min_total_energy(5.0);
    assert_eq!(cut.elastic_min_total_energy(), 5.0);
    assert_eq!(
        cut.total(&channel, 20.0),
        elastic::total_cross_section(Flavor::ElectronNeutrino, 20.0, 5.0)
    );
    assert!(cut.total(&channel, 20.0) < StandardCrossSections::default().total(&channel, 20.0));
    assert_eq!(cut.threshold(&channel), elastic::threshold_energy(5.0));
}

#[test]
fn elastic_forward_recoil_is_maximal() {
    let energy = 8.0;
    let forward = elastic::differential(Flavor::ElectronNeutrino, energy, 1.0);
    assert!((forward.secondary_energy - ELECTRON_MASS - elastic::max_recoil(energy)).abs() < 1e-9);
    assert!(forward.probability > 0.0);
    assert_eq!(
        elastic::differential(Flavor::ElectronNeutrino, energy, -0.2).probability,
        0.0
    );
}

#[test]
fn elastic_threshold_angle_inverts_recoil() {
    let energy = 12.0;
    let kinetic = elastic::recoil_kinetic(energy, 0.7);
    let cos = elastic::cos_threshold(energy, kinetic + ELECTRON_MASS);
    assert!((cos - 0.7).abs() < 1e-9);
    assert!(elastic::cos_threshold(0.5, 5.0).abs() > 1.0);
}

#[test]
fn standard_model_dispatches_by_channel() {
    let model = StandardCrossSections::default();
    assert!(!model.has_oxygen());
    let ibd = ReactionChannel::InverseBetaDecay;
    assert_eq!(model.threshold(&ibd), ibd::THRESHOLD);
    assert_eq!(model.total(&ibd, 20.0), ibd::total_cross_section(20.0));
    let elastic = ReactionChannel::ElasticScattering {
        flavor: Flavor::HeavyNeutrino,
    };
    assert_eq!(
        model.total(&elastic, 20.0),
        elastic::total_cross_section(Flavor::HeavyNeutrino, 20.0, elastic::DEFAULT_MIN_TOTAL_ENERGY)
    );
    let nc = ReactionChannel::NeutralCurrentOxygen {
        flavor: Flavor::ElectronNeutrino,
        nucleon: snvec_core::Nucleon::Proton,
        level: 0,
    };
    assert_eq!(model.total(&nc, 40.0), 0.0);
}
