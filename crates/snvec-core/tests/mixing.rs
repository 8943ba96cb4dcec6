use snvec_core::channel::Flavor;
use snvec_core::models::{FluxModel, FluxSample, MixingPair, MixingParameters};

fn source(_time: f64, _energy: f64, flavor: Flavor) -> f64 {
    match flavor {
        Flavor::ElectronNeutrino => 1.0,
        Flavor::ElectronAntineutrino => 2.0,
        Flavor::HeavyNeutrino | Flavor::HeavyAntineutrino => 4.0,
    }
}

#[test]
fn default_mixing_is_identity() {
    let sample = FluxSample::evaluate(&source, 0.0, 10.0);
    let mixing = MixingParameters::default();
    assert_eq!(mixing.weighted_flux(Flavor::ElectronNeutrino, &sample), 1.0);
    assert_eq!(mixing.weighted_flux(Flavor::ElectronAntineutrino, &sample), 2.0);
    assert_eq!(mixing.weighted_flux(Flavor::HeavyNeutrino, &sample), 4.0);
    assert_eq!(mixing.weighted_flux(Flavor::HeavyAntineutrino, &sample), 4.0);
}

#[test]
fn partners_follow_flavor_pairing() {
    let sample = FluxSample::evaluate(&source, 0.0, 10.0);
    let pair = MixingPair {
        own: 0.5,
        partner: 0.25,
    };
    let mixing = MixingParameters {
        nue: pair,
        nuebar: pair,
        nux: pair,
        nuxbar: pair,
    };
    assert_eq!(mixing.weighted_flux(Flavor::ElectronNeutrino, &sample), 0.5 + 1.0);
    assert_eq!(mixing.weighted_flux(Flavor::ElectronAntineutrino, &sample), 1.0 + 1.0);
    assert_eq!(mixing.weighted_flux(Flavor::HeavyNeutrino, &sample), 2.0 + 0.25);
    assert_eq!(mixing.weighted_flux(Flavor::HeavyAntineutrino, &sample), 2.0 + 0.5);
}

#[test]
fn closures_act_as_flux_models() {
    let constant = |_t: f64, _e: f64, _f: Flavor| 3.0;
    assert_eq!(constant.flux(1.0, 2.0, Flavor::HeavyNeutrino), 3.0);
}
