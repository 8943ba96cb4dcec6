use snvec_core::{ErrorInfo, FinalStateEvent, RngHandle, SnError, SubrunKey};
use snvec_gen::{Cylinder, DiffuseConfig, DiffuseGenerator, EventSink, VecSink};
use snvec_physics::ThermalSpectrum;

fn volume() -> Cylinder {
    Cylinder {
        radius: 1490.0,
        half_height: 1610.0,
    }
}

fn spectrum() -> ThermalSpectrum {
    ThermalSpectrum {
        mean_energy: 15.0,
        pinch: 2.0,
        integrated_flux: 10.0,
    }
}

#[test]
fn rejection_mode_stays_inside_the_box() {
    let spectrum = spectrum();
    let config = DiffuseConfig::default();
    let generator = DiffuseGenerator::new(&spectrum, &config, volume()).unwrap();
    assert!(generator.ceiling() > 0.0);

    let mut rng = RngHandle::from_seed(8);
    let outcome = generator.generate(300, None, &mut rng).unwrap();
    assert_eq!(outcome.events.len(), 300);
    for event in &outcome.events {
        assert_eq!(event.channel_id, 0);
        assert_eq!(event.particles.len(), 4);
        assert!(event.neutrino_energy >= config.energy_min);
        assert!(event.neutrino_energy < config.energy_max);
        assert_eq!(event.subrun, None);
        let nu = &event.particles[0];
        let [n, _, e, neutron] = &event.particles[..] else {
            panic!("expected four particles");
        };
        for k in 0..3 {
            assert!((neutron.momentum[k] - (n.momentum[k] - e.momentum[k])).abs() < 1e-12);
        }
        assert_eq!(nu.pdg, -12);
    }

    let estimate = outcome.estimate;
    assert_eq!(estimate.hits, 300);
    assert!(estimate.throws >= estimate.hits);
    assert!(estimate.value > 0.0);
    assert!(estimate.error > 0.0 && estimate.error < estimate.value);
}

#[test]
fn flat_mode_draws_positron_energy_in_range() {
    let spectrum = spectrum();
    let config = DiffuseConfig {
        flat: true,
        ..DiffuseConfig::default()
    };
    let generator = DiffuseGenerator::new(&spectrum, &config, volume()).unwrap();
    let mut rng = RngHandle::from_seed(9);
    let key = SubrunKey {
        run: 85000,
        subrun: 3,
    };
    let outcome = generator.generate(100, Some(key), &mut rng).unwrap();
    assert_eq!(outcome.estimate.throws, 0);
    for event in &outcome.events {
        let positron = &event.particles[2];
        assert!(positron.energy >= config.energy_min && positron.energy < config.energy_max);
        assert!(event.neutrino_energy > positron.energy);
        assert_eq!(event.subrun, Some(key));
    }
}

/// Accepts a fixed number of events, then fails like a full disk.
struct FullAfter {
    room: usize,
    accepted: usize,
}

impl EventSink for FullAfter {
    fn accept(&mut self, _event: FinalStateEvent) -> Result<(), SnError> {
        if self.accepted == self.room {
            return Err(SnError::Io(ErrorInfo::new("io", "no space left")));
        }
        self.accepted += 1;
        Ok(())
    }
}

#[test]
fn huge_counts_stream_into_the_sink() {
    let spectrum = spectrum();
    let config = DiffuseConfig::default();
    let generator = DiffuseGenerator::new(&spectrum, &config, volume()).unwrap();
    let mut sink = FullAfter {
        room: 3,
        accepted: 0,
    };
    let err = generator
        .generate_into(u64::MAX, None, &mut RngHandle::from_seed(2), &mut sink)
        .unwrap_err();
    assert!(matches!(err, SnError::Io(_)));
    assert_eq!(sink.accepted, 3);
}

#[test]
fn streaming_matches_the_collected_sample() {
    let spectrum = spectrum();
    let config = DiffuseConfig::default();
    let generator = DiffuseGenerator::new(&spectrum, &config, volume()).unwrap();
    let collected = generator
        .generate(40, None, &mut RngHandle::from_seed(6))
        .unwrap();
    let mut sink = VecSink::new();
    let estimate = generator
        .generate_into(40, None, &mut RngHandle::from_seed(6), &mut sink)
        .unwrap();
    assert!(sink.finished);
    assert_eq!(sink.events, collected.events);
    assert_eq!(estimate, collected.estimate);
}

#[test]
fn same_seed_repeats_the_sample() {
    let spectrum = spectrum();
    let config = DiffuseConfig::default();
    let generator = DiffuseGenerator::new(&spectrum, &config, volume()).unwrap();
    let a = generator
        .generate(50, None, &mut RngHandle::from_seed(4))
        .unwrap();
    let b = generator
        .generate(50, None, &mut RngHandle::from_seed(4))
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn inverted_energy_range_is_rejected() {
    let spectrum = spectrum();
    let config = DiffuseConfig {
        energy_min: 50.0,
        energy_max: 20.0,
        ..DiffuseConfig::default()
    };
    let err = DiffuseGenerator::new(&spectrum, &config, volume()).unwrap_err();
    assert!(matches!(err, SnError::Config(_)));
}
