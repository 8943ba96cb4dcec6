use criterion::{criterion_group, criterion_main, Criterion};

use snvec_core::{ChannelSelection, ReactionChannel, RngHandle};
use snvec_gen::{
    CrossSectionGrid, EnergyTimeGrid, EventCountSampler, EventDraw, RateIntegrator, RunConfig,
};
use snvec_physics::{QuasiThermalFlux, StandardCrossSections};

fn bench_config() -> RunConfig {
    let mut config = RunConfig::default();
    config.grid = EnergyTimeGrid {
        time_bins: 200,
        time_width: 0.05,
        ..EnergyTimeGrid::default()
    };
    config.channels = ChannelSelection {
        cc_oxygen: false,
        nc_oxygen: false,
        ..ChannelSelection::default()
    };
    config
}

fn bench_integration(c: &mut Criterion) {
    let config = bench_config();
    let flux = QuasiThermalFlux::reference_burst();
    let xsec = StandardCrossSections::default();
    let channels = ReactionChannel::catalogue(&config.channels);
    let table = CrossSectionGrid::build(&config.grid, &xsec, &channels).unwrap();
    let integrator = RateIntegrator::from_config(&config);
    let sampler = EventCountSampler::new(config.volume.resolve());

    c.bench_function("expected_rates", |b| {
        b.iter(|| {
            let _ = integrator.expected_rates(&flux, &table);
        })
    });

    c.bench_function("integrate_and_draw", |b| {
        b.iter(|| {
            let mut rng = RngHandle::from_seed(42);
            let _ = integrator.integrate(
                &flux,
                &table,
                Some(EventDraw {
                    sampler: &sampler,
                    direction: config.unit_direction(),
                    rng: &mut rng,
                }),
            );
        })
    });
}

criterion_group!(benches, bench_integration);
criterion_main!(benches);
