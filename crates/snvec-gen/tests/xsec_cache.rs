use snvec_core::{ChannelSelection, ReactionChannel, SnError};
use snvec_gen::{CrossSectionGrid, EnergyTimeGrid};
use snvec_physics::{ibd, StandardCrossSections};
use tempfile::tempdir;

fn grid() -> EnergyTimeGrid {
    EnergyTimeGrid {
        energy_bins: 60,
        ..EnergyTimeGrid::default()
    }
}

fn channels() -> Vec<ReactionChannel> {
    ReactionChannel::catalogue(&ChannelSelection {
        cc_oxygen: false,
        nc_oxygen: false,
        ..ChannelSelection::default()
    })
}

#[test]
fn bins_below_threshold_are_zero() {
    let table = CrossSectionGrid::build(&grid(), &StandardCrossSections::default(), &channels())
        .unwrap();
    let centers = grid().energy_centers();
    for (j, &energy) in centers.iter().enumerate() {
        let sigma = table.total(0, j);
        if energy <= ibd::THRESHOLD {
            assert_eq!(sigma, 0.0);
        } else {
            assert_eq!(sigma, ibd::total_cross_section(energy));
        }
    }
    assert!(table.row(1).iter().all(|&sigma| sigma > 0.0));
}

#[test]
fn saved_table_reloads_for_the_same_grid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("xsec.json");
    let table = CrossSectionGrid::build(&grid(), &StandardCrossSections::default(), &channels())
        .unwrap();
    table.save(&path).unwrap();

    let loaded = CrossSectionGrid::load_for(&path, &grid(), &channels()).unwrap();
    assert_eq!(loaded, table);
}

#[test]
fn table_for_another_grid_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("xsec.json");
    CrossSectionGrid::build(&grid(), &StandardCrossSections::default(), &channels())
        .unwrap()
        .save(&path)
        .unwrap();

    let finer = EnergyTimeGrid {
        energy_width: 0.5,
        energy_bins: 120,
        ..EnergyTimeGrid::default()
    };
    let err = CrossSectionGrid::load_for(&path, &finer, &channels()).unwrap_err();
    assert!(matches!(err, SnError::Config(_)));
    assert_eq!(err.info().code, "xsec-cache-mismatch");

    let ibd_only = ReactionChannel::catalogue(&ChannelSelection::inverse_beta_decay_only());
    let err = CrossSectionGrid::load_for(&path, &grid(), &ibd_only).unwrap_err();
    assert_eq!(err.info().code, "xsec-cache-mismatch");
}
