//! Poisson event counts per grid cell and vertex placement.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use snvec_core::{ErrorInfo, RandomSource, RawEventRecord, ReactionChannel, SnError, Vec3};

use crate::grid::Bin;

/// Cylindrical tank dimensions in cm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankGeometry {
    /// Radius of the inner detector.
    #[serde(default = "default_inner_radius")]
    pub inner_radius: f64,
    /// Half height of the inner detector.
    #[serde(default = "default_inner_half_height")]
    pub inner_half_height: f64,
    /// Radius of the whole tank.
    #[serde(default = "default_tank_radius")]
    pub tank_radius: f64,
    /// Half height of the whole tank.
    #[serde(default = "default_tank_half_height")]
    pub tank_half_height: f64,
    /// Distance from the inner-detector wall to the fiducial boundary.
    #[serde(default = "default_fiducial_margin")]
    pub fiducial_margin: f64,
}

fn default_inner_radius() -> f64 {
    1690.0
}

fn default_inner_half_height() -> f64 {
    1810.0
}

fn default_tank_radius() -> f64 {
    1965.0
}

fn default_tank_half_height() -> f64 {
    2070.0
}

fn default_fiducial_margin() -> f64 {
    200.0
}

impl Default for TankGeometry {
    fn default() -> Self {
        Self {
            inner_radius: default_inner_radius(),
            inner_half_height: default_inner_half_height(),
            tank_radius: default_tank_radius(),
            tank_half_height: default_tank_half_height(),
            fiducial_margin: default_fiducial_margin(),
        }
    }
}

/// Which part of the tank receives vertices.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DetectorVolume {
    /// Inner detector shrunk by the fiducial margin.
    FiducialVolume,
    /// Full inner detector.
    #[default]
    InnerDetector,
    /// Whole tank including the outer detector.
    EntireTank,
    /// Explicit cylinder.
    Custom {
        /// Radius in cm.
        radius: f64,
        /// Half height in cm.
        half_height: f64,
    },
}

impl DetectorVolume {
    /// Cylinder described by this selection.
    pub fn cylinder(&self, tank: &TankGeometry) -> Cylinder {
        match *self {
            DetectorVolume::FiducialVolume => Cylinder {
                radius: tank.inner_radius - tank.fiducial_margin,
                half_height: tank.inner_half_height - tank.fiducial_margin,
            },
            DetectorVolume::InnerDetector => Cylinder {
                radius: tank.inner_radius,
                half_height: tank.inner_half_height,
            },
            DetectorVolume::EntireTank => Cylinder {
                radius: tank.tank_radius,
                half_height: tank.tank_half_height,
            },
            DetectorVolume::Custom {
                radius,
                half_height,
            } => Cylinder {
                radius,
                half_height,
            },
        }
    }
}

/// Upright cylinder centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    /// Radius in cm.
    pub radius: f64,
    /// Half height in cm.
    pub half_height: f64,
}

impl Cylinder {
    /// Rejects degenerate cylinders.
    pub fn validate(&self) -> Result<(), SnError> {
        if !(self.radius > 0.0) || !(self.half_height > 0.0) {
            return Err(SnError::Config(
                ErrorInfo::new("volume", "vertex volume must have positive radius and height")
                    .with_context("radius", self.radius.to_string())
                    .with_context("half_height", self.half_height.to_string()),
            ));
        }
        Ok(())
    }

    /// Uniform point inside the cylinder.
    ///
    /// Radius is drawn through r² so the density is uniform in volume.
    pub fn sample_vertex<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let r = (rng.uniform(0.0, 1.0) * self.radius * self.radius).sqrt();
        let phi = rng.uniform(0.0, 2.0 * PI);
        let z = rng.uniform(-self.half_height, self.half_height);
        [r * phi.cos(), r * phi.sin(), z]
    }
}

/// Turns a cell's expected rate into discrete interaction records.
#[derive(Debug, Clone, Copy)]
pub struct EventCountSampler {
    volume: Cylinder,
}

impl EventCountSampler {
    /// Sampler placing vertices in `volume`.
    pub fn new(volume: Cylinder) -> Self {
        Self { volume }
    }

    /// Vertex volume.
    pub fn volume(&self) -> Cylinder {
        self.volume
    }

    /// Draws `n ~ Poisson(rate)` records with time and energy flat inside the bins.
    pub fn sample<R: RandomSource + ?Sized>(
        &self,
        rate: f64,
        time_bin: Bin,
        energy_bin: Bin,
        channel: ReactionChannel,
        direction: Vec3,
        rng: &mut R,
    ) -> Vec<RawEventRecord> {
        if !(rate > 0.0) {
            return Vec::new();
        }
        let count = rng.poisson(rate);
        (0..count)
            .map(|_| {
                let time = rng.uniform(time_bin.lo, time_bin.hi);
                let energy = rng.uniform(energy_bin.lo, energy_bin.hi);
                let vertex = self.volume.sample_vertex(rng);
                RawEventRecord {
                    channel,
                    time,
                    energy,
                    direction,
                    vertex,
                }
            })
            .collect()
    }
}
