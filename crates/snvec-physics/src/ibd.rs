//! Inverse beta decay, ν̄e + p → e⁺ + n.
//!
//! Total cross section from the Strumia-Vissani fit; positron energy and
//! angular distribution from the Vogel-Beacom expansion to first order in
//! 1/M.

use snvec_core::constants::{ELECTRON_MASS, NEUTRON_MASS, NEUTRON_PROTON_DELTA, PROTON_MASS};
use snvec_core::DifferentialSample;

/// Neutrino energy at or below which the reaction is closed.
pub const THRESHOLD: f64 = ELECTRON_MASS + NEUTRON_PROTON_DELTA;

const AXIAL_COUPLING: f64 = 1.27;
const AVERAGE_NUCLEON_MASS: f64 = 0.5 * (PROTON_MASS + NEUTRON_MASS);

fn y_squared() -> f64 {
    0.5 * (NEUTRON_PROTON_DELTA * NEUTRON_PROTON_DELTA - ELECTRON_MASS * ELECTRON_MASS)
}

/// Total cross section in cm².
pub fn total_cross_section(energy: f64) -> f64 {
    if energy <= THRESHOLD {
        return 0.0;
    }
    let positron_energy = energy - NEUTRON_PROTON_DELTA;
    let positron_momentum =
        (positron_energy * positron_energy - ELECTRON_MASS * ELECTRON_MASS).sqrt();
    let ln_e = energy.ln();
    let exponent = -0.07056 + 0.02018 * ln_e - 0.001953 * ln_e.powi(3);
    1e-43 * positron_momentum * positron_energy * energy.powf(exponent)
}

/// Positron total energy at first order in 1/M.
pub fn positron_energy(energy: f64, cos_theta: f64) -> f64 {
    let e0 = energy - NEUTRON_PROTON_DELTA;
    let p0 = (e0 * e0 - ELECTRON_MASS * ELECTRON_MASS).max(0.0).sqrt();
    let v0 = if e0 > 0.0 { p0 / e0 } else { 0.0 };
    e0 * (1.0 - energy / AVERAGE_NUCLEON_MASS * (1.0 - v0 * cos_theta))
        - y_squared() / AVERAGE_NUCLEON_MASS
}

/// Differential cross section in cosθ of the positron.
///
/// Normalized so that at zeroth order it integrates to [`total_cross_section`].
pub fn differential(energy: f64, cos_theta: f64) -> DifferentialSample {
    let e1 = positron_energy(energy, cos_theta);
    let e0 = energy - NEUTRON_PROTON_DELTA;
    if energy <= THRESHOLD || e1 <= ELECTRON_MASS {
        return DifferentialSample {
            probability: 0.0,
            secondary_energy: ELECTRON_MASS,
        };
    }
    let p0 = (e0 * e0 - ELECTRON_MASS * ELECTRON_MASS).sqrt();
    let p1 = (e1 * e1 - ELECTRON_MASS * ELECTRON_MASS).sqrt();
    let v1 = p1 / e1;
    let g2 = AXIAL_COUPLING * AXIAL_COUPLING;
    let asymmetry = (1.0 - g2) / (1.0 + 3.0 * g2);
    let phase_space = (e1 * p1) / (e0 * p0);
    DifferentialSample {
        probability: 0.5
            * total_cross_section(energy)
            * (1.0 + asymmetry * v1 * cos_theta)
            * phase_space,
        secondary_energy: e1,
    }
}

/// Neutrino energy that yields a positron of total energy `positron_energy`
/// at `cos_theta`, inverting [`positron_energy`] with the positron velocity
/// taken from `positron_energy` itself.
pub fn neutrino_energy_for_positron(positron_energy: f64, cos_theta: f64) -> Option<f64> {
    if positron_energy <= ELECTRON_MASS {
        return None;
    }
    let velocity =
        (positron_energy * positron_energy - ELECTRON_MASS * ELECTRON_MASS).sqrt() / positron_energy;
    let k = (1.0 - velocity * cos_theta) / AVERAGE_NUCLEON_MASS;
    let constant = NEUTRON_PROTON_DELTA + positron_energy + y_squared() / AVERAGE_NUCLEON_MASS;
    if k <= f64::EPSILON {
        return Some(constant);
    }
    let b = 1.0 + k * NEUTRON_PROTON_DELTA;
    let discriminant = b * b - 4.0 * k * constant;
    if discriminant < 0.0 {
        return None;
    }
    Some((b - discriminant.sqrt()) / (2.0 * k))
}
