//! Tree-level neutrino-electron elastic scattering.

use snvec_core::constants::{ELECTRON_MASS, FORWARD_EPSILON};
use snvec_core::{DifferentialSample, Flavor};

/// Weak mixing angle, sin²θ_W.
pub const SIN2_THETA_W: f64 = 0.2312;

/// 2 G_F² mₑ² / π in cm².
const SIGMA_0: f64 = 88.06e-46;

/// Smallest recoil total energy counted when nothing else is configured.
pub const DEFAULT_MIN_TOTAL_ENERGY: f64 = ELECTRON_MASS + FORWARD_EPSILON;

/// Chiral couplings (g1, g2) for the flavor.
pub fn couplings(flavor: Flavor) -> (f64, f64) {
    let s = SIN2_THETA_W;
    match flavor {
        Flavor::ElectronNeutrino => (0.5 + s, s),
        Flavor::ElectronAntineutrino => (s, 0.5 + s),
        Flavor::HeavyNeutrino => (-0.5 + s, s),
        Flavor::HeavyAntineutrino => (s, -0.5 + s),
    }
}

/// Maximum electron recoil kinetic energy.
pub fn max_recoil(energy: f64) -> f64 {
    2.0 * energy * energy / (ELECTRON_MASS + 2.0 * energy)
}

/// Recoil kinetic energy at scattering angle `cos_theta`.
pub fn recoil_kinetic(energy: f64, cos_theta: f64) -> f64 {
    let c2 = cos_theta * cos_theta;
    let e2 = energy * energy;
    let sum = ELECTRON_MASS + energy;
    2.0 * ELECTRON_MASS * e2 * c2 / (sum * sum - e2 * c2)
}

/// Jacobian dT/dcosθ.
pub fn recoil_jacobian(energy: f64, cos_theta: f64) -> f64 {
    let e2 = energy * energy;
    let sum = ELECTRON_MASS + energy;
    let denom = sum * sum - e2 * cos_theta * cos_theta;
    4.0 * ELECTRON_MASS * e2 * sum * sum * cos_theta / (denom * denom)
}

/// cosθ at which the electron carries total energy `min_total_energy`.
///
/// Values with magnitude above one mean the recoil cannot reach that energy.
pub fn cos_threshold(energy: f64, min_total_energy: f64) -> f64 {
    let kinetic = (min_total_energy - ELECTRON_MASS).max(0.0);
    (energy + ELECTRON_MASS) / energy * (kinetic / (kinetic + 2.0 * ELECTRON_MASS)).sqrt()
}

/// dσ/dT in cm²/MeV.
pub fn differential_in_recoil(flavor: Flavor, energy: f64, kinetic: f64) -> f64 {
    if kinetic < 0.0 || kinetic > max_recoil(energy) * (1.0 + 1e-12) {
        return 0.0;
    }
    let (g1, g2) = couplings(flavor);
    let y = 1.0 - kinetic / energy;
    SIGMA_0 / ELECTRON_MASS
        * (g1 * g1 + g2 * g2 * y * y - g1 * g2 * ELECTRON_MASS * kinetic / (energy * energy))
}

/// Neutrino energy below which no recoil reaches `min_total_energy`.
pub fn threshold_energy(min_total_energy: f64) -> f64 {
    let kinetic = (min_total_energy - ELECTRON_MASS).max(0.0);
    0.5 * (kinetic + (kinetic * kinetic + 2.0 * kinetic * ELECTRON_MASS).sqrt())
}

/// Total cross section in cm² for recoils with total energy of at least
/// `min_total_energy`.
///
/// Integrates dσ/dT over [T_min, T_max]; zero once T_min reaches T_max.
pub fn total_cross_section(flavor: Flavor, energy: f64, min_total_energy: f64) -> f64 {
    if energy <= 0.0 {
        return 0.0;
    }
    let t_min = (min_total_energy - ELECTRON_MASS).max(0.0);
    let t_max = max_recoil(energy);
    if t_min >= t_max {
        return 0.0;
    }
    let (g1, g2) = couplings(flavor);
    let primitive = |t: f64| {
        let y = 1.0 - t / energy;
        g1 * g1 * t - g2 * g2 * energy / 3.0 * y * y * y
            - g1 * g2 * ELECTRON_MASS * t * t / (2.0 * energy * energy)
    };
    SIGMA_0 / ELECTRON_MASS * (primitive(t_max) - primitive(t_min))
}

/// Differential cross section in cosθ of the recoil electron.
pub fn differential(flavor: Flavor, energy: f64, cos_theta: f64) -> DifferentialSample {
    if cos_theta <= 0.0 || energy <= 0.0 {
        return DifferentialSample {
            probability: 0.0,
            secondary_energy: ELECTRON_MASS,
        };
    }
    let kinetic = recoil_kinetic(energy, cos_theta);
    DifferentialSample {
        probability: differential_in_recoil(flavor, energy, kinetic)
            * recoil_jacobian(energy, cos_theta),
        secondary_energy: kinetic + ELECTRON_MASS,
    }
}
