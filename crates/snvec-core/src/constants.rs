//! Physical constants in MeV and cm.

/// Electron mass.
pub const ELECTRON_MASS: f64 = 0.510_998_95;
/// Proton mass.
pub const PROTON_MASS: f64 = 938.272_088;
/// Neutron mass.
pub const NEUTRON_MASS: f64 = 939.565_420;
/// Neutron-proton mass difference.
pub const NEUTRON_PROTON_DELTA: f64 = NEUTRON_MASS - PROTON_MASS;
/// Kinetic energy given to nucleons emitted in oxygen de-excitation.
pub const EMITTED_NUCLEON_KINETIC: f64 = 0.5;
/// Reference source distance, 10 kpc, in cm.
pub const REFERENCE_DISTANCE_CM: f64 = 3.085_677_6e22;
/// Reference source distance in kpc.
pub const REFERENCE_DISTANCE_KPC: f64 = 10.0;
/// One erg expressed in MeV.
pub const ERG_TO_MEV: f64 = 624_150.907;
/// Offset from an exact angular bound used for near-forward evaluations.
pub const FORWARD_EPSILON: f64 = 1e-6;

/// PDG code of the electron.
pub const PDG_ELECTRON: i32 = 11;
/// PDG code of the positron.
pub const PDG_POSITRON: i32 = -11;
/// PDG code of the photon.
pub const PDG_GAMMA: i32 = 22;
