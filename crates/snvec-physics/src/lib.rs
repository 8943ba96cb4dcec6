#![deny(missing_docs)]
#![doc = "Concrete flux and cross-section providers for a water Cherenkov target."]

pub mod elastic;
pub mod flux;
pub mod ibd;
pub mod interpolate;
pub mod oxygen;
pub mod spectrum;
pub mod standard;

pub use flux::{FluxTable, QuasiThermalFlux};
pub use oxygen::{OxygenCrossSections, OxygenTables};
pub use spectrum::{TabulatedSpectrum, ThermalSpectrum};
pub use standard::StandardCrossSections;
