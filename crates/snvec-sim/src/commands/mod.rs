pub mod burst;
pub mod decode;
pub mod diffuse;
pub mod livetime;
pub mod rates;
