//! Domain models for the Shetkari Mitra crop advisor

mod crop;
mod district;
mod mandi;
mod prediction;
mod season;
mod soil;
mod weather;

pub use crop::*;
pub use district::*;
pub use mandi::*;
pub use prediction::*;
pub use season::*;
pub use soil::*;
pub use weather::*;
