//! HTTP handlers

pub mod health;
pub mod mandi;
pub mod prediction;

pub use health::*;
pub use mandi::*;
pub use prediction::*;
