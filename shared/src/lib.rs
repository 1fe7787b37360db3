//! Shared types and models for the Shetkari Mitra crop advisor
//!
//! This crate contains the reference tables and the crop suitability logic
//! shared between the backend gateway, the frontend (via WASM), and tests.

pub mod error;
pub mod models;
pub mod reference;
pub mod scoring;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use reference::*;
pub use scoring::*;
pub use types::*;
pub use validation::*;
