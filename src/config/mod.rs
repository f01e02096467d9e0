//! Configuration module for a4988-motion.
//!
//! Provides types for loading and validating the engine configuration from
//! TOML (with the `std` feature) or pre-parsed data.

mod engine;
mod limits;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use engine::EngineConfig;
pub use limits::SoftLimits;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};
