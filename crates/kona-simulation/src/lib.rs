//! Material simulation data for kona
//!
//! This crate provides the foundational data types for the particle
//! simulation:
//! - Material catalog (ParticleKind, MaterialProperties, MaterialCatalog)
//! - Particle state and phases (ParticleState, Phase)
//! - Startup configuration errors (ConfigError)

mod materials;
mod particle;

pub use materials::{ConfigError, MaterialCatalog, MaterialProperties, ParticleKind};
pub use particle::{ABSOLUTE_ZERO_C, ParticleState, Phase};
