//! Particle state types
//!
//! Foundational types for the particle-based simulation.

use crate::ParticleKind;
use serde::{Deserialize, Serialize};

/// Hard floor for any cell temperature (°C)
pub const ABSOLUTE_ZERO_C: f32 = -273.15;

/// Which movement rule applies to a particle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Falls, piles up (sand, gravel, dirt)
    Solid,
    /// Flows, seeks level (water)
    Liquid,
    /// Rises, disperses (steam)
    Gas,
    /// Doesn't move (air, scenery)
    Static,
}

/// A single particle's state, copied freely between cells
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ParticleState {
    /// Material identity (ParticleKind::Air = empty)
    pub kind: ParticleKind,
    /// Current phase; owned by the thermal state machine once the
    /// particle exists, not recomputed from temperature
    pub phase: Phase,
    /// Temperature in °C
    pub temperature: f32,
    /// Incoming heat accumulated during the current tick
    pub temperature_delta: f32,
    /// Progress through an in-flight phase change; positive while
    /// absorbing (melt/vaporize), negative while releasing
    /// (freeze/condense), zero when no transition is active
    pub latent_heat_absorbed: f32,
}

impl ParticleState {
    pub fn is_empty(&self) -> bool {
        self.kind == ParticleKind::Air
    }
}

/// Equality covers (kind, temperature, temperature_delta) only; used to
/// suppress redundant redraw marking.
impl PartialEq for ParticleState {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.temperature == other.temperature
            && self.temperature_delta == other.temperature_delta
    }
}
