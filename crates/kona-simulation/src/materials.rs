//! Material definitions and catalog

use crate::{ParticleState, Phase};
use serde::{Deserialize, Serialize};

/// The enumerated material kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ParticleKind {
    /// Empty space
    Air = 0,
    Sand = 1,
    Gravel = 2,
    Dirt = 3,
    Stone = 4,
    Water = 5,
}

impl ParticleKind {
    /// Every kind the catalog must cover
    pub const ALL: [ParticleKind; 6] = [
        ParticleKind::Air,
        ParticleKind::Sand,
        ParticleKind::Gravel,
        ParticleKind::Dirt,
        ParticleKind::Stone,
        ParticleKind::Water,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ParticleKind::Air => "air",
            ParticleKind::Sand => "sand",
            ParticleKind::Gravel => "gravel",
            ParticleKind::Dirt => "dirt",
            ParticleKind::Stone => "stone",
            ParticleKind::Water => "water",
        }
    }
}

impl std::fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Startup-time configuration errors; these must surface before the
/// first simulation tick, never during one
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("no catalog entry for material kind '{0}'")]
    MissingMaterial(ParticleKind),

    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
}

/// Physical constants for one material kind
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Heat required to raise temperature (per °C)
    pub specific_heat: f32,
    /// Heat conductivity (0.0 - 1.0)
    pub thermal_conductivity: f32,
    /// Solid/liquid boundary (°C)
    pub melting_point: f32,
    /// Liquid/gas boundary (°C)
    pub boiling_point: f32,
    /// Heat absorbed across the solid/liquid boundary
    pub latent_heat_fusion: f32,
    /// Heat absorbed across the liquid/gas boundary
    pub latent_heat_vaporization: f32,
    /// Whether the solid movement rule applies
    pub affected_by_gravity: bool,
}

/// Catalog of all materials, validated once before simulation starts
#[derive(Clone, Debug, Default)]
pub struct MaterialCatalog {
    entries: Vec<Option<MaterialProperties>>,
}

impl MaterialCatalog {
    /// Empty catalog; fails validation until every kind is registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog covering every built-in kind
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.register_defaults();
        catalog
    }

    fn register_defaults(&mut self) {
        self.register(
            ParticleKind::Air,
            MaterialProperties {
                specific_heat: 1.0,
                thermal_conductivity: 0.025,
                melting_point: -218.8,
                boiling_point: -194.3,
                latent_heat_fusion: 13.9,
                latent_heat_vaporization: 213.0,
                affected_by_gravity: false,
            },
        );

        self.register(
            ParticleKind::Sand,
            MaterialProperties {
                specific_heat: 0.83,
                thermal_conductivity: 0.25,
                melting_point: 1700.0,
                boiling_point: 2230.0,
                latent_heat_fusion: 320.0,
                latent_heat_vaporization: 1800.0,
                affected_by_gravity: true,
            },
        );

        self.register(
            ParticleKind::Gravel,
            MaterialProperties {
                specific_heat: 0.84,
                thermal_conductivity: 0.3,
                melting_point: 1250.0,
                boiling_point: 2800.0,
                latent_heat_fusion: 400.0,
                latent_heat_vaporization: 2000.0,
                affected_by_gravity: true,
            },
        );

        self.register(
            ParticleKind::Dirt,
            MaterialProperties {
                specific_heat: 1.05,
                thermal_conductivity: 0.15,
                melting_point: 1100.0,
                boiling_point: 2600.0,
                latent_heat_fusion: 350.0,
                latent_heat_vaporization: 1900.0,
                affected_by_gravity: true,
            },
        );

        // Stone is immovable scenery, not a falling powder
        self.register(
            ParticleKind::Stone,
            MaterialProperties {
                specific_heat: 0.84,
                thermal_conductivity: 0.3,
                melting_point: 1200.0,
                boiling_point: 2900.0,
                latent_heat_fusion: 420.0,
                latent_heat_vaporization: 2100.0,
                affected_by_gravity: false,
            },
        );

        self.register(
            ParticleKind::Water,
            MaterialProperties {
                specific_heat: 4.18,
                thermal_conductivity: 0.6,
                melting_point: 0.0,
                boiling_point: 100.0,
                latent_heat_fusion: 334.0,
                latent_heat_vaporization: 2260.0,
                affected_by_gravity: true,
            },
        );
    }

    pub fn register(&mut self, kind: ParticleKind, properties: MaterialProperties) {
        let id = kind as usize;
        if self.entries.len() <= id {
            self.entries.resize(id + 1, None);
        }
        self.entries[id] = Some(properties);
    }

    /// Get properties by kind; `None` only for an unvalidated catalog
    pub fn get(&self, kind: ParticleKind) -> Option<&MaterialProperties> {
        self.entries.get(kind as usize).and_then(Option::as_ref)
    }

    /// Get properties by kind, reporting a missing entry
    pub fn properties_of(&self, kind: ParticleKind) -> Result<&MaterialProperties, ConfigError> {
        self.get(kind).ok_or(ConfigError::MissingMaterial(kind))
    }

    /// Check that every enumerated kind has an entry. Called at grid
    /// construction so an incomplete catalog fails before the first
    /// tick rather than mid-simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in ParticleKind::ALL {
            self.properties_of(kind)?;
        }
        Ok(())
    }

    /// Default phase when materializing a brand-new particle. Once a
    /// particle exists its phase is owned by the thermal state machine;
    /// recomputing it from temperature alone would oscillate at the
    /// boundary values.
    pub fn phase_for(&self, kind: ParticleKind, temperature: f32) -> Phase {
        if kind == ParticleKind::Air {
            return Phase::Static;
        }
        match self.get(kind) {
            Some(props) if temperature < props.melting_point => Phase::Solid,
            Some(props) if temperature < props.boiling_point => Phase::Liquid,
            Some(_) => Phase::Gas,
            // Unreachable once validate() has passed; inert is the
            // safe answer for an unknown material
            None => Phase::Static,
        }
    }

    /// State for a freshly materialized particle
    pub fn default_state(&self, kind: ParticleKind, temperature: f32) -> ParticleState {
        ParticleState {
            kind,
            phase: self.phase_for(kind, temperature),
            temperature,
            temperature_delta: 0.0,
            latent_heat_absorbed: 0.0,
        }
    }
}
