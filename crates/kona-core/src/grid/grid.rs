//! The particle grid: flat cell storage, tick driver, dirty tracking

use kona_simulation::{
    ConfigError, MaterialCatalog, MaterialProperties, ParticleKind, ParticleState,
};
use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::movement::{self, ParticleUpdate};
use super::rng_trait::SimRng;
use super::stats::{NoopStats, SimStats};
use super::thermal::ThermalEngine;

/// Tunables for a grid, applied once at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Grid width in cells
    pub width: i32,
    /// Grid height in cells
    pub height: i32,
    /// Temperature of the infinite heat bath beyond the grid edge (°C);
    /// also the temperature freshly painted particles materialize at
    pub ambient_temperature: f32,
    /// Fraction of a temperature difference exchanged per neighbor pair
    /// per tick (sensible range 0.01 - 0.05)
    pub diffusion_rate: f32,
    /// Cap on latent heat transferred into an in-flight phase change
    /// per tick
    pub max_latent_rate: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 96,
            ambient_temperature: 20.0,
            diffusion_rate: 0.02,
            max_latent_rate: 25.0,
        }
    }
}

/// Owns every cell of the sandbox and runs one simulation tick at a time.
///
/// The grid is the only shared mutable resource in the core and has
/// exactly one writer per tick; correctness rests on iteration-order
/// discipline, not locking.
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    dirty: Vec<usize>,
    catalog: MaterialCatalog,
    thermal: ThermalEngine,
    ambient_temperature: f32,
}

impl Grid {
    /// Grid with default tunables. The catalog is validated here so an
    /// incomplete one fails before the first tick.
    pub fn new(width: i32, height: i32, catalog: MaterialCatalog) -> Result<Self, ConfigError> {
        Self::with_config(
            GridConfig {
                width,
                height,
                ..GridConfig::default()
            },
            catalog,
        )
    }

    pub fn with_config(config: GridConfig, catalog: MaterialCatalog) -> Result<Self, ConfigError> {
        if config.width <= 0 || config.height <= 0 {
            return Err(ConfigError::InvalidDimensions {
                width: config.width,
                height: config.height,
            });
        }
        catalog.validate()?;

        let mut rng = rand::thread_rng();
        let air = catalog.default_state(ParticleKind::Air, config.ambient_temperature);
        let mut cells = Vec::with_capacity((config.width * config.height) as usize);
        for y in 0..config.height {
            for x in 0..config.width {
                let index = (y * config.width + x) as usize;
                cells.push(Cell::new(x, y, index, air, rng.gen_index(5) as u8));
            }
        }

        log::debug!(
            "created {}x{} grid, ambient {} °C",
            config.width,
            config.height,
            config.ambient_temperature
        );

        Ok(Self {
            width: config.width,
            height: config.height,
            cells,
            dirty: Vec::new(),
            catalog,
            thermal: ThermalEngine::new(config.diffusion_rate, config.max_latent_rate),
            ambient_temperature: config.ambient_temperature,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn ambient_temperature(&self) -> f32 {
        self.ambient_temperature
    }

    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    /// Bounds-checked cell lookup; `None` for any coordinate outside the
    /// grid, including negative values
    pub fn get_cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index_of(x, y).map(|index| &self.cells[index])
    }

    /// Overwrite a cell with a freshly materialized particle of `kind`
    /// at ambient temperature. Out-of-bounds coordinates are ignored.
    pub fn set_kind(&mut self, x: i32, y: i32, kind: ParticleKind) {
        if let Some(index) = self.index_of(x, y) {
            let state = self.catalog.default_state(kind, self.ambient_temperature);
            self.set_state_at(index, state);
        }
    }

    /// Reset every cell to `kind` at 0 °C and mark the whole grid dirty
    pub fn clear(&mut self, kind: ParticleKind) {
        let state = self.catalog.default_state(kind, 0.0);
        for index in 0..self.cells.len() {
            self.cells[index].state = state;
            self.mark_dirty_at(index);
        }
    }

    /// One full simulation tick: movement pass, then thermal pass
    pub fn update<R: SimRng>(&mut self, rng: &mut R, stats: &mut dyn SimStats) {
        self.movement_pass(rng, stats);
        self.thermal_pass(stats);
    }

    /// Convenience tick with the process RNG and no stats collection
    pub fn tick(&mut self) {
        let mut rng = rand::thread_rng();
        self.update(&mut rng, &mut NoopStats);
    }

    /// Drain the coordinates of every cell needing re-render. This is the
    /// read interface the external renderer consumes; each dirty cell is
    /// reported exactly once per consumption.
    pub fn dirty_cells(&mut self) -> Vec<(i32, i32)> {
        let indices = std::mem::take(&mut self.dirty);
        let mut out = Vec::with_capacity(indices.len());
        for index in indices {
            let cell = &mut self.cells[index];
            cell.needs_redraw = false;
            out.push((cell.x, cell.y));
        }
        out
    }

    pub(crate) fn material(&self, kind: ParticleKind) -> Option<&MaterialProperties> {
        self.catalog.get(kind)
    }

    /// Write a cell's state, marking it dirty unless the new state
    /// compares equal (kind, temperature, temperature_delta)
    pub(crate) fn set_state_at(&mut self, index: usize, state: ParticleState) {
        let changed = self.cells[index].state != state;
        self.cells[index].state = state;
        if changed {
            self.mark_dirty_at(index);
        }
    }

    pub(crate) fn mark_dirty_at(&mut self, index: usize) {
        mark_dirty(&mut self.cells, &mut self.dirty, index);
    }

    pub(crate) fn set_brush_outline(&mut self, x: i32, y: i32, outline: bool) {
        if let Some(index) = self.index_of(x, y) {
            if self.cells[index].brush_outline != outline {
                self.cells[index].brush_outline = outline;
                self.mark_dirty_at(index);
            }
        }
    }

    pub(crate) fn set_brush_selected(&mut self, x: i32, y: i32, selected: bool) {
        if let Some(index) = self.index_of(x, y) {
            if self.cells[index].brush_selected != selected {
                self.cells[index].brush_selected = selected;
                self.mark_dirty_at(index);
            }
        }
    }

    /// Row-major copy of every cell's particle state (undo snapshots)
    pub(crate) fn snapshot_states(&self) -> Vec<ParticleState> {
        self.cells.iter().map(|cell| cell.state).collect()
    }

    /// Restore a row-major snapshot; the caller has already checked the
    /// length against `cell_count`
    pub(crate) fn restore_states(&mut self, states: &[ParticleState]) {
        for (index, state) in states.iter().enumerate() {
            self.set_state_at(index, *state);
        }
    }

    /// Movement pass: rows bottom to top, scan direction alternating by
    /// row parity. The serpentine order is load-bearing; a fixed
    /// left-to-right scan visibly skews granular flow to one side.
    fn movement_pass<R: SimRng>(&mut self, rng: &mut R, stats: &mut dyn SimStats) {
        for y in (0..self.height).rev() {
            if y % 2 == 0 {
                for x in 0..self.width {
                    self.step_cell(x, y, rng, stats);
                }
            } else {
                for x in (0..self.width).rev() {
                    self.step_cell(x, y, rng, stats);
                }
            }
        }
    }

    fn step_cell<R: SimRng>(&mut self, x: i32, y: i32, rng: &mut R, stats: &mut dyn SimStats) {
        let update = movement::evaluate(self, x, y, rng);
        if update == ParticleUpdate::NoOp {
            return;
        }
        if let Some(source) = self.index_of(x, y) {
            self.apply_update(source, update, stats);
        }
    }

    /// Movement only reassigns particle states between two cells already
    /// resolved through bounds-checked lookups; it never creates or
    /// destroys a particle.
    fn apply_update(&mut self, source: usize, update: ParticleUpdate, stats: &mut dyn SimStats) {
        match update {
            ParticleUpdate::NoOp => {}
            ParticleUpdate::Move { to } => {
                let state = self.cells[source].state;
                let vacated = self
                    .catalog
                    .default_state(ParticleKind::Air, self.ambient_temperature);
                self.set_state_at(to, state);
                self.set_state_at(source, vacated);
                stats.record_particle_moved();
            }
            ParticleUpdate::Swap { with } => {
                let a = self.cells[source].state;
                let b = self.cells[with].state;
                self.set_state_at(source, b);
                self.set_state_at(with, a);
                stats.record_particle_moved();
            }
        }
    }

    pub(crate) fn thermal_pass(&mut self, stats: &mut dyn SimStats) {
        let Grid {
            width,
            height,
            cells,
            dirty,
            catalog,
            thermal,
            ambient_temperature,
        } = self;
        thermal.step(
            cells,
            *width,
            *height,
            catalog,
            *ambient_temperature,
            dirty,
            stats,
        );
    }
}

/// Push a cell index onto the dirty list, deduplicated through the
/// cell's needs_redraw flag
pub(crate) fn mark_dirty(cells: &mut [Cell], dirty: &mut Vec<usize>, index: usize) {
    let cell = &mut cells[index];
    if !cell.needs_redraw {
        cell.needs_redraw = true;
        dirty.push(index);
    }
}
