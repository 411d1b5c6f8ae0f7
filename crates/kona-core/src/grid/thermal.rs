//! Thermal engine - pairwise heat diffusion and phase transitions
//!
//! Runs once per tick, after movement, in three strictly ordered phases:
//! diffusion accumulation, delta application, and phase-transition
//! settlement. Splitting accumulation from application makes the heat
//! exchange symmetric regardless of iteration order.

use kona_simulation::{MaterialCatalog, MaterialProperties, ParticleState, Phase, ABSOLUTE_ZERO_C};

use super::cell::Cell;
use super::grid::mark_dirty;
use super::stats::SimStats;

/// Tolerance when deciding an in-flight transition has finished
const LATENT_EPSILON: f32 = 1e-3;

/// Forward-facing neighbor offsets: right, lower-right, down,
/// lower-left. Each unordered cell pair is visited exactly once across
/// the whole grid.
const FORWARD_OFFSETS: [(i32, i32); 4] = [(1, 0), (1, 1), (0, 1), (-1, 1)];

pub(crate) struct ThermalEngine {
    diffusion_rate: f32,
    max_latent_rate: f32,
    /// Per-cell heat accumulator, reused across ticks
    scratch: Vec<f32>,
}

impl ThermalEngine {
    pub(crate) fn new(diffusion_rate: f32, max_latent_rate: f32) -> Self {
        Self {
            diffusion_rate,
            max_latent_rate,
            scratch: Vec::new(),
        }
    }

    /// One thermal pass over every cell
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn step(
        &mut self,
        cells: &mut [Cell],
        width: i32,
        height: i32,
        catalog: &MaterialCatalog,
        ambient_temperature: f32,
        dirty: &mut Vec<usize>,
        stats: &mut dyn SimStats,
    ) {
        let count = cells.len();
        self.scratch.clear();
        self.scratch.resize(count, 0.0);

        // Phase 1: accumulate pairwise deltas over forward neighbors.
        // Off-grid neighbors act as an infinite heat bath at ambient
        // temperature, with no reciprocal term.
        for index in 0..count {
            let x = cells[index].x;
            let y = cells[index].y;
            let temperature = cells[index].state.temperature;
            for (dx, dy) in FORWARD_OFFSETS {
                let nx = x + dx;
                let ny = y + dy;
                if nx >= 0 && ny >= 0 && nx < width && ny < height {
                    let neighbor = (ny * width + nx) as usize;
                    let delta =
                        (cells[neighbor].state.temperature - temperature) * self.diffusion_rate;
                    self.scratch[index] += delta;
                    self.scratch[neighbor] -= delta;
                } else {
                    self.scratch[index] +=
                        (ambient_temperature - temperature) * self.diffusion_rate;
                }
            }
        }

        // Phase 2: drain the accumulator into temperature_delta so
        // settlement sees incoming heat before committing it
        for index in 0..count {
            cells[index].state.temperature_delta += self.scratch[index];
        }

        // Phase 3: settle each cell independently
        for index in 0..count {
            let before = cells[index].state;
            let Some(props) = catalog.get(before.kind) else {
                continue;
            };
            self.settle(&mut cells[index].state, props, stats);
            let after = cells[index].state;
            if after != before || after.phase != before.phase {
                mark_dirty(cells, dirty, index);
            }
        }
    }

    /// Phase-transition settlement for one cell.
    ///
    /// `latent_heat_absorbed` is non-zero only while a transition is in
    /// flight; it is the sole state distinguishing "at the melting point
    /// but still solid" from "at the melting point and now liquid", which
    /// keeps the temperature/phase pair from flapping at boundary values.
    fn settle(
        &self,
        state: &mut ParticleState,
        props: &MaterialProperties,
        stats: &mut dyn SimStats,
    ) {
        let heat = state.temperature_delta;
        match state.phase {
            Phase::Solid if state.temperature >= props.melting_point && heat > 0.0 => {
                self.absorb(
                    state,
                    heat,
                    props.melting_point,
                    props.latent_heat_fusion,
                    props.specific_heat,
                    Phase::Liquid,
                    stats,
                );
            }
            Phase::Liquid if state.temperature >= props.boiling_point && heat > 0.0 => {
                self.absorb(
                    state,
                    heat,
                    props.boiling_point,
                    props.latent_heat_vaporization,
                    props.specific_heat,
                    Phase::Gas,
                    stats,
                );
            }
            Phase::Liquid if state.temperature <= props.melting_point && heat < 0.0 => {
                self.release(
                    state,
                    heat,
                    props.melting_point,
                    props.latent_heat_fusion,
                    props.specific_heat,
                    Phase::Solid,
                    stats,
                );
            }
            Phase::Gas if state.temperature <= props.boiling_point && heat < 0.0 => {
                self.release(
                    state,
                    heat,
                    props.boiling_point,
                    props.latent_heat_vaporization,
                    props.specific_heat,
                    Phase::Liquid,
                    stats,
                );
            }
            // No active transition: commit the delta directly
            _ => {
                state.temperature += heat;
                state.latent_heat_absorbed = 0.0;
            }
        }
        state.temperature_delta = 0.0;
        if state.temperature < ABSOLUTE_ZERO_C {
            state.temperature = ABSOLUTE_ZERO_C;
        }
    }

    /// Absorb incoming heat into an upward transition (melt, vaporize),
    /// holding the temperature pinned at the transition point
    #[allow(clippy::too_many_arguments)]
    fn absorb(
        &self,
        state: &mut ParticleState,
        heat: f32,
        transition_point: f32,
        latent_heat: f32,
        specific_heat: f32,
        next_phase: Phase,
        stats: &mut dyn SimStats,
    ) {
        let room = latent_heat - state.latent_heat_absorbed;
        let transfer = heat.min(room).min(self.max_latent_rate);
        state.latent_heat_absorbed += transfer;
        state.temperature = transition_point;
        if state.latent_heat_absorbed >= latent_heat - LATENT_EPSILON {
            state.phase = next_phase;
            state.latent_heat_absorbed = 0.0;
            state.temperature += (heat - transfer) / specific_heat;
            stats.record_phase_change();
        }
    }

    /// Release outgoing heat through a downward transition (freeze,
    /// condense); the accumulator runs negative toward -latent_heat
    #[allow(clippy::too_many_arguments)]
    fn release(
        &self,
        state: &mut ParticleState,
        heat: f32,
        transition_point: f32,
        latent_heat: f32,
        specific_heat: f32,
        next_phase: Phase,
        stats: &mut dyn SimStats,
    ) {
        let room = latent_heat + state.latent_heat_absorbed;
        let transfer = (-heat).min(room).min(self.max_latent_rate);
        state.latent_heat_absorbed -= transfer;
        state.temperature = transition_point;
        if -state.latent_heat_absorbed >= latent_heat - LATENT_EPSILON {
            state.phase = next_phase;
            state.latent_heat_absorbed = 0.0;
            state.temperature += (heat + transfer) / specific_heat;
            stats.record_phase_change();
        }
    }
}
