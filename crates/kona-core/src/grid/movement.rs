//! Movement rules - per-phase particle movement physics
//!
//! Each rule is a pure function from (grid, x, y) to a proposed cell
//! transition; the grid applies the result. Dice rolls go through named
//! probability constants so the state machine stays auditable.

use kona_simulation::Phase;
use smallvec::{smallvec, SmallVec};

use super::grid::Grid;
use super::rng_trait::SimRng;

/// Chance a falling solid displaces the liquid beneath it
/// (the remaining 1-in-3 draws leave it resting on the surface)
const SOLID_SINKS_THROUGH_LIQUID: f32 = 2.0 / 3.0;

/// Chance a liquid takes an open move; the reserved 1-in-30 "stick"
/// makes the flow read as slightly viscous
const LIQUID_FLOWS: f32 = 29.0 / 30.0;

/// Candidate directions for gas dispersal: up, both upper diagonals,
/// both sides, both lower diagonals
const GAS_OFFSETS: [(i32, i32); 7] = [
    (0, -1),
    (-1, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (1, 1),
];

/// Outcome of evaluating one cell's movement rule
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleUpdate {
    /// Copy the source state to the destination, clear the source
    Move { to: usize },
    /// Exchange the states of source and destination
    Swap { with: usize },
    NoOp,
}

/// Dispatch on the cell's phase. Static particles and solids that are
/// not affected by gravity never move.
pub(crate) fn evaluate<R: SimRng>(grid: &Grid, x: i32, y: i32, rng: &mut R) -> ParticleUpdate {
    let Some(cell) = grid.get_cell(x, y) else {
        return ParticleUpdate::NoOp;
    };
    let state = cell.particle_state();
    match state.phase {
        Phase::Solid => {
            let falls = grid
                .material(state.kind)
                .map(|props| props.affected_by_gravity)
                .unwrap_or(false);
            if falls {
                update_solid(grid, x, y, rng)
            } else {
                ParticleUpdate::NoOp
            }
        }
        Phase::Liquid => update_liquid(grid, x, y, rng),
        Phase::Gas => update_gas(grid, x, y, rng),
        Phase::Static => ParticleUpdate::NoOp,
    }
}

/// Gravity solids: straight down, then the two down-diagonals. The
/// diagonal direction is fixed by x parity, not a die roll, so piles
/// slope symmetrically.
fn update_solid<R: SimRng>(grid: &Grid, x: i32, y: i32, rng: &mut R) -> ParticleUpdate {
    let dir = if x % 2 == 0 { -1 } else { 1 };
    let candidates: SmallVec<[(i32, i32); 3]> =
        smallvec![(x, y + 1), (x + dir, y + 1), (x - dir, y + 1)];

    for (cx, cy) in candidates {
        let Some(target) = grid.get_cell(cx, cy) else {
            continue;
        };
        let target_state = target.particle_state();
        if target_state.is_empty() {
            return ParticleUpdate::Move { to: target.index() };
        }
        if target_state.phase == Phase::Liquid
            && rng.check_probability(SOLID_SINKS_THROUGH_LIQUID)
        {
            return ParticleUpdate::Swap {
                with: target.index(),
            };
        }
        // blocked; try the next candidate
    }
    ParticleUpdate::NoOp
}

/// Liquids: down, then the diagonal pair in a random direction, then
/// pure horizontal in the same direction. Only open (Air) targets are
/// taken; the first one that passes the flow roll wins.
fn update_liquid<R: SimRng>(grid: &Grid, x: i32, y: i32, rng: &mut R) -> ParticleUpdate {
    let dir = if rng.gen_bool() { 1 } else { -1 };
    let candidates: SmallVec<[(i32, i32); 5]> = smallvec![
        (x, y + 1),
        (x + dir, y + 1),
        (x - dir, y + 1),
        (x + dir, y),
        (x - dir, y),
    ];

    for (cx, cy) in candidates {
        let Some(target) = grid.get_cell(cx, cy) else {
            continue;
        };
        if target.particle_state().is_empty() && rng.check_probability(LIQUID_FLOWS) {
            return ParticleUpdate::Move { to: target.index() };
        }
    }
    ParticleUpdate::NoOp
}

/// Gases: one of seven directions chosen uniformly; open cells are
/// entered, other gases and liquids are displaced, everything else
/// blocks for this tick.
fn update_gas<R: SimRng>(grid: &Grid, x: i32, y: i32, rng: &mut R) -> ParticleUpdate {
    let (dx, dy) = GAS_OFFSETS[rng.gen_index(GAS_OFFSETS.len())];
    let Some(target) = grid.get_cell(x + dx, y + dy) else {
        return ParticleUpdate::NoOp;
    };
    let target_state = target.particle_state();
    if target_state.is_empty() {
        return ParticleUpdate::Move { to: target.index() };
    }
    match target_state.phase {
        Phase::Gas | Phase::Liquid => ParticleUpdate::Swap {
            with: target.index(),
        },
        _ => ParticleUpdate::NoOp,
    }
}
