//! A single grid slot

use kona_simulation::ParticleState;

/// One slot of the grid: a particle plus render/brush bookkeeping.
///
/// Cells are created once at grid construction and never destroyed
/// individually; only their contents change. A cell carries its own
/// row-major index so anything holding a cell can mark it dirty through
/// the grid without a back-pointer.
#[derive(Clone, Debug)]
pub struct Cell {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) index: usize,
    pub(crate) state: ParticleState,
    /// Cosmetic shade offset (0-4), stable for the cell's lifetime
    pub(crate) color_variation: u8,
    pub(crate) brush_selected: bool,
    pub(crate) brush_outline: bool,
    pub(crate) needs_redraw: bool,
}

impl Cell {
    pub(crate) fn new(x: i32, y: i32, index: usize, state: ParticleState, color_variation: u8) -> Self {
        Self {
            x,
            y,
            index,
            state,
            color_variation,
            brush_selected: false,
            brush_outline: false,
            needs_redraw: false,
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// Row-major index into the grid's cell array
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn particle_state(&self) -> ParticleState {
        self.state
    }

    pub fn color_variation(&self) -> u8 {
        self.color_variation
    }

    pub fn is_brush_selected(&self) -> bool {
        self.brush_selected
    }

    pub fn is_brush_outline(&self) -> bool {
        self.brush_outline
    }
}
