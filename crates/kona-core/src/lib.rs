//! Falling-sand sandbox core: particle grid simulation plus the
//! interactive brush that edits it.
//!
//! The crate is renderer-agnostic. A host drives [`Grid::update`] once
//! per frame, forwards pointer and key events to [`Brush`], and redraws
//! whatever [`Grid::dirty_cells`] reports.

pub mod brush;
pub mod grid;

/// Material and particle definitions, re-exported for hosts that only
/// depend on the core crate
pub mod simulation {
    pub use kona_simulation::*;
}

pub use brush::{
    Brush, BrushKey, BrushShape, ModifierFlags, PointerButton, UndoError, MAX_BRUSH_RADIUS,
    MIN_BRUSH_RADIUS,
};
pub use grid::{Cell, Grid, GridConfig, NoopStats, SimRng, SimStats};
