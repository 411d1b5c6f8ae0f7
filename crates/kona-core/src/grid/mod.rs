//! Grid ownership and the per-tick simulation passes

mod cell;
#[allow(clippy::module_inception)]
mod grid;
mod movement;
pub mod rng_trait;
pub mod stats;
mod thermal;

pub use cell::Cell;
pub use grid::{Grid, GridConfig};
pub use movement::ParticleUpdate;
pub use rng_trait::SimRng;
pub use stats::{NoopStats, SimStats};
