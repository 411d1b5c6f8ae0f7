//! Simulation statistics collection trait

/// Trait for collecting per-tick simulation statistics
///
/// This allows the core to record counters without depending on whatever
/// the embedding application does with them (HUD, logging, nothing).
pub trait SimStats {
    /// Record that a particle moved or swapped during the movement pass
    fn record_particle_moved(&mut self);

    /// Record that a phase transition completed (melt, freeze, ...)
    fn record_phase_change(&mut self);
}

/// A no-op implementation for when stats collection is not needed
#[derive(Default)]
pub struct NoopStats;

impl SimStats for NoopStats {
    fn record_particle_moved(&mut self) {}
    fn record_phase_change(&mut self) {}
}
