//! RNG trait abstraction for the simulation
//!
//! Movement rules draw tie-breaks and "dice rolls" through this trait so
//! tests can substitute a deterministic source. Determinism across runs
//! is not guaranteed or required for normal operation.

/// Random number generator trait for the simulation
pub trait SimRng {
    /// Generate random boolean with 50% probability
    fn gen_bool(&mut self) -> bool;

    /// Generate random f32 in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;

    /// Generate random index in [0, n)
    fn gen_index(&mut self, n: usize) -> usize;

    /// Check if random value is less than probability threshold
    fn check_probability(&mut self, probability: f32) -> bool {
        self.gen_f32() < probability
    }
}

// Blanket implementation for any type implementing rand::Rng, covering
// thread_rng as well as seeded generators in tests
impl<T: ?Sized + rand::Rng> SimRng for T {
    fn gen_bool(&mut self) -> bool {
        rand::Rng::r#gen(self)
    }

    fn gen_f32(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }

    fn gen_index(&mut self, n: usize) -> usize {
        rand::Rng::gen_range(self, 0..n)
    }
}
