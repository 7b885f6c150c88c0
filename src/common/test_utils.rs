//! Test helpers.
//!
//! `World::run_system_once` (via the `RunSystemOnce` trait) executes a single
//! system without building a schedule. Systems using `Commands` enqueue
//! structural changes that normally apply at schedule boundaries, so we
//! `flush()` after running to make the queued commands visible to assertions.

use std::time::Duration;

use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// A `Time<Fixed>` whose elapsed clock reads `elapsed` and whose last delta
/// is `dt`, for driving fixed-step systems at chosen instants.
pub fn fixed_time_at(elapsed: f32, dt: f32) -> Time<Fixed> {
    let mut t = Time::<Fixed>::default();
    if elapsed > dt {
        t.advance_by(Duration::from_secs_f32(elapsed - dt));
    }
    t.advance_by(Duration::from_secs_f32(dt.min(elapsed)));
    t
}

/// Tiny deterministic PRNG for property-style tests (xorshift64*).
///
/// Avoids an external property-testing dependency while still letting us run
/// many randomized cases reproducibly.
#[derive(Clone, Copy)]
pub struct TestRng(u64);

impl TestRng {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        // 24 random bits -> float in [0,1)
        let v = (self.next_u64() >> 40) as u32;
        (v as f32) / ((1u32 << 24) as f32)
    }

    #[inline]
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        debug_assert!(hi >= lo);
        lo + (hi - lo) * self.next_f32()
    }

    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    #[inline]
    pub fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n.max(1)
    }
}
