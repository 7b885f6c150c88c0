//! Fixed-tick shot upkeep: lifetime countdown and altitude pinning.
//!
//! Planar motion itself is the physics collaborator's job (the kinematic
//! body integrates `LinearVelocity`); this system owns the two rules physics
//! cannot know about.

use bevy::prelude::*;

use super::components::{PooledShot, Shot, ShotState};

pub fn tick_shot_lifetimes(
    time: Res<Time<Fixed>>,
    mut q: Query<(&mut Shot, &mut ShotState, &mut Transform), With<PooledShot>>,
) {
    for (mut shot, mut state, mut tf) in &mut q {
        if *state != ShotState::Active {
            continue;
        }

        // Shots stay on the height plane captured at spawn.
        tf.translation.z = shot.altitude;

        shot.lifetime.tick(time.delta());
        if shot.lifetime.is_finished() {
            // Silent expiry: no damage, no effect, just back to the pool.
            *state = ShotState::PendingReturn;
        }
    }
}
