//! Return commit: recycle shots back into their faction pool.
//!
//! This system owns the *Inactive invariants*:
//! - hidden
//! - velocity = 0
//! - collides with nothing (filters empty)
//!
//! Centralizing these writes here means no residual state can leak into the
//! next reuse, whichever exit (expiry or hit) retired the shot.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{PooledShot, Shot, ShotState};
use super::pool::{ShotPools, inactive_shot_layers};

pub fn return_shots_to_pool(
    mut pools: ResMut<ShotPools>,
    mut q: Query<
        (
            Entity,
            &Shot,
            &mut ShotState,
            &mut Visibility,
            &mut LinearVelocity,
            &mut CollisionLayers,
        ),
        With<PooledShot>,
    >,
) {
    for (e, shot, mut state, mut vis, mut vel, mut layers) in &mut q {
        if *state != ShotState::PendingReturn {
            continue;
        }

        *state = ShotState::Inactive;
        *vis = Visibility::Hidden;
        vel.0 = Vec2::ZERO;
        *layers = inactive_shot_layers(shot.faction);

        pools.side_mut(shot.faction).push_free(e);
    }
}
