//! Spawn consumer: activate shots from the faction pools.
//!
//! # Fail-fast invariants
//! - A free list contains only valid pooled shot entities.
//! - Therefore, a popped entity must match the shot query.
//!
//! If that is violated we `expect()` and crash loudly; it means the pool
//! structure itself is corrupt and no amount of per-request branching
//! would save the tick.
//!
//! An *empty* free list is different: that is a capacity decision, and per
//! the growth policy we mint a new pooled shot on the spot.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::common::faction::Faction;

use super::components::{PooledShot, Shot, ShotState};
use super::messages::ShotRequest;
use super::pool::{ShotPools, active_shot_layers, grown_shot_bundle};

pub fn allocate_shots(
    mut commands: Commands,
    mut pools: ResMut<ShotPools>,
    mut reader: MessageReader<ShotRequest>,
    mut q: Query<
        (
            &mut ShotState,
            &mut Shot,
            &mut Transform,
            &mut LinearVelocity,
            &mut Visibility,
            &mut CollisionLayers,
        ),
        With<PooledShot>,
    >,
) {
    for req in reader.read() {
        let pool = pools.side_mut(req.faction);

        let Some(e) = pool.pop_free() else {
            // Free set empty: grow. A queued spawn cannot be written through
            // the query this frame, so the new entity starts fully active.
            pool.note_growth(match req.faction {
                Faction::Player => "player shot",
                Faction::Enemy => "enemy shot",
            });
            commands.spawn(grown_shot_bundle(req));
            continue;
        };

        let (mut state, mut shot, mut tf, mut vel, mut vis, mut layers) = q
            .get_mut(e)
            .expect("ShotPools contained an entity missing pooled shot components");

        debug_assert_eq!(*state, ShotState::Inactive, "free list held a live shot");

        *state = ShotState::Active;
        shot.arm(req.damage, req.lifetime, req.pos.z);
        tf.translation = req.pos;
        vel.0 = req.vel;
        *vis = Visibility::Visible;
        *layers = active_shot_layers(req.faction);
    }
}
