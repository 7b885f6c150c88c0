//! Projectiles plugin: **message-based producer → consumer** spawning over
//! per-faction pools, plus the collision/damage resolver.
//!
//! # Philosophy: invariants first
//! Correctness checks are pushed to boundaries so the hot paths (allocate,
//! resolve, return commit) stay straight-line:
//! - meaning is encoded in types (`Faction`, `ShotState`, `BlastTier`),
//! - invariants are validated once, at spawn or state transition,
//! - violations of pool structure are bugs and fail fast (`expect()`).
//!
//! # Data flow (big picture)
//! ```text
//!   Update schedule (variable dt)
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  Producers: weapons::request_player_shots, enemies::attack (fixed)   │
//! │      - write: ShotRequest messages (intent only, no pool access)     │
//! │                                                                      │
//! │  Consumer: allocator::allocate_shots                                 │
//! │      - single writer of ShotPools free lists                         │
//! │      - pops free shot (or grows), arms Shot, sets Transform,         │
//! │        LinearVelocity, Visibility, CollisionLayers                   │
//! └──────────────────────────────────────────────────────────────────────┘
//!                 │
//!                 v
//!   FixedUpdate / FixedPostUpdate (fixed dt)
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  lifecycle::tick_shot_lifetimes                                      │
//! │      - pins altitude, counts lifetime down, silent expiry            │
//! │                                                                      │
//! │  Physics emits CollisionStart messages (Avian)                       │
//! │                                                                      │
//! │  collision::resolve_shot_hits                                        │
//! │      - faction filter, dying-target absorb, exact-once damage        │
//! │      - emits HitEffect, marks ShotState::PendingReturn               │
//! │                                                                      │
//! │  commit::return_shots_to_pool                                        │
//! │      - owns the Inactive invariants, pushes to the faction pool      │
//! └──────────────────────────────────────────────────────────────────────┘
//!
//! Feedback loop:
//!   commit pushes the entity back into its faction's free list
//!   allocator pops it for the next activation
//! ```
//!
//! Blasts run the same loop in miniature: death triggers enqueue
//! `BlastRequest`, `effects::allocate_blasts` is the single pool writer, and
//! `effects::tick_blasts` retires them by timer.
//!
//! # Why messages instead of direct pool access?
//! Producers never borrow `ResMut<ShotPools>`; they enqueue intent. The
//! allocator is the single writer, which keeps pool mutation localized and
//! lets controllers live in other plugins without aliasing the free lists.

pub mod components;
pub mod pool;
pub mod collision;
pub mod effects;

pub mod messages;
pub mod allocator;
pub mod lifecycle;
pub mod commit;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;

pub struct ProjectilesPlugin;

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        let tunables = app.world().resource::<Tunables>().clone();

        // Pools + pre-spawn
        app.insert_resource(pool::ShotPools::new(tunables.shot_pool_capacity))
            .insert_resource(effects::BlastPools::new(tunables.blast_pool_capacity))
            .add_systems(Startup, (pool::init_shot_pools, effects::init_blast_pools));

        // Message storage for spawn requests and effect hooks.
        app.add_message::<messages::ShotRequest>()
            .add_message::<messages::HitEffect>()
            .add_message::<messages::BlastRequest>();

        // Update-phase pipeline: producers -> allocate
        app.add_systems(
            Update,
            (
                allocator::allocate_shots
                    .after(crate::plugins::weapons::systems::request_player_shots),
                effects::allocate_blasts,
            )
                .run_if(in_state(GameState::InGame)),
        );

        // Fixed upkeep
        app.add_systems(
            FixedUpdate,
            (lifecycle::tick_shot_lifetimes, effects::tick_blasts)
                .run_if(in_state(GameState::InGame)),
        );

        // Fixed collision pipeline
        app.add_systems(
            FixedPostUpdate,
            collision::resolve_shot_hits
                .after(CollisionEventSystems)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            commit::return_shots_to_pool
                .after(collision::resolve_shot_hits)
                .run_if(in_state(GameState::InGame)),
        );
    }
}

#[cfg(test)]
mod tests;
