//! Collision layers.
//!
//! Shots get their own layer per side so the broad phase never reports
//! same-side pairs in the first place; the resolver still faction-checks
//! every hit it is handed.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    World,
    Player,
    Enemy,
    PlayerShot,
    EnemyShot,
}
