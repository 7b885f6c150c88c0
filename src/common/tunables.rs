//! Tunable gameplay constants.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub player_speed: f32,
    /// Pre-spawned shots per faction pool.
    pub shot_pool_capacity: usize,
    /// Pre-spawned blasts per tier pool.
    pub blast_pool_capacity: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            player_speed: 420.0,
            shot_pool_capacity: 128,
            blast_pool_capacity: 16,
        }
    }
}
