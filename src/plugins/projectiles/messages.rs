//! Buffered combat messages.
//!
//! Producers (player weapon, enemy attack controllers) only enqueue intent;
//! the allocator is the single writer that mutates the pools. The effect
//! messages are fire-and-forget hooks for the presentation layer.

use bevy::prelude::*;

use crate::common::faction::Faction;

use super::effects::BlastTier;

/// Intent to fire one shot. `pos.z` is the altitude plane the shot stays on.
#[derive(Message, Clone, Copy, Debug)]
pub struct ShotRequest {
    pub faction: Faction,
    pub pos: Vec3,
    pub vel: Vec2,
    pub damage: i32,
    pub lifetime: f32,
}

/// A shot connected with a hostile craft.
#[derive(Message, Clone, Copy, Debug)]
pub struct HitEffect {
    pub pos: Vec2,
}

/// A craft was destroyed; play a blast of the given tier.
#[derive(Message, Clone, Copy, Debug)]
pub struct BlastRequest {
    pub tier: BlastTier,
    pub pos: Vec2,
}
