use bevy::prelude::*;

use crate::common::faction::Faction;

/// Marker: this entity belongs to a shot pool for its whole lifetime.
/// Pooled shots are never despawned, only deactivated.
#[derive(Component)]
pub struct PooledShot;

/// Shot lifecycle.
///
/// `Active` is the single-exit guard: a shot leaves it exactly once, either
/// through expiry or through a resolved hit, and every later signal for the
/// same activation is ignored.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShotState {
    #[default]
    Inactive,
    Active,
    PendingReturn,
}

/// Gameplay payload of a pooled shot.
///
/// `faction` is fixed per pool; the rest is rewritten on every activation so
/// no state leaks between reuses.
#[derive(Component, Debug, Clone)]
pub struct Shot {
    pub faction: Faction,
    pub damage: i32,
    /// Height plane captured at spawn; pinned every tick.
    pub altitude: f32,
    pub lifetime: Timer,
}

impl Shot {
    /// Inactive template used when pre-spawning a pool.
    pub fn template(faction: Faction) -> Self {
        Self {
            faction,
            damage: 0,
            altitude: 0.0,
            lifetime: Timer::from_seconds(0.0, TimerMode::Once),
        }
    }

    /// Rewrite per-activation state on acquisition.
    #[inline]
    pub fn arm(&mut self, damage: i32, lifetime_secs: f32, altitude: f32) {
        self.damage = damage;
        self.altitude = altitude;
        self.lifetime = Timer::from_seconds(lifetime_secs, TimerMode::Once);
    }
}

#[derive(Component, Debug, Clone)]
pub struct Health {
    pub hp: i32,
}

/// Craft lifecycle.
///
/// `Dying` is a transitional window during which the craft still exists but
/// silently absorbs damage; this keeps kill accounting exact-once.
#[derive(Component, Debug, Clone)]
pub enum LifeState {
    Alive,
    Dying { timer: Timer },
    Dead,
}

impl LifeState {
    #[inline]
    pub fn can_take_damage(&self) -> bool {
        matches!(self, LifeState::Alive)
    }
}
