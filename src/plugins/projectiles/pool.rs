//! Shot pools: one free list per faction.
//!
//! # Ownership model
//! A pool owns its entities for the process lifetime. Entities are never
//! despawned, only deactivated: "disabled" means hidden + zero velocity +
//! empty collision filters, so an inactive shot collides with nothing and
//! generates no collision events.
//!
//! # Active/free invariant
//! Every pooled entity is in exactly one of two sets:
//! - *free*: `ShotState::Inactive`, present in the pool's free list;
//! - *active*: any other state, absent from the free list.
//! The allocator is the only popper, the return commit the only pusher, and
//! the state gate refuses release of anything not `PendingReturn`.
//!
//! # Growth
//! An empty free list is a capacity signal, not an error: the allocator
//! spawns one more pooled shot already in flight, and the pool logs a
//! one-time `warn!` so capacity can be tuned.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::faction::Faction;
use crate::common::layers::Layer;

use super::components::{PooledShot, Shot, ShotState};
use super::messages::ShotRequest;

/// Free list over pre-spawned pooled entities. Shared by shot and blast
/// pools; the entity template is the caller's business.
#[derive(Debug)]
pub struct EntityPool {
    free: Vec<Entity>,
    capacity: usize,
    growth_reported: bool,
}

impl EntityPool {
    /// Zero capacity is a startup misconfiguration; fail loudly here rather
    /// than through a useless pool later.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "entity pool configured with zero capacity");
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
            growth_reported: false,
        }
    }

    #[inline]
    pub fn pop_free(&mut self) -> Option<Entity> {
        self.free.pop()
    }

    #[inline]
    pub fn push_free(&mut self, e: Entity) {
        debug_assert!(
            !self.free.contains(&e),
            "entity released to pool twice: {e:?}"
        );
        self.free.push(e);
    }

    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn contains_free(&self, e: Entity) -> bool {
        self.free.contains(&e)
    }

    /// One-time advisory when the free list runs dry. The pool keeps the
    /// grown entity afterwards, so `capacity` tracks the high-water mark.
    pub fn note_growth(&mut self, label: &str) {
        self.capacity += 1;
        if !self.growth_reported {
            self.growth_reported = true;
            warn!("{label} pool exhausted at {} entities; growing. Consider a larger initial capacity.", self.capacity - 1);
        }
    }
}

#[derive(Resource, Debug)]
pub struct ShotPools {
    player: EntityPool,
    enemy: EntityPool,
}

impl ShotPools {
    pub fn new(capacity_per_side: usize) -> Self {
        Self {
            player: EntityPool::new(capacity_per_side),
            enemy: EntityPool::new(capacity_per_side),
        }
    }

    #[inline]
    pub fn side(&self, faction: Faction) -> &EntityPool {
        match faction {
            Faction::Player => &self.player,
            Faction::Enemy => &self.enemy,
        }
    }

    #[inline]
    pub fn side_mut(&mut self, faction: Faction) -> &mut EntityPool {
        match faction {
            Faction::Player => &mut self.player,
            Faction::Enemy => &mut self.enemy,
        }
    }
}

pub const SHOT_RADIUS: f32 = 3.0;

#[inline]
pub fn active_shot_layers(faction: Faction) -> CollisionLayers {
    CollisionLayers::new(faction.shot_layer(), faction.shot_filters())
}

/// "Disabled" without structural changes: empty filters mean the shot
/// collides with nothing.
#[inline]
pub fn inactive_shot_layers(faction: Faction) -> CollisionLayers {
    CollisionLayers::new(faction.shot_layer(), [] as [Layer; 0])
}

fn shot_color(faction: Faction) -> Color {
    match faction {
        Faction::Player => Color::srgb(1.0, 0.85, 0.3),
        Faction::Enemy => Color::srgb(1.0, 0.35, 0.45),
    }
}

/// Components shared by every pooled shot, inactive or grown-in-flight.
fn shot_base(faction: Faction) -> impl Bundle {
    (
        Name::new(match faction {
            Faction::Player => "Shot(Player)",
            Faction::Enemy => "Shot(Enemy)",
        }),
        PooledShot,
        Sprite {
            color: shot_color(faction),
            custom_size: Some(Vec2::splat(SHOT_RADIUS * 2.0)),
            ..default()
        },
        RigidBody::Kinematic,
        Collider::circle(SHOT_RADIUS),
        // Always present; inactive shots never collide because filters are empty.
        CollisionEventsEnabled,
    )
}

/// Pre-spawn template: parked, hidden, collides with nothing.
pub fn inactive_shot_bundle(faction: Faction) -> impl Bundle {
    (
        shot_base(faction),
        ShotState::Inactive,
        Shot::template(faction),
        Transform::from_xyz(0.0, 0.0, 0.0),
        Visibility::Hidden,
        inactive_shot_layers(faction),
        LinearVelocity(Vec2::ZERO),
    )
}

/// Growth path: a brand-new pooled shot spawned directly in flight, because
/// a freshly queued entity cannot be written through a query this frame.
pub fn grown_shot_bundle(req: &ShotRequest) -> impl Bundle {
    let mut shot = Shot::template(req.faction);
    shot.arm(req.damage, req.lifetime, req.pos.z);

    (
        shot_base(req.faction),
        ShotState::Active,
        shot,
        Transform::from_translation(req.pos),
        Visibility::Visible,
        active_shot_layers(req.faction),
        LinearVelocity(req.vel),
    )
}

/// Pre-spawn both faction pools (inactive).
pub fn init_shot_pools(mut commands: Commands, mut pools: ResMut<ShotPools>) {
    for faction in [Faction::Player, Faction::Enemy] {
        let cap = pools.side(faction).capacity();
        for _ in 0..cap {
            let e = commands.spawn(inactive_shot_bundle(faction)).id();
            pools.side_mut(faction).push_free(e);
        }
    }
}
