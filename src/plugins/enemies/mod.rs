//! Enemies plugin: hostile craft with health and a short death transition,
//! plus the attack pattern controller.
//!
//! Lifecycle rules live here, facts flow in from the resolver:
//! - the collision resolver (projectiles plugin) mutates `Health`;
//! - `raider_death_trigger` reads it and transitions `LifeState`;
//! - `raider_death_progress` animates the dying window and marks
//!   `PendingDespawn`;
//! - the structural despawn happens in `PostUpdate`, never inside the fixed
//!   physics step, so no other system still holds queued work for the
//!   entity.
//!
//! A craft entering `Dying` stops colliding immediately (filters emptied,
//! no structural change) and silently absorbs any damage still in flight.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::Occluder2d;

use crate::common::faction::Faction;
use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::plugins::core::CombatStats;
use crate::plugins::projectiles::components::{Health, LifeState};
use crate::plugins::projectiles::effects::BlastTier;
use crate::plugins::projectiles::messages::BlastRequest;

pub mod attack;

use attack::{AttackPattern, PatternKind, ShotProfile};

#[derive(Component)]
pub struct Enemy;

/// Blast tier to request when this craft is destroyed.
#[derive(Component, Debug, Clone, Copy)]
pub struct DeathBlast(pub BlastTier);

/// Marker: craft should be removed from the world.
///
/// Despawn is deferred to `PostUpdate`; fixed-step systems only mark.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

const DYING_SECS: f32 = 0.35;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_raiders);

    // Attack controllers run on the fixed clock, before this tick's
    // collision resolution consumes the results of previous ones.
    app.add_systems(
        FixedUpdate,
        attack::drive_attack_patterns.run_if(in_state(GameState::InGame)),
    );

    // Death handling reads Health after the resolver wrote it.
    app.add_systems(
        FixedPostUpdate,
        raider_death_trigger
            .after(crate::plugins::projectiles::collision::resolve_shot_hits)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedPostUpdate,
        raider_death_progress
            .after(raider_death_trigger)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        PostUpdate,
        despawn_marked_raiders.run_if(in_state(GameState::InGame)),
    );
}

/// Collision layers for a craft that should no longer interact with
/// anything: membership kept, filters cleared.
#[inline]
fn non_interacting_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [] as [Layer; 0])
}

struct RaiderSpawn {
    name: &'static str,
    pos: Vec2,
    hp: i32,
    radius: f32,
    blast: BlastTier,
    pattern: AttackPattern,
}

fn fighter_pattern() -> AttackPattern {
    AttackPattern::new(
        vec![
            PatternKind::Spread {
                count: 3,
                arc: 40f32.to_radians(),
            },
            PatternKind::Burst { count: 4, gap: 0.12 },
        ],
        1.6,
        520.0,
        ShotProfile {
            damage: 1,
            speed: 380.0,
            lifetime: 2.2,
        },
    )
}

fn gunship_pattern() -> AttackPattern {
    AttackPattern::new(
        vec![
            PatternKind::Circle { count: 12 },
            PatternKind::Spread {
                count: 5,
                arc: 60f32.to_radians(),
            },
            PatternKind::Burst { count: 6, gap: 0.1 },
        ],
        2.2,
        640.0,
        ShotProfile {
            damage: 2,
            speed: 320.0,
            lifetime: 2.8,
        },
    )
}

/// Spawn the sortie's hostiles: two fighters and a gunship.
fn spawn_raiders(mut commands: Commands) {
    let raiders = [
        RaiderSpawn {
            name: "Fighter(L)",
            pos: Vec2::new(-220.0, 180.0),
            hp: 5,
            radius: 14.0,
            blast: BlastTier::Small,
            pattern: fighter_pattern(),
        },
        RaiderSpawn {
            name: "Fighter(R)",
            pos: Vec2::new(220.0, 180.0),
            hp: 5,
            radius: 14.0,
            blast: BlastTier::Small,
            pattern: fighter_pattern(),
        },
        RaiderSpawn {
            name: "Gunship",
            pos: Vec2::new(0.0, 300.0),
            hp: 25,
            radius: 26.0,
            blast: BlastTier::Large,
            pattern: gunship_pattern(),
        },
    ];

    let enemy_layers = CollisionLayers::new(
        Layer::Enemy,
        [Layer::World, Layer::Player, Layer::PlayerShot],
    );

    for raider in raiders {
        commands.spawn((
            Name::new(raider.name),
            Enemy,
            Faction::Enemy,
            Health { hp: raider.hp },
            LifeState::Alive,
            DeathBlast(raider.blast),
            raider.pattern,
            Sprite {
                color: Color::srgb(0.9, 0.25, 0.25),
                custom_size: Some(Vec2::splat(raider.radius * 2.0)),
                ..default()
            },
            Transform::from_translation(raider.pos.extend(1.0)),
            RigidBody::Static,
            Collider::circle(raider.radius),
            enemy_layers,
            Occluder2d::circle(raider.radius),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

/// Transition Alive -> Dying when HP is depleted.
///
/// Does not despawn; it transitions state, enforces the dying invariants
/// (no further collision interaction) and fires the destruction hooks.
fn raider_death_trigger(
    mut stats: ResMut<CombatStats>,
    mut blasts: MessageWriter<BlastRequest>,
    mut q: Query<
        (
            &Health,
            &mut LifeState,
            &mut CollisionLayers,
            &DeathBlast,
            &Transform,
        ),
        (With<Enemy>, Without<PendingDespawn>),
    >,
) {
    for (hp, mut life, mut layers, blast, tf) in &mut q {
        if !matches!(*life, LifeState::Alive) {
            continue;
        }

        if hp.hp <= 0 {
            *life = LifeState::Dying {
                timer: Timer::from_seconds(DYING_SECS, TimerMode::Once),
            };
            *layers = non_interacting_enemy_layers();

            stats.kills += 1;
            blasts.write(BlastRequest {
                tier: blast.0,
                pos: tf.translation.truncate(),
            });
        }
    }
}

/// Animate the dying window, then mark for removal.
fn raider_death_progress(
    time: Res<Time<Fixed>>,
    mut commands: Commands,
    mut q: Query<
        (Entity, &mut LifeState, &mut Sprite, &mut Transform),
        (With<Enemy>, Without<PendingDespawn>),
    >,
) {
    for (e, mut life, mut sprite, mut tf) in &mut q {
        let LifeState::Dying { timer } = &mut *life else {
            continue;
        };

        timer.tick(time.delta());

        let dur = timer.duration().as_secs_f32().max(0.0001);
        let t = (timer.elapsed_secs() / dur).clamp(0.0, 1.0);

        tf.scale = Vec3::splat(1.0 - t);
        let mut c = sprite.color.to_srgba();
        c.alpha = 1.0 - t;
        sprite.color = c.into();

        if timer.is_finished() {
            *life = LifeState::Dead;
            commands.entity(e).insert(PendingDespawn);
        }
    }
}

/// Despawn raiders marked for removal. Centralized so structural changes
/// stay predictable.
fn despawn_marked_raiders(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}
