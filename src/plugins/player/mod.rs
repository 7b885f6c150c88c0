//! Player plugin.
//!
//! Pipeline:
//! - Update: sample input, write PlayerInput resource
//! - FixedUpdate: apply velocity to the kinematic rigid body
//! - FixedPostUpdate: life-state transitions after collision resolution
//!
//! The player mirrors the enemy life-state machine: a craft at zero hull
//! enters a short `Dying` window (collision off, damage absorbed, weapons
//! silent) and then stays as a `Dead` wreck; there is no respawn flow yet.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::faction::Faction;
use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::projectiles::components::{Health, LifeState};
use crate::plugins::weapons::{Weapon, WeaponSpec};

#[derive(Component)]
pub struct Player;

#[derive(Resource, Default, Debug)]
struct PlayerInput {
    move_axis: Vec2,
}

const PLAYER_HULL: i32 = 30;
const PLAYER_RADIUS: f32 = 13.0;
const DYING_SECS: f32 = 0.5;

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(Update, gather_input)
        .add_systems(FixedUpdate, apply_movement)
        .add_systems(
            FixedPostUpdate,
            (
                player_death_trigger
                    .after(crate::plugins::projectiles::collision::resolve_shot_hits),
                player_death_progress.after(player_death_trigger),
            )
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn(mut commands: Commands) {
    let layers = CollisionLayers::new(
        Layer::Player,
        [Layer::World, Layer::Enemy, Layer::EnemyShot],
    );

    commands.spawn((
        Name::new("Player"),
        Player,
        Faction::Player,
        Health { hp: PLAYER_HULL },
        LifeState::Alive,
        Weapon::new(WeaponSpec::default()),
        Sprite {
            color: Color::srgb(0.2, 0.75, 0.9),
            custom_size: Some(Vec2::splat(PLAYER_RADIUS * 2.0)),
            ..default()
        },
        Transform::from_xyz(0.0, -220.0, 1.0),
        RigidBody::Kinematic,
        Collider::circle(PLAYER_RADIUS),
        layers,
        LinearVelocity::ZERO,
        TranslationExtrapolation,
        DespawnOnExit(GameState::InGame),
    ));
}

fn gather_input(keys: Option<Res<ButtonInput<KeyCode>>>, mut input: ResMut<PlayerInput>) {
    let Some(keys) = keys else {
        return;
    };

    let mut axis = Vec2::ZERO;

    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }

    input.move_axis = if axis.length_squared() > 0.0 {
        axis.normalize()
    } else {
        Vec2::ZERO
    };
}

fn apply_movement(
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut q_player: Query<(&mut LinearVelocity, &LifeState), With<Player>>,
) {
    let Ok((mut vel, life)) = q_player.single_mut() else {
        return;
    };

    // A wreck drifts to a stop.
    vel.0 = if life.can_take_damage() {
        input.move_axis * tunables.player_speed
    } else {
        Vec2::ZERO
    };
}

fn player_death_trigger(
    mut q: Query<(&Health, &mut LifeState, &mut CollisionLayers), With<Player>>,
) {
    let Ok((hp, mut life, mut layers)) = q.single_mut() else {
        return;
    };
    if !matches!(*life, LifeState::Alive) {
        return;
    }

    if hp.hp <= 0 {
        info!("player craft destroyed");
        *life = LifeState::Dying {
            timer: Timer::from_seconds(DYING_SECS, TimerMode::Once),
        };
        *layers = CollisionLayers::new(Layer::Player, [] as [Layer; 0]);
    }
}

fn player_death_progress(
    time: Res<Time<Fixed>>,
    mut q: Query<(&mut LifeState, &mut Sprite), With<Player>>,
) {
    let Ok((mut life, mut sprite)) = q.single_mut() else {
        return;
    };
    let LifeState::Dying { timer } = &mut *life else {
        return;
    };

    timer.tick(time.delta());

    let dur = timer.duration().as_secs_f32().max(0.0001);
    let t = (timer.elapsed_secs() / dur).clamp(0.0, 1.0);

    let mut c = sprite.color.to_srgba();
    c.alpha = 1.0 - 0.6 * t;
    sprite.color = c.into();

    if timer.is_finished() {
        *life = LifeState::Dead;
    }
}
