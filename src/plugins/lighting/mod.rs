//! Lighting plugin (Firefly) (render-only).
//!
//! Two jobs: a nav light glued to the player craft, and short-lived flash
//! lights consuming the gameplay `HitEffect` hook.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::player::Player;
use crate::plugins::projectiles::messages::HitEffect;

#[derive(Component)]
pub struct PlayerLight;

/// A brief impact flash; despawned when the timer runs out.
#[derive(Component)]
struct HitFlash {
    timer: Timer,
}

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), setup)
        .add_systems(Update, (follow_player_light, spawn_hit_flashes, fade_hit_flashes));
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Name::new("PlayerLight"),
        PlayerLight,
        PointLight2d {
            color: Color::srgb(0.75, 0.9, 1.0),
            range: 380.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_player_light(
    q_player: Query<&Transform, (With<Player>, Without<PlayerLight>)>,
    mut q_light: Query<&mut Transform, (With<PlayerLight>, Without<Player>)>,
) {
    let Ok(tf_player) = q_player.single() else {
        return;
    };
    let Ok(mut tf_light) = q_light.single_mut() else {
        return;
    };

    tf_light.translation.x = tf_player.translation.x;
    tf_light.translation.y = tf_player.translation.y;
}

fn spawn_hit_flashes(mut commands: Commands, mut hits: MessageReader<HitEffect>) {
    for hit in hits.read() {
        commands.spawn((
            Name::new("HitFlash"),
            HitFlash {
                timer: Timer::from_seconds(0.12, TimerMode::Once),
            },
            PointLight2d {
                color: Color::srgb(1.0, 0.85, 0.5),
                range: 90.0,
                ..default()
            },
            Transform::from_translation(hit.pos.extend(10.0)),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn fade_hit_flashes(
    time: Res<Time>,
    mut commands: Commands,
    mut q: Query<(Entity, &mut HitFlash)>,
) {
    for (e, mut flash) in &mut q {
        flash.timer.tick(time.delta());
        if flash.timer.is_finished() {
            commands.entity(e).despawn();
        }
    }
}
