//! Camera plugin (render-only): smoothed follow with velocity look-ahead.
//!
//! Disjointness of the two `Transform` queries is encoded with `Without`
//! filters so Bevy can prove they never alias (B0001).

use avian2d::prelude::LinearVelocity;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::player::Player;

#[derive(Component)]
pub struct MainCamera {
    pub responsiveness: f32,
    /// Seconds of player travel the camera leads by.
    pub look_ahead: f32,
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(
            PostUpdate,
            follow_player
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera {
            responsiveness: 6.0,
            look_ahead: 0.25,
        },
        FireflyConfig::default(),
        Transform::from_xyz(0.0, 0.0, 950.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_player(
    time: Res<Time>,
    q_player: Query<(&Transform, &LinearVelocity), (With<Player>, Without<MainCamera>)>,
    mut q_cam: Query<(&mut Transform, &MainCamera), Without<Player>>,
) {
    let Ok((tf_player, vel)) = q_player.single() else {
        return;
    };
    let Ok((mut tf_cam, cam)) = q_cam.single_mut() else {
        return;
    };

    let goal = tf_player.translation.truncate() + vel.0 * cam.look_ahead;
    let alpha = 1.0 - (-cam.responsiveness * time.delta_secs()).exp();

    tf_cam.translation.x += (goal.x - tf_cam.translation.x) * alpha;
    tf_cam.translation.y += (goal.y - tf_cam.translation.y) * alpha;
}
