//! Heat HUD: the in-repo consumer of the weapon telemetry contract.
//!
//! A sprite bar reads `Weapon::heat_fraction()` / `is_overheated()` each
//! frame and flashes briefly on `HeatWarning`. Everything is plain sprites
//! so the HUD also exists (invisibly) in headless test apps.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::player::Player;
use crate::plugins::weapons::Weapon;
use crate::plugins::weapons::messages::HeatWarning;

const GAUGE_WIDTH: f32 = 160.0;
const GAUGE_HEIGHT: f32 = 10.0;
/// Screen-space-ish anchor, relative to the camera centre.
const GAUGE_OFFSET: Vec2 = Vec2::new(0.0, -330.0);

#[derive(Component, Debug, Default)]
pub struct HeatGauge {
    /// Warning flash intensity, decays to zero.
    flash: f32,
}

#[derive(Component)]
struct HeatGaugeFrame;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(
            Update,
            update_heat_gauge.run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            PostUpdate,
            anchor_hud_to_camera.run_if(in_state(GameState::InGame)),
        );
}

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("HeatGaugeFrame"),
        HeatGaugeFrame,
        Sprite {
            color: Color::srgba(0.0, 0.0, 0.0, 0.55),
            custom_size: Some(Vec2::new(GAUGE_WIDTH + 6.0, GAUGE_HEIGHT + 6.0)),
            ..default()
        },
        Transform::from_xyz(GAUGE_OFFSET.x, GAUGE_OFFSET.y, 900.0),
    ));

    commands.spawn((
        Name::new("HeatGauge"),
        HeatGauge::default(),
        Sprite {
            color: Color::srgb(1.0, 0.7, 0.2),
            custom_size: Some(Vec2::new(0.0, GAUGE_HEIGHT)),
            ..default()
        },
        Transform::from_xyz(GAUGE_OFFSET.x, GAUGE_OFFSET.y, 901.0),
    ));
}

fn update_heat_gauge(
    time: Res<Time>,
    mut warnings: MessageReader<HeatWarning>,
    q_weapon: Query<&Weapon, With<Player>>,
    mut q_gauge: Query<(&mut Sprite, &mut HeatGauge)>,
) {
    let Ok((mut sprite, mut gauge)) = q_gauge.single_mut() else {
        return;
    };
    let Ok(weapon) = q_weapon.single() else {
        return;
    };

    if warnings.read().next().is_some() {
        gauge.flash = 1.0;
    }
    gauge.flash = (gauge.flash - 4.0 * time.delta_secs()).max(0.0);

    let frac = weapon.heat_fraction();
    if let Some(size) = sprite.custom_size.as_mut() {
        size.x = GAUGE_WIDTH * frac;
    }

    let base = if weapon.is_overheated() {
        Color::srgb(1.0, 0.15, 0.1)
    } else {
        Color::srgb(1.0, 0.7 - 0.4 * frac, 0.2)
    };

    let mut c = base.to_srgba();
    c.red = (c.red + gauge.flash * 0.3).min(1.0);
    c.green = (c.green + gauge.flash * 0.3).min(1.0);
    c.blue = (c.blue + gauge.flash * 0.3).min(1.0);
    sprite.color = c.into();
}

/// Keep the gauge glued to the camera view; a no-op when no camera exists
/// (headless tests).
fn anchor_hud_to_camera(
    q_cam: Query<&Transform, (With<Camera2d>, Without<HeatGauge>, Without<HeatGaugeFrame>)>,
    mut q_fill: Query<&mut Transform, (With<HeatGauge>, Without<HeatGaugeFrame>, Without<Camera2d>)>,
    mut q_frame: Query<&mut Transform, (With<HeatGaugeFrame>, Without<HeatGauge>, Without<Camera2d>)>,
) {
    let Ok(cam_tf) = q_cam.single() else {
        return;
    };
    let anchor = cam_tf.translation.truncate() + GAUGE_OFFSET;

    if let Ok(mut tf) = q_fill.single_mut() {
        tf.translation.x = anchor.x;
        tf.translation.y = anchor.y;
    }
    if let Ok(mut tf) = q_frame.single_mut() {
        tf.translation.x = anchor.x;
        tf.translation.y = anchor.y;
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::message::Messages;
    use bevy::prelude::*;

    use crate::common::test_utils::run_system_once;
    use crate::plugins::player::Player;
    use crate::plugins::weapons::messages::HeatWarning;
    use crate::plugins::weapons::{Weapon, WeaponSpec};

    use super::{GAUGE_WIDTH, HeatGauge, spawn_hud, update_heat_gauge};

    fn hud_world(weapon: Weapon) -> World {
        let mut world = World::new();
        world.insert_resource(Time::default());
        world.init_resource::<Messages<HeatWarning>>();
        world.spawn((Player, weapon));
        run_system_once(&mut world, spawn_hud);
        world
    }

    #[test]
    fn gauge_width_tracks_heat_fraction() {
        let mut weapon = Weapon::new(WeaponSpec {
            heat_per_shot: 30.0,
            max_heat: 100.0,
            shot_interval: 0.0,
            ..WeaponSpec::default()
        });
        weapon.try_fire(0.0);
        let mut world = hud_world(weapon);

        run_system_once(&mut world, update_heat_gauge);

        let mut q = world.query::<(&Sprite, &HeatGauge)>();
        let (sprite, _) = q.iter(&world).next().unwrap();
        let width = sprite.custom_size.unwrap().x;
        assert!((width - GAUGE_WIDTH * 0.3).abs() < 1e-3);
    }

    #[test]
    fn warning_message_lights_the_flash() {
        let mut world = hud_world(Weapon::new(WeaponSpec::default()));
        world.write_message(HeatWarning { heat_fraction: 0.72 });

        run_system_once(&mut world, update_heat_gauge);

        let mut q = world.query::<&HeatGauge>();
        assert!(q.iter(&world).next().unwrap().flash > 0.0);
    }
}
