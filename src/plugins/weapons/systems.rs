//! Clock adapters and the player fire producer.
//!
//! The producer intentionally does **not** access the shot pools; it only
//! enqueues `ShotRequest` intent, keeping all pool mutation in the
//! projectiles allocator.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::common::faction::Faction;
use crate::plugins::player::Player;
use crate::plugins::projectiles::components::LifeState;
use crate::plugins::projectiles::messages::ShotRequest;

use super::components::Weapon;
use super::messages::{BoostKind, HeatWarning, WeaponBoost};

/// Advance every weapon's timed state on the gameplay clock.
pub fn tick_weapons(time: Res<Time>, mut q: Query<&mut Weapon>) {
    let now = time.elapsed_secs_f64();
    let dt = time.delta_secs();

    for mut weapon in &mut q {
        weapon.tick(now, dt);
    }
}

/// Consume boost pickups for the player weapon.
pub fn apply_weapon_boosts(
    time: Res<Time>,
    mut reader: MessageReader<WeaponBoost>,
    mut q: Query<&mut Weapon, With<Player>>,
) {
    let now = time.elapsed_secs_f64();

    for boost in reader.read() {
        let Ok(mut weapon) = q.single_mut() else {
            continue;
        };
        match boost.kind {
            BoostKind::RateBoost { multiplier } => {
                weapon.apply_rate_boost(multiplier, now, boost.duration);
            }
            BoostKind::DualEmission => {
                weapon.apply_dual_emission(now, boost.duration);
            }
        }
    }
}

/// Producer: hold fire key -> trigger pulls -> ShotRequest messages.
pub fn request_player_shots(
    time: Res<Time>,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut q: Query<(&Transform, &mut Weapon, &LifeState), With<Player>>,
    mut shots: MessageWriter<ShotRequest>,
    mut warnings: MessageWriter<HeatWarning>,
) {
    let Some(keys) = keys else {
        return;
    };
    if !keys.pressed(KeyCode::Space) {
        return;
    }

    let Ok((tf, mut weapon, life)) = q.single_mut() else {
        debug!("No single armed Player craft");
        return;
    };
    if !life.can_take_damage() {
        // A craft in its death transition holds fire.
        return;
    }

    let Some(volley) = weapon.try_fire(time.elapsed_secs_f64()) else {
        return;
    };

    if volley.warning {
        warnings.write(HeatWarning {
            heat_fraction: weapon.heat_fraction(),
        });
    }

    let mut nose = (tf.rotation * Vec3::Y).truncate();
    if nose.length_squared() < 1e-4 {
        nose = Vec2::Y;
    } else {
        nose = nose.normalize();
    }

    let center = tf.translation.truncate() + nose * weapon.spec.muzzle_offset;
    let altitude = tf.translation.z;
    let vel = nose * weapon.spec.shot_speed;

    let lateral = Vec2::new(nose.y, -nose.x) * (weapon.spec.dual_spacing * 0.5);
    let origins: [Option<Vec2>; 2] = if volley.dual {
        [Some(center - lateral), Some(center + lateral)]
    } else {
        [Some(center), None]
    };

    for origin in origins.into_iter().flatten() {
        shots.write(ShotRequest {
            faction: Faction::Player,
            pos: origin.extend(altitude),
            vel,
            damage: weapon.spec.shot_damage,
            lifetime: weapon.spec.shot_lifetime,
        });
    }
}
