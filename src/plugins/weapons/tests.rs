//! Weapon system tests: producer and boost plumbing at the ECS level.
//! The state machine itself is covered in `components`.

use std::time::Duration;

use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::faction::Faction;
use crate::common::test_utils::run_system_once;
use crate::plugins::player::Player;
use crate::plugins::projectiles::components::LifeState;
use crate::plugins::projectiles::messages::ShotRequest;

use super::components::{Weapon, WeaponSpec};
use super::messages::{BoostKind, HeatWarning, WeaponBoost};
use super::systems;

fn firing_world(weapon: Weapon, life: LifeState) -> (World, Entity) {
    let mut world = World::new();
    world.insert_resource(Time::default());

    let mut keys = ButtonInput::<KeyCode>::default();
    keys.press(KeyCode::Space);
    world.insert_resource(keys);

    world.init_resource::<Messages<ShotRequest>>();
    world.init_resource::<Messages<HeatWarning>>();

    let e = world
        .spawn((
            Player,
            weapon,
            life,
            Transform::from_xyz(0.0, -100.0, 1.0),
        ))
        .id();
    (world, e)
}

fn drain_requests(world: &mut World) -> Vec<ShotRequest> {
    world
        .resource_mut::<Messages<ShotRequest>>()
        .drain()
        .collect()
}

#[test]
fn trigger_pull_writes_one_forward_request() {
    let (mut world, _) = firing_world(Weapon::new(WeaponSpec::default()), LifeState::Alive);

    run_system_once(&mut world, systems::request_player_shots);

    let reqs = drain_requests(&mut world);
    assert_eq!(reqs.len(), 1);

    let spec = WeaponSpec::default();
    let req = reqs[0];
    assert_eq!(req.faction, Faction::Player);
    assert_eq!(req.vel, Vec2::Y * spec.shot_speed);
    assert_eq!(req.damage, spec.shot_damage);
    // Muzzle sits ahead of the nose, on the craft's altitude plane.
    assert_eq!(req.pos, Vec3::new(0.0, -100.0 + spec.muzzle_offset, 1.0));
}

#[test]
fn dual_emission_writes_two_laterally_spaced_requests() {
    let mut weapon = Weapon::new(WeaponSpec::default());
    weapon.apply_dual_emission(0.0, 5.0);
    let (mut world, _) = firing_world(weapon, LifeState::Alive);

    run_system_once(&mut world, systems::request_player_shots);

    let reqs = drain_requests(&mut world);
    assert_eq!(reqs.len(), 2);

    let spec = WeaponSpec::default();
    let half = spec.dual_spacing * 0.5;
    let xs: Vec<f32> = reqs.iter().map(|r| r.pos.x).collect();
    assert!(xs.contains(&-half) && xs.contains(&half));
    // Same heading from both origins.
    assert!(reqs.iter().all(|r| r.vel == Vec2::Y * spec.shot_speed));
}

#[test]
fn dying_pilot_holds_fire() {
    let (mut world, _) = firing_world(
        Weapon::new(WeaponSpec::default()),
        LifeState::Dying {
            timer: Timer::from_seconds(0.5, TimerMode::Once),
        },
    );

    run_system_once(&mut world, systems::request_player_shots);

    assert!(drain_requests(&mut world).is_empty());
}

#[test]
fn released_fire_key_writes_nothing() {
    let (mut world, _) = firing_world(Weapon::new(WeaponSpec::default()), LifeState::Alive);
    world.insert_resource(ButtonInput::<KeyCode>::default());

    run_system_once(&mut world, systems::request_player_shots);

    assert!(drain_requests(&mut world).is_empty());
}

#[test]
fn crossing_the_warning_threshold_emits_one_heat_warning() {
    // One pull is enough to cross: per-shot heat ≥ 70% of max.
    let weapon = Weapon::new(WeaponSpec {
        heat_per_shot: 80.0,
        max_heat: 100.0,
        ..WeaponSpec::default()
    });
    let (mut world, _) = firing_world(weapon, LifeState::Alive);

    run_system_once(&mut world, systems::request_player_shots);

    assert_eq!(world.resource::<Messages<HeatWarning>>().len(), 1);
}

#[test]
fn boost_pickup_reaches_the_player_weapon() {
    let (mut world, player) = firing_world(Weapon::new(WeaponSpec::default()), LifeState::Alive);
    world.init_resource::<Messages<WeaponBoost>>();

    world.write_message(WeaponBoost {
        kind: BoostKind::RateBoost { multiplier: 2.0 },
        duration: 3.0,
    });
    run_system_once(&mut world, systems::apply_weapon_boosts);

    // Boosted cadence: half the base interval between successful pulls.
    let spec = WeaponSpec::default();
    let mut weapon = world.get_mut::<Weapon>(player).unwrap();
    assert!(weapon.try_fire(0.0).is_some());
    assert!(weapon.try_fire((spec.shot_interval * 0.6) as f64).is_some());
}

#[test]
fn tick_weapons_advances_every_mount() {
    let mut world = World::new();

    let mut time = Time::default();
    time.advance_by(Duration::from_secs_f32(1.0));
    world.insert_resource(time);

    let mut hot = Weapon::new(WeaponSpec {
        heat_per_shot: 30.0,
        heat_decay_per_sec: 10.0,
        shot_interval: 0.0,
        ..WeaponSpec::default()
    });
    hot.try_fire(0.0);
    assert_eq!(hot.heat(), 30.0);
    let e = world.spawn(hot).id();

    run_system_once(&mut world, systems::tick_weapons);

    assert_eq!(world.get::<Weapon>(e).unwrap().heat(), 20.0);
}
