//! Projectiles plugin tests (deterministic).
//!
//! The full physics pipeline is never exercised here; collision tests
//! inject `CollisionStart` messages directly and run the resolver once,
//! exactly as the runtime would after Avian's narrow phase.

use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::faction::Faction;
use crate::common::layers::Layer;
use crate::common::test_utils::{TestRng, fixed_time_at, run_system_once};

use super::{allocator, collision, commit, effects, lifecycle, messages, pool};
use super::components::{Health, LifeState, PooledShot, Shot, ShotState};

// --------------------------------------------------------------------------------------
// Helpers
// --------------------------------------------------------------------------------------

fn shot_request(faction: Faction, pos: Vec3) -> messages::ShotRequest {
    messages::ShotRequest {
        faction,
        pos,
        vel: Vec2::new(0.0, 300.0),
        damage: 2,
        lifetime: 1.5,
    }
}

fn write_collision(world: &mut World, a: Entity, b: Entity) {
    world.write_message(CollisionStart {
        collider1: a,
        collider2: b,
        body1: Some(a),
        body2: Some(b),
    });
}

fn init_combat_messages(world: &mut World) {
    world.init_resource::<Messages<CollisionStart>>();
    world.init_resource::<Messages<messages::HitEffect>>();
}

/// Spawn a standalone active shot, bypassing the pool machinery, for tests
/// that only exercise downstream systems.
fn spawn_active_shot(world: &mut World, faction: Faction, damage: i32, lifetime: f32) -> Entity {
    let mut shot = Shot::template(faction);
    shot.arm(damage, lifetime, 2.0);
    world
        .spawn((
            PooledShot,
            ShotState::Active,
            shot,
            Transform::from_xyz(0.0, 0.0, 2.0),
            Visibility::Visible,
            LinearVelocity(Vec2::new(0.0, 300.0)),
            pool::active_shot_layers(faction),
        ))
        .id()
}

// --------------------------------------------------------------------------------------
// EntityPool unit tests
// --------------------------------------------------------------------------------------

#[test]
#[should_panic(expected = "zero capacity")]
fn entity_pool_rejects_zero_capacity() {
    let _ = pool::EntityPool::new(0);
}

#[test]
fn entity_pool_growth_bumps_capacity_once_per_entity() {
    let mut p = pool::EntityPool::new(4);
    assert_eq!(p.capacity(), 4);
    p.note_growth("test");
    p.note_growth("test");
    assert_eq!(p.capacity(), 6);
}

// --------------------------------------------------------------------------------------
// Pool pre-spawn + allocator
// --------------------------------------------------------------------------------------

#[test]
fn init_shot_pools_prespawns_capacity_inactive_per_faction() {
    let mut world = World::new();
    world.insert_resource(pool::ShotPools::new(4));

    run_system_once(&mut world, pool::init_shot_pools);

    let pools = world.resource::<pool::ShotPools>();
    assert_eq!(pools.side(Faction::Player).free_len(), 4);
    assert_eq!(pools.side(Faction::Enemy).free_len(), 4);

    let mut q = world.query::<(&ShotState, &Visibility, &CollisionLayers, &Shot)>();
    let mut count = 0;
    for (state, vis, layers, shot) in q.iter(&world) {
        count += 1;
        assert_eq!(*state, ShotState::Inactive);
        assert_eq!(*vis, Visibility::Hidden);
        // Inactive shots collide with nothing: filters are empty.
        assert!(layers.memberships.has_all(shot.faction.shot_layer()));
        assert!(!layers.filters.has_all(Layer::Player));
        assert!(!layers.filters.has_all(Layer::Enemy));
    }
    assert_eq!(count, 8);
}

#[test]
fn allocate_activates_and_configures_from_request() {
    let mut world = World::new();
    world.insert_resource(pool::ShotPools::new(1));
    run_system_once(&mut world, pool::init_shot_pools);
    world.init_resource::<Messages<messages::ShotRequest>>();

    world.write_message(shot_request(Faction::Player, Vec3::new(10.0, 20.0, 3.0)));
    run_system_once(&mut world, allocator::allocate_shots);

    let mut q = world.query::<(&ShotState, &Shot, &Transform, &LinearVelocity, &Visibility, &CollisionLayers)>();
    let active: Vec<_> = q
        .iter(&world)
        .filter(|(state, ..)| **state == ShotState::Active)
        .collect();
    assert_eq!(active.len(), 1);

    let (_, shot, tf, vel, vis, layers) = active[0];
    assert_eq!(shot.faction, Faction::Player);
    assert_eq!(shot.damage, 2);
    assert_eq!(shot.altitude, 3.0);
    assert_eq!(tf.translation, Vec3::new(10.0, 20.0, 3.0));
    assert_eq!(vel.0, Vec2::new(0.0, 300.0));
    assert_eq!(*vis, Visibility::Visible);
    assert!(layers.memberships.has_all(Layer::PlayerShot));
    assert!(layers.filters.has_all(Layer::Enemy));

    let pools = world.resource::<pool::ShotPools>();
    assert_eq!(pools.side(Faction::Player).free_len(), 0);
    assert_eq!(pools.side(Faction::Enemy).free_len(), 1);
}

#[test]
fn allocate_grows_when_free_list_is_empty() {
    let mut world = World::new();
    world.insert_resource(pool::ShotPools::new(1));
    run_system_once(&mut world, pool::init_shot_pools);
    world.init_resource::<Messages<messages::ShotRequest>>();

    // Two requests against a single pre-spawned shot: the second must mint
    // a brand-new entity instead of failing.
    world.write_message(shot_request(Faction::Enemy, Vec3::ZERO));
    world.write_message(shot_request(Faction::Enemy, Vec3::new(5.0, 0.0, 1.0)));
    run_system_once(&mut world, allocator::allocate_shots);

    let mut q = world.query_filtered::<&ShotState, With<PooledShot>>();
    let active = q
        .iter(&world)
        .filter(|s| **s == ShotState::Active)
        .count();
    assert_eq!(active, 2);

    let pools = world.resource::<pool::ShotPools>();
    assert_eq!(pools.side(Faction::Enemy).capacity(), 2);
    assert_eq!(pools.side(Faction::Enemy).free_len(), 0);
}

// --------------------------------------------------------------------------------------
// Lifecycle: expiry + altitude pin
// --------------------------------------------------------------------------------------

#[test]
fn lifetime_expiry_releases_silently() {
    let mut world = World::new();
    world.insert_resource(fixed_time_at(0.1, 0.1));

    let e = spawn_active_shot(&mut world, Faction::Player, 1, 0.05);
    run_system_once(&mut world, lifecycle::tick_shot_lifetimes);

    assert_eq!(
        *world.get::<ShotState>(e).unwrap(),
        ShotState::PendingReturn
    );
}

#[test]
fn altitude_stays_pinned_to_spawn_value() {
    let mut world = World::new();
    world.insert_resource(fixed_time_at(0.01, 0.01));

    let e = spawn_active_shot(&mut world, Faction::Player, 1, 10.0);
    // Simulate vertical drift from the physics side.
    world.get_mut::<Transform>(e).unwrap().translation.z = 9.0;

    run_system_once(&mut world, lifecycle::tick_shot_lifetimes);

    assert_eq!(world.get::<Transform>(e).unwrap().translation.z, 2.0);
    assert_eq!(*world.get::<ShotState>(e).unwrap(), ShotState::Active);
}

#[test]
fn expiry_ignores_shots_already_pending_return() {
    let mut world = World::new();
    world.insert_resource(fixed_time_at(1.0, 1.0));

    let e = spawn_active_shot(&mut world, Faction::Enemy, 1, 0.05);
    *world.get_mut::<ShotState>(e).unwrap() = ShotState::PendingReturn;
    let before = world.get::<Shot>(e).unwrap().lifetime.elapsed_secs();

    run_system_once(&mut world, lifecycle::tick_shot_lifetimes);

    // Not ticked, not transitioned again.
    assert_eq!(world.get::<Shot>(e).unwrap().lifetime.elapsed_secs(), before);
    assert_eq!(
        *world.get::<ShotState>(e).unwrap(),
        ShotState::PendingReturn
    );
}

// --------------------------------------------------------------------------------------
// Collision resolver
// --------------------------------------------------------------------------------------

#[test]
fn cross_faction_hit_applies_damage_exactly_once() {
    let mut world = World::new();
    init_combat_messages(&mut world);

    let shot = spawn_active_shot(&mut world, Faction::Player, 10, 1.0);
    let enemy = world
        .spawn((Faction::Enemy, Health { hp: 25 }, LifeState::Alive))
        .id();

    // Narrow phases can report an overlap through several contact points;
    // both land in the same tick and must collapse to one resolution.
    write_collision(&mut world, shot, enemy);
    write_collision(&mut world, enemy, shot);

    run_system_once(&mut world, collision::resolve_shot_hits);

    assert_eq!(world.get::<Health>(enemy).unwrap().hp, 15);
    assert_eq!(
        *world.get::<ShotState>(shot).unwrap(),
        ShotState::PendingReturn
    );
    assert_eq!(world.resource::<Messages<messages::HitEffect>>().len(), 1);
}

#[test]
fn resolved_shot_ignores_later_overlaps() {
    let mut world = World::new();
    init_combat_messages(&mut world);

    let shot = spawn_active_shot(&mut world, Faction::Player, 10, 1.0);
    let first = world
        .spawn((Faction::Enemy, Health { hp: 25 }, LifeState::Alive))
        .id();
    let second = world
        .spawn((Faction::Enemy, Health { hp: 25 }, LifeState::Alive))
        .id();

    write_collision(&mut world, shot, first);
    run_system_once(&mut world, collision::resolve_shot_hits);

    // A second notification arrives after the shot already exited Active.
    write_collision(&mut world, shot, second);
    run_system_once(&mut world, collision::resolve_shot_hits);

    assert_eq!(world.get::<Health>(first).unwrap().hp, 15);
    assert_eq!(world.get::<Health>(second).unwrap().hp, 25);
}

#[test]
fn same_faction_overlap_is_discarded_and_shot_keeps_flying() {
    let mut world = World::new();
    init_combat_messages(&mut world);

    let shot = spawn_active_shot(&mut world, Faction::Enemy, 5, 1.0);
    let friend = world
        .spawn((Faction::Enemy, Health { hp: 25 }, LifeState::Alive))
        .id();

    write_collision(&mut world, shot, friend);
    run_system_once(&mut world, collision::resolve_shot_hits);

    assert_eq!(world.get::<Health>(friend).unwrap().hp, 25);
    assert_eq!(*world.get::<ShotState>(shot).unwrap(), ShotState::Active);
    assert!(world.resource::<Messages<messages::HitEffect>>().is_empty());
}

#[test]
fn faction_less_prop_overlap_is_discarded() {
    let mut world = World::new();
    init_combat_messages(&mut world);

    let shot = spawn_active_shot(&mut world, Faction::Player, 5, 1.0);
    let prop = world.spawn(Transform::default()).id();

    write_collision(&mut world, shot, prop);
    run_system_once(&mut world, collision::resolve_shot_hits);

    assert_eq!(*world.get::<ShotState>(shot).unwrap(), ShotState::Active);
}

#[test]
fn shot_on_shot_overlap_is_not_resolved() {
    let mut world = World::new();
    init_combat_messages(&mut world);

    let ours = spawn_active_shot(&mut world, Faction::Player, 5, 1.0);
    let theirs = spawn_active_shot(&mut world, Faction::Enemy, 5, 1.0);

    write_collision(&mut world, ours, theirs);
    run_system_once(&mut world, collision::resolve_shot_hits);

    assert_eq!(*world.get::<ShotState>(ours).unwrap(), ShotState::Active);
    assert_eq!(*world.get::<ShotState>(theirs).unwrap(), ShotState::Active);
}

#[test]
fn dying_target_absorbs_hit_but_consumes_shot() {
    let mut world = World::new();
    init_combat_messages(&mut world);

    let shot = spawn_active_shot(&mut world, Faction::Player, 10, 1.0);
    let dying = world
        .spawn((
            Faction::Enemy,
            Health { hp: 3 },
            LifeState::Dying {
                timer: Timer::from_seconds(0.35, TimerMode::Once),
            },
        ))
        .id();

    write_collision(&mut world, shot, dying);
    run_system_once(&mut world, collision::resolve_shot_hits);

    // No damage, no effect cue; but the shot must not fly on as a miss.
    assert_eq!(world.get::<Health>(dying).unwrap().hp, 3);
    assert_eq!(
        *world.get::<ShotState>(shot).unwrap(),
        ShotState::PendingReturn
    );
    assert!(world.resource::<Messages<messages::HitEffect>>().is_empty());
}

// --------------------------------------------------------------------------------------
// Return commit
// --------------------------------------------------------------------------------------

#[test]
fn commit_resets_transient_state_and_recycles() {
    let mut world = World::new();
    world.insert_resource(pool::ShotPools::new(2));

    let e = spawn_active_shot(&mut world, Faction::Enemy, 3, 1.0);
    *world.get_mut::<ShotState>(e).unwrap() = ShotState::PendingReturn;

    run_system_once(&mut world, commit::return_shots_to_pool);

    assert_eq!(*world.get::<ShotState>(e).unwrap(), ShotState::Inactive);
    assert_eq!(*world.get::<Visibility>(e).unwrap(), Visibility::Hidden);
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::ZERO);

    let layers = world.get::<CollisionLayers>(e).unwrap();
    assert!(layers.memberships.has_all(Layer::EnemyShot));
    assert!(!layers.filters.has_all(Layer::Player));

    let pools = world.resource::<pool::ShotPools>();
    assert!(pools.side(Faction::Enemy).contains_free(e));
    assert!(!pools.side(Faction::Player).contains_free(e));
}

#[test]
fn commit_leaves_active_shots_alone() {
    let mut world = World::new();
    world.insert_resource(pool::ShotPools::new(2));

    let e = spawn_active_shot(&mut world, Faction::Player, 3, 1.0);
    run_system_once(&mut world, commit::return_shots_to_pool);

    assert_eq!(*world.get::<ShotState>(e).unwrap(), ShotState::Active);
    assert_eq!(world.resource::<pool::ShotPools>().side(Faction::Player).free_len(), 0);
}

// --------------------------------------------------------------------------------------
// Property-style pool soundness
// --------------------------------------------------------------------------------------

/// Every pooled shot is in exactly one set: its faction's free list
/// (state `Inactive`) or the implicit active set (anything else).
fn assert_pool_sets_sound(world: &mut World) {
    let mut per_side = [(Faction::Player, 0usize), (Faction::Enemy, 0usize)];

    let entries: Vec<(Entity, ShotState, Faction)> = world
        .query_filtered::<(Entity, &ShotState, &Shot), With<PooledShot>>()
        .iter(world)
        .map(|(e, state, shot)| (e, *state, shot.faction))
        .collect();

    let pools = world.resource::<pool::ShotPools>();
    for (e, state, faction) in &entries {
        let in_free = pools.side(*faction).contains_free(*e);
        match state {
            ShotState::Inactive => assert!(in_free, "inactive shot missing from free list"),
            _ => {
                assert!(!in_free, "live shot present in free list");
                for entry in &mut per_side {
                    if entry.0 == *faction {
                        entry.1 += 1;
                    }
                }
            }
        }
    }

    for (faction, live) in per_side {
        assert_eq!(
            pools.side(faction).free_len() + live,
            pools.side(faction).capacity(),
            "free + active must equal the full entity set"
        );
    }
}

#[test]
fn pool_sets_stay_disjoint_under_random_traffic() {
    let mut world = World::new();
    world.insert_resource(pool::ShotPools::new(8));
    run_system_once(&mut world, pool::init_shot_pools);
    world.init_resource::<Messages<messages::ShotRequest>>();

    let mut rng = TestRng::new(0x5EED_F00D_CAFE);

    for _round in 0..200 {
        let requests = rng.below(5);
        for _ in 0..requests {
            let faction = if rng.chance(0.5) {
                Faction::Player
            } else {
                Faction::Enemy
            };
            world.write_message(shot_request(faction, Vec3::new(rng.range_f32(-100.0, 100.0), 0.0, 1.0)));
        }
        run_system_once(&mut world, allocator::allocate_shots);

        // Retire a random subset, as expiry and hits would.
        let active: Vec<Entity> = world
            .query_filtered::<(Entity, &ShotState), With<PooledShot>>()
            .iter(&world)
            .filter(|(_, s)| **s == ShotState::Active)
            .map(|(e, _)| e)
            .collect();
        for e in active {
            if rng.chance(0.5) {
                *world.get_mut::<ShotState>(e).unwrap() = ShotState::PendingReturn;
            }
        }
        run_system_once(&mut world, commit::return_shots_to_pool);

        assert_pool_sets_sound(&mut world);

        // Drop both halves of the request double buffer so the next round's
        // fresh reader does not replay this round's messages.
        world.resource_mut::<Messages<messages::ShotRequest>>().update();
        world.resource_mut::<Messages<messages::ShotRequest>>().update();
    }
}

// --------------------------------------------------------------------------------------
// Blasts
// --------------------------------------------------------------------------------------

#[test]
fn blast_request_activates_pooled_blast() {
    let mut world = World::new();
    world.insert_resource(effects::BlastPools::new(2));
    run_system_once(&mut world, effects::init_blast_pools);
    world.init_resource::<Messages<messages::BlastRequest>>();

    world.write_message(messages::BlastRequest {
        tier: effects::BlastTier::Small,
        pos: Vec2::new(30.0, -40.0),
    });
    run_system_once(&mut world, effects::allocate_blasts);

    let mut q = world.query::<(&effects::BlastState, &effects::Blast, &Transform)>();
    let active: Vec<_> = q
        .iter(&world)
        .filter(|(state, ..)| **state == effects::BlastState::Active)
        .collect();
    assert_eq!(active.len(), 1);

    let (_, blast, tf) = active[0];
    assert_eq!(blast.tier, effects::BlastTier::Small);
    assert_eq!(tf.translation.truncate(), Vec2::new(30.0, -40.0));

    let pools = world.resource::<effects::BlastPools>();
    assert_eq!(pools.tier(effects::BlastTier::Small).free_len(), 1);
    assert_eq!(pools.tier(effects::BlastTier::Large).free_len(), 2);
}

#[test]
fn blast_returns_to_its_tier_pool_when_finished() {
    let mut world = World::new();
    world.insert_resource(effects::BlastPools::new(1));
    run_system_once(&mut world, effects::init_blast_pools);
    world.init_resource::<Messages<messages::BlastRequest>>();

    world.write_message(messages::BlastRequest {
        tier: effects::BlastTier::Boss,
        pos: Vec2::ZERO,
    });
    run_system_once(&mut world, effects::allocate_blasts);
    assert_eq!(
        world
            .resource::<effects::BlastPools>()
            .tier(effects::BlastTier::Boss)
            .free_len(),
        0
    );

    // Outlast the longest tier in one tick.
    world.insert_resource(fixed_time_at(5.0, 5.0));
    run_system_once(&mut world, effects::tick_blasts);

    let pools = world.resource::<effects::BlastPools>();
    assert_eq!(pools.tier(effects::BlastTier::Boss).free_len(), 1);

    let mut q = world.query::<(&effects::BlastState, &Visibility)>();
    for (state, vis) in q.iter(&world) {
        assert_eq!(*state, effects::BlastState::Inactive);
        assert_eq!(*vis, Visibility::Hidden);
    }
}

#[test]
fn blast_pool_grows_when_empty() {
    let mut world = World::new();
    world.insert_resource(effects::BlastPools::new(1));
    run_system_once(&mut world, effects::init_blast_pools);
    world.init_resource::<Messages<messages::BlastRequest>>();

    for _ in 0..2 {
        world.write_message(messages::BlastRequest {
            tier: effects::BlastTier::Large,
            pos: Vec2::ZERO,
        });
    }
    run_system_once(&mut world, effects::allocate_blasts);

    let mut q = world.query::<&effects::BlastState>();
    let active = q
        .iter(&world)
        .filter(|s| **s == effects::BlastState::Active)
        .count();
    assert_eq!(active, 2);
    assert_eq!(
        world
            .resource::<effects::BlastPools>()
            .tier(effects::BlastTier::Large)
            .capacity(),
        2
    );
}
