//! Collision/damage resolver.
//!
//! Consumes overlap notifications from the physics collaborator and decides
//! what they mean for gameplay:
//!
//! 1. exactly one side of the pair must be a pooled shot, and that shot must
//!    still be `Active` (the single-exit guard; narrow phases happily
//!    report several contacts for one overlap in one tick);
//! 2. the struck side must be damage-relevant: it declares a `Faction`
//!    differing from the shot's. Inert props and same-side pairs are
//!    discarded and the shot keeps traveling;
//! 3. a target already in its dying transition absorbs the hit silently:
//!    no damage, no effect cue, but it still consumes the shot;
//! 4. otherwise damage is applied exactly once, a `HitEffect` is emitted
//!    for the presentation layer, and the shot is marked for return.
//!
//! Damageability is a registration-time fact (the presence of `Faction` /
//! `Health` / `LifeState` components), never a per-hit capability probe.

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::common::faction::Faction;

use super::components::{Health, LifeState, PooledShot, Shot, ShotState};
use super::messages::HitEffect;

#[derive(Clone, Copy, Debug)]
struct Struck {
    collider: Entity,
    body: Option<Entity>,
}

impl Struck {
    /// Gameplay components live on the rigid body where there is one.
    #[inline]
    fn owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

#[inline]
fn sides(ev: &CollisionStart) -> (Struck, Struck) {
    (
        Struck {
            collider: ev.collider1,
            body: ev.body1,
        },
        Struck {
            collider: ev.collider2,
            body: ev.body2,
        },
    )
}

pub fn resolve_shot_hits(
    mut started: MessageReader<CollisionStart>,
    // Fast "is this a pooled shot?" membership check
    q_is_shot: Query<(), With<PooledShot>>,
    mut q_shots: Query<(&Shot, &mut ShotState, &Transform), With<PooledShot>>,
    q_factions: Query<&Faction>,
    q_life: Query<&LifeState>,
    mut q_health: Query<&mut Health>,
    mut hits: MessageWriter<HitEffect>,
    // Per-tick dedupe without allocation
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let (s1, s2) = sides(ev);

        // Exactly one shot in the pair; shot-vs-shot and craft-vs-craft
        // overlaps are not this resolver's business.
        let shot_is_1 = q_is_shot.contains(s1.collider);
        let shot_is_2 = q_is_shot.contains(s2.collider);
        if !(shot_is_1 ^ shot_is_2) {
            continue;
        }
        let (shot_side, other_side) = if shot_is_1 { (s1, s2) } else { (s2, s1) };

        // Multi-contact reports collapse to one resolution per shot per tick.
        if !seen.insert(shot_side.collider) {
            continue;
        }

        let Ok((shot, mut state, shot_tf)) = q_shots.get_mut(shot_side.collider) else {
            continue;
        };

        // Already expired or resolved this activation.
        if *state != ShotState::Active {
            continue;
        }

        let target = other_side.owner();

        // Not damage-relevant (inert prop) or same side: discard, keep flying.
        let Ok(&target_faction) = q_factions.get(target) else {
            continue;
        };
        if target_faction == shot.faction {
            continue;
        }

        // A dying target rejects damage but still consumes the shot; it must
        // not go back to the pool as if it had missed.
        let absorbing = q_life
            .get(target)
            .is_ok_and(|life| !life.can_take_damage());

        if !absorbing {
            if let Ok(mut health) = q_health.get_mut(target) {
                health.hp -= shot.damage;
            }
            hits.write(HitEffect {
                pos: shot_tf.translation.truncate(),
            });
        }

        *state = ShotState::PendingReturn;
    }
}
