//! Attack pattern controller.
//!
//! Each armed enemy cycles through a fixed rotation of emission shapes.
//! An attack triggers when the interval has elapsed AND the target is inside
//! detection range; the controller then executes the current shape and steps
//! the rotation. No target in range is a steady state, not a fault; the
//! controller simply withholds.
//!
//! Bursts are temporally extended: the aim direction is captured when the
//! burst starts and the remaining shots are emitted on their sub-interval
//! with **no re-validation** (target death or range exit mid-burst does not
//! cancel them). Only the shooter leaving `Alive` cancels a burst, outright.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::common::faction::Faction;
use crate::plugins::player::Player;
use crate::plugins::projectiles::components::LifeState;
use crate::plugins::projectiles::messages::ShotRequest;

use super::Enemy;

/// Distance from craft centre to the emission point.
const MUZZLE_OFFSET: f32 = 20.0;

/// A named, parameterized emission shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PatternKind {
    /// `count` shots fanned across `arc` radians centred on the aim.
    Spread { count: u32, arc: f32 },
    /// `count` sequential single shots, `gap` seconds apart.
    Burst { count: u32, gap: f32 },
    /// `count` shots evenly spaced over the full circle.
    Circle { count: u32 },
}

/// Per-shot parameters of one enemy emitter.
#[derive(Clone, Copy, Debug)]
pub struct ShotProfile {
    pub damage: i32,
    pub speed: f32,
    pub lifetime: f32,
}

/// An in-flight burst continuation. Dies with its owner.
#[derive(Clone, Copy, Debug)]
pub struct BurstVolley {
    pub shots_left: u32,
    pub next_shot_at: f64,
    pub gap: f32,
    /// Aim captured at burst start.
    pub dir: Vec2,
}

#[derive(Component, Debug, Clone)]
pub struct AttackPattern {
    pub rotation: Vec<PatternKind>,
    pub index: usize,
    pub next_attack_at: f64,
    pub burst: Option<BurstVolley>,
    /// Seconds between attack triggers.
    pub interval: f32,
    /// Detection range for the target check.
    pub range: f32,
    pub profile: ShotProfile,
}

impl AttackPattern {
    /// An empty rotation is a startup misconfiguration; fail loudly.
    pub fn new(rotation: Vec<PatternKind>, interval: f32, range: f32, profile: ShotProfile) -> Self {
        assert!(!rotation.is_empty(), "attack pattern rotation is empty");
        Self {
            rotation,
            index: 0,
            next_attack_at: 0.0,
            burst: None,
            interval,
            range,
            profile,
        }
    }

    /// Current shape, stepping the rotation for next time.
    #[inline]
    pub fn advance(&mut self) -> PatternKind {
        let kind = self.rotation[self.index];
        self.index = (self.index + 1) % self.rotation.len();
        kind
    }
}

/// `count` directions spanning `arc` radians, centred on `aim`.
/// A single shot collapses onto the aim itself.
pub fn fan_directions(aim: Vec2, count: u32, arc: f32) -> Vec<Vec2> {
    if count <= 1 {
        return vec![aim];
    }
    let step = arc / (count - 1) as f32;
    let start = -arc * 0.5;
    (0..count)
        .map(|i| Vec2::from_angle(start + step * i as f32).rotate(aim))
        .collect()
}

/// `count` directions evenly spaced over the full circle.
pub fn ring_directions(count: u32) -> Vec<Vec2> {
    let step = std::f32::consts::TAU / count.max(1) as f32;
    (0..count.max(1))
        .map(|i| Vec2::from_angle(step * i as f32))
        .collect()
}

/// Drive every armed enemy's pattern rotation and burst continuations.
pub fn drive_attack_patterns(
    time: Res<Time<Fixed>>,
    q_target: Query<(&Transform, &LifeState), With<Player>>,
    mut q: Query<(&Transform, &mut AttackPattern, &LifeState), With<Enemy>>,
    mut shots: MessageWriter<ShotRequest>,
) {
    let now = time.elapsed_secs_f64();

    // A dying or absent player is no target; controllers withhold.
    let target = q_target
        .single()
        .ok()
        .filter(|(_, life)| life.can_take_damage())
        .map(|(tf, _)| tf.translation.truncate());

    for (tf, mut pattern, life) in &mut q {
        if !life.can_take_damage() {
            // Owner left Alive: cancel any continuation outright.
            pattern.burst = None;
            continue;
        }

        let origin = tf.translation.truncate();
        let altitude = tf.translation.z;
        let profile = pattern.profile;

        // In-flight burst: complete remaining shots on schedule.
        if let Some(mut burst) = pattern.burst.take() {
            if now >= burst.next_shot_at {
                emit(&mut shots, origin, altitude, burst.dir, profile);
                burst.shots_left -= 1;
                burst.next_shot_at = now + burst.gap as f64;
            }
            if burst.shots_left > 0 {
                pattern.burst = Some(burst);
            }
            continue;
        }

        if now < pattern.next_attack_at {
            continue;
        }
        let Some(target) = target else {
            continue;
        };
        if origin.distance_squared(target) > pattern.range * pattern.range {
            continue;
        }

        let mut aim = target - origin;
        if aim.length_squared() < 1e-4 {
            aim = Vec2::NEG_Y;
        } else {
            aim = aim.normalize();
        }

        let kind = pattern.advance();
        pattern.next_attack_at = now + pattern.interval as f64;

        match kind {
            PatternKind::Spread { count, arc } => {
                for dir in fan_directions(aim, count, arc) {
                    emit(&mut shots, origin, altitude, dir, profile);
                }
            }
            PatternKind::Circle { count } => {
                for dir in ring_directions(count) {
                    emit(&mut shots, origin, altitude, dir, profile);
                }
            }
            PatternKind::Burst { count, gap } => {
                emit(&mut shots, origin, altitude, aim, profile);
                if count > 1 {
                    pattern.burst = Some(BurstVolley {
                        shots_left: count - 1,
                        next_shot_at: now + gap as f64,
                        gap,
                        dir: aim,
                    });
                }
            }
        }
    }
}

#[inline]
fn emit(
    shots: &mut MessageWriter<ShotRequest>,
    origin: Vec2,
    altitude: f32,
    dir: Vec2,
    profile: ShotProfile,
) {
    shots.write(ShotRequest {
        faction: Faction::Enemy,
        pos: (origin + dir * MUZZLE_OFFSET).extend(altitude),
        vel: dir * profile.speed,
        damage: profile.damage,
        lifetime: profile.lifetime,
    });
}
