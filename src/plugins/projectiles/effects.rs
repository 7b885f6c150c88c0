//! Pooled blasts: timed, non-damaging effect triggers.
//!
//! Blasts carry no collider; they exist so the presentation layer has a
//! gameplay-owned anchor (position, tier, remaining time) to decorate.
//! One sub-pool per tier, same free-list discipline as shots.

use bevy::prelude::*;

use super::messages::BlastRequest;
use super::pool::EntityPool;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlastTier {
    Small,
    Large,
    Boss,
}

impl BlastTier {
    pub const ALL: [BlastTier; 3] = [BlastTier::Small, BlastTier::Large, BlastTier::Boss];

    #[inline]
    pub fn radius(self) -> f32 {
        match self {
            BlastTier::Small => 18.0,
            BlastTier::Large => 40.0,
            BlastTier::Boss => 90.0,
        }
    }

    #[inline]
    pub fn duration_secs(self) -> f32 {
        match self {
            BlastTier::Small => 0.35,
            BlastTier::Large => 0.6,
            BlastTier::Boss => 1.2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            BlastTier::Small => "blast(small)",
            BlastTier::Large => "blast(large)",
            BlastTier::Boss => "blast(boss)",
        }
    }
}

/// Marker: pool-owned blast entity.
#[derive(Component)]
pub struct PooledBlast;

/// Blasts only ever exit through their timer, so two states suffice.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlastState {
    #[default]
    Inactive,
    Active,
}

#[derive(Component, Debug, Clone)]
pub struct Blast {
    pub tier: BlastTier,
    pub timer: Timer,
}

impl Blast {
    fn template(tier: BlastTier) -> Self {
        Self {
            tier,
            timer: Timer::from_seconds(tier.duration_secs(), TimerMode::Once),
        }
    }

    #[inline]
    fn rearm(&mut self) {
        self.timer = Timer::from_seconds(self.tier.duration_secs(), TimerMode::Once);
    }
}

#[derive(Resource, Debug)]
pub struct BlastPools {
    small: EntityPool,
    large: EntityPool,
    boss: EntityPool,
}

impl BlastPools {
    pub fn new(capacity_per_tier: usize) -> Self {
        Self {
            small: EntityPool::new(capacity_per_tier),
            large: EntityPool::new(capacity_per_tier),
            boss: EntityPool::new(capacity_per_tier),
        }
    }

    #[inline]
    pub fn tier(&self, tier: BlastTier) -> &EntityPool {
        match tier {
            BlastTier::Small => &self.small,
            BlastTier::Large => &self.large,
            BlastTier::Boss => &self.boss,
        }
    }

    #[inline]
    pub fn tier_mut(&mut self, tier: BlastTier) -> &mut EntityPool {
        match tier {
            BlastTier::Small => &mut self.small,
            BlastTier::Large => &mut self.large,
            BlastTier::Boss => &mut self.boss,
        }
    }
}

fn blast_sprite(tier: BlastTier) -> Sprite {
    Sprite {
        color: Color::srgb(1.0, 0.7, 0.25),
        custom_size: Some(Vec2::splat(tier.radius() * 2.0)),
        ..default()
    }
}

fn inactive_blast_bundle(tier: BlastTier) -> impl Bundle {
    (
        Name::new("Blast(Pooled)"),
        PooledBlast,
        BlastState::Inactive,
        Blast::template(tier),
        blast_sprite(tier),
        Transform::from_xyz(0.0, 0.0, 5.0),
        Visibility::Hidden,
    )
}

fn grown_blast_bundle(req: &BlastRequest) -> impl Bundle {
    (
        Name::new("Blast(Pooled)"),
        PooledBlast,
        BlastState::Active,
        Blast::template(req.tier),
        blast_sprite(req.tier),
        Transform::from_translation(req.pos.extend(5.0)),
        Visibility::Visible,
    )
}

/// Pre-spawn every tier pool (inactive).
pub fn init_blast_pools(mut commands: Commands, mut pools: ResMut<BlastPools>) {
    for tier in BlastTier::ALL {
        let cap = pools.tier(tier).capacity();
        for _ in 0..cap {
            let e = commands.spawn(inactive_blast_bundle(tier)).id();
            pools.tier_mut(tier).push_free(e);
        }
    }
}

/// Consumer: activate blasts for queued requests.
pub fn allocate_blasts(
    mut commands: Commands,
    mut pools: ResMut<BlastPools>,
    mut reader: MessageReader<BlastRequest>,
    mut q: Query<
        (&mut BlastState, &mut Blast, &mut Transform, &mut Visibility),
        With<PooledBlast>,
    >,
) {
    for req in reader.read() {
        let pool = pools.tier_mut(req.tier);
        let Some(e) = pool.pop_free() else {
            pool.note_growth(req.tier.label());
            commands.spawn(grown_blast_bundle(req));
            continue;
        };

        let (mut state, mut blast, mut tf, mut vis) = q
            .get_mut(e)
            .expect("BlastPools contained an entity missing pooled blast components");

        *state = BlastState::Active;
        blast.rearm();
        tf.translation = req.pos.extend(5.0);
        tf.scale = Vec3::ONE;
        *vis = Visibility::Visible;
    }
}

/// Tick active blasts: grow-and-fade, then recycle.
///
/// This system is the single writer for blast deactivation, so it may push
/// to the free lists directly.
pub fn tick_blasts(
    time: Res<Time<Fixed>>,
    mut pools: ResMut<BlastPools>,
    mut q: Query<
        (
            Entity,
            &mut Blast,
            &mut BlastState,
            &mut Transform,
            &mut Sprite,
            &mut Visibility,
        ),
        With<PooledBlast>,
    >,
) {
    for (e, mut blast, mut state, mut tf, mut sprite, mut vis) in &mut q {
        if *state != BlastState::Active {
            continue;
        }

        blast.timer.tick(time.delta());

        let dur = blast.timer.duration().as_secs_f32().max(0.0001);
        let t = (blast.timer.elapsed_secs() / dur).clamp(0.0, 1.0);

        tf.scale = Vec3::splat(0.4 + 0.6 * t);
        let mut c = sprite.color.to_srgba();
        c.alpha = 1.0 - t;
        sprite.color = c.into();

        if blast.timer.is_finished() {
            *state = BlastState::Inactive;
            *vis = Visibility::Hidden;
            tf.scale = Vec3::ONE;
            pools.tier_mut(blast.tier).push_free(e);
        }
    }
}
