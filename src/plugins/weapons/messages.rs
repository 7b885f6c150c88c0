//! Weapon telemetry and pickup messages.

use bevy::prelude::*;

/// One-shot signal: heat crossed the warning threshold.
/// Fire-and-forget hook for the UI/audio layer.
#[derive(Message, Clone, Copy, Debug)]
pub struct HeatWarning {
    pub heat_fraction: f32,
}

#[derive(Clone, Copy, Debug)]
pub enum BoostKind {
    /// Multiplies the fire rate for the duration.
    RateBoost { multiplier: f32 },
    /// Doubles simultaneous muzzle origins for the duration.
    DualEmission,
}

/// Grant a timed firing-mode modifier to the player weapon.
#[derive(Message, Clone, Copy, Debug)]
pub struct WeaponBoost {
    pub kind: BoostKind,
    pub duration: f32,
}
