//! Weapon heat state machine.
//!
//! The machine is a plain struct with methods; the ECS systems around it are
//! thin clock adapters. All timed behaviour is expressed as absolute
//! deadlines in seconds, checked by `tick`; there is nothing to suspend and
//! nothing to cancel beyond dropping the component.
//!
//! ```text
//! Ready ──fire──> Ready (heat += per-shot)
//!   │                │ heat reaches max
//!   │                v
//!   │           Overheated (all firing suppressed)
//!   │                │ recover_at passes
//!   └──── decay ─────┘ heat := max / 2   ("warm, not cold")
//! ```

use bevy::prelude::*;

/// Heat fraction at which the one-shot warning fires.
pub const HEAT_WARN_FRACTION: f32 = 0.7;

/// Heat fraction restored after a forced overheat recovery. Intentionally
/// not zero: cooldown is recovery, not maintenance.
pub const OVERHEAT_RESET_FRACTION: f32 = 0.5;

/// Static configuration of one weapon mount.
#[derive(Debug, Clone)]
pub struct WeaponSpec {
    /// Seconds between shots at the base fire rate.
    pub shot_interval: f32,
    pub heat_per_shot: f32,
    pub max_heat: f32,
    /// Forced lockout after hitting `max_heat`.
    pub overheat_cooldown: f32,
    /// Continuous heat bleed while not overheated.
    pub heat_decay_per_sec: f32,
    pub shot_damage: i32,
    pub shot_speed: f32,
    pub shot_lifetime: f32,
    /// Muzzle distance ahead of the craft's nose.
    pub muzzle_offset: f32,
    /// Lateral separation of the two origins in dual-emission mode.
    pub dual_spacing: f32,
}

impl Default for WeaponSpec {
    fn default() -> Self {
        Self {
            shot_interval: 0.14,
            heat_per_shot: 8.0,
            max_heat: 100.0,
            overheat_cooldown: 2.5,
            heat_decay_per_sec: 22.0,
            shot_damage: 1,
            shot_speed: 900.0,
            shot_lifetime: 1.6,
            muzzle_offset: 18.0,
            dual_spacing: 14.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeaponPhase {
    Ready,
    Overheated { recover_at: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct RateBoost {
    pub multiplier: f32,
    pub until: f64,
}

/// One committed trigger pull.
#[derive(Debug, Clone, Copy)]
pub struct Volley {
    /// Emit from both origins this pull.
    pub dual: bool,
    /// This pull crossed the warning threshold; signal the UI layer once.
    pub warning: bool,
}

#[derive(Component, Debug, Clone)]
pub struct Weapon {
    pub spec: WeaponSpec,
    heat: f32,
    phase: WeaponPhase,
    next_fire_at: f64,
    heat_warned: bool,
    rate_boost: Option<RateBoost>,
    dual_until: Option<f64>,
}

impl Weapon {
    pub fn new(spec: WeaponSpec) -> Self {
        Self {
            spec,
            heat: 0.0,
            phase: WeaponPhase::Ready,
            next_fire_at: 0.0,
            heat_warned: false,
            rate_boost: None,
            dual_until: None,
        }
    }

    // ---- telemetry (consumed by the UI layer) ----

    #[inline]
    pub fn heat(&self) -> f32 {
        self.heat
    }

    #[inline]
    pub fn heat_fraction(&self) -> f32 {
        (self.heat / self.spec.max_heat).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn is_overheated(&self) -> bool {
        matches!(self.phase, WeaponPhase::Overheated { .. })
    }

    // ---- timed modifiers ----

    /// Multiply the fire rate until `now + duration`. Replaces any active
    /// window; reversion is exact because the interval is always derived
    /// from the base spec.
    pub fn apply_rate_boost(&mut self, multiplier: f32, now: f64, duration: f32) {
        self.rate_boost = Some(RateBoost {
            multiplier,
            until: now + duration as f64,
        });
    }

    /// Emit from two origins until `now + duration`. A single field holds
    /// the whole mode, so the reversion is atomic by construction.
    pub fn apply_dual_emission(&mut self, now: f64, duration: f32) {
        self.dual_until = Some(now + duration as f64);
    }

    #[inline]
    fn rate_multiplier(&self) -> f32 {
        self.rate_boost.map_or(1.0, |b| b.multiplier)
    }

    // ---- the state machine ----

    /// Advance timed state: boost expiry, overheat recovery, heat decay,
    /// warning latch reset.
    pub fn tick(&mut self, now: f64, dt: f32) {
        if self.rate_boost.is_some_and(|b| now >= b.until) {
            self.rate_boost = None;
        }
        if self.dual_until.is_some_and(|until| now >= until) {
            self.dual_until = None;
        }

        match self.phase {
            WeaponPhase::Overheated { recover_at } => {
                if now >= recover_at {
                    self.phase = WeaponPhase::Ready;
                    self.heat = self.spec.max_heat * OVERHEAT_RESET_FRACTION;
                }
            }
            WeaponPhase::Ready => {
                self.heat = (self.heat - self.spec.heat_decay_per_sec * dt).max(0.0);
            }
        }

        // Edge trigger: re-arm the warning only after dropping back under
        // the threshold, so sustained high heat signals once, not per frame.
        if self.heat < self.spec.max_heat * HEAT_WARN_FRACTION {
            self.heat_warned = false;
        }
    }

    /// Attempt a trigger pull at `now`. On success the heat and fire-rate
    /// bookkeeping is committed and the caller must emit the volley.
    pub fn try_fire(&mut self, now: f64) -> Option<Volley> {
        if self.is_overheated() || now < self.next_fire_at {
            return None;
        }

        let interval = self.spec.shot_interval / self.rate_multiplier();
        self.next_fire_at = now + interval as f64;

        self.heat = (self.heat + self.spec.heat_per_shot).min(self.spec.max_heat);
        if self.heat >= self.spec.max_heat {
            self.phase = WeaponPhase::Overheated {
                recover_at: now + self.spec.overheat_cooldown as f64,
            };
        }

        let warning = !self.heat_warned && self.heat >= self.spec.max_heat * HEAT_WARN_FRACTION;
        if warning {
            self.heat_warned = true;
        }

        Some(Volley {
            dual: self.dual_until.is_some(),
            warning,
        })
    }
}
