//! Weapons plugin: fire-rate gating, heat/overheat, timed firing modifiers.
//!
//! Pipeline (Update, gameplay clock):
//! - `tick_weapons`: boost expiry, overheat recovery, heat decay
//! - `apply_weapon_boosts`: consume pickups
//! - `request_player_shots`: trigger pulls -> ShotRequest messages

use bevy::prelude::*;

use crate::common::state::GameState;

pub mod components;
pub mod messages;
pub mod systems;

pub use components::{Weapon, WeaponSpec};

pub fn plugin(app: &mut App) {
    app.add_message::<messages::HeatWarning>()
        .add_message::<messages::WeaponBoost>();

    app.add_systems(
        Update,
        (
            systems::tick_weapons,
            systems::apply_weapon_boosts,
            systems::request_player_shots,
        )
            .chain()
            .run_if(in_state(GameState::InGame)),
    );
}

#[cfg(test)]
mod tests;
