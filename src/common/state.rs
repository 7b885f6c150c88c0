//! Global state machine.
//!
//! A single sortie for now; menus/debriefing would hang off this enum later.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
}
