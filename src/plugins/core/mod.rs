//! Core plugin: shared resources and global settings.

use crate::common::tunables::Tunables;
use bevy::prelude::*;

/// Sortie counters. Simple process-lifetime tallies, nothing persisted.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct CombatStats {
    pub kills: u32,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(Tunables::default());
    app.insert_resource(CombatStats::default());
    app.insert_resource(ClearColor(Color::srgb(0.04, 0.05, 0.09)));
}

#[cfg(test)]
mod tests;
