//! Faction tags.
//!
//! The side an entity fights for decides what its shots may damage.
//! Craft carry `Faction` as a component; shots carry it inside their
//! pooled template, so each side's shot pool is homogeneous.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::layers::Layer;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    /// The side this faction's shots are allowed to damage.
    #[inline]
    pub fn hostile(self) -> Faction {
        match self {
            Faction::Player => Faction::Enemy,
            Faction::Enemy => Faction::Player,
        }
    }

    /// Collision-layer membership of this faction's shots.
    #[inline]
    pub fn shot_layer(self) -> Layer {
        match self {
            Faction::Player => Layer::PlayerShot,
            Faction::Enemy => Layer::EnemyShot,
        }
    }

    /// Collision-layer membership of this faction's craft.
    #[inline]
    pub fn craft_layer(self) -> Layer {
        match self {
            Faction::Player => Layer::Player,
            Faction::Enemy => Layer::Enemy,
        }
    }

    /// Layers an active shot of this faction collides with.
    ///
    /// Shots fly at altitude and pass over world geometry, so the only
    /// filter is the opposing craft layer. Expiry handles everything else.
    #[inline]
    pub fn shot_filters(self) -> [Layer; 1] {
        [self.hostile().craft_layer()]
    }
}
