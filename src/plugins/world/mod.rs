//! World plugin: combat-zone bounds and inert scenery.
//!
//! The derelicts are deliberately faction-less: they block craft but are
//! not damage-relevant, so the collision resolver discards any overlap
//! involving them.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;

const HALF_W: f32 = 640.0;
const HALF_H: f32 = 400.0;
const EDGE: f32 = 30.0;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_bounds);
    app.add_systems(OnEnter(GameState::InGame), spawn_derelicts);
}

fn spawn_bounds(mut commands: Commands) {
    let edge_layers = CollisionLayers::new(Layer::World, [Layer::Player, Layer::Enemy]);

    // (name, centre, size) for the four edges of the zone.
    let edges = [
        ("BoundN", Vec2::new(0.0, HALF_H + EDGE * 0.5), Vec2::new(HALF_W * 2.0 + EDGE * 2.0, EDGE)),
        ("BoundS", Vec2::new(0.0, -HALF_H - EDGE * 0.5), Vec2::new(HALF_W * 2.0 + EDGE * 2.0, EDGE)),
        ("BoundW", Vec2::new(-HALF_W - EDGE * 0.5, 0.0), Vec2::new(EDGE, HALF_H * 2.0)),
        ("BoundE", Vec2::new(HALF_W + EDGE * 0.5, 0.0), Vec2::new(EDGE, HALF_H * 2.0)),
    ];

    for (name, pos, size) in edges {
        commands.spawn((
            Name::new(name),
            Sprite {
                color: Color::srgb(0.2, 0.22, 0.3),
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(pos.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            edge_layers,
            DespawnOnExit(GameState::InGame),
        ));
    }
}

/// Inert props: colliders with no `Faction`, so nothing can damage them and
/// they damage nothing.
fn spawn_derelicts(mut commands: Commands) {
    let prop_layers = CollisionLayers::new(Layer::World, [Layer::Player, Layer::Enemy]);

    for (i, pos) in [Vec2::new(-380.0, 40.0), Vec2::new(420.0, -120.0)]
        .into_iter()
        .enumerate()
    {
        commands.spawn((
            Name::new(format!("Derelict{i}")),
            Sprite {
                color: Color::srgb(0.35, 0.33, 0.3),
                custom_size: Some(Vec2::splat(44.0)),
                ..default()
            },
            Transform::from_translation(pos.extend(0.5)),
            RigidBody::Static,
            Collider::rectangle(44.0, 44.0),
            prop_layers,
            DespawnOnExit(GameState::InGame),
        ));
    }
}
