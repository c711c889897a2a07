use bevy::prelude::*;

use crate::character::{
    health::{DamageAccumulator, Health},
    movement::Velocity,
    BodyCollider, Facing, Faction,
};

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

pub const PLAYER_BODY_RADIUS: f32 = 12.0;

/// Assembles the player actor. The controller for the player (input glue)
/// lives outside the core; the simulation only needs its position, body
/// and health.
pub fn spawn_player(commands: &mut Commands, position: Vec2, max_health: f32) -> Entity {
    commands
        .spawn((
            Player,
            Faction::Player,
            Transform::from_translation(position.extend(0.0)),
            Velocity::default(),
            Facing::default(),
            Health::new(max_health),
            DamageAccumulator::default(),
            BodyCollider {
                radius: PLAYER_BODY_RADIUS,
            },
        ))
        .id()
}
