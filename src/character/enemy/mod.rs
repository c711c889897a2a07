pub mod ai;
pub mod catalog;
pub mod create;

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

/// Archetype name the enemy was spawned from, kept for logging and for
/// presentation listeners.
#[derive(Component, Debug, Clone)]
pub struct EnemyKind(pub String);
