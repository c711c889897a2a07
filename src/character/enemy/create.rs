//! Enemy assembly from a catalog archetype.

use bevy::prelude::*;

use crate::character::{
    health::{DamageAccumulator, Health},
    movement::Velocity,
    BodyCollider, Facing, Faction,
};
use crate::combat::hitbox::AttackHitbox;

use super::ai::{AttackState, EnemyAiConfig, EnemyState, StuckTracker};
use super::catalog::EnemyCatalog;
use super::{Enemy, EnemyKind};

/// Spawns one enemy of `kind` at `position`. Returns `None` when the
/// catalog has no such archetype; the caller decides whether that is a
/// config error or a skip.
pub fn spawn_enemy(
    commands: &mut Commands,
    catalog: &EnemyCatalog,
    kind: &str,
    position: Vec2,
) -> Option<Entity> {
    let archetype = catalog.get(kind)?;

    let mut spawned = commands.spawn((
        Enemy,
        EnemyKind(kind.to_string()),
        Faction::Enemy,
        Transform::from_translation(position.extend(0.0)),
        Velocity::default(),
        Facing::default(),
        Health::new(archetype.max_health),
        DamageAccumulator::default(),
        BodyCollider {
            radius: archetype.body_radius,
        },
        EnemyState::default(),
        AttackState::default(),
        StuckTracker::new(position),
        EnemyAiConfig::from_archetype(archetype),
    ));
    if let Some(spec) = &archetype.hitbox {
        spawned.insert(AttackHitbox::new(
            Faction::Enemy,
            archetype.attack_damage,
            spec.shape,
            spec.forward_offset,
        ));
    }
    Some(spawned.id())
}
