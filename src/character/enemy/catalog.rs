//! Per-enemy-type tunables, loaded from RON. Times are in seconds and are
//! converted to frames when the archetype is stamped onto a spawned enemy.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::hitbox::HitShape;

/// Hitbox geometry carried by an archetype. `forward_offset` pushes the
/// shape out along the enemy's facing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitboxSpec {
    pub shape: HitShape,
    pub forward_offset: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyArchetype {
    pub max_health: f32,
    pub move_speed: f32,
    pub body_radius: f32,

    /// Strike-reach fallback when no hitbox is configured; such enemies
    /// apply direct damage instead of enabling a hitbox.
    pub attack_range: f32,
    pub attack_damage: f32,
    pub attack_cooldown: f32,
    /// Seconds into the attack at which the hitbox activates.
    pub hitbox_delay: f32,
    /// Seconds the hitbox stays active.
    pub hitbox_active: f32,
    /// Total attack duration in seconds.
    pub attack_duration: f32,
    pub hitbox: Option<HitboxSpec>,

    pub stuck_check_interval: f32,
    pub stuck_distance_threshold: f32,
    pub stuck_checks_to_trigger: u32,
    pub unstuck_duration: f32,
}

impl Default for EnemyArchetype {
    fn default() -> Self {
        Self {
            max_health: 30.0,
            move_speed: 80.0,
            body_radius: 10.0,
            attack_range: 40.0,
            attack_damage: 10.0,
            attack_cooldown: 1.0,
            hitbox_delay: 0.25,
            hitbox_active: 0.2,
            attack_duration: 0.6,
            hitbox: Some(HitboxSpec {
                shape: HitShape::Circle { radius: 24.0 },
                forward_offset: 20.0,
            }),
            stuck_check_interval: 0.5,
            stuck_distance_threshold: 4.0,
            stuck_checks_to_trigger: 3,
            unstuck_duration: 0.75,
        }
    }
}

impl EnemyArchetype {
    /// A quick melee chaser with a claw hitbox.
    pub fn ghoul() -> Self {
        Self::default()
    }

    /// Slow heavy hitter with no hitbox; damage is applied directly at
    /// the activation moment when the target is still in reach.
    pub fn brute() -> Self {
        Self {
            max_health: 90.0,
            move_speed: 45.0,
            body_radius: 16.0,
            attack_range: 48.0,
            attack_damage: 25.0,
            attack_cooldown: 1.8,
            hitbox_delay: 0.4,
            hitbox_active: 0.0,
            attack_duration: 1.0,
            hitbox: None,
            ..Self::default()
        }
    }
}

/// All spawnable enemy types, keyed by archetype name. Serialized as the
/// bare map, so a catalog file is just `{ "name": (...), ... }`.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnemyCatalog(pub HashMap<String, EnemyArchetype>);

impl Default for EnemyCatalog {
    fn default() -> Self {
        let mut types = HashMap::new();
        types.insert("ghoul".to_string(), EnemyArchetype::ghoul());
        types.insert("brute".to_string(), EnemyArchetype::brute());
        Self(types)
    }
}

impl EnemyCatalog {
    pub fn get(&self, kind: &str) -> Option<&EnemyArchetype> {
        self.0.get(kind)
    }
}
