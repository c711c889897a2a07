//! Per-enemy state machine data. All of it is owned by the enemy entity
//! and mutated only by the AI systems for that entity's tick.

use bevy::prelude::*;

use crate::character::enemy::catalog::EnemyArchetype;
use crate::frame::secs_to_frames;

/// The two attack animation variants presentation listeners can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackVariant {
    Slash,
    Lunge,
}

#[derive(Component, Debug, Clone, PartialEq, Default)]
pub enum EnemyState {
    /// No target, or nothing to do.
    #[default]
    Idle,
    /// Steering toward the target.
    Navigating,
    /// Mid-attack; navigation is suppressed until the attack-end task.
    Attacking {
        variant: AttackVariant,
        started_frame: u32,
    },
    /// Stuck-escape: hold `escape` until `until_frame`, then resume.
    Recovering { escape: Vec2, until_frame: u32 },
}

impl EnemyState {
    pub fn is_attacking(&self) -> bool {
        matches!(self, EnemyState::Attacking { .. })
    }

    pub fn is_recovering(&self) -> bool {
        matches!(self, EnemyState::Recovering { .. })
    }
}

/// Attack cooldown bookkeeping, kept outside `EnemyState` so the cooldown
/// survives state transitions.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AttackState {
    pub last_attack_frame: Option<u32>,
}

impl AttackState {
    pub fn can_attack(&self, frame: u32, cooldown_frames: u32) -> bool {
        self.last_attack_frame
            .map_or(true, |last| frame.saturating_sub(last) >= cooldown_frames)
    }
}

/// Displacement bookkeeping for stuck detection.
#[derive(Component, Debug, Clone, Copy)]
pub struct StuckTracker {
    pub last_check_frame: u32,
    pub last_pos: Vec2,
    pub consecutive: u32,
}

impl StuckTracker {
    pub fn new(pos: Vec2) -> Self {
        Self {
            last_check_frame: 0,
            last_pos: pos,
            consecutive: 0,
        }
    }
}

/// Runtime AI tunables stamped from an archetype at spawn, with all
/// timings pre-converted to frames.
#[derive(Component, Debug, Clone)]
pub struct EnemyAiConfig {
    pub move_speed: f32,
    pub attack_range: f32,
    pub attack_damage: f32,
    pub attack_cooldown_frames: u32,
    pub hitbox_delay_frames: u32,
    pub hitbox_active_frames: u32,
    pub attack_duration_frames: u32,
    pub stuck_check_interval_frames: u32,
    pub stuck_distance_threshold: f32,
    pub stuck_checks_to_trigger: u32,
    pub unstuck_duration_frames: u32,
}

impl EnemyAiConfig {
    pub fn from_archetype(archetype: &EnemyArchetype) -> Self {
        Self {
            move_speed: archetype.move_speed,
            attack_range: archetype.attack_range,
            attack_damage: archetype.attack_damage,
            attack_cooldown_frames: secs_to_frames(archetype.attack_cooldown),
            hitbox_delay_frames: secs_to_frames(archetype.hitbox_delay),
            hitbox_active_frames: secs_to_frames(archetype.hitbox_active),
            attack_duration_frames: secs_to_frames(archetype.attack_duration),
            stuck_check_interval_frames: secs_to_frames(archetype.stuck_check_interval),
            stuck_distance_threshold: archetype.stuck_distance_threshold,
            stuck_checks_to_trigger: archetype.stuck_checks_to_trigger,
            unstuck_duration_frames: secs_to_frames(archetype.unstuck_duration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cooldown_gates_until_elapsed() {
        let mut attack = AttackState::default();
        assert!(attack.can_attack(0, 90));

        attack.last_attack_frame = Some(10);
        assert!(!attack.can_attack(10, 90));
        assert!(!attack.can_attack(99, 90));
        assert!(attack.can_attack(100, 90));
    }

    #[test]
    fn archetype_times_convert_to_frames() {
        let config = EnemyAiConfig::from_archetype(&EnemyArchetype::ghoul());
        assert_eq!(config.attack_cooldown_frames, 60);
        assert_eq!(config.hitbox_delay_frames, 15);
        assert_eq!(config.attack_duration_frames, 36);
    }
}
