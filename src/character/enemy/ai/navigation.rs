//! Steering toward the player with obstacle avoidance and 8-way heading
//! snapping.

use bevy::prelude::*;

use crate::arena::ObstacleMap;
use crate::character::enemy::Enemy;
use crate::character::{health::Dead, movement::Velocity, player::Player, CompassDir, Facing};
use crate::frame::FrameCount;

use super::state::{EnemyAiConfig, EnemyState};

/// How far ahead the avoidance ray probes.
pub const AVOID_LOOKAHEAD: f32 = 48.0;

/// Deflection probes, tried in priority order when the direct ray is
/// blocked. First clear probe wins; if all are blocked the original
/// direction is kept and the collision risk accepted.
pub const DEFLECTION_ANGLES_DEG: [f32; 6] = [45.0, -45.0, 90.0, -90.0, 135.0, -135.0];

/// Picks the steering direction around obstacles. Returns the desired
/// direction unchanged when the path is clear.
pub fn deflect_around_obstacles(obstacles: &ObstacleMap, origin: Vec2, desired: Vec2) -> Vec2 {
    if obstacles.is_clear(origin, desired, AVOID_LOOKAHEAD) {
        return desired;
    }
    for angle in DEFLECTION_ANGLES_DEG {
        let candidate = Vec2::from_angle(angle.to_radians()).rotate(desired);
        if obstacles.is_clear(origin, candidate, AVOID_LOOKAHEAD) {
            return candidate;
        }
    }
    desired
}

/// Per-tick navigation for every living enemy. Attacking enemies hold
/// still; recovering enemies hold their escape heading until the timer
/// runs out.
pub fn enemy_steering_system(
    frame: Res<FrameCount>,
    obstacles: Res<ObstacleMap>,
    players: Query<&Transform, (With<Player>, Without<Dead>, Without<Enemy>)>,
    mut enemies: Query<
        (
            &Transform,
            &mut Velocity,
            &mut EnemyState,
            &mut Facing,
            &EnemyAiConfig,
        ),
        (With<Enemy>, Without<Dead>),
    >,
) {
    let target_pos = players.iter().next().map(|t| t.translation.truncate());

    for (transform, mut velocity, mut state, mut facing, config) in enemies.iter_mut() {
        if state.is_attacking() {
            velocity.0 = Vec2::ZERO;
            continue;
        }

        if let EnemyState::Recovering { escape, until_frame } = *state {
            if frame.frame < until_frame {
                let heading = CompassDir::snap(escape);
                facing.0 = heading;
                velocity.0 = heading.vec() * config.move_speed;
                continue;
            }
            *state = EnemyState::Navigating;
        }

        // A missing target degrades to idle, not an error.
        let Some(target_pos) = target_pos else {
            velocity.0 = Vec2::ZERO;
            *state = EnemyState::Idle;
            continue;
        };

        let pos = transform.translation.truncate();
        let desired = (target_pos - pos).normalize_or_zero();
        if desired == Vec2::ZERO {
            velocity.0 = Vec2::ZERO;
            *state = EnemyState::Idle;
            continue;
        }

        let steered = deflect_around_obstacles(&obstacles, pos, desired);
        let heading = CompassDir::snap(steered);
        facing.0 = heading;
        velocity.0 = heading.vec() * config.move_speed;
        *state = EnemyState::Navigating;
    }
}
