//! Stuck detection and escape.
//!
//! Every `stuck_check_interval` the tracker compares actual displacement
//! against commanded motion. Too little progress for too many consecutive
//! checks flips the enemy into `Recovering` with an escape heading picked
//! from a fixed priority list (left perpendicular, right perpendicular,
//! reverse, random); the first raycast-clear candidate wins.

use bevy::prelude::*;

use crate::arena::ObstacleMap;
use crate::character::enemy::Enemy;
use crate::character::{health::Dead, movement::Velocity};
use crate::frame::FrameCount;
use crate::rng::SimRng;

use super::navigation::AVOID_LOOKAHEAD;
use super::state::{EnemyAiConfig, EnemyState, StuckTracker};

/// Picks the first raycast-clear escape direction; falls back to the
/// random candidate when everything is blocked.
pub fn pick_escape_direction(
    obstacles: &ObstacleMap,
    origin: Vec2,
    commanded: Vec2,
    rng: &mut SimRng,
) -> Vec2 {
    let random = rng.unit_vec();
    let candidates = [
        commanded.perp(),  // left perpendicular
        -commanded.perp(), // right perpendicular
        -commanded,        // reverse
        random,
    ];
    for candidate in candidates {
        if obstacles.is_clear(origin, candidate, AVOID_LOOKAHEAD) {
            return candidate;
        }
    }
    random
}

pub fn stuck_detection_system(
    frame: Res<FrameCount>,
    obstacles: Res<ObstacleMap>,
    mut rng: ResMut<SimRng>,
    mut enemies: Query<
        (
            Entity,
            &Transform,
            &Velocity,
            &mut EnemyState,
            &mut StuckTracker,
            &EnemyAiConfig,
        ),
        (With<Enemy>, Without<Dead>),
    >,
) {
    for (entity, transform, velocity, mut state, mut tracker, config) in enemies.iter_mut() {
        // Checks are skipped while attacking or already escaping; the
        // tracker restarts from the current position afterwards.
        if state.is_attacking() || state.is_recovering() {
            tracker.last_check_frame = frame.frame;
            tracker.last_pos = transform.translation.truncate();
            tracker.consecutive = 0;
            continue;
        }

        if frame.frame.saturating_sub(tracker.last_check_frame)
            < config.stuck_check_interval_frames
        {
            continue;
        }

        let pos = transform.translation.truncate();
        let displacement = pos.distance(tracker.last_pos);
        let commanded = velocity.0;
        let moving_commanded = commanded.length_squared() > f32::EPSILON;

        if moving_commanded && displacement < config.stuck_distance_threshold {
            tracker.consecutive += 1;
        } else {
            tracker.consecutive = 0;
        }
        tracker.last_check_frame = frame.frame;
        tracker.last_pos = pos;

        if tracker.consecutive >= config.stuck_checks_to_trigger {
            tracker.consecutive = 0;
            let escape = pick_escape_direction(
                &obstacles,
                pos,
                commanded.normalize_or_zero(),
                &mut rng,
            );
            *state = EnemyState::Recovering {
                escape,
                until_frame: frame.frame + config.unstuck_duration_frames,
            };
            info!(
                "f={} enemy {:?} stuck at {:?}, escaping toward {:?}",
                frame.frame, entity, pos, escape
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Aabb;
    use crate::character::enemy::catalog::EnemyArchetype;
    use crate::character::Facing;
    use crate::frame::increase_frame_system;
    use pretty_assertions::assert_eq;

    #[test]
    fn left_perpendicular_wins_when_clear() {
        let map = ObstacleMap::default();
        let mut rng = SimRng::seeded(1);
        let escape = pick_escape_direction(&map, Vec2::ZERO, Vec2::X, &mut rng);
        assert_eq!(escape, Vec2::X.perp());
    }

    #[test]
    fn blocked_candidates_fall_through_in_priority_order() {
        // Block left perpendicular (up); right perpendicular (down) wins.
        let map = ObstacleMap {
            obstacles: vec![Aabb::new(Vec2::new(-5.0, 10.0), Vec2::new(5.0, 30.0))],
        };
        let mut rng = SimRng::seeded(1);
        let escape = pick_escape_direction(&map, Vec2::ZERO, Vec2::X, &mut rng);
        assert_eq!(escape, -Vec2::X.perp());
    }

    fn stuck_test_app() -> (App, Entity) {
        let mut app = App::new();
        app.init_resource::<FrameCount>();
        app.init_resource::<ObstacleMap>();
        app.insert_resource(SimRng::seeded(3));
        app.add_systems(Update, (stuck_detection_system, increase_frame_system).chain());

        let mut archetype = EnemyArchetype::ghoul();
        archetype.stuck_check_interval = 0.1; // 6 frames
        archetype.stuck_checks_to_trigger = 2;
        let enemy = app
            .world_mut()
            .spawn((
                Enemy,
                Transform::default(),
                // Commanded motion but (with no movement system in this
                // app) zero actual displacement: a textbook stuck enemy.
                Velocity(Vec2::new(80.0, 0.0)),
                EnemyState::Navigating,
                Facing::default(),
                StuckTracker::new(Vec2::ZERO),
                EnemyAiConfig::from_archetype(&archetype),
            ))
            .id();
        (app, enemy)
    }

    #[test]
    fn repeated_zero_displacement_triggers_recovery() {
        let (mut app, enemy) = stuck_test_app();

        // Two check intervals (6 frames each) must elapse.
        for _ in 0..13 {
            app.update();
        }

        let state = app.world().entity(enemy).get::<EnemyState>().unwrap();
        assert!(state.is_recovering(), "state was {state:?}");
    }

    #[test]
    fn uncommanded_standstill_is_not_stuck() {
        let (mut app, enemy) = stuck_test_app();
        app.world_mut()
            .entity_mut(enemy)
            .insert(Velocity(Vec2::ZERO));

        for _ in 0..30 {
            app.update();
        }

        let state = app.world().entity(enemy).get::<EnemyState>().unwrap();
        assert!(!state.is_recovering(), "state was {state:?}");
    }
}
