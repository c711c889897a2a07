use bevy::prelude::*;

use crate::arena::ObstacleMap;
use crate::character::{health::Dead, BodyCollider};
use crate::frame::TICK_SECONDS;

/// Commanded velocity in world units per second.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Velocity(pub Vec2);

/// Fixed-step integration. Movement into an obstacle is blocked per axis,
/// so actors slide along walls instead of sticking to them.
pub fn apply_velocity_system(
    obstacles: Res<ObstacleMap>,
    mut movers: Query<(&mut Transform, &Velocity, &BodyCollider), Without<Dead>>,
) {
    for (mut transform, velocity, body) in movers.iter_mut() {
        if velocity.0 == Vec2::ZERO {
            continue;
        }
        let step = velocity.0 * TICK_SECONDS;
        let pos = transform.translation.truncate();

        let moved_x = Vec2::new(pos.x + step.x, pos.y);
        if step.x != 0.0 && !obstacles.circle_overlaps(moved_x, body.radius) {
            transform.translation.x = moved_x.x;
        }
        let x = transform.translation.x;
        let moved_y = Vec2::new(x, pos.y + step.y);
        if step.y != 0.0 && !obstacles.circle_overlaps(moved_y, body.radius) {
            transform.translation.y = moved_y.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Aabb;
    use pretty_assertions::assert_eq;

    fn test_app(obstacles: Vec<Aabb>) -> App {
        let mut app = App::new();
        app.insert_resource(ObstacleMap { obstacles });
        app.add_systems(Update, apply_velocity_system);
        app
    }

    #[test]
    fn moves_by_one_tick_worth_of_velocity() {
        let mut app = test_app(vec![]);
        let mover = app
            .world_mut()
            .spawn((
                Transform::default(),
                Velocity(Vec2::new(60.0, -120.0)),
                BodyCollider { radius: 8.0 },
            ))
            .id();

        app.update();

        let t = app.world().entity(mover).get::<Transform>().unwrap();
        assert_eq!(t.translation.x, 1.0);
        assert_eq!(t.translation.y, -2.0);
    }

    #[test]
    fn blocked_axis_stops_while_free_axis_slides() {
        // Wall directly to the right of the mover.
        let wall = Aabb::new(Vec2::new(10.0, -50.0), Vec2::new(20.0, 50.0));
        let mut app = test_app(vec![wall]);
        let mover = app
            .world_mut()
            .spawn((
                Transform::from_xyz(4.0, 0.0, 0.0),
                Velocity(Vec2::new(600.0, 600.0)),
                BodyCollider { radius: 5.0 },
            ))
            .id();

        app.update();

        let t = app.world().entity(mover).get::<Transform>().unwrap();
        assert_eq!(t.translation.x, 4.0, "x should be blocked by the wall");
        // One tick of 600 u/s is not exactly 10.0 in f32.
        assert!(
            (t.translation.y - 10.0).abs() < 1e-4,
            "y should slide freely, got {}",
            t.translation.y
        );
    }

    #[test]
    fn dead_actors_do_not_move() {
        let mut app = test_app(vec![]);
        let mover = app
            .world_mut()
            .spawn((
                Transform::default(),
                Velocity(Vec2::new(600.0, 0.0)),
                BodyCollider { radius: 8.0 },
                Dead,
            ))
            .id();

        app.update();

        let t = app.world().entity(mover).get::<Transform>().unwrap();
        assert_eq!(t.translation.x, 0.0);
    }
}
