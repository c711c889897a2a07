//! Faction-filtered attack hitboxes.
//!
//! A hitbox is a trigger volume attached to an actor, pushed out along its
//! facing. The scheduler toggles `active` for the attack's activation
//! window; while active, each opposing-faction actor it overlaps takes the
//! configured damage at most once per activation.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::character::{
    health::{DamageAccumulator, Dead},
    BodyCollider, Facing, Faction,
};
use crate::frame::FrameCount;

/// Hitbox volume. Rectangles stay axis-aligned, matching the coarse
/// collision model of the rest of the simulation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum HitShape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

impl HitShape {
    /// Radius of the smallest circle containing the shape, used for the
    /// strike-reach derivation.
    pub fn bounding_radius(self) -> f32 {
        match self {
            HitShape::Circle { radius } => radius,
            HitShape::Rect { width, height } => Vec2::new(width, height).length() * 0.5,
        }
    }

    /// Overlap test against a body circle.
    pub fn overlaps_circle(self, center: Vec2, other_center: Vec2, other_radius: f32) -> bool {
        match self {
            HitShape::Circle { radius } => {
                let combined = radius + other_radius;
                center.distance_squared(other_center) < combined * combined
            }
            HitShape::Rect { width, height } => {
                let half = Vec2::new(width, height) * 0.5;
                let closest = other_center.clamp(center - half, center + half);
                closest.distance_squared(other_center) < other_radius * other_radius
            }
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct AttackHitbox {
    pub faction: Faction,
    pub damage: f32,
    pub shape: HitShape,
    /// Distance from the owner's center along its facing.
    pub forward_offset: f32,
    pub active: bool,
    /// Targets already hit during the current activation window.
    hit_entities: Vec<Entity>,
}

impl AttackHitbox {
    pub fn new(faction: Faction, damage: f32, shape: HitShape, forward_offset: f32) -> Self {
        Self {
            faction,
            damage,
            shape,
            forward_offset,
            active: false,
            hit_entities: Vec::new(),
        }
    }

    /// Begin an activation window; previous hits no longer count.
    pub fn activate(&mut self) {
        self.active = true;
        self.hit_entities.clear();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn has_hit(&self, target: Entity) -> bool {
        self.hit_entities.contains(&target)
    }

    /// Effective attack radius derived from the hitbox geometry.
    pub fn strike_reach(&self) -> f32 {
        self.forward_offset + self.shape.bounding_radius()
    }
}

/// Applies hitbox damage. Runs after movement so positions are settled for
/// the tick; damage flows through the accumulator pipeline.
pub fn hitbox_overlap_system(
    frame: Res<FrameCount>,
    mut hitboxes: Query<(Entity, &mut AttackHitbox, &Transform, &Facing), Without<Dead>>,
    mut targets: Query<
        (Entity, &Transform, &BodyCollider, &Faction, &mut DamageAccumulator),
        Without<Dead>,
    >,
) {
    for (owner, mut hitbox, owner_transform, facing) in hitboxes.iter_mut() {
        if !hitbox.active {
            continue;
        }
        let center = owner_transform.translation.truncate() + facing.0.vec() * hitbox.forward_offset;

        for (target, target_transform, body, faction, mut accumulator) in targets.iter_mut() {
            // Faction filter doubles as a self-hit guard.
            if !hitbox.faction.is_hostile_to(*faction) {
                continue;
            }
            if hitbox.has_hit(target) {
                continue;
            }
            let target_center = target_transform.translation.truncate();
            if hitbox
                .shape
                .overlaps_circle(center, target_center, body.radius)
            {
                hitbox.hit_entities.push(target);
                accumulator.add(hitbox.damage);
                trace!(
                    "f={} hitbox of {:?} hit {:?} for {}",
                    frame.frame,
                    owner,
                    target,
                    hitbox.damage
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CompassDir;
    use pretty_assertions::assert_eq;

    fn test_app() -> App {
        let mut app = App::new();
        app.init_resource::<FrameCount>();
        app.add_systems(Update, hitbox_overlap_system);
        app
    }

    fn spawn_attacker(app: &mut App, faction: Faction, active: bool) -> Entity {
        let mut hitbox = AttackHitbox::new(faction, 10.0, HitShape::Circle { radius: 20.0 }, 15.0);
        if active {
            hitbox.activate();
        }
        app.world_mut()
            .spawn((hitbox, Transform::default(), Facing(CompassDir::Right)))
            .id()
    }

    fn spawn_victim(app: &mut App, faction: Faction, x: f32) -> Entity {
        app.world_mut()
            .spawn((
                Transform::from_xyz(x, 0.0, 0.0),
                BodyCollider { radius: 10.0 },
                faction,
                DamageAccumulator::default(),
            ))
            .id()
    }

    fn accumulated(app: &App, e: Entity) -> f32 {
        app.world()
            .entity(e)
            .get::<DamageAccumulator>()
            .unwrap()
            .total
    }

    #[test]
    fn active_hitbox_damages_opposing_faction_once() {
        let mut app = test_app();
        spawn_attacker(&mut app, Faction::Enemy, true);
        let victim = spawn_victim(&mut app, Faction::Player, 30.0);

        app.update();
        assert_eq!(accumulated(&app, victim), 10.0);

        // Still overlapping next tick, same activation: no double hit.
        app.update();
        assert_eq!(accumulated(&app, victim), 10.0);
    }

    #[test]
    fn inactive_hitbox_does_nothing() {
        let mut app = test_app();
        spawn_attacker(&mut app, Faction::Enemy, false);
        let victim = spawn_victim(&mut app, Faction::Player, 30.0);

        app.update();
        assert_eq!(accumulated(&app, victim), 0.0);
    }

    #[test]
    fn same_faction_is_filtered() {
        let mut app = test_app();
        spawn_attacker(&mut app, Faction::Enemy, true);
        let ally = spawn_victim(&mut app, Faction::Enemy, 30.0);

        app.update();
        assert_eq!(accumulated(&app, ally), 0.0);
    }

    #[test]
    fn out_of_reach_target_is_missed() {
        let mut app = test_app();
        spawn_attacker(&mut app, Faction::Enemy, true);
        // Hitbox center is at x=15 with radius 20; victim body radius 10.
        let victim = spawn_victim(&mut app, Faction::Player, 50.0);

        app.update();
        assert_eq!(accumulated(&app, victim), 0.0);
    }

    #[test]
    fn reactivation_allows_a_second_hit() {
        let mut app = test_app();
        let attacker = spawn_attacker(&mut app, Faction::Enemy, true);
        let victim = spawn_victim(&mut app, Faction::Player, 30.0);

        app.update();
        let mut hitbox = app
            .world_mut()
            .entity_mut(attacker)
            .take::<AttackHitbox>()
            .unwrap();
        hitbox.deactivate();
        hitbox.activate();
        app.world_mut().entity_mut(attacker).insert(hitbox);

        app.update();
        assert_eq!(accumulated(&app, victim), 20.0);
    }

    #[test]
    fn strike_reach_derives_from_shape() {
        let circle = AttackHitbox::new(
            Faction::Enemy,
            1.0,
            HitShape::Circle { radius: 24.0 },
            20.0,
        );
        assert_eq!(circle.strike_reach(), 44.0);

        let rect = AttackHitbox::new(
            Faction::Enemy,
            1.0,
            HitShape::Rect {
                width: 30.0,
                height: 40.0,
            },
            0.0,
        );
        assert_eq!(rect.strike_reach(), 25.0);
    }
}
