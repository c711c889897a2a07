//! Attack decision: range check, cooldown gate, and the timed task chain
//! that drives a committed attack to completion.

use bevy::prelude::*;

use crate::character::enemy::Enemy;
use crate::character::{health::Dead, movement::Velocity, player::Player};
use crate::combat::hitbox::AttackHitbox;
use crate::frame::FrameCount;
use crate::rng::SimRng;
use crate::scheduler::{TaskKind, TaskQueue};

use super::state::{AttackState, AttackVariant, EnemyAiConfig, EnemyState};

/// Starts attacks for enemies in reach of the player. An attack commits
/// the enemy: the scheduler finishes it, steering holds still, and the
/// cooldown starts at the swing, not at its end.
pub fn enemy_attack_system(
    frame: Res<FrameCount>,
    mut task_queue: ResMut<TaskQueue>,
    mut rng: ResMut<SimRng>,
    players: Query<&Transform, (With<Player>, Without<Dead>, Without<Enemy>)>,
    mut enemies: Query<
        (
            Entity,
            &Transform,
            &mut Velocity,
            &mut EnemyState,
            &mut AttackState,
            &EnemyAiConfig,
            Option<&AttackHitbox>,
        ),
        (With<Enemy>, Without<Dead>),
    >,
) {
    let Some(target_pos) = players.iter().next().map(|t| t.translation.truncate()) else {
        return;
    };

    for (entity, transform, mut velocity, mut state, mut attack, config, hitbox) in
        enemies.iter_mut()
    {
        // Only decide from a neutral state; attacks and escapes run out.
        if state.is_attacking() || state.is_recovering() {
            continue;
        }
        if !attack.can_attack(frame.frame, config.attack_cooldown_frames) {
            continue;
        }

        let reach = hitbox
            .map(AttackHitbox::strike_reach)
            .unwrap_or(config.attack_range);
        let pos = transform.translation.truncate();
        if pos.distance(target_pos) > reach {
            continue;
        }

        let variant = if rng.coin() {
            AttackVariant::Slash
        } else {
            AttackVariant::Lunge
        };
        velocity.0 = Vec2::ZERO;
        *state = EnemyState::Attacking {
            variant,
            started_frame: frame.frame,
        };
        attack.last_attack_frame = Some(frame.frame);

        task_queue.schedule_in(
            frame.frame,
            config.hitbox_delay_frames,
            entity,
            TaskKind::ActivateHitbox,
        );
        task_queue.schedule_in(
            frame.frame,
            config.hitbox_delay_frames + config.hitbox_active_frames,
            entity,
            TaskKind::DeactivateHitbox,
        );
        task_queue.schedule_in(
            frame.frame,
            config.attack_duration_frames,
            entity,
            TaskKind::EndAttack,
        );
        debug!(
            "f={} enemy {:?} starts {:?} attack",
            frame.frame, entity, variant
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::enemy::catalog::EnemyArchetype;
    use crate::character::{Facing, Faction};
    use crate::frame::increase_frame_system;
    use pretty_assertions::assert_eq;

    fn test_app() -> App {
        let mut app = App::new();
        app.init_resource::<FrameCount>();
        app.init_resource::<TaskQueue>();
        app.insert_resource(SimRng::seeded(7));
        app.add_systems(Update, (enemy_attack_system, increase_frame_system).chain());
        app.world_mut()
            .spawn((Player, Transform::default()));
        app
    }

    fn spawn_ghoul(app: &mut App, x: f32) -> Entity {
        let archetype = EnemyArchetype::ghoul();
        let spec = archetype.hitbox.clone().unwrap();
        app.world_mut()
            .spawn((
                Enemy,
                Transform::from_xyz(x, 0.0, 0.0),
                Velocity(Vec2::new(-80.0, 0.0)),
                Facing::default(),
                EnemyState::Navigating,
                AttackState::default(),
                EnemyAiConfig::from_archetype(&archetype),
                AttackHitbox::new(
                    Faction::Enemy,
                    archetype.attack_damage,
                    spec.shape,
                    spec.forward_offset,
                ),
            ))
            .id()
    }

    #[test]
    fn in_reach_enemy_commits_to_an_attack() {
        let mut app = test_app();
        // Ghoul strike reach is 20 + 24 = 44.
        let enemy = spawn_ghoul(&mut app, 40.0);

        app.update();

        let world = app.world();
        assert!(world.entity(enemy).get::<EnemyState>().unwrap().is_attacking());
        assert_eq!(world.entity(enemy).get::<Velocity>().unwrap().0, Vec2::ZERO);
        // Activation, deactivation and attack-end are all booked.
        assert_eq!(world.resource::<TaskQueue>().len(), 3);
    }

    #[test]
    fn out_of_reach_enemy_keeps_navigating() {
        let mut app = test_app();
        let enemy = spawn_ghoul(&mut app, 60.0);

        app.update();

        assert!(!app
            .world()
            .entity(enemy)
            .get::<EnemyState>()
            .unwrap()
            .is_attacking());
        assert!(app.world().resource::<TaskQueue>().is_empty());
    }

    #[test]
    fn cooldown_blocks_an_immediate_second_attack() {
        let mut app = test_app();
        let enemy = spawn_ghoul(&mut app, 40.0);

        app.update();
        // End the attack early; the cooldown still holds.
        app.world_mut()
            .entity_mut(enemy)
            .insert(EnemyState::Navigating);
        app.update();

        let attack = app.world().entity(enemy).get::<AttackState>().unwrap();
        assert_eq!(attack.last_attack_frame, Some(0));
        assert!(!app
            .world()
            .entity(enemy)
            .get::<EnemyState>()
            .unwrap()
            .is_attacking());
    }

    #[test]
    fn hitboxless_enemy_uses_attack_range() {
        let mut app = test_app();
        let archetype = EnemyArchetype::brute();
        let enemy = app
            .world_mut()
            .spawn((
                Enemy,
                Transform::from_xyz(46.0, 0.0, 0.0),
                Velocity::default(),
                Facing::default(),
                EnemyState::Navigating,
                AttackState::default(),
                EnemyAiConfig::from_archetype(&archetype),
            ))
            .id();

        app.update();

        assert!(app
            .world()
            .entity(enemy)
            .get::<EnemyState>()
            .unwrap()
            .is_attacking());
        assert_eq!(app.world().resource::<TaskQueue>().len(), 3);
        assert!(app.world().resource::<TaskQueue>().has_pending_for(enemy));
    }
}
