//! Frame-counted one-shot task queue.
//!
//! Systems push tasks due at an absolute frame; `run_scheduled_tasks`
//! drains everything due at the start of the tick, in (due frame, id)
//! order so same-frame tasks fire in scheduling order. The owning entity
//! is the cancellation token: death or despawn cancels by actor.

use bevy::prelude::*;

use crate::character::enemy::ai::{EnemyAiConfig, EnemyState};
use crate::character::enemy::Enemy;
use crate::character::{
    health::{DamageAccumulator, Dead},
    player::Player,
};
use crate::combat::hitbox::AttackHitbox;
use crate::frame::FrameCount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Open the actor's hitbox window, or apply direct contact damage
    /// for hitbox-less attackers.
    ActivateHitbox,
    /// Close the actor's hitbox window.
    DeactivateHitbox,
    /// Return the actor from `Attacking` to `Navigating`.
    EndAttack,
    /// Despawn a lingering corpse.
    RemoveCorpse,
}

#[derive(Debug, Clone, Copy)]
pub struct ScheduledTask {
    pub id: u64,
    pub due_frame: u32,
    pub actor: Entity,
    pub kind: TaskKind,
}

#[derive(Resource, Debug, Default)]
pub struct TaskQueue {
    tasks: Vec<ScheduledTask>,
    next_id: u64,
}

impl TaskQueue {
    /// Schedules `kind` for `actor`, `delay_frames` from `now`. A zero
    /// delay fires on the next drain.
    pub fn schedule_in(
        &mut self,
        now: u32,
        delay_frames: u32,
        actor: Entity,
        kind: TaskKind,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            due_frame: now + delay_frames,
            actor,
            kind,
        });
        id
    }

    /// Drops every pending task owned by `actor`.
    pub fn cancel_for(&mut self, actor: Entity) {
        self.tasks.retain(|task| task.actor != actor);
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn has_pending_for(&self, actor: Entity) -> bool {
        self.tasks.iter().any(|task| task.actor == actor)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Removes and returns every task due at or before `frame`, ordered
    /// by (due frame, id).
    pub fn drain_due(&mut self, frame: u32) -> Vec<ScheduledTask> {
        let mut due = Vec::new();
        self.tasks.retain(|task| {
            if task.due_frame <= frame {
                due.push(*task);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|task| (task.due_frame, task.id));
        due
    }
}

/// Drains and executes due tasks. Tasks whose actor has despawned, died,
/// or left the expected state are dropped silently; a cancelled attack
/// must not fire its hitbox.
pub fn run_scheduled_tasks(
    mut commands: Commands,
    frame: Res<FrameCount>,
    mut task_queue: ResMut<TaskQueue>,
    alive: Query<(), Without<Dead>>,
    mut enemies: Query<(&Transform, &mut EnemyState, &EnemyAiConfig), With<Enemy>>,
    mut hitboxes: Query<&mut AttackHitbox>,
    mut players: Query<(&Transform, &mut DamageAccumulator), (With<Player>, Without<Dead>)>,
) {
    for task in task_queue.drain_due(frame.frame) {
        match task.kind {
            TaskKind::RemoveCorpse => {
                debug!("f={} removing corpse {:?}", frame.frame, task.actor);
                commands.entity(task.actor).try_despawn();
            }
            TaskKind::ActivateHitbox => {
                if alive.get(task.actor).is_err() {
                    continue;
                }
                let Ok((transform, state, config)) = enemies.get_mut(task.actor) else {
                    continue;
                };
                if !state.is_attacking() {
                    continue;
                }
                if let Ok(mut hitbox) = hitboxes.get_mut(task.actor) {
                    hitbox.activate();
                    trace!("f={} hitbox of {:?} activated", frame.frame, task.actor);
                } else {
                    // Direct contact damage: lands only if the target is
                    // still within the range that gated the attack.
                    let origin = transform.translation.truncate();
                    for (player_transform, mut accumulator) in players.iter_mut() {
                        let distance =
                            origin.distance(player_transform.translation.truncate());
                        if distance <= config.attack_range {
                            accumulator.add(config.attack_damage);
                            trace!(
                                "f={} direct hit by {:?} for {}",
                                frame.frame,
                                task.actor,
                                config.attack_damage
                            );
                        }
                    }
                }
            }
            TaskKind::DeactivateHitbox => {
                if let Ok(mut hitbox) = hitboxes.get_mut(task.actor) {
                    hitbox.deactivate();
                }
            }
            TaskKind::EndAttack => {
                if alive.get(task.actor).is_err() {
                    continue;
                }
                if let Ok((_, mut state, _)) = enemies.get_mut(task.actor) {
                    if state.is_attacking() {
                        *state = EnemyState::Navigating;
                    }
                }
            }
        }
    }
}
