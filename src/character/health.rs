//! Per-actor health state and the damage resolution pipeline.
//!
//! Damage sources never touch `Health` directly: they add into the
//! actor's `DamageAccumulator` during the tick, and one system resolves
//! the accumulated total, emits the observable events and performs the
//! one-shot death transition.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::character::{movement::Velocity, Faction};
use crate::frame::{secs_to_frames, FrameCount};
use crate::scheduler::{TaskKind, TaskQueue};

/// How long a dead actor lingers before the scheduler removes it.
pub const CORPSE_LINGER_SECS: f32 = 2.0;

#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
    dead: bool,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            dead: false,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn percentage(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }
}

/// Marker for actors that have died. Dead actors keep their entity around
/// until corpse cleanup but are excluded from AI, movement and collision.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

/// Damage gathered during the current tick, resolved once per tick.
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DamageAccumulator {
    pub total: f32,
    pub hits: u32,
}

impl DamageAccumulator {
    pub fn add(&mut self, amount: f32) {
        self.total += amount;
        self.hits += 1;
    }

    fn drain(&mut self) -> f32 {
        let total = self.total;
        self.total = 0.0;
        self.hits = 0;
        total
    }
}

/// External request to damage an actor (`Health.TakeDamage` surface).
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: f32,
}

/// External request to heal an actor (`Health.Heal` surface).
#[derive(Event, Debug, Clone, Copy)]
pub struct HealRequest {
    pub target: Entity,
    pub amount: f32,
}

/// Fired on every health mutation, dead actors excepted.
#[derive(Event, Debug, Clone, Copy)]
pub struct HealthChanged {
    pub actor: Entity,
    pub current: f32,
    pub max: f32,
}

/// Fired exactly once, when an actor's health reaches zero.
#[derive(Event, Debug, Clone, Copy)]
pub struct ActorDied {
    pub actor: Entity,
    pub faction: Faction,
}

/// Folds external damage requests into the per-actor accumulator. Dead
/// targets and stale entity ids are silently skipped.
pub fn queue_damage_requests(
    mut requests: EventReader<DamageRequest>,
    mut accumulators: Query<&mut DamageAccumulator, Without<Dead>>,
) {
    for request in requests.read() {
        if request.amount <= 0.0 {
            continue;
        }
        if let Ok(mut accumulator) = accumulators.get_mut(request.target) {
            accumulator.add(request.amount);
        }
    }
}

/// Resolves the tick's accumulated damage: clamps health at zero, emits
/// `HealthChanged`, and performs the one-shot death transition.
pub fn apply_accumulated_damage(
    mut commands: Commands,
    frame: Res<FrameCount>,
    mut task_queue: ResMut<TaskQueue>,
    mut actors: Query<
        (
            Entity,
            &mut Health,
            &mut DamageAccumulator,
            &Faction,
            Option<&mut Velocity>,
        ),
        Without<Dead>,
    >,
    mut health_events: EventWriter<HealthChanged>,
    mut death_events: EventWriter<ActorDied>,
) {
    for (entity, mut health, mut accumulator, faction, velocity) in actors.iter_mut() {
        if accumulator.total <= 0.0 {
            continue;
        }
        let damage = accumulator.drain();
        health.current = (health.current - damage).max(0.0);
        health_events.write(HealthChanged {
            actor: entity,
            current: health.current,
            max: health.max,
        });

        if health.current > 0.0 {
            continue;
        }

        // Death happens exactly once; the Dead marker keeps every later
        // tick out of this branch.
        health.dead = true;
        commands.entity(entity).insert(Dead);
        if let Some(mut velocity) = velocity {
            velocity.0 = Vec2::ZERO;
        }
        task_queue.cancel_for(entity);
        task_queue.schedule_in(
            frame.frame,
            secs_to_frames(CORPSE_LINGER_SECS),
            entity,
            TaskKind::RemoveCorpse,
        );
        death_events.write(ActorDied {
            actor: entity,
            faction: *faction,
        });
        info!("f={} actor {:?} ({:?}) died", frame.frame, entity, faction);
    }
}

/// Applies heal requests, clamped at max health. No-op for dead actors.
pub fn apply_heal_requests(
    mut requests: EventReader<HealRequest>,
    mut actors: Query<(Entity, &mut Health), Without<Dead>>,
    mut health_events: EventWriter<HealthChanged>,
) {
    for request in requests.read() {
        if request.amount <= 0.0 {
            continue;
        }
        if let Ok((entity, mut health)) = actors.get_mut(request.target) {
            health.current = (health.current + request.amount).min(health.max);
            health_events.write(HealthChanged {
                actor: entity,
                current: health.current,
                max: health.max,
            });
        }
    }
}
