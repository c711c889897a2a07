//! Headless combat simulation core for a top-down wave-survival game.
//!
//! Everything advances on a fixed 60 Hz tick driven by [`frame::FrameCount`];
//! the host calls `App::update` once per tick. Presentation sits entirely
//! outside: it reads the events this crate emits and never writes core
//! state except through [`waves::WaveCommand`] and the health request
//! events.

pub mod arena;
pub mod character;
pub mod combat;
pub mod config;
pub mod frame;
pub mod logs;
pub mod rng;
pub mod scheduler;
pub mod system_set;
pub mod waves;

use bevy::prelude::*;

use crate::arena::{ObstacleMap, SpawnAreas};
use crate::character::enemy::ai::{
    enemy_attack_system, enemy_steering_system, stuck_detection_system,
};
use crate::character::enemy::catalog::EnemyCatalog;
use crate::character::health::{
    apply_accumulated_damage, apply_heal_requests, queue_damage_requests, ActorDied,
    DamageRequest, HealRequest, HealthChanged,
};
use crate::character::movement::apply_velocity_system;
use crate::combat::hitbox::hitbox_overlap_system;
use crate::frame::{increase_frame_system, FrameCount};
use crate::rng::SimRng;
use crate::scheduler::{run_scheduled_tasks, TaskQueue};
use crate::system_set::SimSet;
use crate::waves::{
    roster_tracking_system, wave_command_system, wave_director_system, wave_spawning_system,
    AllWavesComplete, EnemyCountChanged, WaveCommand, WaveCompleted, WaveConfig, WaveStarted,
    WaveState,
};

/// The whole simulation core as one plugin. Hosts override the config
/// resources (wave list, enemy catalog, arena, rng seed) by inserting
/// them before this plugin or right after adding it.
pub struct CombatSimPlugin;

impl Plugin for CombatSimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameCount>()
            .init_resource::<TaskQueue>()
            .init_resource::<SimRng>()
            .init_resource::<ObstacleMap>()
            .init_resource::<SpawnAreas>()
            .init_resource::<EnemyCatalog>()
            .init_resource::<WaveConfig>()
            .insert_resource(WaveState::new());

        app.add_event::<DamageRequest>()
            .add_event::<HealRequest>()
            .add_event::<HealthChanged>()
            .add_event::<ActorDied>()
            .add_event::<WaveCommand>()
            .add_event::<WaveStarted>()
            .add_event::<WaveCompleted>()
            .add_event::<AllWavesComplete>()
            .add_event::<EnemyCountChanged>();

        app.configure_sets(
            Update,
            (
                SimSet::Tasks,
                SimSet::EnemyAi,
                SimSet::Movement,
                SimSet::CollisionDamage,
                SimSet::DeathManagement,
                SimSet::WaveDirector,
                SimSet::FrameCounter,
            )
                .chain(),
        );

        app.add_systems(Update, run_scheduled_tasks.in_set(SimSet::Tasks))
            .add_systems(
                Update,
                (
                    stuck_detection_system,
                    enemy_steering_system,
                    enemy_attack_system,
                )
                    .chain()
                    .in_set(SimSet::EnemyAi),
            )
            .add_systems(Update, apply_velocity_system.in_set(SimSet::Movement))
            .add_systems(
                Update,
                hitbox_overlap_system.in_set(SimSet::CollisionDamage),
            )
            .add_systems(
                Update,
                (
                    queue_damage_requests,
                    apply_accumulated_damage,
                    apply_heal_requests,
                )
                    .chain()
                    .in_set(SimSet::DeathManagement),
            )
            .add_systems(
                Update,
                (
                    roster_tracking_system,
                    wave_director_system,
                    wave_command_system,
                    wave_spawning_system,
                )
                    .chain()
                    .in_set(SimSet::WaveDirector),
            )
            .add_systems(Update, increase_frame_system.in_set(SimSet::FrameCounter));
    }
}
