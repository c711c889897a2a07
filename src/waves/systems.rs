//! Wave sequencing: delay, cadence spawning, clearance, looping.

use bevy::prelude::*;

use crate::arena::SpawnAreas;
use crate::character::enemy::{catalog::EnemyCatalog, create::spawn_enemy};
use crate::frame::{secs_to_frames, FrameCount};
use crate::rng::SimRng;
use crate::scheduler::TaskQueue;

use super::config::WaveConfig;
use super::state::{
    AllWavesComplete, EnemyCountChanged, WaveCommand, WaveCompleted, WavePhase, WaveStarted,
    WaveState,
};
use super::tracking::WaveEnemy;

/// Advances to the next wave, or halts/loops past the last one. Rejected
/// while the current wave is still spawning.
fn try_start_next(
    config: &WaveConfig,
    state: &mut WaveState,
    frame: u32,
    all_complete: &mut EventWriter<AllWavesComplete>,
) -> bool {
    state.started_once = true;
    if state.phase == WavePhase::Spawning {
        warn!(
            "f={} start-next rejected: wave {} is still spawning",
            frame,
            state.current_wave_number()
        );
        return false;
    }

    let mut next = state.current_wave_index + 1;
    if next as usize >= config.waves.len() {
        if config.loop_waves && !config.waves.is_empty() {
            next = 0;
        } else {
            if state.phase != WavePhase::AllComplete {
                all_complete.write(AllWavesComplete);
                info!("f={} all waves complete", frame);
            }
            state.phase = WavePhase::AllComplete;
            return false;
        }
    }

    state.current_wave_index = next;
    let wave = &config.waves[next as usize];
    let delay_frames = if state.first_wave_pending {
        state.first_wave_pending = false;
        0
    } else {
        secs_to_frames(wave.delay_before_wave)
    };
    state.delay_until_frame = frame + delay_frames;
    state.phase = WavePhase::DelayingBeforeWave;
    info!(
        "f={} wave {} '{}' queued, starting in {} frames",
        frame,
        state.current_wave_number(),
        wave.name,
        delay_frames
    );
    true
}

/// Opens the selected wave: fixes the enemy total, fires `WaveStarted`,
/// and either begins spawning or, for an empty wave, completes on the
/// spot and advances.
fn begin_wave(
    config: &WaveConfig,
    state: &mut WaveState,
    frame: u32,
    started: &mut EventWriter<WaveStarted>,
    completed: &mut EventWriter<WaveCompleted>,
    all_complete: &mut EventWriter<AllWavesComplete>,
) {
    let wave = &config.waves[state.current_wave_index as usize];
    let total = wave.enemy_total();
    state.roster.clear();
    state.wave_enemy_total = total;
    state.spawned_this_wave = 0;
    state.entry_index = 0;
    state.spawned_in_entry = 0;

    let number = state.current_wave_number();
    started.write(WaveStarted {
        wave_number: number,
    });
    info!(
        "f={} wave {} '{}' started, {} enemies inbound",
        frame, number, wave.name, total
    );

    if total == 0 {
        completed.write(WaveCompleted {
            wave_number: number,
        });
        try_start_next(config, state, frame, all_complete);
    } else {
        state.phase = WavePhase::Spawning;
        state.next_spawn_frame = frame;
    }
}

/// Drives the phase machine: queued starts, pre-wave delay expiry and
/// clearance detection. Runs after roster pruning and before spawning.
pub fn wave_director_system(
    frame: Res<FrameCount>,
    config: Res<WaveConfig>,
    mut state: ResMut<WaveState>,
    mut started: EventWriter<WaveStarted>,
    mut completed: EventWriter<WaveCompleted>,
    mut all_complete: EventWriter<AllWavesComplete>,
) {
    if config.auto_start && !state.started_once && state.phase == WavePhase::Idle {
        state.start_queued = true;
    }
    if state.start_queued {
        state.start_queued = false;
        try_start_next(&config, &mut state, frame.frame, &mut all_complete);
    }

    if state.phase == WavePhase::DelayingBeforeWave && frame.frame >= state.delay_until_frame {
        begin_wave(
            &config,
            &mut state,
            frame.frame,
            &mut started,
            &mut completed,
            &mut all_complete,
        );
    }

    if state.phase == WavePhase::AwaitingClearance
        && state.wave_enemy_total > 0
        && state.roster.is_empty()
    {
        let number = state.current_wave_number();
        completed.write(WaveCompleted {
            wave_number: number,
        });
        info!("f={} wave {} cleared", frame.frame, number);
        try_start_next(&config, &mut state, frame.frame, &mut all_complete);
        // A zero-delay follow-up wave begins the same tick.
        if state.phase == WavePhase::DelayingBeforeWave && frame.frame >= state.delay_until_frame
        {
            begin_wave(
                &config,
                &mut state,
                frame.frame,
                &mut started,
                &mut completed,
                &mut all_complete,
            );
        }
    }
}

/// Applies external wave commands. Restart destroys every wave enemy,
/// corpses included, cancels their scheduled tasks and queues wave one
/// for the next tick.
pub fn wave_command_system(
    mut commands: Commands,
    mut requests: EventReader<WaveCommand>,
    frame: Res<FrameCount>,
    config: Res<WaveConfig>,
    mut state: ResMut<WaveState>,
    mut task_queue: ResMut<TaskQueue>,
    wave_enemies: Query<Entity, With<WaveEnemy>>,
    mut all_complete: EventWriter<AllWavesComplete>,
) {
    for request in requests.read() {
        match request {
            WaveCommand::StartNextWave => {
                try_start_next(&config, &mut state, frame.frame, &mut all_complete);
            }
            WaveCommand::RestartWaves => {
                let mut destroyed = 0;
                for entity in wave_enemies.iter() {
                    task_queue.cancel_for(entity);
                    commands.entity(entity).despawn();
                    destroyed += 1;
                }
                state.reset();
                state.start_queued = true;
                info!(
                    "f={} waves restarted, {} enemies destroyed",
                    frame.frame, destroyed
                );
            }
        }
    }
}

/// Spawns the current wave's enemies on cadence. The first instance of an
/// entry spawns with no wait, so entry boundaries land on the same tick
/// as the previous entry's last spawn.
pub fn wave_spawning_system(
    mut commands: Commands,
    frame: Res<FrameCount>,
    config: Res<WaveConfig>,
    catalog: Res<EnemyCatalog>,
    spawn_areas: Res<SpawnAreas>,
    mut rng: ResMut<SimRng>,
    mut state: ResMut<WaveState>,
    mut count_changed: EventWriter<EnemyCountChanged>,
) {
    while state.phase == WavePhase::Spawning && frame.frame >= state.next_spawn_frame {
        let wave = &config.waves[state.current_wave_index as usize];
        while state.entry_index < wave.entries.len()
            && state.spawned_in_entry >= wave.entries[state.entry_index].count
        {
            state.entry_index += 1;
            state.spawned_in_entry = 0;
        }
        if state.entry_index >= wave.entries.len() {
            state.phase = WavePhase::AwaitingClearance;
            break;
        }

        let entry = &wave.entries[state.entry_index];
        let Some((area_index, point)) = spawn_areas.pick_point(&mut rng) else {
            warn!(
                "f={} no spawn areas configured, wave {} stalled",
                frame.frame,
                state.current_wave_number()
            );
            break;
        };

        if let Some(enemy) = spawn_enemy(&mut commands, &catalog, &entry.enemy_type, point) {
            commands.entity(enemy).insert(WaveEnemy);
            state.roster.push(enemy);
            state.spawned_this_wave += 1;
            count_changed.write(EnemyCountChanged {
                current: state.roster.len() as u32,
                total: state.wave_enemy_total,
            });
            debug!(
                "f={} spawned '{}' at {:?} in '{}'",
                frame.frame, entry.enemy_type, point, spawn_areas.areas[area_index].name
            );
        } else {
            // Bad archetype name in config: the instance is forfeit but
            // the cadence cursor still advances.
            warn!(
                "f={} unknown enemy type '{}', skipping spawn",
                frame.frame, entry.enemy_type
            );
        }

        state.spawned_in_entry += 1;
        if state.spawned_in_entry < entry.count {
            state.next_spawn_frame = frame.frame + secs_to_frames(entry.spawn_interval);
        }
    }
}
