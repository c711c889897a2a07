//! Wave director run state and its observable events.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavePhase {
    /// Nothing started yet.
    #[default]
    Idle,
    /// A wave is selected and its pre-delay is counting down.
    DelayingBeforeWave,
    /// Instances of the current wave are being spawned on cadence.
    Spawning,
    /// All spawns are out; waiting for the roster to empty.
    AwaitingClearance,
    /// Terminal until a restart.
    AllComplete,
}

/// Commands from outside the core (UI, demo driver).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveCommand {
    StartNextWave,
    /// Destroys every wave enemy and starts over from wave one.
    RestartWaves,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct WaveStarted {
    pub wave_number: u32,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct WaveCompleted {
    pub wave_number: u32,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct AllWavesComplete;

/// Fired once per spawn; `current` is monotonically non-decreasing and
/// `total` constant within a wave.
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyCountChanged {
    pub current: u32,
    pub total: u32,
}

/// The director's mutable run state. The roster holds entity ids only;
/// enemy lifetime is owned by the ECS, and stale ids are pruned each tick.
#[derive(Resource, Debug, Default)]
pub struct WaveState {
    pub phase: WavePhase,
    /// -1 before the first wave.
    pub current_wave_index: i32,
    pub roster: Vec<Entity>,
    pub wave_enemy_total: u32,
    pub spawned_this_wave: u32,

    /// Spawn cursor within the current wave.
    pub entry_index: usize,
    pub spawned_in_entry: u32,
    pub next_spawn_frame: u32,

    pub delay_until_frame: u32,
    /// A start request to consume at the top of the next director tick.
    pub start_queued: bool,
    /// The next wave to start skips its pre-delay.
    pub first_wave_pending: bool,
    pub started_once: bool,
}

impl WaveState {
    pub fn new() -> Self {
        Self {
            current_wave_index: -1,
            first_wave_pending: true,
            ..Self::default()
        }
    }

    /// 1-indexed wave number; 0 before the first wave.
    pub fn current_wave_number(&self) -> u32 {
        (self.current_wave_index + 1).max(0) as u32
    }

    pub fn active_enemy_count(&self) -> usize {
        self.roster.len()
    }

    pub fn is_spawning(&self) -> bool {
        self.phase == WavePhase::Spawning
    }

    /// Back to the pre-run state. The caller decides whether a new run is
    /// queued afterwards.
    pub fn reset(&mut self) {
        let started_once = self.started_once;
        *self = Self::new();
        self.started_once = started_once;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wave_number_is_one_indexed() {
        let mut state = WaveState::new();
        assert_eq!(state.current_wave_number(), 0);
        state.current_wave_index = 0;
        assert_eq!(state.current_wave_number(), 1);
        state.current_wave_index = 4;
        assert_eq!(state.current_wave_number(), 5);
    }

    #[test]
    fn reset_returns_to_pre_run_state() {
        let mut state = WaveState::new();
        state.phase = WavePhase::AwaitingClearance;
        state.current_wave_index = 2;
        state.roster.push(Entity::from_raw(9));
        state.wave_enemy_total = 7;
        state.started_once = true;

        state.reset();
        assert_eq!(state.phase, WavePhase::Idle);
        assert_eq!(state.current_wave_index, -1);
        assert_eq!(state.active_enemy_count(), 0);
        assert!(state.first_wave_pending);
        assert!(state.started_once);
    }
}
