//! Roster upkeep: which spawned enemies still count toward clearance.

use bevy::prelude::*;

use crate::character::health::Dead;

use super::state::{WavePhase, WaveState};

/// Tag for enemies owned by the wave director's current run.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct WaveEnemy;

/// Prunes rostered enemies that died or despawned. An enemy leaves the
/// roster at death, not at corpse cleanup, so a wave clears as soon as the
/// last enemy drops. Skipped mid-spawn to keep the roster stable under
/// the spawning cursor.
pub fn roster_tracking_system(
    mut state: ResMut<WaveState>,
    living: Query<(), (With<WaveEnemy>, Without<Dead>)>,
) {
    if state.phase == WavePhase::Spawning {
        return;
    }
    state.roster.retain(|&enemy| living.get(enemy).is_ok());
}
