pub mod config;
pub mod state;
pub mod systems;
pub mod tracking;

pub use config::{SpawnEntry, WaveConfig, WaveSpec};
pub use state::{
    AllWavesComplete, EnemyCountChanged, WaveCommand, WaveCompleted, WavePhase, WaveStarted,
    WaveState,
};
pub use systems::{wave_command_system, wave_director_system, wave_spawning_system};
pub use tracking::{roster_tracking_system, WaveEnemy};
