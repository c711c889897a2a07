//! Wave definitions, loaded from RON and immutable afterwards.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// One batch of identical spawns inside a wave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub enemy_type: String,
    pub count: u32,
    /// Seconds between instances of this entry. The first instance spawns
    /// with no wait, and the last is not followed by one.
    pub spawn_interval: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveSpec {
    pub name: String,
    pub entries: Vec<SpawnEntry>,
    /// Seconds of quiet before the wave starts. Skipped for the first
    /// wave of a run.
    #[serde(default)]
    pub delay_before_wave: f32,
}

impl WaveSpec {
    pub fn enemy_total(&self) -> u32 {
        self.entries.iter().map(|entry| entry.count).sum()
    }
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct WaveConfig {
    pub waves: Vec<WaveSpec>,
    #[serde(default = "default_true")]
    pub auto_start: bool,
    #[serde(default)]
    pub loop_waves: bool,
}

fn default_true() -> bool {
    true
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            waves: vec![
                WaveSpec {
                    name: "skirmish".to_string(),
                    entries: vec![SpawnEntry {
                        enemy_type: "ghoul".to_string(),
                        count: 3,
                        spawn_interval: 0.8,
                    }],
                    delay_before_wave: 0.0,
                },
                WaveSpec {
                    name: "onslaught".to_string(),
                    entries: vec![
                        SpawnEntry {
                            enemy_type: "ghoul".to_string(),
                            count: 4,
                            spawn_interval: 0.5,
                        },
                        SpawnEntry {
                            enemy_type: "brute".to_string(),
                            count: 1,
                            spawn_interval: 1.0,
                        },
                    ],
                    delay_before_wave: 3.0,
                },
            ],
            auto_start: true,
            loop_waves: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::from_ron_str;
    use pretty_assertions::assert_eq;

    #[test]
    fn wave_config_parses_from_ron() {
        let doc = r#"(
            waves: [
                (
                    name: "opening",
                    entries: [
                        (enemy_type: "ghoul", count: 2, spawn_interval: 0.5),
                    ],
                ),
            ],
            loop_waves: true,
        )"#;
        let config: WaveConfig = from_ron_str(doc).unwrap();
        assert_eq!(config.waves.len(), 1);
        assert_eq!(config.waves[0].delay_before_wave, 0.0);
        assert_eq!(config.waves[0].enemy_total(), 2);
        assert!(config.auto_start);
        assert!(config.loop_waves);
    }

    #[test]
    fn enemy_total_sums_entries() {
        let config = WaveConfig::default();
        assert_eq!(config.waves[1].enemy_total(), 5);
    }
}
