use bevy::prelude::SystemSet;

/// Execution order for one simulation tick. The sets are chained, so
/// everything in `Tasks` has finished before `EnemyAi` starts, and so on.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum SimSet {
    /// Due scheduled tasks fire first (hitbox toggles, attack ends, cleanup).
    Tasks,
    EnemyAi,
    Movement,
    CollisionDamage,
    DeathManagement,
    WaveDirector,
    FrameCounter,
}
