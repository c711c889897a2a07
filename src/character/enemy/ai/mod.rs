pub mod combat;
pub mod navigation;
pub mod recovery;
pub mod state;

pub use combat::enemy_attack_system;
pub use navigation::enemy_steering_system;
pub use recovery::stuck_detection_system;
pub use state::{AttackState, AttackVariant, EnemyAiConfig, EnemyState, StuckTracker};
