pub mod enemy;
pub mod health;
pub mod movement;
pub mod player;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Damage-ownership classification. Compared directly wherever the
/// original design would have consulted tags or collision layers.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != other
    }
}

/// Body circle used for hitbox overlap tests and obstacle blocking.
#[derive(Component, Debug, Clone, Copy)]
pub struct BodyCollider {
    pub radius: f32,
}

/// The 8 compass directions, in the fixed order used to break snapping
/// ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompassDir {
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
    DownLeft,
    #[default]
    Down,
    DownRight,
}

pub const COMPASS_DIRS: [CompassDir; 8] = [
    CompassDir::Right,
    CompassDir::UpRight,
    CompassDir::Up,
    CompassDir::UpLeft,
    CompassDir::Left,
    CompassDir::DownLeft,
    CompassDir::Down,
    CompassDir::DownRight,
];

impl CompassDir {
    pub fn vec(self) -> Vec2 {
        let (x, y) = match self {
            CompassDir::Right => (1.0, 0.0),
            CompassDir::UpRight => (1.0, 1.0),
            CompassDir::Up => (0.0, 1.0),
            CompassDir::UpLeft => (-1.0, 1.0),
            CompassDir::Left => (-1.0, 0.0),
            CompassDir::DownLeft => (-1.0, -1.0),
            CompassDir::Down => (0.0, -1.0),
            CompassDir::DownRight => (1.0, -1.0),
        };
        Vec2::new(x, y).normalize()
    }

    /// Nearest compass direction by angular distance. Ties go to the
    /// earlier entry of `COMPASS_DIRS`.
    pub fn snap(dir: Vec2) -> CompassDir {
        let mut best = CompassDir::Right;
        let mut best_dot = f32::NEG_INFINITY;
        for cand in COMPASS_DIRS {
            let dot = cand.vec().dot(dir);
            if dot > best_dot {
                best_dot = dot;
                best = cand;
            }
        }
        best
    }
}

/// Last movement heading, snapped to 8 directions. Also orients the
/// attack hitbox.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Facing(pub CompassDir);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn faction_hostility_is_symmetric_and_irreflexive() {
        assert!(Faction::Player.is_hostile_to(Faction::Enemy));
        assert!(Faction::Enemy.is_hostile_to(Faction::Player));
        assert!(!Faction::Enemy.is_hostile_to(Faction::Enemy));
    }

    #[test]
    fn snap_picks_nearest_compass_direction() {
        assert_eq!(CompassDir::snap(Vec2::new(1.0, 0.1)), CompassDir::Right);
        assert_eq!(CompassDir::snap(Vec2::new(0.9, 1.0)), CompassDir::UpRight);
        assert_eq!(CompassDir::snap(Vec2::new(-1.0, -0.9)), CompassDir::DownLeft);
    }

    #[test]
    fn snap_breaks_exact_ties_by_list_order() {
        // A zero direction scores every candidate equally; the first entry
        // of the fixed list wins.
        assert_eq!(CompassDir::snap(Vec2::ZERO), CompassDir::Right);
    }

    #[test]
    fn compass_vectors_are_unit_length() {
        for dir in COMPASS_DIRS {
            assert!((dir.vec().length() - 1.0).abs() < 1e-5);
        }
    }
}
