//! Static arena geometry: obstacle rectangles used for raycast queries and
//! movement blocking, and the named spawn rectangles the wave director
//! draws spawn points from.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::rng::SimRng;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Uniform random point inside the rectangle (inclusive of the border
    /// for degenerate spans).
    pub fn random_point_within(&self, rng: &mut SimRng) -> Vec2 {
        Vec2::new(
            rng.range_f32(self.min.x, self.max.x),
            rng.range_f32(self.min.y, self.max.y),
        )
    }

    /// Smallest `t` in `[0, max_dist]` at which `origin + t * dir` enters
    /// the rectangle, by the slab method. `dir` must be normalized.
    pub fn raycast(&self, origin: Vec2, dir: Vec2, max_dist: f32) -> Option<f32> {
        let mut t_enter = 0.0_f32;
        let mut t_exit = max_dist;

        for axis in 0..2 {
            let (o, d, lo, hi) = match axis {
                0 => (origin.x, dir.x, self.min.x, self.max.x),
                _ => (origin.y, dir.y, self.min.y, self.max.y),
            };
            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (t0, t1) = ((lo - o) * inv, (hi - o) * inv);
            let (near, far) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
            t_enter = t_enter.max(near);
            t_exit = t_exit.min(far);
            if t_enter > t_exit {
                return None;
            }
        }
        Some(t_enter)
    }

    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        (center - closest).length_squared() < radius * radius
    }
}

/// Static obstacles, queried by enemy navigation and movement blocking.
#[derive(Resource, Debug, Clone, Default)]
pub struct ObstacleMap {
    pub obstacles: Vec<Aabb>,
}

impl ObstacleMap {
    /// Distance along `dir` to the nearest obstacle within `max_dist`, or
    /// `None` when the ray is clear.
    pub fn raycast(&self, origin: Vec2, dir: Vec2, max_dist: f32) -> Option<f32> {
        self.obstacles
            .iter()
            .filter_map(|aabb| aabb.raycast(origin, dir, max_dist))
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn is_clear(&self, origin: Vec2, dir: Vec2, max_dist: f32) -> bool {
        self.raycast(origin, dir, max_dist).is_none()
    }

    pub fn circle_overlaps(&self, center: Vec2, radius: f32) -> bool {
        self.obstacles
            .iter()
            .any(|aabb| aabb.overlaps_circle(center, radius))
    }
}

/// A named spawn rectangle. Purely geometric, read-only at runtime.
#[derive(Debug, Clone)]
pub struct SpawnArea {
    pub name: String,
    pub bounds: Aabb,
}

/// All spawn rectangles available to the wave director.
#[derive(Resource, Debug, Clone)]
pub struct SpawnAreas {
    pub areas: Vec<SpawnArea>,
}

impl Default for SpawnAreas {
    fn default() -> Self {
        Self {
            areas: vec![
                SpawnArea {
                    name: "north yard".into(),
                    bounds: Aabb::new(Vec2::new(-160.0, 120.0), Vec2::new(160.0, 200.0)),
                },
                SpawnArea {
                    name: "south yard".into(),
                    bounds: Aabb::new(Vec2::new(-160.0, -200.0), Vec2::new(160.0, -120.0)),
                },
            ],
        }
    }
}

impl SpawnAreas {
    /// Uniform random area, then uniform random point inside it. `None`
    /// when no areas are configured.
    pub fn pick_point(&self, rng: &mut SimRng) -> Option<(usize, Vec2)> {
        if self.areas.is_empty() {
            return None;
        }
        let idx = rng.index(self.areas.len());
        Some((idx, self.areas[idx].bounds.random_point_within(rng)))
    }
}

/// On-disk arena description. Coordinates are plain pairs so the RON file
/// stays independent of the math types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub spawn_areas: Vec<SpawnAreaSpec>,
    pub obstacles: Vec<RectSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnAreaSpec {
    pub name: String,
    pub min: [f32; 2],
    pub max: [f32; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectSpec {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl RectSpec {
    fn to_aabb(&self) -> Aabb {
        Aabb::new(Vec2::from(self.min), Vec2::from(self.max))
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            spawn_areas: vec![
                SpawnAreaSpec {
                    name: "north yard".into(),
                    min: [-160.0, 120.0],
                    max: [160.0, 200.0],
                },
                SpawnAreaSpec {
                    name: "south yard".into(),
                    min: [-160.0, -200.0],
                    max: [160.0, -120.0],
                },
            ],
            obstacles: vec![
                RectSpec {
                    min: [-20.0, -60.0],
                    max: [20.0, -20.0],
                },
                RectSpec {
                    min: [-90.0, 30.0],
                    max: [-50.0, 70.0],
                },
            ],
        }
    }
}

impl ArenaConfig {
    pub fn into_resources(self) -> (ObstacleMap, SpawnAreas) {
        let obstacles = ObstacleMap {
            obstacles: self.obstacles.iter().map(RectSpec::to_aabb).collect(),
        };
        let areas = SpawnAreas {
            areas: self
                .spawn_areas
                .into_iter()
                .map(|s| SpawnArea {
                    bounds: Aabb::new(Vec2::from(s.min), Vec2::from(s.max)),
                    name: s.name,
                })
                .collect(),
        };
        (obstacles, areas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block() -> Aabb {
        Aabb::new(Vec2::new(10.0, -10.0), Vec2::new(20.0, 10.0))
    }

    #[test]
    fn raycast_hits_facing_obstacle() {
        let map = ObstacleMap {
            obstacles: vec![block()],
        };
        let d = map.raycast(Vec2::ZERO, Vec2::X, 50.0);
        assert_eq!(d, Some(10.0));
    }

    #[test]
    fn raycast_misses_behind_and_out_of_range() {
        let map = ObstacleMap {
            obstacles: vec![block()],
        };
        assert!(map.is_clear(Vec2::ZERO, -Vec2::X, 50.0));
        assert!(map.is_clear(Vec2::ZERO, Vec2::X, 5.0));
        assert!(map.is_clear(Vec2::ZERO, Vec2::Y, 50.0));
    }

    #[test]
    fn raycast_inside_obstacle_reports_zero() {
        let d = block().raycast(Vec2::new(15.0, 0.0), Vec2::X, 10.0);
        assert_eq!(d, Some(0.0));
    }

    #[test]
    fn nearest_of_several_obstacles_wins() {
        let map = ObstacleMap {
            obstacles: vec![
                Aabb::new(Vec2::new(30.0, -5.0), Vec2::new(40.0, 5.0)),
                block(),
            ],
        };
        assert_eq!(map.raycast(Vec2::ZERO, Vec2::X, 100.0), Some(10.0));
    }

    #[test]
    fn random_point_stays_inside_bounds() {
        let area = Aabb::new(Vec2::new(-3.0, 4.0), Vec2::new(9.0, 8.0));
        let mut rng = SimRng::seeded(99);
        for _ in 0..200 {
            let p = area.random_point_within(&mut rng);
            assert!(area.contains(p), "{p:?} escaped {area:?}");
        }
    }

    #[test]
    fn circle_overlap_uses_closest_point() {
        let map = ObstacleMap {
            obstacles: vec![block()],
        };
        assert!(map.circle_overlaps(Vec2::new(8.0, 0.0), 3.0));
        assert!(!map.circle_overlaps(Vec2::new(5.0, 0.0), 3.0));
    }

    #[test]
    fn arena_config_round_trips_into_resources() {
        let (obstacles, areas) = ArenaConfig::default().into_resources();
        assert_eq!(obstacles.obstacles.len(), 2);
        assert_eq!(areas.areas.len(), 2);
        assert_eq!(areas.areas[0].name, "north yard");
    }

    #[test]
    fn pick_point_handles_empty_list() {
        let mut rng = SimRng::default();
        let empty = SpawnAreas { areas: vec![] };
        assert!(empty.pick_point(&mut rng).is_none());
    }
}
