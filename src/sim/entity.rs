//! World entity model
//!
//! Every collidable world object is an axis-aligned box with velocity and an
//! archetype tag. Entities are flagged inactive rather than removed so the
//! collision scan can iterate a stable collection; compaction happens at the
//! tick boundary.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Archetype tag for world objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Solid ground and platforms; only top landings resolve.
    Platform,
    /// Platform variant with near-zero surface friction.
    Oil,
    /// Collectible ring.
    Ring,
    /// Breakable item box.
    Box,
    /// Patrolling enemy.
    Enemy,
    /// Loop entry region for curved traversal.
    Loop,
    /// Heavy destructible obstacle; the only archetype with hit points.
    Tower { hp: i32, max_hp: i32 },
}

/// Base record for every world object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialEntity {
    pub id: u32,
    pub pos: DVec2,
    pub vel: DVec2,
    pub width: f64,
    pub height: f64,
    pub kind: EntityKind,
    /// Logical removal flag; inactive entities are compacted between ticks.
    pub active: bool,
}

impl SpatialEntity {
    pub fn new(id: u32, kind: EntityKind, pos: DVec2, width: f64, height: f64) -> Self {
        Self { id, pos, vel: DVec2::ZERO, width, height, kind, active: true }
    }

    /// Center of the bounding box.
    pub fn center(&self) -> DVec2 {
        self.pos + DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Axis-aligned overlap against another box.
    pub fn overlaps(&self, pos: DVec2, width: f64, height: f64) -> bool {
        aabb_overlap(self.pos, self.width, self.height, pos, width, height)
    }
}

/// Axis-aligned bounding-box overlap test.
pub fn aabb_overlap(
    a_pos: DVec2,
    a_width: f64,
    a_height: f64,
    b_pos: DVec2,
    b_width: f64,
    b_height: f64,
) -> bool {
    a_pos.x < b_pos.x + b_width
        && a_pos.x + a_width > b_pos.x
        && a_pos.y < b_pos.y + b_height
        && a_pos.y + a_height > b_pos.y
}

/// Previous-tick top-edge crossing test.
///
/// True when a falling mover's bottom edge was at or above the surface
/// before this tick's vertical motion, i.e. it landed from above rather
/// than clipping in from the side.
pub fn crossed_top_edge(bottom: f64, vel_y: f64, surface_y: f64) -> bool {
    vel_y > 0.0 && bottom - vel_y <= surface_y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap_and_separation() {
        let a = SpatialEntity::new(1, EntityKind::Platform, DVec2::new(0.0, 0.0), 100.0, 20.0);
        assert!(a.overlaps(DVec2::new(50.0, 10.0), 40.0, 40.0));
        assert!(a.overlaps(DVec2::new(-39.0, -39.0), 40.0, 40.0));
        // Touching edges do not overlap.
        assert!(!a.overlaps(DVec2::new(100.0, 0.0), 40.0, 40.0));
        assert!(!a.overlaps(DVec2::new(0.0, 20.0), 40.0, 40.0));
    }

    #[test]
    fn test_crossed_top_edge_requires_falling() {
        // Bottom at 505 after falling 10: previous bottom 495 was above 500.
        assert!(crossed_top_edge(505.0, 10.0, 500.0));
        // Rising movers never land.
        assert!(!crossed_top_edge(505.0, -10.0, 500.0));
        // Side clip: previous bottom already below the surface.
        assert!(!crossed_top_edge(520.0, 10.0, 500.0));
    }

    #[test]
    fn test_tower_carries_hit_points() {
        let tower = SpatialEntity::new(
            7,
            EntityKind::Tower { hp: 200, max_hp: 200 },
            DVec2::new(900.0, 400.0),
            50.0,
            100.0,
        );
        assert!(matches!(tower.kind, EntityKind::Tower { hp: 200, .. }));
        assert_eq!(tower.center(), DVec2::new(925.0, 450.0));
    }
}
