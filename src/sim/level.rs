//! Static level placement tables
//!
//! Levels are hand-authored data, not computed logic: each campaign level
//! maps to a deterministic list of entity placements plus the few per-level
//! parameters the run controller reads. The schema derives serde so an
//! embedder can dump or diff the tables as plain data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::TOWER_HP;
use crate::sim::entity::EntityKind;

/// Construction-time configuration failures. There is no runtime error path
/// inside the simulation; this is the only thing a caller can get wrong.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown level index {0}; campaign levels are 1..=4")]
    UnknownLevel(u32),
}

/// Campaign level identifier; the set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelId {
    Act1,
    Act2,
    Act3,
    Act4,
}

impl LevelId {
    pub fn try_from_index(index: u32) -> Result<Self, ConfigError> {
        match index {
            1 => Ok(LevelId::Act1),
            2 => Ok(LevelId::Act2),
            3 => Ok(LevelId::Act3),
            4 => Ok(LevelId::Act4),
            other => Err(ConfigError::UnknownLevel(other)),
        }
    }

    pub fn index(self) -> u32 {
        match self {
            LevelId::Act1 => 1,
            LevelId::Act2 => 2,
            LevelId::Act3 => 3,
            LevelId::Act4 => 4,
        }
    }

    /// Hazard levels recover world falls with a soft respawn.
    pub fn hazard(self) -> bool {
        matches!(self, LevelId::Act4)
    }

    /// Crossing this x spawns the boss.
    pub fn boss_trigger_x(self) -> f64 {
        match self {
            LevelId::Act4 => 4000.0,
            _ => 3200.0,
        }
    }
}

/// One authored entity placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Initial horizontal velocity (patrolling enemies).
    #[serde(default)]
    pub vel_x: f64,
}

impl Placement {
    fn fixed(kind: EntityKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { kind, x, y, width, height, vel_x: 0.0 }
    }

    fn enemy(x: f64, vel_x: f64) -> Self {
        Self { kind: EntityKind::Enemy, x, y: 460.0, width: 40.0, height: 30.0, vel_x }
    }
}

/// A complete level description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub id: LevelId,
    pub hazard: bool,
    pub boss_trigger_x: f64,
    pub placements: Vec<Placement>,
}

impl LevelSpec {
    /// Build the authored table for a 1-based level index.
    pub fn build(index: u32) -> Result<LevelSpec, ConfigError> {
        let id = LevelId::try_from_index(index)?;
        let placements = match id {
            LevelId::Act1 => act1(),
            LevelId::Act2 => act2(),
            LevelId::Act3 => act3(),
            LevelId::Act4 => act4(),
        };
        Ok(LevelSpec {
            id,
            hazard: id.hazard(),
            boss_trigger_x: id.boss_trigger_x(),
            placements,
        })
    }
}

fn floor_run(placements: &mut Vec<Placement>, start: usize, count: usize) {
    for i in start..start + count {
        placements.push(Placement::fixed(
            EntityKind::Platform,
            i as f64 * 100.0,
            500.0,
            100.0,
            100.0,
        ));
    }
}

fn ring_arc(placements: &mut Vec<Placement>, count: usize) {
    for i in 0..count {
        placements.push(Placement::fixed(
            EntityKind::Ring,
            300.0 + i as f64 * 60.0,
            450.0 - (i % 3) as f64 * 40.0,
            20.0,
            20.0,
        ));
    }
}

/// Act 1: industrial zone with the loop.
fn act1() -> Vec<Placement> {
    let mut p = Vec::new();
    floor_run(&mut p, 0, 60);
    p.push(Placement::fixed(EntityKind::Platform, 600.0, 400.0, 200.0, 20.0));
    p.push(Placement::fixed(EntityKind::Box, 700.0, 360.0, 30.0, 30.0));
    p.push(Placement::fixed(EntityKind::Loop, 2000.0, 300.0, 200.0, 200.0));
    floor_run(&mut p, 22, 20);
    ring_arc(&mut p, 50);
    p.push(Placement::enemy(900.0, -2.0));
    p.push(Placement::enemy(1600.0, -2.0));
    p
}

/// Act 2: water zone; no roaming enemies, the boss brings towers.
fn act2() -> Vec<Placement> {
    let mut p = Vec::new();
    floor_run(&mut p, 0, 80);
    p.push(Placement::fixed(EntityKind::Platform, 500.0, 350.0, 100.0, 20.0));
    p.push(Placement::fixed(EntityKind::Platform, 900.0, 250.0, 100.0, 20.0));
    p.push(Placement::fixed(EntityKind::Box, 520.0, 310.0, 30.0, 30.0));
    ring_arc(&mut p, 50);
    p
}

/// Act 3: forest zone.
fn act3() -> Vec<Placement> {
    let mut p = Vec::new();
    floor_run(&mut p, 0, 80);
    p.push(Placement::fixed(EntityKind::Platform, 400.0, 400.0, 100.0, 100.0));
    p.push(Placement::fixed(EntityKind::Platform, 800.0, 300.0, 200.0, 200.0));
    p.push(Placement::fixed(EntityKind::Box, 850.0, 260.0, 30.0, 30.0));
    ring_arc(&mut p, 50);
    p.push(Placement::enemy(900.0, -2.0));
    p.push(Placement::enemy(1600.0, -2.0));
    p
}

/// Act 4: base zone - oil slicks, floor gaps, and the hazard respawn policy.
fn act4() -> Vec<Placement> {
    let mut p = Vec::new();
    for i in 0..120usize {
        let x = i as f64 * 100.0;
        if i > 20 && i < 30 {
            p.push(Placement::fixed(EntityKind::Oil, x, 520.0, 100.0, 80.0));
        } else if i > 50 && i < 70 && i % 2 != 0 {
            // Gap.
        } else {
            let kind = if i > 40 && i < 50 { EntityKind::Oil } else { EntityKind::Platform };
            p.push(Placement::fixed(kind, x, 500.0, 100.0, 100.0));
        }
    }
    let cap_x = 3500.0;
    p.push(Placement::fixed(EntityKind::Platform, cap_x, 400.0, 300.0, 20.0));
    p.push(Placement::fixed(EntityKind::Platform, cap_x + 50.0, 250.0, 200.0, 20.0));
    p.push(Placement::fixed(EntityKind::Box, cap_x + 135.0, 210.0, 30.0, 30.0));
    p.push(Placement::fixed(EntityKind::Oil, 1500.0, 400.0, 200.0, 20.0));
    p.push(Placement::fixed(EntityKind::Oil, 1900.0, 300.0, 200.0, 20.0));
    ring_arc(&mut p, 80);
    p.push(Placement::enemy(900.0, -2.0));
    p.push(Placement::enemy(1600.0, -2.0));
    p.push(Placement::enemy(2500.0, -3.0));
    p.push(Placement::enemy(3800.0, -3.0));
    p
}

/// Tower helper placement for the level-2 boss, offset from the boss x.
pub(crate) fn boss_tower(x: f64) -> Placement {
    Placement::fixed(EntityKind::Tower { hp: TOWER_HP, max_hp: TOWER_HP }, x, 400.0, 50.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(spec: &LevelSpec, f: impl Fn(&Placement) -> bool) -> usize {
        spec.placements.iter().filter(|p| f(p)).count()
    }

    #[test]
    fn test_unknown_level_is_a_config_error() {
        assert_eq!(LevelSpec::build(0).unwrap_err(), ConfigError::UnknownLevel(0));
        assert_eq!(LevelSpec::build(5).unwrap_err(), ConfigError::UnknownLevel(5));
    }

    #[test]
    fn test_act1_contents() {
        let spec = LevelSpec::build(1).unwrap();
        assert!(!spec.hazard);
        assert_eq!(spec.boss_trigger_x, 3200.0);
        assert_eq!(count(&spec, |p| p.kind == EntityKind::Loop), 1);
        assert_eq!(count(&spec, |p| p.kind == EntityKind::Ring), 50);
        assert_eq!(count(&spec, |p| p.kind == EntityKind::Enemy), 2);
    }

    #[test]
    fn test_act2_has_no_roaming_enemies() {
        let spec = LevelSpec::build(2).unwrap();
        assert_eq!(count(&spec, |p| p.kind == EntityKind::Enemy), 0);
        assert_eq!(count(&spec, |p| p.kind == EntityKind::Ring), 50);
    }

    #[test]
    fn test_act4_is_the_hazard_level() {
        let spec = LevelSpec::build(4).unwrap();
        assert!(spec.hazard);
        assert_eq!(spec.boss_trigger_x, 4000.0);
        assert_eq!(count(&spec, |p| p.kind == EntityKind::Ring), 80);
        assert_eq!(count(&spec, |p| p.kind == EntityKind::Enemy), 4);
        assert!(count(&spec, |p| p.kind == EntityKind::Oil) > 0);
        // The odd tiles between 50 and 70 are missing: real gaps to fall into.
        let has_tile_at = |x: f64| spec.placements.iter().any(|p| p.x == x && p.y == 500.0);
        assert!(has_tile_at(5200.0));
        assert!(!has_tile_at(5100.0));
    }

    #[test]
    fn test_levels_are_deterministic() {
        assert_eq!(LevelSpec::build(3).unwrap(), LevelSpec::build(3).unwrap());
    }
}
