//! Data-driven movement and balance tables
//!
//! Everything an embedder may want to retune lives here as plain data. The
//! per-character table returns a fixed [`MoveStats`] bundle; power-mode and
//! ability overrides are applied as ordered passes in `sim::physics`, never
//! as nested conditionals.

use serde::{Deserialize, Serialize};

use crate::sim::Character;

/// A fixed movement parameter bundle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveStats {
    /// Horizontal acceleration per tick while a direction is held.
    pub accel: f64,
    /// Horizontal speed clamp (absolute).
    pub max_speed: f64,
    /// Vertical velocity set on jump (negative is up).
    pub jump_force: f64,
    /// Per-tick velocity multiplier while no direction is held.
    pub friction: f64,
}

/// Complete balance table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Baseline stats the character table derives from.
    pub base: MoveStats,
    /// Stats forced while in super form (friction stays per-character).
    pub super_form: MoveStats,
    /// Acceleration override while Shadow's ability window is active.
    pub ability_accel: f64,
    /// Speed clamp override while Shadow's ability window is active.
    pub ability_max_speed: f64,
    /// Friction override while standing on an oil surface.
    pub oil_friction: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base: MoveStats { accel: 0.8, max_speed: 15.0, jump_force: -12.0, friction: 0.90 },
            super_form: MoveStats { accel: 1.5, max_speed: 25.0, jump_force: -15.0, friction: 0.90 },
            ability_accel: 3.0,
            ability_max_speed: 30.0,
            oil_friction: 0.99,
        }
    }
}

impl Tuning {
    /// Per-character stats table (the first override pass).
    pub fn stats_for(&self, character: Character) -> MoveStats {
        let base = self.base;
        match character {
            Character::Sonic => base,
            Character::Shadow => MoveStats {
                accel: base.accel * 1.3,
                max_speed: base.max_speed * 1.1,
                ..base
            },
            Character::Tails => MoveStats { jump_force: base.jump_force * 1.1, ..base },
            Character::Knuckles => MoveStats {
                accel: base.accel * 0.7,
                friction: 0.85,
                ..base
            },
            Character::Silver => MoveStats { jump_force: base.jump_force * 0.9, ..base },
            Character::SuperSonic => MoveStats { friction: base.friction, ..self.super_form },
        }
    }

    /// Load a balance override; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
