//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, one tick per visual frame
//! - Seeded RNG only
//! - Stable iteration order (authored entity order)
//! - No rendering or platform dependencies
//!
//! The tick pipeline mutates [`GameState`] in one direction: input snapshot,
//! player physics, collision resolution, boss director, projectile and
//! particle integration, transition check. Everything the outside world
//! needs to know comes back in a [`TickOutput`].

pub mod boss;
pub mod collision;
pub mod entity;
pub mod level;
pub mod physics;
pub mod player;
pub mod projectile;
pub mod state;
pub mod tick;

pub use boss::{Boss, BossBrain, DrivePhase, MechPhase, ShieldPhase, StrafePhase};
pub use entity::{EntityKind, SpatialEntity, aabb_overlap, crossed_top_edge};
pub use level::{ConfigError, LevelId, LevelSpec, Placement};
pub use player::{Character, LoopState, Player};
pub use projectile::{PROJECTILE_SIZE, Particle, ParticleColor, Projectile};
pub use state::{GameState, RunPhase};
pub use tick::{GameEvent, RespawnKind, TickOutput, tick};
