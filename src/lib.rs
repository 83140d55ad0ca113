//! Spindash - a fixed-tick 2D platformer simulation engine
//!
//! Core modules:
//! - `sim`: deterministic simulation (physics, collisions, bosses, particles)
//! - `input`: logical input actions and the double-tap gesture detector
//! - `tuning`: data-driven movement and balance tables
//! - `taunt`: fire-and-forget narrative text boundary
//!
//! The engine is an embeddable library. A presentation layer owns the frame
//! loop, merges its input sources into one [`input::ButtonSnapshot`] per
//! visual frame, and calls [`sim::tick`] exactly once per frame. All gameplay
//! state lives in [`sim::GameState`]; the side effects of a tick (score and
//! ring deltas, discrete events, narrative text requests) come back in a
//! [`sim::TickOutput`] for the caller to consume.

pub mod input;
pub mod sim;
pub mod taunt;
pub mod tuning;

pub use input::{Action, ButtonSnapshot, TapDetector};
pub use sim::{Character, GameState, TickOutput, tick};
pub use taunt::{TauntMailbox, TauntRequest};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate; the driver calls one tick per visual frame.
    pub const TICK_HZ: u32 = 60;

    /// Convert a wall-clock duration in milliseconds to whole ticks.
    pub const fn ms_to_ticks(ms: u32) -> u32 {
        ms * TICK_HZ / 1000
    }

    /// Downward acceleration added every non-loop tick.
    pub const GRAVITY: f64 = 0.5;

    /// Player bounding box (square).
    pub const PLAYER_SIZE: f64 = 40.0;
    /// Level start position.
    pub const SPAWN_X: f64 = 50.0;
    pub const SPAWN_Y: f64 = 300.0;

    /// Falling past this y counts as leaving the world.
    pub const WORLD_FLOOR_Y: f64 = 1000.0;

    /// Horizontal extent of a boss arena window.
    pub const ARENA_WIDTH: f64 = 600.0;

    /// Boss/tower damage from a normal jump attack.
    pub const PLAYER_DAMAGE: i32 = 20;
    /// Tower damage from a normal attack contact.
    pub const TOWER_DAMAGE: i32 = 30;
    /// Boss/tower damage while in super form.
    pub const SUPER_PLAYER_DAMAGE: i32 = 50;
    /// Tower hit points at spawn.
    pub const TOWER_HP: i32 = 200;

    /// Invulnerability and ring-pickup cooldown granted on damage.
    pub const DAMAGE_COOLDOWN_TICKS: u32 = 120;
    /// A hurt boss refuses further damage for this long.
    pub const BOSS_HURT_TICKS: u32 = 30;

    /// Two presses of the same action inside this window are a double tap.
    pub const DOUBLE_TAP_WINDOW_TICKS: u32 = ms_to_ticks(300);
    /// Grace period after a loop exit before the loop can be re-entered.
    pub const LOOP_REENTRY_TICKS: u32 = ms_to_ticks(1000);
    /// Delay between a boss defeat and the level-complete signal.
    pub const LEVEL_COMPLETE_DELAY_TICKS: u32 = ms_to_ticks(2000);

    /// Minimum horizontal speed to swing into a loop.
    pub const LOOP_ENTRY_SPEED: f64 = 8.0;
    /// Loop traversal rate, radians per tick.
    pub const LOOP_RATE: f64 = 0.15;

    /// Super form drains one ring this often.
    pub const SUPER_DRAIN_PERIOD_TICKS: u32 = 60;
    /// Rings required to transform into super form.
    pub const SUPER_RING_COST: u32 = 50;
    /// Shadow's double-tap ability window.
    pub const ABILITY_TICKS: u32 = 600;

    /// Projectile lifetime in ticks.
    pub const PROJECTILE_TTL: u32 = 200;
    /// Tower fire probability per tick.
    pub const TOWER_FIRE_CHANCE: f64 = 0.01;
    /// Tower projectile speed.
    pub const TOWER_PROJECTILE_SPEED: f64 = 5.0;

    /// Camera target offset from the player and follow lerp factor.
    pub const CAMERA_OFFSET_X: f64 = 300.0;
    pub const CAMERA_LERP: f64 = 0.1;
}

#[cfg(test)]
mod tests {
    use super::consts::*;

    #[test]
    fn test_ms_to_ticks_at_60hz() {
        assert_eq!(ms_to_ticks(300), 18);
        assert_eq!(ms_to_ticks(1000), 60);
        assert_eq!(ms_to_ticks(2000), 120);
    }
}
