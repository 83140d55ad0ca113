//! Player state and character variants

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{PLAYER_SIZE, SPAWN_X, SPAWN_Y};
use crate::input::TapDetector;

/// Playable character variants. The set is closed, so configuration errors
/// are unrepresentable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Character {
    Sonic,
    Tails,
    Knuckles,
    Shadow,
    Silver,
    SuperSonic,
}

impl Character {
    /// The permanently-super character never pays the ring drain.
    pub fn permanently_super(self) -> bool {
        matches!(self, Character::SuperSonic)
    }
}

/// Transient curved-motion override while traversing a loop.
///
/// While present on the player, position is computed parametrically on the
/// circle instead of from velocity integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopState {
    /// Angle traveled around the loop, radians; a full revolution exits.
    pub progress: f64,
    pub center: DVec2,
    pub radius: f64,
    /// Where the player's top edge lands on exit, captured at entry from the
    /// loop entity's bottom edge.
    pub ground_exit_y: f64,
}

/// The player: a spatial body plus platformer state.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: DVec2,
    pub vel: DVec2,
    pub width: f64,
    pub height: f64,
    pub character: Character,
    pub is_grounded: bool,
    pub is_jumping: bool,
    pub is_spinning: bool,
    pub facing_right: bool,
    pub invulnerable_ticks: u32,
    pub ring_pickup_cooldown_ticks: u32,
    /// Tick of the most recent loop exit, for the re-entry grace window.
    pub last_loop_exit_tick: Option<u64>,
    pub loop_state: Option<LoopState>,
    pub is_super: bool,
    /// Last near-stationary ground position; soft respawn returns here.
    pub last_stable_pos: Option<DVec2>,
    /// Remaining ticks of Shadow's speed-boost window.
    pub ability_active_ticks: u32,
    /// Double-tap detector holding the last gesture action and tick.
    pub taps: TapDetector,
}

impl Player {
    pub fn new(character: Character) -> Self {
        let spawn = DVec2::new(SPAWN_X, SPAWN_Y);
        Self {
            pos: spawn,
            vel: DVec2::ZERO,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            character,
            is_grounded: false,
            is_jumping: false,
            is_spinning: false,
            facing_right: true,
            invulnerable_ticks: 0,
            ring_pickup_cooldown_ticks: 0,
            last_loop_exit_tick: None,
            loop_state: None,
            is_super: character.permanently_super(),
            last_stable_pos: Some(spawn),
            ability_active_ticks: 0,
            taps: TapDetector::default(),
        }
    }

    /// Bottom edge of the bounding box.
    pub fn bottom(&self) -> f64 {
        self.pos.y + self.height
    }

    /// Center of the bounding box.
    pub fn center(&self) -> DVec2 {
        self.pos + DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Super form, or Shadow inside his ability window: immune to normal
    /// damage and flattens enemies on contact.
    pub fn is_powerful(&self) -> bool {
        self.is_super || (self.character == Character::Shadow && self.ability_active_ticks > 0)
    }

    /// Currently allowed to take damage.
    pub fn vulnerable(&self) -> bool {
        self.invulnerable_ticks == 0
    }

    /// Rolling or airborne attack stance.
    pub fn attacking(&self) -> bool {
        self.is_spinning || self.is_jumping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_spawns_at_level_start() {
        let player = Player::new(Character::Sonic);
        assert_eq!(player.pos, DVec2::new(50.0, 300.0));
        assert!(!player.is_super);
        assert_eq!(player.last_stable_pos, Some(player.pos));
    }

    #[test]
    fn test_permanently_super_starts_super() {
        assert!(Player::new(Character::SuperSonic).is_super);
        assert!(!Player::new(Character::Shadow).is_super);
    }

    #[test]
    fn test_powerful_states() {
        let mut player = Player::new(Character::Shadow);
        assert!(!player.is_powerful());
        player.ability_active_ticks = 1;
        assert!(player.is_powerful());

        let mut sonic = Player::new(Character::Sonic);
        sonic.ability_active_ticks = 1;
        // The ability window only empowers Shadow.
        assert!(!sonic.is_powerful());
        sonic.is_super = true;
        assert!(sonic.is_powerful());
    }
}
