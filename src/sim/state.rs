//! Run controller state
//!
//! [`GameState`] owns everything for the duration of one level run: the
//! player, the entity collection, the boss slot, projectiles, particles,
//! and the score/ring counters. No other component holds a reference across
//! ticks; re-initialization is wholesale replacement.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{DAMAGE_COOLDOWN_TICKS, SPAWN_X, SPAWN_Y, SUPER_RING_COST};
use crate::input::ButtonSnapshot;
use crate::sim::boss::Boss;
use crate::sim::entity::SpatialEntity;
use crate::sim::level::{ConfigError, LevelId, LevelSpec, Placement};
use crate::sim::player::{Character, Player};
use crate::sim::projectile::{Particle, ParticleColor, Projectile};
use crate::sim::tick::{GameEvent, RespawnKind, TickOutput};
use crate::taunt::TauntMailbox;
use crate::tuning::Tuning;

/// Where the run currently is in its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Traversing the level toward the boss trigger.
    Exploring,
    /// Boss spawned; the fight is on.
    BossBattle,
    /// Level-complete fired; ticks are no-ops until re-initialization.
    Complete,
}

/// Complete world state for one level run.
#[derive(Debug)]
pub struct GameState {
    pub level: LevelId,
    pub phase: RunPhase,
    pub player: Player,
    /// World entities in authored order; iteration order is update order.
    pub entities: Vec<SpatialEntity>,
    /// At most one boss exists per level.
    pub boss: Option<Boss>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub rings: u32,
    pub score: u64,
    pub camera_x: f64,
    /// Monotonic tick counter, also the gesture/loop-exit clock.
    pub time_ticks: u64,
    /// Whether the caller's progression has granted the super transformation.
    pub super_unlocked: bool,
    pub hazard: bool,
    pub boss_trigger_x: f64,
    pub tuning: Tuning,
    /// Last narrative line for the HUD; updated from the taunt mailbox.
    pub narration: String,
    pub(crate) mailbox: TauntMailbox,
    pub(crate) prev_input: ButtonSnapshot,
    pub(crate) ring_drain_timer: u32,
    /// Countdown between boss defeat and the level-complete signal.
    pub(crate) level_complete_timer: Option<u32>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Initialize a level run. The only failure is an out-of-range level
    /// index; everything else is closed enums.
    pub fn new(
        level_index: u32,
        character: Character,
        super_unlocked: bool,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let spec = LevelSpec::build(level_index)?;
        let player = Player::new(character);
        // A run that starts already in super form starts fueled.
        let rings = if player.is_super { SUPER_RING_COST } else { 0 };

        let mut state = Self {
            level: spec.id,
            phase: RunPhase::Exploring,
            player,
            entities: Vec::with_capacity(spec.placements.len()),
            boss: None,
            projectiles: Vec::new(),
            particles: Vec::new(),
            rings,
            score: 0,
            camera_x: 0.0,
            time_ticks: 0,
            super_unlocked,
            hazard: spec.hazard,
            boss_trigger_x: spec.boss_trigger_x,
            tuning: Tuning::default(),
            narration: String::new(),
            mailbox: TauntMailbox::new(),
            prev_input: ButtonSnapshot::default(),
            ring_drain_timer: 0,
            level_complete_timer: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        for placement in &spec.placements {
            state.spawn_placement(placement);
        }

        log::info!(
            "level {} initialized: {} entities, character {:?}",
            spec.id.index(),
            state.entities.len(),
            character
        );
        Ok(state)
    }

    /// Allocate a world-unique entity id.
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Instantiate one authored placement into the world.
    pub(crate) fn spawn_placement(&mut self, placement: &Placement) {
        let id = self.next_entity_id();
        let mut entity = SpatialEntity::new(
            id,
            placement.kind,
            DVec2::new(placement.x, placement.y),
            placement.width,
            placement.height,
        );
        entity.vel.x = placement.vel_x;
        self.entities.push(entity);
    }

    /// Handle for the taunt provider to deliver lines into.
    pub fn taunt_sender(&self) -> std::sync::mpsc::Sender<String> {
        self.mailbox.sender()
    }

    /// Switch the playable character mid-run.
    ///
    /// The permanently-super character is always super; a transformation in
    /// progress survives only for Sonic, the character able to transform.
    pub fn set_character(&mut self, character: Character) {
        self.player.character = character;
        if character.permanently_super() {
            self.player.is_super = true;
        } else if character != Character::Sonic {
            self.player.is_super = false;
        }
    }

    pub(crate) fn award_score(&mut self, points: u64, out: &mut TickOutput) {
        self.score += points;
        out.score_delta += points as i64;
    }

    pub(crate) fn add_rings(&mut self, count: u32, out: &mut TickOutput) {
        self.rings += count;
        out.ring_delta += i64::from(count);
    }

    /// Remove up to `count` rings; returns how many were actually taken.
    pub(crate) fn take_rings(&mut self, count: u32, out: &mut TickOutput) -> u32 {
        let taken = count.min(self.rings);
        self.rings -= taken;
        out.ring_delta -= i64::from(taken);
        taken
    }

    pub(crate) fn set_rings(&mut self, count: u32, out: &mut TickOutput) {
        out.ring_delta += i64::from(count) - i64::from(self.rings);
        self.rings = count;
    }

    /// Scatter `count` particles from `center` with random velocity spread.
    pub(crate) fn burst(
        &mut self,
        center: DVec2,
        count: usize,
        spread: f64,
        ttl: u32,
        color: ParticleColor,
        size: f64,
    ) {
        for _ in 0..count {
            let vel = DVec2::new(
                (self.rng.random::<f64>() - 0.5) * spread,
                (self.rng.random::<f64>() - 0.5) * spread,
            );
            self.particles.push(Particle { pos: center, vel, ttl, color, size });
        }
    }

    /// Normal-damage entry point. No-op while powerful; with rings in hand
    /// they scatter and the player is knocked back; with none, it's a hard
    /// respawn.
    pub(crate) fn handle_damage(&mut self, out: &mut TickOutput) {
        if self.player.is_powerful() {
            return;
        }
        if self.rings > 0 {
            let dropped = self.rings.min(10);
            self.burst(self.player.pos, dropped as usize, 15.0, 60, ParticleColor::Gold, 4.0);
            self.player.vel.y = -5.0;
            self.player.vel.x = -self.player.vel.x * 1.5;
            self.player.invulnerable_ticks = DAMAGE_COOLDOWN_TICKS;
            self.player.ring_pickup_cooldown_ticks = DAMAGE_COOLDOWN_TICKS;
            self.set_rings(0, out);
        } else {
            self.hard_respawn(out);
        }
    }

    /// Return to the level start with zeroed rings and brief invulnerability.
    pub(crate) fn hard_respawn(&mut self, out: &mut TickOutput) {
        let spawn = DVec2::new(SPAWN_X, SPAWN_Y);
        self.player.pos = spawn;
        self.player.vel = DVec2::ZERO;
        self.player.invulnerable_ticks = DAMAGE_COOLDOWN_TICKS;
        self.player.ring_pickup_cooldown_ticks = 0;
        if !self.player.character.permanently_super() {
            self.player.is_super = false;
        }
        self.player.ability_active_ticks = 0;
        let rings = if self.player.character.permanently_super() { SUPER_RING_COST } else { 0 };
        self.set_rings(rings, out);
        self.particles.push(Particle {
            pos: spawn,
            vel: DVec2::ZERO,
            ttl: 30,
            color: ParticleColor::White,
            size: 100.0,
        });
        out.events.push(GameEvent::PlayerRespawned { kind: RespawnKind::Hard });
        log::info!("hard respawn at level start");
    }

    /// Return to the last stable ground position at a small ring penalty.
    pub(crate) fn soft_respawn(&mut self, out: &mut TickOutput) {
        let mut pos = self.player.last_stable_pos.unwrap_or(DVec2::new(SPAWN_X, SPAWN_Y));
        pos.y -= 50.0;
        self.player.pos = pos;
        self.player.vel = DVec2::ZERO;
        self.player.invulnerable_ticks = DAMAGE_COOLDOWN_TICKS;
        self.player.ring_pickup_cooldown_ticks = 0;
        self.player.ability_active_ticks = 0;
        let _ = self.take_rings(10, out);
        self.burst(pos, 10, 10.0, 40, ParticleColor::Red, 5.0);
        self.narration = "Watch your step!".to_owned();
        out.events.push(GameEvent::PlayerRespawned { kind: RespawnKind::Soft });
        log::info!("soft respawn at last stable ground");
    }

    /// Drop logically-removed objects. Runs between ticks only, so the
    /// collision scan always iterates a stable collection.
    pub(crate) fn compact(&mut self) {
        self.entities.retain(|e| e.active);
        self.projectiles.retain(|p| p.active && p.ttl > 0);
        self.particles.retain(|p| p.ttl > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;

    #[test]
    fn test_new_rejects_unknown_level() {
        assert!(GameState::new(9, Character::Sonic, true, 0).is_err());
    }

    #[test]
    fn test_super_start_grants_fuel() {
        let state = GameState::new(1, Character::SuperSonic, true, 0).unwrap();
        assert!(state.player.is_super);
        assert_eq!(state.rings, 50);

        let plain = GameState::new(1, Character::Sonic, true, 0).unwrap();
        assert_eq!(plain.rings, 0);
    }

    #[test]
    fn test_set_character_state_transfer() {
        let mut state = GameState::new(1, Character::Sonic, true, 0).unwrap();
        state.player.is_super = true;
        state.rings = 30;

        // Sonic keeps an in-progress transformation.
        state.set_character(Character::Sonic);
        assert!(state.player.is_super);

        // Anyone else drops it; rings are untouched.
        state.set_character(Character::Tails);
        assert!(!state.player.is_super);
        assert_eq!(state.rings, 30);

        // The permanently-super character is always super.
        state.set_character(Character::SuperSonic);
        assert!(state.player.is_super);
    }

    #[test]
    fn test_take_rings_clamps_at_zero() {
        let mut state = GameState::new(1, Character::Sonic, true, 0).unwrap();
        let mut out = TickOutput::default();
        state.rings = 4;
        assert_eq!(state.take_rings(10, &mut out), 4);
        assert_eq!(state.rings, 0);
        assert_eq!(out.ring_delta, -4);
    }

    #[test]
    fn test_damage_with_rings_scatters_and_protects() {
        let mut state = GameState::new(1, Character::Sonic, true, 0).unwrap();
        let mut out = TickOutput::default();
        state.rings = 15;
        state.player.vel.x = 6.0;
        state.handle_damage(&mut out);

        assert_eq!(state.rings, 0);
        assert_eq!(out.ring_delta, -15);
        assert_eq!(state.player.invulnerable_ticks, 120);
        assert_eq!(state.player.ring_pickup_cooldown_ticks, 120);
        assert_eq!(state.player.vel.y, -5.0);
        assert_eq!(state.player.vel.x, -9.0);
        // Up to ten rings scatter as particles.
        assert_eq!(state.particles.len(), 10);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_damage_without_rings_is_a_hard_respawn() {
        let mut state = GameState::new(1, Character::Sonic, true, 0).unwrap();
        let mut out = TickOutput::default();
        state.player.pos = DVec2::new(900.0, 460.0);
        state.handle_damage(&mut out);

        assert_eq!(state.player.pos, DVec2::new(50.0, 300.0));
        assert_eq!(state.rings, 0);
        assert_eq!(state.player.invulnerable_ticks, 120);
        assert!(out.events.contains(&GameEvent::PlayerRespawned { kind: RespawnKind::Hard }));
    }

    #[test]
    fn test_damage_is_noop_while_powerful() {
        let mut state = GameState::new(1, Character::Sonic, true, 0).unwrap();
        let mut out = TickOutput::default();
        state.rings = 15;
        state.player.is_super = true;
        state.handle_damage(&mut out);
        assert_eq!(state.rings, 15);
        assert_eq!(state.player.invulnerable_ticks, 0);
    }

    #[test]
    fn test_soft_respawn_penalty_and_message() {
        let mut state = GameState::new(4, Character::Sonic, true, 0).unwrap();
        let mut out = TickOutput::default();
        state.rings = 25;
        state.player.last_stable_pos = Some(DVec2::new(2100.0, 460.0));
        state.soft_respawn(&mut out);

        assert_eq!(state.player.pos, DVec2::new(2100.0, 410.0));
        assert_eq!(state.rings, 15);
        assert_eq!(state.narration, "Watch your step!");
        assert!(out.events.contains(&GameEvent::PlayerRespawned { kind: RespawnKind::Soft }));
    }

    #[test]
    fn test_compact_drops_inactive_entities() {
        let mut state = GameState::new(1, Character::Sonic, true, 0).unwrap();
        let before = state.entities.len();
        let ring_idx = state
            .entities
            .iter()
            .position(|e| e.kind == EntityKind::Ring)
            .unwrap();
        state.entities[ring_idx].active = false;
        state.compact();
        assert_eq!(state.entities.len(), before - 1);
    }
}
