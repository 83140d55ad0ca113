//! Projectile and particle subsystems
//!
//! Both are short-lived kinematic objects with a TTL. Projectiles also
//! collide with the player; particles are pure visual feedback and are never
//! read back by gameplay.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::PROJECTILE_TTL;
use crate::sim::entity::aabb_overlap;
use crate::sim::state::GameState;
use crate::sim::tick::TickOutput;

/// Projectile bounding box (square).
pub const PROJECTILE_SIZE: f64 = 20.0;

/// A boss or tower shot. Aimed at spawn time, not homing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: DVec2,
    pub vel: DVec2,
    pub width: f64,
    pub height: f64,
    pub ttl: u32,
    pub active: bool,
}

/// Visual feedback palette; the presentation layer maps these to its colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    White,
    Gold,
    Red,
    Crimson,
    Cyan,
    Gray,
}

/// Pure visual feedback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    pub ttl: u32,
    pub color: ParticleColor,
    pub size: f64,
}

/// Spawn a projectile at `source_center` aimed at the player's center.
pub(crate) fn spawn_aimed(state: &mut GameState, source_center: DVec2, speed: f64) {
    let dir = (state.player.center() - source_center).normalize_or_zero();
    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        pos: source_center,
        vel: dir * speed,
        width: PROJECTILE_SIZE,
        height: PROJECTILE_SIZE,
        ttl: PROJECTILE_TTL,
        active: true,
    });
}

/// Integrate projectiles and resolve player contact.
///
/// A powerful player destroys the shot harmlessly; an invulnerable player
/// lets it pass through; anyone else takes damage and destroys it. Culling
/// happens in the tick-boundary compaction, not here.
pub(crate) fn step_projectiles(state: &mut GameState, out: &mut TickOutput) {
    for i in 0..state.projectiles.len() {
        let mut proj = state.projectiles[i];
        if !proj.active {
            continue;
        }
        proj.pos += proj.vel;
        proj.ttl = proj.ttl.saturating_sub(1);

        let player = &state.player;
        let hit = aabb_overlap(
            player.pos,
            player.width,
            player.height,
            proj.pos,
            proj.width,
            proj.height,
        );
        state.projectiles[i] = proj;

        if hit {
            if state.player.is_powerful() {
                state.projectiles[i].active = false;
            } else if state.player.vulnerable() {
                state.handle_damage(out);
                state.projectiles[i].active = false;
            }
        }
    }
}

/// Integrate particles; expired ones are dropped in compaction.
pub(crate) fn step_particles(state: &mut GameState) {
    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.ttl = particle.ttl.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Character, GameState};

    fn arena() -> GameState {
        let mut state = GameState::new(1, Character::Sonic, true, 7).unwrap();
        state.entities.clear();
        state
    }

    #[test]
    fn test_spawn_aims_at_player_center() {
        let mut state = arena();
        state.player.pos = DVec2::new(100.0, 480.0);
        spawn_aimed(&mut state, DVec2::new(220.0, 500.0), 7.0);
        let proj = state.projectiles[0];
        assert!((proj.vel.length() - 7.0).abs() < 1e-9);
        // Player center is left of and level with the source.
        assert!(proj.vel.x < 0.0);
    }

    #[test]
    fn test_contact_damages_and_destroys() {
        let mut state = arena();
        state.rings = 15;
        state.projectiles.push(Projectile {
            id: 1,
            pos: state.player.pos,
            vel: DVec2::ZERO,
            width: PROJECTILE_SIZE,
            height: PROJECTILE_SIZE,
            ttl: 100,
            active: true,
        });
        let mut out = TickOutput::default();
        step_projectiles(&mut state, &mut out);
        assert!(!state.projectiles[0].active);
        assert_eq!(state.rings, 0);
        assert_eq!(state.player.invulnerable_ticks, 120);
    }

    #[test]
    fn test_invulnerable_player_lets_shot_pass() {
        let mut state = arena();
        state.player.invulnerable_ticks = 60;
        state.rings = 5;
        state.projectiles.push(Projectile {
            id: 1,
            pos: state.player.pos,
            vel: DVec2::ZERO,
            width: PROJECTILE_SIZE,
            height: PROJECTILE_SIZE,
            ttl: 100,
            active: true,
        });
        let mut out = TickOutput::default();
        step_projectiles(&mut state, &mut out);
        assert!(state.projectiles[0].active);
        assert_eq!(state.rings, 5);
    }

    #[test]
    fn test_powerful_player_destroys_shot_harmlessly() {
        let mut state = arena();
        state.player.is_super = true;
        state.rings = 5;
        state.projectiles.push(Projectile {
            id: 1,
            pos: state.player.pos,
            vel: DVec2::ZERO,
            width: PROJECTILE_SIZE,
            height: PROJECTILE_SIZE,
            ttl: 100,
            active: true,
        });
        let mut out = TickOutput::default();
        step_projectiles(&mut state, &mut out);
        assert!(!state.projectiles[0].active);
        assert_eq!(state.rings, 5);
        assert_eq!(state.player.invulnerable_ticks, 0);
    }
}
