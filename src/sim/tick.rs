//! Tick orchestration
//!
//! One fixed tick, in order: narration poll, damage timers, press edges,
//! physics, collision, entity behavior, boss director, projectiles,
//! particles, camera, level-complete countdown, compaction, boss trigger
//! check. Side effects accumulate into the returned [`TickOutput`] instead
//! of ambient globals; the caller applies them however it likes.

use rand::Rng;

use crate::consts::{CAMERA_LERP, CAMERA_OFFSET_X, TOWER_FIRE_CHANCE, TOWER_PROJECTILE_SPEED};
use crate::input::ButtonSnapshot;
use crate::sim::entity::EntityKind;
use crate::sim::state::{GameState, RunPhase};
use crate::sim::{boss, collision, physics, projectile};
use crate::taunt::TauntRequest;

/// Which respawn recovered the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnKind {
    /// Back to the level start, rings zeroed.
    Hard,
    /// Back to the last stable ground at a ring penalty.
    Soft,
}

/// Discrete events surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    BossSpawned,
    BossDefeated,
    LevelComplete,
    PlayerRespawned { kind: RespawnKind },
    SuperTransformed,
}

/// Side effects of one tick.
#[derive(Debug, Default)]
pub struct TickOutput {
    pub score_delta: i64,
    pub ring_delta: i64,
    /// Narrative text requests fired this tick, for the provider.
    pub taunts: Vec<TauntRequest>,
    pub events: Vec<GameEvent>,
}

impl TickOutput {
    pub(crate) fn request_taunt(&mut self, request: TauntRequest) {
        self.taunts.push(request);
    }
}

/// Advance the simulation by one fixed tick.
pub fn tick(state: &mut GameState, input: &ButtonSnapshot) -> TickOutput {
    let mut out = TickOutput::default();

    // Delivered narration is read even after the level completes.
    if let Some(line) = state.mailbox.poll() {
        state.narration = line;
    }

    if state.phase == RunPhase::Complete {
        state.prev_input = *input;
        return out;
    }

    state.time_ticks += 1;
    state.player.invulnerable_ticks = state.player.invulnerable_ticks.saturating_sub(1);
    state.player.ring_pickup_cooldown_ticks =
        state.player.ring_pickup_cooldown_ticks.saturating_sub(1);

    physics::handle_presses(state, input, &mut out);
    physics::step(state, input, &mut out);
    collision::resolve(state, &mut out);
    step_entities(state);
    boss::advance(state, &mut out);
    projectile::step_projectiles(state, &mut out);
    projectile::step_particles(state);

    // Camera trails the player.
    let target = state.player.pos.x - CAMERA_OFFSET_X;
    state.camera_x += (target - state.camera_x) * CAMERA_LERP;

    if let Some(remaining) = state.level_complete_timer.take() {
        if remaining == 0 {
            state.phase = RunPhase::Complete;
            out.events.push(GameEvent::LevelComplete);
            log::info!("level {} complete", state.level.index());
        } else {
            state.level_complete_timer = Some(remaining - 1);
        }
    }

    state.compact();

    // Crossing the trigger fills the boss slot once.
    if state.phase == RunPhase::Exploring
        && state.player.pos.x > state.boss_trigger_x
        && state.boss.is_none()
    {
        state.phase = RunPhase::BossBattle;
        boss::spawn_for_level(state, &mut out);
    }

    for request in &out.taunts {
        state.mailbox.note_request(request);
    }
    state.prev_input = *input;
    out
}

/// Non-player entity behavior: enemies patrol, towers take pot shots.
fn step_entities(state: &mut GameState) {
    for i in 0..state.entities.len() {
        let ent = state.entities[i];
        if !ent.active {
            continue;
        }
        match ent.kind {
            EntityKind::Enemy => {
                let mut e = ent;
                e.pos.x += e.vel.x;
                // Reverse at the patrol cell boundary.
                if e.pos.x.rem_euclid(200.0) > 190.0 {
                    e.vel.x = -e.vel.x;
                }
                state.entities[i] = e;
            }
            EntityKind::Tower { .. } => {
                if state.rng.random::<f64>() < TOWER_FIRE_CHANCE {
                    projectile::spawn_aimed(state, ent.center(), TOWER_PROJECTILE_SPEED);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GRAVITY;
    use crate::sim::boss::{BossBrain, StrafePhase};
    use crate::sim::entity::SpatialEntity;
    use crate::sim::{Character, GameState};
    use glam::DVec2;

    const IDLE: ButtonSnapshot = ButtonSnapshot { left: false, right: false, jump: false, down: false };
    const RIGHT: ButtonSnapshot = ButtonSnapshot { left: false, right: true, jump: false, down: false };
    const JUMP: ButtonSnapshot = ButtonSnapshot { left: false, right: false, jump: true, down: false };

    #[test]
    fn test_transformation_scenario() {
        // Airborne Sonic, 50 rings, unlock granted, jump pressed.
        let mut state = GameState::new(1, Character::Sonic, true, 2).unwrap();
        state.entities.clear();
        state.rings = 50;
        let out = tick(&mut state, &JUMP);

        assert!(state.player.is_super);
        assert!(out.events.contains(&GameEvent::SuperTransformed));
        // The float impulse, plus the gravity of the same tick.
        assert_eq!(state.player.vel.y, -10.0 + GRAVITY);
        assert_eq!(state.particles.len(), 30);
    }

    #[test]
    fn test_loop_traversal_end_to_end() {
        let mut state = GameState::new(1, Character::Sonic, true, 2).unwrap();
        state.player.pos = DVec2::new(1_900.0, 460.0);
        state.player.vel.x = 15.0;
        state.player.is_grounded = true;

        let mut entered_at = None;
        for i in 0..20 {
            let _ = tick(&mut state, &RIGHT);
            if state.player.loop_state.is_some() {
                entered_at = Some(i);
                break;
            }
        }
        assert!(entered_at.is_some(), "never entered the loop");

        // A revolution takes ceil(2 pi / 0.15) ticks.
        let mut exited_at = None;
        for i in 0..60 {
            let _ = tick(&mut state, &RIGHT);
            if state.player.loop_state.is_none() {
                exited_at = Some(i + 1);
                break;
            }
        }
        assert_eq!(exited_at, Some(42));
        assert_eq!(state.player.vel.x, 15.0);
        assert_eq!(state.player.pos.y, 460.0);

        // The grace window plus forward speed keep it a one-way trip.
        for _ in 0..20 {
            let _ = tick(&mut state, &RIGHT);
            assert!(state.player.loop_state.is_none());
        }
    }

    #[test]
    fn test_boss_trigger_fires_once() {
        let mut state = GameState::new(1, Character::Sonic, true, 2).unwrap();
        state.player.pos.x = 3_300.0;
        let out = tick(&mut state, &IDLE);
        assert!(out.events.contains(&GameEvent::BossSpawned));
        assert_eq!(out.taunts.len(), 1);
        assert_eq!(state.phase, RunPhase::BossBattle);

        let out = tick(&mut state, &IDLE);
        assert!(!out.events.contains(&GameEvent::BossSpawned));
        assert!(state.boss.is_some());
    }

    #[test]
    fn test_defeat_schedules_level_complete_after_fixed_delay() {
        let mut state = GameState::new(1, Character::Sonic, true, 2).unwrap();
        state.player.pos.x = 3_300.0;
        let _ = tick(&mut state, &IDLE);

        // Park the boss on the ground with 1 hp and meet it in super form.
        {
            let boss = state.boss.as_mut().unwrap();
            boss.hp = 1;
            boss.brain = BossBrain::Strafe { phase: StrafePhase::Vulnerable };
            boss.pos = DVec2::new(3_700.0, 460.0);
        }
        state.player.pos = DVec2::new(3_700.0, 460.0);
        state.player.is_super = true;

        let out = tick(&mut state, &IDLE);
        assert!(out.events.contains(&GameEvent::BossDefeated));
        assert_eq!(out.score_delta, 10_000);
        assert_eq!(state.boss.as_ref().unwrap().hp, -1);
        assert!(!state.boss.as_ref().unwrap().active);

        let mut complete_after = None;
        for i in 1..=130 {
            let out = tick(&mut state, &IDLE);
            assert_eq!(out.score_delta, 0);
            if out.events.contains(&GameEvent::LevelComplete) {
                complete_after = Some(i);
                break;
            }
        }
        assert_eq!(complete_after, Some(120));
        assert_eq!(state.phase, RunPhase::Complete);

        // Completed runs are inert until re-initialization.
        let out = tick(&mut state, &IDLE);
        assert!(out.events.is_empty());
        assert_eq!(out.score_delta, 0);
    }

    #[test]
    fn test_enemy_patrol_reverses_at_cell_boundary() {
        let mut state = GameState::new(1, Character::Sonic, true, 2).unwrap();
        state.entities.clear();
        let id = state.next_entity_id();
        let mut enemy =
            SpatialEntity::new(id, EntityKind::Enemy, DVec2::new(193.9, 460.0), 40.0, 30.0);
        enemy.vel.x = -2.0;
        state.entities.push(enemy);

        step_entities(&mut state);
        assert_eq!(state.entities[0].pos.x, 191.9);
        assert_eq!(state.entities[0].vel.x, 2.0);
    }

    #[test]
    fn test_camera_trails_player() {
        let mut state = GameState::new(1, Character::Sonic, true, 2).unwrap();
        state.player.pos = DVec2::new(800.0, 460.0);
        let _ = tick(&mut state, &IDLE);
        let expected = (state.player.pos.x - CAMERA_OFFSET_X) * CAMERA_LERP;
        assert!((state.camera_x - expected).abs() < 1e-9);
    }

    #[test]
    fn test_delivered_narration_is_read_next_tick() {
        let mut state = GameState::new(1, Character::Sonic, true, 2).unwrap();
        state.taunt_sender().send("Your little planet is mine!".to_owned()).unwrap();
        let _ = tick(&mut state, &IDLE);
        assert_eq!(state.narration, "Your little planet is mine!");
    }

    #[test]
    fn test_empty_delivery_falls_back_to_call_site_line() {
        let mut state = GameState::new(1, Character::Sonic, true, 2).unwrap();
        state.player.pos.x = 3_300.0;
        let out = tick(&mut state, &IDLE);
        let fallback = out.taunts[0].fallback;

        state.taunt_sender().send(String::new()).unwrap();
        let _ = tick(&mut state, &IDLE);
        assert_eq!(state.narration, fallback);
    }

    #[test]
    fn test_ring_and_score_deltas_match_state() {
        let mut state = GameState::new(1, Character::Sonic, true, 2).unwrap();
        state.entities.clear();
        let id = state.next_entity_id();
        state.entities.push(SpatialEntity::new(
            id,
            EntityKind::Ring,
            DVec2::new(50.0, 300.0),
            20.0,
            20.0,
        ));
        let out = tick(&mut state, &IDLE);
        assert_eq!(out.ring_delta, 1);
        assert_eq!(out.score_delta, 100);
        assert_eq!(state.rings, 1);
        assert_eq!(state.score, 100);
        // The consumed ring is compacted away at the tick boundary.
        assert!(state.entities.is_empty());
    }
}
