//! Per-level boss state machines
//!
//! Each level's boss runs a distinct phase graph; all four share one polling
//! contract: advance one tick while confined to the arena window, fire
//! periodically off `move_timer`, take a 30-tick hurt window on non-fatal
//! damage, and on fatal damage deactivate exactly once, award score, request
//! a victory taunt, and schedule the delayed level-complete signal.
//!
//! Phases are closed enums per level, so an undefined phase value is
//! unrepresentable rather than a runtime check.

use glam::DVec2;
use rand::Rng;

use crate::consts::{ARENA_WIDTH, BOSS_HURT_TICKS, LEVEL_COMPLETE_DELAY_TICKS, PLAYER_DAMAGE};
use crate::sim::entity::{EntityKind, aabb_overlap};
use crate::sim::level::{self, LevelId};
use crate::sim::projectile::spawn_aimed;
use crate::sim::state::GameState;
use crate::sim::tick::{GameEvent, TickOutput};
use crate::taunt::TauntRequest;

const INTRO_AERIAL: TauntRequest = TauntRequest::from_context("I have arrived to destroy you!");
const INTRO_SHIELDED: TauntRequest =
    TauntRequest::from_context("My shield is impenetrable! Destroy my towers if you dare!");
const INTRO_DRIVING: TauntRequest = TauntRequest::from_context("You can't outrun my Egg-Mobile!");
const INTRO_MECH: TauntRequest =
    TauntRequest::from_context("Welcome to my Base! Time to finish this!");
const SHIELD_DOWN: TauntRequest = TauntRequest::from_context("My shield! Noooo!");
const SYSTEMS_ONLINE: TauntRequest = TauntRequest::from_context("Systems Online! Prepare to die!");
const DEFEAT_OVERWHELMED: TauntRequest = TauntRequest::from_context("I can't believe this power!");
const DEFEAT_MALFUNCTION: TauntRequest =
    TauntRequest::from_context("Impossible! System Failure!");

/// Phases of the level-1 aerial strafer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrafePhase {
    Shooting,
    Descending,
    Vulnerable,
    Ascending,
    Hurt,
}

/// Phases of the level-2 shielded boss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShieldPhase {
    Shielded,
    Vulnerable,
    Hurt,
}

/// Phases of the level-3 driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrivePhase {
    Driving,
    Hurt,
}

/// Phases of the level-4 mech pilot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MechPhase {
    RunningToMech,
    EnteringMech,
    FlyingUp,
    AerialBattle,
    Hurt,
}

/// Tagged per-level state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossBrain {
    Strafe { phase: StrafePhase },
    Shielded { phase: ShieldPhase },
    Drive { phase: DrivePhase },
    Mech { phase: MechPhase, mech_id: u32 },
}

/// A boss: a spatial body plus hit points and its level's machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Boss {
    pub id: u32,
    pub pos: DVec2,
    pub vel: DVec2,
    pub width: f64,
    pub height: f64,
    pub hp: i32,
    pub max_hp: i32,
    pub brain: BossBrain,
    /// Ticks since the last phase transition.
    pub move_timer: u32,
    /// Left edge of the arena window.
    pub arena_min_x: f64,
    pub shield_active: bool,
    pub active: bool,
}

impl Boss {
    pub fn arena_max_x(&self) -> f64 {
        self.arena_min_x + ARENA_WIDTH
    }

    pub fn center(&self) -> DVec2 {
        self.pos + DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Transition to a new phase, resetting the timer. Idempotent.
    fn enter(&mut self, brain: BossBrain) {
        if self.brain != brain {
            log::debug!("boss phase {:?} -> {:?}", self.brain, brain);
            self.brain = brain;
            self.move_timer = 0;
        }
    }
}

/// Create the boss for the current level once the player crosses the
/// trigger. Level 2 brings its tower helpers, level 4 its empty mech.
pub(crate) fn spawn_for_level(state: &mut GameState, out: &mut TickOutput) {
    let start_x = state.player.pos.x + 400.0;
    let arena_min_x = start_x - 300.0;
    let id = state.next_entity_id();

    let boss = match state.level {
        LevelId::Act1 => {
            out.request_taunt(INTRO_AERIAL);
            Boss {
                id,
                pos: DVec2::new(start_x, 200.0),
                vel: DVec2::ZERO,
                width: 80.0,
                height: 80.0,
                hp: 100,
                max_hp: 100,
                brain: BossBrain::Strafe { phase: StrafePhase::Shooting },
                move_timer: 0,
                arena_min_x,
                shield_active: false,
                active: true,
            }
        }
        LevelId::Act2 => {
            state.spawn_placement(&level::boss_tower(start_x - 250.0));
            state.spawn_placement(&level::boss_tower(start_x + 250.0));
            out.request_taunt(INTRO_SHIELDED);
            Boss {
                id,
                pos: DVec2::new(start_x, 350.0),
                vel: DVec2::ZERO,
                width: 80.0,
                height: 80.0,
                hp: 100,
                max_hp: 100,
                brain: BossBrain::Shielded { phase: ShieldPhase::Shielded },
                move_timer: 0,
                arena_min_x,
                shield_active: true,
                active: true,
            }
        }
        LevelId::Act3 => {
            out.request_taunt(INTRO_DRIVING);
            Boss {
                id,
                pos: DVec2::new(start_x, 440.0),
                vel: DVec2::ZERO,
                width: 120.0,
                height: 60.0,
                hp: 150,
                max_hp: 150,
                brain: BossBrain::Drive { phase: DrivePhase::Driving },
                move_timer: 0,
                arena_min_x,
                shield_active: false,
                active: true,
            }
        }
        LevelId::Act4 => {
            let mech_id = state.next_entity_id();
            state.entities.push(crate::sim::entity::SpatialEntity::new(
                mech_id,
                EntityKind::Platform,
                DVec2::new(start_x, 400.0),
                100.0,
                100.0,
            ));
            out.request_taunt(INTRO_MECH);
            Boss {
                id,
                pos: DVec2::new(start_x - 300.0, 420.0),
                vel: DVec2::ZERO,
                width: 50.0,
                height: 80.0,
                hp: 200,
                max_hp: 200,
                brain: BossBrain::Mech { phase: MechPhase::RunningToMech, mech_id },
                move_timer: 0,
                arena_min_x,
                shield_active: false,
                active: true,
            }
        }
    };

    log::info!("level {} boss spawned at x {:.0}", state.level.index(), start_x);
    state.boss = Some(boss);
    out.events.push(GameEvent::BossSpawned);
}

/// Advance the boss one tick: movement, firing, and contact resolution.
pub(crate) fn advance(state: &mut GameState, out: &mut TickOutput) {
    let Some(mut boss) = state.boss.take() else {
        return;
    };
    if boss.active {
        boss.move_timer += 1;
        match boss.brain {
            BossBrain::Strafe { phase } => advance_strafe(&mut boss, phase, state),
            BossBrain::Shielded { phase } => advance_shielded(&mut boss, phase, state, out),
            BossBrain::Drive { phase } => advance_drive(&mut boss, phase, state),
            BossBrain::Mech { phase, mech_id } => {
                advance_mech(&mut boss, phase, mech_id, state, out)
            }
        }
        resolve_contact(&mut boss, state, out);
    }
    state.boss = Some(boss);
}

fn advance_strafe(boss: &mut Boss, phase: StrafePhase, state: &mut GameState) {
    boss.pos.x = boss.pos.x.clamp(boss.arena_min_x, boss.arena_max_x());
    let t = f64::from(boss.move_timer);
    match phase {
        StrafePhase::Shooting => {
            boss.pos.y = 200.0 + (t * 0.05).sin() * 30.0;
            boss.pos.x += (t * 0.02).cos() * 3.0;
            if boss.move_timer % 80 == 0 {
                spawn_aimed(state, boss.center(), 7.0);
            }
            if boss.move_timer > 500 {
                boss.enter(BossBrain::Strafe { phase: StrafePhase::Descending });
            }
        }
        StrafePhase::Descending => {
            boss.pos.y += 3.0;
            if boss.pos.y >= 460.0 {
                boss.pos.y = 460.0;
                boss.enter(BossBrain::Strafe { phase: StrafePhase::Vulnerable });
            }
        }
        StrafePhase::Vulnerable => {
            if boss.move_timer > 300 {
                boss.enter(BossBrain::Strafe { phase: StrafePhase::Ascending });
            }
        }
        StrafePhase::Ascending => {
            boss.pos.y -= 3.0;
            if boss.pos.y <= 200.0 {
                boss.enter(BossBrain::Strafe { phase: StrafePhase::Shooting });
            }
        }
        // Hurt retreats into Ascending, not back to Vulnerable.
        StrafePhase::Hurt => {
            if boss.move_timer > BOSS_HURT_TICKS {
                boss.enter(BossBrain::Strafe { phase: StrafePhase::Ascending });
            }
        }
    }
}

fn advance_shielded(boss: &mut Boss, phase: ShieldPhase, state: &mut GameState, out: &mut TickOutput) {
    let towers_alive = state
        .entities
        .iter()
        .any(|e| e.active && matches!(e.kind, EntityKind::Tower { .. }));

    if towers_alive && boss.shield_active {
        let t = f64::from(boss.move_timer);
        boss.pos.y = 350.0 + (t * 0.05).sin() * 10.0;
        if boss.move_timer % 120 == 0 {
            spawn_aimed(state, boss.center(), 7.0);
        }
        return;
    }

    // The shield drops the instant the last tower dies and never comes back.
    if boss.shield_active {
        boss.shield_active = false;
        boss.pos.y = 460.0;
        out.request_taunt(SHIELD_DOWN);
        boss.enter(BossBrain::Shielded { phase: ShieldPhase::Vulnerable });
        log::info!("boss shield down");
        return;
    }

    match phase {
        ShieldPhase::Hurt => {
            if boss.move_timer > BOSS_HURT_TICKS {
                boss.enter(BossBrain::Shielded { phase: ShieldPhase::Vulnerable });
            }
        }
        _ => {
            boss.enter(BossBrain::Shielded { phase: ShieldPhase::Vulnerable });
            boss.pos.y = 460.0;
        }
    }
}

fn advance_drive(boss: &mut Boss, phase: DrivePhase, state: &mut GameState) {
    const PATROL_SPEED: f64 = 8.0;
    if boss.vel.x == 0.0 {
        boss.vel.x = PATROL_SPEED;
    }
    boss.pos.x += boss.vel.x;
    if boss.pos.x > boss.arena_max_x() && boss.vel.x > 0.0 {
        boss.vel.x = -PATROL_SPEED;
    }
    if boss.pos.x < boss.arena_min_x && boss.vel.x < 0.0 {
        boss.vel.x = PATROL_SPEED;
    }
    if boss.move_timer % 60 == 0 {
        spawn_aimed(state, boss.center(), 9.0);
    }
    if phase == DrivePhase::Hurt && boss.move_timer > BOSS_HURT_TICKS {
        boss.enter(BossBrain::Drive { phase: DrivePhase::Driving });
    }
}

fn advance_mech(
    boss: &mut Boss,
    phase: MechPhase,
    mech_id: u32,
    state: &mut GameState,
    out: &mut TickOutput,
) {
    match phase {
        MechPhase::RunningToMech => {
            boss.vel.x = 5.0;
            boss.pos.x += boss.vel.x;
            if boss.pos.x >= boss.arena_min_x + 600.0 {
                if let Some(mech) = state.entities.iter_mut().find(|e| e.id == mech_id) {
                    mech.active = false;
                }
                boss.width = 100.0;
                boss.height = 100.0;
                boss.pos.y = 400.0;
                boss.enter(BossBrain::Mech { phase: MechPhase::EnteringMech, mech_id });
            }
        }
        MechPhase::EnteringMech => {
            if boss.move_timer > 60 {
                out.request_taunt(SYSTEMS_ONLINE);
                boss.enter(BossBrain::Mech { phase: MechPhase::FlyingUp, mech_id });
            }
        }
        MechPhase::FlyingUp => {
            boss.pos.y -= 2.0;
            if boss.pos.y < 200.0 {
                boss.enter(BossBrain::Mech { phase: MechPhase::AerialBattle, mech_id });
            }
        }
        // The hurt window keeps the aerial patrol going.
        MechPhase::AerialBattle | MechPhase::Hurt => {
            let t = f64::from(boss.move_timer);
            boss.pos.x = boss.arena_min_x + 300.0 + (t * 0.02).sin() * 250.0;
            boss.pos.y = 200.0 + (t * 0.03).cos() * 50.0;
            if boss.move_timer % 60 == 0 {
                spawn_aimed(state, boss.center(), 6.0);
            }
            if phase == MechPhase::Hurt && boss.move_timer > BOSS_HURT_TICKS {
                boss.enter(BossBrain::Mech { phase: MechPhase::AerialBattle, mech_id });
            }
        }
    }
}

/// Player-boss contact. A powerful player always damages a non-shielded
/// boss without taking damage; otherwise the level's attack-opportunity
/// test decides the damage direction.
fn resolve_contact(boss: &mut Boss, state: &mut GameState, out: &mut TickOutput) {
    let overlapping = aabb_overlap(
        state.player.pos,
        state.player.width,
        state.player.height,
        boss.pos,
        boss.width,
        boss.height,
    );
    if !overlapping {
        return;
    }

    if state.player.is_powerful() {
        if !boss.shield_active {
            boss.hp -= 2;
            // The mech fight grinds off bonus rings under sustained contact.
            if matches!(boss.brain, BossBrain::Mech { .. }) && state.rng.random::<f64>() < 0.2 {
                state.add_rings(5, out);
                state.award_score(500, out);
            }
            if boss.hp <= 0 {
                defeat(boss, state, out, DEFEAT_OVERWHELMED);
            }
        }
        return;
    }

    match boss.brain {
        BossBrain::Drive { phase } => {
            let stomp = state.player.vel.y > 0.0 && state.player.pos.y < boss.pos.y;
            if stomp {
                if phase != DrivePhase::Hurt {
                    boss.hp -= PLAYER_DAMAGE;
                    boss.enter(BossBrain::Drive { phase: DrivePhase::Hurt });
                }
                state.player.vel.y = -8.0;
            } else if state.player.vulnerable() {
                state.handle_damage(out);
            }
        }
        BossBrain::Mech { phase, mech_id } => {
            // Nothing lands before the boss reaches the mech.
            if phase == MechPhase::RunningToMech {
                return;
            }
            if state.player.attacking() {
                if phase != MechPhase::Hurt {
                    boss.hp -= PLAYER_DAMAGE;
                    boss.enter(BossBrain::Mech { phase: MechPhase::Hurt, mech_id });
                    state.player.vel.y = -8.0;
                    state.player.vel.x = -state.player.vel.x;
                    state.add_rings(2, out);
                }
            } else if state.player.vulnerable() {
                state.handle_damage(out);
            }
        }
        BossBrain::Shielded { .. } if boss.shield_active => {
            if state.player.vulnerable() {
                state.player.vel.x = -state.player.vel.x * 2.0;
                state.handle_damage(out);
            }
        }
        BossBrain::Strafe { phase } => {
            let hurt = phase == StrafePhase::Hurt;
            let hurt_brain = BossBrain::Strafe { phase: StrafePhase::Hurt };
            jump_attack_contact(boss, state, out, hurt, hurt_brain);
        }
        BossBrain::Shielded { phase } => {
            let hurt = phase == ShieldPhase::Hurt;
            let hurt_brain = BossBrain::Shielded { phase: ShieldPhase::Hurt };
            jump_attack_contact(boss, state, out, hurt, hurt_brain);
        }
    }

    if boss.hp <= 0 && boss.active {
        defeat(boss, state, out, DEFEAT_MALFUNCTION);
    }
}

/// Falling jump-attack test shared by levels 1 and 2 (post-shield): only a
/// descending spin or jump lands damage, and the hurt window blocks both
/// directions.
fn jump_attack_contact(
    boss: &mut Boss,
    state: &mut GameState,
    out: &mut TickOutput,
    hurt: bool,
    hurt_brain: BossBrain,
) {
    let jump_attack = state.player.attacking() && state.player.vel.y > 0.0;
    if jump_attack && !hurt {
        boss.hp -= PLAYER_DAMAGE;
        boss.enter(hurt_brain);
        state.player.vel.y = -8.0;
        state.player.vel.x = -state.player.vel.x;
    } else if state.player.vulnerable() && !hurt {
        state.handle_damage(out);
    }
}

/// Deactivate exactly once: score, victory taunt, delayed level-complete,
/// and the projectile barrage dies with the boss.
fn defeat(boss: &mut Boss, state: &mut GameState, out: &mut TickOutput, taunt: TauntRequest) {
    boss.active = false;
    state.award_score(10_000, out);
    out.request_taunt(taunt);
    state.level_complete_timer = Some(LEVEL_COMPLETE_DELAY_TICKS);
    for proj in &mut state.projectiles {
        proj.active = false;
    }
    out.events.push(GameEvent::BossDefeated);
    log::info!("boss defeated with {} hp overkill", -boss.hp);
}
