//! Physics and input resolution
//!
//! One tick of motion: press edges dispatch gestures and the super
//! transformation, then movement parameters are resolved through ordered
//! override passes and integrated. Loop traversal replaces velocity
//! integration with parametric circular motion until the revolution
//! completes.

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::consts::{ABILITY_TICKS, GRAVITY, LOOP_RATE, SUPER_DRAIN_PERIOD_TICKS, SUPER_RING_COST};
use crate::input::{Action, ButtonSnapshot};
use crate::sim::entity::{EntityKind, SpatialEntity};
use crate::sim::player::{Character, Player};
use crate::sim::projectile::ParticleColor;
use crate::sim::state::GameState;
use crate::sim::tick::{GameEvent, TickOutput};
use crate::tuning::{MoveStats, Tuning};

/// Resolve this tick's movement parameters.
///
/// Override passes, in order: character table, super form, Shadow's ability
/// window, oil surface. Later passes win - an abilitied Shadow outruns even
/// the super clamp.
pub(crate) fn resolve_stats(player: &Player, on_oil: bool, tuning: &Tuning) -> MoveStats {
    let mut stats = tuning.stats_for(player.character);
    if player.is_super {
        stats.accel = tuning.super_form.accel;
        stats.max_speed = tuning.super_form.max_speed;
        stats.jump_force = tuning.super_form.jump_force;
    }
    if player.character == Character::Shadow && player.ability_active_ticks > 0 {
        stats.accel = tuning.ability_accel;
        stats.max_speed = tuning.ability_max_speed;
    }
    if on_oil {
        stats.friction = tuning.oil_friction;
    }
    stats
}

/// Whether the player's feet rest on an oil surface.
fn standing_on_oil(player: &Player, entities: &[SpatialEntity]) -> bool {
    entities.iter().any(|e| {
        e.active
            && e.kind == EntityKind::Oil
            && player.pos.x < e.pos.x + e.width
            && player.pos.x + player.width > e.pos.x
            && (player.bottom() - e.pos.y).abs() < 5.0
    })
}

/// Process press edges: gesture detection, character abilities, and the
/// super transformation.
pub(crate) fn handle_presses(state: &mut GameState, input: &ButtonSnapshot, out: &mut TickOutput) {
    let prev = state.prev_input;
    let now = state.time_ticks;

    for action in input.edges(prev) {
        let double = state.player.taps.press(action, now);
        if double {
            dispatch_ability(state, action);
        }

        // A jump press in the air transforms Sonic; not gated on double-tap.
        if action == Action::Jump
            && !state.player.is_grounded
            && state.player.character == Character::Sonic
            && state.super_unlocked
            && !state.player.is_super
            && state.rings >= SUPER_RING_COST
        {
            state.player.is_super = true;
            state.player.vel.y = -10.0;
            let pos = state.player.pos;
            state.burst(pos, 30, 20.0, 60, ParticleColor::Gold, 8.0);
            out.events.push(GameEvent::SuperTransformed);
            log::info!("super transformation");
        }
    }
}

/// Character-specific double-tap abilities.
fn dispatch_ability(state: &mut GameState, action: Action) {
    match (state.player.character, action) {
        (Character::Shadow, Action::Right) => {
            state.player.ability_active_ticks = ABILITY_TICKS;
            let pos = state.player.pos;
            state.burst(pos, 20, 10.0, 30, ParticleColor::Red, 6.0);
            log::debug!("shadow speed boost active");
        }
        (Character::Silver, Action::Jump) => {
            state.player.pos.x += 300.0;
            state.player.vel.y = 0.0;
            let pos = state.player.pos;
            state.burst(pos, 20, 10.0, 30, ParticleColor::Cyan, 6.0);
            log::debug!("silver teleport");
        }
        (Character::Knuckles, Action::Jump) => {
            state.player.vel.y = -25.0;
            let pos = state.player.pos;
            state.burst(pos, 20, 10.0, 30, ParticleColor::Crimson, 6.0);
            log::debug!("knuckles launch");
        }
        _ => {}
    }
}

/// One tick of player motion.
pub(crate) fn step(state: &mut GameState, input: &ButtonSnapshot, out: &mut TickOutput) {
    // Temporary super forms burn one ring per drain period.
    if state.player.is_super {
        state.ring_drain_timer += 1;
        if state.ring_drain_timer >= SUPER_DRAIN_PERIOD_TICKS {
            state.ring_drain_timer = 0;
            if !state.player.character.permanently_super() {
                if state.rings <= 1 {
                    state.set_rings(0, out);
                    state.player.is_super = false;
                    log::debug!("super form expired");
                } else {
                    let _ = state.take_rings(1, out);
                }
            }
        }
    }

    state.player.ability_active_ticks = state.player.ability_active_ticks.saturating_sub(1);

    let on_oil = standing_on_oil(&state.player, &state.entities);
    let stats = resolve_stats(&state.player, on_oil, &state.tuning);
    let now = state.time_ticks;
    let player = &mut state.player;

    // Loop traversal: position comes from the circle, not from velocity.
    // No gravity, no clamp.
    if let Some(mut loop_state) = player.loop_state {
        loop_state.progress += LOOP_RATE;
        let theta = loop_state.progress + FRAC_PI_2;
        player.pos.x = loop_state.center.x + theta.cos() * loop_state.radius;
        player.pos.y = loop_state.center.y + theta.sin() * loop_state.radius;
        if loop_state.progress >= TAU {
            player.loop_state = None;
            player.last_loop_exit_tick = Some(now);
            player.vel.x = stats.max_speed;
            player.vel.y = 0.0;
            player.pos.y = loop_state.ground_exit_y;
            log::debug!("loop exit onto ground");
        } else {
            player.loop_state = Some(loop_state);
        }
        return;
    }

    if input.right {
        player.vel.x += stats.accel;
        player.facing_right = true;
    } else if input.left {
        player.vel.x -= stats.accel;
        player.facing_right = false;
    } else {
        // Exponential decay, never hard-zeroed.
        player.vel.x *= stats.friction;
    }

    if input.down && player.vel.x.abs() > 1.0 {
        player.is_spinning = true;
    } else if !player.is_jumping {
        player.is_spinning = false;
    }

    if input.jump && player.is_grounded {
        player.vel.y = stats.jump_force;
        player.is_grounded = false;
        player.is_jumping = true;
        player.is_spinning = true;
    }

    player.vel.y += GRAVITY;
    player.vel.x = player.vel.x.clamp(-stats.max_speed, stats.max_speed);
    player.pos += player.vel;
}
