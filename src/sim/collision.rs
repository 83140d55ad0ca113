//! Collision resolution
//!
//! After physics integration the player is swept once against every active
//! entity; each archetype has its own resolution rule. Axis awareness comes
//! from the previous-tick top-edge crossing test, which separates "landed
//! from above" from side contact.

use glam::DVec2;

use crate::consts::{
    LOOP_ENTRY_SPEED, LOOP_REENTRY_TICKS, SUPER_PLAYER_DAMAGE, TOWER_DAMAGE, WORLD_FLOOR_Y,
};
use crate::sim::entity::{EntityKind, SpatialEntity, crossed_top_edge};
use crate::sim::player::LoopState;
use crate::sim::projectile::ParticleColor;
use crate::sim::state::GameState;
use crate::sim::tick::TickOutput;

/// Sweep the player against all active entities and apply per-archetype
/// resolution. Grounding is re-derived every tick.
pub(crate) fn resolve(state: &mut GameState, out: &mut TickOutput) {
    state.player.is_grounded = false;

    // Fell off the world: a recoverable gameplay event, not an error.
    if state.player.pos.y > WORLD_FLOOR_Y {
        if state.hazard && state.rings > 0 {
            state.soft_respawn(out);
        } else {
            state.hard_respawn(out);
        }
    }

    for i in 0..state.entities.len() {
        let ent = state.entities[i];
        if !ent.active {
            continue;
        }
        let overlapping = ent.overlaps(state.player.pos, state.player.width, state.player.height);

        match ent.kind {
            EntityKind::Platform | EntityKind::Oil => {
                if overlapping
                    && crossed_top_edge(state.player.bottom(), state.player.vel.y, ent.pos.y)
                {
                    let p = &mut state.player;
                    p.pos.y = ent.pos.y - p.height;
                    p.vel.y = 0.0;
                    p.is_grounded = true;
                    p.is_jumping = false;
                    // Only near-stationary ground is safe to respawn onto.
                    if p.vel.x.abs() < 2.0 {
                        p.last_stable_pos = Some(p.pos);
                    }
                }
            }
            EntityKind::Ring => {
                if overlapping && state.player.ring_pickup_cooldown_ticks == 0 {
                    state.entities[i].active = false;
                    state.add_rings(1, out);
                    state.award_score(100, out);
                }
            }
            EntityKind::Box => {
                if overlapping
                    && (state.player.is_spinning
                        || state.player.vel.y > 0.0
                        || state.player.is_super)
                {
                    state.entities[i].active = false;
                    state.award_score(500, out);
                    state.add_rings(10, out);
                    state.player.vel.y = -5.0;
                }
            }
            EntityKind::Loop => {
                if overlapping {
                    try_enter_loop(state, &ent);
                }
            }
            EntityKind::Enemy => {
                if overlapping {
                    if state.player.is_powerful() {
                        state.entities[i].active = false;
                        state.award_score(1000, out);
                    } else if state.player.attacking() {
                        state.entities[i].active = false;
                        state.award_score(500, out);
                        state.player.vel.y = -5.0;
                    } else if state.player.vulnerable() {
                        state.handle_damage(out);
                    }
                }
            }
            EntityKind::Tower { hp, max_hp } => {
                resolve_tower(state, i, hp, max_hp, overlapping);
            }
        }
    }
}

/// Loop entry: needs speed and a cleared re-entry grace window.
fn try_enter_loop(state: &mut GameState, ent: &SpatialEntity) {
    let now = state.time_ticks;
    let player = &mut state.player;
    if player.loop_state.is_some() || player.vel.x.abs() <= LOOP_ENTRY_SPEED {
        return;
    }
    if let Some(exit_tick) = player.last_loop_exit_tick
        && now.saturating_sub(exit_tick) <= u64::from(LOOP_REENTRY_TICKS)
    {
        return;
    }
    player.loop_state = Some(LoopState {
        progress: 0.0,
        center: ent.center() + DVec2::new(0.0, -50.0),
        radius: 100.0,
        ground_exit_y: ent.pos.y + ent.height - player.height,
    });
    log::debug!("loop entered at x {:.0}", ent.pos.x);
}

/// Towers land like platforms on top, hard-stop from the side, and soak
/// attack damage while any contact lasts.
fn resolve_tower(state: &mut GameState, idx: usize, hp: i32, max_hp: i32, overlapping: bool) {
    let ent = state.entities[idx];
    let landed =
        overlapping && crossed_top_edge(state.player.bottom(), state.player.vel.y, ent.pos.y);
    if landed {
        let p = &mut state.player;
        p.pos.y = ent.pos.y - p.height;
        p.vel.y = 0.0;
        p.is_grounded = true;
    } else if overlapping {
        let p = &mut state.player;
        if p.vel.x > 0.0 {
            p.pos.x = ent.pos.x - p.width;
        }
        if p.vel.x < 0.0 {
            p.pos.x = ent.pos.x + ent.width;
        }
        p.vel.x = 0.0;
    }

    if overlapping && (state.player.attacking() || state.player.is_super) && hp > 0 {
        let damage =
            if state.player.is_super { SUPER_PLAYER_DAMAGE } else { TOWER_DAMAGE };
        let hp = (hp - damage).max(0);
        state.entities[idx].kind = EntityKind::Tower { hp, max_hp };
        state.player.vel.y = -6.0;
        if hp == 0 {
            state.entities[idx].active = false;
            let center = ent.pos + DVec2::new(ent.width / 2.0, ent.height / 2.0);
            state.burst(center, 15, 15.0, 40, ParticleColor::Gray, 8.0);
            log::debug!("tower {} destroyed", ent.id);
        }
    }
}
