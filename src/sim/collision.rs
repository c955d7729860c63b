//! Collision detection and response
//!
//! Axis-aligned box overlap between the truck and every live entity, plus the
//! incinerator's lane sweep. No swept tests: a large enough per-tick step can
//! tunnel through a thin entity.

use super::difficulty::start_two_lane_mode;
use super::particles::{
    COLOR_COLLECT, COLOR_DEBRIS, COLOR_DOLLAR, COLOR_FIRE, COLOR_POWERUP, emit_burst,
};
use super::state::{
    CollectibleKind, Entity, EntityKind, GameEvent, GamePhase, GameState, ParticleKind, Player,
    PowerupKind,
};
use crate::audio::SoundEffect;
use crate::tuning::*;

/// 3-axis overlap: depth, width, and the jump height gate
pub fn overlaps(player: &Player, entity: &Entity) -> bool {
    let depth = (player.pos.z - entity.pos.z).abs() < (player.size.d + entity.size.d) / 2.0;
    let width = (player.pos.x - entity.pos.x).abs() < (player.size.w + entity.size.w) / 2.0;
    let height = player.height() < entity.size.h;
    depth && width && height
}

/// True when `entity` sits in the incinerator's reach
pub fn in_incinerator_reach(player: &Player, entity: &Entity) -> bool {
    entity.lane == player.lane
        && entity.pos.z > player.pos.z + INCINERATOR_NEAR
        && entity.pos.z < player.pos.z + INCINERATOR_FAR
}

/// Run both collision passes for this tick
pub fn resolve_collisions(state: &mut GameState) {
    if state.timers.incinerator > 0 {
        incinerate_lane(state);
    }

    for idx in 0..state.entities.len() {
        let entity = &state.entities[idx];
        if entity.collected || !overlaps(&state.player, entity) {
            continue;
        }
        let kind = entity.kind;
        match kind {
            EntityKind::Powerup(kind) => collect_powerup(state, idx, kind),
            EntityKind::Collectible(kind) => collect_item(state, idx, kind),
            EntityKind::Obstacle(_) => {
                hit_obstacle(state, idx);
                if state.phase == GamePhase::GameOver {
                    break;
                }
            }
        }
    }
}

fn incinerate_lane(state: &mut GameState) {
    for idx in 0..state.entities.len() {
        let entity = &state.entities[idx];
        if entity.collected || !in_incinerator_reach(&state.player, entity) {
            continue;
        }
        let origin = entity.pos;
        state.entities[idx].collected = true;
        state.add_score(INCINERATOR_BONUS);
        emit_burst(state, ParticleKind::Exhaust, origin, PARTICLE_COUNT_INCINERATE, COLOR_FIRE);
    }
}

fn collect_powerup(state: &mut GameState, idx: usize, kind: PowerupKind) {
    let origin = state.entities[idx].pos;
    state.entities[idx].collected = true;
    log::debug!("powerup {:?}", kind);

    match kind {
        PowerupKind::Incinerator => {
            state.timers.incinerator = INCINERATOR_TICKS;
            state.emit(GameEvent::Sound(SoundEffect::SpeedUp));
        }
        PowerupKind::Jump => {
            state.timers.jump_powerup = JUMP_POWERUP_TICKS;
            state.emit(GameEvent::Sound(SoundEffect::SpeedUp));
        }
        PowerupKind::Health => {
            state.lives = (state.lives + 1).min(LIVES_CAP);
            state.emit(GameEvent::LivesChanged(state.lives));
            state.score += HEALTH_BONUS;
            state.emit(GameEvent::Sound(SoundEffect::Collect));
        }
    }

    state.emit(GameEvent::ScoreChanged(state.score));
    emit_burst(
        state,
        ParticleKind::Sparkle,
        origin,
        PARTICLE_COUNT_COLLECT * 2,
        COLOR_POWERUP,
    );
}

fn collect_item(state: &mut GameState, idx: usize, kind: CollectibleKind) {
    let origin = state.entities[idx].pos;
    state.entities[idx].collected = true;

    if kind == CollectibleKind::Banana {
        start_two_lane_mode(state);
        state.emit(GameEvent::Sound(SoundEffect::SpeedUp));
    }

    state.combo += 1;
    if state.combo % ITEMS_PER_COMBO == 0 {
        state.multiplier = (state.multiplier + 1).min(MAX_MULTIPLIER);
        state.emit(GameEvent::MultiplierChanged(state.multiplier));
    }
    state.add_score(kind.base_score() * u64::from(state.multiplier));
    state.emit(GameEvent::Sound(SoundEffect::Collect));

    emit_burst(state, ParticleKind::Sparkle, origin, PARTICLE_COUNT_COLLECT, COLOR_COLLECT);
    if kind == CollectibleKind::Wallet {
        emit_burst(state, ParticleKind::DollarBill, origin, PARTICLE_COUNT_COLLECT / 3, COLOR_DOLLAR);
    }
}

fn hit_obstacle(state: &mut GameState, idx: usize) {
    let jump = state.player.jump;
    if jump.airborne && state.player.height() > JUMP_EVADE_HEIGHT {
        return;
    }

    let origin = state.entities[idx].pos;
    state.entities[idx].collected = true;
    state.lives = state.lives.saturating_sub(1);
    state.emit(GameEvent::LivesChanged(state.lives));
    state.combo = 0;
    state.multiplier = 1;
    state.emit(GameEvent::MultiplierChanged(1));
    state.timers.shake = SHAKE_TICKS;
    state.emit(GameEvent::Sound(SoundEffect::Hit));
    emit_burst(state, ParticleKind::Debris, origin, PARTICLE_COUNT_COLLISION, COLOR_DEBRIS);

    if state.lives == 0 {
        log::info!("game over: score {}", state.score);
        state.phase = GamePhase::GameOver;
        state.emit(GameEvent::Sound(SoundEffect::GameOver));
        state.emit(GameEvent::GameOver {
            final_score: state.score,
        });
    }
}
