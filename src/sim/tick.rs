//! Fixed timestep simulation tick
//!
//! One call advances the run by one display frame. Every step reads and
//! writes [`GameState`] only, so a seed plus an input stream replays exactly.

use super::collision::resolve_collisions;
use super::difficulty;
use super::particles::update_particles;
use super::spawner::update_spawner;
use super::state::{Entity, EntityKind, GameEvent, GameState};
use crate::audio::SoundEffect;
use crate::consts::CAMERA_DISTANCE;
use crate::tuning::*;

/// Input intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Lane the player asked to be in (clamped to the active lane mode)
    pub lane_target: Option<usize>,
    /// Jump request (ignored without the jump powerup)
    pub jump: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if !state.is_playing() {
        return;
    }

    state.time_ticks += 1;

    apply_input(state, input);
    update_jump(state);
    difficulty::advance(state);
    update_spawner(state);
    advance_entities(state);
    resolve_collisions(state);
    update_particles(state);

    state.road_offset = (state.road_offset + state.speed) % ROAD_MARKER_PERIOD;
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    if let Some(target) = input.lane_target {
        let mode = state.lane_mode();
        let target = mode.clamp_lane(target);
        if target != state.player.lane {
            state.player.snap_to_lane(target, mode);
        }
    }

    if input.jump && state.timers.jump_powerup > 0 && !state.player.jump.airborne {
        state.player.jump.airborne = true;
        state.player.jump.velocity = JUMP_VELOCITY;
        state.emit(GameEvent::Sound(SoundEffect::SpeedUp));
    }
}

/// Ballistic jump arc; lands exactly on the road
fn update_jump(state: &mut GameState) {
    let player = &mut state.player;
    if !player.jump.airborne {
        return;
    }
    player.jump.velocity -= GRAVITY;
    player.pos.y += player.jump.velocity;
    if player.pos.y <= 0.0 {
        player.pos.y = 0.0;
        player.jump.velocity = 0.0;
        player.jump.airborne = false;
    }
}

/// Scroll the world toward the camera and drop what is spent
fn advance_entities(state: &mut GameState) {
    state
        .entities
        .retain(|e| !e.collected && e.pos.z > -CAMERA_DISTANCE);
    let speed = state.speed;
    for e in &mut state.entities {
        e.pos.z -= speed;
    }
}

/// Simple lane-keeping bot for demos and headless runs.
///
/// Dodges the nearest obstacle in the current lane, jumping when it can, and
/// otherwise drifts toward the nearest pickup.
pub fn autopilot(state: &GameState) -> TickInput {
    const LOOKAHEAD: f32 = 700.0;

    let player = &state.player;
    let mode = state.lane_mode();
    let ahead = |e: &&Entity| {
        !e.collected && e.pos.z > player.pos.z - 60.0 && e.pos.z < player.pos.z + LOOKAHEAD
    };
    let nearest_obstacle = |lane: usize| {
        state
            .entities
            .iter()
            .filter(ahead)
            .filter(|e| e.lane == lane && matches!(e.kind, EntityKind::Obstacle(_)))
            .map(|e| e.pos.z)
            .fold(f32::INFINITY, f32::min)
    };

    let current = nearest_obstacle(player.lane);
    if current.is_finite() {
        if state.timers.jump_powerup > 0 && !player.jump.airborne {
            return TickInput {
                lane_target: None,
                jump: true,
            };
        }
        // Adjacent lane with the most room
        let best = [player.lane.checked_sub(1), Some(player.lane + 1)]
            .into_iter()
            .flatten()
            .filter(|&lane| lane < mode.count())
            .max_by(|&a, &b| nearest_obstacle(a).total_cmp(&nearest_obstacle(b)));
        return TickInput {
            lane_target: best.filter(|&lane| nearest_obstacle(lane) > current),
            jump: false,
        };
    }

    let pickup = state
        .entities
        .iter()
        .filter(ahead)
        .filter(|e| !matches!(e.kind, EntityKind::Obstacle(_)) && e.lane < mode.count())
        .min_by(|a, b| a.pos.z.total_cmp(&b.pos.z));
    match pickup {
        Some(e) if e.lane.abs_diff(player.lane) == 1 && nearest_obstacle(e.lane).is_infinite() => {
            TickInput {
                lane_target: Some(e.lane),
                jump: false,
            }
        }
        _ => TickInput::default(),
    }
}
