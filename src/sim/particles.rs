//! Visual-only particle bursts
//!
//! Particles draw from the run RNG so a seed reproduces the whole frame, but
//! nothing in here feeds back into gameplay.

use glam::Vec3;
use rand::Rng;

use super::state::{GameState, Particle, ParticleKind};
use crate::tuning::{PARTICLE_DECAY, PARTICLE_GRAVITY};

pub const COLOR_FIRE: [f32; 4] = [1.0, 0.271, 0.0, 1.0];
pub const COLOR_POWERUP: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
pub const COLOR_COLLECT: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
pub const COLOR_DEBRIS: [f32; 4] = [0.533, 0.533, 0.533, 1.0];
pub const COLOR_DOLLAR: [f32; 4] = [0.133, 0.545, 0.133, 1.0];

/// Extra lift exhaust gets per tick on top of gravity
const EXHAUST_BUOYANCY: f32 = 0.15;
const EXHAUST_GROWTH: f32 = 0.2;

/// Spray `count` particles from `origin` in random directions.
///
/// Respects the particle budget, dropping the oldest particles first.
pub fn emit_burst(
    state: &mut GameState,
    kind: ParticleKind,
    origin: Vec3,
    count: usize,
    color: [f32; 4],
) {
    if state.max_particles == 0 {
        return;
    }

    for _ in 0..count {
        let rng = &mut state.rng;
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(2.0..7.0);
        let mut vy = rng.random_range(2.0..7.0);
        if kind == ParticleKind::Exhaust {
            vy = -vy;
        }
        let vz = rng.random_range(-5.0..5.0);

        state.particles.push(Particle {
            kind,
            pos: origin,
            vel: Vec3::new(angle.cos() * speed, vy, vz),
            life: 1.0,
            size: rng.random_range(4.0..12.0),
            rotation: rng.random_range(0.0..360.0),
            spin: rng.random_range(-5.0..5.0),
            color,
        });
    }

    let excess = state.particles.len().saturating_sub(state.max_particles);
    if excess > 0 {
        state.particles.drain(..excess);
    }
}

/// Integrate every particle by one tick and drop the dead ones
pub fn update_particles(state: &mut GameState) {
    let world_speed = state.speed;
    for p in &mut state.particles {
        p.pos += p.vel;
        p.pos.z -= world_speed;
        p.life -= PARTICLE_DECAY;
        p.rotation += p.spin;
        p.vel.y -= PARTICLE_GRAVITY;

        if p.kind == ParticleKind::Exhaust {
            p.size += EXHAUST_GROWTH;
            p.vel.y += EXHAUST_BUOYANCY;
        }
    }
    state.particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_spawns_at_origin() {
        let mut state = GameState::new(9);
        let origin = Vec3::new(10.0, 5.0, 500.0);
        emit_burst(&mut state, ParticleKind::Sparkle, origin, 12, COLOR_COLLECT);
        assert_eq!(state.particles.len(), 12);
        assert!(state.particles.iter().all(|p| p.pos == origin && p.life == 1.0));
    }

    #[test]
    fn test_budget_drops_oldest_first() {
        let mut state = GameState::new(9);
        state.max_particles = 10;
        emit_burst(&mut state, ParticleKind::Debris, Vec3::ZERO, 8, COLOR_DEBRIS);
        emit_burst(&mut state, ParticleKind::Sparkle, Vec3::ONE, 5, COLOR_COLLECT);
        assert_eq!(state.particles.len(), 10);
        let debris = state
            .particles
            .iter()
            .filter(|p| p.kind == ParticleKind::Debris)
            .count();
        assert_eq!(debris, 5);
        assert_eq!(state.particles[9].kind, ParticleKind::Sparkle);
    }

    #[test]
    fn test_zero_budget_emits_nothing() {
        let mut state = GameState::new(9);
        state.max_particles = 0;
        emit_burst(&mut state, ParticleKind::Sparkle, Vec3::ZERO, 30, COLOR_POWERUP);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_particles_expire_after_fifty_ticks() {
        let mut state = GameState::new(9);
        emit_burst(&mut state, ParticleKind::Debris, Vec3::ZERO, 4, COLOR_DEBRIS);
        for _ in 0..49 {
            update_particles(&mut state);
        }
        assert_eq!(state.particles.len(), 4);
        for _ in 0..2 {
            update_particles(&mut state);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_exhaust_grows_and_rides_with_world() {
        let mut state = GameState::new(9);
        emit_burst(&mut state, ParticleKind::Exhaust, Vec3::ZERO, 1, COLOR_FIRE);
        let before = state.particles[0].clone();
        update_particles(&mut state);
        let after = &state.particles[0];
        assert!(after.size > before.size);
        assert!(before.vel.y < 0.0);
        assert!((after.vel.y - (before.vel.y + EXHAUST_BUOYANCY - PARTICLE_GRAVITY)).abs() < 1e-5);
        assert!((after.pos.z - (before.vel.z - state.speed)).abs() < 1e-4);
    }
}
