//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display frame, no wall-clock reads
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - Sound cues are recorded as events, never played from here

pub mod collision;
pub mod difficulty;
pub mod particles;
pub mod projection;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{in_incinerator_reach, overlaps, resolve_collisions};
pub use projection::{Camera, Projected};
pub use spawner::{spawn_entity, spawn_rate};
pub use state::{
    CollectibleKind, Entity, EntityKind, GameEvent, GamePhase, GameState, LaneMode, ObstacleKind,
    Particle, ParticleKind, Player, PowerupKind, Timers,
};
pub use tick::{TickInput, autopilot, tick};
