//! Game state and core simulation types
//!
//! Everything a run mutates lives in [`GameState`]. It is rebuilt by
//! [`GameState::reset`] at the start of every run; nothing carries over.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::tuning::*;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing ticks
    #[default]
    Menu,
    /// Active run
    Playing,
    /// Run ended; waiting for a restart
    GameOver,
}

/// Active lane layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneMode {
    Three,
    Two,
}

impl LaneMode {
    pub fn count(self) -> usize {
        self.positions().len()
    }

    pub fn positions(self) -> &'static [f32] {
        match self {
            LaneMode::Three => &LANE_X_POSITIONS,
            LaneMode::Two => &LANE_X_POSITIONS_2,
        }
    }

    /// World x of a lane, clamped into this layout
    pub fn lane_x(self, lane: usize) -> f32 {
        let positions = self.positions();
        positions[lane.min(positions.len() - 1)]
    }

    pub fn clamp_lane(self, lane: usize) -> usize {
        lane.min(self.count() - 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    TrashBag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    Banana,
    StickerPill,
    Sticker3,
    Wallet,
}

impl CollectibleKind {
    /// Score before the combo multiplier
    pub fn base_score(self) -> u64 {
        match self {
            CollectibleKind::Coin => 50,
            CollectibleKind::Banana => 200,
            CollectibleKind::StickerPill => 150,
            CollectibleKind::Sticker3 => 300,
            CollectibleKind::Wallet => 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// +1 life and a score bonus
    Health,
    /// Burns everything ahead in the current lane
    Incinerator,
    /// Unlocks jumping
    Jump,
}

/// What a world entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle(ObstacleKind),
    Collectible(CollectibleKind),
    Powerup(PowerupKind),
}

impl EntityKind {
    pub fn dims(self) -> Dims {
        match self {
            EntityKind::Obstacle(_) => OBSTACLE_SIZE,
            EntityKind::Collectible(_) => COLLECTIBLE_SIZE,
            EntityKind::Powerup(_) => POWERUP_SIZE,
        }
    }
}

/// An obstacle, collectible, or powerup on the road
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub lane: usize,
    pub pos: Vec3,
    pub size: Dims,
    /// Soft delete; collected entities never interact again
    pub collected: bool,
}

/// Vertical jump kinematics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Jump {
    pub airborne: bool,
    pub velocity: f32,
}

/// The truck. Never moves in z; the world scrolls past it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub lane: usize,
    pub pos: Vec3,
    pub size: Dims,
    pub jump: Jump,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            lane: PLAYER_START_LANE,
            pos: Vec3::new(LANE_X_POSITIONS[PLAYER_START_LANE], 0.0, PLAYER_Z),
            size: PLAYER_SIZE,
            jump: Jump::default(),
        }
    }
}

impl Player {
    /// Current height above the road
    pub fn height(&self) -> f32 {
        self.pos.y
    }

    /// Move to `lane` within `mode`, keeping x in sync
    pub fn snap_to_lane(&mut self, lane: usize, mode: LaneMode) {
        self.lane = mode.clamp_lane(lane);
        self.pos.x = mode.lane_x(self.lane);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Exhaust,
    Sparkle,
    Debris,
    DollarBill,
}

/// Visual-only particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec3,
    pub vel: Vec3,
    /// 1.0 at birth, removed at or below 0
    pub life: f32,
    pub size: f32,
    /// Degrees
    pub rotation: f32,
    pub spin: f32,
    pub color: [f32; 4],
}

/// Frame-count timers; each gates one behaviour while positive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timers {
    pub incinerator: u32,
    pub jump_powerup: u32,
    pub two_lane: u32,
    pub shake: u32,
}

/// Something the outside world should hear about, in tick order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ScoreChanged(u64),
    LivesChanged(u8),
    MultiplierChanged(u32),
    Sound(SoundEffect),
    GameOver { final_score: u64 },
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    /// Live entities, spawn order
    pub entities: Vec<Entity>,
    pub particles: Vec<Particle>,
    /// Particle budget (0 disables particle emission)
    pub max_particles: usize,
    pub speed: f32,
    /// Speed at the last milestone cue
    pub speed_milestone: f32,
    /// Ticks since the last spawn attempt
    pub spawn_timer: u32,
    pub score: u64,
    pub lives: u8,
    pub combo: u32,
    pub multiplier: u32,
    pub timers: Timers,
    /// Lane divider scroll, wraps at `ROAD_MARKER_PERIOD`
    pub road_offset: f32,
    pub time_ticks: u64,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            player: Player::default(),
            entities: Vec::new(),
            particles: Vec::new(),
            max_particles: usize::MAX,
            speed: INITIAL_SPEED,
            speed_milestone: INITIAL_SPEED,
            spawn_timer: 0,
            score: 0,
            lives: MAX_LIVES,
            combo: 0,
            multiplier: 1,
            timers: Timers::default(),
            road_offset: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Reinitialise everything for a fresh run with a new seed.
    ///
    /// Phase and particle budget are owned by the caller and kept.
    pub fn reset(&mut self, seed: u64) {
        let phase = self.phase;
        let max_particles = self.max_particles;
        *self = Self::new(seed);
        self.phase = phase;
        self.max_particles = max_particles;
        self.events.push(GameEvent::ScoreChanged(0));
        self.events.push(GameEvent::LivesChanged(MAX_LIVES));
        self.events.push(GameEvent::MultiplierChanged(1));
    }

    pub fn lane_mode(&self) -> LaneMode {
        if self.timers.two_lane > 0 {
            LaneMode::Two
        } else {
            LaneMode::Three
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn add_score(&mut self, points: u64) {
        self.score += points;
        self.emit(GameEvent::ScoreChanged(self.score));
    }
}
