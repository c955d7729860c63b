//! Game balance
//!
//! Every gameplay number lives here. Distances are world units, durations
//! are ticks (see `consts::TICKS_PER_SECOND`), speeds are world units per tick.

/// Box dimensions of an entity (width x height x depth)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dims {
    pub w: f32,
    pub h: f32,
    pub d: f32,
}

impl Dims {
    pub const fn new(w: f32, h: f32, d: f32) -> Self {
        Self { w, h, d }
    }
}

// === Lanes ===

/// Lane centres in three-lane mode
pub const LANE_X_POSITIONS: [f32; 3] = [-150.0, 0.0, 150.0];
/// Lane centres in two-lane mode
pub const LANE_X_POSITIONS_2: [f32; 2] = [-75.0, 75.0];
pub const LANE_WIDTH: f32 = 150.0;

// === Player ===

pub const PLAYER_Z: f32 = 100.0;
pub const PLAYER_SIZE: Dims = Dims::new(80.0, 60.0, 100.0);
pub const PLAYER_START_LANE: usize = 1;

// === Speed ===

pub const INITIAL_SPEED: f32 = 10.0;
pub const SPEED_INCREMENT: f32 = 0.005;
pub const MAX_SPEED: f32 = 30.0;
/// Speed gain that counts as a milestone
pub const SPEED_MILESTONE_STEP: f32 = 5.0;

// === Spawning ===

pub const SPAWN_DISTANCE: f32 = 3000.0;
/// Ticks between spawn attempts at initial speed
pub const SPAWN_RATE_INITIAL: f32 = 50.0;
pub const MIN_SPAWN_RATE: f32 = 20.0;
/// Ticks shaved off the spawn interval per unit of speed gained
pub const SPAWN_RATE_PER_SPEED: f32 = 0.5;
pub const SPAWN_LATERAL_CLEARANCE: f32 = 100.0;
pub const SPAWN_DEPTH_CLEARANCE: f32 = 400.0;

pub const OBSTACLE_SIZE: Dims = Dims::new(70.0, 70.0, 60.0);
pub const COLLECTIBLE_SIZE: Dims = Dims::new(60.0, 60.0, 60.0);
pub const POWERUP_SIZE: Dims = Dims::new(80.0, 80.0, 60.0);

// === Lives & scoring ===

pub const MAX_LIVES: u8 = 3;
/// Health powerups may push lives past the starting count up to this
pub const LIVES_CAP: u8 = MAX_LIVES + 2;
pub const ITEMS_PER_COMBO: u32 = 5;
pub const MAX_MULTIPLIER: u32 = 10;
pub const HEALTH_BONUS: u64 = 1000;
pub const INCINERATOR_BONUS: u64 = 50;

// === Timed modes ===

pub const INCINERATOR_TICKS: u32 = 300;
pub const JUMP_POWERUP_TICKS: u32 = 300;
pub const TWO_LANE_TICKS: u32 = 600;
pub const SHAKE_TICKS: u32 = 20;

/// Incinerator reach ahead of the player, exclusive on both ends
pub const INCINERATOR_NEAR: f32 = 50.0;
pub const INCINERATOR_FAR: f32 = 800.0;

// === Jump ===

pub const JUMP_VELOCITY: f32 = 15.0;
pub const GRAVITY: f32 = 0.8;
/// Obstacles are cleared when airborne above this height
pub const JUMP_EVADE_HEIGHT: f32 = 50.0;

// === Input ===

pub const SWIPE_THRESHOLD: f32 = 50.0;

// === Particles ===

pub const PARTICLE_COUNT_COLLECT: usize = 15;
pub const PARTICLE_COUNT_COLLISION: usize = 20;
pub const PARTICLE_COUNT_INCINERATE: usize = 10;
pub const PARTICLE_DECAY: f32 = 0.02;
pub const PARTICLE_GRAVITY: f32 = 0.1;

// === Road ===

/// Lane divider dash period along z
pub const ROAD_MARKER_PERIOD: f32 = 400.0;
pub const ROAD_MARKER_LENGTH: f32 = 200.0;
/// Half width of the road surface per lane mode
pub const ROAD_HALF_WIDTH_3: f32 = 300.0;
pub const ROAD_HALF_WIDTH_2: f32 = 200.0;
