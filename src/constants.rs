//! Compile-time tuning defaults.
//!
//! Every value here is the default for a field of [`crate::config::GameConfig`];
//! a TOML file can override any subset. Speeds are in world units per second,
//! durations in seconds.

// ── World ─────────────────────────────────────────────────────────────────────

pub const WORLD_WIDTH: f32 = 3000.0;
pub const WORLD_HEIGHT: f32 = 3000.0;

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Upper bound on a single frame's delta time.
pub const MAX_FRAME_DELTA: f32 = 0.1;

// ── Match ─────────────────────────────────────────────────────────────────────

pub const PHASE_COUNT: usize = 5;
pub const BOSS_SPAWN_TIME: f32 = 270.0;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_RADIUS: f32 = 32.0;
pub const PLAYER_SPEED: f32 = 180.0;
pub const PLAYER_MAX_HEALTH: f32 = 100.0;
pub const PLAYER_ATTACK: f32 = 1.0;
pub const PLAYER_FIRE_INTERVAL: f32 = 0.5;
pub const PLAYER_MAGNET_RADIUS: f32 = 100.0;
pub const PLAYER_EXP_TO_NEXT: u32 = 100;
/// Pointer distance under which the player stops moving.
pub const PLAYER_DEAD_ZONE: f32 = 5.0;
pub const HIT_INVULNERABILITY: f32 = 1.0;

// ── Progression ───────────────────────────────────────────────────────────────

pub const EXP_GROWTH_FACTOR: f32 = 1.3;
/// Fraction of max health restored on level-up.
pub const LEVEL_UP_HEAL: f32 = 0.05;
pub const UPGRADE_OFFER_SIZE: usize = 3;

// ── Projectiles ───────────────────────────────────────────────────────────────

pub const BULLET_SPEED: f32 = 360.0;
pub const BULLET_RADIUS: f32 = 4.0;
pub const BULLET_LIFETIME: f32 = 1.2;

pub const ENEMY_BULLET_SPEED: f32 = 180.0;
pub const ENEMY_BULLET_RADIUS: f32 = 5.0;
pub const ENEMY_BULLET_LIFETIME: f32 = 4.0;

// ── Enemies ───────────────────────────────────────────────────────────────────

pub const ENEMY_SPAWN_DISTANCE: f32 = 700.0;
pub const DASH_SPEED_FACTOR: f32 = 3.0;
pub const DASH_APPROACH_FACTOR: f32 = 0.5;

// ── Orbs ──────────────────────────────────────────────────────────────────────

pub const ORB_PULL_SPEED: f32 = 240.0;
pub const ORB_MAGNETIZED_PULL_SPEED: f32 = 600.0;

// ── Items ─────────────────────────────────────────────────────────────────────

pub const ITEM_SPAWN_INTERVAL: f32 = 15.0;
pub const ITEM_SPAWN_MIN_DISTANCE: f32 = 300.0;
pub const ITEM_SPAWN_MAX_DISTANCE: f32 = 500.0;
/// Items never spawn closer than this to the world edge.
pub const ITEM_EDGE_MARGIN: f32 = 20.0;

// ── Particles ─────────────────────────────────────────────────────────────────

pub const PARTICLE_LIFETIME: f32 = 0.5;
pub const PARTICLE_BASE_COUNT: usize = 10;
pub const PARTICLE_MIN_SPEED: f32 = 60.0;
pub const PARTICLE_MAX_SPEED: f32 = 240.0;
pub const PARTICLE_MIN_RADIUS: f32 = 2.0;
pub const PARTICLE_MAX_RADIUS: f32 = 5.0;

/// Tolerance used when checking that a weight table sums to one.
pub const WEIGHT_TOLERANCE: f32 = 1e-3;
