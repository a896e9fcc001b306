//! All game entity types. Pure data, no logic.

use std::sync::Arc;

use glam::Vec2;
use serde::Deserialize;

use crate::clock::Clock;
use crate::config::{GameConfig, ItemEffect, UpgradeDef};

/// 8-bit RGB colour, written as `[r, g, b]` in config files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Chaser,
    Dasher,
    Tank,
    Shooter,
    Boss,
}

impl EnemyKind {
    /// Kinds the weighted spawner may pick, in phase-weight order.
    pub const SPAWNABLE: [EnemyKind; 4] = [
        EnemyKind::Chaser,
        EnemyKind::Dasher,
        EnemyKind::Tank,
        EnemyKind::Shooter,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Restores health.
    Heart,
    /// Temporary invulnerability.
    Star,
    /// Clears every non-boss enemy, dropping their experience.
    Bomb,
    /// Pulls every orb on the field toward the player.
    Magnet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Paused by the player.
    Paused,
    /// Paused while an upgrade offer is waiting for a choice.
    LevelUp,
    Victory,
    Defeat,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::Victory | GameStatus::Defeat)
    }

    pub fn is_paused(self) -> bool {
        matches!(self, GameStatus::Paused | GameStatus::LevelUp)
    }
}

/// Fire-and-forget notifications for the audio/UI layer.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    LevelUp { level: u32 },
    Victory,
    Defeat,
    ItemApplied(ItemKind),
    EnemyKilled(EnemyKind),
    ShotFired { count: usize },
    BossSpawned,
    PhaseChanged { phase: usize },
    PlayerDamaged { amount: f32 },
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub level: u32,
    pub exp: u32,
    pub exp_to_next: u32,
    pub max_health: f32,
    pub health: f32,
    pub attack: f32,
    /// Seconds between volleys.
    pub fire_interval: f32,
    /// Health restored per second.
    pub regen: f32,
    pub magnet_radius: f32,
    /// Projectiles per volley.
    pub shot_count: u32,
    /// Extra enemies a projectile may pass through.
    pub piercing: u32,
    pub hit_invulnerable: bool,
    pub hit_invulnerable_timer: f32,
    pub item_invulnerable: bool,
    pub item_invulnerable_timer: f32,
    /// Whether the player moved this tick (animation hint).
    pub moving: bool,
}

impl Player {
    pub fn is_invulnerable(&self) -> bool {
        self.hit_invulnerable || self.item_invulnerable
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct DashState {
    /// Seconds accumulated in the current phase of the cycle.
    pub timer: f32,
    pub dashing: bool,
    /// Velocity locked in when the dash started.
    pub velocity: Vec2,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub radius: f32,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub exp_value: u32,
    pub contact_damage: f32,
    pub color: Rgb,
    pub dash: DashState,
    /// Game time of the last ranged attack.
    pub last_shot: f32,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Game time the bullet was fired.
    pub born: f32,
    /// Enemies hit so far.
    pub hits: u32,
}

#[derive(Clone, Debug)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub born: f32,
    pub damage: f32,
}

// ── Pickups ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ExpOrb {
    pub pos: Vec2,
    pub value: u32,
    pub radius: f32,
    pub color: Rgb,
    pub magnetized: bool,
}

#[derive(Clone, Debug)]
pub struct Item {
    pub pos: Vec2,
    pub kind: ItemKind,
    pub radius: f32,
    pub color: Rgb,
    pub effect: ItemEffect,
}

// ── Effects ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime in seconds.
    pub life: f32,
    pub max_life: f32,
    pub radius: f32,
    pub color: Rgb,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire match state.  Cloneable so the pure update functions in
/// [`crate::compute`] can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Static tables, shared between clones.
    pub config: Arc<GameConfig>,
    pub clock: Clock,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub orbs: Vec<ExpOrb>,
    pub items: Vec<Item>,
    pub particles: Vec<Particle>,
    /// Index into `config.phases`.
    pub phase: usize,
    /// Unpaused seconds since match start, as of the last tick.
    pub game_time: f32,
    pub last_enemy_spawn: f32,
    pub last_item_spawn: f32,
    /// Game time of the last volley; `None` until the first shot.
    pub last_shot: Option<f32>,
    pub boss_spawned: bool,
    pub kills: u32,
    /// Upgrades on offer while `status == LevelUp`.
    pub upgrade_choices: Vec<UpgradeDef>,
    pub status: GameStatus,
    pub frame: u64,
    /// Events raised during the most recent call into `compute`.
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.config.world.width, self.config.world.height)
    }
}
