//! Static game tables: phases, enemy templates, items, upgrades and tuning.
//!
//! [`GameConfig`] mirrors every default in [`crate::constants`].  A TOML file
//! may override any subset of it; missing keys fall back to the compiled
//! defaults.  Whatever the source, the result is checked by
//! [`GameConfig::validate`] before a match can start, so a broken table fails
//! at startup rather than mid-tick.
//!
//! ```toml
//! [player]
//! speed = 200.0
//!
//! [[phases]]
//! name = "Warmup"
//! duration = 30.0
//! spawn_interval = 1.5
//! enemy_multiplier = 1.0
//! weights = [1.0, 0.0, 0.0, 0.0]
//! # ... four more phases
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::constants::*;
use crate::entities::{EnemyKind, ItemKind, Rgb};
use crate::error::{ConfigError, ConfigResult};

// ── Tables ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub max_frame_delta: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            max_frame_delta: MAX_FRAME_DELTA,
        }
    }
}

/// Starting stats of the player.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub radius: f32,
    pub speed: f32,
    pub max_health: f32,
    pub attack: f32,
    pub fire_interval: f32,
    pub regen: f32,
    pub magnet_radius: f32,
    pub shot_count: u32,
    pub piercing: u32,
    pub exp_to_next: u32,
    pub dead_zone: f32,
    pub hit_invulnerability: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            max_health: PLAYER_MAX_HEALTH,
            attack: PLAYER_ATTACK,
            fire_interval: PLAYER_FIRE_INTERVAL,
            regen: 0.0,
            magnet_radius: PLAYER_MAGNET_RADIUS,
            shot_count: 1,
            piercing: 0,
            exp_to_next: PLAYER_EXP_TO_NEXT,
            dead_zone: PLAYER_DEAD_ZONE,
            hit_invulnerability: HIT_INVULNERABILITY,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub speed: f32,
    pub radius: f32,
    pub lifetime: f32,
    pub enemy_radius: f32,
    pub enemy_lifetime: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: BULLET_SPEED,
            radius: BULLET_RADIUS,
            lifetime: BULLET_LIFETIME,
            enemy_radius: ENEMY_BULLET_RADIUS,
            enemy_lifetime: ENEMY_BULLET_LIFETIME,
        }
    }
}

/// One difficulty tier.
#[derive(Debug, Clone, Deserialize)]
pub struct PhaseDef {
    pub name: String,
    /// Seconds this phase lasts.
    pub duration: f32,
    /// Seconds between weighted spawns.
    pub spawn_interval: f32,
    /// Scales spawned enemies' health and speed.
    pub enemy_multiplier: f32,
    /// Spawn probability per kind, in [`EnemyKind::SPAWNABLE`] order.
    pub weights: [f32; 4],
}

impl PhaseDef {
    fn new(name: &str, spawn_interval: f32, enemy_multiplier: f32, weights: [f32; 4]) -> Self {
        Self {
            name: name.to_string(),
            duration: 60.0,
            spawn_interval,
            enemy_multiplier,
            weights,
        }
    }
}

fn default_phases() -> Vec<PhaseDef> {
    vec![
        PhaseDef::new("Phase 1: Opening", 1.0, 1.0, [0.6, 0.2, 0.1, 0.1]),
        PhaseDef::new("Phase 2: Rising", 0.7, 1.2, [0.4, 0.3, 0.15, 0.15]),
        PhaseDef::new("Phase 3: Escalation", 0.5, 1.5, [0.3, 0.3, 0.2, 0.2]),
        PhaseDef::new("Phase 4: Crisis", 0.4, 2.0, [0.25, 0.25, 0.25, 0.25]),
        PhaseDef::new("Phase 5: Last Stand", 0.3, 2.5, [0.2, 0.3, 0.2, 0.3]),
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashParams {
    /// Seconds of approach before each dash.
    pub cooldown: f32,
    /// Seconds a dash lasts.
    pub duration: f32,
    /// Dash speed as a multiple of base speed.
    pub speed_factor: f32,
    /// Approach speed as a multiple of base speed.
    pub approach_factor: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RangedParams {
    /// Seconds between volleys.
    pub interval: f32,
    /// Preferred distance to the player (shooter movement only).
    pub standoff: f32,
    /// Retreat begins at `standoff - margin`.
    pub margin: f32,
    /// Projectiles per volley.
    pub projectiles: u32,
    /// Total fan angle of a volley, radians.
    pub spread: f32,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnemyTemplate {
    pub health: f32,
    pub speed: f32,
    pub radius: f32,
    pub exp_value: u32,
    pub contact_damage: f32,
    pub color: Rgb,
    #[serde(default)]
    pub dash: Option<DashParams>,
    #[serde(default)]
    pub ranged: Option<RangedParams>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub chaser: EnemyTemplate,
    pub dasher: EnemyTemplate,
    pub tank: EnemyTemplate,
    pub shooter: EnemyTemplate,
    pub boss: EnemyTemplate,
    pub spawn_distance: f32,
}

impl EnemyTable {
    pub fn get(&self, kind: EnemyKind) -> &EnemyTemplate {
        match kind {
            EnemyKind::Chaser => &self.chaser,
            EnemyKind::Dasher => &self.dasher,
            EnemyKind::Tank => &self.tank,
            EnemyKind::Shooter => &self.shooter,
            EnemyKind::Boss => &self.boss,
        }
    }
}

impl Default for EnemyTable {
    fn default() -> Self {
        let plain = |health, speed, radius, exp_value, color| EnemyTemplate {
            health,
            speed,
            radius,
            exp_value,
            contact_damage: 10.0,
            color,
            dash: None,
            ranged: None,
        };
        Self {
            chaser: plain(3.0, 72.0, 12.0, 20, Rgb(255, 0, 0)),
            dasher: EnemyTemplate {
                dash: Some(DashParams {
                    cooldown: 2.0,
                    duration: 0.33,
                    speed_factor: DASH_SPEED_FACTOR,
                    approach_factor: DASH_APPROACH_FACTOR,
                }),
                ..plain(2.0, 150.0, 10.0, 25, Rgb(255, 165, 0))
            },
            tank: plain(10.0, 36.0, 18.0, 50, Rgb(139, 0, 0)),
            shooter: EnemyTemplate {
                ranged: Some(RangedParams {
                    interval: 1.5,
                    standoff: 250.0,
                    margin: 50.0,
                    projectiles: 1,
                    spread: 0.0,
                    bullet_speed: ENEMY_BULLET_SPEED,
                    bullet_damage: 5.0,
                }),
                ..plain(3.0, 48.0, 12.0, 35, Rgb(128, 0, 128))
            },
            boss: EnemyTemplate {
                contact_damage: 20.0,
                dash: Some(DashParams {
                    cooldown: 3.0,
                    duration: 0.4,
                    speed_factor: DASH_SPEED_FACTOR,
                    approach_factor: 1.0,
                }),
                ranged: Some(RangedParams {
                    interval: 2.0,
                    standoff: 0.0,
                    margin: 0.0,
                    projectiles: 5,
                    spread: std::f32::consts::FRAC_PI_3,
                    bullet_speed: 200.0,
                    bullet_damage: 8.0,
                }),
                ..plain(500.0, 90.0, 40.0, 500, Rgb(220, 0, 255))
            },
            spawn_distance: ENEMY_SPAWN_DISTANCE,
        }
    }
}

/// What an item does when picked up.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemEffect {
    Heal { amount: f32 },
    Invulnerability { seconds: f32 },
    ClearEnemies,
    MagnetizeOrbs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemDef {
    pub kind: ItemKind,
    pub color: Rgb,
    pub radius: f32,
    /// Spawn probability; the table's chances sum to one.
    pub chance: f32,
    pub effect: ItemEffect,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    pub spawn_interval: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub edge_margin: f32,
    pub table: Vec<ItemDef>,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            spawn_interval: ITEM_SPAWN_INTERVAL,
            min_distance: ITEM_SPAWN_MIN_DISTANCE,
            max_distance: ITEM_SPAWN_MAX_DISTANCE,
            edge_margin: ITEM_EDGE_MARGIN,
            table: vec![
                ItemDef {
                    kind: ItemKind::Heart,
                    color: Rgb(255, 77, 77),
                    radius: 10.0,
                    chance: 0.5,
                    effect: ItemEffect::Heal { amount: 30.0 },
                },
                ItemDef {
                    kind: ItemKind::Star,
                    color: Rgb(255, 255, 77),
                    radius: 12.0,
                    chance: 0.2,
                    effect: ItemEffect::Invulnerability { seconds: 10.0 },
                },
                ItemDef {
                    kind: ItemKind::Bomb,
                    color: Rgb(255, 128, 0),
                    radius: 10.0,
                    chance: 0.15,
                    effect: ItemEffect::ClearEnemies,
                },
                ItemDef {
                    kind: ItemKind::Magnet,
                    color: Rgb(77, 255, 255),
                    radius: 10.0,
                    chance: 0.15,
                    effect: ItemEffect::MagnetizeOrbs,
                },
            ],
        }
    }
}

/// Stat change granted by an upgrade.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpgradeEffect {
    Attack { factor: f32 },
    MoveSpeed { factor: f32 },
    FireInterval { factor: f32 },
    MaxHealth { amount: f32 },
    Regen { amount: f32 },
    MagnetRadius { factor: f32 },
    ShotCount { amount: u32 },
    Piercing { amount: u32 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpgradeDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub effect: UpgradeEffect,
}

fn upgrade(id: &str, name: &str, description: &str, effect: UpgradeEffect) -> UpgradeDef {
    UpgradeDef {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        effect,
    }
}

fn default_upgrades() -> Vec<UpgradeDef> {
    vec![
        upgrade(
            "atk",
            "Attack +50%",
            "Bullets deal more damage",
            UpgradeEffect::Attack { factor: 1.5 },
        ),
        upgrade(
            "speed",
            "Move Speed +10%",
            "Move faster",
            UpgradeEffect::MoveSpeed { factor: 1.1 },
        ),
        upgrade(
            "fire_rate",
            "Fire Rate +20%",
            "Shorter shot cooldown",
            UpgradeEffect::FireInterval { factor: 0.8 },
        ),
        upgrade(
            "hp",
            "Max Health +20",
            "Raise the health cap",
            UpgradeEffect::MaxHealth { amount: 20.0 },
        ),
        upgrade(
            "regen",
            "Regen +0.1/s",
            "Recover health over time",
            UpgradeEffect::Regen { amount: 0.1 },
        ),
        upgrade(
            "magnet",
            "Pickup Range +30%",
            "Collect experience from further away",
            UpgradeEffect::MagnetRadius { factor: 1.3 },
        ),
        upgrade(
            "bullet_count",
            "Bullets +1",
            "Fire at one more target per volley",
            UpgradeEffect::ShotCount { amount: 1 },
        ),
        upgrade(
            "piercing",
            "Piercing +1",
            "Bullets pass through one more enemy",
            UpgradeEffect::Piercing { amount: 1 },
        ),
    ]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub exp_growth: f32,
    pub level_up_heal: f32,
    pub offer_size: usize,
    pub upgrades: Vec<UpgradeDef>,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            exp_growth: EXP_GROWTH_FACTOR,
            level_up_heal: LEVEL_UP_HEAL,
            offer_size: UPGRADE_OFFER_SIZE,
            upgrades: default_upgrades(),
        }
    }
}

/// Visual tier of an experience orb, picked by value.
#[derive(Debug, Clone, Deserialize)]
pub struct OrbTier {
    pub min_value: u32,
    pub radius: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrbConfig {
    pub pull_speed: f32,
    pub magnetized_pull_speed: f32,
    /// Ascending by `min_value`.
    pub tiers: Vec<OrbTier>,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            pull_speed: ORB_PULL_SPEED,
            magnetized_pull_speed: ORB_MAGNETIZED_PULL_SPEED,
            tiers: vec![
                OrbTier { min_value: 0, radius: 5.0, color: Rgb(77, 166, 255) },
                OrbTier { min_value: 30, radius: 7.0, color: Rgb(77, 255, 136) },
                OrbTier { min_value: 50, radius: 9.0, color: Rgb(255, 215, 0) },
                OrbTier { min_value: 100, radius: 12.0, color: Rgb(255, 77, 77) },
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub lifetime: f32,
    pub base_count: usize,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            lifetime: PARTICLE_LIFETIME,
            base_count: PARTICLE_BASE_COUNT,
            min_speed: PARTICLE_MIN_SPEED,
            max_speed: PARTICLE_MAX_SPEED,
            min_radius: PARTICLE_MIN_RADIUS,
            max_radius: PARTICLE_MAX_RADIUS,
        }
    }
}

// ── Root ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub projectiles: ProjectileConfig,
    pub phases: Vec<PhaseDef>,
    /// Game time at which the boss appears.
    pub boss_spawn_time: f32,
    pub enemies: EnemyTable,
    pub items: ItemConfig,
    pub progression: ProgressionConfig,
    pub orbs: OrbConfig,
    pub particles: ParticleConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
            projectiles: ProjectileConfig::default(),
            phases: default_phases(),
            boss_spawn_time: BOSS_SPAWN_TIME,
            enemies: EnemyTable::default(),
            items: ItemConfig::default(),
            progression: ProgressionConfig::default(),
            orbs: OrbConfig::default(),
            particles: ParticleConfig::default(),
        }
    }
}

impl GameConfig {
    /// Read, parse and validate a TOML config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Parse and validate TOML text; `origin` only labels errors.
    pub fn parse(contents: &str, origin: &Path) -> ConfigResult<Self> {
        let config: GameConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Total match length: the sum of all phase durations.
    pub fn match_duration(&self) -> f32 {
        self.phases.iter().map(|p| p.duration).sum()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        positive("world.width", self.world.width)?;
        positive("world.height", self.world.height)?;
        positive("world.max_frame_delta", self.world.max_frame_delta)?;
        positive("player.radius", self.player.radius)?;
        positive("player.max_health", self.player.max_health)?;
        positive("player.fire_interval", self.player.fire_interval)?;
        positive("player.hit_invulnerability", self.player.hit_invulnerability)?;
        positive("projectiles.speed", self.projectiles.speed)?;
        positive("projectiles.lifetime", self.projectiles.lifetime)?;
        positive("progression.exp_growth", self.progression.exp_growth)?;
        if self.player.exp_to_next == 0 {
            return Err(ConfigError::OutOfRange { name: "player.exp_to_next", value: 0.0 });
        }

        self.validate_phases()?;
        self.validate_enemies()?;
        self.validate_items()?;

        if self.progression.upgrades.is_empty() {
            return Err(ConfigError::InvalidUpgrades("catalog is empty"));
        }
        if self.progression.offer_size == 0 {
            return Err(ConfigError::InvalidUpgrades("offer size must be at least 1"));
        }
        let particles = &self.particles;
        if !(particles.min_speed <= particles.max_speed
            && particles.min_radius <= particles.max_radius)
        {
            return Err(ConfigError::OutOfRange {
                name: "particles.min_speed/min_radius",
                value: particles.min_speed,
            });
        }
        if self.orbs.tiers.is_empty() {
            return Err(ConfigError::OutOfRange { name: "orbs.tiers", value: 0.0 });
        }

        let match_duration = self.match_duration();
        if !(self.boss_spawn_time > 0.0 && self.boss_spawn_time < match_duration) {
            return Err(ConfigError::BossTime {
                boss_time: self.boss_spawn_time,
                match_duration,
            });
        }
        Ok(())
    }

    fn validate_phases(&self) -> ConfigResult<()> {
        if self.phases.len() != PHASE_COUNT {
            return Err(ConfigError::PhaseCount {
                expected: PHASE_COUNT,
                found: self.phases.len(),
            });
        }
        for (index, phase) in self.phases.iter().enumerate() {
            let invalid = |reason| ConfigError::InvalidPhase {
                index,
                name: phase.name.clone(),
                reason,
            };
            if !(phase.duration > 0.0) {
                return Err(invalid("duration must be positive"));
            }
            if !(phase.spawn_interval > 0.0) {
                return Err(invalid("spawn interval must be positive"));
            }
            if !(phase.enemy_multiplier > 0.0) {
                return Err(invalid("enemy multiplier must be positive"));
            }
            if phase.weights.iter().any(|w| !(*w >= 0.0)) {
                return Err(invalid("weights must be non-negative"));
            }
            let sum: f32 = phase.weights.iter().sum();
            if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
                return Err(ConfigError::WeightSum { index, sum });
            }
        }
        Ok(())
    }

    fn validate_enemies(&self) -> ConfigResult<()> {
        for kind in EnemyKind::SPAWNABLE.into_iter().chain([EnemyKind::Boss]) {
            let template = self.enemies.get(kind);
            let invalid = |reason| ConfigError::InvalidTemplate { kind, reason };
            if !(template.health > 0.0) {
                return Err(invalid("health must be positive"));
            }
            if !(template.radius > 0.0) {
                return Err(invalid("radius must be positive"));
            }
            if !(template.speed >= 0.0) {
                return Err(invalid("speed must not be negative"));
            }
            let needs_dash = matches!(kind, EnemyKind::Dasher | EnemyKind::Boss);
            let needs_ranged = matches!(kind, EnemyKind::Shooter | EnemyKind::Boss);
            match &template.dash {
                None if needs_dash => return Err(invalid("missing dash parameters")),
                Some(dash) if !(dash.cooldown > 0.0 && dash.duration > 0.0) => {
                    return Err(invalid("dash cooldown and duration must be positive"))
                }
                _ => {}
            }
            match &template.ranged {
                None if needs_ranged => return Err(invalid("missing ranged parameters")),
                Some(ranged) if !(ranged.interval > 0.0) || ranged.projectiles == 0 => {
                    return Err(invalid("ranged interval and projectile count must be positive"))
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn validate_items(&self) -> ConfigResult<()> {
        let items = &self.items;
        if items.table.is_empty() {
            return Err(ConfigError::InvalidItems("table is empty"));
        }
        if !(items.spawn_interval > 0.0) {
            return Err(ConfigError::InvalidItems("spawn interval must be positive"));
        }
        if !(items.min_distance >= 0.0 && items.max_distance >= items.min_distance) {
            return Err(ConfigError::InvalidItems("spawn annulus is inverted"));
        }
        if items.table.iter().any(|item| !(item.chance >= 0.0)) {
            return Err(ConfigError::InvalidItems("chances must be non-negative"));
        }
        let sum: f32 = items.table.iter().map(|item| item.chance).sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::InvalidItems("chances must sum to 1"));
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> ConfigResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value })
    }
}
