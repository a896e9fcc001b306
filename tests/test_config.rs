use std::path::Path;

use survival_arena::config::*;
use survival_arena::entities::{EnemyKind, ItemKind};
use survival_arena::error::ConfigError;

fn parse(contents: &str) -> Result<GameConfig, ConfigError> {
    GameConfig::parse(contents, Path::new("test.toml"))
}

// ── defaults ──────────────────────────────────────────────────────────────────

#[test]
fn default_config_is_valid() {
    let config = GameConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.phases.len(), 5);
    assert_eq!(config.match_duration(), 300.0);
    assert_eq!(config.boss_spawn_time, 270.0);
}

#[test]
fn default_tables_match_game_balance() {
    let config = GameConfig::default();
    assert_eq!(config.enemies.chaser.health, 3.0);
    assert_eq!(config.enemies.tank.exp_value, 50);
    assert!(config.enemies.dasher.dash.is_some());
    assert!(config.enemies.shooter.ranged.is_some());
    assert_eq!(config.items.table.len(), 4);
    assert_eq!(config.progression.upgrades.len(), 8);
    assert_eq!(config.phases[4].enemy_multiplier, 2.5);
}

#[test]
fn empty_file_yields_defaults() {
    let config = parse("").unwrap();
    assert_eq!(config.player.speed, 180.0);
    assert_eq!(config.phases.len(), 5);
}

// ── overrides ─────────────────────────────────────────────────────────────────

#[test]
fn partial_override_keeps_other_defaults() {
    let config = parse(
        r#"
        [player]
        speed = 200.0
        max_health = 150.0
        "#,
    )
    .unwrap();
    assert_eq!(config.player.speed, 200.0);
    assert_eq!(config.player.max_health, 150.0);
    assert_eq!(config.player.radius, 32.0);
    assert_eq!(config.world.width, 3000.0);
}

#[test]
fn custom_phase_table() {
    let mut toml = String::from("boss_spawn_time = 40.0\n");
    for i in 0..5 {
        toml.push_str(&format!("[[phases]]\nname = \"P{i}\"\nduration = 10.0\n"));
        toml.push_str("spawn_interval = 0.5\nenemy_multiplier = 1.0\nweights = [1.0, 0.0, 0.0, 0.0]\n");
    }
    let config = parse(&toml).unwrap();
    assert_eq!(config.match_duration(), 50.0);
    assert_eq!(config.phases[3].name, "P3");
}

#[test]
fn item_table_with_tagged_effects() {
    let config = parse(
        r#"
        [[items.table]]
        kind = "heart"
        color = [255, 0, 0]
        radius = 10.0
        chance = 0.75
        effect = { type = "heal", amount = 50.0 }

        [[items.table]]
        kind = "bomb"
        color = [255, 128, 0]
        radius = 10.0
        chance = 0.25
        effect = { type = "clear_enemies" }
        "#,
    )
    .unwrap();
    assert_eq!(config.items.table.len(), 2);
    assert_eq!(config.items.table[0].kind, ItemKind::Heart);
    assert_eq!(config.items.table[0].effect, ItemEffect::Heal { amount: 50.0 });
    assert_eq!(config.items.table[1].effect, ItemEffect::ClearEnemies);
}

// ── errors ────────────────────────────────────────────────────────────────────

#[test]
fn malformed_toml_is_parse_error() {
    let err = parse("[player\nspeed = ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn missing_file_is_io_error() {
    let err = GameConfig::load(Path::new("/nonexistent/arena.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn wrong_phase_count_rejected() {
    let mut config = GameConfig::default();
    config.phases.truncate(3);
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::PhaseCount { expected: 5, found: 3 }));
}

#[test]
fn weights_must_sum_to_one() {
    let mut config = GameConfig::default();
    config.phases[2].weights = [0.5, 0.5, 0.5, 0.0];
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::WeightSum { index: 2, .. }));
}

#[test]
fn negative_weight_rejected() {
    let mut config = GameConfig::default();
    config.phases[0].weights = [1.2, -0.2, 0.0, 0.0];
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPhase { index: 0, .. }));
}

#[test]
fn zero_spawn_interval_rejected() {
    let mut config = GameConfig::default();
    config.phases[1].spawn_interval = 0.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidPhase { index: 1, .. })
    ));
}

#[test]
fn boss_time_outside_match_rejected() {
    let mut config = GameConfig::default();
    config.boss_spawn_time = 300.0;
    assert!(matches!(config.validate(), Err(ConfigError::BossTime { .. })));
}

#[test]
fn dasher_without_dash_params_rejected() {
    let mut config = GameConfig::default();
    config.enemies.dasher.dash = None;
    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidTemplate { kind: EnemyKind::Dasher, .. }
    ));
}

#[test]
fn item_chances_must_sum_to_one() {
    let mut config = GameConfig::default();
    config.items.table[0].chance = 0.9;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidItems(_))));
}

#[test]
fn empty_upgrade_catalog_rejected() {
    let mut config = GameConfig::default();
    config.progression.upgrades.clear();
    assert!(matches!(config.validate(), Err(ConfigError::InvalidUpgrades(_))));
}

#[test]
fn non_positive_world_rejected() {
    let mut config = GameConfig::default();
    config.world.width = 0.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange { name: "world.width", .. })
    ));
}

#[test]
fn error_messages_name_the_problem() {
    let mut config = GameConfig::default();
    config.phases[2].weights = [0.5, 0.5, 0.5, 0.0];
    let msg = config.validate().unwrap_err().to_string();
    assert!(msg.contains("phase 2"), "{msg}");
}

#[test]
fn bundled_sample_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/arena.toml");
    let config = GameConfig::load(&path).unwrap();
    assert_eq!(config.enemies.tank.health, 12.0);
    assert_eq!(config.enemies.chaser.health, 3.0);
    assert_eq!(config.match_duration(), 300.0);
}
