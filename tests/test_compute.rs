use std::sync::Arc;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use survival_arena::compute::*;
use survival_arena::config::GameConfig;
use survival_arena::entities::*;
use survival_arena::error::ConfigError;
use survival_arena::player::FrameInput;
use survival_arena::progression::{gain_exp, spawn_orb};

fn make_state() -> GameState {
    init_state(Arc::new(GameConfig::default()), 0.0).unwrap()
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn count_events(state: &GameState, pred: impl Fn(&GameEvent) -> bool) -> usize {
    state.events.iter().filter(|e| pred(e)).count()
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_at_world_centre() {
    let s = make_state();
    assert_eq!(s.player.pos, Vec2::new(1500.0, 1500.0));
    assert_eq!(s.player.health, 100.0);
    assert_eq!(s.player.level, 1);
    assert_eq!(s.player.exp_to_next, 100);
}

#[test]
fn init_state_empty_collections() {
    let s = make_state();
    assert!(s.enemies.is_empty());
    assert!(s.bullets.is_empty());
    assert!(s.orbs.is_empty());
    assert!(s.items.is_empty());
    assert_eq!(s.kills, 0);
    assert_eq!(s.frame, 0);
    assert_eq!(s.phase, 0);
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn init_state_rejects_invalid_config() {
    let mut config = GameConfig::default();
    config.phases.pop();
    let err = init_state(Arc::new(config), 0.0).unwrap_err();
    assert!(matches!(err, ConfigError::PhaseCount { expected: 5, found: 4 }));
}

// ── tick: timing and movement ────────────────────────────────────────────────

#[test]
fn tick_increments_frame() {
    let s = make_state();
    let s2 = tick(&s, &FrameInput::idle(), 0.0, &mut seeded_rng());
    assert_eq!(s2.frame, 1);
}

#[test]
fn tick_first_frame_does_not_move() {
    let s = make_state();
    let input = FrameInput::toward(Vec2::new(2000.0, 1500.0));
    let s2 = tick(&s, &input, 0.0, &mut seeded_rng());
    assert_eq!(s2.player.pos, s.player.pos);
}

#[test]
fn tick_moves_player_toward_target() {
    let mut rng = seeded_rng();
    let input = FrameInput::toward(Vec2::new(2000.0, 1500.0));
    let s = tick(&make_state(), &input, 0.0, &mut rng);
    let s2 = tick(&s, &input, 50.0, &mut rng);
    // 180 u/s for 0.05 s
    assert!((s2.player.pos.x - 1509.0).abs() < 1e-3);
    assert_eq!(s2.player.pos.y, 1500.0);
    assert!(s2.player.moving);
}

#[test]
fn tick_ignores_target_inside_dead_zone() {
    let mut rng = seeded_rng();
    let input = FrameInput::toward(Vec2::new(1503.0, 1500.0));
    let s = tick(&make_state(), &input, 0.0, &mut rng);
    let s2 = tick(&s, &input, 50.0, &mut rng);
    assert_eq!(s2.player.pos, s.player.pos);
    assert!(!s2.player.moving);
}

#[test]
fn tick_clamps_long_frames() {
    let mut rng = seeded_rng();
    let input = FrameInput::toward(Vec2::new(2000.0, 1500.0));
    let s = tick(&make_state(), &input, 0.0, &mut rng);
    let s2 = tick(&s, &input, 1000.0, &mut rng);
    // Delta clamped to 0.1 s
    assert!((s2.player.pos.x - 1518.0).abs() < 1e-3);
    assert!((s2.game_time - 1.0).abs() < 1e-6);
}

#[test]
fn tick_player_stays_inside_world() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.player.pos = Vec2::new(40.0, 40.0);
    let input = FrameInput::toward(Vec2::new(-500.0, -500.0));
    let mut now = 0.0;
    for _ in 0..20 {
        s = tick(&s, &input, now, &mut rng);
        now += 100.0;
    }
    assert_eq!(s.player.pos, Vec2::splat(s.player.radius));
}

#[test]
fn tick_does_not_mutate_original() {
    let s = make_state();
    let _ = tick(&s, &FrameInput::toward(Vec2::ZERO), 0.0, &mut seeded_rng());
    assert_eq!(s.frame, 0);
    assert_eq!(s.player.pos, Vec2::new(1500.0, 1500.0));
}

#[test]
fn tick_clears_previous_events() {
    let mut s = make_state();
    s.events.push(GameEvent::BossSpawned);
    let s2 = tick(&s, &FrameInput::idle(), 0.0, &mut seeded_rng());
    assert!(s2.events.is_empty());
}

// ── tick: match flow ────────────────────────────────────────────────────────

#[test]
fn tick_victory_at_match_end() {
    let mut rng = seeded_rng();
    let s = tick(&make_state(), &FrameInput::idle(), 0.0, &mut rng);
    let s2 = tick(&s, &FrameInput::idle(), 300_000.0, &mut rng);
    assert_eq!(s2.status, GameStatus::Victory);
    assert_eq!(count_events(&s2, |e| *e == GameEvent::Victory), 1);
}

#[test]
fn tick_after_victory_is_inert() {
    let mut rng = seeded_rng();
    let s = tick(&make_state(), &FrameInput::idle(), 0.0, &mut rng);
    let s2 = tick(&s, &FrameInput::idle(), 300_000.0, &mut rng);
    let s3 = tick(&s2, &FrameInput::idle(), 301_000.0, &mut rng);
    assert_eq!(s3.status, GameStatus::Victory);
    assert_eq!(s3.frame, s2.frame);
    assert!(s3.events.is_empty());
}

#[test]
fn tick_phases_never_decrease() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    let mut last_phase = 0;
    for now in [0.0, 30_000.0, 61_000.0, 130_000.0, 190_000.0, 250_000.0, 299_000.0] {
        s = tick(&s, &FrameInput::idle(), now, &mut rng);
        assert!(s.phase >= last_phase);
        last_phase = s.phase;
    }
    assert_eq!(last_phase, 4);
}

#[test]
fn tick_spawns_boss_exactly_once() {
    let mut rng = seeded_rng();
    let s = tick(&make_state(), &FrameInput::idle(), 0.0, &mut rng);
    let s2 = tick(&s, &FrameInput::idle(), 270_000.0, &mut rng);
    assert!(s2.boss_spawned);
    assert_eq!(count_events(&s2, |e| *e == GameEvent::BossSpawned), 1);

    let s3 = tick(&s2, &FrameInput::idle(), 270_050.0, &mut rng);
    let bosses = s3.enemies.iter().filter(|e| e.kind == EnemyKind::Boss).count();
    assert_eq!(bosses, 1);
    assert_eq!(count_events(&s3, |e| *e == GameEvent::BossSpawned), 0);
}

#[test]
fn tick_spawns_first_enemy_after_interval() {
    let mut rng = seeded_rng();
    let s = tick(&make_state(), &FrameInput::idle(), 0.0, &mut rng);
    assert!(s.enemies.is_empty());
    let s2 = tick(&s, &FrameInput::idle(), 1000.0, &mut rng);
    assert_eq!(s2.enemies.len(), 1);
}

// ── pause / resume ────────────────────────────────────────────────────────────

#[test]
fn pause_is_idempotent() {
    let s = make_state();
    let p1 = pause(&s, 1000.0);
    let p2 = pause(&p1, 5000.0);
    assert_eq!(p2.status, GameStatus::Paused);
    // The second call must not restart the pause window
    assert_eq!(p2.clock.paused_ms(6000.0), 5000.0);
}

#[test]
fn resume_without_pause_is_noop() {
    let s = make_state();
    let s2 = resume(&s, 1000.0);
    assert_eq!(s2.status, GameStatus::Playing);
    assert_eq!(s2.clock.paused_ms(1000.0), 0.0);
}

#[test]
fn toggle_pause_round_trip() {
    let s = make_state();
    let paused = toggle_pause(&s, 1000.0);
    assert_eq!(paused.status, GameStatus::Paused);
    let resumed = toggle_pause(&paused, 2000.0);
    assert_eq!(resumed.status, GameStatus::Playing);
}

#[test]
fn paused_tick_leaves_state_frozen() {
    let mut rng = seeded_rng();
    let s = tick(&make_state(), &FrameInput::idle(), 0.0, &mut rng);
    let paused = pause(&s, 500.0);
    let s2 = tick(&paused, &FrameInput::toward(Vec2::ZERO), 5000.0, &mut rng);
    assert_eq!(s2.frame, paused.frame);
    assert_eq!(s2.game_time, paused.game_time);
    assert_eq!(s2.player.pos, paused.player.pos);
}

#[test]
fn paused_time_is_excluded_from_game_time() {
    let mut rng = seeded_rng();
    let s = tick(&make_state(), &FrameInput::idle(), 0.0, &mut rng);
    let s = pause(&s, 1000.0);
    let s = resume(&s, 11_000.0);
    let s = tick(&s, &FrameInput::idle(), 12_000.0, &mut rng);
    assert!((s.game_time - 2.0).abs() < 1e-6);
}

// ── level-up flow ─────────────────────────────────────────────────────────────

#[test]
fn collecting_orb_levels_up_and_pauses() {
    let mut rng = seeded_rng();
    let mut s = tick(&make_state(), &FrameInput::idle(), 0.0, &mut rng);
    let pos = s.player.pos;
    spawn_orb(&mut s, pos, 100);

    let s = tick(&s, &FrameInput::idle(), 100.0, &mut rng);
    assert_eq!(s.status, GameStatus::LevelUp);
    assert_eq!(s.player.level, 2);
    assert_eq!(s.upgrade_choices.len(), 3);
    assert!(s.clock.is_paused());
    assert_eq!(count_events(&s, |e| *e == GameEvent::LevelUp { level: 2 }), 1);

    let frozen = tick(&s, &FrameInput::idle(), 5000.0, &mut rng);
    assert_eq!(frozen.frame, s.frame);

    let id = s.upgrade_choices[0].id.clone();
    let s = choose_upgrade(&s, &id, 10_100.0, &mut rng);
    assert_eq!(s.status, GameStatus::Playing);
    assert!(s.upgrade_choices.is_empty());

    let s = tick(&s, &FrameInput::idle(), 10_200.0, &mut rng);
    // Only the unpaused 0.2 s count toward match time
    assert!((s.game_time - 0.2).abs() < 1e-6);
}

#[test]
fn choose_upgrade_ignores_unknown_id() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    gain_exp(&mut s, 100, &mut rng);
    let offer = s.upgrade_choices.clone();

    let s2 = choose_upgrade(&s, "not_an_upgrade", 0.0, &mut rng);
    assert_eq!(s2.status, GameStatus::LevelUp);
    assert_eq!(s2.upgrade_choices, offer);
}

#[test]
fn choose_upgrade_ignores_id_not_on_offer() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    gain_exp(&mut s, 100, &mut rng);
    let off_offer = s
        .config
        .progression
        .upgrades
        .iter()
        .find(|u| !s.upgrade_choices.contains(u))
        .map(|u| u.id.clone())
        .unwrap();

    let s2 = choose_upgrade(&s, &off_offer, 0.0, &mut rng);
    assert_eq!(s2.status, GameStatus::LevelUp);
}

#[test]
fn choose_upgrade_without_offer_is_noop() {
    let s = make_state();
    let s2 = choose_upgrade(&s, "atk", 0.0, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Playing);
    assert_eq!(s2.player.attack, s.player.attack);
}

#[test]
fn choose_upgrade_applies_effect() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.status = GameStatus::LevelUp;
    s.upgrade_choices = s
        .config
        .progression
        .upgrades
        .iter()
        .filter(|u| u.id == "atk")
        .cloned()
        .collect();

    let s2 = choose_upgrade(&s, "atk", 0.0, &mut rng);
    assert_eq!(s2.player.attack, 1.5);
    assert_eq!(s2.status, GameStatus::Playing);
}

#[test]
fn choose_upgrade_chains_pending_levels() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    gain_exp(&mut s, 300, &mut rng);
    assert_eq!(s.player.level, 2);
    assert_eq!(s.player.exp, 200);

    let id = s.upgrade_choices[0].id.clone();
    let s2 = choose_upgrade(&s, &id, 0.0, &mut rng);
    // 200 carried over clears the 130 threshold straight away
    assert_eq!(s2.status, GameStatus::LevelUp);
    assert_eq!(s2.player.level, 3);
    assert_eq!(s2.player.exp, 70);
    assert_eq!(s2.player.exp_to_next, 169);
    assert!(s2.clock.is_paused());
}

// ── snapshot ──────────────────────────────────────────────────────────────────

#[test]
fn snapshot_reports_hud_values() {
    let mut s = make_state();
    s.player.health = 50.0;
    s.player.exp = 30;
    let snap = snapshot(&s);
    assert_eq!(snap.health_fraction, 0.5);
    assert!((snap.exp_fraction - 0.3).abs() < 1e-6);
    assert_eq!(snap.phase_name, "Phase 1: Opening");
    assert_eq!(snap.remaining_time, 300.0);
    assert_eq!(snap.level, 1);
    assert_eq!(snap.world, Vec2::new(3000.0, 3000.0));
}

#[test]
fn snapshot_fractions_are_clamped() {
    let mut s = make_state();
    s.player.health = -10.0;
    s.player.exp = 500;
    let snap = snapshot(&s);
    assert_eq!(snap.health_fraction, 0.0);
    assert_eq!(snap.exp_fraction, 1.0);
}
