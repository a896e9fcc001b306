//! Phase/timer controller: maps unpaused game time to a difficulty tier,
//! ends the match on time, and tells the loop when the boss is due.

use tracing::info;

use crate::config::PhaseDef;
use crate::entities::{GameEvent, GameState, GameStatus};

/// Index of the first phase whose cumulative end boundary exceeds `elapsed`.
/// Times past the final boundary stay in the last phase.
pub fn phase_at(phases: &[PhaseDef], elapsed: f32) -> usize {
    let mut boundary = 0.0;
    for (index, phase) in phases.iter().enumerate() {
        boundary += phase.duration;
        if elapsed < boundary {
            return index;
        }
    }
    phases.len().saturating_sub(1)
}

/// Seconds left before the match is won.
pub fn remaining_time(state: &GameState) -> f32 {
    (state.config.match_duration() - state.game_time).max(0.0)
}

/// Advance the controller to `game_time`.
///
/// Sets `Victory` once the match duration is reached; otherwise updates the
/// active phase and raises `PhaseChanged` when it moves.
pub fn advance(state: &mut GameState, game_time: f32) {
    state.game_time = game_time;

    let duration = state.config.match_duration();
    if game_time >= duration {
        state.status = GameStatus::Victory;
        state.events.push(GameEvent::Victory);
        info!(
            level = state.player.level,
            kills = state.kills,
            "match won after {duration}s"
        );
        return;
    }

    let phase = phase_at(&state.config.phases, game_time);
    if phase != state.phase {
        state.phase = phase;
        state.events.push(GameEvent::PhaseChanged { phase });
        info!(phase = %state.config.phases[phase].name, at = game_time, "phase changed");
    }
}

/// True exactly while the one-time boss trigger is armed and its time has come.
pub fn boss_due(state: &GameState) -> bool {
    !state.boss_spawned && state.game_time >= state.config.boss_spawn_time
}
