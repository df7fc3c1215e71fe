//! Per-Frame Update Loop
//!
//! The core update that must stay 100% deterministic: phase timers, the
//! stability filter sweep, opponent commitment, and exchange resolution.

use std::cmp::Ordering;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::game::announcer::Announcer;
use crate::game::events::BoutEvent;
use crate::game::resolve::score_exchange;
use crate::game::stability::StabilityConfig;
use crate::game::state::{BoutPhase, BoutState, DamageFeedback};
use crate::game::types::{BoutOutcome, Gesture, Observation, Quadrant, Side};
use crate::{MAX_HEALTH, SELECTIONS_PER_EXCHANGE};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick.
    pub events: Vec<BoutEvent>,
    /// Whether the bout is in its terminal phase.
    pub bout_over: bool,
    /// Final outcome, once the bout is over.
    pub outcome: Option<BoutOutcome>,
}

/// Best-of-N layering on top of knockouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRules {
    /// Hard cap on rounds fought.
    pub max_rounds: u32,
    /// Round wins needed to take the bout early.
    pub wins_needed: u32,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            wins_needed: 2,
        }
    }
}

/// Configuration for a bout.
///
/// Lives outside [`BoutState`] on purpose: a reset rebuilds all state but
/// never touches tunables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoutConfig {
    /// Pre-round countdown length.
    pub countdown: Duration,
    /// How long resolution results stay on screen before the next exchange.
    pub round_display: Duration,
    /// How long the damage overlay stays visible.
    pub damage_display: Duration,
    /// Damage for winning a defended confrontation.
    pub clash_damage: u32,
    /// Damage for an unanswered hit.
    pub direct_hit_damage: u32,
    /// Gesture debouncing windows.
    pub stability: StabilityConfig,
    /// Round mode; `None` ends the bout on the first knockout.
    pub rounds: Option<RoundRules>,
}

impl Default for BoutConfig {
    fn default() -> Self {
        Self {
            countdown: Duration::from_secs(3),
            round_display: Duration::from_secs(3),
            damage_display: Duration::from_secs(1),
            clash_damage: 15,
            direct_hit_damage: 10,
            stability: StabilityConfig::default(),
            rounds: None,
        }
    }
}

/// Configuration rejected by [`BoutConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A timing window was zero.
    #[error("stability windows must be non-zero")]
    ZeroWindow,

    /// The unregister window outlives retention, so release could never fire.
    #[error("unregister window must not exceed the retention window")]
    UnregisterExceedsRetention,

    /// The stable window outlives retention, so samples are pruned before
    /// they can agree.
    #[error("stable window must not exceed the retention window")]
    StableExceedsRetention,

    /// Fewer than two samples cannot establish stability.
    #[error("confirming a gesture requires at least 2 samples")]
    TooFewSamples,

    /// Round rules that can never decide a bout.
    #[error("round rules must allow at least one win within the round cap")]
    InvalidRounds,
}

impl BoutConfig {
    /// Check the configuration for combinations that would deadlock the
    /// filter or the round structure. The tick path itself never fails;
    /// this is the only fallible surface of the crate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let stability = &self.stability;
        if stability.retention.is_zero()
            || stability.unregister.is_zero()
            || stability.stable_window.is_zero()
        {
            return Err(ConfigError::ZeroWindow);
        }
        if stability.unregister > stability.retention {
            return Err(ConfigError::UnregisterExceedsRetention);
        }
        if stability.stable_window > stability.retention {
            return Err(ConfigError::StableExceedsRetention);
        }
        if stability.min_samples < 2 {
            return Err(ConfigError::TooFewSamples);
        }
        if let Some(rounds) = &self.rounds {
            if rounds.wins_needed == 0 || rounds.max_rounds == 0 || rounds.wins_needed > rounds.max_rounds {
                return Err(ConfigError::InvalidRounds);
            }
        }
        Ok(())
    }
}

/// Run one tick.
///
/// # Arguments
///
/// * `state` - The bout state (will be mutated)
/// * `observations` - Classified hand sightings for this frame; consumed
///   only while Playing
/// * `now` - Monotonic clock reading for this frame
/// * `config` - Bout configuration
/// * `announcer` - Audio cue seam, poked when an exchange goes live
///
/// # Determinism
///
/// Given the same seed, timestamps, and observation stream, every tick
/// mutates the state identically: all randomness comes from `state.rng`
/// and the only clock is the `now` argument.
pub fn tick(
    state: &mut BoutState,
    observations: &[Observation],
    now: Duration,
    config: &BoutConfig,
    announcer: &mut dyn Announcer,
) -> TickResult {
    let mut result = TickResult::default();

    match state.phase {
        BoutPhase::Waiting => {
            // Nothing moves until the start command.
        }
        BoutPhase::Countdown { started_at } => {
            if now.saturating_sub(started_at) >= config.countdown {
                begin_exchange(state, now, announcer);
            }
        }
        BoutPhase::Playing => {
            for observation in observations {
                state
                    .filter
                    .observe(observation.quadrant, observation.gesture, now);
            }

            let mut events = Vec::new();
            state
                .filter
                .sweep(&mut state.player.board, now, &config.stability, &mut events);
            for event in events {
                state.push_event(event);
            }

            if state.player.board.is_ready() {
                resolve_exchange(state, now, config);
            }
        }
        BoutPhase::RoundEnd { ended_at, knockout } => {
            if now.saturating_sub(ended_at) >= config.round_display {
                finish_round_end(state, knockout, now, config);
            }
        }
        BoutPhase::GameOver { .. } => {}
    }

    if let BoutPhase::GameOver { outcome } = state.phase {
        result.bout_over = true;
        result.outcome = Some(outcome);
    }
    result.events = state.take_events();
    result
}

/// Countdown expired: commit the opponent and go live.
fn begin_exchange(state: &mut BoutState, now: Duration, announcer: &mut dyn Announcer) {
    state.phase = BoutPhase::Playing;
    select_opponent_actions(state);
    announcer.round_start();
    state.push_event(BoutEvent::round_started(now, state.score.round));
}

/// Commit the opponent's two quadrants and gestures for this exchange.
/// Runs exactly once per exchange, on entry to Playing.
fn select_opponent_actions(state: &mut BoutState) {
    let mut quadrants = Quadrant::ALL;
    state.rng.shuffle(&mut quadrants);

    for &quadrant in quadrants.iter().take(SELECTIONS_PER_EXCHANGE) {
        let gesture = Gesture::ALL[state.rng.next_int(Gesture::ALL.len() as u32) as usize];
        state.opponent.board.confirm(quadrant, gesture);
    }
}

/// Both player quadrants locked in: score the exchange and move on.
fn resolve_exchange(state: &mut BoutState, now: Duration, config: &BoutConfig) {
    let damage = score_exchange(&state.player.board, &state.opponent.board, config);
    state.player.apply_damage(damage.player);
    state.opponent.apply_damage(damage.opponent);
    state.feedback = Some(DamageFeedback {
        player: damage.player,
        opponent: damage.opponent,
        at: now,
    });
    state.push_event(BoutEvent::exchange_resolved(now, damage.player, damage.opponent));

    let player_down = state.player.is_down();
    let opponent_down = state.opponent.is_down();

    if !player_down && !opponent_down {
        state.phase = BoutPhase::RoundEnd {
            ended_at: now,
            knockout: false,
        };
        return;
    }

    match config.rounds {
        None => {
            let outcome = match (player_down, opponent_down) {
                (true, true) => BoutOutcome::Draw,
                (true, false) => BoutOutcome::OpponentWin,
                _ => BoutOutcome::PlayerWin,
            };
            state.phase = BoutPhase::GameOver { outcome };
            state.push_event(BoutEvent::bout_ended(now, outcome));
        }
        Some(_) => {
            // Knockout ends the round; the side left standing (more health)
            // takes it. A double knockout at equal health awards nobody.
            let winner = match state.player.health.cmp(&state.opponent.health) {
                Ordering::Greater => Some(Side::Player),
                Ordering::Less => Some(Side::Opponent),
                Ordering::Equal => None,
            };
            match winner {
                Some(Side::Player) => state.score.player_wins += 1,
                Some(Side::Opponent) => state.score.opponent_wins += 1,
                None => {}
            }
            state.push_event(BoutEvent::round_ended(now, state.score.round, winner));
            state.phase = BoutPhase::RoundEnd {
                ended_at: now,
                knockout: true,
            };
        }
    }
}

/// Display window over: clear the exchange and decide what comes next.
fn finish_round_end(state: &mut BoutState, knockout: bool, now: Duration, config: &BoutConfig) {
    state.clear_exchange();

    if !knockout {
        state.phase = BoutPhase::Waiting;
        return;
    }
    let Some(rounds) = &config.rounds else {
        state.phase = BoutPhase::Waiting;
        return;
    };

    let decided = state.score.player_wins >= rounds.wins_needed
        || state.score.opponent_wins >= rounds.wins_needed
        || state.score.round >= rounds.max_rounds;

    if decided {
        let outcome = match state.score.player_wins.cmp(&state.score.opponent_wins) {
            Ordering::Greater => BoutOutcome::PlayerWin,
            Ordering::Less => BoutOutcome::OpponentWin,
            Ordering::Equal => BoutOutcome::Draw,
        };
        state.phase = BoutPhase::GameOver { outcome };
        state.push_event(BoutEvent::bout_ended(now, outcome));
    } else {
        state.score.round += 1;
        state.player.health = MAX_HEALTH;
        state.opponent.health = MAX_HEALTH;
        state.phase = BoutPhase::Waiting;
    }
}

// =============================================================================
// TESTS
// =============================================================================
