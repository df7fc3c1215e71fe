//! Bout State Definitions
//!
//! All state for one bout: fighter boards and health, the phase machine,
//! round score, damage feedback, and the external command surface
//! (`start_round` / `reset`).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::rng::{derive_bout_seed, DeterministicRng};
use crate::game::events::BoutEvent;
use crate::game::stability::StabilityFilter;
use crate::game::tick::BoutConfig;
use crate::game::types::{BoutOutcome, Gesture, Quadrant};
use crate::{MAX_HEALTH, SELECTIONS_PER_EXCHANGE};

// =============================================================================
// ACTION BOARD
// =============================================================================

/// One side's committed actions for the current exchange.
///
/// Holds the confirmed gesture per quadrant plus the ordered selection of
/// at most [`SELECTIONS_PER_EXCHANGE`] quadrants that actually count this
/// exchange. A gesture can be confirmed on a third quadrant without being
/// selected; it simply never scores.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBoard {
    /// Confirmed gesture per quadrant (index order).
    actions: [Option<Gesture>; 4],

    /// Selected quadrants in confirmation order. Never holds duplicates,
    /// never exceeds [`SELECTIONS_PER_EXCHANGE`] entries.
    selected: Vec<Quadrant>,
}

impl ActionBoard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Confirmed gesture for a quadrant, if any.
    #[inline]
    pub fn action(&self, quadrant: Quadrant) -> Option<Gesture> {
        self.actions[quadrant.index()]
    }

    /// All confirmed gestures in quadrant index order.
    #[inline]
    pub fn actions(&self) -> &[Option<Gesture>; 4] {
        &self.actions
    }

    /// Selected quadrants in confirmation order.
    #[inline]
    pub fn selected(&self) -> &[Quadrant] {
        &self.selected
    }

    /// Whether a quadrant is among the selected set.
    #[inline]
    pub fn is_selected(&self, quadrant: Quadrant) -> bool {
        self.selected.contains(&quadrant)
    }

    /// Lock in a gesture for a quadrant, selecting the quadrant if there
    /// is capacity left. Returns false when the quadrant already holds
    /// exactly this gesture (re-confirmation is a no-op).
    pub fn confirm(&mut self, quadrant: Quadrant, gesture: Gesture) -> bool {
        if self.actions[quadrant.index()] == Some(gesture) {
            return false;
        }
        self.actions[quadrant.index()] = Some(gesture);
        if !self.is_selected(quadrant) && self.selected.len() < SELECTIONS_PER_EXCHANGE {
            self.selected.push(quadrant);
        }
        true
    }

    /// Release a quadrant: drop its confirmed action and its selection
    /// membership. Returns true if an action was actually held.
    pub fn clear_quadrant(&mut self, quadrant: Quadrant) -> bool {
        let held = self.actions[quadrant.index()].is_some();
        self.actions[quadrant.index()] = None;
        self.selected.retain(|&q| q != quadrant);
        held
    }

    /// Number of selected quadrants holding a confirmed action.
    pub fn committed(&self) -> usize {
        self.selected
            .iter()
            .filter(|&&q| self.actions[q.index()].is_some())
            .count()
    }

    /// Whether this side has locked in a full exchange.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.committed() == SELECTIONS_PER_EXCHANGE
    }

    /// Clear everything for the next exchange.
    pub fn reset(&mut self) {
        self.actions = [None; 4];
        self.selected.clear();
    }
}

// =============================================================================
// FIGHTER STATE
// =============================================================================

/// State of one side of the bout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterState {
    /// Current health, 0 to [`MAX_HEALTH`].
    pub health: u32,

    /// Committed actions for the current exchange.
    pub board: ActionBoard,
}

impl FighterState {
    /// Create a fresh fighter at full health.
    pub fn new() -> Self {
        Self {
            health: MAX_HEALTH,
            board: ActionBoard::new(),
        }
    }

    /// Apply damage, flooring health at 0.
    #[inline]
    pub fn apply_damage(&mut self, damage: u32) {
        self.health = self.health.saturating_sub(damage);
    }

    /// Whether this fighter has been knocked out.
    #[inline]
    pub fn is_down(&self) -> bool {
        self.health == 0
    }
}

impl Default for FighterState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ROUND SCORE & FEEDBACK
// =============================================================================

/// Round bookkeeping. Only advances when round mode is configured; in a
/// single bout the round number stays at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundScore {
    /// Current round, 1-based.
    pub round: u32,
    /// Rounds won by the player.
    pub player_wins: u32,
    /// Rounds won by the opponent.
    pub opponent_wins: u32,
}

impl RoundScore {
    /// Score at the start of a game.
    pub fn new() -> Self {
        Self {
            round: 1,
            player_wins: 0,
            opponent_wins: 0,
        }
    }
}

impl Default for RoundScore {
    fn default() -> Self {
        Self::new()
    }
}

/// Damage applied by the most recent exchange, kept for the short feedback
/// overlay and overwritten on each resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageFeedback {
    /// Damage the player took.
    pub player: u32,
    /// Damage the opponent took.
    pub opponent: u32,
    /// Clock reading at resolution.
    pub at: Duration,
}

// =============================================================================
// BOUT PHASE
// =============================================================================

/// Authoritative phase of the bout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoutPhase {
    /// Waiting for the start command.
    #[default]
    Waiting,
    /// Pre-round countdown running.
    Countdown {
        /// When the countdown began.
        started_at: Duration,
    },
    /// Exchange live, observations being consumed.
    Playing,
    /// Resolution display window.
    RoundEnd {
        /// When the exchange resolved.
        ended_at: Duration,
        /// Whether the exchange ended the round by knockout (round mode).
        knockout: bool,
    },
    /// Terminal until an explicit reset.
    GameOver {
        /// Final outcome.
        outcome: BoutOutcome,
    },
}

// =============================================================================
// BOUT STATE
// =============================================================================

/// Complete state of a bout.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoutState {
    /// Current phase.
    pub phase: BoutPhase,

    /// The human side.
    pub player: FighterState,

    /// The computer side.
    pub opponent: FighterState,

    /// Round number and per-side round wins.
    pub score: RoundScore,

    /// Debouncer for the player's raw gesture stream.
    pub filter: StabilityFilter,

    /// Damage applied by the last resolution, if any yet.
    pub feedback: Option<DamageFeedback>,

    /// Session seed (for replay).
    base_seed: u64,

    /// How many games this session has played; bumped by reset.
    game_index: u32,

    /// Deterministic RNG for opponent picks.
    #[serde(skip)]
    pub rng: DeterministicRng,

    /// Events generated since the last tick (drained each tick).
    #[serde(skip)]
    pending_events: Vec<BoutEvent>,
}

impl BoutState {
    /// Create a new bout from a session seed.
    pub fn new(base_seed: u64) -> Self {
        Self::for_game(base_seed, 0)
    }

    fn for_game(base_seed: u64, game_index: u32) -> Self {
        Self {
            phase: BoutPhase::Waiting,
            player: FighterState::new(),
            opponent: FighterState::new(),
            score: RoundScore::new(),
            filter: StabilityFilter::new(),
            feedback: None,
            base_seed,
            game_index,
            rng: DeterministicRng::new(derive_bout_seed(base_seed, game_index)),
            pending_events: Vec::new(),
        }
    }

    /// Session seed this bout was created from.
    #[inline]
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Start the pre-round countdown. Honored only while Waiting; in any
    /// other phase the command is ignored.
    pub fn start_round(&mut self, now: Duration) {
        if !matches!(self.phase, BoutPhase::Waiting) {
            debug!(phase = ?self.phase, "start_round ignored outside Waiting");
            return;
        }
        self.phase = BoutPhase::Countdown { started_at: now };
        self.push_event(BoutEvent::countdown_started(now, self.score.round));
    }

    /// Restore the full initial state for a new game. Honored only in
    /// GameOver. The RNG stream is re-derived for the next game index, so
    /// a rematch does not replay the previous opponent's picks; timing
    /// tunables live in [`BoutConfig`] and are untouched.
    pub fn reset(&mut self) {
        if !matches!(self.phase, BoutPhase::GameOver { .. }) {
            debug!(phase = ?self.phase, "reset ignored outside GameOver");
            return;
        }
        *self = Self::for_game(self.base_seed, self.game_index + 1);
    }

    /// Whether the bout has reached its terminal phase.
    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self.phase, BoutPhase::GameOver { .. })
    }

    /// Seconds left on the countdown display, clamped non-negative.
    /// `None` outside the Countdown phase.
    pub fn countdown_remaining(&self, now: Duration, config: &BoutConfig) -> Option<u64> {
        match self.phase {
            BoutPhase::Countdown { started_at } => {
                let elapsed = now.saturating_sub(started_at);
                Some(config.countdown.as_secs().saturating_sub(elapsed.as_secs()))
            }
            _ => None,
        }
    }

    /// Whether the damage overlay should currently be drawn.
    pub fn should_show_damage(&self, now: Duration, config: &BoutConfig) -> bool {
        self.feedback
            .is_some_and(|feedback| now.saturating_sub(feedback.at) < config.damage_display)
    }

    /// Clear both boards for the next exchange. Gesture histories are
    /// kept: a gesture still being held may legitimately re-confirm.
    pub(crate) fn clear_exchange(&mut self) {
        self.player.board.reset();
        self.opponent.board.reset();
    }

    /// Queue a bout event.
    pub fn push_event(&mut self, event: BoutEvent) {
        self.pending_events.push(event);
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<BoutEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Read-only view for the presentation layer.
    pub fn snapshot(&self, now: Duration, config: &BoutConfig) -> BoutSnapshot {
        BoutSnapshot {
            phase: self.phase,
            countdown: self.countdown_remaining(now, config),
            player_health: self.player.health,
            opponent_health: self.opponent.health,
            round: self.score.round,
            player_round_wins: self.score.player_wins,
            opponent_round_wins: self.score.opponent_wins,
            player_actions: *self.player.board.actions(),
            player_selected: self.player.board.selected().to_vec(),
            opponent_actions: *self.opponent.board.actions(),
            opponent_selected: self.opponent.board.selected().to_vec(),
            damage: self.feedback,
            show_damage: self.should_show_damage(now, config),
        }
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Read-only copy of everything the rendering layer draws each frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoutSnapshot {
    /// Current phase.
    pub phase: BoutPhase,
    /// Seconds left on the countdown, when counting down.
    pub countdown: Option<u64>,
    /// Player health.
    pub player_health: u32,
    /// Opponent health.
    pub opponent_health: u32,
    /// Current round (1-based).
    pub round: u32,
    /// Rounds won by the player.
    pub player_round_wins: u32,
    /// Rounds won by the opponent.
    pub opponent_round_wins: u32,
    /// Player's confirmed gesture per quadrant.
    pub player_actions: [Option<Gesture>; 4],
    /// Player's selected quadrants in confirmation order.
    pub player_selected: Vec<Quadrant>,
    /// Opponent's committed gesture per quadrant.
    pub opponent_actions: [Option<Gesture>; 4],
    /// Opponent's selected quadrants.
    pub opponent_selected: Vec<Quadrant>,
    /// Last exchange's damage, if any exchange resolved yet.
    pub damage: Option<DamageFeedback>,
    /// Whether the damage overlay is inside its display window.
    pub show_damage: bool,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_selection_capacity() {
        let mut board = ActionBoard::new();

        assert!(board.confirm(Quadrant::TopLeft, Gesture::Rock));
        assert!(board.confirm(Quadrant::TopRight, Gesture::Paper));
        assert!(board.confirm(Quadrant::BottomLeft, Gesture::Scissors));

        // Third confirmation holds an action but cannot be selected.
        assert_eq!(board.selected(), &[Quadrant::TopLeft, Quadrant::TopRight]);
        assert_eq!(board.action(Quadrant::BottomLeft), Some(Gesture::Scissors));
        assert!(board.is_ready());
    }

    #[test]
    fn test_board_no_duplicate_selection() {
        let mut board = ActionBoard::new();

        assert!(board.confirm(Quadrant::TopLeft, Gesture::Rock));
        // Same gesture again: no-op.
        assert!(!board.confirm(Quadrant::TopLeft, Gesture::Rock));
        // Different gesture: action updates, selection unchanged.
        assert!(board.confirm(Quadrant::TopLeft, Gesture::Paper));
        assert_eq!(board.selected(), &[Quadrant::TopLeft]);
    }

    #[test]
    fn test_board_clear_quadrant_deselects() {
        let mut board = ActionBoard::new();
        board.confirm(Quadrant::TopLeft, Gesture::Rock);
        board.confirm(Quadrant::TopRight, Gesture::Paper);

        assert!(board.clear_quadrant(Quadrant::TopLeft));
        assert_eq!(board.selected(), &[Quadrant::TopRight]);
        assert!(!board.is_ready());

        // Clearing an empty quadrant reports nothing held.
        assert!(!board.clear_quadrant(Quadrant::BottomLeft));
    }

    #[test]
    fn test_fighter_damage_floors_at_zero() {
        let mut fighter = FighterState::new();
        fighter.apply_damage(150);
        assert_eq!(fighter.health, 0);
        assert!(fighter.is_down());
    }

    #[test]
    fn test_start_round_only_in_waiting() {
        let mut state = BoutState::new(1);
        let now = Duration::from_secs(1);

        state.start_round(now);
        assert_eq!(state.phase, BoutPhase::Countdown { started_at: now });
        let events = state.take_events();
        assert_eq!(events.len(), 1);

        // A second start while counting down is ignored.
        state.start_round(Duration::from_secs(2));
        assert_eq!(state.phase, BoutPhase::Countdown { started_at: now });
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_reset_only_in_game_over() {
        let mut state = BoutState::new(1);
        state.player.apply_damage(40);
        state.reset();

        // Not game over: nothing restored.
        assert_eq!(state.player.health, 60);

        state.phase = BoutPhase::GameOver {
            outcome: BoutOutcome::OpponentWin,
        };
        state.reset();
        assert_eq!(state.phase, BoutPhase::Waiting);
        assert_eq!(state.player.health, MAX_HEALTH);
        assert_eq!(state.opponent.health, MAX_HEALTH);
        assert_eq!(state.score.round, 1);
    }

    #[test]
    fn test_reset_advances_rng_stream() {
        let mut state = BoutState::new(99);
        let first = state.rng.next_u64();

        state.phase = BoutPhase::GameOver {
            outcome: BoutOutcome::Draw,
        };
        state.reset();
        let second = state.rng.next_u64();

        // Rematch must not replay the previous game's picks.
        assert_ne!(first, second);

        // But the same (seed, game) pair is replayable.
        let mut replay = BoutState::new(99);
        assert_eq!(replay.rng.next_u64(), first);
    }

    #[test]
    fn test_countdown_remaining_clamps() {
        let config = BoutConfig::default();
        let mut state = BoutState::new(1);
        let t0 = Duration::from_secs(10);
        state.start_round(t0);

        assert_eq!(state.countdown_remaining(t0, &config), Some(3));
        assert_eq!(
            state.countdown_remaining(t0 + Duration::from_millis(2900), &config),
            Some(1)
        );
        // Never negative, even past the deadline.
        assert_eq!(
            state.countdown_remaining(t0 + Duration::from_secs(30), &config),
            Some(0)
        );

        state.phase = BoutPhase::Playing;
        assert_eq!(state.countdown_remaining(t0, &config), None);
    }

    #[test]
    fn test_damage_feedback_window() {
        let config = BoutConfig::default();
        let mut state = BoutState::new(1);
        assert!(!state.should_show_damage(Duration::from_secs(5), &config));

        state.feedback = Some(DamageFeedback {
            player: 10,
            opponent: 15,
            at: Duration::from_secs(5),
        });
        assert!(state.should_show_damage(Duration::from_millis(5900), &config));
        assert!(!state.should_show_damage(Duration::from_secs(6), &config));
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let config = BoutConfig::default();
        let mut state = BoutState::new(7);
        state.player.board.confirm(Quadrant::TopLeft, Gesture::Rock);
        state.opponent.board.confirm(Quadrant::BottomRight, Gesture::Paper);
        state.opponent.apply_damage(10);

        let snapshot = state.snapshot(Duration::from_secs(1), &config);
        assert_eq!(snapshot.phase, BoutPhase::Waiting);
        assert_eq!(snapshot.countdown, None);
        assert_eq!(snapshot.player_health, MAX_HEALTH);
        assert_eq!(snapshot.opponent_health, MAX_HEALTH - 10);
        assert_eq!(snapshot.player_actions[0], Some(Gesture::Rock));
        assert_eq!(snapshot.player_selected, vec![Quadrant::TopLeft]);
        assert_eq!(snapshot.opponent_selected, vec![Quadrant::BottomRight]);
        assert!(!snapshot.show_damage);
    }
}
