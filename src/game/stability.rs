//! Gesture Stability Filter
//!
//! Raw detector output flickers: a fist held still may classify as rock,
//! rock, none, rock across four frames. This filter debounces the stream
//! per quadrant and only locks an action in once the same gesture has been
//! seen consistently inside a short window.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::game::events::BoutEvent;
use crate::game::state::ActionBoard;
use crate::game::types::{Gesture, Quadrant};

/// Timing knobs for gesture debouncing.
///
/// The two reference builds of the original prototype shipped with very
/// different pruning windows; neither set is authoritative, so all four
/// values are configuration. The defaults are the coherent "sticky" set:
/// a confirmation survives brief detector dropouts but a hand that leaves
/// the quadrant for half a second releases its action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilityConfig {
    /// How long raw observations are retained per quadrant.
    pub retention: Duration,

    /// Maximum age of the newest observation before the quadrant's
    /// confirmed action is forcibly released.
    pub unregister: Duration,

    /// Window over which observations must agree to confirm a gesture.
    pub stable_window: Duration,

    /// Minimum number of agreeing observations inside `stable_window`.
    pub min_samples: usize,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            retention: Duration::from_millis(1500),
            unregister: Duration::from_millis(500),
            stable_window: Duration::from_millis(1000),
            min_samples: 2,
        }
    }
}

/// One retained observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct TimedGesture {
    gesture: Gesture,
    at: Duration,
}

/// Per-quadrant debouncer for the player's gesture stream.
///
/// Owns the short observation histories; the confirmed actions themselves
/// live on the player's [`ActionBoard`], which [`StabilityFilter::sweep`]
/// mutates.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StabilityFilter {
    /// Retained observations, oldest first, keyed by quadrant index.
    history: [Vec<TimedGesture>; 4],
}

impl StabilityFilter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one raw observation. A `None` gesture is not an error; it
    /// simply adds nothing and lets the recency rule do its work.
    pub fn observe(&mut self, quadrant: Quadrant, gesture: Option<Gesture>, now: Duration) {
        if let Some(gesture) = gesture {
            self.history[quadrant.index()].push(TimedGesture { gesture, at: now });
        }
    }

    /// Advance every quadrant one tick: prune stale history, release
    /// actions that are no longer held, and confirm gestures that became
    /// stable. Runs over all quadrants, not just observed ones, so a hand
    /// that disappears entirely still unregisters.
    pub fn sweep(
        &mut self,
        board: &mut ActionBoard,
        now: Duration,
        config: &StabilityConfig,
        events: &mut Vec<BoutEvent>,
    ) {
        for quadrant in Quadrant::ALL {
            let history = &mut self.history[quadrant.index()];

            history.retain(|entry| now.saturating_sub(entry.at) < config.retention);

            // Recency invalidation: the gesture is no longer being held.
            let held = history
                .last()
                .is_some_and(|entry| now.saturating_sub(entry.at) <= config.unregister);
            if !held {
                history.clear();
                if board.clear_quadrant(quadrant) {
                    events.push(BoutEvent::action_expired(now, quadrant));
                }
                continue;
            }

            let recent: Vec<Gesture> = history
                .iter()
                .filter(|entry| now.saturating_sub(entry.at) <= config.stable_window)
                .map(|entry| entry.gesture)
                .collect();

            let stable = recent.len() >= config.min_samples
                && recent.iter().all(|&gesture| gesture == recent[0]);
            if stable && board.action(quadrant) != Some(recent[0]) {
                let gesture = recent[0];
                if board.confirm(quadrant, gesture) {
                    events.push(BoutEvent::action_confirmed(now, quadrant, gesture));
                }
            }
        }
    }

    /// Number of retained observations for a quadrant.
    pub fn retained(&self, quadrant: Quadrant) -> usize {
        self.history[quadrant.index()].len()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::BoutEventData;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn sweep_once(
        filter: &mut StabilityFilter,
        board: &mut ActionBoard,
        now: Duration,
        config: &StabilityConfig,
    ) -> Vec<BoutEvent> {
        let mut events = Vec::new();
        filter.sweep(board, now, config, &mut events);
        events
    }

    #[test]
    fn test_single_observation_does_not_confirm() {
        let config = StabilityConfig::default();
        let mut filter = StabilityFilter::new();
        let mut board = ActionBoard::new();

        filter.observe(Quadrant::TopLeft, Some(Gesture::Rock), ms(100));
        sweep_once(&mut filter, &mut board, ms(100), &config);

        assert_eq!(board.action(Quadrant::TopLeft), None);
        assert!(board.selected().is_empty());
    }

    #[test]
    fn test_consistent_gesture_confirms() {
        let config = StabilityConfig::default();
        let mut filter = StabilityFilter::new();
        let mut board = ActionBoard::new();

        filter.observe(Quadrant::TopLeft, Some(Gesture::Rock), ms(100));
        sweep_once(&mut filter, &mut board, ms(100), &config);
        filter.observe(Quadrant::TopLeft, Some(Gesture::Rock), ms(400));
        let events = sweep_once(&mut filter, &mut board, ms(400), &config);

        assert_eq!(board.action(Quadrant::TopLeft), Some(Gesture::Rock));
        assert_eq!(board.selected(), &[Quadrant::TopLeft]);
        assert!(events.iter().any(|e| matches!(
            e.data,
            BoutEventData::ActionConfirmed {
                quadrant: Quadrant::TopLeft,
                gesture: Gesture::Rock,
            }
        )));
    }

    #[test]
    fn test_third_sample_confirms_with_min_samples_three() {
        // Samples at t, t+0.3, t+0.6: all inside the stable window, gaps
        // below the unregister window.
        let config = StabilityConfig {
            min_samples: 3,
            ..StabilityConfig::default()
        };
        let mut filter = StabilityFilter::new();
        let mut board = ActionBoard::new();

        for (i, at) in [ms(1000), ms(1300), ms(1600)].into_iter().enumerate() {
            filter.observe(Quadrant::TopRight, Some(Gesture::Rock), at);
            sweep_once(&mut filter, &mut board, at, &config);
            if i < 2 {
                assert_eq!(board.action(Quadrant::TopRight), None, "sample {}", i + 1);
            }
        }

        assert_eq!(board.action(Quadrant::TopRight), Some(Gesture::Rock));
    }

    #[test]
    fn test_conflicting_gestures_do_not_confirm() {
        let config = StabilityConfig::default();
        let mut filter = StabilityFilter::new();
        let mut board = ActionBoard::new();

        filter.observe(Quadrant::BottomLeft, Some(Gesture::Rock), ms(100));
        filter.observe(Quadrant::BottomLeft, Some(Gesture::Paper), ms(300));
        sweep_once(&mut filter, &mut board, ms(300), &config);

        assert_eq!(board.action(Quadrant::BottomLeft), None);
    }

    #[test]
    fn test_stale_quadrant_unregisters() {
        let config = StabilityConfig::default();
        let mut filter = StabilityFilter::new();
        let mut board = ActionBoard::new();

        filter.observe(Quadrant::TopLeft, Some(Gesture::Scissors), ms(100));
        filter.observe(Quadrant::TopLeft, Some(Gesture::Scissors), ms(300));
        sweep_once(&mut filter, &mut board, ms(300), &config);
        assert_eq!(board.action(Quadrant::TopLeft), Some(Gesture::Scissors));

        // No further observations; past the unregister window the action
        // must be released and deselected.
        let events = sweep_once(&mut filter, &mut board, ms(900), &config);
        assert_eq!(board.action(Quadrant::TopLeft), None);
        assert!(board.selected().is_empty());
        assert!(events.iter().any(|e| matches!(
            e.data,
            BoutEventData::ActionExpired {
                quadrant: Quadrant::TopLeft,
            }
        )));
        assert_eq!(filter.retained(Quadrant::TopLeft), 0);
    }

    #[test]
    fn test_reconfirming_same_gesture_is_noop() {
        let config = StabilityConfig::default();
        let mut filter = StabilityFilter::new();
        let mut board = ActionBoard::new();

        filter.observe(Quadrant::TopLeft, Some(Gesture::Rock), ms(100));
        filter.observe(Quadrant::TopLeft, Some(Gesture::Rock), ms(300));
        sweep_once(&mut filter, &mut board, ms(300), &config);
        assert_eq!(board.selected(), &[Quadrant::TopLeft]);

        // Keep feeding the same gesture: no new events, no duplicate
        // selection.
        filter.observe(Quadrant::TopLeft, Some(Gesture::Rock), ms(500));
        let events = sweep_once(&mut filter, &mut board, ms(500), &config);
        assert!(events.is_empty());
        assert_eq!(board.selected(), &[Quadrant::TopLeft]);
    }

    #[test]
    fn test_changed_gesture_updates_action_without_reselecting() {
        let config = StabilityConfig::default();
        let mut filter = StabilityFilter::new();
        let mut board = ActionBoard::new();

        filter.observe(Quadrant::TopLeft, Some(Gesture::Rock), ms(100));
        filter.observe(Quadrant::TopLeft, Some(Gesture::Rock), ms(300));
        sweep_once(&mut filter, &mut board, ms(300), &config);

        // Hand switches to paper; once rock's samples age out of the
        // stable window, paper confirms in place.
        filter.observe(Quadrant::TopLeft, Some(Gesture::Paper), ms(1400));
        filter.observe(Quadrant::TopLeft, Some(Gesture::Paper), ms(1600));
        sweep_once(&mut filter, &mut board, ms(1600), &config);

        assert_eq!(board.action(Quadrant::TopLeft), Some(Gesture::Paper));
        assert_eq!(board.selected(), &[Quadrant::TopLeft]);
    }

    #[test]
    fn test_third_quadrant_confirms_but_is_not_selected() {
        let config = StabilityConfig::default();
        let mut filter = StabilityFilter::new();
        let mut board = ActionBoard::new();

        for quadrant in [Quadrant::TopLeft, Quadrant::TopRight, Quadrant::BottomLeft] {
            filter.observe(quadrant, Some(Gesture::Rock), ms(100));
            filter.observe(quadrant, Some(Gesture::Rock), ms(300));
        }
        sweep_once(&mut filter, &mut board, ms(300), &config);

        // All three hold an action, only the first two are selected.
        assert_eq!(board.action(Quadrant::BottomLeft), Some(Gesture::Rock));
        assert_eq!(board.selected(), &[Quadrant::TopLeft, Quadrant::TopRight]);
    }

    #[test]
    fn test_none_gesture_appends_nothing() {
        let mut filter = StabilityFilter::new();
        filter.observe(Quadrant::TopLeft, None, ms(100));
        assert_eq!(filter.retained(Quadrant::TopLeft), 0);
    }
}
