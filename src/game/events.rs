//! Bout Events
//!
//! Events generated while a bout advances, drained once per tick for the
//! presentation and audio layers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::game::types::{BoutOutcome, Gesture, Quadrant, Side};

/// Bout event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoutEventData {
    /// The pre-round countdown began.
    CountdownStarted {
        /// Round about to be fought.
        round: u32,
    },

    /// Countdown finished; the exchange is live and the opponent has
    /// committed its quadrants.
    RoundStarted {
        /// Round now being fought.
        round: u32,
    },

    /// A player gesture passed the stability criteria and locked in.
    ActionConfirmed {
        /// Quadrant the gesture was held in.
        quadrant: Quadrant,
        /// The locked-in gesture.
        gesture: Gesture,
    },

    /// A confirmed player gesture stopped being held and was released.
    ActionExpired {
        /// Quadrant that lost its confirmed action.
        quadrant: Quadrant,
    },

    /// Both player quadrants locked in and damage was applied.
    ExchangeResolved {
        /// Damage the player took.
        player_damage: u32,
        /// Damage the opponent took.
        opponent_damage: u32,
    },

    /// A round concluded by knockout (round mode only).
    RoundEnded {
        /// Round that just concluded.
        round: u32,
        /// Side awarded the round, or `None` on a double knockout at
        /// equal health.
        winner: Option<Side>,
    },

    /// The bout reached its terminal state.
    BoutEnded {
        /// Final outcome.
        outcome: BoutOutcome,
    },
}

/// A bout event with its timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoutEvent {
    /// Clock reading when the event occurred.
    pub at: Duration,

    /// Event data.
    pub data: BoutEventData,
}

impl BoutEvent {
    /// Create a countdown-started event.
    pub fn countdown_started(at: Duration, round: u32) -> Self {
        Self {
            at,
            data: BoutEventData::CountdownStarted { round },
        }
    }

    /// Create a round-started event.
    pub fn round_started(at: Duration, round: u32) -> Self {
        Self {
            at,
            data: BoutEventData::RoundStarted { round },
        }
    }

    /// Create an action-confirmed event.
    pub fn action_confirmed(at: Duration, quadrant: Quadrant, gesture: Gesture) -> Self {
        Self {
            at,
            data: BoutEventData::ActionConfirmed { quadrant, gesture },
        }
    }

    /// Create an action-expired event.
    pub fn action_expired(at: Duration, quadrant: Quadrant) -> Self {
        Self {
            at,
            data: BoutEventData::ActionExpired { quadrant },
        }
    }

    /// Create an exchange-resolved event.
    pub fn exchange_resolved(at: Duration, player_damage: u32, opponent_damage: u32) -> Self {
        Self {
            at,
            data: BoutEventData::ExchangeResolved {
                player_damage,
                opponent_damage,
            },
        }
    }

    /// Create a round-ended event.
    pub fn round_ended(at: Duration, round: u32, winner: Option<Side>) -> Self {
        Self {
            at,
            data: BoutEventData::RoundEnded { round, winner },
        }
    }

    /// Create a bout-ended event.
    pub fn bout_ended(at: Duration, outcome: BoutOutcome) -> Self {
        Self {
            at,
            data: BoutEventData::BoutEnded { outcome },
        }
    }
}
