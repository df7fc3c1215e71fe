//! Combat Logic Module
//!
//! All bout simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `types`: quadrants, gestures, observations, sides, outcomes
//! - `stability`: per-quadrant gesture debouncing
//! - `state`: bout state, phase machine, commands, snapshot
//! - `resolve`: rock-paper-scissors damage resolution
//! - `tick`: per-frame update loop
//! - `events`: bout events for presentation/audio
//! - `announcer`: injected audio cue seam

pub mod announcer;
pub mod events;
pub mod resolve;
pub mod stability;
pub mod state;
pub mod tick;
pub mod types;

// Re-export key types
pub use announcer::{Announcer, SilentAnnouncer};
pub use events::{BoutEvent, BoutEventData};
pub use stability::{StabilityConfig, StabilityFilter};
pub use state::{BoutPhase, BoutSnapshot, BoutState};
pub use tick::{tick, BoutConfig, TickResult};
pub use types::{BoutOutcome, Gesture, Observation, Quadrant, Side};
