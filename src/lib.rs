//! # Shadow Clash Combat Core
//!
//! Deterministic combat state machine for Shadow Clash, a gesture-driven
//! quadrant boxing game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SHADOW CLASH CORE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                 │
//! │  └── rng.rs       - Xorshift128+ PRNG, seed derivation       │
//! │                                                              │
//! │  game/            - Combat logic (deterministic)             │
//! │  ├── types.rs     - Quadrants, gestures, observations        │
//! │  ├── stability.rs - Gesture debouncing filter                │
//! │  ├── state.rs     - Bout state, phases, commands, snapshot   │
//! │  ├── resolve.rs   - Rock-paper-scissors damage resolution    │
//! │  ├── tick.rs      - Per-frame update loop                    │
//! │  ├── events.rs    - Bout events for presentation/audio       │
//! │  └── announcer.rs - Injected audio cue seam                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Camera capture, hand-landmark extraction, gesture classification,
//! rendering, and audio playback all live outside this crate. The core
//! consumes a per-tick stream of `(quadrant, gesture)` observations plus a
//! monotonic clock reading, and exposes a read-only [`BoutSnapshot`] for the
//! presentation layer.
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - No system time reads; the caller supplies `now` on every tick
//! - All randomness from seeded Xorshift128+
//! - No interior mutability, no threads, no blocking I/O
//!
//! Given the same seed, tick timestamps, and observation stream, a bout
//! plays out identically on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::rng::DeterministicRng;
pub use crate::game::announcer::{Announcer, SilentAnnouncer};
pub use crate::game::events::{BoutEvent, BoutEventData};
pub use crate::game::stability::{StabilityConfig, StabilityFilter};
pub use crate::game::state::{
    ActionBoard, BoutPhase, BoutSnapshot, BoutState, DamageFeedback, FighterState, RoundScore,
};
pub use crate::game::tick::{tick, BoutConfig, ConfigError, RoundRules, TickResult};
pub use crate::game::types::{BoutOutcome, Gesture, Observation, Quadrant, Side};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Starting (and maximum) health per side
pub const MAX_HEALTH: u32 = 100;

/// Number of quadrants a side commits to per exchange
pub const SELECTIONS_PER_EXCHANGE: usize = 2;
