//! Shadow Clash Demo Bout
//!
//! Drives the combat core through a scripted best-of-three bout with a
//! synthetic 30 Hz observation feed, logging every event, and dumps the
//! final snapshot as JSON.

use std::time::Duration;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use shadow_clash::{
    tick, Announcer, BoutConfig, BoutEventData, BoutPhase, BoutState, DeterministicRng, Gesture,
    Observation, Quadrant, RoundRules, VERSION,
};

/// Frame period of the synthetic feed (~30 Hz).
const FRAME: Duration = Duration::from_millis(33);

/// Ring announcer that logs a randomly chosen intro line.
struct LogAnnouncer {
    rng: DeterministicRng,
}

const INTRO_LINES: [&str; 4] = [
    "Ladies and gentlemen... it's clobbering time!",
    "Two fighters, four corners, no mercy!",
    "Keep those hands up and those gestures steady!",
    "Round start - show me what you've got!",
];

impl Announcer for LogAnnouncer {
    fn round_start(&mut self) {
        let line = self
            .rng
            .choose(&INTRO_LINES)
            .copied()
            .unwrap_or(INTRO_LINES[0]);
        info!("announcer: {line}");
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Shadow Clash Core v{}", VERSION);

    let config = BoutConfig {
        rounds: Some(RoundRules::default()),
        ..BoutConfig::default()
    };
    config.validate()?;

    let seed = 0xC1A5_u64;
    info!("Bout seed: {}", seed);
    info!(
        "Mode: best-of-{} ({} wins to take it)",
        config.rounds.map(|r| r.max_rounds).unwrap_or(1),
        config.rounds.map(|r| r.wins_needed).unwrap_or(1),
    );

    let mut state = BoutState::new(seed);
    let mut announcer = LogAnnouncer {
        rng: DeterministicRng::new(seed ^ 0xA0D10),
    };

    // Rotating attack plans for the scripted player.
    let plans: [[(Quadrant, Gesture); 2]; 3] = [
        [
            (Quadrant::TopLeft, Gesture::Rock),
            (Quadrant::BottomRight, Gesture::Scissors),
        ],
        [
            (Quadrant::TopRight, Gesture::Paper),
            (Quadrant::BottomLeft, Gesture::Rock),
        ],
        [
            (Quadrant::TopLeft, Gesture::Scissors),
            (Quadrant::TopRight, Gesture::Paper),
        ],
    ];

    let mut now = Duration::ZERO;
    let mut exchange = 0usize;
    let mut total_events = 0usize;

    for _ in 0..100_000 {
        now += FRAME;

        if matches!(state.phase, BoutPhase::Waiting) {
            state.start_round(now);
        }

        let observations: Vec<Observation> = if matches!(state.phase, BoutPhase::Playing) {
            plans[exchange % plans.len()]
                .iter()
                .map(|&(quadrant, gesture)| Observation {
                    quadrant,
                    gesture: Some(gesture),
                })
                .collect()
        } else {
            Vec::new()
        };

        let result = tick(&mut state, &observations, now, &config, &mut announcer);
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                BoutEventData::CountdownStarted { round } => {
                    info!("[{:>6.2}s] Countdown for round {}", now.as_secs_f64(), round);
                }
                BoutEventData::RoundStarted { round } => {
                    info!("[{:>6.2}s] Round {} - FIGHT", now.as_secs_f64(), round);
                }
                BoutEventData::ActionConfirmed { quadrant, gesture } => {
                    info!(
                        "[{:>6.2}s] Player locked {:?} in {:?}",
                        now.as_secs_f64(),
                        gesture,
                        quadrant
                    );
                }
                BoutEventData::ActionExpired { quadrant } => {
                    info!("[{:>6.2}s] Player released {:?}", now.as_secs_f64(), quadrant);
                }
                BoutEventData::ExchangeResolved {
                    player_damage,
                    opponent_damage,
                } => {
                    exchange += 1;
                    info!(
                        "[{:>6.2}s] Exchange: player -{} opponent -{} (health {} / {})",
                        now.as_secs_f64(),
                        player_damage,
                        opponent_damage,
                        state.player.health,
                        state.opponent.health
                    );
                }
                BoutEventData::RoundEnded { round, winner } => {
                    info!(
                        "[{:>6.2}s] Round {} goes to {:?}",
                        now.as_secs_f64(),
                        round,
                        winner
                    );
                }
                BoutEventData::BoutEnded { outcome } => {
                    info!("[{:>6.2}s] Bout over: {:?}", now.as_secs_f64(), outcome);
                }
            }
        }

        if result.bout_over {
            break;
        }
    }

    info!("=== Final Snapshot ===");
    info!("Exchanges fought: {}", exchange);
    info!("Events emitted: {}", total_events);

    let snapshot = state.snapshot(now, &config);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
