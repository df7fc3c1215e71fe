//! Exchange Resolution
//!
//! Pure damage scoring for one exchange. Given both boards, the outcome is
//! fully determined: a defended quadrant becomes a rock-paper-scissors
//! duel, an undefended one lands a flat direct hit.

use crate::game::state::ActionBoard;
use crate::game::tick::BoutConfig;
use crate::game::types::{Gesture, Side};

/// Damage totals from one exchange, per side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExchangeDamage {
    /// Damage the player takes.
    pub player: u32,
    /// Damage the opponent takes.
    pub opponent: u32,
}

/// Winner of a single gesture confrontation, or `None` on a tie.
#[inline]
pub fn duel(player: Gesture, opponent: Gesture) -> Option<Side> {
    if player.beats(opponent) {
        Some(Side::Player)
    } else if opponent.beats(player) {
        Some(Side::Opponent)
    } else {
        None
    }
}

/// Score one exchange. Damage is independent per quadrant and summed per
/// side; applying it to health is the caller's business.
///
/// - Player-selected quadrant the opponent also selected: RPS duel, the
///   loser takes `clash_damage`, a tie exchanges nothing.
/// - Player-selected quadrant with no defender: opponent takes
///   `direct_hit_damage`.
/// - Opponent-selected quadrant the player left open: player takes
///   `direct_hit_damage`.
pub fn score_exchange(
    player: &ActionBoard,
    opponent: &ActionBoard,
    config: &BoutConfig,
) -> ExchangeDamage {
    let mut damage = ExchangeDamage::default();

    for &quadrant in player.selected() {
        let Some(player_gesture) = player.action(quadrant) else {
            continue;
        };

        match (opponent.is_selected(quadrant), opponent.action(quadrant)) {
            (true, Some(opponent_gesture)) => match duel(player_gesture, opponent_gesture) {
                Some(Side::Player) => damage.opponent += config.clash_damage,
                Some(Side::Opponent) => damage.player += config.clash_damage,
                None => {}
            },
            // No defender in this quadrant: clean hit.
            _ => damage.opponent += config.direct_hit_damage,
        }
    }

    for &quadrant in opponent.selected() {
        if !player.is_selected(quadrant) {
            damage.player += config.direct_hit_damage;
        }
    }

    damage
}

// =============================================================================
// TESTS
// =============================================================================
