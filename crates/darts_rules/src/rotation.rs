//! Whose turn it is, derived purely from ledger length and the frozen order.

use tracing::instrument;

use crate::error::ScoringError;
use crate::ledger::TurnLedger;
use crate::player::{PlayerId, PlayerOrder};

/// Seat index that throws after `turns` recorded turns.
///
/// # Errors
///
/// Returns [`ScoringError::EmptyRoster`] when there are no seats.
pub fn active_seat(turns: usize, seats: usize) -> Result<usize, ScoringError> {
    if seats == 0 {
        return Err(ScoringError::EmptyRoster);
    }
    Ok(turns % seats)
}

/// Player whose turn it is.
///
/// # Errors
///
/// Returns [`ScoringError::EmptyRoster`] when the order is empty.
#[instrument(skip_all, fields(turns = ledger.len(), seats = order.len()))]
pub fn active_player<'a>(
    ledger: &TurnLedger,
    order: &'a PlayerOrder,
) -> Result<&'a PlayerId, ScoringError> {
    let seat = active_seat(ledger.len(), order.len())?;
    order.get(seat).ok_or(ScoringError::EmptyRoster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TurnScore;
    use crate::Dart;
    use chrono::Utc;

    #[test]
    fn test_rotation_wraps_on_frozen_order() {
        let order = PlayerOrder::new(vec!["p1".into(), "p2".into(), "p3".into()]);
        let mut ledger = TurnLedger::new();
        for seat in ["p1", "p2", "p3", "p1"] {
            assert_eq!(active_player(&ledger, &order).unwrap(), seat);
            ledger.append(
                seat.into(),
                vec![Dart::miss()],
                TurnScore::points(0),
                Utc::now(),
            );
        }
        assert_eq!(active_player(&ledger, &order).unwrap(), "p2");
    }

    #[test]
    fn test_empty_order_is_an_error() {
        let order = PlayerOrder::default();
        assert_eq!(
            active_player(&TurnLedger::new(), &order),
            Err(ScoringError::EmptyRoster)
        );
        assert_eq!(active_seat(4, 0), Err(ScoringError::EmptyRoster));
    }
}
