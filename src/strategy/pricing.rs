//! Adaptive limit pricing for batched order submission.

use rust_decimal::{Decimal, RoundingStrategy};

/// Per-position discount step applied to the aggressiveness factor.
fn position_step() -> Decimal {
    Decimal::new(5, 3) // 0.005
}

/// Floor of the aggressiveness factor.
fn aggressiveness_floor() -> Decimal {
    Decimal::new(98, 2) // 0.98
}

/// Compute the limit price to submit for the order at `batch_position`
/// (zero-based, within the current batch).
///
/// Below the operator ceiling the price is shaded off the market price by an
/// aggressiveness factor of `max(0.98, 1 - 0.005 * position)`: later orders
/// in the same batch are priced closer to market on the assumption that the
/// batch's own demand moves it. The submitted price never exceeds the
/// ceiling. Rounded half-away-from-zero to 4 decimal places.
pub fn adaptive_price(current_price: Decimal, ceiling: Decimal, batch_position: usize) -> Decimal {
    let price = if current_price < ceiling {
        let shading = position_step() * Decimal::from(batch_position as u64);
        let aggressiveness = (Decimal::ONE - shading).max(aggressiveness_floor());
        current_price * aggressiveness
    } else {
        ceiling
    };

    price.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}
