//! Helpers shared by the slab, surcharge and inverse calculators.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a rupee amount to whole paise, halves away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use itax_core::calculations::common::round_to_paise;
///
/// assert_eq!(round_to_paise(dec!(1508395.5223)), dec!(1508395.52));
/// assert_eq!(round_to_paise(dec!(26000.105)), dec!(26000.11));
/// ```
pub fn round_to_paise(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The smaller of two upper bounds, where `None` stands for +∞.
pub fn lower_ceiling(
    a: Option<Decimal>,
    b: Option<Decimal>,
) -> Option<Decimal> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}
