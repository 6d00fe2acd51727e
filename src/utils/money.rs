use rust_decimal::{Decimal, RoundingStrategy};

/// Round to 2 decimal places, half-up (midpoint away from zero).
/// All fare, penalty and commission figures are carried at this scale.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `part` as a percentage of `base`, rounded half-up to 2 decimals.
/// Used to back-derive a percentage from a fixed-amount rule value.
/// A zero base (nothing paid yet) yields zero instead of dividing.
pub fn percentage_of(part: Decimal, base: Decimal) -> Decimal {
    if base.is_zero() {
        return Decimal::ZERO;
    }
    round2(part * Decimal::from(100) / base)
}

/// Apply `pct` percent to `base`, rounded half-up to 2 decimals.
pub fn apply_percentage(base: Decimal, pct: Decimal) -> Decimal {
    round2(base * pct / Decimal::from(100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_up() {
        assert_eq!(round2(dec!(10.005)), dec!(10.01));
        assert_eq!(round2(dec!(10.004)), dec!(10.00));
    }

    #[test]
    fn applies_percentage() {
        assert_eq!(apply_percentage(dec!(100.00), dec!(50)), dec!(50.00));
        assert_eq!(apply_percentage(dec!(33.33), dec!(10)), dec!(3.33));
    }

    #[test]
    fn back_derives_percentage() {
        assert_eq!(percentage_of(dec!(30.00), dec!(120.00)), dec!(25.00));
        // Small bases inflate the derived percentage; preserved as-is.
        assert_eq!(percentage_of(dec!(30.00), dec!(10.00)), dec!(300.00));
    }

    #[test]
    fn zero_base_derives_zero_percent() {
        assert_eq!(percentage_of(dec!(25.00), Decimal::ZERO), Decimal::ZERO);
    }
}
