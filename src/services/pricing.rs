use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::entities::discount_rule::{self, ValueType};
use crate::utils::money::{apply_percentage, percentage_of, round2};

/// Priced fare for a single passenger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareQuote {
    pub fare_tier: String,
    pub base_price: Decimal,
    pub discount_pct: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
}

/// Whole years between `birth_date` and `on`.
pub fn age_in_years(birth_date: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - birth_date.year();
    if (on.month(), on.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Price one passenger against the active discount rule set.
///
/// Among the rules matching the passenger's age at travel date, the one
/// with the highest raw `value` wins. Percentage and fixed-amount rules
/// are compared on raw magnitude, not on the monetary discount they
/// would yield; with mixed rule types this can pick a worse-for-customer
/// rule. Kept as-is pending a product decision (see DESIGN.md).
pub fn price_for_passenger(
    base_price: Decimal,
    birth_date: NaiveDate,
    travel_date: NaiveDate,
    rules: &[discount_rule::Model],
) -> FareQuote {
    let age = age_in_years(birth_date, travel_date);

    let mut best: Option<&discount_rule::Model> = None;
    for rule in rules.iter().filter(|r| r.applies_to_age(age)) {
        // Strict comparison keeps the first rule on ties.
        if best.is_none_or(|b| rule.value > b.value) {
            best = Some(rule);
        }
    }

    let Some(rule) = best else {
        return FareQuote {
            fare_tier: fallback_tier(age).to_string(),
            base_price,
            discount_pct: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            final_price: base_price,
        };
    };

    let (discount_pct, discount_amount) = match rule.value_type {
        ValueType::Percentage => (rule.value, apply_percentage(base_price, rule.value)),
        ValueType::FixedAmount => (percentage_of(rule.value, base_price), rule.value),
    };

    let final_price = (base_price - discount_amount).max(Decimal::ZERO);

    FareQuote {
        fare_tier: rule.description.clone(),
        base_price,
        discount_pct,
        discount_amount,
        final_price,
    }
}

/// Tier label when no discount rule matches the passenger's age.
fn fallback_tier(age: i32) -> &'static str {
    if (0..=2).contains(&age) {
        "Lap infant 0-2 (free)"
    } else if (3..=5).contains(&age) {
        "Child 3-5 (half fare)"
    } else {
        "Adult (full fare)"
    }
}

/// Minimum initial payment required to confirm a booking: 50% of total.
pub fn minimum_advance(total: Decimal) -> Decimal {
    round2(total * Decimal::from(50) / Decimal::from(100))
}

pub fn is_advance_sufficient(amount: Decimal, total: Decimal) -> bool {
    amount >= minimum_advance(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn rule(
        id: i32,
        min_age: Option<i32>,
        max_age: Option<i32>,
        value_type: ValueType,
        value: Decimal,
    ) -> discount_rule::Model {
        discount_rule::Model {
            id,
            description: format!("rule {}", id),
            min_age,
            max_age,
            value_type,
            value,
            active: true,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap().into(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn computes_whole_year_age() {
        assert_eq!(age_in_years(date(2021, 6, 15), date(2025, 6, 14)), 3);
        assert_eq!(age_in_years(date(2021, 6, 15), date(2025, 6, 15)), 4);
    }

    #[test]
    fn percentage_rule_halves_child_fare() {
        // Base fare 100.00, age 4, active rule 0-5 at 50%
        let rules = vec![rule(1, Some(0), Some(5), ValueType::Percentage, dec!(50))];
        let quote =
            price_for_passenger(dec!(100.00), date(2021, 1, 10), date(2025, 6, 1), &rules);

        assert_eq!(quote.final_price, dec!(50.00));
        assert_eq!(quote.discount_amount, dec!(50.00));
        assert_eq!(quote.discount_pct, dec!(50));
    }

    #[test]
    fn no_rule_falls_back_to_age_bracket_tier() {
        let quote = price_for_passenger(dec!(80.00), date(2021, 1, 10), date(2025, 6, 1), &[]);
        assert_eq!(quote.fare_tier, "Child 3-5 (half fare)");
        assert_eq!(quote.final_price, dec!(80.00));
        assert_eq!(quote.discount_pct, Decimal::ZERO);

        let adult = price_for_passenger(dec!(80.00), date(1990, 1, 10), date(2025, 6, 1), &[]);
        assert_eq!(adult.fare_tier, "Adult (full fare)");

        let infant = price_for_passenger(dec!(80.00), date(2024, 1, 10), date(2025, 6, 1), &[]);
        assert_eq!(infant.fare_tier, "Lap infant 0-2 (free)");
    }

    #[test]
    fn fixed_amount_back_derives_percentage() {
        let rules = vec![rule(1, None, None, ValueType::FixedAmount, dec!(30.00))];
        let quote =
            price_for_passenger(dec!(120.00), date(1990, 1, 1), date(2025, 6, 1), &rules);

        assert_eq!(quote.discount_amount, dec!(30.00));
        assert_eq!(quote.discount_pct, dec!(25.00));
        assert_eq!(quote.final_price, dec!(90.00));
    }

    #[test]
    fn final_price_floors_at_zero() {
        let rules = vec![rule(1, None, None, ValueType::FixedAmount, dec!(150.00))];
        let quote =
            price_for_passenger(dec!(100.00), date(1990, 1, 1), date(2025, 6, 1), &rules);
        assert_eq!(quote.final_price, Decimal::ZERO);
    }

    #[test]
    fn best_rule_compares_raw_values_across_types() {
        // A fixed amount of 30 beats a 10% rule numerically even though
        // 10% of 1000.00 would discount more. Preserved behavior.
        let rules = vec![
            rule(1, None, None, ValueType::Percentage, dec!(10)),
            rule(2, None, None, ValueType::FixedAmount, dec!(30.00)),
        ];
        let quote =
            price_for_passenger(dec!(1000.00), date(1990, 1, 1), date(2025, 6, 1), &rules);
        assert_eq!(quote.fare_tier, "rule 2");
        assert_eq!(quote.discount_amount, dec!(30.00));
    }

    #[test]
    fn ties_keep_first_rule() {
        let rules = vec![
            rule(1, None, None, ValueType::Percentage, dec!(20)),
            rule(2, None, None, ValueType::Percentage, dec!(20)),
        ];
        let quote =
            price_for_passenger(dec!(100.00), date(1990, 1, 1), date(2025, 6, 1), &rules);
        assert_eq!(quote.fare_tier, "rule 1");
    }

    #[test]
    fn inactive_and_out_of_range_rules_are_ignored() {
        let mut inactive = rule(1, None, None, ValueType::Percentage, dec!(90));
        inactive.active = false;
        let rules = vec![
            inactive,
            rule(2, Some(0), Some(5), ValueType::Percentage, dec!(50)),
        ];
        let quote =
            price_for_passenger(dec!(100.00), date(1990, 1, 1), date(2025, 6, 1), &rules);
        assert_eq!(quote.final_price, dec!(100.00));
    }

    #[test]
    fn advance_minimum_is_half_of_total() {
        assert_eq!(minimum_advance(dec!(200.00)), dec!(100.00));
        assert!(!is_advance_sufficient(dec!(90.00), dec!(200.00)));
        assert!(is_advance_sufficient(dec!(100.00), dec!(200.00)));
        assert!(is_advance_sufficient(dec!(200.00), dec!(200.00)));
    }
}
