use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::entities::discount_rule::ValueType;
use crate::entities::penalty_rule::{self, PenaltyKind};
use crate::error::{AppError, AppResult};
use crate::services::baggage::BaggagePolicy;
use crate::utils::money::{apply_percentage, percentage_of};

/// A percentage or fixed-amount charge.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSpec {
    pub value_type: ValueType,
    pub value: Decimal,
}

/// Validated penalty configuration, one variant per rule kind. Built
/// from `penalty_rule` rows so the compute paths never re-check which
/// columns are populated.
#[derive(Debug, Clone, PartialEq)]
pub enum PenaltyPolicy {
    Cancellation { description: String, rate: RateSpec },
    Reprogramming { description: String, rate: RateSpec },
    Generic { description: String, rate: RateSpec },
    Baggage { description: String, policy: BaggagePolicy },
}

impl PenaltyPolicy {
    /// Rate and label for the charge-bearing variants. Baggage rules
    /// carry a tariff instead and return `None`.
    pub fn rate(&self) -> Option<(&RateSpec, &str)> {
        match self {
            PenaltyPolicy::Cancellation { description, rate }
            | PenaltyPolicy::Reprogramming { description, rate }
            | PenaltyPolicy::Generic { description, rate } => Some((rate, description)),
            PenaltyPolicy::Baggage { .. } => None,
        }
    }

    pub fn baggage(&self) -> Option<&BaggagePolicy> {
        match self {
            PenaltyPolicy::Baggage { policy, .. } => Some(policy),
            _ => None,
        }
    }
}

impl TryFrom<&penalty_rule::Model> for PenaltyPolicy {
    type Error = AppError;

    fn try_from(row: &penalty_rule::Model) -> AppResult<Self> {
        let rate = || -> AppResult<RateSpec> {
            match (row.value_type.clone(), row.value) {
                (Some(value_type), Some(value)) => Ok(RateSpec { value_type, value }),
                _ => Err(AppError::Internal(format!(
                    "Penalty rule {} is missing its rate configuration",
                    row.id
                ))),
            }
        };

        match row.kind {
            PenaltyKind::Cancellation => Ok(PenaltyPolicy::Cancellation {
                description: row.description.clone(),
                rate: rate()?,
            }),
            PenaltyKind::Reprogramming => Ok(PenaltyPolicy::Reprogramming {
                description: row.description.clone(),
                rate: rate()?,
            }),
            PenaltyKind::Generic => Ok(PenaltyPolicy::Generic {
                description: row.description.clone(),
                rate: rate()?,
            }),
            PenaltyKind::Baggage => match (row.allowance_kg, row.price_per_kilo) {
                (Some(allowance), Some(price)) => Ok(PenaltyPolicy::Baggage {
                    description: row.description.clone(),
                    policy: BaggagePolicy {
                        allowance_kg: Decimal::from(allowance),
                        price_per_kilo: price,
                    },
                }),
                _ => Err(AppError::Internal(format!(
                    "Baggage rule {} is missing its tariff configuration",
                    row.id
                ))),
            },
        }
    }
}

/// Computed penalty for a cancellation or reprogramming.
#[derive(Debug, Clone, PartialEq)]
pub struct PenaltyOutcome {
    pub penalty_pct: Decimal,
    pub penalty_amount: Decimal,
    pub refund_amount: Decimal,
    pub rule_description: String,
}

impl PenaltyOutcome {
    fn waived(amount_paid: Decimal, description: &str) -> Self {
        Self {
            penalty_pct: Decimal::ZERO,
            penalty_amount: Decimal::ZERO,
            refund_amount: amount_paid,
            rule_description: description.to_string(),
        }
    }
}

/// Charge for backing out of (or moving) a reservation.
///
/// Bookings made the same day they are cancelled are exempt. Operations
/// with less than one full day of notice before travel are logged but
/// not charged differently; the active rule applies either way.
pub fn compute_penalty(
    code: &str,
    booked_on: NaiveDate,
    amount_paid: Decimal,
    travel_date: NaiveDate,
    today: NaiveDate,
    policy: Option<&PenaltyPolicy>,
) -> PenaltyOutcome {
    if booked_on == today {
        return PenaltyOutcome::waived(amount_paid, "Same-day booking, no penalty");
    }

    let notice_days = (travel_date - today).num_days();
    if notice_days < 1 {
        warn!(
            reservation = %code,
            notice_days,
            "operation with less than one day of notice before travel"
        );
    }

    let Some((rate, description)) = policy.and_then(|p| p.rate()) else {
        warn!(reservation = %code, "no active penalty rule, waiving charge");
        return PenaltyOutcome::waived(amount_paid, "No active penalty rule");
    };

    let (penalty_pct, penalty_amount) = match rate.value_type {
        ValueType::Percentage => (rate.value, apply_percentage(amount_paid, rate.value)),
        ValueType::FixedAmount => (percentage_of(rate.value, amount_paid), rate.value),
    };

    let refund_amount = (amount_paid - penalty_amount).max(Decimal::ZERO);

    PenaltyOutcome {
        penalty_pct,
        penalty_amount,
        refund_amount,
        rule_description: description.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cancellation_policy(value_type: ValueType, value: Decimal) -> PenaltyPolicy {
        PenaltyPolicy::Cancellation {
            description: "Cancellation charge".to_string(),
            rate: RateSpec { value_type, value },
        }
    }

    #[test]
    fn percentage_penalty_splits_paid_amount() {
        // Paid 150.00, 20% cancellation rule
        let policy = cancellation_policy(ValueType::Percentage, dec!(20));
        let outcome = compute_penalty(
            "RV-2025-000001",
            date(2025, 6, 1),
            dec!(150.00),
            date(2025, 7, 10),
            date(2025, 6, 20),
            Some(&policy),
        );

        assert_eq!(outcome.penalty_amount, dec!(30.00));
        assert_eq!(outcome.refund_amount, dec!(120.00));
        assert_eq!(outcome.penalty_pct, dec!(20));
    }

    #[test]
    fn same_day_booking_is_exempt() {
        let policy = cancellation_policy(ValueType::Percentage, dec!(20));
        let today = date(2025, 6, 20);
        let outcome = compute_penalty(
            "RV-2025-000002",
            today,
            dec!(150.00),
            date(2025, 7, 10),
            today,
            Some(&policy),
        );

        assert_eq!(outcome.penalty_amount, Decimal::ZERO);
        assert_eq!(outcome.refund_amount, dec!(150.00));
    }

    #[test]
    fn missing_rule_waives_the_charge() {
        let outcome = compute_penalty(
            "RV-2025-000003",
            date(2025, 6, 1),
            dec!(150.00),
            date(2025, 7, 10),
            date(2025, 6, 20),
            None,
        );

        assert_eq!(outcome.penalty_amount, Decimal::ZERO);
        assert_eq!(outcome.refund_amount, dec!(150.00));
        assert_eq!(outcome.rule_description, "No active penalty rule");
    }

    #[test]
    fn fixed_amount_back_derives_percentage() {
        let policy = cancellation_policy(ValueType::FixedAmount, dec!(25.00));
        let outcome = compute_penalty(
            "RV-2025-000004",
            date(2025, 6, 1),
            dec!(200.00),
            date(2025, 7, 10),
            date(2025, 6, 20),
            Some(&policy),
        );

        assert_eq!(outcome.penalty_amount, dec!(25.00));
        assert_eq!(outcome.penalty_pct, dec!(12.50));
        assert_eq!(outcome.refund_amount, dec!(175.00));
    }

    #[test]
    fn fixed_amount_penalty_on_unpaid_reservation_does_not_divide() {
        // A pending reservation with nothing paid can still be cancelled.
        let policy = cancellation_policy(ValueType::FixedAmount, dec!(25.00));
        let outcome = compute_penalty(
            "RV-2025-000008",
            date(2025, 6, 19),
            Decimal::ZERO,
            date(2025, 7, 10),
            date(2025, 6, 20),
            Some(&policy),
        );

        assert_eq!(outcome.penalty_pct, Decimal::ZERO);
        assert_eq!(outcome.penalty_amount, dec!(25.00));
        assert_eq!(outcome.refund_amount, Decimal::ZERO);
    }

    #[test]
    fn refund_floors_at_zero() {
        let policy = cancellation_policy(ValueType::FixedAmount, dec!(500.00));
        let outcome = compute_penalty(
            "RV-2025-000005",
            date(2025, 6, 1),
            dec!(100.00),
            date(2025, 7, 10),
            date(2025, 6, 20),
            Some(&policy),
        );

        assert_eq!(outcome.refund_amount, Decimal::ZERO);
    }

    #[test]
    fn short_notice_still_applies_the_standard_rate() {
        // Travel is today; the charge is the same as with ample notice.
        let policy = cancellation_policy(ValueType::Percentage, dec!(20));
        let outcome = compute_penalty(
            "RV-2025-000006",
            date(2025, 6, 1),
            dec!(150.00),
            date(2025, 6, 20),
            date(2025, 6, 20),
            Some(&policy),
        );

        assert_eq!(outcome.penalty_amount, dec!(30.00));
        assert_eq!(outcome.refund_amount, dec!(120.00));
    }

    #[test]
    fn rule_rows_convert_into_policies() {
        let row = penalty_rule::Model {
            id: 1,
            kind: PenaltyKind::Baggage,
            description: "Excess baggage tariff".to_string(),
            value_type: None,
            value: None,
            allowance_kg: Some(15),
            price_per_kilo: Some(dec!(10.00)),
            active: true,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap().into(),
        };

        let policy = PenaltyPolicy::try_from(&row).unwrap();
        let tariff = policy.baggage().unwrap();
        assert_eq!(tariff.allowance_kg, dec!(15));
        assert_eq!(tariff.price_per_kilo, dec!(10.00));
    }

    #[test]
    fn incomplete_rule_rows_are_rejected() {
        let row = penalty_rule::Model {
            id: 2,
            kind: PenaltyKind::Cancellation,
            description: "Broken".to_string(),
            value_type: Some(ValueType::Percentage),
            value: None,
            allowance_kg: None,
            price_per_kilo: None,
            active: true,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap().into(),
        };

        assert!(PenaltyPolicy::try_from(&row).is_err());
    }
}
