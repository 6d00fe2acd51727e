use rust_decimal::Decimal;

/// Free-allowance tariff for checked baggage.
#[derive(Debug, Clone, PartialEq)]
pub struct BaggagePolicy {
    pub allowance_kg: Decimal,
    pub price_per_kilo: Decimal,
}

impl BaggagePolicy {
    /// Fallback tariff used when no active baggage rule exists:
    /// 15 kg free, 10.00 per excess kilo.
    pub fn default_tariff() -> Self {
        Self {
            allowance_kg: Decimal::from(15),
            price_per_kilo: Decimal::from(10),
        }
    }
}

/// Costed excess for one piece of baggage.
#[derive(Debug, Clone, PartialEq)]
pub struct BaggageCharge {
    pub allowance_kg: Decimal,
    pub price_per_kilo: Decimal,
    pub excess_kg: Decimal,
    pub excess_cost: Decimal,
}

/// Excess cost for a given weight. The cost is stored as computed,
/// without rounding; only the standalone tariff endpoint rounds for
/// display.
pub fn excess_for_weight(weight_kg: Decimal, policy: &BaggagePolicy) -> BaggageCharge {
    let excess_kg = (weight_kg - policy.allowance_kg).max(Decimal::ZERO);
    BaggageCharge {
        allowance_kg: policy.allowance_kg,
        price_per_kilo: policy.price_per_kilo,
        excess_kg,
        excess_cost: excess_kg * policy.price_per_kilo,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn charges_only_above_the_allowance() {
        // 25.5 kg against 15 kg free at 10.00/kg
        let charge = excess_for_weight(dec!(25.5), &BaggagePolicy::default_tariff());
        assert_eq!(charge.excess_kg, dec!(10.5));
        assert_eq!(charge.excess_cost, dec!(105.00));
    }

    #[test]
    fn weight_within_allowance_is_free() {
        let charge = excess_for_weight(dec!(15), &BaggagePolicy::default_tariff());
        assert_eq!(charge.excess_kg, Decimal::ZERO);
        assert_eq!(charge.excess_cost, Decimal::ZERO);

        let light = excess_for_weight(dec!(3.2), &BaggagePolicy::default_tariff());
        assert_eq!(light.excess_cost, Decimal::ZERO);
    }

    #[test]
    fn cost_is_stored_unrounded() {
        let policy = BaggagePolicy {
            allowance_kg: dec!(15),
            price_per_kilo: dec!(9.99),
        };
        let charge = excess_for_weight(dec!(20.333), &policy);
        assert_eq!(charge.excess_kg, dec!(5.333));
        assert_eq!(charge.excess_cost, dec!(53.27667));
    }
}
