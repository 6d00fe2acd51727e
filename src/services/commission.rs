use rust_decimal::Decimal;

use crate::entities::agency;
use crate::entities::discount_rule::ValueType;
use crate::utils::money::apply_percentage;

/// Commission earned by the selling agency on a reservation total.
/// Direct sales (no agency) earn nothing. Percentage commissions are
/// rounded half-up to two decimals; fixed amounts are returned as
/// configured.
pub fn commission_for_sale(agency: Option<&agency::Model>, sale_total: Decimal) -> Decimal {
    let Some(agency) = agency else {
        return Decimal::ZERO;
    };

    match agency.commission_type {
        ValueType::Percentage => apply_percentage(sale_total, agency.commission_value),
        ValueType::FixedAmount => agency.commission_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::agency::AgencyStatus;
    use rust_decimal_macros::dec;

    fn agency_with(commission_type: ValueType, commission_value: Decimal) -> agency::Model {
        agency::Model {
            id: 1,
            name: "Rio Amazonas Tours".to_string(),
            tax_id: "20123456789".to_string(),
            address: None,
            phone: None,
            commission_type,
            commission_value,
            status: AgencyStatus::Active,
        }
    }

    #[test]
    fn direct_sales_earn_no_commission() {
        assert_eq!(commission_for_sale(None, dec!(500.00)), Decimal::ZERO);
    }

    #[test]
    fn percentage_commission_rounds_half_up() {
        let agency = agency_with(ValueType::Percentage, dec!(12.5));
        // 12.5% of 100.10 = 12.5125 -> 12.51
        assert_eq!(commission_for_sale(Some(&agency), dec!(100.10)), dec!(12.51));
    }

    #[test]
    fn fixed_commission_is_returned_as_configured() {
        let agency = agency_with(ValueType::FixedAmount, dec!(35.00));
        assert_eq!(commission_for_sale(Some(&agency), dec!(10.00)), dec!(35.00));
    }
}
