use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::discount_rule::ValueType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
pub enum PenaltyKind {
    #[sea_orm(string_value = "CANCELLATION")]
    Cancellation,
    #[sea_orm(string_value = "REPROGRAMMING")]
    Reprogramming,
    #[sea_orm(string_value = "BAGGAGE")]
    Baggage,
    #[sea_orm(string_value = "GENERIC")]
    Generic,
}

/// Raw rule row. Non-baggage kinds populate `value_type`/`value`; the
/// baggage kind populates `allowance_kg`/`price_per_kilo`. The service
/// layer converts rows into `PenaltyPolicy`, which makes the two shapes
/// mutually exclusive at the type level.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "penalty_rule")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: PenaltyKind,
    pub description: String,
    pub value_type: Option<ValueType>,
    pub value: Option<Decimal>,
    pub allowance_kg: Option<i32>,
    pub price_per_kilo: Option<Decimal>,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
