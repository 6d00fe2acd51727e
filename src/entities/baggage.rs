use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "baggage")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub reservation_id: Uuid,
    #[sea_orm(unique)]
    pub detail_id: Uuid,
    pub passenger_id: Uuid,
    pub weight_kg: Decimal,
    pub included_allowance_kg: Decimal,
    pub excess_kg: Decimal,
    pub volume_m3: Option<Decimal>,
    pub price_per_kilo: Decimal,
    pub excess_cost: Decimal,
    pub description: Option<String>,
    pub registered_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reservation::Entity",
        from = "Column::ReservationId",
        to = "super::reservation::Column::Id"
    )]
    Reservation,
    #[sea_orm(
        belongs_to = "super::reservation_detail::Entity",
        from = "Column::DetailId",
        to = "super::reservation_detail::Column::Id"
    )]
    Detail,
    #[sea_orm(
        belongs_to = "super::passenger::Entity",
        from = "Column::PassengerId",
        to = "super::passenger::Column::Id"
    )]
    Passenger,
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl Model {
    pub fn has_excess(&self) -> bool {
        self.excess_kg > Decimal::ZERO
    }
}

impl ActiveModelBehavior for ActiveModel {}
