use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum RouteStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "route")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub origin_port_id: i32,
    pub destination_port_id: i32,
    pub duration_hours: i32,
    pub status: RouteStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::port::Entity",
        from = "Column::OriginPortId",
        to = "super::port::Column::Id"
    )]
    OriginPort,
    #[sea_orm(
        belongs_to = "super::port::Entity",
        from = "Column::DestinationPortId",
        to = "super::port::Column::Id"
    )]
    DestinationPort,
    #[sea_orm(has_many = "super::route_fare::Entity")]
    Fares,
    #[sea_orm(has_many = "super::trip::Entity")]
    Trips,
}

impl Related<super::route_fare::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fares.def()
    }
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
