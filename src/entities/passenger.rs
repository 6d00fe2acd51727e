use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum DocumentType {
    #[sea_orm(string_value = "DNI")]
    Dni,
    #[sea_orm(string_value = "PASSPORT")]
    Passport,
    #[sea_orm(string_value = "FOREIGNER_CARD")]
    ForeignerCard,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "passenger")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub given_names: String,
    pub surnames: String,
    pub birth_date: Date,
    pub document_type: DocumentType,
    pub document_number: String,
    pub nationality: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub registered_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reservation_detail::Entity")]
    ReservationDetails,
}

impl Related<super::reservation_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReservationDetails.def()
    }
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_names, self.surnames)
    }
}

impl ActiveModelBehavior for ActiveModel {}
