use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Passenger::Table)
                    .if_not_exists()
                    .col(uuid(Passenger::Id).primary_key())
                    .col(string_len(Passenger::GivenNames, 100).not_null())
                    .col(string_len(Passenger::Surnames, 100).not_null())
                    .col(date(Passenger::BirthDate).not_null())
                    .col(string_len(Passenger::DocumentType, 20).not_null())
                    .col(string_len(Passenger::DocumentNumber, 50).not_null())
                    .col(string_len(Passenger::Nationality, 50).not_null())
                    .col(string_len_null(Passenger::Phone, 20))
                    .col(string_len_null(Passenger::Email, 100))
                    .col(
                        timestamp_with_time_zone(Passenger::RegisteredAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .index(
                        Index::create()
                            .name("uq_passenger_document")
                            .col(Passenger::DocumentType)
                            .col(Passenger::DocumentNumber)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Passenger::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Passenger {
    Table,
    Id,
    GivenNames,
    Surnames,
    BirthDate,
    DocumentType,
    DocumentNumber,
    Nationality,
    Phone,
    Email,
    RegisteredAt,
}
