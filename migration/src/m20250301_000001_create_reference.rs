use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Port::Table)
                    .if_not_exists()
                    .col(pk_auto(Port::Id))
                    .col(string_len(Port::Name, 100).not_null().unique_key())
                    .col(string_len(Port::City, 100).not_null())
                    .col(boolean(Port::Active).not_null().default(true))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vessel::Table)
                    .if_not_exists()
                    .col(pk_auto(Vessel::Id))
                    .col(string_len(Vessel::Name, 100).not_null())
                    .col(integer(Vessel::Capacity).not_null())
                    .col(string_len(Vessel::Status, 20).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Route::Table)
                    .if_not_exists()
                    .col(pk_auto(Route::Id))
                    .col(integer(Route::OriginPortId).not_null())
                    .col(integer(Route::DestinationPortId).not_null())
                    .col(integer(Route::DurationHours).not_null())
                    .col(string_len(Route::Status, 20).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_route_origin_port")
                            .from(Route::Table, Route::OriginPortId)
                            .to(Port::Table, Port::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_route_destination_port")
                            .from(Route::Table, Route::DestinationPortId)
                            .to(Port::Table, Port::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Route::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vessel::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Port::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Port {
    Table,
    Id,
    Name,
    City,
    Active,
}

#[derive(DeriveIden)]
pub enum Vessel {
    Table,
    Id,
    Name,
    Capacity,
    Status,
}

#[derive(DeriveIden)]
pub enum Route {
    Table,
    Id,
    OriginPortId,
    DestinationPortId,
    DurationHours,
    Status,
}
