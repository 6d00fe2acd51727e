use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000001_create_reference::{Route, Vessel};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RouteFare::Table)
                    .if_not_exists()
                    .col(pk_auto(RouteFare::Id))
                    .col(integer(RouteFare::RouteId).not_null())
                    .col(decimal_len(RouteFare::BasePrice, 10, 2).not_null())
                    .col(
                        timestamp_with_time_zone(RouteFare::StartsAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(RouteFare::EndsAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_route_fare_route")
                            .from(RouteFare::Table, RouteFare::RouteId)
                            .to(Route::Table, Route::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Trip::Table)
                    .if_not_exists()
                    .col(uuid(Trip::Id).primary_key())
                    .col(integer(Trip::RouteId).not_null())
                    .col(integer(Trip::VesselId).not_null())
                    .col(date(Trip::TravelDate).not_null())
                    .col(time(Trip::BoardingTime).not_null())
                    .col(integer(Trip::SeatsAvailable).not_null())
                    .col(integer(Trip::SeatsOccupied).not_null().default(0))
                    .col(string_len(Trip::Status, 20).not_null())
                    .col(
                        timestamp_with_time_zone(Trip::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trip_route")
                            .from(Trip::Table, Trip::RouteId)
                            .to(Route::Table, Route::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trip_vessel")
                            .from(Trip::Table, Trip::VesselId)
                            .to(Vessel::Table, Vessel::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trip_route_travel_date")
                    .table(Trip::Table)
                    .col(Trip::RouteId)
                    .col(Trip::TravelDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trip::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RouteFare::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum RouteFare {
    Table,
    Id,
    RouteId,
    BasePrice,
    StartsAt,
    EndsAt,
}

#[derive(DeriveIden)]
pub enum Trip {
    Table,
    Id,
    RouteId,
    VesselId,
    TravelDate,
    BoardingTime,
    SeatsAvailable,
    SeatsOccupied,
    Status,
    CreatedAt,
}
