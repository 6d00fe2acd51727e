use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000002_create_agencies_users::{Agency, User};
use super::m20250301_000003_create_trips_fares::Trip;
use super::m20250301_000005_create_passengers::Passenger;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservation::Table)
                    .if_not_exists()
                    .col(uuid(Reservation::Id).primary_key())
                    .col(string_len(Reservation::Code, 50).not_null().unique_key())
                    .col(uuid(Reservation::TripId).not_null())
                    .col(uuid(Reservation::UserId).not_null())
                    .col(integer_null(Reservation::AgencyId))
                    .col(string_len(Reservation::Origin, 100).not_null())
                    .col(string_len(Reservation::Destination, 100).not_null())
                    .col(decimal_len(Reservation::Total, 10, 2).not_null())
                    .col(decimal_len(Reservation::AmountPaid, 10, 2).not_null())
                    .col(decimal_len(Reservation::BalanceDue, 10, 2).not_null())
                    .col(decimal_len(Reservation::PenaltyApplied, 10, 2).not_null())
                    .col(decimal_len(Reservation::AgencyCommission, 10, 2).not_null())
                    .col(string_len(Reservation::Status, 20).not_null())
                    .col(
                        timestamp_with_time_zone(Reservation::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Reservation::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_trip")
                            .from(Reservation::Table, Reservation::TripId)
                            .to(Trip::Table, Trip::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_user")
                            .from(Reservation::Table, Reservation::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_agency")
                            .from(Reservation::Table, Reservation::AgencyId)
                            .to(Agency::Table, Agency::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReservationDetail::Table)
                    .if_not_exists()
                    .col(uuid(ReservationDetail::Id).primary_key())
                    .col(uuid(ReservationDetail::ReservationId).not_null())
                    .col(uuid(ReservationDetail::PassengerId).not_null())
                    .col(string_len(ReservationDetail::FareTier, 50).not_null())
                    .col(decimal_len(ReservationDetail::BasePrice, 10, 2).not_null())
                    .col(decimal_len(ReservationDetail::DiscountPct, 5, 2).not_null())
                    .col(decimal_len(ReservationDetail::DiscountAmount, 10, 2).not_null())
                    .col(decimal_len(ReservationDetail::FinalPrice, 10, 2).not_null())
                    .index(
                        Index::create()
                            .name("uq_detail_reservation_passenger")
                            .col(ReservationDetail::ReservationId)
                            .col(ReservationDetail::PassengerId)
                            .unique(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_detail_reservation")
                            .from(ReservationDetail::Table, ReservationDetail::ReservationId)
                            .to(Reservation::Table, Reservation::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_detail_passenger")
                            .from(ReservationDetail::Table, ReservationDetail::PassengerId)
                            .to(Passenger::Table, Passenger::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(uuid(Payment::Id).primary_key())
                    .col(uuid(Payment::ReservationId).not_null())
                    .col(string_len(Payment::Purpose, 30).not_null())
                    .col(string_len(Payment::Method, 30).not_null())
                    .col(decimal_len(Payment::Amount, 10, 2).not_null())
                    .col(string_len_null(Payment::TransactionRef, 100))
                    .col(string_len(Payment::Status, 20).not_null())
                    .col(
                        timestamp_with_time_zone(Payment::PaidAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_reservation")
                            .from(Payment::Table, Payment::ReservationId)
                            .to(Reservation::Table, Reservation::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Baggage::Table)
                    .if_not_exists()
                    .col(uuid(Baggage::Id).primary_key())
                    .col(uuid(Baggage::ReservationId).not_null())
                    .col(uuid(Baggage::DetailId).not_null().unique_key())
                    .col(uuid(Baggage::PassengerId).not_null())
                    .col(decimal_len(Baggage::WeightKg, 5, 2).not_null())
                    .col(decimal_len(Baggage::IncludedAllowanceKg, 5, 2).not_null())
                    .col(decimal_len(Baggage::ExcessKg, 5, 2).not_null())
                    .col(decimal_len_null(Baggage::VolumeM3, 5, 2))
                    .col(decimal_len(Baggage::PricePerKilo, 10, 2).not_null())
                    // Stored as computed, without rounding to cents
                    .col(decimal_len(Baggage::ExcessCost, 12, 4).not_null())
                    .col(string_len_null(Baggage::Description, 200))
                    .col(
                        timestamp_with_time_zone(Baggage::RegisteredAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_baggage_reservation")
                            .from(Baggage::Table, Baggage::ReservationId)
                            .to(Reservation::Table, Reservation::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_baggage_detail")
                            .from(Baggage::Table, Baggage::DetailId)
                            .to(ReservationDetail::Table, ReservationDetail::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_baggage_passenger")
                            .from(Baggage::Table, Baggage::PassengerId)
                            .to(Passenger::Table, Passenger::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cancellation::Table)
                    .if_not_exists()
                    .col(uuid(Cancellation::Id).primary_key())
                    .col(uuid(Cancellation::ReservationId).not_null())
                    .col(string_len(Cancellation::Operation, 30).not_null())
                    .col(uuid(Cancellation::OriginalTripId).not_null())
                    .col(uuid_null(Cancellation::NewTripId))
                    .col(decimal_len(Cancellation::OriginalAmount, 10, 2).not_null())
                    .col(decimal_len(Cancellation::PenaltyPct, 5, 2).not_null())
                    .col(decimal_len(Cancellation::PenaltyAmount, 10, 2).not_null())
                    .col(decimal_len(Cancellation::RefundAmount, 10, 2).not_null())
                    .col(text_null(Cancellation::Reason))
                    .col(uuid(Cancellation::UserId).not_null())
                    .col(
                        timestamp_with_time_zone(Cancellation::RecordedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cancellation_reservation")
                            .from(Cancellation::Table, Cancellation::ReservationId)
                            .to(Reservation::Table, Reservation::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cancellation_original_trip")
                            .from(Cancellation::Table, Cancellation::OriginalTripId)
                            .to(Trip::Table, Trip::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cancellation_new_trip")
                            .from(Cancellation::Table, Cancellation::NewTripId)
                            .to(Trip::Table, Trip::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cancellation_user")
                            .from(Cancellation::Table, Cancellation::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cancellation::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Baggage::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReservationDetail::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reservation::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Reservation {
    Table,
    Id,
    Code,
    TripId,
    UserId,
    AgencyId,
    Origin,
    Destination,
    Total,
    AmountPaid,
    BalanceDue,
    PenaltyApplied,
    AgencyCommission,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum ReservationDetail {
    Table,
    Id,
    ReservationId,
    PassengerId,
    FareTier,
    BasePrice,
    DiscountPct,
    DiscountAmount,
    FinalPrice,
}

#[derive(DeriveIden)]
pub enum Payment {
    Table,
    Id,
    ReservationId,
    Purpose,
    Method,
    Amount,
    TransactionRef,
    Status,
    PaidAt,
}

#[derive(DeriveIden)]
pub enum Baggage {
    Table,
    Id,
    ReservationId,
    DetailId,
    PassengerId,
    WeightKg,
    IncludedAllowanceKg,
    ExcessKg,
    VolumeM3,
    PricePerKilo,
    ExcessCost,
    Description,
    RegisteredAt,
}

#[derive(DeriveIden)]
pub enum Cancellation {
    Table,
    Id,
    ReservationId,
    Operation,
    OriginalTripId,
    NewTripId,
    OriginalAmount,
    PenaltyPct,
    PenaltyAmount,
    RefundAmount,
    Reason,
    UserId,
    RecordedAt,
}
