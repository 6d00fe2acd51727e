use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DiscountRule::Table)
                    .if_not_exists()
                    .col(pk_auto(DiscountRule::Id))
                    .col(string_len(DiscountRule::Description, 200).not_null())
                    .col(integer_null(DiscountRule::MinAge))
                    .col(integer_null(DiscountRule::MaxAge))
                    .col(string_len(DiscountRule::ValueType, 20).not_null())
                    .col(decimal_len(DiscountRule::Value, 10, 2).not_null())
                    .col(boolean(DiscountRule::Active).not_null().default(true))
                    .col(
                        timestamp_with_time_zone(DiscountRule::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PenaltyRule::Table)
                    .if_not_exists()
                    .col(pk_auto(PenaltyRule::Id))
                    .col(string_len(PenaltyRule::Kind, 30).not_null())
                    .col(string_len(PenaltyRule::Description, 200).not_null())
                    .col(string_len_null(PenaltyRule::ValueType, 20))
                    .col(decimal_len_null(PenaltyRule::Value, 10, 2))
                    .col(integer_null(PenaltyRule::AllowanceKg))
                    .col(decimal_len_null(PenaltyRule::PricePerKilo, 10, 2))
                    .col(boolean(PenaltyRule::Active).not_null().default(true))
                    .col(
                        timestamp_with_time_zone(PenaltyRule::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Seed default rules
        let discounts = Query::insert()
            .into_table(DiscountRule::Table)
            .columns([
                DiscountRule::Description,
                DiscountRule::MinAge,
                DiscountRule::MaxAge,
                DiscountRule::ValueType,
                DiscountRule::Value,
            ])
            .values_panic([
                "Lap infant 0-2 (free)".into(),
                0.into(),
                2.into(),
                "PERCENTAGE".into(),
                100.00.into(),
            ])
            .values_panic([
                "Child 3-5 (half fare)".into(),
                3.into(),
                5.into(),
                "PERCENTAGE".into(),
                50.00.into(),
            ])
            .to_owned();

        manager.exec_stmt(discounts).await?;

        let penalties = Query::insert()
            .into_table(PenaltyRule::Table)
            .columns([
                PenaltyRule::Kind,
                PenaltyRule::Description,
                PenaltyRule::ValueType,
                PenaltyRule::Value,
                PenaltyRule::AllowanceKg,
                PenaltyRule::PricePerKilo,
            ])
            .values_panic([
                "CANCELLATION".into(),
                "Cancellation after booking day".into(),
                "PERCENTAGE".into(),
                20.00.into(),
                Value::Int(None).into(),
                Value::Double(None).into(),
            ])
            .values_panic([
                "REPROGRAMMING".into(),
                "Trip change after booking day".into(),
                "PERCENTAGE".into(),
                10.00.into(),
                Value::Int(None).into(),
                Value::Double(None).into(),
            ])
            .values_panic([
                "BAGGAGE".into(),
                "Checked baggage excess tariff".into(),
                Value::String(None).into(),
                Value::Double(None).into(),
                15.into(),
                10.00.into(),
            ])
            .to_owned();

        manager.exec_stmt(penalties).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PenaltyRule::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DiscountRule::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DiscountRule {
    Table,
    Id,
    Description,
    MinAge,
    MaxAge,
    ValueType,
    Value,
    Active,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum PenaltyRule {
    Table,
    Id,
    Kind,
    Description,
    ValueType,
    Value,
    AllowanceKg,
    PricePerKilo,
    Active,
    CreatedAt,
}
