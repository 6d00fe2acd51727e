use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Agency::Table)
                    .if_not_exists()
                    .col(pk_auto(Agency::Id))
                    .col(string_len(Agency::Name, 100).not_null())
                    .col(string_len(Agency::TaxId, 11).not_null().unique_key())
                    .col(string_len_null(Agency::Address, 200))
                    .col(string_len_null(Agency::Phone, 20))
                    .col(string_len(Agency::CommissionType, 20).not_null())
                    .col(decimal_len(Agency::CommissionValue, 10, 2).not_null())
                    .col(string_len(Agency::Status, 20).not_null())
                    .to_owned(),
            )
            .await?;

        // Create user role enum
        manager
            .create_type(
                Type::create()
                    .as_enum(UserRole::Enum)
                    .values([UserRole::Admin, UserRole::SalesAdvisor, UserRole::Agency])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Email, 255).not_null().unique_key())
                    .col(string_len(User::PasswordHash, 255).not_null())
                    .col(string_len(User::Name, 100).not_null())
                    .col(
                        ColumnDef::new(User::Role)
                            .custom(UserRole::Enum)
                            .not_null(),
                    )
                    .col(integer_null(User::AgencyId))
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_agency")
                            .from(User::Table, User::AgencyId)
                            .to(Agency::Table, Agency::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(UserRole::Enum).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Agency::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Agency {
    Table,
    Id,
    Name,
    TaxId,
    Address,
    Phone,
    CommissionType,
    CommissionValue,
    Status,
}

#[derive(DeriveIden)]
pub enum User {
    Table,
    Id,
    Email,
    PasswordHash,
    Name,
    Role,
    AgencyId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum UserRole {
    #[sea_orm(iden = "user_role")]
    Enum,
    #[sea_orm(iden = "admin")]
    Admin,
    #[sea_orm(iden = "sales_advisor")]
    SalesAdvisor,
    #[sea_orm(iden = "agency")]
    Agency,
}
