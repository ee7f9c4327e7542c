use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Documents {
    Table,
    Id,
    Kind,
    Code,
    AmountMinor,
    DocumentDate,
    PeriodMonth,
    PeriodYear,
    CheckNo,
    BankRef,
    MemberRef,
    Remarks,
    NoOfWeeks,
    CreatedBy,
    CreatedAt,
    DeletedAt,
    DeletedBy,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Documents::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Documents::Kind).string().not_null())
                    .col(ColumnDef::new(Documents::Code).string().not_null())
                    .col(
                        ColumnDef::new(Documents::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Documents::DocumentDate).date().not_null())
                    .col(ColumnDef::new(Documents::PeriodMonth).integer().not_null())
                    .col(ColumnDef::new(Documents::PeriodYear).integer().not_null())
                    .col(ColumnDef::new(Documents::CheckNo).string())
                    .col(ColumnDef::new(Documents::BankRef).string())
                    .col(ColumnDef::new(Documents::MemberRef).string())
                    .col(ColumnDef::new(Documents::Remarks).string())
                    .col(ColumnDef::new(Documents::NoOfWeeks).integer())
                    .col(ColumnDef::new(Documents::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Documents::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Documents::DeletedAt).timestamp())
                    .col(ColumnDef::new(Documents::DeletedBy).string())
                    .to_owned(),
            )
            .await?;

        // Code uniqueness spans every kind but only among surviving rows, so
        // it is enforced by the engine rather than a unique index.
        manager
            .create_index(
                Index::create()
                    .name("idx-documents-code")
                    .table(Documents::Table)
                    .col(Documents::Code)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-documents-kind")
                    .table(Documents::Table)
                    .col(Documents::Kind)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await?;
        Ok(())
    }
}
