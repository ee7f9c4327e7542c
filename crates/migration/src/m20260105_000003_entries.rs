use sea_orm_migration::prelude::*;

use crate::m20260105_000002_documents::Documents;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Entries {
    Table,
    Id,
    DocumentId,
    LineNo,
    AccountCode,
    DebitMinor,
    CreditMinor,
    MemberRef,
    DueDate,
    WeekNo,
    DeletedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Entries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Entries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Entries::DocumentId).string().not_null())
                    .col(ColumnDef::new(Entries::LineNo).integer().not_null())
                    .col(ColumnDef::new(Entries::AccountCode).string().not_null())
                    .col(
                        ColumnDef::new(Entries::DebitMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Entries::CreditMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Entries::MemberRef).string())
                    .col(ColumnDef::new(Entries::DueDate).date())
                    .col(ColumnDef::new(Entries::WeekNo).integer())
                    .col(ColumnDef::new(Entries::DeletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-entries-document_id")
                            .from(Entries::Table, Entries::DocumentId)
                            .to(Documents::Table, Documents::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-entries-document_id")
                    .table(Entries::Table)
                    .col(Entries::DocumentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entries::Table).to_owned())
            .await?;
        Ok(())
    }
}
