use sea_orm_migration::prelude::*;

use crate::m20260105_000002_documents::Documents;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum PaymentSchedules {
    Table,
    Id,
    DocumentId,
    WeekNo,
    DueDate,
    Paid,
    DeletedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentSchedules::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentSchedules::DocumentId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentSchedules::WeekNo)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentSchedules::DueDate).date().not_null())
                    .col(
                        ColumnDef::new(PaymentSchedules::Paid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(PaymentSchedules::DeletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payment_schedules-document_id")
                            .from(PaymentSchedules::Table, PaymentSchedules::DocumentId)
                            .to(Documents::Table, Documents::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payment_schedules-document_id")
                    .table(PaymentSchedules::Table)
                    .col(PaymentSchedules::DocumentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentSchedules::Table).to_owned())
            .await?;
        Ok(())
    }
}
