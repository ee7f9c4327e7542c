use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum ActivityLogs {
    Table,
    Id,
    Actor,
    Activity,
    ResourceKind,
    ResourceId,
    RecordedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityLogs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivityLogs::Actor).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::Activity).string().not_null())
                    .col(
                        ColumnDef::new(ActivityLogs::ResourceKind)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActivityLogs::ResourceId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActivityLogs::RecordedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-activity_logs-resource")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::ResourceKind)
                    .col(ActivityLogs::ResourceId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
            .await?;
        Ok(())
    }
}
