use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OutboxRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OutboxRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OutboxRecords::Kind).string().not_null())
                    .col(
                        ColumnDef::new(OutboxRecords::Payload)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OutboxRecords::RetryCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OutboxRecords::Processed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(OutboxRecords::LastError).string())
                    .col(
                        ColumnDef::new(OutboxRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OutboxRecords::ProcessedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index for the relay poll query (processed = false AND retry_count < max).
        manager
            .create_index(
                Index::create()
                    .table(OutboxRecords::Table)
                    .col(OutboxRecords::Processed)
                    .col(OutboxRecords::RetryCount)
                    .name("idx_outbox_records_processed_retry_count")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OutboxRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OutboxRecords {
    Table,
    Id,
    Kind,
    Payload,
    RetryCount,
    Processed,
    LastError,
    CreatedAt,
    ProcessedAt,
}
