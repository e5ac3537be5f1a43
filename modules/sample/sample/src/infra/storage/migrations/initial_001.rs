use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sample::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sample::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sample::Name).string().not_null())
                    .col(ColumnDef::new(Sample::Birthday).date().not_null())
                    .col(ColumnDef::new(Sample::IsJapanese).boolean().not_null())
                    .col(
                        ColumnDef::new(Sample::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sample::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sample::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Sample::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Every read filters on is_deleted and orders by created_at.
        manager
            .create_index(
                Index::create()
                    .name("idx_sample_visible_created")
                    .table(Sample::Table)
                    .col(Sample::IsDeleted)
                    .col(Sample::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sample::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Sample {
    Table,
    Id,
    Name,
    Birthday,
    IsJapanese,
    CreatedAt,
    UpdatedAt,
    IsDeleted,
    DeletedAt,
}
