use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Todos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Todos::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Todos::Title, 255))
                    .col(integer(Todos::Priority).default(2))
                    .col(boolean(Todos::Completed).default(false))
                    .col(
                        timestamp_with_time_zone(Todos::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Todos::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 1 = high, 2 = medium, 3 = low
        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE todos ADD CONSTRAINT todos_priority_range CHECK (priority BETWEEN 1 AND 3)",
            )
            .await?;

        for (name, column) in [
            ("idx_todos_priority", Todos::Priority),
            ("idx_todos_completed", Todos::Completed),
            ("idx_todos_created_at", Todos::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Todos::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Todos::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Todos {
    Table,
    Id,
    Title,
    Priority,
    Completed,
    CreatedAt,
    UpdatedAt,
}
