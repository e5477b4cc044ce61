//! Catalogue schema: categories, food tags, dishes and the dish/tag junction.
//!
//! Every catalogue table carries the soft-delete base columns. Names are unique
//! among live rows only, which needs a partial index (`WHERE NOT deleted`); the
//! `*_norm` columns hold the folded text used by the accent-insensitive search.

use sea_orm::{ConnectionTrait, Statement};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    NameNorm,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
    Deleted,
    IsActive,
}

#[derive(Iden)]
enum FoodTags {
    Table,
    Id,
    Name,
    NameNorm,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
    Deleted,
    IsActive,
}

#[derive(Iden)]
enum Dishes {
    Table,
    Id,
    Name,
    NameNorm,
    Description,
    DescriptionNorm,
    PriceCents,
    Image,
    CategoryId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
    Deleted,
    IsActive,
}

#[derive(Iden)]
enum DishTags {
    Table,
    DishId,
    FoodTagId,
}

/// Tables whose `name` must be unique among live rows.
const LIVE_NAME_INDEXES: [(&str, &str); 3] = [
    ("idx_categories_name_live", "categories"),
    ("idx_food_tags_name_live", "food_tags"),
    ("idx_dishes_name_live", "dishes"),
];

/// Base columns shared by every catalogue table.
fn base_columns<T>(
    table: &mut TableCreateStatement,
    created_at: T,
    updated_at: T,
    deleted_at: T,
    deleted: T,
    is_active: T,
) -> &mut TableCreateStatement
where
    T: IntoIden,
{
    table
        .col(
            ColumnDef::new(created_at)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(updated_at)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(deleted_at).timestamp_with_time_zone())
        .col(ColumnDef::new(deleted).boolean().not_null().default(false))
        .col(ColumnDef::new(is_active).boolean().not_null().default(true))
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Categories
        // ───────────────────────────────────────────────────────────────────
        let mut categories = Table::create();
        categories
            .table(Categories::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Categories::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Categories::Name).string_len(150).not_null())
            .col(ColumnDef::new(Categories::NameNorm).string_len(150).not_null());
        base_columns(
            &mut categories,
            Categories::CreatedAt,
            Categories::UpdatedAt,
            Categories::DeletedAt,
            Categories::Deleted,
            Categories::IsActive,
        );
        manager.create_table(categories.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-name_norm")
                    .table(Categories::Table)
                    .col(Categories::NameNorm)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Food tags
        // ───────────────────────────────────────────────────────────────────
        let mut food_tags = Table::create();
        food_tags
            .table(FoodTags::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(FoodTags::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(FoodTags::Name).string_len(150).not_null())
            .col(ColumnDef::new(FoodTags::NameNorm).string_len(150).not_null());
        base_columns(
            &mut food_tags,
            FoodTags::CreatedAt,
            FoodTags::UpdatedAt,
            FoodTags::DeletedAt,
            FoodTags::Deleted,
            FoodTags::IsActive,
        );
        manager.create_table(food_tags.to_owned()).await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Dishes
        // ───────────────────────────────────────────────────────────────────
        let mut dishes = Table::create();
        dishes
            .table(Dishes::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Dishes::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Dishes::Name).string_len(150).not_null())
            .col(ColumnDef::new(Dishes::NameNorm).string_len(150).not_null())
            .col(
                ColumnDef::new(Dishes::Description)
                    .text()
                    .not_null()
                    .default(""),
            )
            .col(
                ColumnDef::new(Dishes::DescriptionNorm)
                    .text()
                    .not_null()
                    .default(""),
            )
            .col(ColumnDef::new(Dishes::PriceCents).big_integer().not_null())
            .col(ColumnDef::new(Dishes::Image).string())
            .col(ColumnDef::new(Dishes::CategoryId).integer())
            .foreign_key(
                ForeignKey::create()
                    .name("fk-dishes-category_id")
                    .from(Dishes::Table, Dishes::CategoryId)
                    .to(Categories::Table, Categories::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            );
        base_columns(
            &mut dishes,
            Dishes::CreatedAt,
            Dishes::UpdatedAt,
            Dishes::DeletedAt,
            Dishes::Deleted,
            Dishes::IsActive,
        );
        manager.create_table(dishes.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-dishes-category_id")
                    .table(Dishes::Table)
                    .col(Dishes::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-dishes-name_norm")
                    .table(Dishes::Table)
                    .col(Dishes::NameNorm)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Dish tags
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DishTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DishTags::DishId).integer().not_null())
                    .col(ColumnDef::new(DishTags::FoodTagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(DishTags::DishId)
                            .col(DishTags::FoodTagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-dish_tags-dish_id")
                            .from(DishTags::Table, DishTags::DishId)
                            .to(Dishes::Table, Dishes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-dish_tags-food_tag_id")
                            .from(DishTags::Table, DishTags::FoodTagId)
                            .to(FoodTags::Table, FoodTags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-dish_tags-food_tag_id")
                    .table(DishTags::Table)
                    .col(DishTags::FoodTagId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Live name uniqueness (partial indexes)
        // ───────────────────────────────────────────────────────────────────
        let db = manager.get_connection();
        let backend = db.get_database_backend();
        for (index, table) in LIVE_NAME_INDEXES {
            db.execute(Statement::from_string(
                backend,
                format!("CREATE UNIQUE INDEX IF NOT EXISTS {index} ON {table} (name) WHERE NOT deleted;"),
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();
        for (index, _) in LIVE_NAME_INDEXES {
            db.execute(Statement::from_string(
                backend,
                format!("DROP INDEX IF EXISTS {index};"),
            ))
            .await?;
        }

        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(DishTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Dishes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FoodTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        Ok(())
    }
}
