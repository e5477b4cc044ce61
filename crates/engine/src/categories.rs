//! Categories classify dishes.

use sea_orm::entity::prelude::*;

use crate::{
    meta::{EntityMeta, entity_meta},
    repository::SoftDelete,
};

/// A dish category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub meta: EntityMeta,
    pub name: String,
}

/// A category annotated with the number of its live (non-deleted) dishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryStats {
    pub category: Category,
    pub dish_count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub name_norm: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    pub deleted: bool,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dishes::Entity")]
    Dishes,
}

impl Related<super::dishes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dishes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl SoftDelete for Entity {
    const LABEL: &'static str = "category";

    fn id_column() -> Column {
        Column::Id
    }

    fn name_column() -> Column {
        Column::Name
    }

    fn name_norm_column() -> Column {
        Column::NameNorm
    }

    fn created_at_column() -> Column {
        Column::CreatedAt
    }

    fn updated_at_column() -> Column {
        Column::UpdatedAt
    }

    fn deleted_at_column() -> Column {
        Column::DeletedAt
    }

    fn deleted_column() -> Column {
        Column::Deleted
    }

    fn is_active_column() -> Column {
        Column::IsActive
    }
}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            meta: entity_meta!(model),
            name: model.name,
        }
    }
}
