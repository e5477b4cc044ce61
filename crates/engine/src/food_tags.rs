//! Food tags label dishes with dietary and allergen information.

use sea_orm::entity::prelude::*;

use crate::{
    meta::{EntityMeta, entity_meta},
    repository::SoftDelete,
};

/// A dietary/allergen label such as "Vegan" or "Gluten-free".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoodTag {
    pub meta: EntityMeta,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "food_tags")]
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
    #[sea_orm(has_many = "super::dish_tags::Entity")]
    DishTags,
}

impl Related<super::dish_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DishTags.def()
    }
}

impl Related<super::dishes::Entity> for Entity {
    fn to() -> RelationDef {
        super::dish_tags::Relation::Dish.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::dish_tags::Relation::FoodTag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl SoftDelete for Entity {
    const LABEL: &'static str = "food tag";

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

impl From<Model> for FoodTag {
    fn from(model: Model) -> Self {
        Self {
            meta: entity_meta!(model),
            name: model.name,
        }
    }
}
