//! The module contains the `Dish` struct, the main item of the menu.

use sea_orm::entity::prelude::*;

use crate::{
    Category, FoodTag, Price, ResultEngine,
    meta::{EntityMeta, entity_meta},
    repository::SoftDelete,
};

/// A dish of the menu.
///
/// Relations are preloaded by the query service: `category` is the live
/// category referenced by `category_id` (if any) and `tags` holds the live
/// food tags ordered by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dish {
    pub meta: EntityMeta,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Path of the uploaded picture, relative to the media root.
    pub image: Option<String>,
    pub category_id: Option<i32>,
    pub category: Option<Category>,
    pub tags: Vec<FoodTag>,
}

impl Dish {
    /// Build a dish from its row, without relations.
    pub fn from_model(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            meta: entity_meta!(model),
            price: Price::new(model.price_cents)?,
            name: model.name,
            description: model.description,
            image: model.image,
            category_id: model.category_id,
            category: None,
            tags: Vec::new(),
        })
    }

    pub fn tag_ids(&self) -> Vec<i32> {
        self.tags.iter().map(|tag| tag.meta.id).collect()
    }
}

/// A group of dishes shown together on the menu page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DishSection {
    Category { category: Category, dishes: Vec<Dish> },
    Uncategorized { dishes: Vec<Dish> },
}

impl DishSection {
    pub fn dishes(&self) -> &[Dish] {
        match self {
            Self::Category { dishes, .. } | Self::Uncategorized { dishes } => dishes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dishes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub name_norm: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub description_norm: String,
    pub price_cents: i64,
    pub image: Option<String>,
    pub category_id: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    pub deleted: bool,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(has_many = "super::dish_tags::Entity")]
    DishTags,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::dish_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DishTags.def()
    }
}

impl Related<super::food_tags::Entity> for Entity {
    fn to() -> RelationDef {
        super::dish_tags::Relation::FoodTag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::dish_tags::Relation::Dish.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl SoftDelete for Entity {
    const LABEL: &'static str = "dish";

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
