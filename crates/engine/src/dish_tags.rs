//! Junction table between dishes and food tags.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dish_tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub dish_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub food_tag_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dishes::Entity",
        from = "Column::DishId",
        to = "super::dishes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Dish,
    #[sea_orm(
        belongs_to = "super::food_tags::Entity",
        from = "Column::FoodTagId",
        to = "super::food_tags::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    FoodTag,
}

impl Related<super::dishes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dish.def()
    }
}

impl Related<super::food_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoodTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
