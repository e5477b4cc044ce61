//! Base fields shared by every catalogue entity.

use chrono::{DateTime, Utc};

/// Identity, timestamps and lifecycle flags of a row.
///
/// Embedded by value in [`Category`], [`FoodTag`] and [`Dish`].
///
/// [`Category`]: crate::Category
/// [`FoodTag`]: crate::FoodTag
/// [`Dish`]: crate::Dish
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityMeta {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set together with `deleted` by the soft delete.
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted: bool,
    pub is_active: bool,
}

/// Builds an [`EntityMeta`] from any model carrying the base columns.
macro_rules! entity_meta {
    ($model:expr) => {
        $crate::meta::EntityMeta {
            id: $model.id,
            created_at: $model.created_at,
            updated_at: $model.updated_at,
            deleted_at: $model.deleted_at,
            deleted: $model.deleted,
            is_active: $model.is_active,
        }
    };
}

pub(crate) use entity_meta;
