use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a nullable field that may also be omitted.
///
/// Omitted gives `None` (through `#[serde(default)]`), `null` gives
/// `Some(None)` and a value gives `Some(Some(value))`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Error body returned by every failing route.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// One page of a listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub num_pages: u64,
    pub has_next: bool,
    pub next_page: Option<u64>,
}

pub mod dish {
    use super::*;

    /// Query string of `GET /dishes` and `GET /dishes/sections`.
    ///
    /// Every value is kept as text: an empty value counts as absent and the
    /// server rejects ids that are not numbers.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DishListQuery {
        pub search: Option<String>,
        pub category: Option<String>,
        pub tag: Option<String>,
        /// `active` (default), `inactive` or `all`.
        pub status: Option<String>,
        pub page: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DishNew {
        pub name: String,
        #[serde(default)]
        pub description: String,
        /// Decimal string such as `"4200.00"` or `"12,5"`.
        pub price: String,
        pub image: Option<String>,
        pub category: Option<i32>,
        #[serde(default)]
        pub tags: Vec<i32>,
    }

    /// Partial update. Omitted fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DishUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub price: Option<String>,
        /// `null` removes the image.
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub image: Option<Option<String>>,
        /// `null` moves the dish out of its category.
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub category: Option<Option<i32>>,
        /// Omitted keeps the tags, `[]` removes them all.
        pub tags: Option<Vec<i32>>,
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryRef {
        pub id: i32,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DishView {
        pub id: i32,
        pub name: String,
        pub description: String,
        /// Price rendered with two decimals, e.g. `"4200.00"`.
        pub price: String,
        pub price_minor: i64,
        pub image: Option<String>,
        pub is_active: bool,
        pub category: Option<CategoryRef>,
        pub tags: Vec<super::food_tag::FoodTagView>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// A block of the menu page.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    pub enum DishSectionView {
        Category {
            category: CategoryRef,
            dishes: Vec<DishView>,
        },
        Uncategorized {
            dishes: Vec<DishView>,
        },
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryListQuery {
        pub search: Option<String>,
        pub status: Option<String>,
        pub page: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i32,
        pub name: String,
        pub is_active: bool,
        /// Live dishes of the category, present in listings.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub dish_count: Option<u64>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod food_tag {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct FoodTagListQuery {
        pub search: Option<String>,
        pub page: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FoodTagNew {
        pub name: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct FoodTagUpdate {
        pub name: Option<String>,
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FoodTagView {
        pub id: i32,
        pub name: String,
        pub is_active: bool,
    }
}

pub mod stats {
    use super::*;

    /// Catalogue counters. Deleted rows are never counted.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Statistic {
        pub dishes: u64,
        pub active_dishes: u64,
        pub categories: u64,
        pub categories_with_dishes: u64,
        pub food_tags: u64,
    }
}
