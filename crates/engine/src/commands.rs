//! Command structs for engine operations.
//!
//! These types group parameters for write operations (create/update), keeping
//! call sites readable and avoiding long argument lists.
//!
//! Patches follow one rule: a field left to `None` is not touched. Nullable
//! columns use `Option<Option<_>>`, where `Some(None)` clears the value.

use crate::Price;

/// Create a dish.
#[derive(Clone, Debug)]
pub struct DishCreate {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image: Option<String>,
    pub category_id: Option<i32>,
    pub tag_ids: Vec<i32>,
}

impl DishCreate {
    #[must_use]
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            price,
            image: None,
            category_id: None,
            tag_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn tags(mut self, tag_ids: impl Into<Vec<i32>>) -> Self {
        self.tag_ids = tag_ids.into();
        self
    }
}

/// Partial update of a dish.
#[derive(Clone, Debug, Default)]
pub struct DishPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub image: Option<Option<String>>,
    pub category_id: Option<Option<i32>>,
    /// `None` leaves the tags untouched, `Some(vec![])` clears them.
    pub tag_ids: Option<Vec<i32>>,
    pub is_active: Option<bool>,
}

impl DishPatch {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn image(mut self, image: Option<String>) -> Self {
        self.image = Some(image);
        self
    }

    #[must_use]
    pub fn category(mut self, category_id: Option<i32>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn tags(mut self, tag_ids: impl Into<Vec<i32>>) -> Self {
        self.tag_ids = Some(tag_ids.into());
        self
    }

    #[must_use]
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

/// Partial update of a category or a food tag.
#[derive(Clone, Debug, Default)]
pub struct NamedPatch {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl NamedPatch {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}
