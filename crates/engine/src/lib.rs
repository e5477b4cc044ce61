//! Menu catalogue of a restaurant back office.
//!
//! Dishes grouped in categories and labelled with food tags, stored with
//! soft-delete semantics. [`Engine`] is the service layer: it validates and
//! orchestrates every read and write, delegating persistence to
//! [`Repository`].

pub use categories::{Category, CategoryStats};
pub use commands::{DishCreate, DishPatch, NamedPatch};
pub use dishes::{Dish, DishSection};
pub use error::{EngineError, ErrorKind};
pub use filters::{DishFilter, StatusFilter};
pub use food_tags::FoodTag;
pub use meta::EntityMeta;
pub use ops::{Engine, EngineBuilder};
pub use pagination::{
    CATEGORIES_PER_PAGE, DISHES_PER_PAGE, FOOD_TAGS_PER_PAGE, Page, SECTIONS_PER_PAGE, paginate,
};
pub use price::Price;
pub use repository::{Repository, SoftDelete};
pub use text::{NAME_MAX_LEN, normalize_text};

pub mod categories;
mod commands;
pub mod dish_tags;
pub mod dishes;
mod error;
mod filters;
pub mod food_tags;
mod meta;
mod ops;
mod pagination;
mod price;
mod repository;
mod text;

type ResultEngine<T> = Result<T, EngineError>;
