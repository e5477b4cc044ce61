use std::collections::{BTreeSet, HashMap};

use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, QueryFilter, TransactionTrait, prelude::*,
};

use crate::{
    Category, Dish, DishCreate, DishFilter, DishPatch, DishSection, EngineError, FoodTag,
    ResultEngine, categories, dishes,
    repository::Repository,
    text::{normalize_name, normalize_text, search_term},
};

use super::{Engine, ensure_unique_name, require, with_tx};

type Dishes = Repository<dishes::Entity>;

impl Engine {
    /// Return a live dish with its category and tags.
    pub async fn dish(&self, id: i32) -> ResultEngine<Dish> {
        let model = require(&self.dishes, &self.database, id).await?;
        self.hydrate_one(&self.database, model).await
    }

    /// Every live dish, ordered by name.
    pub async fn dishes(&self) -> ResultEngine<Vec<Dish>> {
        let models = self.dishes.live_by_name().all(&self.database).await?;
        self.hydrate(&self.database, models).await
    }

    /// Live dishes matching every predicate of `filter`, ordered by name.
    ///
    /// The search is accent and case insensitive and looks at both the name
    /// and the description. A blank search is ignored.
    pub async fn find_dishes(&self, filter: &DishFilter) -> ResultEngine<Vec<Dish>> {
        let mut query = self.dishes.live_by_name();
        if let Some(category_id) = filter.category_id {
            query = query.filter(Dishes::in_category(category_id));
        }
        if let Some(tag_id) = filter.tag_id {
            query = query.filter(Dishes::with_tag(tag_id));
        }
        if let Some(term) = search_term(filter.search.as_deref()) {
            query = query.filter(Dishes::text_contains(&term));
        }
        let query = filter.status.apply(query, dishes::Column::IsActive);

        let models = query.all(&self.database).await?;
        self.hydrate(&self.database, models).await
    }

    /// The menu view of [`Engine::find_dishes`].
    ///
    /// One section per active category holding at least one matching dish,
    /// ordered by category name, then the matching dishes without category.
    /// Dishes of an inactive category are not shown.
    pub async fn dish_sections(&self, filter: &DishFilter) -> ResultEngine<Vec<DishSection>> {
        let matching = self.find_dishes(filter).await?;
        let active_categories = self
            .categories
            .live_by_name()
            .filter(categories::Column::IsActive.eq(true))
            .all(&self.database)
            .await?;

        let mut by_category: HashMap<i32, Vec<Dish>> = HashMap::new();
        let mut uncategorized = Vec::new();
        for dish in matching {
            match dish.category_id {
                Some(category_id) => by_category.entry(category_id).or_default().push(dish),
                None => uncategorized.push(dish),
            }
        }

        let mut sections = Vec::new();
        for model in active_categories {
            if let Some(dishes) = by_category.remove(&model.id) {
                sections.push(DishSection::Category {
                    category: Category::from(model),
                    dishes,
                });
            }
        }
        if !uncategorized.is_empty() {
            sections.push(DishSection::Uncategorized {
                dishes: uncategorized,
            });
        }
        Ok(sections)
    }

    pub async fn dishes_by_category(&self, category_id: i32) -> ResultEngine<Vec<Dish>> {
        let models = self
            .dishes
            .find_by_category(&self.database, category_id)
            .await?;
        self.hydrate(&self.database, models).await
    }

    pub async fn dishes_without_category(&self) -> ResultEngine<Vec<Dish>> {
        let models = self.dishes.find_without_category(&self.database).await?;
        self.hydrate(&self.database, models).await
    }

    pub async fn active_dishes(&self) -> ResultEngine<Vec<Dish>> {
        let models = self.dishes.find_active(&self.database).await?;
        self.hydrate(&self.database, models).await
    }

    pub async fn dishes_by_tag(&self, tag_id: i32) -> ResultEngine<Vec<Dish>> {
        let models = self.dishes.find_by_tag(&self.database, tag_id).await?;
        self.hydrate(&self.database, models).await
    }

    /// Add a new dish.
    ///
    /// The name must be free among live dishes, the category and every tag
    /// must be live. The tag association is written in the same transaction.
    pub async fn create_dish(&self, cmd: DishCreate) -> ResultEngine<Dish> {
        let name = normalize_name(&cmd.name, "dish")?;
        let description = cmd.description.trim().to_string();
        with_tx!(self, |db_tx| {
            ensure_unique_name(&self.dishes, &db_tx, &name, None).await?;
            if let Some(category_id) = cmd.category_id {
                self.require_category_ref(&db_tx, category_id).await?;
            }
            let tag_ids = self.require_tag_refs(&db_tx, &cmd.tag_ids).await?;

            let active = dishes::ActiveModel {
                name: ActiveValue::Set(name.clone()),
                name_norm: ActiveValue::Set(normalize_text(&name)),
                description_norm: ActiveValue::Set(normalize_text(&description)),
                description: ActiveValue::Set(description),
                price_cents: ActiveValue::Set(cmd.price.cents()),
                image: ActiveValue::Set(normalize_image(cmd.image)),
                category_id: ActiveValue::Set(cmd.category_id),
                ..Default::default()
            };
            let model = self
                .dishes
                .create(&db_tx, active)
                .await
                .map_err(|err| EngineError::from_write(err, &name))?;

            if !tag_ids.is_empty() {
                self.dishes.set_tags(&db_tx, model.id, &tag_ids).await?;
            }

            tracing::info!(dish_id = model.id, name = %model.name, "dish created");
            self.hydrate_one(&db_tx, model).await
        })
    }

    /// Partially update a dish.
    ///
    /// `tag_ids: None` keeps the current tags, `Some(vec![])` clears them.
    pub async fn update_dish(&self, id: i32, patch: DishPatch) -> ResultEngine<Dish> {
        with_tx!(self, |db_tx| {
            let current = require(&self.dishes, &db_tx, id).await?;

            let mut active = <dishes::ActiveModel as Default>::default();
            let mut new_name = None;
            if let Some(name) = patch.name {
                let name = normalize_name(&name, "dish")?;
                if name != current.name {
                    ensure_unique_name(&self.dishes, &db_tx, &name, Some(id)).await?;
                }
                active.name_norm = ActiveValue::Set(normalize_text(&name));
                active.name = ActiveValue::Set(name.clone());
                new_name = Some(name);
            }
            if let Some(description) = patch.description {
                let description = description.trim().to_string();
                active.description_norm = ActiveValue::Set(normalize_text(&description));
                active.description = ActiveValue::Set(description);
            }
            if let Some(price) = patch.price {
                active.price_cents = ActiveValue::Set(price.cents());
            }
            if let Some(image) = patch.image {
                active.image = ActiveValue::Set(normalize_image(image));
            }
            if let Some(category_id) = patch.category_id {
                if let Some(category_id) = category_id {
                    self.require_category_ref(&db_tx, category_id).await?;
                }
                active.category_id = ActiveValue::Set(category_id);
            }
            if let Some(is_active) = patch.is_active {
                active.is_active = ActiveValue::Set(is_active);
            }
            if let Some(tag_ids) = patch.tag_ids {
                let tag_ids = self.require_tag_refs(&db_tx, &tag_ids).await?;
                self.dishes.set_tags(&db_tx, id, &tag_ids).await?;
            }

            let model = self
                .dishes
                .update(&db_tx, id, active)
                .await
                .map_err(|err| {
                    EngineError::from_write(err, new_name.as_deref().unwrap_or(&current.name))
                })?
                .ok_or_else(|| EngineError::KeyNotFound(format!("dish {id}")))?;

            tracing::info!(dish_id = id, "dish updated");
            self.hydrate_one(&db_tx, model).await
        })
    }

    /// Soft delete a dish. Its name becomes available again.
    pub async fn delete_dish(&self, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require(&self.dishes, &db_tx, id).await?;
            if !self.dishes.delete(&db_tx, id).await? {
                return Err(EngineError::KeyNotFound(format!("dish {id}")));
            }
            tracing::info!(dish_id = id, "dish deleted");
            Ok(())
        })
    }

    /// Flip `is_active` and return the dish as stored.
    pub async fn toggle_dish_active(&self, id: i32) -> ResultEngine<Dish> {
        with_tx!(self, |db_tx| {
            let current = require(&self.dishes, &db_tx, id).await?;
            let active = dishes::ActiveModel {
                is_active: ActiveValue::Set(!current.is_active),
                ..Default::default()
            };
            let model = self
                .dishes
                .update(&db_tx, id, active)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("dish {id}")))?;

            tracing::info!(dish_id = id, is_active = model.is_active, "dish toggled");
            self.hydrate_one(&db_tx, model).await
        })
    }

    pub async fn count_dishes(&self) -> ResultEngine<u64> {
        Ok(self.dishes.count_live(&self.database).await?)
    }

    pub async fn count_active_dishes(&self) -> ResultEngine<u64> {
        Ok(self.dishes.count_active(&self.database).await?)
    }

    pub async fn count_dishes_in_category(&self, category_id: i32) -> ResultEngine<u64> {
        Ok(self
            .dishes
            .count_in_category(&self.database, category_id)
            .await?)
    }

    async fn require_category_ref<C>(&self, db: &C, category_id: i32) -> ResultEngine<()>
    where
        C: ConnectionTrait,
    {
        match self.categories.find_by_id(db, category_id).await? {
            Some(_) => Ok(()),
            None => Err(EngineError::InvalidReference(format!(
                "category {category_id} does not exist"
            ))),
        }
    }

    /// Deduplicate `tag_ids` and check each one resolves to a live food tag.
    async fn require_tag_refs<C>(&self, db: &C, tag_ids: &[i32]) -> ResultEngine<Vec<i32>>
    where
        C: ConnectionTrait,
    {
        let wanted: BTreeSet<i32> = tag_ids.iter().copied().collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }
        let wanted: Vec<i32> = wanted.into_iter().collect();

        let found: BTreeSet<i32> = self
            .food_tags
            .find_by_ids(db, &wanted)
            .await?
            .into_iter()
            .map(|tag| tag.id)
            .collect();
        if let Some(missing) = wanted.iter().find(|id| !found.contains(id)) {
            return Err(EngineError::InvalidReference(format!(
                "food tag {missing} does not exist"
            )));
        }
        Ok(wanted)
    }

    async fn hydrate_one<C>(&self, db: &C, model: dishes::Model) -> ResultEngine<Dish>
    where
        C: ConnectionTrait,
    {
        let id = model.id;
        self.hydrate(db, vec![model])
            .await?
            .pop()
            .ok_or_else(|| EngineError::KeyNotFound(format!("dish {id}")))
    }

    /// Build domain dishes with their live category and live tags preloaded.
    async fn hydrate<C>(&self, db: &C, models: Vec<dishes::Model>) -> ResultEngine<Vec<Dish>>
    where
        C: ConnectionTrait,
    {
        let category_ids: Vec<i32> = models
            .iter()
            .filter_map(|model| model.category_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let categories: HashMap<i32, Category> = self
            .categories
            .find_by_ids(db, &category_ids)
            .await?
            .into_iter()
            .map(|model| (model.id, Category::from(model)))
            .collect();

        let dish_ids: Vec<i32> = models.iter().map(|model| model.id).collect();
        let mut tags = self.dishes.load_tags(db, &dish_ids).await?;

        models
            .into_iter()
            .map(|model| {
                let dish_tags = tags.remove(&model.id).unwrap_or_default();
                let mut dish = Dish::from_model(model)?;
                dish.category = dish
                    .category_id
                    .and_then(|category_id| categories.get(&category_id).cloned());
                dish.tags = dish_tags.into_iter().map(FoodTag::from).collect();
                Ok(dish)
            })
            .collect()
    }
}

fn normalize_image(image: Option<String>) -> Option<String> {
    image
        .map(|path| path.trim().to_string())
        .filter(|path| !path.is_empty())
}
