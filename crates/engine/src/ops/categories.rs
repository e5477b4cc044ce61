use sea_orm::{QueryFilter, TransactionTrait};

use crate::{
    Category, CategoryStats, EngineError, NamedPatch, ResultEngine, StatusFilter, categories,
    text::search_term,
};

use super::{Engine, create_named, require, update_named, with_tx};

impl Engine {
    /// Return a live category.
    pub async fn category(&self, id: i32) -> ResultEngine<Category> {
        let model = require(&self.categories, &self.database, id).await?;
        Ok(model.into())
    }

    /// Every live category, ordered by name.
    pub async fn categories(&self) -> ResultEngine<Vec<Category>> {
        let models = self.categories.live_by_name().all(&self.database).await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    /// Live categories with their live dish count, most dishes first and
    /// alphabetically among equal counts.
    pub async fn categories_with_dish_count(&self) -> ResultEngine<Vec<CategoryStats>> {
        let rows = self
            .categories
            .find_all_with_dish_count(&self.database)
            .await?;
        Ok(into_stats(rows))
    }

    /// [`Engine::categories_with_dish_count`] narrowed by status and an accent
    /// insensitive name search.
    pub async fn find_categories(
        &self,
        search: Option<&str>,
        status: StatusFilter,
    ) -> ResultEngine<Vec<CategoryStats>> {
        let mut query = self.categories.live();
        if let Some(term) = search_term(search) {
            query = query.filter(self.categories.name_contains(&term));
        }
        let query = status.apply(query, categories::Column::IsActive);

        let models = query.all(&self.database).await?;
        let rows = self
            .categories
            .with_dish_count(&self.database, models)
            .await?;
        Ok(into_stats(rows))
    }

    pub async fn create_category(&self, name: &str) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = create_named(&self.categories, &db_tx, name).await?;
            tracing::info!(category_id = model.id, name = %model.name, "category created");
            Ok(model.into())
        })
    }

    pub async fn update_category(&self, id: i32, patch: NamedPatch) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = update_named(&self.categories, &db_tx, id, patch).await?;
            tracing::info!(category_id = id, "category updated");
            Ok(model.into())
        })
    }

    /// Soft delete a category.
    ///
    /// Refused while the category still holds live dishes: they must be
    /// moved or deleted first.
    pub async fn delete_category(&self, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require(&self.categories, &db_tx, id).await?;
            if self.categories.has_dishes(&db_tx, id).await? {
                return Err(EngineError::HasDependents(
                    "cannot delete category with dishes".to_string(),
                ));
            }
            if !self.categories.delete(&db_tx, id).await? {
                return Err(EngineError::KeyNotFound(format!("category {id}")));
            }
            tracing::info!(category_id = id, "category deleted");
            Ok(())
        })
    }

    pub async fn count_categories(&self) -> ResultEngine<u64> {
        Ok(self.categories.count_live(&self.database).await?)
    }

    /// Number of live categories holding at least one live dish.
    pub async fn count_categories_with_dishes(&self) -> ResultEngine<u64> {
        let rows = self
            .categories
            .find_all_with_dish_count(&self.database)
            .await?;
        Ok(rows.iter().filter(|(_, count)| *count > 0).count() as u64)
    }
}

fn into_stats(rows: Vec<(categories::Model, u64)>) -> Vec<CategoryStats> {
    rows.into_iter()
        .map(|(model, dish_count)| CategoryStats {
            category: model.into(),
            dish_count,
        })
        .collect()
}
