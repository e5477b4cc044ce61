use sea_orm::{QueryFilter, TransactionTrait};

use crate::{EngineError, FoodTag, NamedPatch, ResultEngine, text::search_term};

use super::{Engine, create_named, require, update_named, with_tx};

impl Engine {
    pub async fn food_tag(&self, id: i32) -> ResultEngine<FoodTag> {
        let model = require(&self.food_tags, &self.database, id).await?;
        Ok(model.into())
    }

    /// Live food tags ordered by name, optionally narrowed by an accent
    /// insensitive name search.
    pub async fn find_food_tags(&self, search: Option<&str>) -> ResultEngine<Vec<FoodTag>> {
        let mut query = self.food_tags.live_by_name();
        if let Some(term) = search_term(search) {
            query = query.filter(self.food_tags.name_contains(&term));
        }
        let models = query.all(&self.database).await?;
        Ok(models.into_iter().map(FoodTag::from).collect())
    }

    pub async fn create_food_tag(&self, name: &str) -> ResultEngine<FoodTag> {
        with_tx!(self, |db_tx| {
            let model = create_named(&self.food_tags, &db_tx, name).await?;
            tracing::info!(food_tag_id = model.id, name = %model.name, "food tag created");
            Ok(model.into())
        })
    }

    pub async fn update_food_tag(&self, id: i32, patch: NamedPatch) -> ResultEngine<FoodTag> {
        with_tx!(self, |db_tx| {
            let model = update_named(&self.food_tags, &db_tx, id, patch).await?;
            tracing::info!(food_tag_id = id, "food tag updated");
            Ok(model.into())
        })
    }

    /// Soft delete a food tag.
    ///
    /// Dishes keep their association rows, but a deleted tag is no longer
    /// loaded with them.
    pub async fn delete_food_tag(&self, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require(&self.food_tags, &db_tx, id).await?;
            if !self.food_tags.delete(&db_tx, id).await? {
                return Err(EngineError::KeyNotFound(format!("food tag {id}")));
            }
            tracing::info!(food_tag_id = id, "food tag deleted");
            Ok(())
        })
    }

    pub async fn count_food_tags(&self) -> ResultEngine<u64> {
        Ok(self.food_tags.count_live(&self.database).await?)
    }
}
