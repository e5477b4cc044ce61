use std::cmp::Ordering;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, PaginatorTrait, QueryFilter};

use crate::{categories, dishes};

use super::Repository;

impl Repository<categories::Entity> {
    /// Whether the category still has live dishes.
    pub async fn has_dishes<C>(&self, db: &C, category_id: i32) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let count = Repository::<dishes::Entity>::new()
            .live()
            .filter(dishes::Column::CategoryId.eq(category_id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    /// Live categories annotated with their live dish count, ordered by count
    /// (descending) then name.
    pub async fn find_all_with_dish_count<C>(
        &self,
        db: &C,
    ) -> Result<Vec<(categories::Model, u64)>, DbErr>
    where
        C: ConnectionTrait,
    {
        let models = self.find_all(db).await?;
        self.with_dish_count(db, models).await
    }

    /// Annotate `models` with their live dish count and sort them like
    /// [`Repository::find_all_with_dish_count`].
    pub async fn with_dish_count<C>(
        &self,
        db: &C,
        models: Vec<categories::Model>,
    ) -> Result<Vec<(categories::Model, u64)>, DbErr>
    where
        C: ConnectionTrait,
    {
        let counts = Repository::<dishes::Entity>::new()
            .live_counts_by_category(db)
            .await?;

        let mut annotated: Vec<(categories::Model, u64)> = models
            .into_iter()
            .map(|model| {
                let count = counts.get(&model.id).copied().unwrap_or(0);
                (model, count)
            })
            .collect();
        annotated.sort_by(|(left, left_count), (right, right_count)| {
            match right_count.cmp(left_count) {
                Ordering::Equal => left.name.cmp(&right.name),
                other => other,
            }
        });
        Ok(annotated)
    }
}
