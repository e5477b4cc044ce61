use std::collections::{BTreeSet, HashMap};

use sea_orm::{
    ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Query, SimpleExpr},
};

use crate::{dish_tags, dishes, food_tags};

use super::{Repository, contains_expr};

impl Repository<dishes::Entity> {
    /// Predicate: the dish belongs to `category_id`.
    pub fn in_category(category_id: i32) -> SimpleExpr {
        dishes::Column::CategoryId.eq(category_id)
    }

    /// Predicate: the dish carries `tag_id`.
    ///
    /// Expressed as a sub-select on the junction table, so a dish matches at
    /// most once whatever the number of association rows.
    pub fn with_tag(tag_id: i32) -> SimpleExpr {
        dishes::Column::Id.in_subquery(
            Query::select()
                .column(dish_tags::Column::DishId)
                .from(dish_tags::Entity)
                .and_where(dish_tags::Column::FoodTagId.eq(tag_id))
                .to_owned(),
        )
    }

    /// Predicate: normalized name or description contains `term`.
    ///
    /// `term` must already be normalized.
    pub fn text_contains(term: &str) -> Condition {
        Condition::any()
            .add(contains_expr(dishes::Column::NameNorm, term))
            .add(contains_expr(dishes::Column::DescriptionNorm, term))
    }

    pub async fn find_by_category<C>(
        &self,
        db: &C,
        category_id: i32,
    ) -> Result<Vec<dishes::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        self.live_by_name()
            .filter(Self::in_category(category_id))
            .all(db)
            .await
    }

    pub async fn find_without_category<C>(&self, db: &C) -> Result<Vec<dishes::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        self.live_by_name()
            .filter(dishes::Column::CategoryId.is_null())
            .all(db)
            .await
    }

    pub async fn find_active<C>(&self, db: &C) -> Result<Vec<dishes::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        self.live_by_name()
            .filter(dishes::Column::IsActive.eq(true))
            .all(db)
            .await
    }

    pub async fn find_by_tag<C>(&self, db: &C, tag_id: i32) -> Result<Vec<dishes::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        self.live_by_name()
            .filter(Self::with_tag(tag_id))
            .all(db)
            .await
    }

    pub async fn count_in_category<C>(&self, db: &C, category_id: i32) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        self.live()
            .filter(Self::in_category(category_id))
            .count(db)
            .await
    }

    pub async fn count_active<C>(&self, db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        self.live()
            .filter(dishes::Column::IsActive.eq(true))
            .count(db)
            .await
    }

    /// Number of live dishes per category id. Categories without live dishes
    /// are absent from the map.
    pub async fn live_counts_by_category<C>(&self, db: &C) -> Result<HashMap<i32, u64>, DbErr>
    where
        C: ConnectionTrait,
    {
        let rows: Vec<(i32, i64)> = self
            .live()
            .select_only()
            .column(dishes::Column::CategoryId)
            .column_as(Expr::col(dishes::Column::Id).count(), "dish_count")
            .filter(dishes::Column::CategoryId.is_not_null())
            .group_by(dishes::Column::CategoryId)
            .into_tuple()
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(category_id, count)| (category_id, u64::try_from(count).unwrap_or(0)))
            .collect())
    }

    /// Replace the tag association of `dish_id` with `tag_ids`.
    ///
    /// An empty slice clears the association.
    pub async fn set_tags<C>(&self, db: &C, dish_id: i32, tag_ids: &[i32]) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        dish_tags::Entity::delete_many()
            .filter(dish_tags::Column::DishId.eq(dish_id))
            .exec(db)
            .await?;

        let unique: BTreeSet<i32> = tag_ids.iter().copied().collect();
        if unique.is_empty() {
            return Ok(());
        }

        let rows = unique.into_iter().map(|food_tag_id| dish_tags::ActiveModel {
            dish_id: ActiveValue::Set(dish_id),
            food_tag_id: ActiveValue::Set(food_tag_id),
        });
        dish_tags::Entity::insert_many(rows)
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    /// Live tags of each dish in `dish_ids`, ordered by tag name.
    pub async fn load_tags<C>(
        &self,
        db: &C,
        dish_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<food_tags::Model>>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut tags: HashMap<i32, Vec<food_tags::Model>> = HashMap::new();
        if dish_ids.is_empty() {
            return Ok(tags);
        }

        let rows = dish_tags::Entity::find()
            .filter(dish_tags::Column::DishId.is_in(dish_ids.iter().copied()))
            .find_also_related(food_tags::Entity)
            .filter(food_tags::Column::Deleted.eq(false))
            .order_by_asc(food_tags::Column::Name)
            .all(db)
            .await?;

        for (link, tag) in rows {
            if let Some(tag) = tag {
                tags.entry(link.dish_id).or_default().push(tag);
            }
        }
        Ok(tags)
    }
}
