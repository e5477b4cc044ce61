//! Soft-delete aware data access.
//!
//! [`Repository`] translates the catalogue operations into sea-orm queries for
//! any entity implementing [`SoftDelete`]. Rows flagged `deleted` are invisible
//! to every default query path and are never physically removed.
//!
//! Every function is generic over [`ConnectionTrait`], so callers decide
//! whether it runs on the plain connection or inside a transaction.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, IntoActiveModel, Iterable, PaginatorTrait, QueryFilter, QueryOrder, Select,
    sea_query::{Expr, LikeExpr, SimpleExpr},
};

use crate::text::contains_pattern;

mod categories;
mod dishes;

/// Entities sharing the soft-delete base columns and a `name`.
pub trait SoftDelete: EntityTrait {
    /// Human readable entity name used in error messages.
    const LABEL: &'static str;

    fn id_column() -> Self::Column;
    fn name_column() -> Self::Column;
    fn name_norm_column() -> Self::Column;
    fn created_at_column() -> Self::Column;
    fn updated_at_column() -> Self::Column;
    fn deleted_at_column() -> Self::Column;
    fn deleted_column() -> Self::Column;
    fn is_active_column() -> Self::Column;
}

/// Data-access object for one entity type.
pub struct Repository<E> {
    _entity: PhantomData<E>,
}

impl<E> Default for Repository<E> {
    fn default() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<E> std::fmt::Debug for Repository<E>
where
    E: SoftDelete,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("entity", &E::LABEL)
            .finish()
    }
}

impl<E> Repository<E>
where
    E: SoftDelete + 'static,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline query: every non-deleted row, no ordering.
    pub fn live(&self) -> Select<E> {
        E::find().filter(E::deleted_column().eq(false))
    }

    /// Same as [`Repository::live`] ordered by name.
    pub fn live_by_name(&self) -> Select<E> {
        self.live().order_by_asc(E::name_column())
    }

    /// Predicate matching rows whose normalized name contains `term`.
    ///
    /// `term` must already be normalized.
    pub fn name_contains(&self, term: &str) -> SimpleExpr {
        contains_expr(E::name_norm_column(), term)
    }

    pub async fn find_all<C>(&self, db: &C) -> Result<Vec<E::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        self.live().all(db).await
    }

    pub async fn find_by_id<C>(&self, db: &C, id: i32) -> Result<Option<E::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        self.live().filter(E::id_column().eq(id)).one(db).await
    }

    /// Non-deleted rows among `ids`. Unknown or deleted ids are skipped.
    pub async fn find_by_ids<C>(&self, db: &C, ids: &[i32]) -> Result<Vec<E::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.live()
            .filter(E::id_column().is_in(ids.iter().copied()))
            .all(db)
            .await
    }

    /// Insert a new row.
    ///
    /// Timestamps are stamped here; the lifecycle flags default to a live,
    /// active row unless `is_active` is set explicitly.
    pub async fn create<C>(&self, db: &C, mut active: E::ActiveModel) -> Result<E::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        active.set(E::created_at_column(), now.into());
        active.set(E::updated_at_column(), now.into());
        active.set(E::deleted_column(), false.into());
        active.set(E::deleted_at_column(), Option::<DateTime<Utc>>::None.into());
        if !active.get(E::is_active_column()).is_set() {
            active.set(E::is_active_column(), true.into());
        }
        active.insert(db).await
    }

    /// Merge every `Set` column of `patch` into the live row `id`.
    ///
    /// Returns `None` when the row does not exist or is deleted.
    pub async fn update<C>(
        &self,
        db: &C,
        id: i32,
        patch: E::ActiveModel,
    ) -> Result<Option<E::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let Some(model) = self.find_by_id(db, id).await? else {
            return Ok(None);
        };

        let mut active = model.into_active_model();
        for column in E::Column::iter() {
            if is_same_column(column, E::id_column()) {
                continue;
            }
            if let ActiveValue::Set(value) = patch.get(column) {
                active.set(column, value);
            }
        }
        active.set(E::updated_at_column(), Utc::now().into());

        active.update(db).await.map(Some)
    }

    /// Soft delete: flag the row and stamp `deleted_at`.
    ///
    /// Returns `false` when the row does not exist or is already deleted.
    pub async fn delete<C>(&self, db: &C, id: i32) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let Some(model) = self.find_by_id(db, id).await? else {
            return Ok(false);
        };

        let now = Utc::now();
        let mut active = model.into_active_model();
        active.set(E::deleted_column(), true.into());
        active.set(E::deleted_at_column(), Some(now).into());
        active.set(E::updated_at_column(), now.into());
        active.update(db).await?;
        Ok(true)
    }

    /// Whether a live row is named exactly `name`, ignoring `exclude_id`.
    pub async fn exists_by_name<C>(
        &self,
        db: &C,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut query = self.live().filter(E::name_column().eq(name));
        if let Some(id) = exclude_id {
            query = query.filter(E::id_column().ne(id));
        }
        Ok(query.count(db).await? > 0)
    }

    pub async fn count_live<C>(&self, db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        self.live().count(db).await
    }
}

/// `column LIKE '%term%'` with the wildcards of `term` escaped.
pub(crate) fn contains_expr<T>(column: T, term: &str) -> SimpleExpr
where
    T: ColumnTrait + 'static,
{
    Expr::col(column).like(LikeExpr::new(contains_pattern(term)).escape('\\'))
}

fn is_same_column<T>(left: T, right: T) -> bool
where
    T: ColumnTrait,
{
    left.as_str() == right.as_str()
}
