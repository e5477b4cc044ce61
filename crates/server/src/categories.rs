//! Categories API endpoints.

use api_types::{
    Page,
    category::{CategoryListQuery, CategoryNew, CategoryUpdate, CategoryView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{CATEGORIES_PER_PAGE, Category, CategoryStats, NamedPatch, StatusFilter, paginate};

use crate::{ServerError, page_view, params::path_id, server::ServerState};

fn map_category(category: Category, dish_count: Option<u64>) -> CategoryView {
    CategoryView {
        id: category.meta.id,
        name: category.name,
        is_active: category.meta.is_active,
        dish_count,
        created_at: category.meta.created_at,
        updated_at: category.meta.updated_at,
    }
}

fn map_stats(stats: CategoryStats) -> CategoryView {
    map_category(stats.category, Some(stats.dish_count))
}

/// List categories with their dish count, busiest first, 12 per page.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<Page<CategoryView>>, ServerError> {
    let status = StatusFilter::from_param(query.status.as_deref())?;
    let categories = state
        .engine
        .find_categories(query.search.as_deref(), status)
        .await?;
    let page = paginate(categories, query.page.as_deref(), CATEGORIES_PER_PAGE);
    Ok(Json(page_view(page, map_stats)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<CategoryView>, ServerError> {
    let id = path_id(&id)?;
    let category = state.engine.category(id).await?;
    let dish_count = state.engine.count_dishes_in_category(id).await?;
    Ok(Json(map_category(category, Some(dish_count))))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state.engine.create_category(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(map_category(category, None))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let id = path_id(&id)?;
    if payload.name.is_none() && payload.is_active.is_none() {
        return Err(ServerError::Generic(
            "provide at least one of name or is_active".to_string(),
        ));
    }

    let patch = NamedPatch {
        name: payload.name,
        is_active: payload.is_active,
    };
    let category = state.engine.update_category(id, patch).await?;
    Ok(Json(map_category(category, None)))
}

/// Soft delete a category. Refused while it still holds dishes.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = path_id(&id)?;
    state.engine.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
