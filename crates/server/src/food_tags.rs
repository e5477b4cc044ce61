//! Food tags API endpoints.

use api_types::{
    Page,
    food_tag::{FoodTagListQuery, FoodTagNew, FoodTagUpdate, FoodTagView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{FOOD_TAGS_PER_PAGE, FoodTag, NamedPatch, paginate};

use crate::{ServerError, page_view, params::path_id, server::ServerState};

fn map_food_tag(tag: FoodTag) -> FoodTagView {
    FoodTagView {
        id: tag.meta.id,
        name: tag.name,
        is_active: tag.meta.is_active,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<FoodTagListQuery>,
) -> Result<Json<Page<FoodTagView>>, ServerError> {
    let tags = state.engine.find_food_tags(query.search.as_deref()).await?;
    let page = paginate(tags, query.page.as_deref(), FOOD_TAGS_PER_PAGE);
    Ok(Json(page_view(page, map_food_tag)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<FoodTagView>, ServerError> {
    let id = path_id(&id)?;
    let tag = state.engine.food_tag(id).await?;
    Ok(Json(map_food_tag(tag)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FoodTagNew>,
) -> Result<(StatusCode, Json<FoodTagView>), ServerError> {
    let tag = state.engine.create_food_tag(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(map_food_tag(tag))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<FoodTagUpdate>,
) -> Result<Json<FoodTagView>, ServerError> {
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
    let tag = state.engine.update_food_tag(id, patch).await?;
    Ok(Json(map_food_tag(tag)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = path_id(&id)?;
    state.engine.delete_food_tag(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
