//! Dishes API endpoints.

use api_types::{
    Page,
    dish::{CategoryRef, DishListQuery, DishNew, DishSectionView, DishUpdate, DishView},
    food_tag::FoodTagView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{
    DISHES_PER_PAGE, Dish, DishCreate, DishPatch, DishSection, Price, SECTIONS_PER_PAGE, paginate,
};

use crate::{
    ServerError, page_view,
    params::{dish_filter, path_id},
    server::ServerState,
};

pub(crate) fn map_dish(dish: Dish) -> DishView {
    DishView {
        id: dish.meta.id,
        name: dish.name,
        description: dish.description,
        price: dish.price.to_string(),
        price_minor: dish.price.cents(),
        image: dish.image,
        is_active: dish.meta.is_active,
        category: dish.category.map(|category| CategoryRef {
            id: category.meta.id,
            name: category.name,
        }),
        tags: dish
            .tags
            .into_iter()
            .map(|tag| FoodTagView {
                id: tag.meta.id,
                name: tag.name,
                is_active: tag.meta.is_active,
            })
            .collect(),
        created_at: dish.meta.created_at,
        updated_at: dish.meta.updated_at,
    }
}

fn map_section(section: DishSection) -> DishSectionView {
    match section {
        DishSection::Category { category, dishes } => DishSectionView::Category {
            category: CategoryRef {
                id: category.meta.id,
                name: category.name,
            },
            dishes: dishes.into_iter().map(map_dish).collect(),
        },
        DishSection::Uncategorized { dishes } => DishSectionView::Uncategorized {
            dishes: dishes.into_iter().map(map_dish).collect(),
        },
    }
}

/// List dishes, 20 per page.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<DishListQuery>,
) -> Result<Json<Page<DishView>>, ServerError> {
    let filter = dish_filter(&query)?;
    let dishes = state.engine.find_dishes(&filter).await?;
    let page = paginate(dishes, query.page.as_deref(), DISHES_PER_PAGE);
    Ok(Json(page_view(page, map_dish)))
}

/// Menu view: dishes grouped by category, three sections per page.
pub async fn sections(
    State(state): State<ServerState>,
    Query(query): Query<DishListQuery>,
) -> Result<Json<Page<DishSectionView>>, ServerError> {
    let filter = dish_filter(&query)?;
    let sections = state.engine.dish_sections(&filter).await?;
    let page = paginate(sections, query.page.as_deref(), SECTIONS_PER_PAGE);
    Ok(Json(page_view(page, map_section)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<DishView>, ServerError> {
    let id = path_id(&id)?;
    let dish = state.engine.dish(id).await?;
    Ok(Json(map_dish(dish)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DishNew>,
) -> Result<(StatusCode, Json<DishView>), ServerError> {
    let price: Price = payload.price.parse()?;
    let mut cmd = DishCreate::new(payload.name, price)
        .description(payload.description)
        .tags(payload.tags);
    if let Some(image) = payload.image {
        cmd = cmd.image(image);
    }
    if let Some(category_id) = payload.category {
        cmd = cmd.category(category_id);
    }

    let dish = state.engine.create_dish(cmd).await?;
    Ok((StatusCode::CREATED, Json(map_dish(dish))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DishUpdate>,
) -> Result<Json<DishView>, ServerError> {
    let id = path_id(&id)?;
    let price = payload
        .price
        .as_deref()
        .map(str::parse::<Price>)
        .transpose()?;
    let patch = DishPatch {
        name: payload.name,
        description: payload.description,
        price,
        image: payload.image,
        category_id: payload.category,
        tag_ids: payload.tags,
        is_active: payload.is_active,
    };

    let dish = state.engine.update_dish(id, patch).await?;
    Ok(Json(map_dish(dish)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = path_id(&id)?;
    state.engine.delete_dish(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Flip the active flag of a dish.
pub async fn toggle(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<DishView>, ServerError> {
    let id = path_id(&id)?;
    let dish = state.engine.toggle_dish_active(id).await?;
    Ok(Json(map_dish(dish)))
}
