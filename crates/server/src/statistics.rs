//! Statistics API edpoints

use api_types::stats::Statistic;
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

/// Handle requests for catalogue statistics
pub async fn get_stats(State(state): State<ServerState>) -> Result<Json<Statistic>, ServerError> {
    let engine = &state.engine;

    Ok(Json(Statistic {
        dishes: engine.count_dishes().await?,
        active_dishes: engine.count_active_dishes().await?,
        categories: engine.count_categories().await?,
        categories_with_dishes: engine.count_categories_with_dishes().await?,
        food_tags: engine.count_food_tags().await?,
    }))
}
