use api_types::ErrorBody;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::{EngineError, ErrorKind};

pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod categories;
mod dishes;
mod food_tags;
mod params;
mod server;
mod statistics;

pub mod types {
    pub mod dish {
        pub use api_types::dish::{
            CategoryRef, DishListQuery, DishNew, DishSectionView, DishUpdate, DishView,
        };
    }

    pub mod category {
        pub use api_types::category::{
            CategoryListQuery, CategoryNew, CategoryUpdate, CategoryView,
        };
    }

    pub mod food_tag {
        pub use api_types::food_tag::{FoodTagListQuery, FoodTagNew, FoodTagUpdate, FoodTagView};
    }

    pub mod stats {
        pub use api_types::stats::Statistic;
    }

    pub use api_types::{ErrorBody, Page};
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Convert an engine page into its wire shape.
fn page_view<T, U>(page: engine::Page<T>, f: impl FnMut(T) -> U) -> api_types::Page<U> {
    let has_next = page.has_next();
    let next_page = page.next_page();
    let page = page.map(f);
    api_types::Page {
        items: page.items,
        page: page.number,
        per_page: page.per_page,
        total: page.total,
        num_pages: page.num_pages,
        has_next,
        next_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_duplicate_maps_to_400() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_dependents_maps_to_400() {
        let res = ServerError::from(EngineError::HasDependents(
            "cannot delete category with dishes".to_string(),
        ))
        .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_unauthorized_maps_to_401() {
        let res = ServerError::from(EngineError::Unauthorized("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn database_error_maps_to_500() {
        let err = EngineError::Database(sea_orm::DbErr::Custom("boom".to_string()));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
