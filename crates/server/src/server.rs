use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use engine::{Engine, EngineError};

use std::sync::Arc;

use crate::{ServerError, categories, dishes, food_tags, statistics};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// When set, every request must carry `Authorization: Bearer <token>`.
    pub api_token: Option<Arc<str>>,
}

impl ServerState {
    pub fn new(engine: Engine, api_token: Option<String>) -> Self {
        Self {
            engine: Arc::new(engine),
            api_token: api_token
                .filter(|token| !token.is_empty())
                .map(Arc::from),
        }
    }
}

async fn auth(
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    if let Some(expected) = state.api_token.as_deref() {
        let Some(TypedHeader(Authorization(bearer))) = bearer else {
            return Err(EngineError::Unauthorized("missing bearer token".to_string()).into());
        };
        if bearer.token() != expected {
            return Err(EngineError::Unauthorized("invalid bearer token".to_string()).into());
        }
    }
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/dishes", get(dishes::list).post(dishes::create))
        .route("/dishes/sections", get(dishes::sections))
        .route(
            "/dishes/{id}",
            get(dishes::get)
                .patch(dishes::update)
                .delete(dishes::delete),
        )
        .route("/dishes/{id}/toggle", post(dishes::toggle))
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            get(categories::get)
                .patch(categories::update)
                .delete(categories::delete),
        )
        .route("/food-tags", get(food_tags::list).post(food_tags::create))
        .route(
            "/food-tags/{id}",
            get(food_tags::get)
                .patch(food_tags::update)
                .delete(food_tags::delete),
        )
        .route("/stats", get(statistics::get_stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(state: ServerState, addr: &str) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(state, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
