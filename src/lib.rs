pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod filter;
pub mod models;
pub mod routes;
pub mod seed;
pub mod store;
pub mod tmdb;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::store::MovieStore;

#[derive(Clone)]
pub struct AppState {
    pub store: MovieStore,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/movies", get(routes::list_movies))
        .with_state(Arc::new(state))
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,cinedex=debug,sqlx=warn".to_string()),
        )
        .init();
}
