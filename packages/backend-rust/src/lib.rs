pub mod auth;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::state::AppState;

pub fn create_app() -> axum::Router {
    build_router(AppState::from_config(Config::from_env()))
}

pub fn build_router(state: AppState) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
