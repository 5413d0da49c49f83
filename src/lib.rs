pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod promptpay;
pub mod services;
pub mod startup;
pub mod validation;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::services::TopUpService;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Config,
    pub topup: TopUpService,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, config: Config) -> Self {
        let topup = TopUpService::new(
            db.clone(),
            config.promptpay_id.clone(),
            config.max_topup_amount.clone(),
        );
        Self { db, config, topup }
    }
}

pub fn create_app(state: AppState) -> Router {
    // Initiation needs the caller's account identity from the upstream
    // auth layer; finalization is operator- or network-triggered.
    let account_routes = Router::new()
        .route("/topups", post(handlers::topup::initiate_topup))
        .route_layer(from_fn(middleware::auth::account_auth));

    let operator_routes = Router::new()
        .route("/topups/:id/complete", post(handlers::topup::complete_topup))
        .route("/topups/:id/reject", post(handlers::topup::reject_topup))
        .route("/admin/topups", get(handlers::admin::list_topups))
        .route("/admin/topups/summary", get(handlers::admin::topup_summary))
        .route_layer(from_fn(middleware::auth::admin_auth));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/topups/:id", get(handlers::topup::get_topup))
        .route("/callback", post(handlers::callback::payment_callback))
        .merge(account_routes)
        .merge(operator_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
