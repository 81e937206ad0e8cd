//! Pickup-point service composition root
//!
//! Composes the domain routers into a single application.

use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use pickup_auth::{AuthBackend, AuthConfig};
use pickup_common::config::Config;
use pickup_pvz::{PvzMetrics, PvzRepositories, PvzService, PvzState};
use pickup_users::{UsersRepositories, UsersService, UsersState};
use sqlx::PgPool;

/// Create the main application router with all routes.
///
/// Domain counters register against the recorder that is current when this
/// runs, so install the recorder behind `metrics` first.
pub fn create_app(config: &Config, pool: PgPool, metrics: PrometheusHandle) -> Router {
    let auth = AuthBackend::new(AuthConfig {
        jwt_secret: config.jwt_secret.clone(),
        token_ttl_secs: config.jwt_ttl_secs,
    });

    let pvz_state = PvzState {
        service: PvzService::new(
            PvzRepositories::new(pool.clone()),
            Arc::new(config.allowed_cities.clone()),
            Arc::new(config.allowed_product_types.clone()),
            Arc::new(PvzMetrics::new()),
        ),
        auth: auth.clone(),
    };

    let users_state = UsersState {
        service: UsersService::new(
            UsersRepositories::new(pool),
            Arc::new(config.allowed_roles.clone()),
            auth,
        ),
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(render_metrics).with_state(metrics))
        .merge(pickup_users::routes().with_state(users_state))
        .merge(pickup_pvz::routes().with_state(pvz_state))
}

/// Prometheus text exposition
async fn render_metrics(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
