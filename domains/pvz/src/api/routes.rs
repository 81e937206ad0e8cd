//! Route definitions for the pickup-point API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{products, pvz, receptions};
use super::middleware::PvzState;

/// Pickup-point registration and listing routes
fn pvz_routes() -> Router<PvzState> {
    Router::new()
        .route("/pvz", post(pvz::create_pvz).get(pvz::list_pvzs))
        .route("/pvz/optimized", get(pvz::list_pvzs_optimized))
        .route("/pvz/list", get(pvz::list_all_pvzs))
}

/// Reception lifecycle routes
fn reception_routes() -> Router<PvzState> {
    Router::new()
        .route("/receptions", post(receptions::create_reception))
        .route(
            "/pvz/{pvz_id}/close_last_reception",
            post(receptions::close_last_reception),
        )
}

/// Product routes
fn product_routes() -> Router<PvzState> {
    Router::new()
        .route("/products", post(products::add_product))
        .route(
            "/pvz/{pvz_id}/delete_last_product",
            post(products::delete_last_product),
        )
}

/// Create all pickup-point domain API routes
pub fn routes() -> Router<PvzState> {
    Router::new()
        .merge(pvz_routes())
        .merge(reception_routes())
        .merge(product_routes())
}
