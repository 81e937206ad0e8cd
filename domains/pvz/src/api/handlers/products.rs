//! Product API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use pickup_auth::EmployeeUser;
use pickup_common::{Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::parse_pvz_id;
use crate::api::middleware::PvzState;
use crate::domain::entities::Product;

/// Request for adding a product to the open reception
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 100))]
    pub product_type: String,
    pub pvz_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct DeleteProductResponse {
    pub message: String,
}

/// Add a product to the open reception of a pickup point
///
/// **POST /products** (employee)
pub async fn add_product(
    _employee: EmployeeUser,
    State(state): State<PvzState>,
    ValidatedJson(request): ValidatedJson<AddProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state
        .service
        .add_product(request.pvz_id, &request.product_type)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Remove the most recently added product of the open reception
///
/// **POST /pvz/{pvzId}/delete_last_product** (employee)
pub async fn delete_last_product(
    _employee: EmployeeUser,
    State(state): State<PvzState>,
    Path(pvz_id): Path<String>,
) -> Result<Json<DeleteProductResponse>> {
    let pvz_id = parse_pvz_id(&pvz_id)?;
    state.service.delete_last_product(pvz_id).await?;
    Ok(Json(DeleteProductResponse {
        message: "product deleted successfully".to_string(),
    }))
}
