//! Reception API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use pickup_auth::EmployeeUser;
use pickup_common::{Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::parse_pvz_id;
use crate::api::middleware::PvzState;

/// Request for opening a reception
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceptionRequest {
    pub pvz_id: Uuid,
    /// Opened-at timestamp; defaults to now
    pub date_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionIdResponse {
    pub reception_id: Uuid,
}

/// Open a reception at a pickup point
///
/// **POST /receptions** (employee)
pub async fn create_reception(
    _employee: EmployeeUser,
    State(state): State<PvzState>,
    ValidatedJson(request): ValidatedJson<CreateReceptionRequest>,
) -> Result<(StatusCode, Json<ReceptionIdResponse>)> {
    let reception_id = state
        .service
        .create_reception(request.pvz_id, request.date_time)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReceptionIdResponse { reception_id }),
    ))
}

/// Close the open reception of a pickup point
///
/// **POST /pvz/{pvzId}/close_last_reception** (employee)
pub async fn close_last_reception(
    _employee: EmployeeUser,
    State(state): State<PvzState>,
    Path(pvz_id): Path<String>,
) -> Result<Json<ReceptionIdResponse>> {
    let pvz_id = parse_pvz_id(&pvz_id)?;
    let reception_id = state.service.close_reception(pvz_id).await?;
    Ok(Json(ReceptionIdResponse { reception_id }))
}
