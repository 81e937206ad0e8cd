//! Pickup-point API handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use pickup_auth::{AuthUser, ModeratorUser, StaffUser};
use pickup_common::{Error, PageParams, Result, ValidatedJson};
use serde::Deserialize;
use validator::Validate;

use crate::api::middleware::PvzState;
use crate::domain::entities::{DateRange, Pvz, PvzInfo};

/// Request for registering a pickup point
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePvzRequest {
    #[validate(length(min = 1, max = 100))]
    pub city: String,
}

/// Query parameters for the nested pickup-point listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PvzListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Inclusive lower bound on reception opened-at (RFC 3339)
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on reception opened-at (RFC 3339)
    pub end_date: Option<DateTime<Utc>>,
}

impl PvzListQuery {
    fn into_parts(self) -> Result<(PageParams, DateRange)> {
        let page = PageParams::from_query(self.page, self.limit)?;
        let range = DateRange::new(self.start_date, self.end_date)?;
        Ok((page, range))
    }
}

fn list_query(
    query: std::result::Result<Query<PvzListQuery>, QueryRejection>,
) -> Result<(PageParams, DateRange)> {
    let Query(query) = query.map_err(|e| Error::Validation(e.body_text()))?;
    query.into_parts()
}

/// Register a pickup point
///
/// **POST /pvz** (moderator)
pub async fn create_pvz(
    _moderator: ModeratorUser,
    State(state): State<PvzState>,
    ValidatedJson(request): ValidatedJson<CreatePvzRequest>,
) -> Result<(StatusCode, Json<Pvz>)> {
    let pvz = state.service.create_pvz(&request.city).await?;
    Ok((StatusCode::CREATED, Json(pvz)))
}

/// Page of pickup points with receptions and products, one query per entity
///
/// **GET /pvz?page&limit&startDate&endDate** (employee or moderator)
pub async fn list_pvzs(
    _staff: StaffUser,
    State(state): State<PvzState>,
    query: std::result::Result<Query<PvzListQuery>, QueryRejection>,
) -> Result<Json<Vec<PvzInfo>>> {
    let (page, range) = list_query(query)?;
    let tree = state.service.get_pvzs_info(page, range).await?;
    Ok(Json(tree))
}

/// Same listing as `GET /pvz` from a single joined query
///
/// **GET /pvz/optimized?page&limit&startDate&endDate** (employee or moderator)
pub async fn list_pvzs_optimized(
    _staff: StaffUser,
    State(state): State<PvzState>,
    query: std::result::Result<Query<PvzListQuery>, QueryRejection>,
) -> Result<Json<Vec<PvzInfo>>> {
    let (page, range) = list_query(query)?;
    let tree = state.service.get_pvzs_info_optimized(page, range).await?;
    Ok(Json(tree))
}

/// Every pickup point
///
/// **GET /pvz/list** (any authenticated role)
pub async fn list_all_pvzs(
    _user: AuthUser,
    State(state): State<PvzState>,
) -> Result<Json<Vec<Pvz>>> {
    let pvzs = state.service.list_all_pvzs().await?;
    Ok(Json(pvzs))
}
