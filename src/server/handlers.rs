//! REST handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::location::{Location, LocationReport, TenantScope, DEFAULT_TENANT};
use crate::server::error::{ApiError, ApiResult};
use crate::server::state::AppState;
use crate::tracker::TrackerSnapshot;

/// Service name reported by the health check
pub const SERVICE_NAME: &str = "geo-tracker";

/// `?tenantId=` query parameter
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantQuery {
    pub tenant_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub time: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedResponse {
    pub status: &'static str,
    pub asset_id: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<TrackerSnapshot> {
    Json(state.tracker.stats().await)
}

/// List latest locations of one tenant
///
/// Without `tenantId` this lists the default tenant, not every tenant.
pub async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<TenantQuery>,
) -> Json<Vec<Location>> {
    let tenant = query
        .tenant_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| DEFAULT_TENANT.to_string());

    Json(state.tracker.locations(&TenantScope::Tenant(tenant)).await)
}

pub async fn get_location(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> ApiResult<Json<Location>> {
    state
        .tracker
        .location(&asset_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Asset not found"))
}

pub async fn update_location(
    State(state): State<AppState>,
    payload: Result<Json<LocationReport>, JsonRejection>,
) -> ApiResult<Json<ReceivedResponse>> {
    let Json(report) = payload?;
    let location = state.tracker.submit(report).await?;

    tracing::debug!(
        asset_id = %location.asset_id,
        tenant = %location.tenant_id,
        "Location received over HTTP"
    );

    Ok(Json(ReceivedResponse {
        status: "received",
        asset_id: location.asset_id,
    }))
}
