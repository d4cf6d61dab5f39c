//! Dashboard routes: aggregated statistics for both care tracks.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::services::periodo::{self, Periodo};
use crate::services::scope;
use crate::services::stats::{self, DashboardStats, StatsFilter};
use crate::services::stats_sve::{self, SveDashboardStats};
use crate::AppState;

/// Query parameters shared by both dashboard endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub period: Option<String>,
    pub profesional_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Resolve the reporting window and scope for one request. Validation
/// failures here reject the request before any query is issued.
fn resolver_filtro(user: &CurrentUser, query: &StatsQuery) -> Result<StatsFilter, AppError> {
    let hoy = Utc::now().date_naive();
    let periodo = Periodo::parse(query.period.as_deref());
    let rango = periodo::resolver(periodo, query.start_date, query.end_date, hoy)?;
    let profesional = scope::resolver(user.role, user.id, query.profesional_id.as_deref())?;
    Ok(StatsFilter {
        rango,
        profesional,
        hoy,
    })
}

/// GET /api/v1/dashboard/stats — consolidated statistics document.
pub async fn stats(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<StatsQuery>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let filtro = resolver_filtro(&current_user, &query)?;
    let stats = stats::obtener_stats(&state.db, &filtro).await?;
    Ok(ApiResponse::success(stats))
}

/// GET /api/v1/sve/dashboard/stats — SVE-track statistics document.
pub async fn sve_stats(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<StatsQuery>,
) -> Result<Json<ApiResponse<SveDashboardStats>>, AppError> {
    let filtro = resolver_filtro(&current_user, &query)?;
    let stats = stats_sve::obtener_stats(&state.db, &filtro).await?;
    Ok(ApiResponse::success(stats))
}
