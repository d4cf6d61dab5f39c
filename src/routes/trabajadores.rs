//! Client registry routes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::trabajador::{
    CierreRequest, CreateTrabajador, Trabajador, TrabajadorFilters, UpdateTrabajador,
};
use crate::services::{scope, trabajador as trabajador_service};
use crate::AppState;

/// GET /api/v1/trabajadores — list clients visible to the caller.
pub async fn list(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<TrabajadorFilters>,
) -> Result<Json<ApiResponse<PagedResult<Trabajador>>>, AppError> {
    let alcance = scope::resolver(current_user.role, current_user.id, None)?;
    let result =
        trabajador_service::listar(&state.db, alcance, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/v1/trabajadores — register a client owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateTrabajador>,
) -> Result<Json<ApiResponse<Trabajador>>, AppError> {
    body.validate()?;
    let trabajador =
        trabajador_service::crear(&state.db, &body, current_user.id).await?;
    Ok(ApiResponse::success(trabajador))
}

/// GET /api/v1/trabajadores/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Trabajador>>, AppError> {
    let alcance = scope::resolver(current_user.role, current_user.id, None)?;
    let trabajador = trabajador_service::obtener(&state.db, id, alcance).await?;
    Ok(ApiResponse::success(trabajador))
}

/// PUT /api/v1/trabajadores/:id
pub async fn update(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTrabajador>,
) -> Result<Json<ApiResponse<Trabajador>>, AppError> {
    body.validate()?;
    let alcance = scope::resolver(current_user.role, current_user.id, None)?;
    let trabajador =
        trabajador_service::actualizar(&state.db, id, alcance, &body).await?;
    Ok(ApiResponse::success(trabajador))
}

/// POST /api/v1/trabajadores/:id/cierre — set the closure date.
pub async fn cerrar(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CierreRequest>,
) -> Result<Json<ApiResponse<Trabajador>>, AppError> {
    let alcance = scope::resolver(current_user.role, current_user.id, None)?;
    let trabajador =
        trabajador_service::cerrar(&state.db, id, alcance, body.fecha_cierre).await?;
    Ok(ApiResponse::success(trabajador))
}
