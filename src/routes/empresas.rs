//! Company routes.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::empresa::{CreateEmpresa, Empresa};
use crate::services::empresa as empresa_service;
use crate::AppState;

/// GET /api/v1/empresas
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<Empresa>>>, AppError> {
    let empresas = empresa_service::listar(&state.db).await?;
    Ok(ApiResponse::success(empresas))
}

/// POST /api/v1/empresas
pub async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<CreateEmpresa>,
) -> Result<Json<ApiResponse<Empresa>>, AppError> {
    body.validate()?;
    let empresa = empresa_service::crear(&state.db, &body).await?;
    Ok(ApiResponse::success(empresa))
}

/// GET /api/v1/empresas/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Empresa>>, AppError> {
    let empresa = empresa_service::obtener(&state.db, id).await?;
    Ok(ApiResponse::success(empresa))
}
