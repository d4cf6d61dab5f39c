//! Consultation session routes (psychosocial orientation track).

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::caso::Caso;
use crate::models::consulta::{Consulta, CreateConsulta, UpdateConsulta};
use crate::services::{consulta as consulta_service, scope};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ConsultaListQuery {
    pub trabajador_id: Uuid,
}

/// GET /api/v1/consultas?trabajador_id= — a client's sessions.
pub async fn list(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ConsultaListQuery>,
) -> Result<Json<ApiResponse<Vec<Consulta>>>, AppError> {
    let alcance = scope::resolver(current_user.role, current_user.id, None)?;
    let consultas =
        consulta_service::listar_por_trabajador(&state.db, alcance, query.trabajador_id)
            .await?;
    Ok(ApiResponse::success(consultas))
}

/// POST /api/v1/consultas — record a session.
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateConsulta>,
) -> Result<Json<ApiResponse<Consulta>>, AppError> {
    body.validate()?;
    let alcance = scope::resolver(current_user.role, current_user.id, None)?;
    let consulta = consulta_service::crear(&state.db, alcance, &body).await?;
    Ok(ApiResponse::success(consulta))
}

/// GET /api/v1/consultas/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Consulta>>, AppError> {
    let alcance = scope::resolver(current_user.role, current_user.id, None)?;
    let consulta = consulta_service::obtener(&state.db, id, alcance).await?;
    Ok(ApiResponse::success(consulta))
}

/// PUT /api/v1/consultas/:id
pub async fn update(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateConsulta>,
) -> Result<Json<ApiResponse<Consulta>>, AppError> {
    let alcance = scope::resolver(current_user.role, current_user.id, None)?;
    let consulta = consulta_service::actualizar(&state.db, id, alcance, &body).await?;
    Ok(ApiResponse::success(consulta))
}

/// GET /api/v1/consultas/casos?trabajador_id= — a client's casos.
pub async fn list_casos(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ConsultaListQuery>,
) -> Result<Json<ApiResponse<Vec<Caso>>>, AppError> {
    let alcance = scope::resolver(current_user.role, current_user.id, None)?;
    let casos =
        consulta_service::listar_casos(&state.db, alcance, query.trabajador_id).await?;
    Ok(ApiResponse::success(casos))
}
