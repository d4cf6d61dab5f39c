//! SVE track routes: mesas de trabajo and surveillance sessions.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::sve::{ConsultaSve, CreateConsultaSve, CreateMesaTrabajo, MesaTrabajo};
use crate::services::{scope, sve as sve_service};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SveListQuery {
    pub trabajador_id: Uuid,
}

/// GET /api/v1/sve/mesas — mesas over the caller's visible clients.
pub async fn list_mesas(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<MesaTrabajo>>>, AppError> {
    let alcance = scope::resolver(current_user.role, current_user.id, None)?;
    let mesas = sve_service::listar_mesas(&state.db, alcance).await?;
    Ok(ApiResponse::success(mesas))
}

/// POST /api/v1/sve/mesas — open a mesa de trabajo for a client.
pub async fn create_mesa(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateMesaTrabajo>,
) -> Result<Json<ApiResponse<MesaTrabajo>>, AppError> {
    body.validate()?;
    let alcance = scope::resolver(current_user.role, current_user.id, None)?;
    let mesa = sve_service::crear_mesa(&state.db, alcance, &body).await?;
    Ok(ApiResponse::success(mesa))
}

/// GET /api/v1/sve/mesas/:trabajador_id
pub async fn get_mesa(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(trabajador_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MesaTrabajo>>, AppError> {
    let alcance = scope::resolver(current_user.role, current_user.id, None)?;
    let mesa = sve_service::obtener_mesa(&state.db, alcance, trabajador_id).await?;
    Ok(ApiResponse::success(mesa))
}

/// POST /api/v1/sve/consultas — record an SVE session.
pub async fn create_consulta(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateConsultaSve>,
) -> Result<Json<ApiResponse<ConsultaSve>>, AppError> {
    let alcance = scope::resolver(current_user.role, current_user.id, None)?;
    let consulta = sve_service::crear_consulta(&state.db, alcance, &body).await?;
    Ok(ApiResponse::success(consulta))
}

/// GET /api/v1/sve/consultas?trabajador_id= — a client's SVE sessions.
pub async fn list_consultas(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<SveListQuery>,
) -> Result<Json<ApiResponse<Vec<ConsultaSve>>>, AppError> {
    let alcance = scope::resolver(current_user.role, current_user.id, None)?;
    let consultas =
        sve_service::listar_consultas(&state.db, alcance, query.trabajador_id).await?;
    Ok(ApiResponse::success(consultas))
}
