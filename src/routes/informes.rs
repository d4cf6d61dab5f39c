//! Clinical case report routes.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::services::informe::{self, InformeCaso};
use crate::services::scope;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InformeQuery {
    pub trabajador_id: Uuid,
    pub motivo: String,
}

/// GET /api/v1/informes/casos?trabajadorId=&motivo= — caso report.
pub async fn caso(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<InformeQuery>,
) -> Result<Json<ApiResponse<InformeCaso>>, AppError> {
    let alcance = scope::resolver(current_user.role, current_user.id, None)?;
    let informe =
        informe::generar(&state.db, alcance, query.trabajador_id, &query.motivo).await?;
    Ok(ApiResponse::success(informe))
}
