//! Client ("trabajador") registry model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Client row. `profesional_id` is the owning professional for row-level
/// visibility; `fecha_cierre` marks the client's case as resolved.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Trabajador {
    pub id: Uuid,
    pub cedula: String,
    pub nombre: String,
    pub sede: String,
    pub empresa_id: Option<Uuid>,
    pub contratista_id: Option<Uuid>,
    pub contacto_emergencia_nombre: Option<String>,
    pub contacto_emergencia_telefono: Option<String>,
    pub fecha_cierre: Option<NaiveDate>,
    pub profesional_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct CreateTrabajador {
    #[validate(length(min = 5, max = 32))]
    pub cedula: String,
    #[validate(length(min = 1, max = 255))]
    pub nombre: String,
    #[validate(length(min = 1, max = 128))]
    pub sede: String,
    pub empresa_id: Option<Uuid>,
    pub contratista_id: Option<Uuid>,
    pub contacto_emergencia_nombre: Option<String>,
    pub contacto_emergencia_telefono: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, validator::Validate)]
pub struct UpdateTrabajador {
    #[validate(length(min = 1, max = 255))]
    pub nombre: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub sede: Option<String>,
    pub empresa_id: Option<Uuid>,
    pub contratista_id: Option<Uuid>,
    pub contacto_emergencia_nombre: Option<String>,
    pub contacto_emergencia_telefono: Option<String>,
}

/// Filters for listing trabajadores.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TrabajadorFilters {
    pub sede: Option<String>,
    pub empresa_id: Option<Uuid>,
    /// true = open cases only (no fecha_cierre), false = closed only.
    pub activo: Option<bool>,
    /// Matches against cedula or nombre.
    pub search: Option<String>,
}

/// Request body for closing a client's case.
#[derive(Debug, Clone, Deserialize)]
pub struct CierreRequest {
    pub fecha_cierre: NaiveDate,
}
