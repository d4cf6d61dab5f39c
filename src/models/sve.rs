//! Epidemiological-surveillance (SVE) track: mesa de trabajo + sessions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::consulta::{EstadoConsulta, Modalidad};

/// Work-table record capturing inclusion criteria and diagnosis.
/// Created once per client before any SVE consultation exists.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MesaTrabajo {
    pub id: Uuid,
    pub trabajador_id: Uuid,
    pub criterio_inclusion: String,
    pub diagnostico: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct CreateMesaTrabajo {
    pub trabajador_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub criterio_inclusion: String,
    #[validate(length(min = 1))]
    pub diagnostico: String,
}

/// SVE session row. Requires the client's mesa de trabajo to exist.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ConsultaSve {
    pub id: Uuid,
    pub trabajador_id: Uuid,
    pub fecha: NaiveDate,
    pub modalidad: Modalidad,
    pub estado: EstadoConsulta,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateConsultaSve {
    pub trabajador_id: Uuid,
    pub fecha: NaiveDate,
    pub modalidad: Modalidad,
    pub estado: Option<EstadoConsulta>,
    pub notas: Option<String>,
}
