//! Consultation session model (psychosocial orientation track).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "modalidad")]
pub enum Modalidad {
    Virtual,
    Presencial,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "estado_consulta")]
pub enum EstadoConsulta {
    Abierto,
    Cerrado,
}

/// One session. The pair (trabajador_id, motivo) is the caso grouping key:
/// every session sharing that pair belongs to the same caso.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Consulta {
    pub id: Uuid,
    pub trabajador_id: Uuid,
    pub fecha: NaiveDate,
    pub modalidad: Modalidad,
    pub motivo: String,
    pub estado: EstadoConsulta,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct CreateConsulta {
    pub trabajador_id: Uuid,
    pub fecha: NaiveDate,
    pub modalidad: Modalidad,
    #[validate(length(min = 1, max = 255))]
    pub motivo: String,
    pub estado: Option<EstadoConsulta>,
    pub notas: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateConsulta {
    pub fecha: Option<NaiveDate>,
    pub modalidad: Option<Modalidad>,
    pub estado: Option<EstadoConsulta>,
    pub notas: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modalidad_serialization() {
        assert_eq!(
            serde_json::to_string(&Modalidad::Presencial).unwrap(),
            "\"Presencial\""
        );
    }

    #[test]
    fn estado_deserialization() {
        let estado: EstadoConsulta = serde_json::from_str("\"Cerrado\"").unwrap();
        assert_eq!(estado, EstadoConsulta::Cerrado);
    }
}
