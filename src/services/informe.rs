//! Clinical case report assembly.
//!
//! Collects everything a printable caso report needs — client identity,
//! company affiliation, mesa de trabajo when the client is on the SVE
//! track, and the chronological session history — into one structured
//! document. Rendering is the frontend's concern.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::consulta::{Consulta, EstadoConsulta, Modalidad};
use crate::models::sve::MesaTrabajo;
use crate::services::{sve, trabajador};

/// Client identity block for the report header.
#[derive(Debug, Serialize)]
pub struct TrabajadorInforme {
    pub cedula: String,
    pub nombre: String,
    pub sede: String,
    pub fecha_cierre: Option<NaiveDate>,
}

/// One session entry in the report body.
#[derive(Debug, Serialize)]
pub struct SesionInforme {
    pub fecha: NaiveDate,
    pub modalidad: Modalidad,
    pub estado: EstadoConsulta,
    pub notas: Option<String>,
}

/// Assembled caso report.
#[derive(Debug, Serialize)]
pub struct InformeCaso {
    pub trabajador: TrabajadorInforme,
    pub empresa: Option<String>,
    pub mesa: Option<MesaTrabajo>,
    pub motivo: String,
    pub cerrado: bool,
    pub total_sesiones: usize,
    pub sesiones: Vec<SesionInforme>,
    pub generado_en: DateTime<Utc>,
}

/// Build the report for one caso, identified by its (trabajador, motivo)
/// grouping key. A caso with no recorded sessions is a NotFound.
pub async fn generar(
    pool: &PgPool,
    alcance: Option<Uuid>,
    trabajador_id: Uuid,
    motivo: &str,
) -> Result<InformeCaso, AppError> {
    let trabajador = trabajador::obtener(pool, trabajador_id, alcance).await?;

    let sesiones = sqlx::query_as::<_, Consulta>(
        "SELECT * FROM consultas WHERE trabajador_id = $1 AND motivo = $2 \
         ORDER BY fecha ASC, created_at ASC",
    )
    .bind(trabajador_id)
    .bind(motivo)
    .fetch_all(pool)
    .await?;

    if sesiones.is_empty() {
        return Err(AppError::NotFound(
            "No sessions recorded for this caso".to_string(),
        ));
    }

    let empresa = match trabajador.empresa_id {
        Some(empresa_id) => {
            sqlx::query_scalar::<_, String>("SELECT nombre FROM empresas WHERE id = $1")
                .bind(empresa_id)
                .fetch_optional(pool)
                .await?
        }
        None => None,
    };

    let mesa = sve::mesa_opcional(pool, trabajador_id).await?;

    let cerrado = sesiones
        .iter()
        .any(|s| s.estado == EstadoConsulta::Cerrado);

    Ok(InformeCaso {
        trabajador: TrabajadorInforme {
            cedula: trabajador.cedula,
            nombre: trabajador.nombre,
            sede: trabajador.sede,
            fecha_cierre: trabajador.fecha_cierre,
        },
        empresa,
        mesa,
        motivo: motivo.to_string(),
        cerrado,
        total_sesiones: sesiones.len(),
        sesiones: sesiones
            .into_iter()
            .map(|s| SesionInforme {
                fecha: s.fecha,
                modalidad: s.modalidad,
                estado: s.estado,
                notas: s.notas,
            })
            .collect(),
        generado_en: Utc::now(),
    })
}
