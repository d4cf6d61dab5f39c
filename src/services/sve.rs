//! SVE track service: mesas de trabajo and surveillance sessions.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::consulta::EstadoConsulta;
use crate::models::sve::{ConsultaSve, CreateConsultaSve, CreateMesaTrabajo, MesaTrabajo};
use crate::services::trabajador;

/// Open a mesa de trabajo for a client. At most one per client.
pub async fn crear_mesa(
    pool: &PgPool,
    alcance: Option<Uuid>,
    input: &CreateMesaTrabajo,
) -> Result<MesaTrabajo, AppError> {
    trabajador::verificar_visible(pool, input.trabajador_id, alcance).await?;

    let mesa = sqlx::query_as::<_, MesaTrabajo>(
        r#"
        INSERT INTO mesas_trabajo (trabajador_id, criterio_inclusion, diagnostico)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(input.trabajador_id)
    .bind(&input.criterio_inclusion)
    .bind(&input.diagnostico)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("This trabajador already has a mesa de trabajo".to_string())
        }
        _ => AppError::Database(e),
    })?;

    Ok(mesa)
}

/// Fetch a client's mesa de trabajo.
pub async fn obtener_mesa(
    pool: &PgPool,
    alcance: Option<Uuid>,
    trabajador_id: Uuid,
) -> Result<MesaTrabajo, AppError> {
    trabajador::verificar_visible(pool, trabajador_id, alcance).await?;

    sqlx::query_as::<_, MesaTrabajo>("SELECT * FROM mesas_trabajo WHERE trabajador_id = $1")
        .bind(trabajador_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Mesa de trabajo not found".to_string()))
}

/// List mesas de trabajo over the caller's visible clients.
pub async fn listar_mesas(
    pool: &PgPool,
    alcance: Option<Uuid>,
) -> Result<Vec<MesaTrabajo>, AppError> {
    let mut sql = String::from(
        "SELECT m.* FROM mesas_trabajo m JOIN trabajadores t ON t.id = m.trabajador_id",
    );
    if alcance.is_some() {
        sql.push_str(" WHERE t.profesional_id = $1");
    }
    sql.push_str(" ORDER BY m.created_at DESC");
    let mut query = sqlx::query_as::<_, MesaTrabajo>(&sql);
    if let Some(prof) = alcance {
        query = query.bind(prof);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Fetch a client's mesa if one exists, without treating absence as an error.
pub(crate) async fn mesa_opcional(
    pool: &PgPool,
    trabajador_id: Uuid,
) -> Result<Option<MesaTrabajo>, AppError> {
    let mesa =
        sqlx::query_as::<_, MesaTrabajo>("SELECT * FROM mesas_trabajo WHERE trabajador_id = $1")
            .bind(trabajador_id)
            .fetch_optional(pool)
            .await?;
    Ok(mesa)
}

/// Record an SVE session. The client's mesa de trabajo must already exist.
pub async fn crear_consulta(
    pool: &PgPool,
    alcance: Option<Uuid>,
    input: &CreateConsultaSve,
) -> Result<ConsultaSve, AppError> {
    trabajador::verificar_visible(pool, input.trabajador_id, alcance).await?;

    if mesa_opcional(pool, input.trabajador_id).await?.is_none() {
        return Err(AppError::Validation(
            "An SVE consulta requires an existing mesa de trabajo".to_string(),
        ));
    }

    let estado = input.estado.unwrap_or(EstadoConsulta::Abierto);
    let consulta = sqlx::query_as::<_, ConsultaSve>(
        r#"
        INSERT INTO consultas_sve (trabajador_id, fecha, modalidad, estado, notas)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(input.trabajador_id)
    .bind(input.fecha)
    .bind(input.modalidad)
    .bind(estado)
    .bind(&input.notas)
    .fetch_one(pool)
    .await?;

    Ok(consulta)
}

/// List a client's SVE sessions in chronological order.
pub async fn listar_consultas(
    pool: &PgPool,
    alcance: Option<Uuid>,
    trabajador_id: Uuid,
) -> Result<Vec<ConsultaSve>, AppError> {
    trabajador::verificar_visible(pool, trabajador_id, alcance).await?;

    let consultas = sqlx::query_as::<_, ConsultaSve>(
        "SELECT * FROM consultas_sve WHERE trabajador_id = $1 ORDER BY fecha ASC, created_at ASC",
    )
    .bind(trabajador_id)
    .fetch_all(pool)
    .await?;
    Ok(consultas)
}
