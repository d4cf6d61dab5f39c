//! Consultation session service for the psychosocial orientation track.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::caso::Caso;
use crate::models::consulta::{Consulta, CreateConsulta, EstadoConsulta, UpdateConsulta};
use crate::services::trabajador;

/// Record a new session for a visible client.
pub async fn crear(
    pool: &PgPool,
    alcance: Option<Uuid>,
    input: &CreateConsulta,
) -> Result<Consulta, AppError> {
    trabajador::verificar_visible(pool, input.trabajador_id, alcance).await?;

    let estado = input.estado.unwrap_or(EstadoConsulta::Abierto);
    let consulta = sqlx::query_as::<_, Consulta>(
        r#"
        INSERT INTO consultas (trabajador_id, fecha, modalidad, motivo, estado, notas)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(input.trabajador_id)
    .bind(input.fecha)
    .bind(input.modalidad)
    .bind(&input.motivo)
    .bind(estado)
    .bind(&input.notas)
    .fetch_one(pool)
    .await?;

    Ok(consulta)
}

/// Fetch a session by id within the caller's scope.
pub async fn obtener(
    pool: &PgPool,
    id: Uuid,
    alcance: Option<Uuid>,
) -> Result<Consulta, AppError> {
    let mut sql = String::from(
        "SELECT c.* FROM consultas c JOIN trabajadores t ON t.id = c.trabajador_id WHERE c.id = $1",
    );
    if alcance.is_some() {
        sql.push_str(" AND t.profesional_id = $2");
    }
    let mut query = sqlx::query_as::<_, Consulta>(&sql).bind(id);
    if let Some(prof) = alcance {
        query = query.bind(prof);
    }
    query
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Consulta not found".to_string()))
}

/// Update an open session's fields.
pub async fn actualizar(
    pool: &PgPool,
    id: Uuid,
    alcance: Option<Uuid>,
    input: &UpdateConsulta,
) -> Result<Consulta, AppError> {
    // Resolves scope and existence in one lookup.
    let _ = obtener(pool, id, alcance).await?;

    let consulta = sqlx::query_as::<_, Consulta>(
        r#"
        UPDATE consultas SET
            fecha = COALESCE($2, fecha),
            modalidad = COALESCE($3, modalidad),
            estado = COALESCE($4, estado),
            notas = COALESCE($5, notas),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.fecha)
    .bind(input.modalidad)
    .bind(input.estado)
    .bind(&input.notas)
    .fetch_one(pool)
    .await?;

    Ok(consulta)
}

/// List a client's sessions in chronological order.
pub async fn listar_por_trabajador(
    pool: &PgPool,
    alcance: Option<Uuid>,
    trabajador_id: Uuid,
) -> Result<Vec<Consulta>, AppError> {
    trabajador::verificar_visible(pool, trabajador_id, alcance).await?;

    let consultas = sqlx::query_as::<_, Consulta>(
        "SELECT * FROM consultas WHERE trabajador_id = $1 ORDER BY fecha ASC, created_at ASC",
    )
    .bind(trabajador_id)
    .fetch_all(pool)
    .await?;
    Ok(consultas)
}

/// Materialize a client's casos: sessions grouped by motivo.
pub async fn listar_casos(
    pool: &PgPool,
    alcance: Option<Uuid>,
    trabajador_id: Uuid,
) -> Result<Vec<Caso>, AppError> {
    trabajador::verificar_visible(pool, trabajador_id, alcance).await?;

    let casos = sqlx::query_as::<_, Caso>(
        r#"
        SELECT trabajador_id, motivo,
               COUNT(*) AS sesiones,
               MIN(fecha) AS primera_fecha,
               MAX(fecha) AS ultima_fecha,
               BOOL_OR(estado = 'Cerrado') AS cerrado
        FROM consultas
        WHERE trabajador_id = $1
        GROUP BY trabajador_id, motivo
        ORDER BY MIN(fecha) ASC, motivo ASC
        "#,
    )
    .bind(trabajador_id)
    .fetch_all(pool)
    .await?;
    Ok(casos)
}
