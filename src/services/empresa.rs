//! Company service.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::empresa::{CreateEmpresa, Empresa};

pub async fn crear(pool: &PgPool, input: &CreateEmpresa) -> Result<Empresa, AppError> {
    let empresa = sqlx::query_as::<_, Empresa>(
        "INSERT INTO empresas (nombre, nit) VALUES ($1, $2) RETURNING *",
    )
    .bind(&input.nombre)
    .bind(&input.nit)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("An empresa with this NIT already exists".to_string())
        }
        _ => AppError::Database(e),
    })?;

    Ok(empresa)
}

pub async fn listar(pool: &PgPool) -> Result<Vec<Empresa>, AppError> {
    let empresas =
        sqlx::query_as::<_, Empresa>("SELECT * FROM empresas ORDER BY nombre ASC")
            .fetch_all(pool)
            .await?;
    Ok(empresas)
}

pub async fn obtener(pool: &PgPool, id: Uuid) -> Result<Empresa, AppError> {
    sqlx::query_as::<_, Empresa>("SELECT * FROM empresas WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Empresa not found".to_string()))
}
