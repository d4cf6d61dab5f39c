//! Client registry service: CRUD, filtered lists, and case closure.
//!
//! Every read goes through the caller's resolved scope; a trabajador that
//! is out of scope behaves exactly like one that does not exist.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::trabajador::{CreateTrabajador, Trabajador, TrabajadorFilters, UpdateTrabajador};

/// Register a new client owned by the creating professional.
pub async fn crear(
    pool: &PgPool,
    input: &CreateTrabajador,
    profesional_id: Uuid,
) -> Result<Trabajador, AppError> {
    let trabajador = sqlx::query_as::<_, Trabajador>(
        r#"
        INSERT INTO trabajadores (
            cedula, nombre, sede, empresa_id, contratista_id,
            contacto_emergencia_nombre, contacto_emergencia_telefono,
            profesional_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&input.cedula)
    .bind(&input.nombre)
    .bind(&input.sede)
    .bind(input.empresa_id)
    .bind(input.contratista_id)
    .bind(&input.contacto_emergencia_nombre)
    .bind(&input.contacto_emergencia_telefono)
    .bind(profesional_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("A trabajador with this cedula already exists".to_string())
        }
        _ => AppError::Database(e),
    })?;

    Ok(trabajador)
}

/// List clients visible to the caller, with filters and pagination.
pub async fn listar(
    pool: &PgPool,
    alcance: Option<Uuid>,
    filters: &TrabajadorFilters,
    pagination: &Pagination,
) -> Result<PagedResult<Trabajador>, AppError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_index = 0u32;

    if alcance.is_some() {
        param_index += 1;
        conditions.push(format!("profesional_id = ${param_index}"));
    }
    if filters.sede.is_some() {
        param_index += 1;
        conditions.push(format!("sede = ${param_index}"));
    }
    if filters.empresa_id.is_some() {
        param_index += 1;
        conditions.push(format!("empresa_id = ${param_index}"));
    }
    match filters.activo {
        Some(true) => conditions.push("fecha_cierre IS NULL".to_string()),
        Some(false) => conditions.push("fecha_cierre IS NOT NULL".to_string()),
        None => {}
    }
    if filters.search.is_some() {
        param_index += 1;
        conditions.push(format!(
            "(cedula ILIKE ${param_index} OR nombre ILIKE ${param_index})"
        ));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM trabajadores {where_clause}");
    let data_sql = format!(
        "SELECT * FROM trabajadores {where_clause} \
         ORDER BY nombre ASC, cedula ASC \
         LIMIT {} OFFSET {}",
        pagination.limit(),
        pagination.offset()
    );

    let search_pattern = filters.search.as_ref().map(|v| format!("%{v}%"));

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, Trabajador>(&data_sql);

    macro_rules! bind_both {
        ($val:expr) => {
            count_query = count_query.bind($val);
            data_query = data_query.bind($val);
        };
    }

    if let Some(prof) = alcance {
        bind_both!(prof);
    }
    if let Some(ref sede) = filters.sede {
        bind_both!(sede);
    }
    if let Some(empresa_id) = filters.empresa_id {
        bind_both!(empresa_id);
    }
    if let Some(ref pattern) = search_pattern {
        bind_both!(pattern);
    }

    let total = count_query.fetch_one(pool).await?;
    let items = data_query.fetch_all(pool).await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Fetch a client by id within the caller's scope.
pub async fn obtener(
    pool: &PgPool,
    id: Uuid,
    alcance: Option<Uuid>,
) -> Result<Trabajador, AppError> {
    let mut sql = String::from("SELECT * FROM trabajadores WHERE id = $1");
    if alcance.is_some() {
        sql.push_str(" AND profesional_id = $2");
    }
    let mut query = sqlx::query_as::<_, Trabajador>(&sql).bind(id);
    if let Some(prof) = alcance {
        query = query.bind(prof);
    }
    query
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Trabajador not found".to_string()))
}

/// Check that a client exists and is visible to the caller.
pub(crate) async fn verificar_visible(
    pool: &PgPool,
    id: Uuid,
    alcance: Option<Uuid>,
) -> Result<(), AppError> {
    obtener(pool, id, alcance).await.map(|_| ())
}

/// Update a client's mutable fields.
pub async fn actualizar(
    pool: &PgPool,
    id: Uuid,
    alcance: Option<Uuid>,
    input: &UpdateTrabajador,
) -> Result<Trabajador, AppError> {
    verificar_visible(pool, id, alcance).await?;

    let trabajador = sqlx::query_as::<_, Trabajador>(
        r#"
        UPDATE trabajadores SET
            nombre = COALESCE($2, nombre),
            sede = COALESCE($3, sede),
            empresa_id = COALESCE($4, empresa_id),
            contratista_id = COALESCE($5, contratista_id),
            contacto_emergencia_nombre = COALESCE($6, contacto_emergencia_nombre),
            contacto_emergencia_telefono = COALESCE($7, contacto_emergencia_telefono),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.nombre)
    .bind(&input.sede)
    .bind(input.empresa_id)
    .bind(input.contratista_id)
    .bind(&input.contacto_emergencia_nombre)
    .bind(&input.contacto_emergencia_telefono)
    .fetch_one(pool)
    .await?;

    Ok(trabajador)
}

/// Set the client's closure date, resolving their case.
pub async fn cerrar(
    pool: &PgPool,
    id: Uuid,
    alcance: Option<Uuid>,
    fecha_cierre: NaiveDate,
) -> Result<Trabajador, AppError> {
    verificar_visible(pool, id, alcance).await?;

    let trabajador = sqlx::query_as::<_, Trabajador>(
        "UPDATE trabajadores SET fecha_cierre = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(fecha_cierre)
    .fetch_one(pool)
    .await?;

    Ok(trabajador)
}
