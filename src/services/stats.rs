//! Dashboard statistics aggregation pipeline.
//!
//! One consolidated statistics document per request. Every sub-computation
//! composes the same two filters — the resolved reporting window and the
//! professional scope — and runs as an independent read-only query; the
//! sub-queries are issued concurrently and are not wrapped in a
//! transaction, so the document is not a point-in-time snapshot when
//! writes land mid-request.

use chrono::{Days, Months, NaiveDate};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::periodo::RangoFechas;

/// Fully-resolved filter set for one statistics request.
#[derive(Debug, Clone)]
pub struct StatsFilter {
    pub rango: RangoFechas,
    pub profesional: Option<Uuid>,
    /// Reference date for the fixed trailing windows (evolution, follow-up).
    pub hoy: NaiveDate,
}

impl StatsFilter {
    /// WHERE clause over the aliased fecha and profesional columns.
    ///
    /// Column names are compile-time constants at every call site; only
    /// values are bound. Bind order must match `bind_filtro!`:
    /// desde, hasta?, profesional?.
    pub(crate) fn where_clause(&self, fecha_col: &str, prof_col: &str) -> String {
        let mut conditions = vec![format!("{fecha_col} >= $1")];
        let mut idx = 1;
        if self.rango.hasta.is_some() {
            idx += 1;
            conditions.push(format!("{fecha_col} <= ${idx}"));
        }
        if self.profesional.is_some() {
            idx += 1;
            conditions.push(format!("{prof_col} = ${idx}"));
        }
        format!("WHERE {}", conditions.join(" AND "))
    }
}

/// Bind the filter values in the order `where_clause` numbered them.
macro_rules! bind_filtro {
    ($query:expr, $filtro:expr) => {{
        let mut q = $query.bind($filtro.rango.desde);
        if let Some(hasta) = $filtro.rango.hasta {
            q = q.bind(hasta);
        }
        if let Some(prof) = $filtro.profesional {
            q = q.bind(prof);
        }
        q
    }};
}

pub(crate) use bind_filtro;

/// Consolidated statistics document for the dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub resumen: Resumen,
    pub por_profesional: Vec<ProfesionalCasos>,
    pub modalidad: Modalidad,
    pub top_motivos: Vec<MotivoCasos>,
    pub estados: Estados,
    pub evolucion: Vec<EvolucionMes>,
    pub por_sede: Vec<SedeTrabajadores>,
    pub por_empresa: Vec<EmpresaTrabajadores>,
    pub detalle_profesionales: Vec<DetalleProfesional>,
    pub calidad: Calidad,
}

/// Headline counts for the reporting window.
#[derive(Debug, Serialize)]
pub struct Resumen {
    pub trabajadores_activos: i64,
    pub total_casos: i64,
    pub total_sesiones: i64,
    pub casos_abiertos: i64,
    pub casos_cerrados: i64,
    pub casos_cerrados_percent: i64,
}

/// Session counts by care modality (raw counts; percentages are a
/// presentation concern).
#[derive(Debug, Serialize)]
pub struct Modalidad {
    pub virtuales: i64,
    pub presenciales: i64,
}

/// Caso count for a single motivo.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MotivoCasos {
    pub motivo: String,
    pub casos: i64,
}

/// Open vs. closed caso counts.
#[derive(Debug, Serialize)]
pub struct Estados {
    pub abiertos: i64,
    pub cerrados: i64,
}

/// Session count for one calendar month ("YYYY-MM").
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EvolucionMes {
    pub mes: String,
    pub sesiones: i64,
}

/// Distinct-client count for one site.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SedeTrabajadores {
    pub sede: String,
    pub trabajadores: i64,
}

/// Distinct-client count for one company.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct EmpresaTrabajadores {
    pub empresa: String,
    pub trabajadores: i64,
}

/// Caso count per professional (compact companion to the full detail).
#[derive(Debug, Clone, Serialize)]
pub struct ProfesionalCasos {
    pub profesional_id: Uuid,
    pub nombre: String,
    pub casos: i64,
}

/// Full per-professional breakdown for the reporting window.
#[derive(Debug, Serialize)]
pub struct DetalleProfesional {
    pub profesional_id: Uuid,
    pub nombre: String,
    /// Assigned active clients — a headcount, not scoped by the window.
    pub trabajadores: i64,
    pub casos: i64,
    pub sesiones: i64,
    pub virtuales: i64,
    pub presenciales: i64,
    pub virtual_percent: i64,
    pub presencial_percent: i64,
    pub casos_abiertos: i64,
    pub casos_cerrados: i64,
    pub sesiones_promedio: f64,
}

/// Quality indicators.
#[derive(Debug, Serialize)]
pub struct Calidad {
    pub tiempo_promedio_cierre_dias: i64,
    pub sesiones_promedio_caso: f64,
    pub contacto_emergencia_percent: i64,
    pub casos_sin_seguimiento: i64,
}

/// Months covered by the fixed evolution window.
const MESES_EVOLUCION: u32 = 6;

/// Days without a session after which an open caso counts as stale.
const DIAS_SIN_SEGUIMIENTO: u64 = 30;

/// Fetch the whole statistics document. Sub-queries run concurrently; any
/// failure aborts the request — no partial documents.
pub async fn obtener_stats(
    pool: &PgPool,
    filtro: &StatsFilter,
) -> Result<DashboardStats, AppError> {
    let (resumen, detalle_profesionales, modalidad, top_motivos, estados, evolucion, por_sede, por_empresa, calidad) = tokio::try_join!(
        fetch_resumen(pool, filtro),
        fetch_detalle_profesionales(pool, filtro),
        fetch_modalidad(pool, filtro),
        fetch_top_motivos(pool, filtro),
        fetch_estados(pool, filtro),
        fetch_evolucion(pool, filtro),
        fetch_por_sede(pool, filtro),
        fetch_por_empresa(pool, filtro),
        fetch_calidad(pool, filtro),
    )?;

    let por_profesional = detalle_profesionales
        .iter()
        .map(|d| ProfesionalCasos {
            profesional_id: d.profesional_id,
            nombre: d.nombre.clone(),
            casos: d.casos,
        })
        .collect();

    Ok(DashboardStats {
        resumen,
        por_profesional,
        modalidad,
        top_motivos,
        estados,
        evolucion,
        por_sede,
        por_empresa,
        detalle_profesionales,
        calidad,
    })
}

/// Integer percentage with a zero-denominator fallback of 0.
pub(crate) fn porcentaje(parte: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    ((parte as f64 / total as f64) * 100.0).round() as i64
}

/// Average to one decimal place, 0.0 when the denominator is 0.
pub(crate) fn promedio_1dp(numerador: i64, denominador: i64) -> f64 {
    if denominador == 0 {
        return 0.0;
    }
    (numerador as f64 / denominador as f64 * 10.0).round() / 10.0
}

/// Integer average rounded up, 0 when the denominator is 0.
fn promedio_techo(total: i64, cuenta: i64) -> i64 {
    if cuenta == 0 {
        return 0;
    }
    (total + cuenta - 1) / cuenta
}

#[derive(Debug, sqlx::FromRow)]
struct CasosAggRow {
    total_casos: i64,
    total_sesiones: i64,
    cerrados: i64,
}

async fn fetch_resumen(pool: &PgPool, filtro: &StatsFilter) -> Result<Resumen, AppError> {
    // Active-client headcount is date-unscoped.
    let mut sql = String::from(
        "SELECT COUNT(*) FROM trabajadores t WHERE t.fecha_cierre IS NULL",
    );
    if filtro.profesional.is_some() {
        sql.push_str(" AND t.profesional_id = $1");
    }
    let mut activos_query = sqlx::query_scalar::<_, i64>(&sql);
    if let Some(prof) = filtro.profesional {
        activos_query = activos_query.bind(prof);
    }
    let trabajadores_activos = activos_query.fetch_one(pool).await?;

    let where_clause = filtro.where_clause("c.fecha", "t.profesional_id");
    let sql = format!(
        r#"
        WITH casos AS (
            SELECT c.trabajador_id, c.motivo,
                   COUNT(*) AS sesiones,
                   BOOL_OR(c.estado = 'Cerrado') AS cerrado
            FROM consultas c
            JOIN trabajadores t ON t.id = c.trabajador_id
            {where_clause}
            GROUP BY c.trabajador_id, c.motivo
        )
        SELECT COUNT(*) AS total_casos,
               COALESCE(SUM(sesiones), 0)::bigint AS total_sesiones,
               COUNT(*) FILTER (WHERE cerrado) AS cerrados
        FROM casos
        "#,
    );
    let row = bind_filtro!(sqlx::query_as::<_, CasosAggRow>(&sql), filtro)
        .fetch_one(pool)
        .await?;

    let casos_abiertos = row.total_casos - row.cerrados;
    Ok(Resumen {
        trabajadores_activos,
        total_casos: row.total_casos,
        total_sesiones: row.total_sesiones,
        casos_abiertos,
        casos_cerrados: row.cerrados,
        casos_cerrados_percent: porcentaje(row.cerrados, row.total_casos),
    })
}

/// Active professional with their assigned-client headcount.
#[derive(Debug, sqlx::FromRow)]
struct ProfesionalRow {
    id: Uuid,
    nombre: String,
    trabajadores: i64,
}

/// Window aggregates for one professional's casos.
#[derive(Debug, Default, sqlx::FromRow)]
struct ActividadRow {
    profesional_id: Uuid,
    casos: i64,
    sesiones: i64,
    virtuales: i64,
    presenciales: i64,
    casos_cerrados: i64,
}

async fn fetch_detalle_profesionales(
    pool: &PgPool,
    filtro: &StatsFilter,
) -> Result<Vec<DetalleProfesional>, AppError> {
    let mut sql = String::from(
        r#"
        SELECT u.id, u.display_name AS nombre,
               COUNT(t.id) FILTER (WHERE t.fecha_cierre IS NULL) AS trabajadores
        FROM users u
        LEFT JOIN trabajadores t ON t.profesional_id = u.id
        WHERE u.is_active = true
        "#,
    );
    if filtro.profesional.is_some() {
        sql.push_str(" AND u.id = $1");
    }
    sql.push_str(" GROUP BY u.id, u.display_name");
    let mut prof_query = sqlx::query_as::<_, ProfesionalRow>(&sql);
    if let Some(prof) = filtro.profesional {
        prof_query = prof_query.bind(prof);
    }
    let profesionales = prof_query.fetch_all(pool).await?;

    let where_clause = filtro.where_clause("c.fecha", "t.profesional_id");
    let sql = format!(
        r#"
        WITH casos AS (
            SELECT t.profesional_id, c.trabajador_id, c.motivo,
                   COUNT(*) AS sesiones,
                   COUNT(*) FILTER (WHERE c.modalidad = 'Virtual') AS virtuales,
                   COUNT(*) FILTER (WHERE c.modalidad = 'Presencial') AS presenciales,
                   BOOL_OR(c.estado = 'Cerrado') AS cerrado
            FROM consultas c
            JOIN trabajadores t ON t.id = c.trabajador_id
            {where_clause}
            GROUP BY t.profesional_id, c.trabajador_id, c.motivo
        )
        SELECT profesional_id,
               COUNT(*) AS casos,
               COALESCE(SUM(sesiones), 0)::bigint AS sesiones,
               COALESCE(SUM(virtuales), 0)::bigint AS virtuales,
               COALESCE(SUM(presenciales), 0)::bigint AS presenciales,
               COUNT(*) FILTER (WHERE cerrado) AS casos_cerrados
        FROM casos
        GROUP BY profesional_id
        "#,
    );
    let actividad = bind_filtro!(sqlx::query_as::<_, ActividadRow>(&sql), filtro)
        .fetch_all(pool)
        .await?;

    Ok(armar_detalle(profesionales, actividad))
}

/// Merge the headcount and window-activity rows into the final breakdown.
/// Professionals with no sessions in window and no assigned clients are
/// dropped; the rest are ordered by caso count descending, name ascending.
fn armar_detalle(
    profesionales: Vec<ProfesionalRow>,
    actividad: Vec<ActividadRow>,
) -> Vec<DetalleProfesional> {
    let por_id: std::collections::HashMap<Uuid, &ActividadRow> =
        actividad.iter().map(|a| (a.profesional_id, a)).collect();

    let mut detalle: Vec<DetalleProfesional> = profesionales
        .into_iter()
        .filter_map(|p| {
            let vacio = ActividadRow::default();
            let act = por_id.get(&p.id).copied().unwrap_or(&vacio);
            if p.trabajadores == 0 && act.sesiones == 0 {
                return None;
            }
            Some(DetalleProfesional {
                profesional_id: p.id,
                nombre: p.nombre,
                trabajadores: p.trabajadores,
                casos: act.casos,
                sesiones: act.sesiones,
                virtuales: act.virtuales,
                presenciales: act.presenciales,
                virtual_percent: porcentaje(act.virtuales, act.sesiones),
                presencial_percent: porcentaje(act.presenciales, act.sesiones),
                casos_abiertos: act.casos - act.casos_cerrados,
                casos_cerrados: act.casos_cerrados,
                sesiones_promedio: promedio_1dp(act.sesiones, act.casos),
            })
        })
        .collect();

    detalle.sort_by(|a, b| b.casos.cmp(&a.casos).then_with(|| a.nombre.cmp(&b.nombre)));
    detalle
}

#[derive(Debug, sqlx::FromRow)]
struct ModalidadRow {
    virtuales: i64,
    presenciales: i64,
}

async fn fetch_modalidad(pool: &PgPool, filtro: &StatsFilter) -> Result<Modalidad, AppError> {
    let where_clause = filtro.where_clause("c.fecha", "t.profesional_id");
    let sql = format!(
        r#"
        SELECT COUNT(*) FILTER (WHERE c.modalidad = 'Virtual') AS virtuales,
               COUNT(*) FILTER (WHERE c.modalidad = 'Presencial') AS presenciales
        FROM consultas c
        JOIN trabajadores t ON t.id = c.trabajador_id
        {where_clause}
        "#,
    );
    let row = bind_filtro!(sqlx::query_as::<_, ModalidadRow>(&sql), filtro)
        .fetch_one(pool)
        .await?;
    Ok(Modalidad {
        virtuales: row.virtuales,
        presenciales: row.presenciales,
    })
}

async fn fetch_top_motivos(
    pool: &PgPool,
    filtro: &StatsFilter,
) -> Result<Vec<MotivoCasos>, AppError> {
    let where_clause = filtro.where_clause("c.fecha", "t.profesional_id");
    let sql = format!(
        r#"
        WITH casos AS (
            SELECT c.trabajador_id, c.motivo
            FROM consultas c
            JOIN trabajadores t ON t.id = c.trabajador_id
            {where_clause}
            GROUP BY c.trabajador_id, c.motivo
        )
        SELECT motivo, COUNT(*) AS casos
        FROM casos
        GROUP BY motivo
        ORDER BY casos DESC, motivo ASC
        LIMIT 5
        "#,
    );
    let rows = bind_filtro!(sqlx::query_as::<_, MotivoCasos>(&sql), filtro)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[derive(Debug, sqlx::FromRow)]
struct EstadosRow {
    abiertos: i64,
    cerrados: i64,
}

async fn fetch_estados(pool: &PgPool, filtro: &StatsFilter) -> Result<Estados, AppError> {
    let where_clause = filtro.where_clause("c.fecha", "t.profesional_id");
    let sql = format!(
        r#"
        WITH casos AS (
            SELECT c.trabajador_id, c.motivo,
                   BOOL_OR(c.estado = 'Cerrado') AS cerrado
            FROM consultas c
            JOIN trabajadores t ON t.id = c.trabajador_id
            {where_clause}
            GROUP BY c.trabajador_id, c.motivo
        )
        SELECT COUNT(*) FILTER (WHERE NOT cerrado) AS abiertos,
               COUNT(*) FILTER (WHERE cerrado) AS cerrados
        FROM casos
        "#,
    );
    let row = bind_filtro!(sqlx::query_as::<_, EstadosRow>(&sql), filtro)
        .fetch_one(pool)
        .await?;
    Ok(Estados {
        abiertos: row.abiertos,
        cerrados: row.cerrados,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct MesRow {
    mes: String,
    sesiones: i64,
}

async fn fetch_evolucion(
    pool: &PgPool,
    filtro: &StatsFilter,
) -> Result<Vec<EvolucionMes>, AppError> {
    // Fixed trailing window, independent of the requested period.
    let inicio = primer_dia_mes(filtro.hoy - Months::new(MESES_EVOLUCION - 1));

    let mut sql = String::from(
        r#"
        SELECT to_char(date_trunc('month', c.fecha), 'YYYY-MM') AS mes,
               COUNT(*) AS sesiones
        FROM consultas c
        JOIN trabajadores t ON t.id = c.trabajador_id
        WHERE c.fecha >= $1
        "#,
    );
    if filtro.profesional.is_some() {
        sql.push_str(" AND t.profesional_id = $2");
    }
    sql.push_str(" GROUP BY 1 ORDER BY 1");

    let mut query = sqlx::query_as::<_, MesRow>(&sql).bind(inicio);
    if let Some(prof) = filtro.profesional {
        query = query.bind(prof);
    }
    let rows = query.fetch_all(pool).await?;

    Ok(completar_meses(rows, filtro.hoy, MESES_EVOLUCION))
}

pub(crate) fn primer_dia_mes(fecha: NaiveDate) -> NaiveDate {
    use chrono::Datelike;
    fecha.with_day(1).unwrap_or(fecha)
}

/// Expand the sparse month rows to the full trailing window, zero-filling
/// months without sessions, in chronological order.
fn completar_meses(rows: Vec<MesRow>, hoy: NaiveDate, meses: u32) -> Vec<EvolucionMes> {
    let por_mes: std::collections::HashMap<String, i64> =
        rows.into_iter().map(|r| (r.mes, r.sesiones)).collect();

    (0..meses)
        .rev()
        .map(|atras| {
            let mes = primer_dia_mes(hoy - Months::new(atras)).format("%Y-%m").to_string();
            let sesiones = por_mes.get(&mes).copied().unwrap_or(0);
            EvolucionMes { mes, sesiones }
        })
        .collect()
}

async fn fetch_por_sede(
    pool: &PgPool,
    filtro: &StatsFilter,
) -> Result<Vec<SedeTrabajadores>, AppError> {
    let where_clause = filtro.where_clause("c.fecha", "t.profesional_id");
    let sql = format!(
        r#"
        SELECT t.sede, COUNT(DISTINCT t.id) AS trabajadores
        FROM consultas c
        JOIN trabajadores t ON t.id = c.trabajador_id
        {where_clause}
        GROUP BY t.sede
        ORDER BY trabajadores DESC, t.sede ASC
        "#,
    );
    let rows = bind_filtro!(sqlx::query_as::<_, SedeTrabajadores>(&sql), filtro)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

async fn fetch_por_empresa(
    pool: &PgPool,
    filtro: &StatsFilter,
) -> Result<Vec<EmpresaTrabajadores>, AppError> {
    let where_clause = filtro.where_clause("c.fecha", "t.profesional_id");
    let sql = format!(
        r#"
        SELECT COALESCE(e.nombre, 'Sin empresa') AS empresa,
               COUNT(DISTINCT t.id) AS trabajadores
        FROM consultas c
        JOIN trabajadores t ON t.id = c.trabajador_id
        LEFT JOIN empresas e ON e.id = t.empresa_id
        {where_clause}
        GROUP BY COALESCE(e.nombre, 'Sin empresa')
        ORDER BY trabajadores DESC, empresa ASC
        LIMIT 10
        "#,
    );
    let rows = bind_filtro!(sqlx::query_as::<_, EmpresaTrabajadores>(&sql), filtro)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[derive(Debug, sqlx::FromRow)]
struct CierreRow {
    casos: i64,
    dias: i64,
    sesiones: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct ContactoRow {
    total: i64,
    con_contacto: i64,
}

async fn fetch_calidad(pool: &PgPool, filtro: &StatsFilter) -> Result<Calidad, AppError> {
    // (a)+(b): closure-time and session averages over casos whose client
    // has a closure date. Same-day closures count as one day.
    let where_clause = filtro.where_clause("c.fecha", "t.profesional_id");
    let sql = format!(
        r#"
        WITH casos AS (
            SELECT c.trabajador_id, c.motivo,
                   COUNT(*) AS sesiones,
                   MIN(c.fecha) AS primera_fecha
            FROM consultas c
            JOIN trabajadores t ON t.id = c.trabajador_id
            {where_clause}
            GROUP BY c.trabajador_id, c.motivo
        )
        SELECT COUNT(*) AS casos,
               COALESCE(SUM(GREATEST(t.fecha_cierre - casos.primera_fecha, 1)), 0)::bigint AS dias,
               COALESCE(SUM(casos.sesiones), 0)::bigint AS sesiones
        FROM casos
        JOIN trabajadores t ON t.id = casos.trabajador_id
        WHERE t.fecha_cierre IS NOT NULL
        "#,
    );
    let cierre = bind_filtro!(sqlx::query_as::<_, CierreRow>(&sql), filtro)
        .fetch_one(pool)
        .await?;

    // (c): emergency-contact coverage over the active headcount in scope.
    let mut sql = String::from(
        r#"
        SELECT COUNT(*) AS total,
               COUNT(*) FILTER (
                   WHERE contacto_emergencia_telefono IS NOT NULL
                     AND contacto_emergencia_telefono <> ''
               ) AS con_contacto
        FROM trabajadores t
        WHERE t.fecha_cierre IS NULL
        "#,
    );
    if filtro.profesional.is_some() {
        sql.push_str(" AND t.profesional_id = $1");
    }
    let mut contacto_query = sqlx::query_as::<_, ContactoRow>(&sql);
    if let Some(prof) = filtro.profesional {
        contacto_query = contacto_query.bind(prof);
    }
    let contacto = contacto_query.fetch_one(pool).await?;

    // (d): open casos with no session in the trailing 30 days. All-time
    // case universe — independent of the requested period.
    let limite = filtro.hoy - Days::new(DIAS_SIN_SEGUIMIENTO);
    let mut sql = String::from(
        r#"
        WITH casos AS (
            SELECT c.trabajador_id, c.motivo,
                   MAX(c.fecha) AS ultima_fecha,
                   BOOL_OR(c.estado = 'Cerrado') AS cerrado
            FROM consultas c
            JOIN trabajadores t ON t.id = c.trabajador_id
        "#,
    );
    if filtro.profesional.is_some() {
        sql.push_str(" WHERE t.profesional_id = $2");
    }
    sql.push_str(
        r#"
            GROUP BY c.trabajador_id, c.motivo
        )
        SELECT COUNT(*) FROM casos WHERE NOT cerrado AND ultima_fecha < $1
        "#,
    );
    let mut seguimiento_query = sqlx::query_scalar::<_, i64>(&sql).bind(limite);
    if let Some(prof) = filtro.profesional {
        seguimiento_query = seguimiento_query.bind(prof);
    }
    let casos_sin_seguimiento = seguimiento_query.fetch_one(pool).await?;

    Ok(Calidad {
        tiempo_promedio_cierre_dias: promedio_techo(cierre.dias, cierre.casos),
        sesiones_promedio_caso: promedio_1dp(cierre.sesiones, cierre.casos),
        contacto_emergencia_percent: porcentaje(contacto.con_contacto, contacto.total),
        casos_sin_seguimiento,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn porcentaje_rounds_to_nearest() {
        assert_eq!(porcentaje(2, 3), 67);
        assert_eq!(porcentaje(1, 3), 33);
        assert_eq!(porcentaje(1, 2), 50);
        assert_eq!(porcentaje(3, 3), 100);
    }

    #[test]
    fn porcentaje_zero_denominator_is_zero() {
        assert_eq!(porcentaje(0, 0), 0);
        assert_eq!(porcentaje(5, 0), 0);
    }

    #[test]
    fn promedio_1dp_rounds_one_decimal() {
        assert_eq!(promedio_1dp(3, 2), 1.5);
        assert_eq!(promedio_1dp(10, 3), 3.3);
        assert_eq!(promedio_1dp(0, 0), 0.0);
    }

    #[test]
    fn promedio_techo_rounds_up() {
        assert_eq!(promedio_techo(10, 1), 10);
        assert_eq!(promedio_techo(1, 1), 1);
        assert_eq!(promedio_techo(21, 2), 11);
        assert_eq!(promedio_techo(0, 0), 0);
    }

    #[test]
    fn where_clause_numbers_params_in_bind_order() {
        let filtro = StatsFilter {
            rango: RangoFechas {
                desde: d(2026, 7, 1),
                hasta: Some(d(2026, 7, 31)),
            },
            profesional: Some(Uuid::new_v4()),
            hoy: d(2026, 8, 7),
        };
        assert_eq!(
            filtro.where_clause("c.fecha", "t.profesional_id"),
            "WHERE c.fecha >= $1 AND c.fecha <= $2 AND t.profesional_id = $3"
        );

        let abierto = StatsFilter {
            rango: RangoFechas {
                desde: d(2026, 8, 1),
                hasta: None,
            },
            profesional: None,
            hoy: d(2026, 8, 7),
        };
        assert_eq!(
            abierto.where_clause("c.fecha", "t.profesional_id"),
            "WHERE c.fecha >= $1"
        );
    }

    #[test]
    fn completar_meses_zero_fills_and_orders() {
        let rows = vec![
            MesRow {
                mes: "2026-06".to_string(),
                sesiones: 4,
            },
            MesRow {
                mes: "2026-08".to_string(),
                sesiones: 2,
            },
        ];
        let evolucion = completar_meses(rows, d(2026, 8, 7), 6);
        let meses: Vec<&str> = evolucion.iter().map(|e| e.mes.as_str()).collect();
        assert_eq!(
            meses,
            vec!["2026-03", "2026-04", "2026-05", "2026-06", "2026-07", "2026-08"]
        );
        assert_eq!(evolucion[3].sesiones, 4);
        assert_eq!(evolucion[4].sesiones, 0);
        assert_eq!(evolucion[5].sesiones, 2);
    }

    #[test]
    fn completar_meses_crosses_year_boundary() {
        let evolucion = completar_meses(Vec::new(), d(2026, 2, 10), 6);
        assert_eq!(evolucion[0].mes, "2025-09");
        assert_eq!(evolucion[5].mes, "2026-02");
    }

    #[test]
    fn armar_detalle_computes_percentages_and_averages() {
        let prof_a = Uuid::new_v4();
        let prof_b = Uuid::new_v4();
        let profesionales = vec![
            ProfesionalRow {
                id: prof_a,
                nombre: "Ana".to_string(),
                trabajadores: 2,
            },
            ProfesionalRow {
                id: prof_b,
                nombre: "Bruno".to_string(),
                trabajadores: 1,
            },
        ];
        // A: 3 sessions (2 virtual, 1 presencial) across 2 casos; B: none.
        let actividad = vec![ActividadRow {
            profesional_id: prof_a,
            casos: 2,
            sesiones: 3,
            virtuales: 2,
            presenciales: 1,
            casos_cerrados: 1,
        }];

        let detalle = armar_detalle(profesionales, actividad);
        assert_eq!(detalle.len(), 2);

        let a = &detalle[0];
        assert_eq!(a.nombre, "Ana");
        assert_eq!(a.virtual_percent, 67);
        assert_eq!(a.presencial_percent, 33);
        assert_eq!(a.sesiones_promedio, 1.5);
        assert_eq!(a.casos_abiertos, 1);

        let b = &detalle[1];
        assert_eq!(b.nombre, "Bruno");
        assert_eq!(b.trabajadores, 1);
        assert_eq!(b.casos, 0);
        assert_eq!(b.sesiones, 0);
        assert_eq!(b.virtual_percent, 0);
        assert_eq!(b.sesiones_promedio, 0.0);
    }

    #[test]
    fn armar_detalle_drops_idle_professionals() {
        let ocupado = Uuid::new_v4();
        let profesionales = vec![
            ProfesionalRow {
                id: ocupado,
                nombre: "Carla".to_string(),
                trabajadores: 0,
            },
            ProfesionalRow {
                id: Uuid::new_v4(),
                nombre: "Diego".to_string(),
                trabajadores: 0,
            },
        ];
        let actividad = vec![ActividadRow {
            profesional_id: ocupado,
            casos: 1,
            sesiones: 1,
            virtuales: 1,
            presenciales: 0,
            casos_cerrados: 0,
        }];

        let detalle = armar_detalle(profesionales, actividad);
        assert_eq!(detalle.len(), 1);
        assert_eq!(detalle[0].nombre, "Carla");
    }

    #[test]
    fn armar_detalle_orders_by_casos_then_nombre() {
        let mk = |nombre: &str, casos: i64| {
            let id = Uuid::new_v4();
            (
                ProfesionalRow {
                    id,
                    nombre: nombre.to_string(),
                    trabajadores: 1,
                },
                ActividadRow {
                    profesional_id: id,
                    casos,
                    sesiones: casos,
                    virtuales: casos,
                    presenciales: 0,
                    casos_cerrados: 0,
                },
            )
        };
        let (p1, a1) = mk("Zoe", 2);
        let (p2, a2) = mk("Alba", 2);
        let (p3, a3) = mk("Mario", 5);

        let detalle = armar_detalle(vec![p1, p2, p3], vec![a1, a2, a3]);
        let nombres: Vec<&str> = detalle.iter().map(|p| p.nombre.as_str()).collect();
        assert_eq!(nombres, vec!["Mario", "Alba", "Zoe"]);
    }
}
