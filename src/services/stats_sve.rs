//! SVE dashboard statistics.
//!
//! Parallel aggregation pipeline restricted to the surveillance track:
//! a caso here is a client with a mesa de trabajo, and sessions come from
//! `consultas_sve`. Scope and window composition follow the main pipeline.

use chrono::{Days, Months, NaiveDate};
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::services::stats::{
    bind_filtro, porcentaje, primer_dia_mes, promedio_1dp, StatsFilter,
};

/// Consolidated SVE statistics document.
#[derive(Debug, Serialize)]
pub struct SveDashboardStats {
    pub total_casos: i64,
    pub casos_nuevos_30_dias: i64,
    pub total_sesiones: i64,
    pub virtuales: i64,
    pub presenciales: i64,
    pub casos_abiertos: i64,
    pub casos_cerrados: i64,
    pub sesiones_promedio_caso: f64,
    pub tasa_cierre_percent: i64,
    pub por_criterio: Vec<CriterioCasos>,
    pub evolucion: Vec<EvolucionSveMes>,
}

/// Mesa-de-trabajo count and share for one inclusion criterion.
#[derive(Debug, Serialize)]
pub struct CriterioCasos {
    pub criterio: String,
    pub casos: i64,
    pub percent: i64,
}

/// SVE session counts for one calendar month, split by modality.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EvolucionSveMes {
    pub mes: String,
    pub virtuales: i64,
    pub presenciales: i64,
}

/// Months covered by the SVE evolution window.
const MESES_EVOLUCION_SVE: u32 = 12;

/// Window for "new" SVE casos.
const DIAS_CASO_NUEVO: u64 = 30;

/// Fetch the SVE statistics document. All-or-nothing like the main
/// pipeline.
pub async fn obtener_stats(
    pool: &PgPool,
    filtro: &StatsFilter,
) -> Result<SveDashboardStats, AppError> {
    let (casos, sesiones, criterios, evolucion) = tokio::try_join!(
        fetch_casos(pool, filtro),
        fetch_sesiones(pool, filtro),
        fetch_criterios(pool, filtro),
        fetch_evolucion(pool, filtro),
    )?;

    let casos_abiertos = casos.total - casos.cerrados;
    let por_criterio = armar_criterios(criterios, casos.total);

    Ok(SveDashboardStats {
        total_casos: casos.total,
        casos_nuevos_30_dias: casos.nuevos,
        total_sesiones: sesiones.sesiones,
        virtuales: sesiones.virtuales,
        presenciales: sesiones.presenciales,
        casos_abiertos,
        casos_cerrados: casos.cerrados,
        sesiones_promedio_caso: promedio_1dp(sesiones.sesiones, casos.total),
        tasa_cierre_percent: porcentaje(casos.cerrados, casos.total),
        por_criterio,
        evolucion,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct CasosSveRow {
    total: i64,
    nuevos: i64,
    cerrados: i64,
}

/// Caso headcounts over mesa-backed clients. Date-unscoped except for the
/// fixed "new in 30 days" window; a caso is closed when the client's
/// fecha_cierre is set.
async fn fetch_casos(pool: &PgPool, filtro: &StatsFilter) -> Result<CasosSveRow, AppError> {
    let limite = filtro.hoy - Days::new(DIAS_CASO_NUEVO);
    let mut sql = String::from(
        r#"
        SELECT COUNT(*) AS total,
               COUNT(*) FILTER (WHERE m.created_at >= $1) AS nuevos,
               COUNT(*) FILTER (WHERE t.fecha_cierre IS NOT NULL) AS cerrados
        FROM mesas_trabajo m
        JOIN trabajadores t ON t.id = m.trabajador_id
        "#,
    );
    if filtro.profesional.is_some() {
        sql.push_str(" WHERE t.profesional_id = $2");
    }
    let mut query = sqlx::query_as::<_, CasosSveRow>(&sql).bind(limite);
    if let Some(prof) = filtro.profesional {
        query = query.bind(prof);
    }
    Ok(query.fetch_one(pool).await?)
}

#[derive(Debug, sqlx::FromRow)]
struct SesionesSveRow {
    sesiones: i64,
    virtuales: i64,
    presenciales: i64,
}

async fn fetch_sesiones(
    pool: &PgPool,
    filtro: &StatsFilter,
) -> Result<SesionesSveRow, AppError> {
    let where_clause = filtro.where_clause("s.fecha", "t.profesional_id");
    let sql = format!(
        r#"
        SELECT COUNT(*) AS sesiones,
               COUNT(*) FILTER (WHERE s.modalidad = 'Virtual') AS virtuales,
               COUNT(*) FILTER (WHERE s.modalidad = 'Presencial') AS presenciales
        FROM consultas_sve s
        JOIN trabajadores t ON t.id = s.trabajador_id
        {where_clause}
        "#,
    );
    let row = bind_filtro!(sqlx::query_as::<_, SesionesSveRow>(&sql), filtro)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

#[derive(Debug, sqlx::FromRow)]
struct CriterioRow {
    criterio: String,
    casos: i64,
}

async fn fetch_criterios(
    pool: &PgPool,
    filtro: &StatsFilter,
) -> Result<Vec<CriterioRow>, AppError> {
    let mut sql = String::from(
        r#"
        SELECT m.criterio_inclusion AS criterio, COUNT(*) AS casos
        FROM mesas_trabajo m
        JOIN trabajadores t ON t.id = m.trabajador_id
        "#,
    );
    if filtro.profesional.is_some() {
        sql.push_str(" WHERE t.profesional_id = $1");
    }
    sql.push_str(" GROUP BY m.criterio_inclusion ORDER BY casos DESC, criterio ASC");
    let mut query = sqlx::query_as::<_, CriterioRow>(&sql);
    if let Some(prof) = filtro.profesional {
        query = query.bind(prof);
    }
    Ok(query.fetch_all(pool).await?)
}

fn armar_criterios(rows: Vec<CriterioRow>, total: i64) -> Vec<CriterioCasos> {
    rows.into_iter()
        .map(|r| CriterioCasos {
            percent: porcentaje(r.casos, total),
            criterio: r.criterio,
            casos: r.casos,
        })
        .collect()
}

#[derive(Debug, sqlx::FromRow)]
struct MesSveRow {
    mes: String,
    virtuales: i64,
    presenciales: i64,
}

async fn fetch_evolucion(
    pool: &PgPool,
    filtro: &StatsFilter,
) -> Result<Vec<EvolucionSveMes>, AppError> {
    // Fixed trailing window, independent of the requested period.
    let inicio = primer_dia_mes(filtro.hoy - Months::new(MESES_EVOLUCION_SVE - 1));

    let mut sql = String::from(
        r#"
        SELECT to_char(date_trunc('month', s.fecha), 'YYYY-MM') AS mes,
               COUNT(*) FILTER (WHERE s.modalidad = 'Virtual') AS virtuales,
               COUNT(*) FILTER (WHERE s.modalidad = 'Presencial') AS presenciales
        FROM consultas_sve s
        JOIN trabajadores t ON t.id = s.trabajador_id
        WHERE s.fecha >= $1
        "#,
    );
    if filtro.profesional.is_some() {
        sql.push_str(" AND t.profesional_id = $2");
    }
    sql.push_str(" GROUP BY 1 ORDER BY 1");

    let mut query = sqlx::query_as::<_, MesSveRow>(&sql).bind(inicio);
    if let Some(prof) = filtro.profesional {
        query = query.bind(prof);
    }
    let rows = query.fetch_all(pool).await?;

    Ok(completar_meses(rows, filtro.hoy, MESES_EVOLUCION_SVE))
}

/// Zero-fill the trailing window so every month is present, in order.
fn completar_meses(rows: Vec<MesSveRow>, hoy: NaiveDate, meses: u32) -> Vec<EvolucionSveMes> {
    let por_mes: std::collections::HashMap<String, (i64, i64)> = rows
        .into_iter()
        .map(|r| (r.mes, (r.virtuales, r.presenciales)))
        .collect();

    (0..meses)
        .rev()
        .map(|atras| {
            let mes = primer_dia_mes(hoy - Months::new(atras)).format("%Y-%m").to_string();
            let (virtuales, presenciales) = por_mes.get(&mes).copied().unwrap_or((0, 0));
            EvolucionSveMes {
                mes,
                virtuales,
                presenciales,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn criterios_percentages_over_total() {
        let rows = vec![
            CriterioRow {
                criterio: "Riesgo psicosocial alto".to_string(),
                casos: 3,
            },
            CriterioRow {
                criterio: "Reintegro laboral".to_string(),
                casos: 1,
            },
        ];
        let criterios = armar_criterios(rows, 4);
        assert_eq!(criterios[0].percent, 75);
        assert_eq!(criterios[1].percent, 25);
    }

    #[test]
    fn criterios_zero_total_yields_zero_percent() {
        let criterios = armar_criterios(Vec::new(), 0);
        assert!(criterios.is_empty());

        let rows = vec![CriterioRow {
            criterio: "Seguimiento".to_string(),
            casos: 0,
        }];
        assert_eq!(armar_criterios(rows, 0)[0].percent, 0);
    }

    #[test]
    fn evolucion_fills_twelve_months() {
        let rows = vec![MesSveRow {
            mes: "2026-01".to_string(),
            virtuales: 2,
            presenciales: 1,
        }];
        let evolucion = completar_meses(rows, d(2026, 8, 7), 12);
        assert_eq!(evolucion.len(), 12);
        assert_eq!(evolucion[0].mes, "2025-09");
        assert_eq!(evolucion[11].mes, "2026-08");

        let enero = evolucion.iter().find(|e| e.mes == "2026-01").unwrap();
        assert_eq!(enero.virtuales, 2);
        assert_eq!(enero.presenciales, 1);
        assert_eq!(evolucion[11].virtuales, 0);
    }
}
