//! Reporting window resolver.
//!
//! Translates the dashboard's period tag into a concrete date range. The
//! range is applied to `fecha` columns as `>= desde` plus, when bounded,
//! `<= hasta` (inclusive on both ends).

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::errors::AppError;

/// Reporting period tag accepted by the dashboard endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Periodo {
    Current,
    Last,
    Last3,
    Last6,
    Year,
    Custom,
}

impl Periodo {
    /// Parse the query-string tag. Unrecognized or absent tags fall back to
    /// `Current` so a malformed request can never widen to all-time data.
    pub fn parse(tag: Option<&str>) -> Self {
        match tag {
            Some("last") => Periodo::Last,
            Some("last3") => Periodo::Last3,
            Some("last6") => Periodo::Last6,
            Some("year") => Periodo::Year,
            Some("custom") => Periodo::Custom,
            _ => Periodo::Current,
        }
    }
}

/// Resolved date range. `hasta = None` means open-ended through now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangoFechas {
    pub desde: NaiveDate,
    pub hasta: Option<NaiveDate>,
}

fn primer_dia_mes(fecha: NaiveDate) -> NaiveDate {
    fecha.with_day(1).unwrap_or(fecha)
}

/// Resolve a period tag (plus custom bounds) against `hoy`.
///
/// `custom` requires both bounds and rejects inverted ranges before any
/// query is issued.
pub fn resolver(
    periodo: Periodo,
    desde: Option<NaiveDate>,
    hasta: Option<NaiveDate>,
    hoy: NaiveDate,
) -> Result<RangoFechas, AppError> {
    match periodo {
        Periodo::Current => Ok(RangoFechas {
            desde: primer_dia_mes(hoy),
            hasta: None,
        }),
        Periodo::Last => {
            let inicio_mes_actual = primer_dia_mes(hoy);
            let desde = inicio_mes_actual - Months::new(1);
            let hasta = inicio_mes_actual - Days::new(1);
            Ok(RangoFechas {
                desde,
                hasta: Some(hasta),
            })
        }
        Periodo::Last3 => Ok(RangoFechas {
            desde: primer_dia_mes(hoy - Months::new(3)),
            hasta: None,
        }),
        Periodo::Last6 => Ok(RangoFechas {
            desde: primer_dia_mes(hoy - Months::new(6)),
            hasta: None,
        }),
        Periodo::Year => Ok(RangoFechas {
            desde: NaiveDate::from_ymd_opt(hoy.year(), 1, 1).unwrap_or(hoy),
            hasta: None,
        }),
        Periodo::Custom => {
            let (desde, hasta) = match (desde, hasta) {
                (Some(d), Some(h)) => (d, h),
                _ => {
                    return Err(AppError::Validation(
                        "Custom period requires both startDate and endDate".to_string(),
                    ));
                }
            };
            if desde > hasta {
                return Err(AppError::Validation(
                    "startDate must not be after endDate".to_string(),
                ));
            }
            Ok(RangoFechas {
                desde,
                hasta: Some(hasta),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parse_known_tags() {
        assert_eq!(Periodo::parse(Some("last")), Periodo::Last);
        assert_eq!(Periodo::parse(Some("last3")), Periodo::Last3);
        assert_eq!(Periodo::parse(Some("last6")), Periodo::Last6);
        assert_eq!(Periodo::parse(Some("year")), Periodo::Year);
        assert_eq!(Periodo::parse(Some("custom")), Periodo::Custom);
        assert_eq!(Periodo::parse(Some("current")), Periodo::Current);
    }

    #[test]
    fn parse_unknown_tag_defaults_to_current() {
        assert_eq!(Periodo::parse(Some("everything")), Periodo::Current);
        assert_eq!(Periodo::parse(None), Periodo::Current);
    }

    #[test]
    fn current_starts_at_first_of_month_open_ended() {
        let rango = resolver(Periodo::Current, None, None, d(2026, 8, 7)).unwrap();
        assert_eq!(rango.desde, d(2026, 8, 1));
        assert_eq!(rango.hasta, None);
    }

    #[test]
    fn last_covers_full_previous_month() {
        let rango = resolver(Periodo::Last, None, None, d(2026, 8, 7)).unwrap();
        assert_eq!(rango.desde, d(2026, 7, 1));
        assert_eq!(rango.hasta, Some(d(2026, 7, 31)));
    }

    #[test]
    fn last_handles_january() {
        let rango = resolver(Periodo::Last, None, None, d(2026, 1, 15)).unwrap();
        assert_eq!(rango.desde, d(2025, 12, 1));
        assert_eq!(rango.hasta, Some(d(2025, 12, 31)));
    }

    #[test]
    fn last3_goes_back_three_months_to_day_one() {
        let rango = resolver(Periodo::Last3, None, None, d(2026, 8, 7)).unwrap();
        assert_eq!(rango.desde, d(2026, 5, 1));
        assert_eq!(rango.hasta, None);
    }

    #[test]
    fn last6_crosses_year_boundary() {
        let rango = resolver(Periodo::Last6, None, None, d(2026, 3, 20)).unwrap();
        assert_eq!(rango.desde, d(2025, 9, 1));
        assert_eq!(rango.hasta, None);
    }

    #[test]
    fn year_starts_january_first() {
        let rango = resolver(Periodo::Year, None, None, d(2026, 8, 7)).unwrap();
        assert_eq!(rango.desde, d(2026, 1, 1));
        assert_eq!(rango.hasta, None);
    }

    #[test]
    fn custom_uses_caller_bounds() {
        let rango = resolver(
            Periodo::Custom,
            Some(d(2026, 2, 10)),
            Some(d(2026, 3, 15)),
            d(2026, 8, 7),
        )
        .unwrap();
        assert_eq!(rango.desde, d(2026, 2, 10));
        assert_eq!(rango.hasta, Some(d(2026, 3, 15)));
    }

    #[test]
    fn custom_missing_end_is_validation_error() {
        let result = resolver(Periodo::Custom, Some(d(2026, 2, 10)), None, d(2026, 8, 7));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn custom_missing_start_is_validation_error() {
        let result = resolver(Periodo::Custom, None, Some(d(2026, 3, 15)), d(2026, 8, 7));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn custom_inverted_range_rejected() {
        let result = resolver(
            Periodo::Custom,
            Some(d(2026, 3, 15)),
            Some(d(2026, 2, 10)),
            d(2026, 8, 7),
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
