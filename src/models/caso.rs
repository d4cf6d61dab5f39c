//! Caso read model.
//!
//! A caso has no stored identity: it is the grouping of consulta rows by
//! (trabajador_id, motivo). This value object materializes that grouping
//! so callers never re-derive it ad hoc.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One caso: all sessions a client has under a single motivo.
///
/// `cerrado` follows the any-session-closed rule: the caso counts as
/// closed when at least one of its sessions has estado `Cerrado`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Caso {
    pub trabajador_id: Uuid,
    pub motivo: String,
    pub sesiones: i64,
    pub primera_fecha: NaiveDate,
    pub ultima_fecha: NaiveDate,
    pub cerrado: bool,
}
