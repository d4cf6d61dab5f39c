//! Company (payer/affiliation) entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Empresa {
    pub id: Uuid,
    pub nombre: String,
    pub nit: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct CreateEmpresa {
    #[validate(length(min = 1, max = 255))]
    pub nombre: String,
    #[validate(length(min = 1, max = 32))]
    pub nit: String,
}
