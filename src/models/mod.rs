//! Database models and DTOs for all domain entities.

pub mod caso;
pub mod consulta;
pub mod empresa;
pub mod pagination;
pub mod sve;
pub mod trabajador;
pub mod user;
