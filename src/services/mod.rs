//! Business logic services.

pub mod auth;
pub mod consulta;
pub mod empresa;
pub mod informe;
pub mod periodo;
pub mod scope;
pub mod stats;
pub mod stats_sve;
pub mod sve;
pub mod trabajador;
