//! Route definitions for the bienestar API.

pub mod auth;
pub mod consultas;
pub mod dashboard;
pub mod empresas;
pub mod health;
pub mod informes;
pub mod sve;
pub mod trabajadores;
