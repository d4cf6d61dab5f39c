//! Request extractors: JWT authentication and role gates.

pub mod auth;
pub mod rbac;
