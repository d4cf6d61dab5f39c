pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use axum::routing::{get, post};
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
}

/// Build the full application router. Shared by `main` and the
/// integration tests so both serve exactly the same surface.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/users", post(routes::auth::create_user))
        .route("/auth/me", get(routes::auth::me))
        .route(
            "/trabajadores",
            get(routes::trabajadores::list).post(routes::trabajadores::create),
        )
        .route(
            "/trabajadores/{id}",
            get(routes::trabajadores::get_by_id).put(routes::trabajadores::update),
        )
        .route("/trabajadores/{id}/cierre", post(routes::trabajadores::cerrar))
        .route(
            "/consultas",
            get(routes::consultas::list).post(routes::consultas::create),
        )
        .route("/consultas/casos", get(routes::consultas::list_casos))
        .route(
            "/consultas/{id}",
            get(routes::consultas::get_by_id).put(routes::consultas::update),
        )
        .route(
            "/sve/mesas",
            get(routes::sve::list_mesas).post(routes::sve::create_mesa),
        )
        .route("/sve/mesas/{trabajador_id}", get(routes::sve::get_mesa))
        .route(
            "/sve/consultas",
            get(routes::sve::list_consultas).post(routes::sve::create_consulta),
        )
        .route("/sve/dashboard/stats", get(routes::dashboard::sve_stats))
        .route(
            "/empresas",
            get(routes::empresas::list).post(routes::empresas::create),
        )
        .route("/empresas/{id}", get(routes::empresas::get_by_id))
        .route("/dashboard/stats", get(routes::dashboard::stats))
        .route("/informes/casos", get(routes::informes::caso));

    Router::new()
        .route("/health/live", get(routes::health::live))
        .route("/health/ready", get(routes::health::ready))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
