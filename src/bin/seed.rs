//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` and `JWT_SECRET` environment variables (reads .env).

use chrono::{Days, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const ADMIN_PASSWORD: &str = "Test123!";
const PROFESIONAL_PASSWORD: &str = "Profesional123!";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== Bienestar Seed Script ===");

    let profesionales = seed_users(&pool).await?;
    let empresas = seed_empresas(&pool).await?;
    seed_trabajadores_y_consultas(&pool, &profesionales, &empresas).await?;

    println!("\n=== Seed complete! ===");
    println!("Admin login: admin / {ADMIN_PASSWORD}");
    println!("Profesional login: mgomez / {PROFESIONAL_PASSWORD}");

    Ok(())
}

async fn seed_users(pool: &PgPool) -> anyhow::Result<Vec<Uuid>> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = 'admin')")
            .fetch_one(pool)
            .await?;

    if exists {
        println!("[skip] Users already exist");
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM users WHERE role = 'Profesional' ORDER BY username",
        )
        .fetch_all(pool)
        .await?;
        return Ok(ids);
    }

    let admin_hash = bienestar::services::auth::hash_password(ADMIN_PASSWORD)?;
    sqlx::query(
        "INSERT INTO users (username, email, password_hash, display_name, role)
         VALUES ('admin', 'admin@bienestar.local', $1, 'Coordinación Bienestar', 'Admin')",
    )
    .bind(&admin_hash)
    .execute(pool)
    .await?;

    let prof_hash = bienestar::services::auth::hash_password(PROFESIONAL_PASSWORD)?;
    let mut ids = Vec::new();
    for (username, email, nombre) in [
        ("mgomez", "mgomez@bienestar.local", "María Gómez"),
        ("jrestrepo", "jrestrepo@bienestar.local", "Julián Restrepo"),
    ] {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash, display_name, role)
             VALUES ($1, $2, $3, $4, 'Profesional') RETURNING id",
        )
        .bind(username)
        .bind(email)
        .bind(&prof_hash)
        .bind(nombre)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }

    println!("[done] Created admin and 2 profesional users");
    Ok(ids)
}

async fn seed_empresas(pool: &PgPool) -> anyhow::Result<Vec<Uuid>> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM empresas")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Empresas already exist ({count})");
        let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM empresas ORDER BY nombre")
            .fetch_all(pool)
            .await?;
        return Ok(ids);
    }

    let mut ids = Vec::new();
    for (nombre, nit) in [
        ("Constructora Andina S.A.", "900123456-1"),
        ("Servicios Integrales del Valle", "900654321-2"),
        ("Transportes La Sabana", "901111222-3"),
    ] {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO empresas (nombre, nit) VALUES ($1, $2) RETURNING id",
        )
        .bind(nombre)
        .bind(nit)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }

    println!("[done] Created 3 empresas");
    Ok(ids)
}

async fn seed_trabajadores_y_consultas(
    pool: &PgPool,
    profesionales: &[Uuid],
    empresas: &[Uuid],
) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trabajadores")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Trabajadores already exist ({count})");
        return Ok(());
    }

    let hoy = Utc::now().date_naive();

    let trabajadores = [
        ("10203040", "Carlos Pérez", "Bogotá", Some(0usize), true),
        ("20304050", "Luisa Fernanda Ríos", "Medellín", Some(1), false),
        ("30405060", "Andrés Felipe Mora", "Bogotá", None, true),
        ("40506070", "Paola Cifuentes", "Cali", Some(2), false),
    ];

    let mut trabajador_ids = Vec::new();
    for (i, (cedula, nombre, sede, empresa_idx, con_contacto)) in
        trabajadores.iter().enumerate()
    {
        let profesional = profesionales[i % profesionales.len()];
        let empresa = empresa_idx.map(|idx| empresas[idx]);
        let telefono = con_contacto.then(|| "3001234567".to_string());

        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO trabajadores (
                 cedula, nombre, sede, empresa_id,
                 contacto_emergencia_nombre, contacto_emergencia_telefono, profesional_id
             ) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(cedula)
        .bind(nombre)
        .bind(sede)
        .bind(empresa)
        .bind(con_contacto.then(|| "Contacto de emergencia".to_string()))
        .bind(telefono)
        .bind(profesional)
        .fetch_one(pool)
        .await?;
        trabajador_ids.push(id);
    }

    // Sessions across both tracks, spread over the last three months.
    let consultas = [
        (0usize, 70u64, "Virtual", "Estrés laboral", "Abierto"),
        (0, 40, "Presencial", "Estrés laboral", "Abierto"),
        (0, 10, "Virtual", "Estrés laboral", "Cerrado"),
        (1, 55, "Presencial", "Duelo familiar", "Abierto"),
        (1, 20, "Virtual", "Duelo familiar", "Abierto"),
        (2, 15, "Virtual", "Ansiedad", "Abierto"),
        (3, 80, "Presencial", "Conflicto con jefatura", "Cerrado"),
    ];

    for (idx, dias_atras, modalidad, motivo, estado) in consultas {
        let fecha = hoy - Days::new(dias_atras);
        sqlx::query(
            "INSERT INTO consultas (trabajador_id, fecha, modalidad, motivo, estado)
             VALUES ($1, $2, $3::modalidad, $4, $5::estado_consulta)",
        )
        .bind(trabajador_ids[idx])
        .bind(fecha)
        .bind(modalidad)
        .bind(motivo)
        .bind(estado)
        .execute(pool)
        .await?;
    }

    // Close Paola's caso ten days after it opened.
    sqlx::query("UPDATE trabajadores SET fecha_cierre = $2 WHERE id = $1")
        .bind(trabajador_ids[3])
        .bind(hoy - Days::new(70))
        .execute(pool)
        .await?;

    // SVE track: mesa de trabajo + follow-up sessions for Carlos.
    sqlx::query(
        "INSERT INTO mesas_trabajo (trabajador_id, criterio_inclusion, diagnostico)
         VALUES ($1, 'Riesgo psicosocial alto', 'Síntomas de agotamiento ocupacional')",
    )
    .bind(trabajador_ids[0])
    .execute(pool)
    .await?;

    for (dias_atras, modalidad) in [(30u64, "Virtual"), (5, "Presencial")] {
        sqlx::query(
            "INSERT INTO consultas_sve (trabajador_id, fecha, modalidad)
             VALUES ($1, $2, $3::modalidad)",
        )
        .bind(trabajador_ids[0])
        .bind(hoy - Days::new(dias_atras))
        .bind(modalidad)
        .execute(pool)
        .await?;
    }

    println!("[done] Created 4 trabajadores, 7 consultas, 1 mesa SVE, 2 consultas SVE");
    Ok(())
}
