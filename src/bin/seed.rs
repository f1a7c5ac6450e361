//! Seed script for development — populates a fresh database with sample users.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use chrono::{Duration, Utc};
use sqlx::PgPool;

const ADMIN_EMAIL: &str = "admin@opsboard.local";
const ADMIN_PASSWORD: &str = "Test123!admin";
const SAMPLE_PASSWORD: &str = "password123";

/// (email, name, days since registration)
const SAMPLE_USERS: &[(&str, Option<&str>, i64)] = &[
    ("alice@opsboard.local", Some("Alice Johnson"), 0),
    ("bob@opsboard.local", Some("Bob Wilson"), 2),
    ("charlie@opsboard.local", Some("Charlie Brown"), 9),
    ("dana@opsboard.local", None, 21),
    ("eve@opsboard.local", Some("Eve Martin"), 45),
    ("frank@opsboard.local", None, 90),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL")?;
    let pool = opsboard::db::create_pool(&db_url, 5).await?;

    // Run migrations first
    opsboard::db::run_migrations(&pool).await?;

    println!("=== Opsboard Seed Script ===");

    seed_admin_user(&pool).await?;
    seed_sample_users(&pool).await?;

    println!("\n=== Seed complete! ===");
    println!("Admin login: {ADMIN_EMAIL} / {ADMIN_PASSWORD}");

    Ok(())
}

async fn seed_admin_user(pool: &PgPool) -> anyhow::Result<()> {
    let hash = opsboard::services::auth::hash_password(ADMIN_PASSWORD)?;

    let inserted = sqlx::query(
        "INSERT INTO users (email, name, password_hash, role)
         VALUES ($1, 'Administrator', $2, 'admin')
         ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash, updated_at = NOW()",
    )
    .bind(ADMIN_EMAIL)
    .bind(&hash)
    .execute(pool)
    .await?;

    println!("[done] Admin user ready ({} row)", inserted.rows_affected());
    Ok(())
}

async fn seed_sample_users(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'user'")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] {count} regular users already present");
        return Ok(());
    }

    let hash = opsboard::services::auth::hash_password(SAMPLE_PASSWORD)?;
    let now = Utc::now();

    for (email, name, days_ago) in SAMPLE_USERS {
        let created_at = now - Duration::days(*days_ago);
        sqlx::query(
            "INSERT INTO users (email, name, password_hash, role, created_at, updated_at)
             VALUES ($1, $2, $3, 'user', $4, $4)",
        )
        .bind(*email)
        .bind(*name)
        .bind(&hash)
        .bind(created_at)
        .execute(pool)
        .await?;
    }

    println!("[done] Created {} sample users", SAMPLE_USERS.len());
    Ok(())
}
