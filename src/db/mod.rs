pub mod models;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use std::path::Path;

use crate::config::BootstrapConfig;
use crate::state::DbPool;

pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_initial",
        include_str!("../../migrations/001_initial.sql"),
    ),
    (
        "002_engagement",
        include_str!("../../migrations/002_engagement.sql"),
    ),
    (
        "003_gallery_views",
        include_str!("../../migrations/003_gallery_views.sql"),
    ),
];

pub fn create_pool(db_path: &Path) -> anyhow::Result<DbPool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // journal_mode sticks to the database file; the other pragmas are
    // per-connection, so every pooled connection runs the batch.
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            ",
        )
    });
    let pool = Pool::builder().max_size(8).build(manager)?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get()?;

    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    // Create migrations tracking table
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM schema_version WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;

        if !already_applied {
            tracing::info!("Applying migration: {}", name);
            conn.execute_batch(sql)?;
            conn.execute(
                "INSERT INTO schema_version (name) VALUES (?1)",
                params![name],
            )?;
        }
    }

    tracing::info!("Database migrations complete");
    Ok(())
}

/// Seed the first admin account from config. Does nothing once any admin
/// exists, so a long-lived install never has its roles overwritten.
pub fn ensure_admin(pool: &DbPool, bootstrap: &BootstrapConfig) -> anyhow::Result<()> {
    let (email, password) = match (&bootstrap.admin_email, &bootstrap.admin_password) {
        (Some(email), Some(password)) => (email, password),
        _ => return Ok(()),
    };

    let conn = pool.get()?;
    let admin_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE role = 'admin'",
        [],
        |row| row.get(0),
    )?;
    if admin_count > 0 {
        return Ok(());
    }

    let existing: Option<String> = conn
        .query_row(
            "SELECT id FROM users WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    if let Some(user_id) = existing {
        conn.execute(
            "UPDATE users SET role = 'admin', updated_at = datetime('now') WHERE id = ?1",
            params![user_id],
        )?;
        tracing::info!(%email, "promoted existing account to admin");
        return Ok(());
    }

    let id = uuid::Uuid::now_v7().to_string();
    let name = email.split('@').next().unwrap_or("admin").to_string();
    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    conn.execute(
        "INSERT INTO users (id, email, name, password_hash, role) \
         VALUES (?1, ?2, ?3, ?4, 'admin')",
        params![id, email, name, password_hash],
    )?;
    tracing::info!(%email, "created bootstrap admin account");
    Ok(())
}
