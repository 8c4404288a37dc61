use rand::Rng;
use rusqlite::params;

use crate::state::DbPool;

fn pool_err(e: r2d2::Error) -> rusqlite::Error {
    rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
        Some(e.to_string()),
    )
}

/// Create a new session for a user. Returns the session token.
pub fn create_session(pool: &DbPool, user_id: &str, hours: u64) -> Result<String, rusqlite::Error> {
    let conn = pool.get().map_err(pool_err)?;

    let token = generate_token();
    let id = uuid::Uuid::now_v7().to_string();

    conn.execute(
        "INSERT INTO sessions (id, user_id, token, expires_at) VALUES (?1, ?2, ?3, datetime('now', ?4))",
        params![id, user_id, token, format!("+{} hours", hours)],
    )?;

    Ok(token)
}

/// Delete a session by token.
pub fn delete_session(pool: &DbPool, token: &str) -> Result<(), rusqlite::Error> {
    let conn = pool.get().map_err(pool_err)?;

    conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(())
}

/// Drop sessions past their expiry. Returns the number removed.
pub fn purge_expired(pool: &DbPool) -> Result<usize, rusqlite::Error> {
    let conn = pool.get().map_err(pool_err)?;

    conn.execute(
        "DELETE FROM sessions WHERE expires_at <= datetime('now')",
        [],
    )
}

/// Generate a cryptographically random 32-byte hex token.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn test_pool() -> DbPool {
        let manager = r2d2_sqlite::SqliteConnectionManager::memory();
        let pool = r2d2::Pool::builder().max_size(1).build(manager).unwrap();
        db::run_migrations(&pool).unwrap();
        pool
    }

    fn seed_user(pool: &DbPool, id: &str) {
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO users (id, email, name, password_hash) \
             VALUES (?1, ?2, ?1, 'x')",
            params![id, format!("{}@example.com", id)],
        )
        .unwrap();
    }

    #[test]
    fn generate_token_is_64_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generate_token_is_unique() {
        let t1 = generate_token();
        let t2 = generate_token();
        assert_ne!(t1, t2);
    }

    #[test]
    fn create_and_delete_session_round_trip() {
        let pool = test_pool();
        seed_user(&pool, "u1");

        let token = create_session(&pool, "u1", 1).unwrap();
        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sessions WHERE token = ?1",
                params![token],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
        drop(conn);

        delete_session(&pool, &token).unwrap();
        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn purge_expired_only_removes_stale_sessions() {
        let pool = test_pool();
        seed_user(&pool, "u1");

        let live = create_session(&pool, "u1", 24).unwrap();
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO sessions (id, user_id, token, expires_at) \
             VALUES ('s-old', 'u1', 'stale', datetime('now', '-1 hour'))",
            [],
        )
        .unwrap();
        drop(conn);

        assert_eq!(purge_expired(&pool).unwrap(), 1);

        let conn = pool.get().unwrap();
        let remaining: String = conn
            .query_row("SELECT token FROM sessions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, live);
    }
}
