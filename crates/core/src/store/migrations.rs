//! Schema setup for the `kv_store` table.
//!
//! The schema version lives in SQLite's `user_version` pragma. Each entry of
//! [`SCHEMA_STEPS`] upgrades the file by exactly one version inside its own
//! transaction, so a crash mid-upgrade leaves the previous version intact.

use crate::Error;
use tokio_rusqlite::Connection;

/// Upgrade steps; index `i` takes the file from version `i` to `i + 1`.
const SCHEMA_STEPS: &[&str] = &[include_str!("../../migrations/001_kv_store.sql")];

/// Bring the store schema up to date. Returns the resulting version.
///
/// # Errors
///
/// Fails with `MigrationFailed` when the file was written by a newer build,
/// or with `Database` when a step does not apply.
pub async fn run(conn: &Connection) -> Result<i64, Error> {
    conn.call(|conn| -> Result<i64, Error> {
        let current: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        let target = i64::try_from(SCHEMA_STEPS.len()).unwrap_or(i64::MAX);

        if current > target {
            return Err(Error::MigrationFailed(format!(
                "store schema v{current} is newer than this build supports (v{target})"
            )));
        }

        let applied = usize::try_from(current).unwrap_or(0);
        for (version, sql) in (1_i64..).zip(SCHEMA_STEPS).skip(applied) {
            let tx = conn.transaction()?;
            tx.execute_batch(sql)?;
            tx.pragma_update(None, "user_version", version)?;
            tx.commit()?;
            tracing::debug!(version, "upgraded kv_store schema");
        }

        Ok(target)
    })
    .await
    .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn user_version(conn: &Connection) -> i64 {
        conn.call(|conn| conn.pragma_query_value(None, "user_version", |row| row.get::<_, i64>(0)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_file_reaches_latest_version() {
        let conn = Connection::open_in_memory().await.unwrap();
        assert_eq!(user_version(&conn).await, 0);

        let version = run(&conn).await.unwrap();
        assert_eq!(version, 1);
        assert_eq!(user_version(&conn).await, 1);

        let has_kv_store: bool = conn
            .call(|conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='kv_store')",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert!(has_kv_store);
    }

    #[tokio::test]
    async fn test_rerun_keeps_data() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();
        conn.call(|conn| {
            conn.execute("INSERT INTO kv_store (key, value, updated_at) VALUES ('k', 'v', 'now')", [])
        })
        .await
        .unwrap();

        run(&conn).await.unwrap();

        let count: i64 = conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_rejects_newer_schema() {
        let conn = Connection::open_in_memory().await.unwrap();
        conn.call(|conn| conn.pragma_update(None, "user_version", 99))
            .await
            .unwrap();

        let err = run(&conn).await.unwrap_err();
        assert!(matches!(err, Error::MigrationFailed(msg) if msg.contains("v99")));
    }
}
