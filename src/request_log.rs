//! Append-only log of handled requests, stored in SQLite.

use std::str::FromStr;

use chrono::NaiveDateTime;
use log::info;
use serde::Serialize;
use sqlx::FromRow;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::Config;

/// Rows returned by [`RequestLog::recent`] at most.
pub const MAX_RECENT: u32 = 100;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct RequestLogEntry {
    pub id: i64,
    pub date_req: String,
    pub test_id: Option<String>,
    pub response_code: i64,
    pub timestamp: NaiveDateTime,
}

/// Handle to the `requests` table. Every call checks a connection out of the
/// pool for one statement, so concurrent writers are serialized by SQLite.
#[derive(Debug, Clone)]
pub struct RequestLog {
    pool: SqlitePool,
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

impl RequestLog {
    /// Open the store named by `config.database_url`, creating the file and
    /// table if needed.
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        let options =
            SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

        // An in-memory database lives and dies with its connection.
        let pool = if is_in_memory(&config.database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect_with(options)
                .await?
        };

        let log = RequestLog { pool };
        log.init().await?;
        info!("Request log ready at {}", config.database_url);

        Ok(log)
    }

    async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS requests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date_req TEXT NOT NULL,
                test_id TEXT,
                response_code INTEGER NOT NULL,
                timestamp TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append one entry and return its id.
    pub async fn record(
        &self,
        date_req: &str,
        test_id: Option<&str>,
        response_code: u16,
    ) -> Result<i64, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO requests (date_req, test_id, response_code) VALUES (?, ?, ?)")
                .bind(date_req)
                .bind(test_id)
                .bind(i64::from(response_code))
                .execute(&self.pool)
                .await?;

        Ok(result.last_insert_rowid())
    }

    /// Up to `limit` entries (capped at [`MAX_RECENT`]), newest first.
    pub async fn recent(&self, limit: u32) -> Result<Vec<RequestLogEntry>, sqlx::Error> {
        sqlx::query_as::<_, RequestLogEntry>(
            "SELECT id, date_req, test_id, response_code, timestamp FROM requests \
             ORDER BY timestamp DESC, id DESC LIMIT ?",
        )
        .bind(i64::from(limit.min(MAX_RECENT)))
        .fetch_all(&self.pool)
        .await
    }

    /// Delete every entry. Returns how many were removed.
    pub async fn reset(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM requests")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_log() -> RequestLog {
        let config = Config::default().with_database_url("sqlite::memory:");
        RequestLog::connect(&config).await.unwrap()
    }

    #[tokio::test]
    async fn records_and_reads_back() {
        let log = memory_log().await;

        let id = log.record("22/07/2025", Some("t1"), 200).await.unwrap();
        log.record("bad", None, 400).await.unwrap();

        let entries = log.recent(MAX_RECENT).await.unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].date_req, "bad");
        assert_eq!(entries[0].test_id, None);
        assert_eq!(entries[0].response_code, 400);

        assert_eq!(entries[1].id, id);
        assert_eq!(entries[1].test_id.as_deref(), Some("t1"));
        assert_eq!(entries[1].response_code, 200);
        assert!(entries[0].timestamp >= entries[1].timestamp);
    }

    #[tokio::test]
    async fn recent_is_capped() {
        let log = memory_log().await;

        for i in 0..105 {
            log.record(&format!("{:02}/01/2025", i % 28 + 1), None, 200)
                .await
                .unwrap();
        }

        let entries = log.recent(1000).await.unwrap();
        assert_eq!(entries.len(), 100);
        assert!(entries.windows(2).all(|w| w[0].id > w[1].id));

        assert_eq!(log.recent(3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn reset_is_idempotent() {
        let log = memory_log().await;
        log.record("22/07/2025", None, 500).await.unwrap();

        assert_eq!(log.reset().await.unwrap(), 1);
        assert_eq!(log.reset().await.unwrap(), 0);
        assert!(log.recent(MAX_RECENT).await.unwrap().is_empty());
    }
}
