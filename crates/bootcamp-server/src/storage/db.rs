//! Relational note storage
//!
//! Works against PostgreSQL or SQLite through sqlx's `Any` driver; the
//! connection string picks the backend.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;

/// Backend selected by the connection string scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(database_url: &str) -> Result<Self> {
        if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
            Ok(Backend::Postgres)
        } else if database_url.starts_with("sqlite:") {
            Ok(Backend::Sqlite)
        } else {
            bail!("Unsupported database URL scheme: {}", database_url)
        }
    }

    fn notes_table_ddl(self) -> &'static str {
        match self {
            Backend::Postgres => {
                r#"
                CREATE TABLE IF NOT EXISTS notes (
                    id BIGSERIAL PRIMARY KEY,
                    text TEXT
                )
                "#
            }
            Backend::Sqlite => {
                r#"
                CREATE TABLE IF NOT EXISTS notes (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    text TEXT
                )
                "#
            }
        }
    }
}

/// A persisted note. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Note {
    pub id: i64,
    pub text: String,
}

pub struct Database {
    pool: AnyPool,
    backend: Backend,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let backend = Backend::from_url(database_url)?;
        install_default_drivers();

        tracing::info!("Connecting to {:?} database...", backend);

        let mut options = AnyPoolOptions::new().max_connections(5);
        if backend == Backend::Sqlite && database_url.contains(":memory:") {
            // Every connection to an in-memory SQLite database gets its own
            // empty database, so pin the pool to one connection that never
            // gets recycled.
            options = options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = options
            .connect(database_url)
            .await
            .context("Failed to open database connection pool")?;

        tracing::info!("Database connection established");

        Ok(Self { pool, backend })
    }

    /// Create the notes table if it does not exist yet. Safe to run on every
    /// startup.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(self.backend.notes_table_ddl())
            .execute(&self.pool)
            .await
            .context("Failed to create notes table")?;

        tracing::info!("Notes schema ensured");
        Ok(())
    }

    pub async fn insert_note(&self, text: &str) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO notes (text) VALUES ($1) RETURNING id
            "#,
        )
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn get_note(&self, id: i64) -> Result<Option<Note>> {
        let note: Option<Note> = sqlx::query_as(
            r#"
            SELECT id, text FROM notes WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(note)
    }

    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection. Waits for checked-out connections to
    /// come back first.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.ensure_schema().await.unwrap();
        db
    }

    #[test]
    fn test_backend_from_url() {
        assert_eq!(
            Backend::from_url("postgresql://demo:password@db:5432/demo").unwrap(),
            Backend::Postgres
        );
        assert_eq!(
            Backend::from_url("postgres://localhost/demo").unwrap(),
            Backend::Postgres
        );
        assert_eq!(
            Backend::from_url("sqlite::memory:").unwrap(),
            Backend::Sqlite
        );
        assert!(Backend::from_url("mysql://localhost/demo").is_err());
    }

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let db = memory_db().await;

        let id = db.insert_note("hello").await.unwrap();
        let note = db.get_note(id).await.unwrap();
        assert_eq!(
            note,
            Some(Note {
                id,
                text: "hello".to_string()
            })
        );

        // Repeated reads return the same row
        assert_eq!(db.get_note(id).await.unwrap(), note);
    }

    #[tokio::test]
    async fn test_ids_strictly_increase() {
        let db = memory_db().await;

        let first = db.insert_note("first").await.unwrap();
        let second = db.insert_note("second").await.unwrap();
        let third = db.insert_note("first").await.unwrap();

        assert_eq!(first, 1);
        assert!(second > first);
        assert!(third > second);
    }

    #[tokio::test]
    async fn test_missing_note() {
        let db = memory_db().await;
        assert_eq!(db.get_note(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let db = memory_db().await;
        let id = db.insert_note("kept").await.unwrap();

        db.ensure_schema().await.unwrap();
        assert_eq!(db.get_note(id).await.unwrap().unwrap().text, "kept");
    }

    #[tokio::test]
    async fn test_text_is_stored_verbatim() {
        let db = memory_db().await;
        let text = "späce / 'quotes' ; DROP TABLE notes; --";

        let id = db.insert_note(text).await.unwrap();
        assert_eq!(db.get_note(id).await.unwrap().unwrap().text, text);
        assert!(db.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_close() {
        let db = memory_db().await;
        db.close().await;
        assert!(db.ping().await.is_err());
    }
}
