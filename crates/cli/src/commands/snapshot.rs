//! Database snapshot command.
//!
//! Dumps the most recently created error items, each with its tags, to a
//! local JSON file for inspection.
//!
//! # Usage
//!
//! ```bash
//! mb-cli snapshot                     # writes ./db-snapshot.json
//! mb-cli snapshot -o /tmp/items.json
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! A failed read is logged and leaves any existing output file untouched; the
//! command still exits successfully. The pool is closed on every path.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use mistake_book_web::db::{ErrorItemRepository, RepositoryError};
use mistake_book_web::models::ErrorItemWithTags;

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "db-snapshot.json";

/// Number of items in a snapshot.
pub const SNAPSHOT_LIMIT: usize = 5;

/// How long to wait for a database connection before giving up.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// Errors that can occur while taking a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(sqlx::Error),

    #[error("Failed to read error items: {0}")]
    Read(#[from] RepositoryError),

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where snapshot items come from.
pub trait SnapshotSource {
    /// Fetch up to `limit` of the newest error items with their tags.
    fn recent_error_items(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ErrorItemWithTags>, RepositoryError>> + Send;
}

impl SnapshotSource for ErrorItemRepository<'_> {
    fn recent_error_items(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ErrorItemWithTags>, RepositoryError>> + Send {
        self.recent_with_tags(i64::try_from(limit).unwrap_or(i64::MAX))
    }
}

/// Read the newest items and write them to `output`.
///
/// The file is written to a sibling temporary path and renamed into place,
/// so a failure never leaves a partial snapshot behind.
///
/// # Errors
///
/// Returns an error if the read, serialization or write fails.
pub async fn write_snapshot<S>(source: &S, output: &Path) -> Result<usize, SnapshotError>
where
    S: SnapshotSource + Sync,
{
    let mut items = source.recent_error_items(SNAPSHOT_LIMIT).await?;
    items.sort_by(|a, b| {
        b.item
            .created_at
            .cmp(&a.item.created_at)
            .then_with(|| b.item.id.cmp(&a.item.id))
    });
    items.truncate(SNAPSHOT_LIMIT);

    let json = serde_json::to_string_pretty(&items)?;

    let tmp = output.with_extension("json.tmp");
    let write = async {
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, output).await
    };
    if let Err(source) = write.await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(SnapshotError::Write {
            path: output.to_path_buf(),
            source,
        });
    }

    Ok(items.len())
}

/// Take a snapshot, logging the outcome instead of propagating it.
///
/// Returns the number of items written, or `None` if nothing was written.
pub async fn export<S>(source: &S, output: &Path) -> Option<usize>
where
    S: SnapshotSource + Sync,
{
    match write_snapshot(source, output).await {
        Ok(count) => {
            tracing::info!(count, path = %output.display(), "Snapshot written");
            Some(count)
        }
        Err(e) => {
            tracing::error!(error = %e, "Snapshot failed");
            None
        }
    }
}

/// Run the snapshot command against `DATABASE_URL`.
///
/// # Errors
///
/// Returns an error only if the database URL is missing or malformed. Read
/// and write failures are logged, not returned.
pub async fn run(output: &Path) -> Result<(), SnapshotError> {
    let database_url =
        super::database_url().ok_or(SnapshotError::MissingEnvVar("DATABASE_URL"))?;
    snapshot_database(&database_url, output).await
}

/// Snapshot the database at `database_url` into `output`.
///
/// # Errors
///
/// Returns an error only if `database_url` is malformed.
pub async fn snapshot_database(
    database_url: &SecretString,
    output: &Path,
) -> Result<(), SnapshotError> {
    // Lazy: connection errors surface from the query and are logged with it.
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy(database_url.expose_secret())
        .map_err(SnapshotError::InvalidDatabaseUrl)?;

    export(&ErrorItemRepository::new(&pool), output).await;

    pool.close().await;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use mistake_book_core::{ErrorItemId, TagId, UserId};
    use mistake_book_web::models::{ErrorItem, Tag};

    use super::*;

    /// In-memory store that returns everything it holds, unordered.
    struct MemorySource(Vec<ErrorItemWithTags>);

    impl SnapshotSource for MemorySource {
        async fn recent_error_items(
            &self,
            _limit: usize,
        ) -> Result<Vec<ErrorItemWithTags>, RepositoryError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl SnapshotSource for FailingSource {
        async fn recent_error_items(
            &self,
            _limit: usize,
        ) -> Result<Vec<ErrorItemWithTags>, RepositoryError> {
            Err(RepositoryError::DataCorruption("connection reset".to_string()))
        }
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
    }

    fn item(n: i64) -> ErrorItemWithTags {
        let at = base_time() + Duration::minutes(n);
        ErrorItemWithTags {
            item: ErrorItem {
                id: ErrorItemId::new(format!("item-{n}")),
                user_id: UserId::new("u1"),
                subject: Some("physics".to_string()),
                question_text: format!("question {n}"),
                answer_text: None,
                analysis: None,
                mastery_level: 0,
                created_at: at,
                updated_at: at,
            },
            tags: vec![Tag {
                id: TagId::new(format!("tag-{n}")),
                name: format!("topic {n}"),
                created_at: base_time(),
            }],
        }
    }

    fn temp_output() -> PathBuf {
        std::env::temp_dir().join(format!("mb-snapshot-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_snapshot_keeps_five_newest_descending() {
        let source = MemorySource(vec![item(3), item(7), item(1), item(5), item(2), item(6), item(4)]);
        let output = temp_output();

        let count = write_snapshot(&source, &output).await.unwrap();
        assert_eq!(count, 5);

        let text = std::fs::read_to_string(&output).unwrap();
        std::fs::remove_file(&output).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        let ids: Vec<&str> = parsed
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["item-7", "item-6", "item-5", "item-4", "item-3"]);
        for entry in parsed.as_array().unwrap() {
            assert_eq!(entry["tags"].as_array().unwrap().len(), 1);
        }

        // Pretty-printed with two-space indentation
        assert!(text.starts_with("[\n  {\n    \"id\""));
    }

    #[tokio::test]
    async fn test_snapshot_with_fewer_items() {
        let source = MemorySource(vec![item(1), item(2)]);
        let output = temp_output();

        assert_eq!(export(&source, &output).await, Some(2));
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        std::fs::remove_file(&output).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_snapshot_overwrites_existing_file() {
        let output = temp_output();
        std::fs::write(&output, "stale").unwrap();

        export(&MemorySource(vec![item(1)]), &output).await;

        let text = std::fs::read_to_string(&output).unwrap();
        std::fs::remove_file(&output).unwrap();
        assert!(text.contains("item-1"));
        assert!(!text.contains("stale"));
    }

    #[tokio::test]
    async fn test_failed_read_writes_nothing() {
        let output = temp_output();

        assert_eq!(export(&FailingSource, &output).await, None);
        assert!(!output.exists());
        assert!(!output.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_read_leaves_existing_file() {
        let output = temp_output();
        std::fs::write(&output, "previous").unwrap();

        let err = write_snapshot(&FailingSource, &output).await.unwrap_err();
        assert!(matches!(err, SnapshotError::Read(_)));

        let text = std::fs::read_to_string(&output).unwrap();
        std::fs::remove_file(&output).unwrap();
        assert_eq!(text, "previous");
    }

    #[tokio::test]
    async fn test_unreachable_database_writes_nothing_and_succeeds() {
        let output = temp_output();
        let url = SecretString::from("postgres://mb:mb@127.0.0.1:1/mistake_book");

        let started = std::time::Instant::now();
        snapshot_database(&url, &output).await.unwrap();

        assert!(!output.exists());
        assert!(!output.with_extension("json.tmp").exists());
        assert!(started.elapsed() < ACQUIRE_TIMEOUT + std::time::Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_malformed_database_url_is_returned() {
        let url = SecretString::from("not a url");
        let err = snapshot_database(&url, &temp_output()).await.unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidDatabaseUrl(_)));
    }

    #[tokio::test]
    async fn test_unwritable_path_is_reported() {
        let output = std::env::temp_dir()
            .join(format!("mb-missing-{}", uuid::Uuid::new_v4()))
            .join("snapshot.json");

        let err = write_snapshot(&MemorySource(vec![item(1)]), &output)
            .await
            .unwrap_err();
        assert!(matches!(err, SnapshotError::Write { .. }));
    }
}
