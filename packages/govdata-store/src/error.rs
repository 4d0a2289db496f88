use std::future::Future;

use sqlx::error::ErrorKind;

/// True when `err` is a unique-constraint violation worth one retry
/// rather than surfacing immediately.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.kind() == ErrorKind::UniqueViolation)
}

/// Runs `op` once; if it fails on a unique-violation race, runs it one
/// more time and returns whatever that second attempt yields. Any other
/// error is surfaced immediately without a retry.
pub async fn retry_once_on_unique_violation<T, F, Fut>(mut op: F) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    match op().await {
        Err(err) if is_unique_violation(&err) => {
            tracing::warn!("unique-violation race on upsert, retrying once");
            op().await
        }
        other => other,
    }
}
