//! Wrapper for writes whose failure must not affect an import.
//!
//! Call sites read `best_effort("usage increment", ...)` so it is obvious
//! which failures are allowed to be silent.

use std::fmt::Display;
use std::future::Future;

/// Await `fut`; on error, log a warning tagged with `operation` and return
/// `None`.
pub async fn best_effort<T, E, F>(operation: &'static str, fut: F) -> Option<T>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    match fut.await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(operation, error = %e, "Best-effort write failed, continuing");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ok_passes_through() {
        let out = best_effort("noop", async { Ok::<_, String>(5) }).await;
        assert_eq!(out, Some(5));
    }

    #[tokio::test]
    async fn error_is_swallowed() {
        let out = best_effort("noop", async { Err::<i32, _>("boom".to_string()) }).await;
        assert_eq!(out, None);
    }
}
