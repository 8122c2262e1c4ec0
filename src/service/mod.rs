//! Query surface over the shared collaborators
//!
//! `GraphService` answers structural questions, `SearchService` answers
//! relevance questions. Both time every call.

pub mod graph;
pub mod search;

pub use graph::GraphService;
pub use search::SearchService;

use std::future::Future;
use std::time::Instant;

use serde::Serialize;

use crate::types::AppError;
use crate::Result;

/// A payload with the wall-clock time it took to produce
#[derive(Debug, Clone, Serialize)]
pub struct Timed<T> {
    pub result: T,
    pub elapsed_ms: u64,
}

impl<T> Timed<T> {
    pub async fn measure<F>(fut: F) -> Result<Self>
    where
        F: Future<Output = Result<T>>,
    {
        let start = Instant::now();
        let result = fut.await?;
        Ok(Self {
            result,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Attribute a collaborator failure to `backend` unless it already names one.
pub(crate) fn upstream_error(backend: &'static str) -> impl Fn(AppError) -> AppError {
    move |e| match e {
        AppError::Upstream { .. } => e,
        other => AppError::upstream(backend, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_measure_passes_errors_through() {
        let ok = Timed::measure(async { Ok(7) }).await.unwrap();
        assert_eq!(ok.result, 7);

        let err = Timed::<()>::measure(async { Err(AppError::NotFound("x".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_upstream_error_keeps_existing_backend() {
        let wrap = upstream_error("vector");
        let already = wrap(AppError::upstream("embedding", "down"));
        assert!(matches!(already, AppError::Upstream { backend: "embedding", .. }));
        let fresh = wrap(AppError::Internal("boom".into()));
        assert!(matches!(fresh, AppError::Upstream { backend: "vector", .. }));
    }
}
