use crate::error::Result;
use std::future::Future;

/// Marker attached to responses that were computed in-process because the
/// delegated procedure was unavailable. Observability only; callers never
/// see the upstream error itself.
pub const FALLBACK_NOTE: &str = "fallback_no_rpc";

pub struct Served<T> {
    pub value: T,
    pub via_fallback: bool,
}

impl<T> Served<T> {
    pub fn note(&self) -> Option<&'static str> {
        self.via_fallback.then_some(FALLBACK_NOTE)
    }
}

/// Primary-then-fallback strategy shared by search, stats and timeseries:
/// attempt the delegated computation, and on any failure recover with the
/// deterministic in-process path instead of surfacing the error.
pub async fn with_fallback<T, P, F>(what: &str, primary: P, fallback: F) -> Result<Served<T>>
where
    P: Future<Output = Result<T>>,
    F: Future<Output = Result<T>>,
{
    match primary.await {
        Ok(value) => Ok(Served {
            value,
            via_fallback: false,
        }),
        Err(err) => {
            tracing::warn!(target = what, error = ?err, "delegated procedure unavailable, serving fallback");
            let value = fallback.await?;
            Ok(Served {
                value,
                via_fallback: true,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn primary_result_is_preferred() {
        let served = with_fallback("test", async { Ok(1) }, async { Ok(2) })
            .await
            .unwrap();
        assert_eq!(served.value, 1);
        assert!(!served.via_fallback);
        assert_eq!(served.note(), None);
    }

    #[tokio::test]
    async fn fallback_runs_on_primary_failure() {
        let served = with_fallback(
            "test",
            async { Err(Error::Internal("rpc missing".into())) },
            async { Ok(2) },
        )
        .await
        .unwrap();
        assert_eq!(served.value, 2);
        assert!(served.via_fallback);
        assert_eq!(served.note(), Some(FALLBACK_NOTE));
    }
}
