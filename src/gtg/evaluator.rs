// src/gtg/evaluator.rs
use crate::check::GoodToGoCheck;
use hyper::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

pub const DEFAULT_GTG_TIMEOUT: Duration = Duration::from_millis(3000);

/// Result of a single good-to-go evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GtgOutcome {
    Ok,
    NotOk,
    TimedOut,
    Errored(String),
}

impl GtgOutcome {
    pub fn status(&self) -> StatusCode {
        match self {
            GtgOutcome::Ok => StatusCode::OK,
            GtgOutcome::NotOk | GtgOutcome::TimedOut | GtgOutcome::Errored(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }

    /// Plain-text response body.
    pub fn message(&self) -> &str {
        match self {
            GtgOutcome::Ok => "OK",
            GtgOutcome::NotOk => "Not OK, see /__health endpoint",
            GtgOutcome::TimedOut => "gtg status generation timed out",
            GtgOutcome::Errored(message) => message,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GtgOutcome::Ok => "ok",
            GtgOutcome::NotOk => "not_ok",
            GtgOutcome::TimedOut => "timed_out",
            GtgOutcome::Errored(_) => "errored",
        }
    }
}

/// Aborts the check task when dropped, whoever drops it.
struct CheckTask(JoinHandle<anyhow::Result<bool>>);

impl Drop for CheckTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Run `check` once, racing it against `timeout`.
///
/// The check runs on its own task, owned by this future. Losing to the
/// timer or being dropped mid-race aborts the task, so a late answer can
/// have no further effect; if the check wins, the timer is dropped with
/// the `select!`.
pub async fn evaluate_gtg(check: Arc<dyn GoodToGoCheck>, timeout: Duration) -> GtgOutcome {
    let mut task = CheckTask(tokio::spawn(async move { check.check().await }));

    let outcome = tokio::select! {
        biased;

        joined = &mut task.0 => match joined {
            Ok(Ok(true)) => GtgOutcome::Ok,
            Ok(Ok(false)) => GtgOutcome::NotOk,
            Ok(Err(e)) => GtgOutcome::Errored(e.to_string()),
            Err(e) if e.is_panic() => {
                GtgOutcome::Errored("good-to-go check panicked".to_string())
            }
            Err(_) => GtgOutcome::Errored("good-to-go check was cancelled".to_string()),
        },
        _ = sleep(timeout) => GtgOutcome::TimedOut,
    };

    match &outcome {
        GtgOutcome::Ok => debug!("Good to go"),
        GtgOutcome::TimedOut => warn!("Good-to-go check timed out after {:?}", timeout),
        other => warn!("Not good to go: {}", other.message()),
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{gtg_fn, AlwaysGood};
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_true_is_ok() {
        let outcome = evaluate_gtg(Arc::new(AlwaysGood), DEFAULT_GTG_TIMEOUT).await;
        assert_eq!(outcome, GtgOutcome::Ok);
        assert_eq!(outcome.status(), StatusCode::OK);
        assert_eq!(outcome.message(), "OK");
    }

    #[tokio::test(start_paused = true)]
    async fn test_false_is_not_ok() {
        let check = Arc::new(gtg_fn(|| async { Ok(false) }));
        let outcome = evaluate_gtg(check, DEFAULT_GTG_TIMEOUT).await;
        assert_eq!(outcome, GtgOutcome::NotOk);
        assert_eq!(outcome.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(outcome.message().contains("Not OK"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_message_is_kept() {
        let check = Arc::new(gtg_fn(|| async { Err(anyhow!("database unreachable")) }));
        let outcome = evaluate_gtg(check, DEFAULT_GTG_TIMEOUT).await;
        assert_eq!(outcome, GtgOutcome::Errored("database unreachable".to_string()));
        assert_eq!(outcome.message(), "database unreachable");
    }

    #[tokio::test(start_paused = true)]
    async fn test_panic_is_errored() {
        let check = Arc::new(gtg_fn(|| async {
            if true {
                panic!("boom");
            }
            Ok(true)
        }));
        let outcome = evaluate_gtg(check, DEFAULT_GTG_TIMEOUT).await;
        assert_eq!(outcome, GtgOutcome::Errored("good-to-go check panicked".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_settling_check_times_out() {
        let check = Arc::new(gtg_fn(|| std::future::pending::<anyhow::Result<bool>>()));
        let start = Instant::now();

        let outcome = evaluate_gtg(check, DEFAULT_GTG_TIMEOUT).await;

        assert_eq!(outcome, GtgOutcome::TimedOut);
        assert_eq!(outcome.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(outcome.message().contains("timed out"));
        let elapsed = start.elapsed();
        assert!(elapsed >= DEFAULT_GTG_TIMEOUT);
        assert!(elapsed < DEFAULT_GTG_TIMEOUT + Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_answer_has_no_effect() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let check = Arc::new(gtg_fn(move || {
            let flag = flag.clone();
            async move {
                sleep(Duration::from_secs(5)).await;
                flag.store(true, Ordering::SeqCst);
                Ok(true)
            }
        }));

        let outcome = evaluate_gtg(check, DEFAULT_GTG_TIMEOUT).await;
        assert_eq!(outcome, GtgOutcome::TimedOut);

        sleep(Duration::from_secs(10)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_evaluation_cancels_check() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let check = Arc::new(gtg_fn(move || {
            let flag = flag.clone();
            async move {
                sleep(Duration::from_secs(5)).await;
                flag.store(true, Ordering::SeqCst);
                Ok(true)
            }
        }));

        // The caller gives up before either side of the race settles.
        let dropped =
            tokio::time::timeout(Duration::from_secs(1), evaluate_gtg(check, DEFAULT_GTG_TIMEOUT))
                .await;
        assert!(dropped.is_err());

        sleep(Duration::from_secs(10)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_invoked_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let check = Arc::new(gtg_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(false) }
        }));

        evaluate_gtg(check, DEFAULT_GTG_TIMEOUT).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_check_wins_short_race() {
        let check = Arc::new(gtg_fn(|| async {
            sleep(Duration::from_millis(10)).await;
            Ok(true)
        }));
        let outcome = evaluate_gtg(check, Duration::from_millis(100)).await;
        assert_eq!(outcome, GtgOutcome::Ok);
    }
}
