// src/check/callback.rs
// Adapter for checks written in completion-callback style.
use super::provider::{GoodToGoCheck, HealthCheck};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

/// Handed to a callback-style check; call [`Responder::respond`] exactly once.
#[derive(Debug)]
pub struct Responder<T> {
    tx: oneshot::Sender<Result<T>>,
}

impl<T> Responder<T> {
    pub fn respond(self, result: Result<T>) {
        // The receiver is gone once the request has given up on us.
        let _ = self.tx.send(result);
    }

    pub fn ok(self, value: T) {
        self.respond(Ok(value));
    }

    pub fn fail(self, message: impl Into<String>) {
        self.respond(Err(anyhow!(message.into())));
    }
}

/// Wraps a callback that is given a [`Responder`] instead of returning a future.
///
/// `Fn(Responder<bool>)` callbacks act as a [`GoodToGoCheck`] and
/// `Fn(Responder<Vec<Value>>)` callbacks act as a [`HealthCheck`].
#[derive(Clone)]
pub struct CallbackCheck<F> {
    callback: F,
}

impl<F> CallbackCheck<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }

    async fn invoke<T>(&self) -> Result<T>
    where
        F: Fn(Responder<T>),
    {
        let (tx, rx) = oneshot::channel();
        (self.callback)(Responder { tx });
        rx.await
            .map_err(|_| anyhow!("callback dropped without responding"))?
    }
}

#[async_trait]
impl<F> GoodToGoCheck for CallbackCheck<F>
where
    F: Fn(Responder<bool>) + Send + Sync,
{
    async fn check(&self) -> Result<bool> {
        self.invoke().await
    }
}

#[async_trait]
impl<F> HealthCheck for CallbackCheck<F>
where
    F: Fn(Responder<Vec<Value>>) + Send + Sync,
{
    async fn checks(&self) -> Result<Vec<Value>> {
        self.invoke().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_callback_gtg() {
        let check = CallbackCheck::new(|responder: Responder<bool>| {
            std::thread::spawn(move || responder.ok(true));
        });
        assert!(check.check().await.unwrap());
    }

    #[tokio::test]
    async fn test_callback_failure() {
        let check = CallbackCheck::new(|responder: Responder<bool>| responder.fail("db down"));
        assert_eq!(check.check().await.unwrap_err().to_string(), "db down");
    }

    #[tokio::test]
    async fn test_dropped_responder() {
        let check = CallbackCheck::new(|_responder: Responder<bool>| {});
        let err = check.check().await.unwrap_err();
        assert_eq!(err.to_string(), "callback dropped without responding");
    }

    #[tokio::test]
    async fn test_callback_health() {
        let check = CallbackCheck::new(|responder: Responder<Vec<Value>>| {
            responder.ok(vec![json!({"ok": true})])
        });
        assert_eq!(check.checks().await.unwrap(), vec![json!({"ok": true})]);
    }
}
