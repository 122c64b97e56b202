//! Background subscriptions with retry-before-error delivery.
//!
//! Request work runs on the tokio runtime; the outcome is handed to an
//! [`Observer`] once the work settles. A failed attempt is resubscribed up to
//! the configured retry count before the error path fires — the worker/UI
//! pairing itself belongs to the host application's runtime, not to this
//! crate.

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::SdkError;

/// Receives the settled outcome of a subscription.
pub trait Observer<T>: Send + Sync {
    fn on_success(&self, value: T);
    fn on_error(&self, error: SdkError);
}

/// Run `factory` in the background, resubscribing on failure up to
/// `retry_count` times, then deliver the outcome to `observer`.
///
/// Exactly one observer callback fires per subscription.
pub fn spawn_with_retry<T, F, Fut, O>(retry_count: u32, factory: F, observer: O) -> JoinHandle<()>
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, SdkError>> + Send + 'static,
    O: Observer<T> + 'static,
{
    tokio::spawn(async move {
        let mut attempt = 0u32;
        loop {
            match factory().await {
                Ok(value) => {
                    observer.on_success(value);
                    return;
                }
                Err(err) => {
                    if attempt < retry_count {
                        attempt += 1;
                        debug!(attempt, max = retry_count, error = %err, "subscription failed, resubscribing");
                        continue;
                    }
                    observer.on_error(err);
                    return;
                }
            }
        }
    })
}
