//! Cancellation of in-flight requests.
//!
//! A [CancellationToken] is shared between the thread running a request and whoever
//! may want to abort it (a signal handler, a supervising thread, ...).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cancellation token for controlling a request
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    /// Create a new cancellation token
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the request. Every clone of the token observes it.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Check if cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [cancel](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        loop {
            // Registered before the flag check so a concurrent `cancel` cannot be missed.
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_cancellation_token_clone() {
        let token = CancellationToken::new();
        let token_clone = token.clone();

        assert!(!token.is_cancelled());
        assert!(!token_clone.is_cancelled());

        token.cancel();
        assert!(token.is_cancelled());
        assert!(token_clone.is_cancelled());
    }

    #[test]
    fn test_cancelled_future_wakes_on_cancel_from_other_thread() {
        let token = CancellationToken::new();
        let token_clone = token.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            token_clone.cancel();
        });

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let woke = runtime.block_on(async {
            tokio::time::timeout(Duration::from_secs(5), token.cancelled())
                .await
                .is_ok()
        });

        handle.join().unwrap();
        assert!(woke);
    }

    #[test]
    fn test_cancelled_future_resolves_immediately_when_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(token.cancelled());
    }
}
