// Processor Stop Signal

use tokio::sync::watch;

/// Stop signal observed by every worker of one processor
#[derive(Clone)]
pub(crate) struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    /// Wait for the stop signal
    ///
    /// Resolves immediately if stop was already requested, and also when the
    /// sender is gone.
    pub(crate) async fn wait(&mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}

/// Stop signal sender
pub(crate) struct ShutdownSender {
    tx: watch::Sender<bool>,
}

impl ShutdownSender {
    /// Signal stop to all workers (repeat calls are no-ops)
    pub(crate) fn shutdown(&self) {
        self.tx.send_replace(true);
    }
}

/// Create a stop channel
pub(crate) fn shutdown_channel() -> (ShutdownSender, ShutdownToken) {
    let (tx, rx) = watch::channel(false);
    (ShutdownSender { tx }, ShutdownToken { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_after_signal_returns_immediately() {
        let (tx, mut token) = shutdown_channel();
        assert!(!*token.rx.borrow());

        tx.shutdown();
        assert!(*token.rx.borrow());

        tokio::time::timeout(Duration::from_millis(100), token.wait())
            .await
            .expect("wait should resolve for an earlier signal");
    }

    #[tokio::test]
    async fn test_signal_reaches_every_clone() {
        let (tx, token) = shutdown_channel();
        let mut handles = Vec::new();
        for _ in 0..3 {
            let mut token = token.clone();
            handles.push(tokio::spawn(async move { token.wait().await }));
        }

        tx.shutdown();
        tx.shutdown();

        for handle in handles {
            tokio::time::timeout(Duration::from_secs(1), handle)
                .await
                .unwrap()
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_dropped_sender_releases_waiters() {
        let (tx, mut token) = shutdown_channel();
        drop(tx);
        tokio::time::timeout(Duration::from_millis(100), token.wait())
            .await
            .expect("wait should resolve once the sender is gone");
    }
}
