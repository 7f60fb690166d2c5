//! Keystore change notification plumbing.

use tokio::sync::{broadcast, oneshot};

use crate::wallet::provider::KeystoreEvent;

/// Broadcast source of keystore change notifications.
///
/// Providers embed one and hand out receivers from
/// [`WalletProvider::subscribe_keystore_changes`](crate::wallet::WalletProvider::subscribe_keystore_changes).
#[derive(Debug)]
pub struct KeystoreNotifier {
    tx: broadcast::Sender<KeystoreEvent>,
}

impl KeystoreNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(8);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<KeystoreEvent> {
        self.tx.subscribe()
    }

    /// Announce a keystore change. Returns how many listeners saw it.
    pub fn notify(&self) -> usize {
        self.tx.send(KeystoreEvent).unwrap_or(0)
    }

    /// Number of live listeners.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for KeystoreNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// A running subscription to keystore changes.
///
/// Runs `on_change` once on the first notification. Dropping the watch
/// cancels it.
#[derive(Debug)]
pub struct KeystoreWatch {
    _cancel: oneshot::Sender<()>,
}

impl KeystoreWatch {
    pub fn spawn<F>(mut events: broadcast::Receiver<KeystoreEvent>, on_change: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            tokio::select! {
                changed = wait_for_change(&mut events) => {
                    if changed {
                        on_change();
                    }
                }
                _ = cancel_rx => {
                    tracing::debug!("Keystore watch cancelled");
                }
            }
        });

        Self { _cancel: cancel_tx }
    }
}

/// Resolves `true` on a change, `false` if the provider went away.
async fn wait_for_change(events: &mut broadcast::Receiver<KeystoreEvent>) -> bool {
    match events.recv().await {
        Ok(KeystoreEvent) => true,
        // Missed notifications still mean the keystore changed.
        Err(broadcast::error::RecvError::Lagged(_)) => true,
        Err(broadcast::error::RecvError::Closed) => false,
    }
}
