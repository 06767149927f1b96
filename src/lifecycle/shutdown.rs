//! Shutdown coordination.

use tokio::sync::broadcast;

/// Broadcast-based shutdown coordinator shared by the service and driver
/// loops.
///
/// Long-running tasks subscribe at startup; a single `trigger` stops all
/// of them. In-flight requests are abandoned, not drained.
#[derive(Debug)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal. Safe to call more than once.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
