use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative abort flag for a running scan.
///
/// Clones share the same flag, so one clone can be handed to a signal
/// handler while the scan polls another.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Relaxed is enough here: a scan may see the flag one entry late.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
