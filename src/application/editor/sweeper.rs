//! Background task that drops abandoned editor sessions.

use std::sync::Arc;

use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::shared::shutdown::ShutdownSignal;

use super::EditorRegistry;

/// One day
const MAX_SWEEP_INTERVAL_SECS: u64 = 86_400;

/// Start the session sweeper.
///
/// Every `sweep_interval_secs` it purges sessions untouched for longer than
/// `session_ttl_secs`, until `shutdown` fires.
pub fn start_session_sweeper(
    registry: Arc<EditorRegistry>,
    shutdown: ShutdownSignal,
    session_ttl_secs: u64,
    sweep_interval_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            ttl = session_ttl_secs,
            interval = sweep_interval_secs,
            "Editor session sweeper started"
        );

        let ttl = i64::try_from(session_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds);
        if ttl.is_none() {
            warn!(ttl = session_ttl_secs, "Session TTL out of range, sessions never expire");
        }
        let period = sweep_interval_secs.clamp(1, MAX_SWEEP_INTERVAL_SECS);
        let mut interval = tokio::time::interval(Duration::from_secs(period));

        loop {
            let notified = shutdown.notified();
            tokio::select! {
                _ = interval.tick() => {
                    let Some(ttl) = ttl else { continue };
                    let purged = registry.purge_expired(ttl);
                    if purged > 0 {
                        info!(purged, remaining = registry.count(), "Expired editor sessions purged");
                    } else {
                        debug!(open = registry.count(), "No idle editor sessions");
                    }
                }
                _ = notified.wait() => {
                    info!("Editor session sweeper shutting down");
                    break;
                }
            }
        }
    })
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::catalog::MetricSnapshot;
    use crate::domain::component::PlanDuration;

    #[tokio::test]
    async fn sweeper_purges_and_stops_on_shutdown() {
        let registry = Arc::new(EditorRegistry::default());
        registry.open(
            Arc::new(MetricSnapshot::default()),
            None,
            PlanDuration::Monthly,
        );

        tokio::time::sleep(Duration::from_millis(5)).await;

        let shutdown = ShutdownSignal::new();
        let handle = start_session_sweeper(registry.clone(), shutdown.clone(), 0, 1);

        // The first tick fires immediately; a zero TTL makes every session idle.
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(registry.count(), 0);
    }

    #[tokio::test]
    async fn unbounded_ttl_and_interval_keep_the_sweeper_alive() {
        let registry = Arc::new(EditorRegistry::default());
        registry.open(
            Arc::new(MetricSnapshot::default()),
            None,
            PlanDuration::Monthly,
        );

        let shutdown = ShutdownSignal::new();
        let handle = start_session_sweeper(registry.clone(), shutdown.clone(), u64::MAX, u64::MAX);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());
        assert_eq!(registry.count(), 1);

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(registry.count(), 1);
    }
}
