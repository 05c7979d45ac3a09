use std::sync::Arc;

use campusfix_backend::Backend;
use campusfix_models::v0::Analytics;
use campusfix_result::Result;
use tokio::sync::watch;

/// Observable aggregate counts for the admin dashboard
#[derive(Clone)]
pub struct AnalyticsStore {
    backend: Backend,
    analytics: Arc<watch::Sender<Analytics>>,
}

impl AnalyticsStore {
    pub fn new(backend: Backend) -> AnalyticsStore {
        AnalyticsStore {
            backend,
            analytics: Arc::new(watch::channel(Analytics::default()).0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Analytics> {
        self.analytics.subscribe()
    }

    pub fn snapshot(&self) -> Analytics {
        self.analytics.borrow().clone()
    }

    /// Fetch fresh counts, keeping the previous ones on failure
    pub async fn refresh(&self) -> Result<()> {
        let analytics = self
            .backend
            .fetch_analytics()
            .await
            .inspect_err(|error| warn!("Failed to refresh analytics: {error}"))?;

        self.analytics.send_replace(analytics);
        Ok(())
    }
}
