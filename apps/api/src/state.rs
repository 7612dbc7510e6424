use std::sync::Arc;

use crate::notify::NotificationSender;
use crate::oracle::OracleClient;
use crate::tracker::store::TaskStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres-backed in production, in-process when no `DATABASE_URL` is set.
    pub store: Arc<dyn TaskStore>,
    pub oracle: OracleClient,
    pub notifier: Arc<dyn NotificationSender>,
}
