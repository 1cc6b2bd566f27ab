use std::sync::Arc;

use crate::application::faqs::FaqService;
use crate::infra::connection::ConnectionMonitor;

#[derive(Clone)]
pub struct ApiState {
    pub faqs: Arc<FaqService>,
    pub health: HealthState,
}

/// Connection monitors reported by `GET /health`.
#[derive(Clone)]
pub struct HealthState {
    pub database: ConnectionMonitor,
    /// `None` when caching is disabled.
    pub cache: Option<ConnectionMonitor>,
}
