//! Application state for dependency injection.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::infra::Ping;
use crate::observability::HttpMetrics;
use crate::service::UserService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Direct or cached; handlers cannot tell which
    pub users: Arc<dyn UserService>,
    pub http_metrics: HttpMetrics,
    /// Present only when a recorder was installed
    pub prometheus: Option<PrometheusHandle>,
    /// Dependencies checked by `/health`
    pub probes: Vec<(&'static str, Arc<dyn Ping>)>,
}

impl AppState {
    /// Create new app state.
    pub fn new(users: Arc<dyn UserService>) -> Self {
        Self {
            users,
            http_metrics: HttpMetrics::new(),
            prometheus: None,
            probes: Vec::new(),
        }
    }

    /// Attach the metrics handles and the exporter used by `/metrics`.
    pub fn with_metrics(mut self, http_metrics: HttpMetrics, prometheus: PrometheusHandle) -> Self {
        self.http_metrics = http_metrics;
        self.prometheus = Some(prometheus);
        self
    }

    /// Register a dependency for the health check.
    pub fn with_probe(mut self, name: &'static str, probe: Arc<dyn Ping>) -> Self {
        self.probes.push((name, probe));
        self
    }
}
