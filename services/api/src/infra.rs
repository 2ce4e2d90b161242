use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use vacancy_stats::statistics::CurrencyTable;

/// Shared handles injected into every route through an `Extension` layer.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) currencies: Arc<CurrencyTable>,
}
