use crate::metrics::Metrics;
use crate::store::PointWriter;
use std::sync::Arc;

/// Shared handler state. The store handle is created once at startup and
/// injected here rather than reached through a global.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PointWriter>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(store: Arc<dyn PointWriter>, metrics: Metrics) -> Self {
        Self { store, metrics }
    }
}
