use std::sync::Arc;

use crate::dataset::Dataset;

/// Shared server state.
///
/// The dataset is immutable once loaded, so handlers share one `Arc`
/// and never lock.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }
}
