use crate::services::blob_service::BlobService;
use minijinja::Environment;
use std::sync::Arc;

/// Shared per-request state: the storage service plus the explicitly
/// constructed template environment.
#[derive(Clone)]
pub struct AppState {
    pub store: BlobService,
    pub templates: Arc<Environment<'static>>,
}

impl AppState {
    pub fn new(store: BlobService, templates: Environment<'static>) -> Self {
        Self {
            store,
            templates: Arc::new(templates),
        }
    }
}
