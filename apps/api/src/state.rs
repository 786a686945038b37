use std::sync::Arc;

use crate::config::Config;
use crate::drafting::{DraftWriter, TemplateDraftWriter};
use crate::feedback::feedback_schema;
use crate::store::TableHandle;
use crate::tracker::tracker_schema;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tracker: TableHandle,
    pub feedback: TableHandle,
    /// Pluggable draft writer. Default: TemplateDraftWriter.
    pub drafts: Arc<dyn DraftWriter>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let drafts = Arc::new(TemplateDraftWriter::new(config.sender_name.clone()));
        Self {
            tracker: TableHandle::new(config.store.tracker_path.clone(), tracker_schema()),
            feedback: TableHandle::new(config.store.feedback_path.clone(), feedback_schema()),
            drafts,
            config,
        }
    }
}
