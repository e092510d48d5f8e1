use std::sync::Arc;

use tinylink_shortener::LinkService;

/// Default number of candidate aliases tried per save request.
pub const DEFAULT_MAX_RETRIES: usize = 5;

#[derive(Debug, Clone)]
pub struct AppState {
    service: Arc<LinkService>,
    max_retries: usize,
}

impl AppState {
    pub fn new(service: Arc<LinkService>, max_retries: usize) -> Self {
        Self {
            service,
            max_retries,
        }
    }

    pub fn service(&self) -> &LinkService {
        &self.service
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }
}
