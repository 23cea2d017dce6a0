use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::error::AppError;
use crate::store::{GameStore, StoreError};

/// Shared application state available to all request handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GameStore>,
    pub config: Config,
    pub started_at: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn GameStore>, config: Config) -> Self {
        Self {
            store,
            config,
            started_at: Instant::now(),
        }
    }

    /// Build an error mapper for store calls, e.g. `.map_err(state.reject("Failed to ..."))`.
    pub fn reject<'a>(&'a self, context: &'a str) -> impl Fn(StoreError) -> AppError + 'a {
        move |err| {
            AppError::from_store(err, context, self.config.environment.exposes_error_details())
        }
    }
}
