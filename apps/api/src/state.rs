use std::sync::Arc;

use crate::config::Config;
use crate::enhance::Enhancer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `LlmEnhancer` when an API key is configured, `DisabledEnhancer` otherwise.
    pub enhancer: Arc<dyn Enhancer>,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(enhancer: Arc<dyn Enhancer>) -> Self {
        Self {
            config: Config {
                pdf_compress: false,
                ..Config::default()
            },
            enhancer,
        }
    }
}
