//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the suggestion provider, which is absent when no API key is
//! configured; the suggestion route then answers with an error instead of
//! the server refusing to start.

use std::sync::Arc;

use crate::llm::types::SuggestionProvider;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone, Default)]
pub struct AppState {
    pub suggester: Option<Arc<dyn SuggestionProvider>>,
}

impl AppState {
    #[must_use]
    pub fn new(suggester: Option<Arc<dyn SuggestionProvider>>) -> Self {
        Self { suggester }
    }
}
