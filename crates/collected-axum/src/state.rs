//! Application state for Axum handlers.

use std::sync::Arc;

use crate::bootstrap::AxumContext;

/// Shared application state passed to all handlers.
pub type AppState = Arc<AxumContext>;
