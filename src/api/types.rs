//! Shared types for the HTTP layer.

use std::sync::Arc;

use crate::api::error::ApiError;
use crate::core_state::CoreState;

/// Shared context for all routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Parse a numeric `:id` path segment.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid id: {raw}")))
}
