//! Acting identity for mutating requests
//!
//! There is no authentication provider yet. In the development profile every
//! request acts as the configured fallback user; in production the extractor
//! refuses, so the placeholder can never own data there.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::domain::User;
use crate::AppState;
use super::error::ApiError;

/// The user performing the current request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        state
            .fallback_user
            .clone()
            .map(CurrentUser)
            .ok_or(ApiError::Unauthorized)
    }
}
