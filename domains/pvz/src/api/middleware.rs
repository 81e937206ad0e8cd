//! Pickup-point domain state and auth backend integration

use axum::extract::FromRef;
use pickup_auth::AuthBackend;

use crate::service::PvzService;

/// Application state for the pickup-point domain
#[derive(Clone)]
pub struct PvzState {
    pub service: PvzService,
    pub auth: AuthBackend,
}

impl FromRef<PvzState> for AuthBackend {
    fn from_ref(state: &PvzState) -> Self {
        state.auth.clone()
    }
}
