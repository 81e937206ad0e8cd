//! User domain state

use crate::service::UsersService;

/// Application state for the user domain. Every route here is public, so no
/// auth backend is exposed for extractors.
#[derive(Clone)]
pub struct UsersState {
    pub service: UsersService,
}
