//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use book_reviews_core::ports::{
    CatalogService, CredentialStore, ReviewStore, SessionBinder, TokenService,
};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers. Every store is an owned, lock-guarded value behind its port
/// trait; there are no ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn CredentialStore>,
    pub tokens: Arc<dyn TokenService>,
    pub sessions: Arc<dyn SessionBinder>,
    pub reviews: Arc<dyn ReviewStore>,
    pub catalog: Arc<dyn CatalogService>,
    pub config: Arc<Config>,
}
