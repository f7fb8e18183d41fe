use std::sync::Arc;

use crate::services::occupancy::PropertyLocks;
use crate::store::{AuthProvider, DataStore, FileStore};

/// Shared handles for the hosted platform, constructed once at startup and
/// passed into every handler through axum state. Tests substitute the
/// in-memory implementations behind the same traits.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
    pub files: Arc<dyn FileStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub locks: PropertyLocks,
}

impl AppState {
    pub fn new(store: Arc<dyn DataStore>, files: Arc<dyn FileStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            store,
            files,
            auth,
            locks: PropertyLocks::default(),
        }
    }
}
