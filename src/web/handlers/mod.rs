//! API handlers for the vimi web API.

pub mod message;

pub use message::*;

use std::sync::Arc;

use crate::crypto::KeyProvider;
use crate::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database with connection pool.
    pub db: Arc<Database>,
    /// Source of the message encryption key.
    pub keys: Arc<dyn KeyProvider>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Arc<Database>, keys: Arc<dyn KeyProvider>) -> Self {
        Self { db, keys }
    }
}
