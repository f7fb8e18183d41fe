//! Collaborator seams for the hosted platform: row storage, file objects,
//! and credential auth. The real implementation (`supabase`) talks to the
//! platform over HTTP; the in-memory one (`memory`) backs the test suite and
//! credential-less local runs. Handlers only ever see the traits, through a
//! single long-lived handle in [`crate::state::AppState`].

pub mod memory;
pub mod query;
pub mod supabase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use query::{Query, SortDirection};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no rows matched")]
    NotFound,

    #[error("store rejected request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("store request failed: {0}")]
    Transport(String),

    #[error("unexpected store response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider rejected the credentials or token; carries the
    /// provider's own message, which is safe to surface.
    #[error("{0}")]
    Rejected(String),

    #[error("auth request failed: {0}")]
    Transport(String),
}

/// Minimal user shape surfaced by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: AuthUser,
    /// Absent when the provider defers the session (e.g. pending email
    /// confirmation after sign-up).
    pub access_token: Option<String>,
}

/// Row-level CRUD against the platform's relational tables.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError>;

    /// Single-row lookup; `NotFound` when no row matches.
    async fn select_one(&self, table: &str, query: &Query) -> Result<Value, StoreError> {
        let limited = query.clone().limit(1);
        let rows = self.select(table, &limited).await?;
        rows.into_iter().next().ok_or(StoreError::NotFound)
    }

    /// Insert one row and return it as stored.
    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError>;

    /// Apply `changes` to every matching row; returns the updated rows.
    async fn update(&self, table: &str, query: &Query, changes: Value) -> Result<Vec<Value>, StoreError>;

    async fn delete(&self, table: &str, query: &Query) -> Result<(), StoreError>;
}

/// File objects in the platform's storage bucket.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StoreError>;

    fn public_url(&self, path: &str) -> String;

    async fn remove(&self, path: &str) -> Result<(), StoreError>;
}

/// Credential sign-in/up/out and token-to-user resolution.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn get_user(&self, token: &str) -> Result<AuthUser, AuthError>;
}
