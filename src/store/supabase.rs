//! HTTP client for the hosted Supabase platform: PostgREST for rows, GoTrue
//! for credentials, and the storage API for file objects. One instance is
//! created at startup and shared behind the collaborator traits.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::{json, Value};
use url::Url;

use super::{AuthError, AuthProvider, AuthSession, AuthUser, DataStore, FileStore, Query, StoreError};

pub struct Supabase {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    bucket: String,
}

impl Supabase {
    pub fn new(url: &str, anon_key: &str, bucket: &str) -> Result<Self, StoreError> {
        let parsed = Url::parse(url)
            .map_err(|e| StoreError::Decode(format!("invalid Supabase URL '{}': {}", url, e)))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            bucket: bucket.to_string(),
        })
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }

    async fn read_rows(response: Response) -> Result<Vec<Value>, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { status: status.as_u16(), message });
        }
        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn check_status(response: Response) -> Result<(), StoreError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { status: status.as_u16(), message });
        }
        Ok(())
    }

    /// Turn a non-success auth response into the provider's own message so
    /// handlers can pass it through.
    async fn auth_failure(response: Response) -> AuthError {
        let status = response.status();
        if status.is_server_error() {
            return AuthError::Transport(format!("auth service error ({})", status));
        }
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        let message = body
            .get("error_description")
            .or_else(|| body.get("msg"))
            .or_else(|| body.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("Authentication failed")
            .to_string();
        AuthError::Rejected(message)
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

fn auth_transport(err: reqwest::Error) -> AuthError {
    AuthError::Transport(err.to_string())
}

fn parse_user(value: &Value) -> AuthUser {
    AuthUser {
        id: value.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
        name: value
            .pointer("/user_metadata/name")
            .and_then(Value::as_str)
            .map(str::to_string),
        email: value.get("email").and_then(Value::as_str).map(str::to_string),
    }
}

#[async_trait]
impl DataStore for Supabase {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        pairs.extend(query.to_query_pairs());
        let response = self
            .request(Method::GET, self.rest_url(table))
            .query(&pairs)
            .send()
            .await
            .map_err(transport)?;
        Self::read_rows(response).await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        let response = self
            .request(Method::POST, self.rest_url(table))
            .header("Prefer", "return=representation")
            .json(&json!([row]))
            .send()
            .await
            .map_err(transport)?;
        let rows = Self::read_rows(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("empty insert response".to_string()))
    }

    async fn update(&self, table: &str, query: &Query, changes: Value) -> Result<Vec<Value>, StoreError> {
        let response = self
            .request(Method::PATCH, self.rest_url(table))
            .query(&query.to_query_pairs())
            .header("Prefer", "return=representation")
            .json(&changes)
            .send()
            .await
            .map_err(transport)?;
        Self::read_rows(response).await
    }

    async fn delete(&self, table: &str, query: &Query) -> Result<(), StoreError> {
        let response = self
            .request(Method::DELETE, self.rest_url(table))
            .query(&query.to_query_pairs())
            .send()
            .await
            .map_err(transport)?;
        Self::check_status(response).await
    }
}

#[async_trait]
impl FileStore for Supabase {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StoreError> {
        let response = self
            .request(Method::POST, self.object_url(path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(transport)?;
        Self::check_status(response).await
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base_url, self.bucket, path)
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        let response = self
            .request(Method::DELETE, self.object_url(path))
            .send()
            .await
            .map_err(transport)?;
        Self::check_status(response).await
    }
}

#[async_trait]
impl AuthProvider for Supabase {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let response = self
            .request(Method::POST, url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(auth_transport)?;
        if !response.status().is_success() {
            return Err(Self::auth_failure(response).await);
        }

        let body: Value = response.json().await.map_err(auth_transport)?;
        Ok(AuthSession {
            user: parse_user(body.get("user").unwrap_or(&Value::Null)),
            access_token: body.get("access_token").and_then(Value::as_str).map(str::to_string),
        })
    }

    async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let response = self
            .request(Method::POST, self.auth_url("signup"))
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "name": name },
            }))
            .send()
            .await
            .map_err(auth_transport)?;
        if !response.status().is_success() {
            return Err(Self::auth_failure(response).await);
        }

        // GoTrue returns either a full session or, with email confirmation
        // on, a bare user object with no token yet.
        let body: Value = response.json().await.map_err(auth_transport)?;
        let user_value = body.get("user").cloned().unwrap_or_else(|| body.clone());
        Ok(AuthSession {
            user: parse_user(&user_value),
            access_token: body.get("access_token").and_then(Value::as_str).map(str::to_string),
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let response = self
            .request(Method::POST, self.auth_url("logout"))
            .send()
            .await
            .map_err(auth_transport)?;
        if !response.status().is_success() {
            return Err(Self::auth_failure(response).await);
        }
        Ok(())
    }

    async fn get_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .http
            .get(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(auth_transport)?;
        if !response.status().is_success() {
            return Err(Self::auth_failure(response).await);
        }
        let body: Value = response.json().await.map_err(auth_transport)?;
        Ok(parse_user(&body))
    }
}
