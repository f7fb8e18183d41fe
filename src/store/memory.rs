//! In-memory collaborator used by the test suite and for running the API
//! without platform credentials. Mirrors the row/object/credential
//! semantics the handlers rely on, nothing more.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuthError, AuthProvider, AuthSession, AuthUser, DataStore, FileStore, Query, StoreError};

#[derive(Debug, Clone)]
struct StoredUser {
    id: String,
    name: String,
    email: String,
    password: String,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Value>>>,
    objects: RwLock<HashMap<String, (String, Vec<u8>)>>,
    users: RwLock<Vec<StoredUser>>,
    tokens: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables.get(table).cloned().unwrap_or_default();
        Ok(query.apply(rows))
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, query: &Query, changes: Value) -> Result<Vec<Value>, StoreError> {
        let changes = match changes {
            Value::Object(map) => map,
            other => return Err(StoreError::Decode(format!("expected object changes, got {}", other))),
        };

        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();
        let mut updated = Vec::new();
        for row in rows.iter_mut() {
            if query.matches(row) {
                if let Value::Object(map) = row {
                    for (key, value) in &changes {
                        map.insert(key.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, query: &Query) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| !query.matches(row));
        }
        Ok(())
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StoreError> {
        let mut objects = self.objects.write().await;
        objects.insert(path.to_string(), (content_type.to_string(), bytes));
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("memory://{}", path)
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        let mut objects = self.objects.write().await;
        objects.remove(path).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl AuthProvider for MemoryStore {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let users = self.users.read().await;
        let user = users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .cloned()
            .ok_or_else(|| AuthError::Rejected("Invalid login credentials".to_string()))?;
        drop(users);

        let token = Uuid::new_v4().to_string();
        self.tokens.write().await.insert(token.clone(), user.id.clone());
        Ok(AuthSession {
            user: AuthUser {
                id: user.id,
                name: Some(user.name),
                email: Some(user.email),
            },
            access_token: Some(token),
        })
    }

    async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::Rejected("User already registered".to_string()));
        }
        let user = StoredUser {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        users.push(user.clone());
        drop(users);

        let token = Uuid::new_v4().to_string();
        self.tokens.write().await.insert(token.clone(), user.id.clone());
        Ok(AuthSession {
            user: AuthUser {
                id: user.id,
                name: Some(user.name),
                email: Some(user.email),
            },
            access_token: Some(token),
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }

    async fn get_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let tokens = self.tokens.read().await;
        let user_id = tokens
            .get(token)
            .cloned()
            .ok_or_else(|| AuthError::Rejected("invalid JWT".to_string()))?;
        drop(tokens);

        let users = self.users.read().await;
        let user = users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| AuthError::Rejected("invalid JWT".to_string()))?;
        Ok(AuthUser {
            id: user.id,
            name: Some(user.name),
            email: Some(user.email),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_then_select_one() {
        let store = MemoryStore::new();
        store
            .insert("properties", json!({"property_id": "p-1", "name": "Loft"}))
            .await
            .expect("insert");

        let row = store
            .select_one("properties", &Query::new().eq("property_id", "p-1"))
            .await
            .expect("select_one");
        assert_eq!(row["name"], "Loft");

        let missing = store
            .select_one("properties", &Query::new().eq("property_id", "p-2"))
            .await;
        assert!(matches!(missing, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn update_merges_changes_into_matching_rows() {
        let store = MemoryStore::new();
        store
            .insert("properties", json!({"property_id": "p-1", "status": "available"}))
            .await
            .expect("insert");

        let updated = store
            .update(
                "properties",
                &Query::new().eq("property_id", "p-1"),
                json!({"status": "occupied", "monthly_rent": 900.0}),
            )
            .await
            .expect("update");
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["status"], "occupied");
        assert_eq!(updated[0]["monthly_rent"], 900.0);
        assert_eq!(updated[0]["property_id"], "p-1");
    }

    #[tokio::test]
    async fn delete_removes_matching_rows_only() {
        let store = MemoryStore::new();
        store.insert("contracts", json!({"contract_id": "c-1"})).await.expect("insert");
        store.insert("contracts", json!({"contract_id": "c-2"})).await.expect("insert");

        store
            .delete("contracts", &Query::new().eq("contract_id", "c-1"))
            .await
            .expect("delete");

        let rows = store.select("contracts", &Query::new()).await.expect("select");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["contract_id"], "c-2");
    }

    #[tokio::test]
    async fn sign_up_then_sign_in_and_resolve_token() {
        let store = MemoryStore::new();
        let session = store
            .sign_up("Ana", "ana@example.com", "secret1")
            .await
            .expect("sign up");
        assert!(session.access_token.is_some());

        let dup = store.sign_up("Ana", "ana@example.com", "secret1").await;
        assert!(matches!(dup, Err(AuthError::Rejected(_))));

        let session = store
            .sign_in("ana@example.com", "secret1")
            .await
            .expect("sign in");
        let token = session.access_token.expect("token");
        let user = store.get_user(&token).await.expect("get_user");
        assert_eq!(user.email.as_deref(), Some("ana@example.com"));

        let rejected = store.sign_in("ana@example.com", "wrong").await;
        assert!(matches!(rejected, Err(AuthError::Rejected(_))));
    }

    #[tokio::test]
    async fn removing_missing_object_errors() {
        let store = MemoryStore::new();
        store
            .upload("documents/property/p-1/a.pdf", b"data".to_vec(), "application/pdf")
            .await
            .expect("upload");
        store.remove("documents/property/p-1/a.pdf").await.expect("remove");
        assert!(matches!(
            store.remove("documents/property/p-1/a.pdf").await,
            Err(StoreError::NotFound)
        ));
    }
}
