//! Keeps contract status and property occupancy consistent: per property,
//! at most one contract is active, and the property is `occupied` exactly
//! while such a contract exists.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::contract::ContractStatus;
use crate::models::property::PropertyStatus;
use crate::store::{DataStore, Query, StoreError};

/// Per-property async locks serializing the check-then-act window between
/// the active-contract check and the row write. Two concurrent requests
/// against the same property take turns; different properties don't
/// contend. This holds within one process; across processes the store's
/// own uniqueness constraint has to back it up.
#[derive(Clone, Default)]
pub struct PropertyLocks {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl PropertyLocks {
    pub async fn lock(&self, property_id: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut map = self.inner.lock().await;
            map.entry(property_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        slot.lock_owned().await
    }
}

/// True when the property already has an active contract, optionally
/// ignoring one contract id (used when re-checking during an update).
pub async fn has_active_contract(
    store: &dyn DataStore,
    property_id: &str,
    exclude_contract: Option<&str>,
) -> Result<bool, StoreError> {
    let mut query = Query::new()
        .eq("property_id", property_id)
        .eq("status", ContractStatus::Active.as_str());
    if let Some(contract_id) = exclude_contract {
        query = query.neq("contract_id", contract_id);
    }
    Ok(!store.select("contracts", &query).await?.is_empty())
}

/// Mark the property occupied and copy the active contract's rent onto it.
pub async fn mark_occupied(
    store: &dyn DataStore,
    property_id: &str,
    monthly_rent: f64,
) -> Result<(), StoreError> {
    store
        .update(
            "properties",
            &Query::new().eq("property_id", property_id),
            json!({
                "status": PropertyStatus::Occupied,
                "monthly_rent": monthly_rent,
                "updated_at": Utc::now().to_rfc3339(),
            }),
        )
        .await?;
    Ok(())
}

/// Revert the property to available once no active contract references it.
pub async fn release(store: &dyn DataStore, property_id: &str) -> Result<(), StoreError> {
    store
        .update(
            "properties",
            &Query::new().eq("property_id", property_id),
            json!({
                "status": PropertyStatus::Available,
                "updated_at": Utc::now().to_rfc3339(),
            }),
        )
        .await?;
    Ok(())
}
