use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{lookup_err, ApiError};
use crate::models::contract::{Contract, ContractResponse, ContractStatus};
use crate::services::occupancy;
use crate::state::AppState;
use crate::store::{DataStore, Query, SortDirection, StoreError};
use crate::validation::validate_contract;

use super::{decode_row, str_field};

const TABLE: &str = "contracts";

/// GET /api/contracts - soonest-ending first, property names joined in
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ContractResponse>>, ApiError> {
    let rows = state
        .store
        .select(TABLE, &Query::new().order("end_date", SortDirection::Asc))
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to retrieve contracts"))?;
    let names = property_names(state.store.as_ref())
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to retrieve contracts"))?;

    let mut contracts = Vec::with_capacity(rows.len());
    for row in rows {
        let contract: Contract = decode_row(row)?;
        let name = names.get(&contract.property_id).cloned();
        contracts.push(ContractResponse::new(contract, name));
    }
    Ok(Json(contracts))
}

/// GET /api/contracts/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContractResponse>, ApiError> {
    let row = state
        .store
        .select_one(TABLE, &Query::new().eq("contract_id", &id))
        .await
        .map_err(|e| lookup_err(e, "Contract not found", "Failed to retrieve contract"))?;
    let contract: Contract = decode_row(row)?;
    let name = joined_property_name(state.store.as_ref(), &contract.property_id).await;
    Ok(Json(ContractResponse::new(contract, name)))
}

/// GET /api/contracts/property/:property_id
pub async fn list_by_property(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
) -> Result<Json<Vec<ContractResponse>>, ApiError> {
    let property = state
        .store
        .select_one("properties", &Query::new().eq("property_id", &property_id))
        .await
        .map_err(|e| lookup_err(e, "Property not found", "Failed to retrieve contracts"))?;
    let name = property.get("name").and_then(Value::as_str).map(str::to_string);

    let rows = state
        .store
        .select(
            TABLE,
            &Query::new()
                .eq("property_id", &property_id)
                .order("end_date", SortDirection::Asc),
        )
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to retrieve contracts"))?;

    let mut contracts = Vec::with_capacity(rows.len());
    for row in rows {
        let contract: Contract = decode_row(row)?;
        contracts.push(ContractResponse::new(contract, name.clone()));
    }
    Ok(Json(contracts))
}

/// POST /api/contracts
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<ContractResponse>), ApiError> {
    validate_contract(&payload)?;
    let status: ContractStatus = serde_json::from_value(payload["status"].clone())
        .map_err(|_| ApiError::bad_request("Status must be active, terminated, or expired"))?;
    let monthly_rent = payload
        .get("monthly_rent")
        .and_then(Value::as_f64)
        .ok_or_else(|| ApiError::bad_request("Monthly rent must be a number"))?;
    let property_id = str_field(&payload, "property_id");

    let _guard = state.locks.lock(&property_id).await;

    // The referenced property comes from the request body, so a missing row
    // is a bad request rather than a 404.
    let property = match state
        .store
        .select_one("properties", &Query::new().eq("property_id", &property_id))
        .await
    {
        Ok(row) => row,
        Err(StoreError::NotFound) => return Err(ApiError::bad_request("Property not found")),
        Err(e) => return Err(ApiError::upstream(e, "Failed to create contract")),
    };

    if status == ContractStatus::Active {
        let conflict = occupancy::has_active_contract(state.store.as_ref(), &property_id, None)
            .await
            .map_err(|e| ApiError::upstream(e, "Failed to create contract"))?;
        if conflict {
            return Err(ApiError::bad_request("Property already has an active contract"));
        }
        occupancy::mark_occupied(state.store.as_ref(), &property_id, monthly_rent)
            .await
            .map_err(|e| ApiError::upstream(e, "Failed to create contract"))?;
    }

    let now = Utc::now().to_rfc3339();
    let contract = Contract {
        contract_id: Uuid::new_v4().to_string(),
        property_id,
        tenant_name: str_field(&payload, "tenant_name"),
        start_date: str_field(&payload, "start_date"),
        end_date: str_field(&payload, "end_date"),
        monthly_rent,
        status,
        created_at: now.clone(),
        updated_at: now,
    };

    let row = serde_json::to_value(&contract)
        .map_err(|e| ApiError::upstream(e, "Failed to create contract"))?;
    let stored = state
        .store
        .insert(TABLE, row)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to create contract"))?;
    let created: Contract = decode_row(stored)?;

    let name = property.get("name").and_then(Value::as_str).map(str::to_string);
    Ok((StatusCode::CREATED, Json(ContractResponse::new(created, name))))
}

/// PUT /api/contracts/:id - full-field overwrite with occupancy side effects
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<ContractResponse>, ApiError> {
    validate_contract(&payload)?;
    let status: ContractStatus = serde_json::from_value(payload["status"].clone())
        .map_err(|_| ApiError::bad_request("Status must be active, terminated, or expired"))?;
    let monthly_rent = payload
        .get("monthly_rent")
        .and_then(Value::as_f64)
        .ok_or_else(|| ApiError::bad_request("Monthly rent must be a number"))?;
    let property_id = str_field(&payload, "property_id");

    let existing_row = state
        .store
        .select_one(TABLE, &Query::new().eq("contract_id", &id))
        .await
        .map_err(|e| lookup_err(e, "Contract not found", "Failed to update contract"))?;
    let existing: Contract = decode_row(existing_row)?;

    // The update can touch two properties: the one the contract moves to
    // and the one it leaves. Lock both in a stable order.
    let mut lock_ids = vec![property_id.clone()];
    if existing.property_id != property_id {
        lock_ids.push(existing.property_id.clone());
    }
    lock_ids.sort();
    let mut guards = Vec::with_capacity(lock_ids.len());
    for lock_id in &lock_ids {
        guards.push(state.locks.lock(lock_id).await);
    }

    let becoming_active = status == ContractStatus::Active && existing.status != ContractStatus::Active;
    let leaving_active = existing.status == ContractStatus::Active && status != ContractStatus::Active;

    if becoming_active {
        let conflict = occupancy::has_active_contract(state.store.as_ref(), &property_id, Some(&id))
            .await
            .map_err(|e| ApiError::upstream(e, "Failed to update contract"))?;
        if conflict {
            return Err(ApiError::bad_request("Property already has another active contract"));
        }
        occupancy::mark_occupied(state.store.as_ref(), &property_id, monthly_rent)
            .await
            .map_err(|e| ApiError::upstream(e, "Failed to update contract"))?;
    }
    if leaving_active {
        occupancy::release(state.store.as_ref(), &existing.property_id)
            .await
            .map_err(|e| ApiError::upstream(e, "Failed to update contract"))?;
    }

    let changes = json!({
        "property_id": property_id,
        "tenant_name": str_field(&payload, "tenant_name"),
        "start_date": str_field(&payload, "start_date"),
        "end_date": str_field(&payload, "end_date"),
        "monthly_rent": monthly_rent,
        "status": status,
        "updated_at": Utc::now().to_rfc3339(),
    });
    let rows = state
        .store
        .update(TABLE, &Query::new().eq("contract_id", &id), changes)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to update contract"))?;
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::internal("Failed to update contract"))?;
    let updated: Contract = decode_row(row)?;

    let name = joined_property_name(state.store.as_ref(), &updated.property_id).await;
    Ok(Json(ContractResponse::new(updated, name)))
}

/// DELETE /api/contracts/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let existing_row = state
        .store
        .select_one(TABLE, &Query::new().eq("contract_id", &id))
        .await
        .map_err(|e| lookup_err(e, "Contract not found", "Failed to delete contract"))?;
    let existing: Contract = decode_row(existing_row)?;

    let _guard = state.locks.lock(&existing.property_id).await;

    if existing.status == ContractStatus::Active {
        occupancy::release(state.store.as_ref(), &existing.property_id)
            .await
            .map_err(|e| ApiError::upstream(e, "Failed to delete contract"))?;
    }

    state
        .store
        .delete(TABLE, &Query::new().eq("contract_id", &id))
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to delete contract"))?;
    Ok(Json(json!({ "message": "Contract deleted successfully" })))
}

async fn property_names(store: &dyn DataStore) -> Result<HashMap<String, String>, StoreError> {
    let rows = store.select("properties", &Query::new()).await?;
    Ok(rows
        .iter()
        .filter_map(|row| {
            let id = row.get("property_id")?.as_str()?;
            let name = row.get("name")?.as_str()?;
            Some((id.to_string(), name.to_string()))
        })
        .collect())
}

/// Best-effort name join; a missing property falls back to "Unknown" at the
/// response layer.
async fn joined_property_name(store: &dyn DataStore, property_id: &str) -> Option<String> {
    match store
        .select_one("properties", &Query::new().eq("property_id", property_id))
        .await
    {
        Ok(row) => row.get("name").and_then(Value::as_str).map(str::to_string),
        Err(_) => None,
    }
}
