use std::collections::HashMap;

use axum::{extract::State, response::Json};
use chrono::{Duration, Utc};
use serde::Serialize;

use crate::error::ApiError;
use crate::models::contract::{Contract, ContractStatus};
use crate::models::property::{Property, PropertyStatus};
use crate::state::AppState;
use crate::store::{Query, SortDirection};

use super::decode_row;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_properties: usize,
    pub properties_by_type: Vec<TypeCount>,
    pub properties_by_status: Vec<StatusCount>,
    pub occupancy_rate: i64,
    pub occupied_properties: usize,
    pub total_monthly_rent: f64,
    pub total_monthly_income: f64,
    pub upcoming_expirations: Vec<ExpiringContract>,
}

#[derive(Debug, Serialize)]
pub struct TypeCount {
    pub property_type: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ExpiringContract {
    pub id: String,
    pub end_date: String,
    pub tenant_name: String,
    pub property_name: String,
}

/// GET /api/dashboard/summary - recomputed per request from live rows
pub async fn summary(State(state): State<AppState>) -> Result<Json<DashboardSummary>, ApiError> {
    let property_rows = state
        .store
        .select("properties", &Query::new())
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to retrieve dashboard summary"))?;
    let mut properties = Vec::with_capacity(property_rows.len());
    for row in property_rows {
        properties.push(decode_row::<Property>(row)?);
    }

    let cutoff = (Utc::now() + Duration::days(60)).to_rfc3339();
    let expiring_rows = state
        .store
        .select(
            "contracts",
            &Query::new()
                .eq("status", ContractStatus::Active.as_str())
                .lte("end_date", &cutoff)
                .order("end_date", SortDirection::Asc)
                .limit(5),
        )
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to retrieve dashboard summary"))?;
    let mut expiring = Vec::with_capacity(expiring_rows.len());
    for row in expiring_rows {
        expiring.push(decode_row::<Contract>(row)?);
    }

    Ok(Json(summarize(&properties, &expiring)))
}

/// Pure aggregation over the fetched rows.
pub fn summarize(properties: &[Property], expiring: &[Contract]) -> DashboardSummary {
    let total = properties.len();
    let occupied: Vec<&Property> = properties
        .iter()
        .filter(|p| p.status == PropertyStatus::Occupied)
        .collect();

    let occupancy_rate = if total > 0 {
        ((occupied.len() as f64 / total as f64) * 100.0).round() as i64
    } else {
        0
    };
    let total_monthly_income: f64 = occupied.iter().map(|p| p.monthly_rent.unwrap_or(0.0)).sum();

    let names: HashMap<&str, &str> = properties
        .iter()
        .map(|p| (p.property_id.as_str(), p.name.as_str()))
        .collect();
    let upcoming_expirations = expiring
        .iter()
        .map(|contract| ExpiringContract {
            id: contract.contract_id.clone(),
            end_date: contract.end_date.clone(),
            tenant_name: contract.tenant_name.clone(),
            property_name: names
                .get(contract.property_id.as_str())
                .map(|name| name.to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
        })
        .collect();

    DashboardSummary {
        total_properties: total,
        properties_by_type: count_by(properties.iter().map(|p| p.property_type.as_str()))
            .into_iter()
            .map(|(property_type, count)| TypeCount { property_type, count })
            .collect(),
        properties_by_status: count_by(properties.iter().map(|p| p.status.as_str()))
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
        occupancy_rate,
        occupied_properties: occupied.len(),
        total_monthly_rent: total_monthly_income,
        total_monthly_income,
        upcoming_expirations,
    }
}

/// Count occurrences preserving first-seen order.
fn count_by<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key.to_string(), 1)),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(id: &str, property_type: &str, status: PropertyStatus, rent: Option<f64>) -> Property {
        Property {
            property_id: id.to_string(),
            name: format!("Property {}", id),
            address: "1 Main St".to_string(),
            property_type: property_type.to_string(),
            status,
            monthly_rent: rent,
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            updated_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn contract(id: &str, property_id: &str, end_date: &str) -> Contract {
        Contract {
            contract_id: id.to_string(),
            property_id: property_id.to_string(),
            tenant_name: "Ana".to_string(),
            start_date: "2026-01-01".to_string(),
            end_date: end_date.to_string(),
            monthly_rent: 900.0,
            status: ContractStatus::Active,
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            updated_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn empty_store_yields_zero_rate() {
        let summary = summarize(&[], &[]);
        assert_eq!(summary.total_properties, 0);
        assert_eq!(summary.occupancy_rate, 0);
        assert_eq!(summary.total_monthly_income, 0.0);
        assert!(summary.properties_by_type.is_empty());
        assert!(summary.upcoming_expirations.is_empty());
    }

    #[test]
    fn rate_rounds_to_nearest_percent() {
        let properties = vec![
            property("p-1", "apartment", PropertyStatus::Occupied, Some(900.0)),
            property("p-2", "apartment", PropertyStatus::Available, None),
            property("p-3", "house", PropertyStatus::Available, None),
        ];
        let summary = summarize(&properties, &[]);
        assert_eq!(summary.occupancy_rate, 33);
        assert_eq!(summary.occupied_properties, 1);
        assert_eq!(summary.total_monthly_income, 900.0);
        assert_eq!(summary.total_monthly_rent, 900.0);
    }

    #[test]
    fn groups_by_type_and_status() {
        let properties = vec![
            property("p-1", "apartment", PropertyStatus::Occupied, Some(500.0)),
            property("p-2", "apartment", PropertyStatus::Available, None),
            property("p-3", "house", PropertyStatus::UnderMaintenance, None),
        ];
        let summary = summarize(&properties, &[]);

        let types: Vec<(&str, usize)> = summary
            .properties_by_type
            .iter()
            .map(|t| (t.property_type.as_str(), t.count))
            .collect();
        assert_eq!(types, vec![("apartment", 2), ("house", 1)]);

        let statuses: Vec<(&str, usize)> = summary
            .properties_by_status
            .iter()
            .map(|s| (s.status.as_str(), s.count))
            .collect();
        assert_eq!(statuses, vec![("occupied", 1), ("available", 1), ("under_maintenance", 1)]);
    }

    #[test]
    fn expirations_join_property_names_with_unknown_fallback() {
        let properties = vec![property("p-1", "apartment", PropertyStatus::Occupied, Some(900.0))];
        let expiring = vec![contract("c-1", "p-1", "2026-09-01"), contract("c-2", "p-gone", "2026-09-15")];
        let summary = summarize(&properties, &expiring);

        assert_eq!(summary.upcoming_expirations.len(), 2);
        assert_eq!(summary.upcoming_expirations[0].property_name, "Property p-1");
        assert_eq!(summary.upcoming_expirations[1].property_name, "Unknown");
        assert_eq!(summary.upcoming_expirations[0].id, "c-1");
    }
}
