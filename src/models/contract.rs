use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Active,
    Terminated,
    Expired,
}

impl ContractStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContractStatus::Active => "active",
            ContractStatus::Terminated => "terminated",
            ContractStatus::Expired => "expired",
        }
    }
}

/// Row in the platform's `contracts` table. Dates are stored as ISO strings
/// and validated before they get here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub contract_id: String,
    pub property_id: String,
    pub tenant_name: String,
    pub start_date: String,
    pub end_date: String,
    pub monthly_rent: f64,
    pub status: ContractStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Wire shape: primary key renamed to `id`, related property name joined in.
#[derive(Debug, Clone, Serialize)]
pub struct ContractResponse {
    pub id: String,
    pub property_id: String,
    pub tenant_name: String,
    pub start_date: String,
    pub end_date: String,
    pub monthly_rent: f64,
    pub status: ContractStatus,
    pub property_name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ContractResponse {
    pub fn new(contract: Contract, property_name: Option<String>) -> Self {
        Self {
            id: contract.contract_id,
            property_id: contract.property_id,
            tenant_name: contract.tenant_name,
            start_date: contract.start_date,
            end_date: contract.end_date,
            monthly_rent: contract.monthly_rent,
            status: contract.status,
            property_name: property_name.unwrap_or_else(|| "Unknown".to_string()),
            created_at: contract.created_at,
            updated_at: contract.updated_at,
        }
    }
}
