use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Available,
    Occupied,
    UnderMaintenance,
}

impl PropertyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Occupied => "occupied",
            PropertyStatus::UnderMaintenance => "under_maintenance",
        }
    }
}

/// Row in the platform's `properties` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub property_id: String,
    pub name: String,
    pub address: String,
    pub property_type: String,
    pub status: PropertyStatus,
    pub monthly_rent: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyResponse {
    pub id: String,
    pub name: String,
    pub address: String,
    pub property_type: String,
    pub status: PropertyStatus,
    pub monthly_rent: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Property> for PropertyResponse {
    fn from(property: Property) -> Self {
        Self {
            id: property.property_id,
            name: property.name,
            address: property.address,
            property_type: property.property_type,
            status: property.status,
            monthly_rent: property.monthly_rent,
            created_at: property.created_at,
            updated_at: property.updated_at,
        }
    }
}
