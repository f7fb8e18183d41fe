use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Polymorphic discriminator tying an uploaded file to a property,
/// contract, or tenant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Property,
    Contract,
    Tenant,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Property => "property",
            EntityType::Contract => "contract",
            EntityType::Tenant => "tenant",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            EntityType::Property => "properties",
            EntityType::Contract => "contracts",
            EntityType::Tenant => "tenants",
        }
    }

    pub fn id_column(self) -> &'static str {
        match self {
            EntityType::Property => "property_id",
            EntityType::Contract => "contract_id",
            EntityType::Tenant => "tenant_id",
        }
    }
}

impl FromStr for EntityType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "property" => Ok(EntityType::Property),
            "contract" => Ok(EntityType::Contract),
            "tenant" => Ok(EntityType::Tenant),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row in the platform's `documents` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub document_id: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub document_type: String,
    pub document_name: String,
    pub description: String,
    pub file_name: String,
    pub file_path: String,
    pub public_url: String,
    pub content_type: String,
    pub size: usize,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
    pub id: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub document_type: String,
    pub document_name: String,
    pub description: String,
    pub file_name: String,
    pub file_path: String,
    pub public_url: String,
    pub content_type: String,
    pub size: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            id: document.document_id,
            entity_type: document.entity_type,
            entity_id: document.entity_id,
            document_type: document.document_type,
            document_name: document.document_name,
            description: document.description,
            file_name: document.file_name,
            file_path: document.file_path,
            public_url: document.public_url,
            content_type: document.content_type,
            size: document.size,
            created_at: document.created_at,
            updated_at: document.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_type_parses_known_discriminators() {
        assert_eq!("property".parse::<EntityType>(), Ok(EntityType::Property));
        assert_eq!("contract".parse::<EntityType>(), Ok(EntityType::Contract));
        assert_eq!("tenant".parse::<EntityType>(), Ok(EntityType::Tenant));
        assert!("vehicle".parse::<EntityType>().is_err());
    }

    #[test]
    fn entity_type_maps_to_table_and_id_column() {
        assert_eq!(EntityType::Property.table(), "properties");
        assert_eq!(EntityType::Property.id_column(), "property_id");
        assert_eq!(EntityType::Tenant.table(), "tenants");
        assert_eq!(EntityType::Tenant.id_column(), "tenant_id");
    }
}
