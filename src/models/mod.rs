//! Store rows and their wire-facing counterparts. Store structs carry the
//! platform's column names (`property_id`, `contract_id`, ...); response
//! structs expose the canonical wire shape, where every resource's primary
//! key is `id` and foreign keys keep their column names.

pub mod contract;
pub mod document;
pub mod image;
pub mod property;
