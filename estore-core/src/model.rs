//! Persisted records and the read-only views derived from them
//!
//! JSON shape is flat: the attribute set of a record is serialized next to
//! its `id`, and derived views add `stores_total` or `stores` alongside.

use serde::{Deserialize, Serialize};

pub type EstablishmentId = i64;
pub type StoreId = i64;

/// Name and address attributes shared by establishments and stores.
///
/// Opaque strings as far as the core is concerned. Missing fields
/// deserialize as empty so request validation can report them by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub number: String,
    pub name: String,
    pub corporate_name: String,
    pub address: String,
    pub address_number: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// A business entity that owns zero or more stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Establishment {
    pub id: EstablishmentId,
    #[serde(flatten)]
    pub profile: Profile,
}

/// Everything about a store except its identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub establishment_id: EstablishmentId,
    #[serde(flatten)]
    pub profile: Profile,
}

/// A sales unit belonging to exactly one establishment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    #[serde(flatten)]
    pub data: StoreData,
}

impl Store {
    pub fn establishment_id(&self) -> EstablishmentId {
        self.data.establishment_id
    }
}

/// Establishment with its live store count, for list displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstablishmentSummary {
    #[serde(flatten)]
    pub establishment: Establishment,
    pub stores_total: i64,
}

/// Establishment with its stores ordered by ascending id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstablishmentDetail {
    #[serde(flatten)]
    pub establishment: Establishment,
    pub stores: Vec<Store>,
}
