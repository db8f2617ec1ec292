//! Grocery store lookup result types

use serde::{Deserialize, Serialize};

/// Fewest stores a lookup must return
pub const MIN_STORES: usize = 3;

/// Most stores a lookup may return
pub const MAX_STORES: usize = 5;

/// A grocery store as reported by the model; every field is opaque text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Timing")]
    pub timing: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Offer")]
    pub offer: String,
    #[serde(rename = "Ratings")]
    pub ratings: String,
}

/// Stores near the user's city, in the order the model listed them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StoreList {
    stores: Vec<Store>,
}

impl StoreList {
    pub(crate) fn from_stores(stores: Vec<Store>) -> Option<Self> {
        if (MIN_STORES..=MAX_STORES).contains(&stores.len()) {
            Some(Self { stores })
        } else {
            None
        }
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}
