//! Flat-rate shipping by destination city.

use crate::product::CatalogError;
use kedai_shared::{format_rupiah_compact, Amount};
use serde::{Deserialize, Serialize};

/// One selectable destination and its fixed cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingOption {
    pub destination: String,
    pub cost: Amount,
}

impl ShippingOption {
    pub fn new(destination: impl Into<String>, cost: Amount) -> Self {
        Self {
            destination: destination.into(),
            cost,
        }
    }

    /// Label for the destination picker, e.g. `Jakarta - Rp9.000`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.destination, format_rupiah_compact(self.cost))
    }
}

/// Destination → cost lookup. Lookups are exact and case-sensitive; there is
/// no fallback cost for destinations outside the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingTable {
    options: Vec<ShippingOption>,
}

impl ShippingTable {
    pub fn new(options: Vec<ShippingOption>) -> Result<Self, CatalogError> {
        if options.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].iter().any(|o| o.destination == option.destination) {
                return Err(CatalogError::DuplicateDestination(option.destination.clone()));
            }
        }
        Ok(Self { options })
    }

    pub fn cost(&self, destination: &str) -> Option<Amount> {
        self.options
            .iter()
            .find(|o| o.destination == destination)
            .map(|o| o.cost)
    }

    /// The option preselected when a storefront session starts.
    pub fn default_option(&self) -> &ShippingOption {
        // `new` guarantees at least one option
        &self.options[0]
    }

    pub fn options(&self) -> &[ShippingOption] {
        &self.options
    }
}
