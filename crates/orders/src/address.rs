use serde::{Deserialize, Serialize};

use ordering_core::ValueObject;

/// Delivery address (value object).
///
/// Never mutated in place: `change_detail_to` hands back a new address and the
/// owning order swaps it in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    province: String,
    city: String,
    /// Street-level detail (street, building, unit).
    detail: String,
}

impl Address {
    pub fn new(
        province: impl Into<String>,
        city: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            province: province.into(),
            city: city.into(),
            detail: detail.into(),
        }
    }

    pub fn province(&self) -> &str {
        &self.province
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Returns a copy of this address with only the detail replaced.
    pub fn change_detail_to(&self, detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            ..self.clone()
        }
    }
}

impl ValueObject for Address {}
