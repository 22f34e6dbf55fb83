use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: Uuid,
    pub name: String,
    pub hourly_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub color: String,
    #[serde(default)]
    pub is_disabled: bool,
}

/// Hospital form payload. Everything is optional here so that missing fields
/// surface as per-field validation errors instead of JSON parse failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HospitalInput {
    pub name: String,
    pub hourly_rate: Option<f64>,
    pub address: Option<String>,
    pub color: String,
}

impl Hospital {
    /// Builds a new, enabled hospital from an already validated input
    pub fn new(input: HospitalInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            hourly_rate: input.hourly_rate.unwrap_or_default(),
            address: normalize_address(input.address),
            color: input.color,
            is_disabled: false,
        }
    }

    pub fn apply(&mut self, input: HospitalInput) {
        self.name = input.name.trim().to_string();
        self.hourly_rate = input.hourly_rate.unwrap_or(self.hourly_rate);
        self.address = normalize_address(input.address);
        self.color = input.color;
    }

    pub fn is_enabled(&self) -> bool {
        !self.is_disabled
    }
}

fn normalize_address(address: Option<String>) -> Option<String> {
    address
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
}
