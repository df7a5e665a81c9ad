use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// the semantic role of a segment endpoint, read from the route service's
/// `fromLabel` / `toLabel` fields.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StopRole {
    Pickup,
    Delivery,
    Depot,
    /// virtual labels such as rescue or start points.
    Other(String),
}

impl From<&str> for StopRole {
    fn from(value: &str) -> Self {
        match value {
            "Pickup" => StopRole::Pickup,
            "Delivery" => StopRole::Delivery,
            "Depot" => StopRole::Depot,
            other => StopRole::Other(other.to_string()),
        }
    }
}

impl Display for StopRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopRole::Pickup => write!(f, "Pickup"),
            StopRole::Delivery => write!(f, "Delivery"),
            StopRole::Depot => write!(f, "Depot"),
            StopRole::Other(label) => write!(f, "{label}"),
        }
    }
}
