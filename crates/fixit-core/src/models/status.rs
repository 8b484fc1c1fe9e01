//! Status and category enumerations for repair analyses.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of diagnostic safety statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RepairStatus {
    /// Repair is safe for a non-expert to attempt
    Ok,

    /// Repair involves a hazard (mains electricity, gas, high tension)
    Unsafe,

    /// The provider could not confidently classify the object or issue
    Unclear,
}

impl FromStr for RepairStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ok" => Ok(RepairStatus::Ok),
            "unsafe" => Ok(RepairStatus::Unsafe),
            "unclear" => Ok(RepairStatus::Unclear),
            _ => Err(format!("Invalid repair status: {s}")),
        }
    }
}

impl RepairStatus {
    /// Convert to the wire/database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairStatus::Ok => "ok",
            RepairStatus::Unsafe => "unsafe",
            RepairStatus::Unclear => "unclear",
        }
    }

    /// Get status with consistent icon formatting for display.
    pub fn with_icon(&self) -> &'static str {
        match self {
            RepairStatus::Ok => "✓ Safe to repair",
            RepairStatus::Unsafe => "⚠ Unsafe for non-experts",
            RepairStatus::Unclear => "? Needs a clearer photo",
        }
    }
}

/// Type-safe enumeration of repair object categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RepairCategory {
    Electronics,
    Plumbing,
    Appliance,
    Furniture,
    #[default]
    Other,
}

impl FromStr for RepairCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "electronics" => Ok(RepairCategory::Electronics),
            "plumbing" => Ok(RepairCategory::Plumbing),
            "appliance" => Ok(RepairCategory::Appliance),
            "furniture" => Ok(RepairCategory::Furniture),
            "other" => Ok(RepairCategory::Other),
            _ => Err(format!("Invalid repair category: {s}")),
        }
    }
}

impl RepairCategory {
    /// Convert to the wire/database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairCategory::Electronics => "electronics",
            RepairCategory::Plumbing => "plumbing",
            RepairCategory::Appliance => "appliance",
            RepairCategory::Furniture => "furniture",
            RepairCategory::Other => "other",
        }
    }
}
