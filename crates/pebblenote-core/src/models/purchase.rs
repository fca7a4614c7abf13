//! Purchase model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::NoteId;

/// Supported wallet providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    Khalti,
    #[serde(rename = "eSewa")]
    ESewa,
}

impl PaymentMethod {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Khalti => "Khalti",
            Self::ESewa => "eSewa",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "khalti" => Ok(Self::Khalti),
            "esewa" => Ok(Self::ESewa),
            other => Err(format!("unknown payment method `{other}`")),
        }
    }
}

/// Outcome recorded for a purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    #[default]
    Success,
    Failed,
}

impl PurchaseStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

/// A recorded purchase of a note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub note_id: NoteId,
    /// Title at the time of purchase
    pub title: String,
    /// Price paid
    pub price: f64,
    pub method: PaymentMethod,
    #[serde(default)]
    pub status: PurchaseStatus,
    /// Unix ms
    pub timestamp: i64,
}
