//! Payment method and payment status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery: collected by the carrier.
    Cod,
    /// Online payment, captured at checkout.
    Online,
}

impl PaymentMethod {
    /// Wire/storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cod => "cod",
            Self::Online => "online",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cod" => Ok(Self::Cod),
            "online" => Ok(Self::Online),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Settlement state of an order's payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// No money collected yet.
    Unpaid,
    /// Payment captured.
    Paid,
    /// Payment attempted and failed.
    Failed,
}

impl PaymentStatus {
    /// Settlement state assigned when an order is placed.
    ///
    /// Online orders are marked paid at checkout without a capture
    /// confirmation; COD orders stay unpaid until delivery.
    #[must_use]
    pub const fn on_placement(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Online => Self::Paid,
            PaymentMethod::Cod => Self::Unpaid,
        }
    }

    /// Wire/storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}
