//! Order types for venue submission.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order.
    #[strum(to_string = "BUY", serialize = "buy")]
    Buy,
    /// Sell order.
    #[strum(to_string = "SELL", serialize = "sell")]
    Sell,
}

/// Order time-in-force.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Fill-or-kill: must fill entirely or cancel.
    #[default]
    #[strum(serialize = "FOK", serialize = "fok")]
    FOK,
    /// Good-till-cancelled: stays on book until filled or cancelled.
    #[strum(serialize = "GTC", serialize = "gtc")]
    GTC,
}

/// Parameters for one order submission.
#[derive(Debug, Clone)]
pub struct OrderParams {
    /// Token id to trade.
    pub token_id: String,
    /// Order side.
    pub side: Side,
    /// Limit price.
    pub price: Decimal,
    /// Order size in shares.
    pub size: Decimal,
    /// Time-in-force.
    pub tif: TimeInForce,
}

impl OrderParams {
    /// Create a fill-or-kill buy order.
    pub fn buy(token_id: impl Into<String>, price: Decimal, size: Decimal) -> Self {
        Self {
            token_id: token_id.into(),
            side: Side::Buy,
            price,
            size,
            tif: TimeInForce::FOK,
        }
    }

    /// Validate order parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.token_id.is_empty() {
            return Err("token_id is required".to_string());
        }
        if self.price <= Decimal::ZERO {
            return Err("price must be positive".to_string());
        }
        if self.size <= Decimal::ZERO {
            return Err("size must be positive".to_string());
        }
        Ok(())
    }
}

/// Receipt for an accepted order.
#[derive(Debug, Clone)]
pub struct OrderReceipt {
    /// Venue-assigned order identifier.
    pub order_id: String,
}

/// How one submission in a batch ended.
#[derive(Debug, Clone)]
pub enum OutcomeStatus {
    /// The venue accepted the order.
    Submitted {
        /// Venue-assigned order identifier.
        order_id: String,
    },
    /// The submission exceeded its deadline; the in-flight request was
    /// abandoned, not cancelled.
    TimedOut,
    /// The venue or transport rejected the order.
    Rejected {
        /// Failure detail.
        reason: String,
    },
}

/// Ephemeral record of one submission attempt. Logged, never persisted or
/// pushed to observers.
#[derive(Debug, Clone)]
pub struct OrderOutcome {
    /// Condition label of the opportunity this order targeted.
    pub condition: &'static str,
    /// Token that was bought.
    pub token_id: String,
    /// Limit price that was submitted.
    pub submitted_price: Decimal,
    /// How the submission ended.
    pub status: OutcomeStatus,
}

impl OrderOutcome {
    /// Whether the venue accepted this order.
    pub fn is_submitted(&self) -> bool {
        matches!(self.status, OutcomeStatus::Submitted { .. })
    }

    /// Whether this submission hit its deadline.
    pub fn is_timed_out(&self) -> bool {
        matches!(self.status, OutcomeStatus::TimedOut)
    }
}
