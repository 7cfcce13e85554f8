//! The order submission port.

use async_trait::async_trait;

use super::order::{OrderParams, OrderReceipt};
use crate::error::GatewayError;

/// Port for posting one signed order to the trading venue.
///
/// The core treats this as a boundary call whose latency it does not
/// control; the dispatcher always invokes it inside a deadline race.
/// Injected so tests substitute a scripted double.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Sign and post one order, returning the venue receipt.
    async fn submit(&self, params: OrderParams) -> Result<OrderReceipt, GatewayError>;
}
