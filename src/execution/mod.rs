//! Order execution: the gateway port, its CLOB implementation, and the
//! concurrent batch dispatcher.

pub mod clob;
pub mod dispatcher;
pub mod gateway;
pub mod mock;
pub mod order;

pub use clob::ClobGateway;
pub use dispatcher::Dispatcher;
pub use gateway::OrderGateway;
pub use mock::MockGateway;
pub use order::{OrderOutcome, OrderParams, OrderReceipt, OutcomeStatus, Side, TimeInForce};
