//! Goal-triggered Polymarket sniper for live football matches.
//!
//! An operator watches a match with the browser console open. The moment a
//! goal goes in, they press the button; the server updates the live score,
//! works out which conditional markets (both-teams-score, over-N.5 goals)
//! just became likely to settle YES, prices each order adaptively, and fires
//! a concurrent, deadline-bounded batch of fill-or-kill buys before the
//! books move.
//!
//! # Pipeline
//!
//! ```text
//! goal command -> score mutation -> opportunity selection
//!              -> adaptive pricing -> concurrent dispatch -> broadcast
//! ```
//!
//! Score mutation and opportunity selection happen atomically under one
//! lock; order batches run outside it, each order raced against its own
//! deadline. Failures and timeouts are logged per order and never block the
//! rest of the batch or the goal event.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`catalog`]: Match/market types and Gamma event resolution
//! - [`state`]: Current match and live score
//! - [`strategy`]: Opportunity selection and adaptive pricing
//! - [`execution`]: Order gateway and the batch dispatcher
//! - [`signing`]: Wallet signing and CLOB authentication
//! - [`server`]: Session, live channel and HTTP surface
//! - [`metrics`]: Prometheus metrics

pub mod catalog;
pub mod config;
pub mod error;
pub mod execution;
pub mod metrics;
pub mod server;
pub mod signing;
pub mod state;
pub mod strategy;
pub mod utils;

pub use config::Config;
pub use error::{Result, SniperError};
