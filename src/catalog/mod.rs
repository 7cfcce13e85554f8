//! Event catalog: match/market domain types and Gamma API resolution.
//!
//! This module handles:
//! - Match, market, score and team types
//! - The catalog resolver port and its Gamma implementation
//! - A scripted resolver for testing

pub mod mock;
pub mod resolver;
pub mod types;

pub use mock::{event_fixture, market_fixture, MockCatalog};
pub use resolver::{normalize_slug, CatalogResolver, GammaResolver};
pub use types::{Market, MarketKind, MatchEvent, Score, Team, Teams};
