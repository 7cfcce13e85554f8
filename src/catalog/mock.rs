//! Scripted catalog resolver for unit and pipeline testing.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::resolver::CatalogResolver;
use super::types::{Market, MarketKind, MatchEvent, Teams};
use crate::error::CatalogError;

/// Scripted resolver returning pre-built events, with optional latency.
#[derive(Debug, Default)]
pub struct MockCatalog {
    events: HashMap<String, MatchEvent>,
    latency_ms: u64,
}

impl MockCatalog {
    /// Create an empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event under its slug.
    pub fn with_event(mut self, event: MatchEvent) -> Self {
        self.events.insert(event.slug.clone(), event);
        self
    }

    /// Add simulated resolution latency.
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

#[async_trait]
impl CatalogResolver for MockCatalog {
    async fn resolve(&self, slug: &str) -> Result<MatchEvent, CatalogError> {
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }

        self.events
            .get(slug)
            .cloned()
            .ok_or_else(|| CatalogError::NoMarketsFound {
                slug: slug.to_string(),
            })
    }
}

/// Build a market fixture with sensible defaults for tests.
pub fn market_fixture(id: &str, key: MarketKind, yes_price: Decimal) -> Market {
    Market {
        id: id.to_string(),
        key,
        title: key.condition_label().to_string(),
        condition_id: None,
        yes_token_id: format!("{id}-yes"),
        no_token_id: format!("{id}-no"),
        yes_price,
        no_price: Decimal::ONE - yes_price,
    }
}

/// Build a two-team event fixture from markets, catalog order preserved.
pub fn event_fixture(slug: &str, markets: Vec<Market>) -> MatchEvent {
    MatchEvent {
        slug: slug.to_string(),
        teams: Teams {
            local: "Team A".to_string(),
            visitante: "Team B".to_string(),
        },
        markets,
    }
}
