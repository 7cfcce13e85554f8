//! Event catalog resolution against the Polymarket Gamma API.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::types::{Market, MarketKind, MatchEvent, Teams};
use crate::config::Config;
use crate::error::CatalogError;

/// Fallback price when outcome prices cannot be decoded.
fn default_price() -> Decimal {
    Decimal::new(5, 1) // 0.5
}

/// Port for turning an event slug into a structured match with tradable
/// markets. Injected into the session so tests substitute a scripted double.
#[async_trait]
pub trait CatalogResolver: Send + Sync {
    /// Resolve an event slug into a match with its tradable markets.
    async fn resolve(&self, slug: &str) -> Result<MatchEvent, CatalogError>;
}

/// Raw market payload from the Gamma API.
#[derive(Debug, Clone, Deserialize)]
struct GammaMarket {
    /// Market identifier.
    id: Option<String>,
    /// Market question text.
    question: Option<String>,
    /// Alternate title field.
    title: Option<String>,
    /// Slug of the parent event.
    #[serde(rename = "eventSlug")]
    event_slug: Option<String>,
    /// On-chain condition identifier.
    #[serde(rename = "conditionId")]
    condition_id: Option<String>,
    /// Outcome token ids, a JSON-encoded string like `"[\"123\", \"456\"]"`.
    #[serde(rename = "clobTokenIds")]
    clob_token_ids: Option<Value>,
    /// Outcome prices; string, array or object depending on endpoint vintage.
    #[serde(rename = "outcomePrices")]
    outcome_prices: Option<Value>,
}

/// Raw event payload from the Gamma API.
#[derive(Debug, Clone, Deserialize)]
struct GammaEvent {
    /// Home team identifier.
    #[serde(rename = "teamAID")]
    team_a_id: Option<String>,
    /// Away team identifier.
    #[serde(rename = "teamBID")]
    team_b_id: Option<String>,
    /// Outcome labels, used as team names when team ids are absent.
    outcomes: Option<Value>,
}

/// Catalog resolver backed by the Gamma REST API.
#[derive(Debug, Clone)]
pub struct GammaResolver {
    http: reqwest::Client,
    gamma_url: String,
}

impl GammaResolver {
    /// Create a resolver from config.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.http_timeout_ms.max(5000)))
            .connect_timeout(std::time::Duration::from_millis(500))
            .tcp_nodelay(true)
            .pool_max_idle_per_host(config.http_pool_size)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            gamma_url: config.gamma_url.clone(),
        }
    }
}

#[async_trait]
impl CatalogResolver for GammaResolver {
    #[instrument(skip(self))]
    async fn resolve(&self, slug: &str) -> Result<MatchEvent, CatalogError> {
        let slug = slug.to_string();

        let url = format!("{}/markets", self.gamma_url);
        let raw_markets: Vec<GammaMarket> = self
            .http
            .get(&url)
            .query(&[("slug", slug.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CatalogError::Parse(format!("markets response: {e}")))?;

        if raw_markets.is_empty() {
            return Err(CatalogError::NoMarketsFound { slug });
        }

        // The first market carries the parent event slug.
        let event_slug = raw_markets[0]
            .event_slug
            .clone()
            .unwrap_or_else(|| slug.clone());

        let url = format!("{}/events", self.gamma_url);
        let events: Vec<GammaEvent> = self
            .http
            .get(&url)
            .query(&[("slug", event_slug.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CatalogError::Parse(format!("events response: {e}")))?;

        let event = events
            .first()
            .ok_or_else(|| CatalogError::EventNotFound {
                slug: event_slug.clone(),
            })?;

        let teams = extract_teams(event);
        let total = raw_markets.len();
        let markets: Vec<Market> = raw_markets.into_iter().filter_map(parse_market).collect();

        info!(
            slug = %event_slug,
            local = %teams.local,
            visitante = %teams.visitante,
            markets = markets.len(),
            skipped = total - markets.len(),
            "event resolved"
        );

        Ok(MatchEvent {
            slug: event_slug,
            teams,
            markets,
        })
    }
}

/// Accept either a bare slug or a full polymarket.com event URL.
pub fn normalize_slug(input: &str) -> String {
    static EVENT_URL: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"/event/([a-z0-9\-]+)").expect("valid regex"));

    let input = input.trim();
    if let Some(captures) = EVENT_URL.captures(input) {
        return captures[1].to_string();
    }
    input.to_string()
}

/// Extract team labels: explicit team ids, then the event outcome pair,
/// then generic placeholders.
fn extract_teams(event: &GammaEvent) -> Teams {
    if let (Some(a), Some(b)) = (&event.team_a_id, &event.team_b_id) {
        return Teams {
            local: a.clone(),
            visitante: b.clone(),
        };
    }

    if let Some(outcomes) = event.outcomes.as_ref().and_then(decode_string_array) {
        if outcomes.len() >= 2 {
            return Teams {
                local: outcomes[0].clone(),
                visitante: outcomes[1].clone(),
            };
        }
    }

    Teams {
        local: "Team A".to_string(),
        visitante: "Team B".to_string(),
    }
}

/// Turn one raw catalog entry into a tradable market, or drop it.
///
/// A market is retained only when it classifies to a known kind AND both
/// outcome token ids decode; anything else is skipped without failing the
/// batch. Undecodable prices fall back to 0.5.
fn parse_market(raw: GammaMarket) -> Option<Market> {
    let title = raw
        .question
        .clone()
        .or_else(|| raw.title.clone())
        .unwrap_or_default();

    let key = MarketKind::from_title(&title)?;

    let id = raw.id.unwrap_or_default();
    let tokens = raw.clob_token_ids.as_ref().and_then(decode_string_array);
    let Some(tokens) = tokens.filter(|t| t.len() >= 2) else {
        warn!(market = %id, "missing or undecodable outcome token ids, market skipped");
        return None;
    };

    let (yes_price, no_price) = parse_outcome_prices(raw.outcome_prices.as_ref());

    debug!(market = %id, key = %key, yes_price = %yes_price, "market retained");

    Some(Market {
        id,
        key,
        title,
        condition_id: raw.condition_id,
        yes_token_id: tokens[0].clone(),
        no_token_id: tokens[1].clone(),
        yes_price,
        no_price,
    })
}

/// Decode a value that is either a JSON array of strings or a JSON-encoded
/// string containing one (the Gamma API ships both shapes).
fn decode_string_array(value: &Value) -> Option<Vec<String>> {
    let array = match value {
        Value::Array(items) => items.clone(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };

    Some(
        array
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .collect(),
    )
}

/// Decode the yes/no settlement prices, falling back to 0.5 each when the
/// payload is missing or malformed.
fn parse_outcome_prices(value: Option<&Value>) -> (Decimal, Decimal) {
    let fallback = (default_price(), default_price());

    let Some(value) = value else {
        return fallback;
    };

    let parse = |v: &Value| -> Option<Decimal> {
        match v {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.to_string().parse().ok(),
            _ => None,
        }
    };

    match value {
        Value::Array(items) if items.len() >= 2 => (
            parse(&items[0]).unwrap_or_else(default_price),
            parse(&items[1]).unwrap_or_else(default_price),
        ),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) if items.len() >= 2 => (
                parse(&items[0]).unwrap_or_else(default_price),
                parse(&items[1]).unwrap_or_else(default_price),
            ),
            _ => fallback,
        },
        Value::Object(map) => (
            map.get("yes").and_then(parse).unwrap_or_else(default_price),
            map.get("no").and_then(parse).unwrap_or_else(default_price),
        ),
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn raw_market(question: &str, clob_token_ids: Option<Value>) -> GammaMarket {
        GammaMarket {
            id: Some("42".to_string()),
            question: Some(question.to_string()),
            title: None,
            event_slug: Some("team-a-vs-team-b".to_string()),
            condition_id: Some("0xabc".to_string()),
            clob_token_ids,
            outcome_prices: Some(json!("[\"0.40\", \"0.60\"]")),
        }
    }

    #[test]
    fn normalize_slug_extracts_from_event_url() {
        assert_eq!(
            normalize_slug("https://polymarket.com/event/team-a-vs-team-b?tid=7"),
            "team-a-vs-team-b"
        );
        assert_eq!(normalize_slug("  team-a-vs-team-b "), "team-a-vs-team-b");
    }

    #[test]
    fn parse_market_keeps_well_formed_entries() {
        let market = parse_market(raw_market(
            "Over 1.5 goals?",
            Some(json!("[\"111\", \"222\"]")),
        ))
        .unwrap();

        assert_eq!(market.key, MarketKind::Over15);
        assert_eq!(market.yes_token_id, "111");
        assert_eq!(market.no_token_id, "222");
        assert_eq!(market.yes_price, dec!(0.40));
        assert_eq!(market.no_price, dec!(0.60));
    }

    #[test]
    fn parse_market_drops_entries_with_fewer_than_two_tokens() {
        assert!(parse_market(raw_market("Over 1.5 goals?", Some(json!("[\"111\"]")))).is_none());
        assert!(parse_market(raw_market("Over 1.5 goals?", None)).is_none());
        assert!(parse_market(raw_market("Over 1.5 goals?", Some(json!("not json")))).is_none());
    }

    #[test]
    fn parse_market_drops_unrecognized_kinds() {
        assert!(parse_market(raw_market(
            "Who wins the cup?",
            Some(json!("[\"111\", \"222\"]"))
        ))
        .is_none());
    }

    #[test]
    fn parse_market_accepts_plain_token_arrays() {
        let market =
            parse_market(raw_market("btts", Some(json!(["111", "222"])))).unwrap();
        assert_eq!(market.key, MarketKind::BothTeamsScore);
        assert_eq!(market.yes_token_id, "111");
    }

    #[test]
    fn outcome_prices_fall_back_to_even_odds() {
        assert_eq!(
            parse_outcome_prices(None),
            (dec!(0.5), dec!(0.5))
        );
        assert_eq!(
            parse_outcome_prices(Some(&json!("garbage"))),
            (dec!(0.5), dec!(0.5))
        );
        assert_eq!(
            parse_outcome_prices(Some(&json!(["0.35", "0.65"]))),
            (dec!(0.35), dec!(0.65))
        );
        assert_eq!(
            parse_outcome_prices(Some(&json!({"yes": "0.7", "no": "0.3"}))),
            (dec!(0.7), dec!(0.3))
        );
    }

    #[test]
    fn extract_teams_prefers_team_ids() {
        let event = GammaEvent {
            team_a_id: Some("Madrid".to_string()),
            team_b_id: Some("Barcelona".to_string()),
            outcomes: Some(json!(["X", "Y"])),
        };
        let teams = extract_teams(&event);
        assert_eq!(teams.local, "Madrid");
        assert_eq!(teams.visitante, "Barcelona");
    }

    #[test]
    fn extract_teams_falls_back_to_outcomes_then_placeholders() {
        let event = GammaEvent {
            team_a_id: None,
            team_b_id: None,
            outcomes: Some(json!("[\"Rivers\", \"Boca\"]")),
        };
        let teams = extract_teams(&event);
        assert_eq!(teams.local, "Rivers");
        assert_eq!(teams.visitante, "Boca");

        let bare = GammaEvent {
            team_a_id: None,
            team_b_id: None,
            outcomes: None,
        };
        let teams = extract_teams(&bare);
        assert_eq!(teams.local, "Team A");
        assert_eq!(teams.visitante, "Team B");
    }
}
