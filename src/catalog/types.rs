//! Domain types for football match events and their conditional markets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Team side within a match. The wire tokens `local`/`visitante` are fixed
/// by the operator UI protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Team {
    /// Home team.
    Local,
    /// Away team.
    Visitante,
}

/// Live score of the current match. Counts can never go negative; a goal
/// cancellation at zero is refused before any mutation happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Goals scored by the home team.
    pub local: u32,
    /// Goals scored by the away team.
    pub visitante: u32,
}

impl Score {
    /// Total goals scored by both teams.
    pub fn total(&self) -> u32 {
        self.local + self.visitante
    }

    /// Goal count for one side.
    pub fn side(&self, team: Team) -> u32 {
        match team {
            Team::Local => self.local,
            Team::Visitante => self.visitante,
        }
    }

    /// Mutable goal count for one side.
    pub fn side_mut(&mut self, team: Team) -> &mut u32 {
        match team {
            Team::Local => &mut self.local,
            Team::Visitante => &mut self.visitante,
        }
    }
}

/// Classification of a conditional market. Wire keys (`btts`, `over_1_5`, ...)
/// are fixed by the operator UI protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum MarketKind {
    /// Both teams to score.
    #[serde(rename = "btts")]
    #[strum(serialize = "btts")]
    BothTeamsScore,
    /// More than 1.5 total goals.
    #[serde(rename = "over_1_5")]
    #[strum(serialize = "over_1_5")]
    Over15,
    /// More than 2.5 total goals.
    #[serde(rename = "over_2_5")]
    #[strum(serialize = "over_2_5")]
    Over25,
    /// More than 3.5 total goals.
    #[serde(rename = "over_3_5")]
    #[strum(serialize = "over_3_5")]
    Over35,
    /// More than 4.5 total goals.
    #[serde(rename = "over_4_5")]
    #[strum(serialize = "over_4_5")]
    Over45,
}

impl MarketKind {
    /// Classify a market from its question/title text. Returns `None` for
    /// markets this strategy does not trade; those never enter the model.
    pub fn from_title(title: &str) -> Option<Self> {
        let title = title.to_lowercase();

        if title.contains("both teams") || title.contains("ambos") || title.contains("btts") {
            return Some(MarketKind::BothTeamsScore);
        }
        if title.contains("over 1.5") || title.contains("más de 1.5") || title.contains("1,5") {
            return Some(MarketKind::Over15);
        }
        if title.contains("over 2.5") || title.contains("más de 2.5") || title.contains("2,5") {
            return Some(MarketKind::Over25);
        }
        if title.contains("over 3.5") || title.contains("más de 3.5") || title.contains("3,5") {
            return Some(MarketKind::Over35);
        }
        if title.contains("over 4.5") || title.contains("más de 4.5") || title.contains("4,5") {
            return Some(MarketKind::Over45);
        }

        None
    }

    /// Whether the market's settlement condition is satisfied by this score.
    pub fn is_hit(&self, score: &Score) -> bool {
        match self {
            MarketKind::BothTeamsScore => score.local > 0 && score.visitante > 0,
            MarketKind::Over15 => score.total() >= 2,
            MarketKind::Over25 => score.total() >= 3,
            MarketKind::Over35 => score.total() >= 4,
            MarketKind::Over45 => score.total() >= 5,
        }
    }

    /// Human-readable condition label shown in logs and order summaries.
    /// Matches the labels the operator console has always shown.
    pub fn condition_label(&self) -> &'static str {
        match self {
            MarketKind::BothTeamsScore => "Ambos marcan",
            MarketKind::Over15 => "Más de 1.5",
            MarketKind::Over25 => "Más de 2.5",
            MarketKind::Over35 => "Más de 3.5",
            MarketKind::Over45 => "Más de 4.5",
        }
    }
}

/// A tradable conditional market. Only markets whose pair of outcome token
/// ids resolved successfully are retained at catalog-resolution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// Venue market identifier.
    pub id: String,
    /// Market classification.
    pub key: MarketKind,
    /// Market question text.
    pub title: String,
    /// On-chain condition identifier, when present.
    pub condition_id: Option<String>,
    /// Token id for the YES outcome.
    pub yes_token_id: String,
    /// Token id for the NO outcome.
    pub no_token_id: String,
    /// Current YES price, in (0, 1].
    pub yes_price: Decimal,
    /// Current NO price, in (0, 1].
    pub no_price: Decimal,
}

/// Team labels for the loaded match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teams {
    /// Home team label.
    pub local: String,
    /// Away team label.
    pub visitante: String,
}

/// A loaded match event: slug, team labels and its tradable markets, in
/// catalog order. Immutable once loaded except by a full reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Event slug.
    pub slug: String,
    /// Team labels.
    pub teams: Teams,
    /// Tradable markets, catalog order preserved.
    pub markets: Vec<Market>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn score(local: u32, visitante: u32) -> Score {
        Score { local, visitante }
    }

    #[test]
    fn kind_from_title_classifies_known_markets() {
        assert_eq!(
            MarketKind::from_title("Will both teams score?"),
            Some(MarketKind::BothTeamsScore)
        );
        assert_eq!(
            MarketKind::from_title("Over 1.5 goals in the match?"),
            Some(MarketKind::Over15)
        );
        assert_eq!(
            MarketKind::from_title("Más de 2.5 goles"),
            Some(MarketKind::Over25)
        );
        assert_eq!(MarketKind::from_title("Over 3.5 goals"), Some(MarketKind::Over35));
        assert_eq!(MarketKind::from_title("Over 4.5 goals"), Some(MarketKind::Over45));
    }

    #[test]
    fn kind_from_title_rejects_unrecognized_markets() {
        assert_eq!(MarketKind::from_title("Who wins the match?"), None);
        assert_eq!(MarketKind::from_title("First goalscorer"), None);
    }

    #[test]
    fn btts_requires_both_sides_on_the_scoresheet() {
        assert!(!MarketKind::BothTeamsScore.is_hit(&score(0, 0)));
        assert!(!MarketKind::BothTeamsScore.is_hit(&score(3, 0)));
        assert!(!MarketKind::BothTeamsScore.is_hit(&score(0, 2)));
        assert!(MarketKind::BothTeamsScore.is_hit(&score(1, 1)));
        assert!(MarketKind::BothTeamsScore.is_hit(&score(4, 1)));
    }

    #[test]
    fn over_lines_trigger_on_total_goals() {
        // total = 3 satisfies over 1.5 and over 2.5 but not over 3.5
        let s = score(2, 1);
        assert!(MarketKind::Over15.is_hit(&s));
        assert!(MarketKind::Over25.is_hit(&s));
        assert!(!MarketKind::Over35.is_hit(&s));
        assert!(!MarketKind::Over45.is_hit(&s));

        assert!(!MarketKind::Over15.is_hit(&score(1, 0)));
        assert!(MarketKind::Over15.is_hit(&score(1, 1)));
        assert!(MarketKind::Over45.is_hit(&score(5, 0)));
    }

    #[test]
    fn wire_keys_are_stable() {
        let json = serde_json::to_string(&MarketKind::BothTeamsScore).unwrap();
        assert_eq!(json, "\"btts\"");
        let json = serde_json::to_string(&MarketKind::Over15).unwrap();
        assert_eq!(json, "\"over_1_5\"");

        let kind: MarketKind = serde_json::from_str("\"over_4_5\"").unwrap();
        assert_eq!(kind, MarketKind::Over45);
    }

    #[test]
    fn team_tokens_are_stable() {
        assert_eq!(serde_json::to_string(&Team::Local).unwrap(), "\"local\"");
        assert_eq!(
            serde_json::to_string(&Team::Visitante).unwrap(),
            "\"visitante\""
        );
        assert_eq!(Team::Visitante.to_string(), "visitante");
    }

    #[test]
    fn market_serializes_with_camel_case_fields() {
        let market = Market {
            id: "1".to_string(),
            key: MarketKind::Over15,
            title: "Over 1.5 goals".to_string(),
            condition_id: Some("0xc0ffee".to_string()),
            yes_token_id: "yes-token".to_string(),
            no_token_id: "no-token".to_string(),
            yes_price: dec!(0.40),
            no_price: dec!(0.60),
        };

        let value = serde_json::to_value(&market).unwrap();
        assert_eq!(value["key"], "over_1_5");
        assert_eq!(value["yesTokenId"], "yes-token");
        assert_eq!(value["noTokenId"], "no-token");
        assert!(value["yesPrice"].is_string() || value["yesPrice"].is_number());
        assert_eq!(value["conditionId"], "0xc0ffee");
    }

    #[test]
    fn score_side_accessors() {
        let mut s = score(1, 2);
        assert_eq!(s.side(Team::Local), 1);
        assert_eq!(s.side(Team::Visitante), 2);
        assert_eq!(s.total(), 3);

        *s.side_mut(Team::Local) += 1;
        assert_eq!(s.local, 2);
    }
}
