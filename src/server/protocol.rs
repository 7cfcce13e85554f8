//! The live-channel wire protocol.
//!
//! Field names, message types and the `local`/`visitante` team tokens are
//! frozen: the deployed operator console speaks exactly this shape.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::catalog::{MatchEvent, Score};

/// Default order quantity when the console omits or garbles it.
pub fn default_quantity() -> Decimal {
    Decimal::ONE
}

/// Default price ceiling when the console omits or garbles it.
pub fn default_max_price() -> Decimal {
    Decimal::new(95, 2) // 0.95
}

/// Goal command arguments. The console historically ships these as numbers
/// or strings, so both are accepted; anything unparseable falls back to the
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalArgs {
    /// Shares to buy per order.
    #[serde(default, deserialize_with = "flexible_decimal")]
    pub quantity: Option<Decimal>,
    /// Operator price ceiling per order.
    #[serde(default, rename = "maxPrice", deserialize_with = "flexible_decimal")]
    pub max_price: Option<Decimal>,
}

impl GoalArgs {
    /// Effective quantity.
    pub fn quantity(&self) -> Decimal {
        self.quantity.unwrap_or_else(default_quantity)
    }

    /// Effective price ceiling.
    pub fn max_price(&self) -> Decimal {
        self.max_price.unwrap_or_else(default_max_price)
    }
}

/// Inbound operator commands.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ClientCommand {
    /// Load an event by slug or full event URL.
    #[serde(rename = "loadEvent")]
    LoadEvent {
        /// Event slug or URL.
        slug: String,
    },
    /// Goal for the home team.
    #[serde(rename = "goalLocal")]
    GoalLocal(GoalArgs),
    /// Goal for the away team.
    #[serde(rename = "goalVisitante")]
    GoalVisitante(GoalArgs),
    /// Overwrite the score (the console ships VAR corrections this way).
    #[serde(rename = "updateScore")]
    UpdateScore {
        /// The full replacement score.
        score: Score,
    },
    /// Reset the score to 0-0.
    #[serde(rename = "reset")]
    Reset,
    /// Anything else: logged and ignored.
    #[serde(other)]
    Unknown,
}

/// Snapshot of the loaded match and live score.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// The loaded match, if any.
    #[serde(rename = "match")]
    pub match_: Option<MatchEvent>,
    /// The live score.
    pub score: Score,
}

/// Outbound messages to observers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Reattachment snapshot sent on registration.
    #[serde(rename = "currentMatch")]
    CurrentMatch {
        /// Current match/score snapshot.
        data: Snapshot,
    },
    /// State-change broadcast.
    #[serde(rename = "update")]
    Update {
        /// Current match/score snapshot.
        data: Snapshot,
    },
    /// User-facing error, delivered to the originating observer only.
    #[serde(rename = "error")]
    Error {
        /// Error text.
        message: String,
    },
}

impl ServerMessage {
    /// Encode for the wire.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("server message serializes")
    }
}

/// Accept a decimal shipped as a JSON number or string; anything else (or an
/// unparseable value) becomes `None` so the caller's default applies.
fn flexible_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{event_fixture, market_fixture, MarketKind};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn load_event_parses() {
        let cmd: ClientCommand =
            serde_json::from_str(r#"{"type":"loadEvent","slug":"team-a-vs-team-b"}"#).unwrap();
        assert!(matches!(cmd, ClientCommand::LoadEvent { slug } if slug == "team-a-vs-team-b"));
    }

    #[test]
    fn goal_accepts_numeric_and_string_arguments() {
        let cmd: ClientCommand =
            serde_json::from_str(r#"{"type":"goalLocal","quantity":2,"maxPrice":"0.8"}"#).unwrap();
        let ClientCommand::GoalLocal(args) = cmd else {
            panic!("wrong variant");
        };
        assert_eq!(args.quantity(), dec!(2));
        assert_eq!(args.max_price(), dec!(0.8));
    }

    #[test]
    fn goal_defaults_apply_when_arguments_are_missing_or_garbled() {
        let cmd: ClientCommand =
            serde_json::from_str(r#"{"type":"goalVisitante"}"#).unwrap();
        let ClientCommand::GoalVisitante(args) = cmd else {
            panic!("wrong variant");
        };
        assert_eq!(args.quantity(), dec!(1));
        assert_eq!(args.max_price(), dec!(0.95));

        let cmd: ClientCommand =
            serde_json::from_str(r#"{"type":"goalLocal","quantity":"lots","maxPrice":null}"#)
                .unwrap();
        let ClientCommand::GoalLocal(args) = cmd else {
            panic!("wrong variant");
        };
        assert_eq!(args.quantity(), dec!(1));
        assert_eq!(args.max_price(), dec!(0.95));
    }

    #[test]
    fn update_score_carries_both_team_tokens() {
        let cmd: ClientCommand = serde_json::from_str(
            r#"{"type":"updateScore","score":{"local":2,"visitante":1}}"#,
        )
        .unwrap();
        let ClientCommand::UpdateScore { score } = cmd else {
            panic!("wrong variant");
        };
        assert_eq!(score, Score { local: 2, visitante: 1 });
    }

    #[test]
    fn negative_scores_fail_to_parse() {
        let result: Result<ClientCommand, _> = serde_json::from_str(
            r#"{"type":"updateScore","score":{"local":-1,"visitante":0}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_message_types_map_to_unknown() {
        let cmd: ClientCommand = serde_json::from_str(r#"{"type":"selfDestruct"}"#).unwrap();
        assert!(matches!(cmd, ClientCommand::Unknown));
    }

    #[test]
    fn update_envelope_has_the_frozen_shape() {
        let event = event_fixture(
            "team-a-vs-team-b",
            vec![market_fixture("m1", MarketKind::Over15, dec!(0.40))],
        );
        let message = ServerMessage::Update {
            data: Snapshot {
                match_: Some(event),
                score: Score { local: 1, visitante: 0 },
            },
        };

        let value: Value = serde_json::from_str(&message.encode()).unwrap();
        assert_eq!(value["type"], "update");
        assert_eq!(value["data"]["score"]["local"], 1);
        assert_eq!(value["data"]["score"]["visitante"], 0);
        assert_eq!(value["data"]["match"]["slug"], "team-a-vs-team-b");
        assert_eq!(value["data"]["match"]["markets"][0]["key"], "over_1_5");
    }

    #[test]
    fn empty_snapshot_serializes_match_as_null() {
        let message = ServerMessage::CurrentMatch {
            data: Snapshot {
                match_: None,
                score: Score::default(),
            },
        };
        let value: Value = serde_json::from_str(&message.encode()).unwrap();
        assert_eq!(value["type"], "currentMatch");
        assert!(value["data"]["match"].is_null());
    }

    #[test]
    fn error_envelope_carries_message_text() {
        let message = ServerMessage::Error {
            message: "no event loaded".to_string(),
        };
        let value: Value = serde_json::from_str(&message.encode()).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["message"], "no event loaded");
    }
}
