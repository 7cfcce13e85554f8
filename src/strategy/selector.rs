//! Opportunity selection from the live score.

use rust_decimal::Decimal;
use tracing::debug;

use crate::catalog::{Market, Score};

/// A market whose settlement condition is satisfied by the live score and is
/// therefore a buy candidate for this goal event. Ephemeral: recomputed from
/// scratch on every goal.
#[derive(Debug, Clone)]
pub struct Opportunity {
    /// The market to buy into.
    pub market: Market,
    /// Human-readable condition label.
    pub condition: &'static str,
    /// YES price at selection time.
    pub yes_price: Decimal,
}

/// Select the markets in the money for this score, catalog order preserved.
///
/// Selection works off the absolute score, not score deltas: a market already
/// satisfied on a prior goal is selected again on every subsequent goal and a
/// duplicate order is submitted each time. One order attempt per goal event
/// is the intended behavior, not a per-transition trigger.
pub fn select(score: &Score, markets: &[Market]) -> Vec<Opportunity> {
    let selected: Vec<Opportunity> = markets
        .iter()
        .filter(|market| market.key.is_hit(score))
        .map(|market| Opportunity {
            market: market.clone(),
            condition: market.key.condition_label(),
            yes_price: market.yes_price,
        })
        .collect();

    debug!(
        local = score.local,
        visitante = score.visitante,
        candidates = markets.len(),
        selected = selected.len(),
        "opportunities selected"
    );

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{market_fixture, MarketKind};
    use rust_decimal_macros::dec;

    fn score(local: u32, visitante: u32) -> Score {
        Score { local, visitante }
    }

    fn all_markets() -> Vec<Market> {
        vec![
            market_fixture("m-btts", MarketKind::BothTeamsScore, dec!(0.55)),
            market_fixture("m-o15", MarketKind::Over15, dec!(0.40)),
            market_fixture("m-o25", MarketKind::Over25, dec!(0.30)),
            market_fixture("m-o35", MarketKind::Over35, dec!(0.20)),
            market_fixture("m-o45", MarketKind::Over45, dec!(0.10)),
        ]
    }

    #[test]
    fn nothing_selected_at_kickoff() {
        assert!(select(&score(0, 0), &all_markets()).is_empty());
    }

    #[test]
    fn one_sided_scoreline_never_selects_btts() {
        for s in [score(1, 0), score(0, 3), score(5, 0)] {
            let selected = select(&s, &all_markets());
            assert!(selected.iter().all(|o| o.market.key != MarketKind::BothTeamsScore));
        }
    }

    #[test]
    fn btts_selected_on_every_goal_once_both_have_scored() {
        for s in [score(1, 1), score(2, 1), score(3, 4)] {
            let selected = select(&s, &all_markets());
            assert!(selected.iter().any(|o| o.market.key == MarketKind::BothTeamsScore));
        }
    }

    #[test]
    fn over_lines_follow_total_goals() {
        // total = 3 selects over 1.5 and over 2.5 but not over 3.5
        let selected = select(&score(2, 1), &all_markets());
        let keys: Vec<MarketKind> = selected.iter().map(|o| o.market.key).collect();
        assert_eq!(
            keys,
            vec![
                MarketKind::BothTeamsScore,
                MarketKind::Over15,
                MarketKind::Over25
            ]
        );
    }

    #[test]
    fn catalog_order_is_preserved_not_price_order() {
        let markets = vec![
            market_fixture("cheap-o15", MarketKind::Over15, dec!(0.10)),
            market_fixture("dear-btts", MarketKind::BothTeamsScore, dec!(0.90)),
        ];
        let selected = select(&score(1, 1), &markets);
        let ids: Vec<&str> = selected.iter().map(|o| o.market.id.as_str()).collect();
        assert_eq!(ids, vec!["cheap-o15", "dear-btts"]);
    }

    #[test]
    fn reselection_happens_on_already_satisfied_conditions() {
        // the same condition keeps qualifying as the score grows; each goal
        // produces a fresh buy attempt by design
        let markets = vec![market_fixture("m-o15", MarketKind::Over15, dec!(0.40))];
        assert_eq!(select(&score(1, 1), &markets).len(), 1);
        assert_eq!(select(&score(2, 1), &markets).len(), 1);
        assert_eq!(select(&score(3, 1), &markets).len(), 1);
    }

    #[test]
    fn selection_captures_price_and_label() {
        let markets = vec![market_fixture("m-btts", MarketKind::BothTeamsScore, dec!(0.55))];
        let selected = select(&score(1, 1), &markets);
        assert_eq!(selected[0].yes_price, dec!(0.55));
        assert_eq!(selected[0].condition, "Ambos marcan");
    }
}
