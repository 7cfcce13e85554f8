//! Current match and live score, mutated only by the session's command task.

use tracing::info;

use crate::catalog::{MatchEvent, Score, Team};
use crate::error::StateError;

/// The currently loaded match and its live score.
///
/// Plain state with no interior locking: the owning session wraps it in a
/// single `RwLock` and never holds the guard across an await point, which is
/// what keeps each goal's score-and-selection snapshot atomic.
#[derive(Debug, Default)]
pub struct MatchState {
    current: Option<MatchEvent>,
    score: Score,
}

impl MatchState {
    /// Create empty state: no match loaded, score 0-0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current match and reset the score to 0-0, discarding any
    /// prior score regardless of the previous match's state.
    pub fn load_match(&mut self, event: MatchEvent) {
        info!(
            slug = %event.slug,
            local = %event.teams.local,
            visitante = %event.teams.visitante,
            markets = event.markets.len(),
            "match loaded"
        );
        self.current = Some(event);
        self.score = Score::default();
    }

    /// Record a goal for a team, returning the new score. Refused when no
    /// match is loaded.
    pub fn record_goal(&mut self, team: Team) -> Result<Score, StateError> {
        if self.current.is_none() {
            return Err(StateError::NoMatchLoaded);
        }

        *self.score.side_mut(team) += 1;
        info!(
            team = %team,
            local = self.score.local,
            visitante = self.score.visitante,
            "goal recorded"
        );
        Ok(self.score)
    }

    /// Cancel (VAR) a goal for a team, returning the new score. Refused when
    /// that team has no goals; the score is left untouched.
    pub fn cancel_goal(&mut self, team: Team) -> Result<Score, StateError> {
        if self.score.side(team) == 0 {
            return Err(StateError::ScoreAtZero { team });
        }

        *self.score.side_mut(team) -= 1;
        info!(
            team = %team,
            local = self.score.local,
            visitante = self.score.visitante,
            "goal cancelled"
        );
        Ok(self.score)
    }

    /// Overwrite the score directly (wire `updateScore`; the operator console
    /// computes VAR corrections client-side and ships the whole score).
    pub fn set_score(&mut self, score: Score) {
        self.score = score;
    }

    /// Reset the score to 0-0 without touching the loaded match.
    pub fn reset(&mut self) {
        self.score = Score::default();
        info!("score reset");
    }

    /// The live score.
    pub fn score(&self) -> Score {
        self.score
    }

    /// The currently loaded match, if any.
    pub fn current(&self) -> Option<&MatchEvent> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{event_fixture, market_fixture, MarketKind};
    use rust_decimal_macros::dec;

    fn loaded_state() -> MatchState {
        let mut state = MatchState::new();
        state.load_match(event_fixture(
            "team-a-vs-team-b",
            vec![market_fixture("m1", MarketKind::Over15, dec!(0.40))],
        ));
        state
    }

    #[test]
    fn goals_increment_the_right_side() {
        let mut state = loaded_state();
        assert_eq!(state.record_goal(Team::Local).unwrap(), Score { local: 1, visitante: 0 });
        assert_eq!(state.record_goal(Team::Visitante).unwrap(), Score { local: 1, visitante: 1 });
        assert_eq!(state.record_goal(Team::Local).unwrap(), Score { local: 2, visitante: 1 });
    }

    #[test]
    fn goal_without_loaded_match_is_refused() {
        let mut state = MatchState::new();
        assert!(matches!(
            state.record_goal(Team::Local),
            Err(StateError::NoMatchLoaded)
        ));
        assert_eq!(state.score(), Score::default());
    }

    #[test]
    fn cancelling_at_zero_is_refused_and_changes_nothing() {
        let mut state = loaded_state();
        state.record_goal(Team::Local).unwrap();

        let err = state.cancel_goal(Team::Visitante).unwrap_err();
        assert!(matches!(err, StateError::ScoreAtZero { team: Team::Visitante }));
        assert_eq!(state.score(), Score { local: 1, visitante: 0 });
    }

    #[test]
    fn cancelling_decrements_one_goal() {
        let mut state = loaded_state();
        state.record_goal(Team::Local).unwrap();
        state.record_goal(Team::Local).unwrap();

        assert_eq!(
            state.cancel_goal(Team::Local).unwrap(),
            Score { local: 1, visitante: 0 }
        );
    }

    #[test]
    fn loading_a_match_always_resets_the_score() {
        let mut state = loaded_state();
        state.record_goal(Team::Local).unwrap();
        state.record_goal(Team::Visitante).unwrap();

        state.load_match(event_fixture("another-match", vec![]));
        assert_eq!(state.score(), Score::default());
        assert_eq!(state.current().unwrap().slug, "another-match");
    }

    #[test]
    fn reset_zeroes_the_score_but_keeps_the_match() {
        let mut state = loaded_state();
        state.record_goal(Team::Local).unwrap();

        state.reset();
        assert_eq!(state.score(), Score::default());
        assert!(state.current().is_some());
    }

    #[test]
    fn set_score_overwrites_verbatim() {
        let mut state = loaded_state();
        state.set_score(Score { local: 3, visitante: 2 });
        assert_eq!(state.score(), Score { local: 3, visitante: 2 });
    }
}
