//! The operator session: match state, observers, and command handling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, instrument, warn};

use super::protocol::{ClientCommand, ServerMessage, Snapshot};
use crate::catalog::{normalize_slug, CatalogResolver, Score, Team};
use crate::error::{CatalogError, StateError};
use crate::execution::{Dispatcher, OrderOutcome};
use crate::metrics;
use crate::state::MatchState;
use crate::strategy::{select, Opportunity};

/// Identifier of one connected observer.
pub type ObserverId = u64;

/// Error text shown when an event cannot be loaded, frozen for the console.
const LOAD_EVENT_ERROR: &str = "No se pudo cargar el evento. Verifica el slug.";

/// Everything one operator session owns: the loaded match and score behind a
/// single lock, the connected observers, and the injected collaborators.
///
/// Commands mutate state inside the write guard without ever holding it
/// across an await, so each goal's score-plus-selection snapshot is atomic
/// even while a previous goal's order batch is still in flight.
pub struct Session {
    resolver: Arc<dyn CatalogResolver>,
    dispatcher: Dispatcher,
    state: RwLock<MatchState>,
    observers: DashMap<ObserverId, mpsc::UnboundedSender<String>>,
    next_observer: AtomicU64,
}

impl Session {
    /// Create a session over its collaborators.
    pub fn new(resolver: Arc<dyn CatalogResolver>, dispatcher: Dispatcher) -> Self {
        Self {
            resolver,
            dispatcher,
            state: RwLock::new(MatchState::new()),
            observers: DashMap::new(),
            next_observer: AtomicU64::new(0),
        }
    }

    // === Observer registry ===

    /// Register an observer, returning its id and the outbound queue. The
    /// caller is expected to deliver the reattachment snapshot next.
    pub fn register_observer(&self) -> (ObserverId, mpsc::UnboundedReceiver<String>) {
        let id = self.next_observer.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.insert(id, tx);
        metrics::set_observers_connected(self.observers.len());
        (id, rx)
    }

    /// Drop an observer from the registry.
    pub fn deregister_observer(&self, id: ObserverId) {
        self.observers.remove(&id);
        metrics::set_observers_connected(self.observers.len());
    }

    /// Number of currently connected observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Push a message to one observer, fire-and-forget.
    pub fn send_to(&self, id: ObserverId, message: &ServerMessage) {
        if let Some(tx) = self.observers.get(&id) {
            let _ = tx.send(message.encode());
        }
    }

    /// Push the current snapshot to every observer. Observers whose channel
    /// has closed are skipped and pruned; they get a fresh snapshot when
    /// they reconnect.
    pub async fn broadcast_update(&self) {
        let encoded = ServerMessage::Update {
            data: self.snapshot().await,
        }
        .encode();

        self.observers.retain(|_, tx| tx.send(encoded.clone()).is_ok());
        metrics::set_observers_connected(self.observers.len());
    }

    /// The current match/score snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        let state = self.state.read().await;
        Snapshot {
            match_: state.current().cloned(),
            score: state.score(),
        }
    }

    /// The reattachment message for a newly connected observer.
    pub async fn reattachment_message(&self) -> ServerMessage {
        ServerMessage::CurrentMatch {
            data: self.snapshot().await,
        }
    }

    // === Commands ===

    /// Dispatch one inbound command, replying to the originating observer on
    /// user-facing errors.
    pub async fn handle_command(&self, observer: ObserverId, command: ClientCommand) {
        match command {
            ClientCommand::LoadEvent { slug } => {
                if let Err(err) = self.load_event(&slug).await {
                    warn!(slug = %slug, error = %err, "event load failed");
                    self.send_to(
                        observer,
                        &ServerMessage::Error {
                            message: LOAD_EVENT_ERROR.to_string(),
                        },
                    );
                }
            }
            ClientCommand::GoalLocal(args) => {
                if let Err(err) = self
                    .record_goal(Team::Local, args.quantity(), args.max_price())
                    .await
                {
                    self.send_error(observer, &err);
                }
            }
            ClientCommand::GoalVisitante(args) => {
                if let Err(err) = self
                    .record_goal(Team::Visitante, args.quantity(), args.max_price())
                    .await
                {
                    self.send_error(observer, &err);
                }
            }
            ClientCommand::UpdateScore { score } => self.set_score(score).await,
            ClientCommand::Reset => self.reset().await,
            ClientCommand::Unknown => debug!("unknown message type ignored"),
        }
    }

    /// Load an event and reset the score, then broadcast. Accepts a bare
    /// slug or a pasted event URL.
    #[instrument(skip(self))]
    pub async fn load_event(&self, slug: &str) -> Result<(), CatalogError> {
        let slug = normalize_slug(slug);
        let started = Instant::now();
        let event = self.resolver.resolve(&slug).await?;
        metrics::record_catalog_resolve_latency(started);

        info!(
            slug = %event.slug,
            markets = event.markets.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "event loaded"
        );

        {
            let mut state = self.state.write().await;
            state.load_match(event);
        }

        self.broadcast_update().await;
        Ok(())
    }

    /// Record a goal: mutate the score and snapshot the in-the-money markets
    /// atomically, dispatch the order batch, then broadcast the new state
    /// regardless of individual order outcomes.
    #[instrument(skip(self), fields(team = %team))]
    pub async fn record_goal(
        &self,
        team: Team,
        quantity: Decimal,
        max_price: Decimal,
    ) -> Result<Vec<OrderOutcome>, StateError> {
        let goal_started = Instant::now();

        let opportunities: Vec<Opportunity> = {
            let mut state = self.state.write().await;
            let score = state.record_goal(team)?;
            let markets = state
                .current()
                .map(|event| event.markets.as_slice())
                .unwrap_or(&[]);
            select(&score, markets)
            // guard drops here; the batch below runs outside the lock
        };

        metrics::add_opportunities_selected(opportunities.len());
        info!(selected = opportunities.len(), "opportunities for this goal");

        let outcomes = self
            .dispatcher
            .execute(opportunities, quantity, max_price)
            .await;

        metrics::record_goal_latency(goal_started);
        info!(
            elapsed_ms = goal_started.elapsed().as_millis() as u64,
            "goal handled"
        );

        self.broadcast_update().await;
        Ok(outcomes)
    }

    /// Cancel (VAR) a goal, then broadcast. Never touches orders already
    /// dispatched for conditions that are no longer true.
    pub async fn cancel_goal(&self, team: Team) -> Result<Score, StateError> {
        let score = {
            let mut state = self.state.write().await;
            state.cancel_goal(team)?
        };
        self.broadcast_update().await;
        Ok(score)
    }

    /// Overwrite the score verbatim, then broadcast.
    pub async fn set_score(&self, score: Score) {
        {
            let mut state = self.state.write().await;
            state.set_score(score);
        }
        self.broadcast_update().await;
    }

    /// Reset the score to 0-0, then broadcast. Has no effect on orders
    /// already dispatched.
    pub async fn reset(&self) {
        {
            let mut state = self.state.write().await;
            state.reset();
        }
        self.broadcast_update().await;
    }

    /// Slug of the loaded match, if any.
    pub async fn current_slug(&self) -> Option<String> {
        let state = self.state.read().await;
        state.current().map(|event| event.slug.clone())
    }

    fn send_error(&self, observer: ObserverId, err: &StateError) {
        warn!(error = %err, "command refused");
        self.send_to(
            observer,
            &ServerMessage::Error {
                message: err.to_string(),
            },
        );
    }
}
