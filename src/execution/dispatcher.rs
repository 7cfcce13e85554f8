//! Concurrent, deadline-bounded batch dispatch of goal-triggered orders.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use super::gateway::OrderGateway;
use super::order::{OrderOutcome, OrderParams, OutcomeStatus};
use crate::metrics;
use crate::strategy::{adaptive_price, Opportunity};

/// Dispatches one buy order per selected opportunity, all concurrently, each
/// bounded by an independent deadline.
pub struct Dispatcher {
    gateway: Arc<dyn OrderGateway>,
    timeout: Duration,
}

impl Dispatcher {
    /// Create a dispatcher over a gateway with a per-order deadline.
    pub fn new(gateway: Arc<dyn OrderGateway>, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    /// Submit the batch for one goal event and wait for every race to
    /// settle.
    ///
    /// Each opportunity becomes a fill-or-kill BUY on its yes token at the
    /// adaptive price for its batch position. Submissions run as detached
    /// tasks raced against the deadline: a deadline miss yields a timeout
    /// outcome for that order only, while the in-flight request keeps
    /// running and its late response is discarded (no cancel is sent to the
    /// venue). One order's failure never delays the others. Outcomes are
    /// logged and counted here; callers get them back for inspection but
    /// nothing downstream depends on them.
    #[instrument(skip(self, opportunities), fields(batch = opportunities.len()))]
    pub async fn execute(
        &self,
        opportunities: Vec<Opportunity>,
        quantity: Decimal,
        ceiling: Decimal,
    ) -> Vec<OrderOutcome> {
        if opportunities.is_empty() {
            return Vec::new();
        }

        let batch_started = Instant::now();
        info!(batch = opportunities.len(), %quantity, %ceiling, "dispatching order batch");

        let races = opportunities.into_iter().enumerate().map(|(position, opportunity)| {
            let gateway = Arc::clone(&self.gateway);
            let deadline = self.timeout;

            async move {
                let price = adaptive_price(opportunity.yes_price, ceiling, position);
                let params =
                    OrderParams::buy(opportunity.market.yes_token_id.clone(), price, quantity);

                info!(
                    position,
                    condition = opportunity.condition,
                    market_price = %opportunity.yes_price,
                    submitted_price = %price,
                    %quantity,
                    "order prepared"
                );

                let order_started = Instant::now();
                // Detached: if the deadline fires first the task keeps
                // running and its result is dropped.
                let in_flight = tokio::spawn(async move { gateway.submit(params).await });

                let status = match tokio::time::timeout(deadline, in_flight).await {
                    Ok(Ok(Ok(receipt))) => {
                        metrics::inc_orders_submitted();
                        metrics::record_order_submit_latency(order_started);
                        info!(
                            position,
                            order_id = %receipt.order_id,
                            elapsed_ms = order_started.elapsed().as_millis() as u64,
                            "order accepted"
                        );
                        OutcomeStatus::Submitted {
                            order_id: receipt.order_id,
                        }
                    }
                    Ok(Ok(Err(err))) => {
                        metrics::inc_orders_rejected();
                        warn!(position, error = %err, "order rejected");
                        OutcomeStatus::Rejected {
                            reason: err.to_string(),
                        }
                    }
                    Ok(Err(join_err)) => {
                        metrics::inc_orders_rejected();
                        error!(position, error = %join_err, "submission task failed");
                        OutcomeStatus::Rejected {
                            reason: format!("submission task failed: {join_err}"),
                        }
                    }
                    Err(_) => {
                        metrics::inc_orders_timed_out();
                        warn!(
                            position,
                            timeout_ms = deadline.as_millis() as u64,
                            "order timed out, abandoning in-flight request"
                        );
                        OutcomeStatus::TimedOut
                    }
                };

                OrderOutcome {
                    condition: opportunity.condition,
                    token_id: opportunity.market.yes_token_id,
                    submitted_price: price,
                    status,
                }
            }
        });

        let outcomes = join_all(races).await;

        let submitted = outcomes.iter().filter(|o| o.is_submitted()).count();
        let timed_out = outcomes.iter().filter(|o| o.is_timed_out()).count();
        info!(
            total = outcomes.len(),
            submitted,
            timed_out,
            rejected = outcomes.len() - submitted - timed_out,
            elapsed_ms = batch_started.elapsed().as_millis() as u64,
            "batch settled"
        );

        outcomes
    }
}
