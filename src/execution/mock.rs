//! Scripted order gateway for unit and pipeline testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::gateway::OrderGateway;
use super::order::{OrderParams, OrderReceipt};
use crate::error::GatewayError;

/// Scripted gateway recording every submission, with per-token latencies and
/// rejections.
#[derive(Debug, Default)]
pub struct MockGateway {
    latencies: HashMap<String, Duration>,
    rejections: HashMap<String, String>,
    submissions: Mutex<Vec<OrderParams>>,
    counter: AtomicU64,
}

impl MockGateway {
    /// Create a gateway that accepts everything instantly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay submissions for one token.
    pub fn with_latency(mut self, token_id: impl Into<String>, latency: Duration) -> Self {
        self.latencies.insert(token_id.into(), latency);
        self
    }

    /// Reject submissions for one token.
    pub fn with_rejection(mut self, token_id: impl Into<String>, reason: impl Into<String>) -> Self {
        self.rejections.insert(token_id.into(), reason.into());
        self
    }

    /// Every order that reached the gateway, in arrival order.
    pub fn submissions(&self) -> Vec<OrderParams> {
        self.submissions.lock().expect("submissions lock").clone()
    }
}

#[async_trait]
impl OrderGateway for MockGateway {
    async fn submit(&self, params: OrderParams) -> Result<OrderReceipt, GatewayError> {
        self.submissions
            .lock()
            .expect("submissions lock")
            .push(params.clone());

        if let Some(latency) = self.latencies.get(&params.token_id) {
            tokio::time::sleep(*latency).await;
        }

        if let Some(reason) = self.rejections.get(&params.token_id) {
            return Err(GatewayError::Rejected {
                reason: reason.clone(),
            });
        }

        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        Ok(OrderReceipt {
            order_id: format!("order-{n}"),
        })
    }
}
