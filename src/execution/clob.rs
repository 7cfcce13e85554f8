//! Polymarket CLOB order gateway.

use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::gateway::OrderGateway;
use super::order::{OrderParams, OrderReceipt, Side, TimeInForce};
use crate::config::Config;
use crate::error::GatewayError;
use crate::signing;

/// Order submission request body.
#[derive(Debug, Clone, Serialize)]
struct OrderRequest {
    /// Token id to trade.
    token_id: String,
    /// Order side (BUY/SELL).
    side: String,
    /// Limit price.
    price: String,
    /// Order size.
    size: String,
    /// Fee rate basis points.
    fee_rate_bps: String,
    /// Nonce for order uniqueness.
    nonce: String,
    /// Expiration timestamp.
    expiration: String,
    /// Taker address.
    taker: String,
    /// Maker address.
    maker: String,
    /// Signature type.
    signature_type: u8,
    /// Order signature.
    signature: String,
    /// Time in force.
    order_type: String,
    /// Neg risk flag. Football conditionals are standalone binary markets.
    neg_risk: bool,
}

/// Order submission result.
#[derive(Debug, Clone, Deserialize)]
struct SubmitResult {
    /// Order id (various field names across API versions).
    #[serde(alias = "orderID", alias = "orderId", alias = "order_id", alias = "id")]
    order_id: Option<String>,
    /// Error message if any.
    error: Option<String>,
}

/// Balance allowance response.
#[derive(Debug, Clone, Deserialize)]
struct BalanceAllowanceResponse {
    /// Balance in wei (6 decimals for USDC).
    balance: Option<String>,
}

/// Order gateway backed by the Polymarket CLOB REST API.
///
/// The wallet signer is initialized lazily on first use and shared by every
/// submission afterwards (initialize-once, read-many).
pub struct ClobGateway {
    http: reqwest::Client,
    clob_url: String,
    private_key: String,
    signature_type: u8,
    chain_id: u64,
    dry_run: bool,
    http_timeout_ms: u64,
    signer: OnceCell<PrivateKeySigner>,
}

impl ClobGateway {
    /// Create a gateway from config with low-latency HTTP settings.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(std::time::Duration::from_millis(500))
            // Disable Nagle's algorithm; orders are latency-critical
            .tcp_nodelay(true)
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .pool_max_idle_per_host(config.http_pool_size)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .expect("failed to create HTTP client");

        debug!(
            mode = ?signing::signature_mode(config.signature_type),
            dry_run = config.dry_run,
            "gateway configured"
        );

        Self {
            http,
            clob_url: config.clob_url.clone(),
            private_key: config.private_key.clone(),
            signature_type: config.signature_type,
            chain_id: 137, // Polygon mainnet
            dry_run: config.dry_run,
            http_timeout_ms: config.http_timeout_ms,
            signer: OnceCell::new(),
        }
    }

    /// The lazily-initialized wallet signer.
    fn signer(&self) -> Result<&PrivateKeySigner, GatewayError> {
        self.signer
            .get_or_try_init(|| signing::create_signer(&self.private_key))
    }

    /// The wallet address derived from the private key.
    pub fn address(&self) -> Result<String, GatewayError> {
        Ok(signing::address_of(self.signer()?))
    }

    /// The CLOB base URL.
    pub fn clob_url(&self) -> &str {
        &self.clob_url
    }

    /// The chain id.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Get the wallet's USDC balance via the authenticated balance endpoint.
    #[instrument(skip(self))]
    pub async fn balance(&self) -> Result<Decimal, GatewayError> {
        let signer = self.signer()?;
        let auth_headers = signing::auth_headers(signer).await?;

        let url = format!("{}/balance-allowance", self.clob_url);
        let mut request = self.http.get(&url);
        for (key, value) in auth_headers {
            request = request.header(&key, &value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Submission(format!("failed to get balance: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Authentication(format!(
                "balance request failed: HTTP {status} - {body}"
            )));
        }

        let payload: BalanceAllowanceResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Submission(format!("failed to parse balance: {e}")))?;

        let balance_wei: Decimal = payload
            .balance
            .as_deref()
            .unwrap_or("0")
            .parse()
            .unwrap_or(Decimal::ZERO);

        // USDC carries 6 decimals on Polygon
        Ok(balance_wei / Decimal::new(1_000_000, 0))
    }
}

#[async_trait]
impl OrderGateway for ClobGateway {
    #[instrument(skip(self, params), fields(token = %params.token_id, side = %params.side))]
    async fn submit(&self, params: OrderParams) -> Result<OrderReceipt, GatewayError> {
        params.validate().map_err(GatewayError::Submission)?;

        debug!(price = %params.price, size = %params.size, tif = %params.tif, "submitting order");

        if self.dry_run {
            let order_id = format!("dry-{}", chrono::Utc::now().timestamp_millis());
            info!(order_id = %order_id, "DRY RUN - order simulated, not sent to venue");
            return Ok(OrderReceipt { order_id });
        }

        let signer = self.signer()?;
        let maker = signing::address_of(signer);
        let auth_headers = signing::auth_headers(signer).await?;

        let nonce = chrono::Utc::now().timestamp_millis().to_string();
        let expiration = (chrono::Utc::now().timestamp() + 3600).to_string();

        let side = match params.side {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        };
        let order_type = match params.tif {
            TimeInForce::FOK => "FOK",
            TimeInForce::GTC => "GTC",
        };

        let order_message = format!(
            "{}:{}:{}:{}:{}:{}",
            params.token_id, side, params.price, params.size, nonce, expiration
        );
        let signature_bytes = signing::sign_message(signer, order_message.as_bytes()).await?;
        let signature = format!("0x{}", hex::encode(&signature_bytes));

        let body = OrderRequest {
            token_id: params.token_id.clone(),
            side: side.to_string(),
            price: params.price.to_string(),
            size: params.size.to_string(),
            fee_rate_bps: "0".to_string(),
            nonce,
            expiration,
            taker: "0x0000000000000000000000000000000000000000".to_string(),
            maker,
            signature_type: self.signature_type,
            signature,
            order_type: order_type.to_string(),
            neg_risk: false,
        };

        let url = format!("{}/order", self.clob_url);
        let mut request = self.http.post(&url).json(&body);
        for (key, value) in auth_headers {
            request = request.header(&key, &value);
        }

        let http_timeout_ms = self.http_timeout_ms;
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout {
                    timeout_ms: http_timeout_ms,
                }
            } else {
                GatewayError::Submission(format!("HTTP request failed: {e}"))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                reason: format!("HTTP {status} - {body}"),
            });
        }

        let result: SubmitResult = response
            .json()
            .await
            .map_err(|e| GatewayError::Submission(format!("failed to parse response: {e}")))?;

        if let Some(error) = result.error {
            return Err(GatewayError::Rejected { reason: error });
        }

        let order_id = result
            .order_id
            .ok_or_else(|| GatewayError::Submission("no order id in response".to_string()))?;

        info!(
            order_id = %order_id,
            token_id = %params.token_id,
            price = %params.price,
            size = %params.size,
            "order submitted"
        );

        Ok(OrderReceipt { order_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_config() -> Config {
        let mut config = Config::test_defaults();
        config.private_key =
            "0x0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef".to_string();
        config
    }

    #[test]
    fn gateway_creation_targets_polygon() {
        let gateway = ClobGateway::new(&test_config());
        assert_eq!(gateway.chain_id(), 137);
        assert_eq!(gateway.clob_url(), "https://clob.polymarket.com");
    }

    #[test]
    fn gateway_derives_wallet_address() {
        let gateway = ClobGateway::new(&test_config());
        let address = gateway.address().unwrap();
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 42);
    }

    #[tokio::test]
    async fn dry_run_fabricates_receipts_without_network() {
        let gateway = ClobGateway::new(&test_config());
        let receipt = gateway
            .submit(OrderParams::buy("token-1", dec!(0.40), dec!(5)))
            .await
            .unwrap();
        assert!(receipt.order_id.starts_with("dry-"));
    }

    #[tokio::test]
    async fn degenerate_orders_are_refused_before_signing() {
        let gateway = ClobGateway::new(&test_config());
        let err = gateway
            .submit(OrderParams::buy("", dec!(0.40), dec!(5)))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Submission(_)));
    }
}
