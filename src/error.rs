//! Unified error types for the sniper.

use thiserror::Error;

use crate::catalog::Team;

/// Unified error type for the sniper.
#[derive(Error, Debug)]
pub enum SniperError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Event catalog error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Match state error.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// Order gateway error.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Event catalog resolution errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The Gamma API returned no markets for the slug.
    #[error("no markets found for slug: {slug}")]
    NoMarketsFound {
        /// The slug that matched nothing.
        slug: String,
    },

    /// The markets referenced an event that does not exist.
    #[error("event not found for slug: {slug}")]
    EventNotFound {
        /// The event slug that matched nothing.
        slug: String,
    },

    /// Failed to decode catalog data.
    #[error("failed to parse catalog data: {0}")]
    Parse(String),

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl CatalogError {
    /// Whether this is a missing-event error rather than a transport one.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::NoMarketsFound { .. } | CatalogError::EventNotFound { .. }
        )
    }
}

/// Match state mutation errors. Surfaced to the operator, never fatal.
#[derive(Error, Debug)]
pub enum StateError {
    /// A goal was recorded before any event was loaded.
    #[error("no event loaded")]
    NoMatchLoaded,

    /// A goal cancellation was requested for a team with no goals.
    #[error("no goals to cancel for {team}")]
    ScoreAtZero {
        /// The team whose count is already zero.
        team: Team,
    },
}

/// Order submission errors. Isolated per order, logged only.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Order submission failed before reaching the venue.
    #[error("order submission failed: {0}")]
    Submission(String),

    /// Order rejected by the venue.
    #[error("order rejected: {reason}")]
    Rejected {
        /// Rejection reason from the venue.
        reason: String,
    },

    /// The submission exceeded its deadline.
    #[error("order timed out after {timeout_ms}ms")]
    Timeout {
        /// The deadline that was exceeded.
        timeout_ms: u64,
    },

    /// Signing error.
    #[error("signing error: {0}")]
    Signing(String),

    /// Authentication failed.
    #[error("authentication failed: {0}")]
    Authentication(String),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, SniperError>;
