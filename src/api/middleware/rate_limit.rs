//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Seconds between replenished tokens.
const REPLENISH_SECONDS: u64 = 2;
const BURST_SIZE: u32 = 100;

/// How the client key for rate limiting is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitMode {
    /// No limiting. Used by in-process test servers that carry no peer address.
    Disabled,
    /// Key by socket peer address. Requires `ConnectInfo<SocketAddr>`.
    PeerIp,
    /// Key by `X-Forwarded-For` / `X-Real-IP` / `Forwarded`, falling back to the peer.
    Forwarded,
}

impl RateLimitMode {
    pub fn from_behind_proxy(behind_proxy: bool) -> Self {
        if behind_proxy {
            Self::Forwarded
        } else {
            Self::PeerIp
        }
    }
}

/// Applies the rate limiter selected by `mode` to `router`.
///
/// # Limits
///
/// - **Replenish**: one request every 2 seconds
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn apply<S>(router: Router<S>, mode: RateLimitMode) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    match mode {
        RateLimitMode::Disabled => router,
        RateLimitMode::PeerIp => router.layer(peer_layer()),
        RateLimitMode::Forwarded => router.layer(forwarded_layer()),
    }
}

fn peer_layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(REPLENISH_SECONDS)
            .burst_size(BURST_SIZE)
            .finish()
            .expect("rate limit constants are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

fn forwarded_layer()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(REPLENISH_SECONDS)
            .burst_size(BURST_SIZE)
            .finish()
            .expect("rate limit constants are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
