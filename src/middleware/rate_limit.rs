use axum::http::Request;
use governor::{clock::QuantaInstant, middleware::NoOpMiddleware};
use std::{net::IpAddr, sync::Arc, time::Duration};
use tower_governor::{
    errors::GovernorError,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::KeyExtractor,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IpKeyExtractor;

impl KeyExtractor for IpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        // 1. Check X-Forwarded-For
        // Standard proxy header. First IP in the list is the client.
        if let Some(ip) = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        // 2. Fallback to localhost
        // Mostly for local dev where the header is missing. In prod this puts
        // unknown clients in one shared bucket, which beats rejecting them.
        Ok(IpAddr::from([127, 0, 0, 1]))
    }
}

pub type LoginConfig = GovernorConfig<IpKeyExtractor, NoOpMiddleware<QuantaInstant>>;

pub fn create_login_config() -> Arc<LoginConfig> {
    // 5 attempts per 15 minutes per IP. With no account lockout in this app,
    // this is the only brake on password guessing, so it stays tight.
    Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(IpKeyExtractor)
            .period(Duration::from_secs(180))
            .burst_size(5)
            .finish()
            .unwrap(),
    )
}
