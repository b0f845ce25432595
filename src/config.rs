use anyhow::{Context, Result, bail};
use jsonwebtoken::Algorithm;
use std::env;

/// Signing configuration for access tokens.
///
/// Loaded once at startup and passed by reference everywhere it's needed.
/// If any of this is missing the process refuses to start; a server that
/// issues tokens it can't verify later is worse than one that doesn't boot.
#[derive(Clone)]
pub struct AuthConfig {
    pub algorithm: Algorithm,
    pub secret_key: String,
    pub access_token_exp_minutes: i64,
}

impl AuthConfig {
    /// Reads `ALGORITHM`, `SECRET_KEY` and `ACCESS_TOKEN_EXPIRE_MINUTES`
    /// from the environment. All three are required.
    pub fn from_env() -> Result<Self> {
        let algorithm_name =
            env::var("ALGORITHM").context("ALGORITHM must be set (e.g. HS256)")?;
        let secret_key = env::var("SECRET_KEY").context("SECRET_KEY must be set")?;
        let access_token_exp_minutes = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .context("ACCESS_TOKEN_EXPIRE_MINUTES must be set")?
            .parse::<i64>()
            .context("ACCESS_TOKEN_EXPIRE_MINUTES must be an integer")?;

        Self::new(&algorithm_name, secret_key, access_token_exp_minutes)
    }

    pub fn new(
        algorithm_name: &str,
        secret_key: String,
        access_token_exp_minutes: i64,
    ) -> Result<Self> {
        // Only the symmetric HMAC family is supported. Tokens are issued and
        // verified by the same process, so asymmetric schemes buy us nothing.
        let algorithm = match algorithm_name {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => bail!("Unsupported signing algorithm: {other}"),
        };

        if secret_key.is_empty() {
            bail!("SECRET_KEY must not be empty");
        }
        if access_token_exp_minutes <= 0 {
            bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive");
        }

        Ok(Self {
            algorithm,
            secret_key,
            access_token_exp_minutes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hmac_algorithms() {
        for name in ["HS256", "HS384", "HS512"] {
            assert!(AuthConfig::new(name, "secret".into(), 30).is_ok());
        }
    }

    #[test]
    fn rejects_non_hmac_algorithm() {
        assert!(AuthConfig::new("RS256", "secret".into(), 30).is_err());
        assert!(AuthConfig::new("none", "secret".into(), 30).is_err());
    }

    #[test]
    fn rejects_empty_secret_and_bad_ttl() {
        assert!(AuthConfig::new("HS256", "".into(), 30).is_err());
        assert!(AuthConfig::new("HS256", "secret".into(), 0).is_err());
        assert!(AuthConfig::new("HS256", "secret".into(), -5).is_err());
    }
}
