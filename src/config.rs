use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;

/// Roistat lead-creation endpoint used when `ROISTAT_API_URL` is not set.
pub const DEFAULT_ROISTAT_API_URL: &str = "https://cloud.roistat.com/api/proxy/1.0/leads/add";

/// User agent sent with every outbound lead request.
pub const USER_AGENT: &str = "Support360-Lead-Handler/1.0";

/// Origin allowed to call the relay when `ALLOWED_ORIGINS` is not set.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://support360.1gt.ru";

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    /// Roistat credential. Optional at startup: a missing key fails each
    /// lead request with a configuration error instead of aborting the process.
    pub roistat_api_key: Option<String>,
    pub roistat_api_url: String,
    pub roistat_timeout_secs: u64,
    pub allowed_origins: Vec<String>,
    pub max_body_bytes: usize,
    pub rate_limit_period_ms: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// A `.env` file in the working directory (or one of its parents) is read
    /// first. Variables already present in the environment are never
    /// overwritten by the file.
    pub fn from_env() -> anyhow::Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded .env from {}", path.display()),
            Err(e) if e.not_found() => {
                tracing::debug!(".env file not found, using process environment only")
            }
            Err(e) => tracing::warn!("Failed to read .env file: {}", e),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            roistat_api_key: lookup("ROISTAT_API_KEY")
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            roistat_api_url: lookup("ROISTAT_API_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ROISTAT_API_URL.to_string())
                .trim()
                .to_string(),
            roistat_timeout_secs: parse_positive(&lookup, "ROISTAT_TIMEOUT_SECS", 30)?,
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string())
                .split(',')
                .map(|origin| origin.trim().trim_end_matches('/').to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            max_body_bytes: parse_positive(&lookup, "MAX_BODY_BYTES", 64 * 1024)?,
            rate_limit_period_ms: parse_positive(&lookup, "RATE_LIMIT_PERIOD_MS", 500)?,
            rate_limit_burst: parse_positive(&lookup, "RATE_LIMIT_BURST", 10)?,
        };

        validate_upstream_url(&config.roistat_api_url)?;

        tracing::debug!("Roistat API URL: {}", config.roistat_api_url);
        tracing::debug!("Roistat timeout: {}s", config.roistat_timeout_secs);
        tracing::debug!("Allowed origins: {:?}", config.allowed_origins);
        tracing::debug!("Server Port: {}", config.port);
        match config.api_key_fingerprint() {
            Some(fingerprint) => {
                tracing::info!("ROISTAT_API_KEY configured (fingerprint {})", fingerprint)
            }
            None => tracing::warn!(
                "ROISTAT_API_KEY is not set; lead submissions will fail until it is configured"
            ),
        }

        Ok(config)
    }

    /// Timeout applied to the outbound Roistat call.
    pub fn roistat_timeout(&self) -> Duration {
        Duration::from_secs(self.roistat_timeout_secs)
    }

    /// First 8 hex characters of the SHA-256 of the API key.
    ///
    /// Lets operators tell which key a running instance picked up without the
    /// key itself ever reaching the logs.
    pub fn api_key_fingerprint(&self) -> Option<String> {
        self.roistat_api_key.as_ref().map(|key| {
            let digest = Sha256::digest(key.as_bytes());
            hex::encode(&digest[..4])
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field(
                "roistat_api_key",
                &self.roistat_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("roistat_api_url", &self.roistat_api_url)
            .field("roistat_timeout_secs", &self.roistat_timeout_secs)
            .field("allowed_origins", &self.allowed_origins)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("rate_limit_period_ms", &self.rate_limit_period_ms)
            .field("rate_limit_burst", &self.rate_limit_burst)
            .finish()
    }
}

fn parse_positive<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = lookup(key).filter(|s| !s.trim().is_empty()) else {
        return Ok(default);
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => anyhow::bail!("{} must be a positive integer, got {:?}", key, raw),
    }
}

fn validate_upstream_url(raw: &str) -> anyhow::Result<()> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| anyhow::anyhow!("ROISTAT_API_URL is not a valid URL: {}", e))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("ROISTAT_API_URL must start with http:// or https://");
    }

    Ok(())
}
