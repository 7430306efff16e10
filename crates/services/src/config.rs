use std::env;
use std::time::Duration;

use quiz_core::session::DEFAULT_DURATION_SECS;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Where the remote quiz API lives and how long to wait for it.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Parse and validate a base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `raw` is not an absolute URL with a path.
    pub fn new(raw: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
            raw: raw.to_owned(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::UnsupportedUrl { raw: raw.to_owned() });
        }
        Ok(Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        })
    }

    /// Read `QUIZ_API_URL` and `QUIZ_API_TIMEOUT_SECS`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var("QUIZ_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let mut config = Self::new(&raw)?;
        if let Some(secs) = env_number::<u64>("QUIZ_API_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Append percent-encoded `segments` to the base URL, keeping any base
    /// path such as `/api`.
    #[must_use]
    pub fn endpoint<I>(&self, segments: I) -> Url
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Per-quiz knobs chosen locally rather than by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizSettings {
    pub duration_secs: u32,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }
}

impl QuizSettings {
    /// Read `QUIZ_DURATION_SECS`, falling back to thirty minutes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidNumber` for a non-numeric or zero duration.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env_number::<u32>("QUIZ_DURATION_SECS")? {
            Some(0) => Err(ConfigError::InvalidNumber {
                name: "QUIZ_DURATION_SECS",
                raw: "0".into(),
            }),
            Some(duration_secs) => Ok(Self { duration_secs }),
            None => Ok(Self::default()),
        }
    }
}

fn env_number<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name, raw }),
        Err(_) => Ok(None),
    }
}
