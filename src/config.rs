//! Configuration options for the admin console client

use std::time::Duration;

use crate::error::Error;

/// Environment variable holding the admin API base URL
pub const ENV_API_URL: &str = "FITNESS_ADMIN_API_URL";

/// Environment variable holding the id of the user that owns published articles
pub const ENV_OWNER_ID: &str = "FITNESS_ADMIN_OWNER_ID";

/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "FITNESS_ADMIN_TIMEOUT_SECS";

/// Configuration options for the admin console client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL every endpoint is reached through
    pub base_url: String,

    /// Owning user id that scopes the article endpoints
    pub owner_id: String,

    /// The request timeout, `None` keeps the transport default
    pub request_timeout: Option<Duration>,

    /// Quiescence period before a search query is applied
    pub search_debounce: Duration,

    /// Page size requested from endpoints that accept one
    pub page_size_hint: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            owner_id: String::new(),
            request_timeout: None,
            search_debounce: Duration::from_millis(300),
            page_size_hint: 8,
        }
    }
}

impl ClientOptions {
    /// Create options for the given base URL and article owner
    pub fn new(base_url: &str, owner_id: &str) -> Self {
        Self::default()
            .with_base_url(base_url)
            .with_owner_id(owner_id)
    }

    /// Load options from the environment.
    ///
    /// `FITNESS_ADMIN_API_URL` is required. `FITNESS_ADMIN_OWNER_ID` may be
    /// left out, article calls then fail with a configuration error.
    /// `FITNESS_ADMIN_TIMEOUT_SECS` is optional.
    pub fn from_env() -> Result<Self, Error> {
        let base_url = std::env::var(ENV_API_URL)
            .map_err(|_| Error::config(format!("missing environment variable {}", ENV_API_URL)))?;
        url::Url::parse(&base_url)?;

        let owner_id = std::env::var(ENV_OWNER_ID).unwrap_or_default();

        let request_timeout = match std::env::var(ENV_TIMEOUT_SECS) {
            Ok(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    Error::config(format!("{} must be a number of seconds, got '{}'", ENV_TIMEOUT_SECS, raw))
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Self::new(&base_url, &owner_id).with_request_timeout(request_timeout))
    }

    /// Set the base URL, trailing slashes are dropped
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the article owner id
    pub fn with_owner_id(mut self, value: &str) -> Self {
        self.owner_id = value.to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the search debounce period
    pub fn with_search_debounce(mut self, value: Duration) -> Self {
        self.search_debounce = value;
        self
    }

    /// Set the page size hint
    pub fn with_page_size_hint(mut self, value: u32) -> Self {
        self.page_size_hint = value.max(1);
        self
    }

    /// Join a path onto the base URL
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
