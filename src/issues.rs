//! Lookup of logged API request/response failures

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::error::{Error, Notice};
use crate::fetch::{encode_path, ApiContext};

/// Shortest request id worth sending to the server (UUID length)
pub const MIN_REQUEST_ID_LEN: usize = 36;

/// One failed request/response pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,

    pub request_id: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub headers: serde_json::Value,

    #[serde(default)]
    pub error: serde_json::Value,

    #[serde(default)]
    pub request_body: serde_json::Value,

    #[serde(default)]
    pub response: serde_json::Value,

    #[serde(default)]
    pub timestamp: String,
}

impl Issue {
    /// Error text whether the server logged a string or an object
    pub fn error_text(&self) -> String {
        match &self.error {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        }
    }

    /// HTTP status recorded in the response, if any
    pub fn status_code(&self) -> Option<u16> {
        ["statusCode", "status"]
            .iter()
            .find_map(|key| self.response.get(*key).and_then(|v| v.as_u64()))
            .map(|code| code as u16)
    }
}

/// Client for `/admin/:requestId/issues`
#[derive(Clone)]
pub struct IssuesApi {
    ctx: ApiContext,
}

impl IssuesApi {
    pub(crate) fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// All issues logged under `request_id`
    pub async fn by_request_id(&self, request_id: &str) -> Result<Vec<Issue>, Error> {
        validate_request_id(request_id)?;
        let envelope = self
            .ctx
            .request(Method::GET, &encode_path(&["admin", request_id.trim(), "issues"])?)
            .execute::<Envelope<Vec<Issue>>>()
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }
}

/// Length-only sanity check, the UUID structure is not inspected
pub fn validate_request_id(request_id: &str) -> Result<(), Error> {
    if request_id.trim().chars().count() < MIN_REQUEST_ID_LEN {
        return Err(Error::validation(format!(
            "Request ID must be at least {} characters",
            MIN_REQUEST_ID_LEN
        )));
    }
    Ok(())
}

/// State of the issue lookup screen
#[derive(Debug, Default, Clone)]
pub struct IssueLookup {
    results: Vec<Issue>,
    selected: Option<usize>,
}

impl IssueLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `request_id` and select the first match.
    ///
    /// Too-short ids are rejected locally with a warning.
    pub async fn search(&mut self, api: &IssuesApi, request_id: &str) -> Result<usize, Notice> {
        if let Err(Error::Validation(message)) = validate_request_id(request_id) {
            return Err(Notice::warning(message));
        }

        match api.by_request_id(request_id).await {
            Ok(issues) => {
                self.selected = if issues.is_empty() { None } else { Some(0) };
                self.results = issues;
                Ok(self.results.len())
            }
            Err(e) => Err(Notice::from_error(&e, "Failed to fetch issues")),
        }
    }

    /// Summary table rows
    pub fn results(&self) -> &[Issue] {
        &self.results
    }

    /// Record shown in the detail panel
    pub fn selected(&self) -> Option<&Issue> {
        self.selected.and_then(|i| self.results.get(i))
    }

    /// Show another row in the detail panel
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.results.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }
}
