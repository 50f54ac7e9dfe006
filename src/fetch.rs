//! HTTP client abstraction for making requests to the admin API

use reqwest::{Client, RequestBuilder, Method, header::{HeaderMap, HeaderValue}};
use serde::{Serialize, de::DeserializeOwned};
use crate::auth::Session;
use crate::config::ClientOptions;
use crate::error::Error;
use std::collections::HashMap;
use url::Url;

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query_params: Option<HashMap<String, String>>,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        Self {
            client,
            url: url.to_string(),
            method,
            headers,
            query_params: None,
            body: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add bearer token authentication to the request.
    ///
    /// Without a token the header is left out and the server decides.
    pub fn bearer_auth(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.header("Authorization", &format!("Bearer {}", token)),
            None => self,
        }
    }

    /// Add query parameters to the request
    pub fn query(mut self, params: HashMap<String, String>) -> Self {
        if !params.is_empty() {
            self.query_params = Some(params);
        }
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(body)?;
        self.body = Some(json);
        Ok(self)
    }

    /// Build the request
    fn build(&self) -> Result<RequestBuilder, Error> {
        let mut url = Url::parse(&self.url)?;

        if let Some(params) = &self.query_params {
            // sorted so the wire order is stable
            let mut pairs: Vec<_> = params.iter().collect();
            pairs.sort();
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in pairs {
                query_pairs.append_pair(key, value);
            }
        }

        let mut req = self.client.request(self.method.clone(), url.as_str());
        req = req.headers(self.headers.clone());

        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }

        Ok(req)
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let response = self.execute_raw().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let error = error_from_response(status.as_u16(), &text);
            log::warn!("{} {} failed: {}", self.method, self.url, error);
            return Err(error);
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            // some write endpoints answer 200 with no body
            return Ok(serde_json::from_value(serde_json::Value::Object(Default::default()))?);
        }
        let result = serde_json::from_slice::<T>(&bytes)?;
        Ok(result)
    }

    /// Execute the request and return the raw response
    pub async fn execute_raw(&self) -> Result<reqwest::Response, Error> {
        let req = self.build()?;
        log::debug!("{} {}", self.method, self.url);
        let response = req.send().await.map_err(|e| {
            log::warn!("{} {} transport failure: {}", self.method, self.url, e);
            Error::from(e)
        })?;
        Ok(response)
    }
}

/// Map a non-2xx response into an error, extracting the body's `message` field
pub(crate) fn error_from_response(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string));

    if status == 401 {
        Error::Unauthorized(message)
    } else {
        Error::Api { status, message }
    }
}

/// Helper for creating HTTP requests
pub struct Fetch;

impl Fetch {
    /// Create a POST request, used by the unauthenticated login call
    pub fn post<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::POST)
    }
}

/// What every resource client needs to reach the admin API
#[derive(Clone)]
pub(crate) struct ApiContext {
    pub options: ClientOptions,
    pub client: Client,
    pub session: Session,
}

impl ApiContext {
    pub fn new(options: ClientOptions, client: Client, session: Session) -> Self {
        Self {
            options,
            client,
            session,
        }
    }

    /// Start an authorized request against `path` under the base URL
    pub fn request(&self, method: Method, path: &str) -> FetchBuilder<'_> {
        let url = self.options.endpoint(path);
        FetchBuilder::new(&self.client, &url, method).bearer_auth(self.session.token().as_deref())
    }

    /// `/users/:ownerId/..` path of the article endpoints
    pub fn owner_path(&self, segments: &[&str]) -> Result<String, Error> {
        if self.options.owner_id.is_empty() {
            return Err(Error::config("article owner id is not configured"));
        }
        let mut all = vec!["users", self.options.owner_id.as_str()];
        all.extend_from_slice(segments);
        encode_path(&all)
    }
}

/// Absolute path from raw segments, each one percent-encoded
pub(crate) fn encode_path(segments: &[&str]) -> Result<String, Error> {
    let mut url = Url::parse("http://localhost")?;
    url.path_segments_mut()
        .map_err(|_| Error::general("cannot build request path"))?
        .clear()
        .extend(segments);
    Ok(url.path().to_string())
}
