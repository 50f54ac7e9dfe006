//! Admin authentication

mod types;
mod session;

use reqwest::Client;

use crate::config::ClientOptions;
use crate::envelope::Envelope;
use crate::error::Error;
use crate::fetch::Fetch;

pub use types::*;
pub use session::*;

/// Client for the admin login flow and the only writer of the session token
#[derive(Clone)]
pub struct Auth {
    /// Client options
    options: ClientOptions,

    /// HTTP client used for requests
    client: Client,

    /// The current session
    session: Session,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(options: ClientOptions, client: Client, session: Session) -> Self {
        Self {
            options,
            client,
            session,
        }
    }

    /// Sign in and store the returned bearer token
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<String, Error> {
        let url = self.options.endpoint("/auth/login");

        let result = Fetch::post(&self.client, &url)
            .json(credentials)?
            .execute::<Envelope<LoginData>>()
            .await?;

        let token = result
            .data
            .and_then(|d| d.token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::auth(result.message.unwrap_or_else(|| "login response carried no token".to_string())))?;

        self.session.set_token(&token)?;
        log::info!("signed in as {}", credentials.email);

        Ok(token)
    }

    /// Drop the token and its persisted copy
    pub fn logout(&self) -> Result<(), Error> {
        self.session.clear()?;
        log::info!("signed out");
        Ok(())
    }

    /// Whether a token is held
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Get the current session
    pub fn session(&self) -> &Session {
        &self.session
    }
}
