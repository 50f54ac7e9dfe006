//! Fitness Admin Client Library
//!
//! A Rust client for the fitness app admin API: authentication, user
//! lifecycle management, localized articles, the language registry,
//! dashboard counters and the issue lookup tool, together with the
//! list/detail/mutate resource managers that drive the console.

pub mod analytics;
pub mod articles;
pub mod auth;
pub mod config;
pub mod debounce;
pub mod envelope;
pub mod error;
pub mod fetch;
pub mod issues;
pub mod languages;
pub mod manager;
pub mod present;
pub mod shell;
pub mod users;

use std::sync::Arc;
use reqwest::Client;

use crate::analytics::AnalyticsApi;
use crate::articles::ArticlesApi;
use crate::auth::{Auth, Session, TokenStore};
use crate::config::ClientOptions;
use crate::error::{Error, Notifier};
use crate::fetch::ApiContext;
use crate::issues::IssuesApi;
use crate::languages::LanguagesApi;
use crate::manager::ResourceManager;
use crate::users::UsersApi;

/// The main entry point for the admin console client
pub struct AdminConsole {
    /// Client options
    pub options: ClientOptions,
    /// HTTP client used for requests
    pub http_client: Client,
    /// The shared session every call reads its token from
    session: Session,
    /// Auth client, the only writer of the session
    auth: Auth,
}

impl AdminConsole {
    /// Create a console with an in-memory session
    ///
    /// # Example
    ///
    /// ```
    /// use fitness_admin::{AdminConsole, config::ClientOptions};
    ///
    /// let console = AdminConsole::new(ClientOptions::new("http://localhost:5000", "owner-id")).unwrap();
    /// assert!(!console.session().is_authenticated());
    /// ```
    pub fn new(options: ClientOptions) -> Result<Self, Error> {
        Self::with_session(options, Session::in_memory())
    }

    /// Create a console whose session is restored from `store`
    pub fn with_token_store(options: ClientOptions, store: Arc<dyn TokenStore>) -> Result<Self, Error> {
        Self::with_session(options, Session::restore(store)?)
    }

    /// Create a console around an existing session
    pub fn with_session(options: ClientOptions, session: Session) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let auth = Auth::new(options.clone(), http_client.clone(), session.clone());

        Ok(Self {
            options,
            http_client,
            session,
            auth,
        })
    }

    fn context(&self) -> ApiContext {
        ApiContext::new(self.options.clone(), self.http_client.clone(), self.session.clone())
    }

    /// Read-only view of the session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get a reference to the auth client
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.context())
    }

    pub fn articles(&self) -> ArticlesApi {
        ArticlesApi::new(self.context())
    }

    pub fn languages(&self) -> LanguagesApi {
        LanguagesApi::new(self.context())
    }

    pub fn issues(&self) -> IssuesApi {
        IssuesApi::new(self.context())
    }

    pub fn analytics(&self) -> AnalyticsApi {
        AnalyticsApi::new(self.context())
    }

    /// Resource manager for the users screen
    pub fn user_manager(&self, notifier: Arc<dyn Notifier>) -> ResourceManager<UsersApi> {
        ResourceManager::new(self.users(), notifier).with_search_debounce(self.options.search_debounce)
    }

    /// Resource manager for the articles screen
    pub fn article_manager(&self, notifier: Arc<dyn Notifier>) -> ResourceManager<ArticlesApi> {
        ResourceManager::new(self.articles(), notifier).with_search_debounce(self.options.search_debounce)
    }

    /// Resource manager for the language registry
    pub fn language_manager(&self, notifier: Arc<dyn Notifier>) -> ResourceManager<LanguagesApi> {
        ResourceManager::new(self.languages(), notifier).with_search_debounce(self.options.search_debounce)
    }

    /// Drop the session when the server rejected the token.
    ///
    /// Returns `true` when the caller should route back to login.
    pub fn handle_unauthorized(&self, error: &Error) -> Result<bool, Error> {
        if !error.is_unauthorized() {
            return Ok(false);
        }
        log::warn!("token rejected by the server, clearing session");
        self.auth.logout()?;
        Ok(true)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::AdminConsole;
    pub use crate::config::ClientOptions;
    pub use crate::error::{Error, ErrorKind, Notice, NoticeLevel, Notifier};
    pub use crate::manager::{FormMode, ListFilter, ResourceManager};
}
