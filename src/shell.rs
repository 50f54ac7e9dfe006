//! Route table and the protected-route gate

use std::fmt;

use crate::auth::Session;

/// Console screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Users,
    Articles,
    Analytics,
    Issues,
    Settings,
}

impl Route {
    /// Sidebar entries in display order
    pub const NAVIGATION: [Route; 6] = [
        Route::Dashboard,
        Route::Users,
        Route::Articles,
        Route::Analytics,
        Route::Issues,
        Route::Settings,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::Users => "/users",
            Route::Articles => "/articles",
            Route::Analytics => "/analytics",
            Route::Issues => "/issues",
            Route::Settings => "/settings",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Dashboard => "Dashboard",
            Route::Users => "User Management",
            Route::Articles => "Articles",
            Route::Analytics => "Analytics",
            Route::Issues => "Issue Tracker",
            Route::Settings => "Settings",
        }
    }

    /// Resolve a path; `/` and unknown paths land on the dashboard
    pub fn from_path(path: &str) -> Route {
        let path = path.trim_end_matches('/');
        match path {
            "/login" => Route::Login,
            "/users" => Route::Users,
            "/articles" => Route::Articles,
            "/analytics" => Route::Analytics,
            "/issues" => Route::Issues,
            "/settings" => Route::Settings,
            _ => Route::Dashboard,
        }
    }

    /// Everything except the login screen needs a session
    pub fn requires_auth(&self) -> bool {
        *self != Route::Login
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Where the shell actually goes when `route` is requested
pub fn guard(route: Route, session: &Session) -> Route {
    if route.requires_auth() && !session.is_authenticated() {
        log::debug!("{} requires a session, redirecting to {}", route, Route::Login);
        Route::Login
    } else {
        route
    }
}
