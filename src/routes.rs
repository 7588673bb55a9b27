use crate::model::AuthPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Popular,
    Search,
    Wishlist,
    SignIn,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Home,
        Route::Popular,
        Route::Search,
        Route::Wishlist,
        Route::SignIn,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Popular => "/popular",
            Route::Search => "/search",
            Route::Wishlist => "/wishlist",
            Route::SignIn => "/signin",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Route::ALL.iter().copied().find(|route| route.path() == path)
    }

    /// Sign-in is the only view reachable without a login.
    pub fn requires_auth(self) -> bool {
        self != Route::SignIn
    }
}

/// Where a navigation to `target` has to be redirected, if anywhere.
pub fn guard(target: Route, auth: &AuthPayload) -> Option<Route> {
    match (auth.is_logged_in, target) {
        (true, Route::SignIn) => Some(Route::Home),
        (false, target) if target.requires_auth() => Some(Route::SignIn),
        _ => None,
    }
}
