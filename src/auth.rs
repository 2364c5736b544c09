//! Session guard
//!
//! Route protection decisions against an injected session provider. The
//! decision function itself is pure: given a route class and the current
//! session state it says allow or redirect, and the host performs the
//! navigation. Provider failures degrade to "no session" so a flaky
//! identity service locks users out of protected pages instead of letting
//! them through.

/// An authenticated user session as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
}

/// Failures from the identity provider's own operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("email address has not been confirmed")]
    UnconfirmedEmail,
    #[error("an account with this email already exists")]
    DuplicateAccount,
    #[error("identity service failure: {0}")]
    Service(String),
}

/// Host-injected identity backend.
pub trait SessionProvider {
    fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, AuthError>;
    fn sign_up(&mut self, email: &str, password: &str) -> Result<Session, AuthError>;
    fn sign_out(&mut self) -> Result<(), AuthError>;
    /// Current session, if any.
    fn session(&self) -> Result<Option<Session>, AuthError>;
}

/// Classification of the route being visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Requires a session.
    Protected,
    /// The sign-in / sign-up page.
    Login,
    /// Identity-provider callback; always allowed through.
    Callback,
    /// No session requirements either way.
    Public,
}

/// What the host should do with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    /// Send to the login page, remembering where the user was headed.
    RedirectToLogin { attempted: String },
    /// Already signed in; the login page bounces to the dashboard.
    RedirectToDashboard,
}

/// Decides whether a visit to `route` may proceed.
///
/// The provider is consulted once; any error from it is logged and treated
/// as an absent session, so an outage never grants access to protected
/// pages.
pub fn guard_route<P: SessionProvider>(provider: &P, kind: RouteKind, route: &str) -> RouteDecision {
    let session = match provider.session() {
        Ok(session) => session,
        Err(e) => {
            log::warn!("session lookup failed, treating as signed out: {e}");
            None
        }
    };
    route_decision(kind, route, session.as_ref())
}

/// Pure decision rule.
pub fn route_decision(kind: RouteKind, route: &str, session: Option<&Session>) -> RouteDecision {
    match (kind, session) {
        (RouteKind::Callback, _) => RouteDecision::Allow,
        (RouteKind::Protected, None) => RouteDecision::RedirectToLogin {
            attempted: route.to_string(),
        },
        (RouteKind::Login, Some(_)) => RouteDecision::RedirectToDashboard,
        _ => RouteDecision::Allow,
    }
}
