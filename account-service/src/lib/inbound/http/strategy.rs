//! Request authentication strategies.
//!
//! Each strategy resolves an inbound request to a principal from one
//! credential carrier. The variants are independent and share no state;
//! which one guards the API is chosen at configuration time.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::Request;
use axum::http;
use tower_cookies::Cookies;

use crate::domain::auth::models::User;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::SessionManager;

/// Capability interface: resolve the principal a request authenticates as.
#[async_trait]
pub trait RequestAuthenticator: Send + Sync + 'static {
    /// Whether the request carries this strategy's credential at all. Lets
    /// the middleware distinguish "nothing presented" from "presented but
    /// not valid" without leaking which stage of resolution failed.
    fn credentials_present(&self, request: &Request) -> bool;

    /// Resolve the request to a principal, failing closed to `None` on any
    /// malformed, unknown, or unverifiable credential.
    async fn current_principal(&self, request: &Request) -> Option<User>;
}

/// HTTP Basic credentials checked against the user store on every request.
pub struct BasicAuthStrategy {
    service: Arc<dyn AuthServicePort>,
}

impl BasicAuthStrategy {
    pub fn new(service: Arc<dyn AuthServicePort>) -> Self {
        Self { service }
    }

    fn header_value(request: &Request) -> Option<&str> {
        request
            .headers()
            .get(http::header::AUTHORIZATION)?
            .to_str()
            .ok()
    }
}

#[async_trait]
impl RequestAuthenticator for BasicAuthStrategy {
    fn credentials_present(&self, request: &Request) -> bool {
        Self::header_value(request).is_some()
    }

    // Manually desugared from `async fn`: the boxed future must be `Send`,
    // so the header is read before the future is built rather than holding
    // the non-`Sync` `&Request` across an await.
    fn current_principal<'life0, 'life1, 'async_trait>(
        &'life0 self,
        request: &'life1 Request,
    ) -> Pin<Box<dyn Future<Output = Option<User>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        let header = Self::header_value(request).map(str::to_owned);
        Box::pin(async move {
            let header = header?;
            let credentials = auth::BasicCredentials::parse(&header)?;
            self.service
                .resolve_principal(&credentials.identifier, &credentials.secret)
                .await
        })
    }
}

/// Opaque session token read from the request's cookie jar.
pub struct SessionAuthStrategy {
    sessions: Arc<dyn SessionManager>,
    cookie_name: String,
}

impl SessionAuthStrategy {
    pub fn new(sessions: Arc<dyn SessionManager>, cookie_name: String) -> Self {
        Self {
            sessions,
            cookie_name,
        }
    }
}

/// Session token from the cookie jar, by configured cookie name. The jar is
/// placed in request extensions by `CookieManagerLayer`.
pub fn session_cookie(request: &Request, cookie_name: &str) -> Option<String> {
    let cookies = request.extensions().get::<Cookies>()?;
    cookies.get(cookie_name).map(|c| c.value().to_string())
}

#[async_trait]
impl RequestAuthenticator for SessionAuthStrategy {
    fn credentials_present(&self, request: &Request) -> bool {
        session_cookie(request, &self.cookie_name).is_some()
    }

    // Manually desugared from `async fn`: the boxed future must be `Send`,
    // so the token is read before the future is built rather than holding
    // the non-`Sync` `&Request` across an await.
    fn current_principal<'life0, 'life1, 'async_trait>(
        &'life0 self,
        request: &'life1 Request,
    ) -> Pin<Box<dyn Future<Output = Option<User>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        let token = session_cookie(request, &self.cookie_name);
        Box::pin(async move {
            let token = token?;
            match self.sessions.resolve(&token).await {
                Ok(principal) => principal,
                Err(e) => {
                    tracing::warn!(error = %e, "session lookup failed, failing closed");
                    None
                }
            }
        })
    }
}
