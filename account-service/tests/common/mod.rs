use std::sync::Arc;

use account_service::config::SessionStoreKind;
use account_service::config::StrategyKind;
use account_service::domain::auth::ports::AuthServicePort;
use account_service::domain::auth::ports::SessionManager;
use account_service::domain::auth::service::AuthService;
use account_service::domain::auth::session::MemorySessions;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::AppState;
use account_service::inbound::http::strategy::BasicAuthStrategy;
use account_service::inbound::http::strategy::RequestAuthenticator;
use account_service::inbound::http::strategy::SessionAuthStrategy;
use account_service::outbound::repositories::InMemoryUserRepository;
use serde_json::json;

pub const SESSION_COOKIE: &str = "session_id";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application with the default wiring: session-cookie
    /// authentication over the persisted session store.
    pub async fn spawn() -> Self {
        Self::spawn_with(StrategyKind::Session, SessionStoreKind::Persisted).await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_with(strategy: StrategyKind, session_store: SessionStoreKind) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let service = Arc::new(AuthService::new(Arc::clone(&repository)));

        let sessions: Arc<dyn SessionManager> = match session_store {
            SessionStoreKind::Persisted => Arc::clone(&service) as Arc<dyn SessionManager>,
            SessionStoreKind::Memory => Arc::new(MemorySessions::new(Arc::clone(&repository))),
        };

        let authenticator: Arc<dyn RequestAuthenticator> = match strategy {
            StrategyKind::Session => Arc::new(SessionAuthStrategy::new(
                Arc::clone(&sessions),
                SESSION_COOKIE.to_string(),
            )),
            StrategyKind::Basic => Arc::new(BasicAuthStrategy::new(
                Arc::clone(&service) as Arc<dyn AuthServicePort>
            )),
        };

        let state = AppState {
            service: service as Arc<dyn AuthServicePort>,
            sessions,
            authenticator,
            session_cookie: SESSION_COOKIE.to_string(),
            excluded_paths: vec![
                "/status".to_string(),
                "/users".to_string(),
                "/sessions".to_string(),
                "/reset_password".to_string(),
            ],
        };

        let router = create_router(state);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            // Redirects are not followed so the logout 303 stays observable.
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("Failed to create reqwest client"),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make PUT request
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Register a user through the API
    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/users")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log a user in through the API; the client's cookie store picks up
    /// the session cookie. Returns the raw session token as well.
    pub async fn login(&self, email: &str, password: &str) -> (reqwest::Response, String) {
        let response = self
            .post("/sessions")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        let token = session_token(&response).unwrap_or_default();
        (response, token)
    }
}

/// Value of the session cookie from a response, if one was set.
pub fn session_token(response: &reqwest::Response) -> Option<String> {
    response
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
}
