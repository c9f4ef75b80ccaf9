use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use park_core::{
    EngineConfig, LifecycleEngine, MemoryStore, NotificationHub, SessionStore,
    DEFAULT_QUEUE_CAPACITY,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::apis;

/// Configuration for the HTTP server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Server bind address (e.g., "127.0.0.1:3000")
    pub address: String,
    /// Public base URL used when rendering plate photo links
    pub public_url: Option<String>,
    /// Billing rate per parked minute
    pub rate_per_minute: f64,
    /// Capacity of the notification publish queue
    pub queue_capacity: usize,
}

impl ServerConfig {
    /// Create a new server config with the given address and defaults
    pub fn new(address: String) -> Self {
        Self {
            address,
            public_url: None,
            rate_per_minute: EngineConfig::default().rate_per_minute,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    pub fn with_public_url(mut self, public_url: String) -> Self {
        self.public_url = Some(public_url);
        self
    }

    pub fn with_rate_per_minute(mut self, rate_per_minute: f64) -> Self {
        self.rate_per_minute = rate_per_minute;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }
}

/// Server state shared by all handlers
#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<LifecycleEngine>,
    pub hub: NotificationHub,
    public_url: Option<Arc<str>>,
}

impl ServerState {
    /// Wire the engine and hub around the given store
    pub fn new(store: Arc<dyn SessionStore>, config: &ServerConfig) -> Self {
        let hub = NotificationHub::new(config.queue_capacity);
        let engine = Arc::new(LifecycleEngine::new(
            store,
            hub.clone(),
            EngineConfig {
                rate_per_minute: config.rate_per_minute,
            },
        ));
        Self {
            engine,
            hub,
            public_url: config.public_url.as_deref().map(Arc::from),
        }
    }

    pub fn public_url(&self) -> Option<&str> {
        self.public_url.as_deref()
    }
}

/// Build the full route table for the given state
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/api/v1/sessions",
            post(apis::sessions::create_session).get(apis::sessions::list_sessions),
        )
        .route("/api/v1/sessions/search", get(apis::sessions::search_sessions))
        .route("/api/v1/sessions/{id}", get(apis::sessions::get_session))
        .route(
            "/api/v1/sessions/{plate}/close",
            post(apis::sessions::close_session),
        )
        .route("/api/v1/notifications/ws", get(apis::notifications::observer_ws))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server with an in-memory session store
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = ServerState::new(Arc::new(MemoryStore::new()), &config);

    println!("✓ Lifecycle engine initialized");
    println!("  Rate per minute: \x1b[1m{}\x1b[0m", config.rate_per_minute);
    println!("  Notification queue: \x1b[1m{}\x1b[0m", config.queue_capacity);
    println!();

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.address).await?;

    println!("Server starting on \x1b[1mhttp://{}\x1b[0m", config.address);
    println!("\nAvailable endpoints:");
    println!("  \x1b[1mPOST /api/v1/sessions\x1b[0m               - Register a vehicle entering");
    println!("  \x1b[1mGET  /api/v1/sessions\x1b[0m               - Paged session list");
    println!("  \x1b[1mGET  /api/v1/sessions/search\x1b[0m        - Filtered session search");
    println!("  \x1b[1mGET  /api/v1/sessions/:id\x1b[0m           - Session by id");
    println!("  \x1b[1mPOST /api/v1/sessions/:plate/close\x1b[0m  - Close the latest session for a plate");
    println!("  \x1b[1mGET  /api/v1/notifications/ws\x1b[0m       - Live session updates (WebSocket)");
    println!("\nPress Ctrl+C to stop\n");

    info!("HTTP server listening on {}", config.address);

    axum::serve(listener, app).await?;
    Ok(())
}
