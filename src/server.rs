//! # Server Module
//!
//! ## Purpose
//! JSON HTTP API of ChemVerse, served with axum. All routes live under `/api`:
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /api/elements?category=` | all elements, optionally one category |
//! | `GET /api/elements/:symbol` | one element |
//! | `GET /api/elements/:symbol/explain` | AI explanation with a static fallback |
//! | `GET /api/reactions` | curated reactions |
//! | `POST /api/reactions/find` | curated or AI-resolved reaction |
//! | `POST /api/chat`, `POST /api/ai-assistant` | assistant chat |
//! | `GET /api/lessons?search=&category=` | lesson search |
//! | `GET /api/lessons/categories`, `GET /api/lessons/:id` | lesson browsing |
//! | `GET /api/health` | liveness and AI configuration |
//!
//! Every request is logged as `METHOD path status in Nms`. CORS is permissive because the
//! web UI runs on its own dev server.

pub mod error;
pub mod handlers;

use crate::ai::gateway::{AiGateway, ModelPolicy};
use crate::ai::transport::OpenRouterTransport;
use crate::chemistry::storage::ChemStore;
use crate::library_manager::{LibraryError, LibraryManager};
use crate::resolver::ReactionResolver;
use crate::settings::{AppConfig, ConfigError, ServerSettings};
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use handlers::{
    ai_assistant, chat, explain_element, find_reaction, get_element, get_lesson, health,
    lesson_categories, list_elements, list_lessons, list_reactions,
};
use log::{info, warn};
use std::io;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error("failed to bind {host}:{port}: {source}")]
    Bind {
        host: String,
        port: u16,
        source: io::Error,
    },
    #[error("no free port in {first}..={last}")]
    NoFreePort { first: u16, last: u16 },
    #[error("server error: {0}")]
    Serve(#[from] io::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ChemStore>,
    pub gateway: Arc<AiGateway>,
    pub resolver: Arc<ReactionResolver>,
}

impl AppState {
    pub fn new(store: Arc<ChemStore>, gateway: Arc<AiGateway>) -> Self {
        let resolver = Arc::new(ReactionResolver::new(store.clone(), gateway.clone()));
        Self {
            store,
            gateway,
            resolver,
        }
    }

    /// Builds the stores from the configured libraries and the OpenRouter gateway.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let store = LibraryManager::with_paths(config.libraries.clone()).build_store()?;
        let transport = OpenRouterTransport::new(&config.ai)?;
        let gateway = AiGateway::new(
            Arc::new(transport),
            ModelPolicy::from(&config.ai),
            config.ai.profiles.clone(),
        );
        Ok(Self::new(Arc::new(store), Arc::new(gateway)))
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    info!(
        "{} {} {} in {}ms",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

pub fn app_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/elements", get(list_elements))
        .route("/elements/:symbol", get(get_element))
        .route("/elements/:symbol/explain", get(explain_element))
        .route("/reactions", get(list_reactions))
        .route("/reactions/find", post(find_reaction))
        .route("/chat", post(chat))
        .route("/ai-assistant", post(ai_assistant))
        .route("/lessons", get(list_lessons))
        .route("/lessons/categories", get(lesson_categories))
        .route("/lessons/:id", get(get_lesson))
        .route("/health", get(health));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the configured port, moving on to the next ones while they are in use.
pub async fn bind(settings: &ServerSettings) -> Result<TcpListener, StartupError> {
    let attempts = settings.port_attempts.max(1);
    let mut last = settings.port;
    for offset in 0..attempts {
        let Some(port) = settings.port.checked_add(offset) else {
            break;
        };
        last = port;
        match TcpListener::bind((settings.host.as_str(), port)).await {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                warn!("Port {} is in use, trying {}", port, port.saturating_add(1));
            }
            Err(source) => {
                return Err(StartupError::Bind {
                    host: settings.host.clone(),
                    port,
                    source,
                });
            }
        }
    }
    Err(StartupError::NoFreePort {
        first: settings.port,
        last,
    })
}

pub async fn serve(settings: &ServerSettings, state: AppState) -> Result<(), StartupError> {
    let listener = bind(settings).await?;
    info!("ChemVerse API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app_router(state)).await?;
    Ok(())
}
