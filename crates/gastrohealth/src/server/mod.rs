//! HTTP backend.
//!
//! JSON endpoints under `/api` for the browser client: login, profile and
//! symptom storage, the assistant operations, the recipe library and the
//! health report.

mod error;
mod handlers;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::assistant::{Assistant, GeminiClient};
use crate::config::Config;
use crate::error::Result;
use crate::storage::Storage;

pub use error::ApiError;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The store. Every access goes through this lock so read-modify-write
    /// cycles never interleave. Use [`AppState::with_storage`] from async
    /// code; store operations are blocking file I/O.
    pub storage: Arc<Mutex<Storage>>,
    /// The diet assistant.
    pub assistant: Assistant,
}

impl AppState {
    /// Wrap a store and an assistant.
    #[must_use]
    pub fn new(storage: Storage, assistant: Assistant) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
            assistant,
        }
    }

    /// Run a store operation on the blocking thread pool while holding the
    /// store lock.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or [`crate::Error::StorageTask`] if the
    /// blocking task panicked.
    pub async fn with_storage<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Storage) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || {
            let storage = storage.blocking_lock();
            op(&storage)
        })
        .await?
    }
}

/// Build the application router.
pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/api/login", post(handlers::login))
        .route("/api/profile", post(handlers::save_profile))
        .route("/api/symptoms", post(handlers::add_symptom))
        .route("/api/gemini/meal-plan", post(handlers::meal_plan))
        .route("/api/gemini/check-food", post(handlers::check_food))
        .route("/api/gemini/analyze-triggers", post(handlers::analyze_triggers))
        .route("/api/gemini/suggest-recipe", post(handlers::suggest_recipe))
        .route("/api/recipes", get(handlers::list_recipes))
        .route("/api/users/{email}/report", get(handlers::user_report))
        .route("/api/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the store, connect the model and serve until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the model client cannot
/// be built, or the listener cannot bind.
pub async fn serve(config: &Config) -> Result<()> {
    let storage = Storage::open(config.database_path())?;
    let model = GeminiClient::new(&config.ai)?;
    let assistant = Assistant::new(Arc::new(model), config.ai.language.clone());
    info!(model = assistant.model_name(), "Assistant ready");

    let app = router(
        AppState::new(storage, assistant),
        config.server.body_limit_bytes,
    );

    let address = config.bind_addr()?;
    let listener = TcpListener::bind(address).await?;
    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::testing::ScriptedModel;
    use axum::http::StatusCode;
    use std::net::SocketAddr;
    use tempfile::TempDir;

    async fn spawn_app(body_limit: usize) -> (TempDir, SocketAddr) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("db.json")).unwrap();
        let assistant = Assistant::new(ScriptedModel::replying([]), "Vietnamese");
        let app = router(AppState::new(storage, assistant), body_limit);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (dir, addr)
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let (_dir, addr) = spawn_app(1024).await;
        let response = reqwest::Client::new()
            .get(format!("http://{addr}/api/health"))
            .header("origin", "http://localhost:5173")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }

    #[tokio::test]
    async fn test_body_limit() {
        let (_dir, addr) = spawn_app(64).await;
        let body = format!(r#"{{"email":"{}@example.com"}}"#, "a".repeat(200));
        let response = reqwest::Client::new()
            .post(format!("http://{addr}/api/login"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_with_storage_runs_store_operations() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("db.json")).unwrap();
        let state = AppState::new(
            storage,
            Assistant::new(ScriptedModel::replying([]), "Vietnamese"),
        );

        let record = state
            .with_storage(|storage| storage.login("a@example.com"))
            .await
            .unwrap();
        assert!(record.symptoms.is_empty());

        let users = state.with_storage(Storage::users).await.unwrap();
        assert_eq!(users, vec!["a@example.com".to_string()]);

        let missing = state
            .with_storage(|storage| storage.get_user("ghost@example.com"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_with_storage_reports_panics() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("db.json")).unwrap();
        let state = AppState::new(
            storage,
            Assistant::new(ScriptedModel::replying([]), "Vietnamese"),
        );

        let err = state
            .with_storage(|_| -> Result<()> { panic!("store blew up") })
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::StorageTask(_)));

        // The lock is released after a panic.
        assert!(state.with_storage(Storage::users).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (_dir, addr) = spawn_app(1024).await;
        let response = reqwest::get(format!("http://{addr}/api/nope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
