//! REST service storing whole board documents
//!
//! | Method | Path               | Result                                  |
//! |--------|--------------------|-----------------------------------------|
//! | GET    | `/api/boards`      | every board, most recently updated first |
//! | POST   | `/api/boards`      | 201 and the stored board                |
//! | PUT    | `/api/boards/:id`  | the stored board, or 404                |
//! | DELETE | `/api/boards/:id`  | `{"message": "Board deleted"}`          |
//! | GET    | `/health`          | liveness                                |
//!
//! Errors are always `{"message": "..."}`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tasklane::{Board, BoardError, BoardId, Config, FileGateway, PersistenceGateway};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted request body. Boards travel whole, so this is generous.
pub const BODY_LIMIT: usize = 10 * 1024 * 1024;

type Gateway = Arc<dyn PersistenceGateway>;

/// Error response carrying a status and a `{"message"}` body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        let (status, message) = match &err {
            BoardError::BoardNotFound { .. } => {
                (StatusCode::NOT_FOUND, "Board not found".to_string())
            }
            BoardError::DuplicateId { .. }
            | BoardError::MalformedBoard { .. }
            | BoardError::InvalidValue { .. }
            | BoardError::Json(_) => (StatusCode::BAD_REQUEST, err.to_string()),
            _ => {
                tracing::error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };
        Self { status, message }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Oversized bodies keep their 413; anything unparsable is a 400
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

/// Build the service over any gateway
pub fn router(gateway: Gateway) -> Router {
    Router::new()
        .route("/api/boards", get(list_boards).post(create_board))
        .route("/api/boards/:id", put(replace_board).delete(delete_board))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(gateway)
}

/// Bind `addr` and serve in a background task.
///
/// Returns the bound address (useful with port 0) and the server task;
/// abort the handle to shut down.
pub async fn start_server(
    gateway: Gateway,
    addr: &str,
) -> anyhow::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    tracing::info!("board service listening on http://{}", local);

    let app = router(gateway);
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("board service error: {}", e);
        }
    });
    Ok((local, handle))
}

/// Run the service from configuration until interrupted
pub async fn run(config: Config) -> anyhow::Result<()> {
    tracing::info!(data_dir = %config.data_dir.display(), "using file storage");
    let gateway: Gateway = Arc::new(FileGateway::new(&config.data_dir));
    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        "board service listening on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "tasklane"
    }))
}

async fn list_boards(State(gateway): State<Gateway>) -> Result<Json<Vec<Board>>, ApiError> {
    Ok(Json(gateway.list_all().await?))
}

async fn create_board(
    State(gateway): State<Gateway>,
    payload: Result<Json<Board>, JsonRejection>,
) -> Result<(StatusCode, Json<Board>), ApiError> {
    let Json(board) = payload?;
    if board.id.as_str().is_empty() {
        return Err(ApiError::bad_request("board id is required"));
    }
    let stored = gateway.create(&board).await?;
    tracing::info!(board = %stored.id, "board created");
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn replace_board(
    State(gateway): State<Gateway>,
    Path(id): Path<String>,
    payload: Result<Json<Board>, JsonRejection>,
) -> Result<Json<Board>, ApiError> {
    let Json(board) = payload?;
    let stored = gateway.replace(&BoardId::from(id), &board).await?;
    tracing::debug!(board = %stored.id, "board replaced");
    Ok(Json(stored))
}

async fn delete_board(
    State(gateway): State<Gateway>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    gateway.delete(&BoardId::from(id)).await?;
    Ok(Json(json!({ "message": "Board deleted" })))
}
