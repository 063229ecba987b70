//! HTTP request handlers

use super::types::{
    ChatRequest, ChatResponse, ErrorResponse, FeedbackRequest, FeedbackResponse, LoginRequest,
    LoginResponse, ModelInfo, ModelsResponse, SessionResponse, SettingsRequest, SuccessResponse,
    TurnView,
};
use super::AppState;
use crate::llm;
use crate::session::{ControllerError, SessionState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session lifecycle
        .route("/api/login", post(login))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/logout", post(logout))
        // Chat actions
        .route("/api/sessions/:id/chat", post(send_chat))
        .route("/api/sessions/:id/feedback", post(resolve_feedback))
        .route("/api/sessions/:id/clear", post(clear_session))
        // Developer settings
        .route("/api/sessions/:id/settings", post(update_settings))
        // Model info
        .route("/api/models", get(list_models))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let student_id = req.student_id.trim();
    if student_id.is_empty() {
        return Err(AppError::BadRequest("student_id is required".to_string()));
    }
    if !state.allow_list.contains(student_id) {
        return Err(AppError::Unauthorized("Invalid Student ID".to_string()));
    }

    let session = SessionState::new(
        student_id,
        &*state.default_model_label,
        &*state.default_system_instruction,
    );
    let session_id = state.sessions.insert(session).await;

    tracing::info!(user = student_id, "session opened");

    Ok(Json(LoginResponse {
        session_id,
        user_id: student_id.to_string(),
    }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.get(&id).await.ok_or_else(session_missing)?;
    let session = session.lock().await;

    Ok(Json(SessionResponse {
        user_id: session.user_id.clone(),
        model: session.model_label.clone(),
        turns: session.turns().iter().map(TurnView::from).collect(),
        feedback_pending: session.feedback_pending(),
        input_disabled: session.feedback_pending(),
    }))
}

async fn logout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.sessions.remove(&id).await {
        return Err(session_missing());
    }
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Chat Actions
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let session = state.sessions.get(&id).await.ok_or_else(session_missing)?;
    let mut session = session.lock().await;

    let outcome = state
        .controller
        .submit_prompt(&mut session, &req.text)
        .await
        .map_err(controller_error)?;

    Ok(Json(ChatResponse {
        reply: outcome.reply.unwrap_or_default(),
        feedback_pending: session.feedback_pending(),
        warnings: outcome.warnings,
    }))
}

async fn resolve_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let session = state.sessions.get(&id).await.ok_or_else(session_missing)?;
    let mut session = session.lock().await;

    let outcome = state
        .controller
        .resolve_feedback(&mut session, req.understood)
        .await
        .map_err(controller_error)?;

    Ok(Json(FeedbackResponse {
        reply: outcome.reply,
        feedback_pending: session.feedback_pending(),
        warnings: outcome.warnings,
    }))
}

async fn clear_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let session = state.sessions.get(&id).await.ok_or_else(session_missing)?;
    session.lock().await.clear();
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Developer Settings
// ============================================================

async fn update_settings(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SettingsRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    // Validate the label before touching the session: unknown labels must
    // never get past this boundary.
    if let Some(label) = &req.model {
        if llm::resolve(label).is_none() {
            return Err(AppError::BadRequest(format!("unknown model: {label}")));
        }
    }

    let session = state.sessions.get(&id).await.ok_or_else(session_missing)?;
    let mut session = session.lock().await;

    if let Some(label) = req.model {
        session.model_label = label;
    }
    if let Some(instruction) = req.system_instruction {
        session.system_instruction = instruction;
    }

    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Model Info
// ============================================================

async fn list_models() -> Json<ModelsResponse> {
    let models = llm::all_models()
        .iter()
        .map(|m| ModelInfo {
            label: m.label,
            description: m.description,
        })
        .collect();

    Json(ModelsResponse {
        models,
        default: llm::DEFAULT_MODEL_LABEL,
    })
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("bizmentor ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
}

fn session_missing() -> AppError {
    AppError::NotFound("session not found".to_string())
}

fn controller_error(err: ControllerError) -> AppError {
    match err {
        ControllerError::FeedbackPending | ControllerError::NothingToResolve => {
            AppError::Conflict(err.to_string())
        }
        ControllerError::UnknownModel(_) | ControllerError::EmptyPrompt => {
            AppError::BadRequest(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
