//! BizMentor - business-planning study assistant backend
//!
//! A Rust backend implementing the conversation and feedback flow for a
//! single-page study assistant, with a primary LLM provider and a one-shot
//! unavailability fallback.

mod api;
mod auth;
mod config;
mod llm;
mod logging;
mod session;

use api::{create_router, AppState};
use config::Config;
use llm::{GeminiClient, OpenAiClient, ResponseGenerator};
use logging::{DisabledLogger, FirebaseLogger, InteractionLogger};
use session::ChatController;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bizmentor=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env();

    if config.allow_list.is_empty() {
        tracing::warn!("AUTHORIZED_STUDENT_IDS is empty; every login will be rejected");
    } else {
        tracing::info!(students = config.allow_list.len(), "allow-list loaded");
    }

    // Providers. Missing keys are tolerated at startup: the provider call
    // will fail and surface as diagnostic reply text, same as any other
    // provider failure.
    if config.google_api_key.is_none() {
        tracing::warn!("GOOGLE_API_KEY not set; primary provider calls will fail");
    }
    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; fallback provider calls will fail");
    }
    let primary = GeminiClient::new(config.google_api_key.clone().unwrap_or_default(), None)?;
    let fallback = OpenAiClient::new(config.openai_api_key.clone().unwrap_or_default(), None)?;
    let generator = Arc::new(ResponseGenerator::new(Arc::new(primary), Arc::new(fallback)));

    // Interaction log store
    let logger: Arc<dyn InteractionLogger> = match &config.firebase_db_url {
        Some(url) => {
            tracing::info!(url = %url, "interaction log store configured");
            Arc::new(FirebaseLogger::new(url)?)
        }
        None => {
            tracing::warn!("FIREBASE_DB_URL not set; interaction logging disabled");
            Arc::new(DisabledLogger)
        }
    };

    let controller = ChatController::new(generator, logger);
    let state = AppState::new(
        controller,
        config.allow_list.clone(),
        &config.default_model_label,
        &config.default_system_instruction,
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("bizmentor server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
