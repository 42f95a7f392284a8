use crate::calendar::CalendarApi;
use crate::config::Config;
use crate::error::Error;
use crate::extraction::ReminderExtractor;
use crate::schedule::builder::build_event;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub extractor: Arc<dyn ReminderExtractor>,
    pub calendar: Arc<dyn CalendarApi>,
}

#[derive(Debug, Deserialize)]
pub struct ReminderRequest {
    pub prompt: Option<String>,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/reminder", post(create_reminder_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Handler for health checks
pub async fn health_handler() -> StatusCode {
    StatusCode::OK
}

/// Handler for POST /reminder: extract structured reminders from the
/// prompt and create one calendar event per reminder. The first
/// calendar failure aborts the rest of the batch.
pub async fn create_reminder_handler(
    State(state): State<AppState>,
    Json(request): Json<ReminderRequest>,
) -> (StatusCode, Json<Value>) {
    let Some(prompt) = request.prompt.filter(|p| !p.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Prompt is required"})),
        );
    };

    let reminders = match state.extractor.extract(&prompt).await {
        Ok(reminders) => reminders,
        Err(e) => {
            error!("Reminder extraction failed: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal Server Error", "details": e.to_string()})),
            );
        }
    };

    if reminders.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "No reminders found"})),
        );
    }

    let settings = {
        let config_read = state.config.read().await;
        config_read.event_settings()
    };

    let mut events_created = Vec::with_capacity(reminders.len());
    for reminder in &reminders {
        // One "now" per build keeps each event deterministic for its inputs
        let now = Local::now().naive_local();
        let event = build_event(reminder, now, &settings);

        match state.calendar.insert_event(&event).await {
            Ok(link) => events_created.push(link),
            Err(e @ Error::GoogleCalendar(_)) => {
                error!("Calendar event creation failed: {:?}", e);
                return (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({"error": "Google Calendar API error", "details": e.to_string()})),
                );
            }
            Err(e) => {
                error!("Unexpected error creating event: {:?}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Internal Server Error", "details": e.to_string()})),
                );
            }
        }
    }

    info!("Created {} calendar event(s)", events_created.len());

    (
        StatusCode::OK,
        Json(json!({"status": "success", "events_created": events_created})),
    )
}
