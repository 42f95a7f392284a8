use super::token::TokenManager;
use crate::config::Config;
use crate::error::{google_calendar_error, AppResult};
use crate::schedule::models::CalendarEvent;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use url::Url;

/// Calendar collaborator: inserts one event per reminder and returns
/// the created event's shareable link
#[async_trait]
pub trait CalendarApi: Send + Sync + 'static {
    async fn insert_event(&self, event: &CalendarEvent) -> AppResult<String>;
}

/// Google Calendar v3 client
pub struct GoogleCalendarClient {
    config: Arc<RwLock<Config>>,
    token_manager: TokenManager,
    client: Client,
}

impl GoogleCalendarClient {
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self {
            token_manager: TokenManager::new(Arc::clone(&config)),
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn insert_event(&self, event: &CalendarEvent) -> AppResult<String> {
        // Get calendar ID from config
        let calendar_id = {
            let config_read = self.config.read().await;
            config_read.google_calendar_id.clone()
        };

        // Get authentication token
        let token = self.token_manager.get_token().await?;
        let access_token = token
            .get("access_token")
            .and_then(|t| t.as_str())
            .ok_or_else(|| google_calendar_error("No access token available"))?;

        let url_str = format!(
            "https://www.googleapis.com/calendar/v3/calendars/{}/events",
            calendar_id
        );

        let url = Url::parse(&url_str)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        // Make API request
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(event)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to create event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to create event: HTTP {} - {}",
                status, error_body
            )));
        }

        let created: serde_json::Value = response.json().await.map_err(|e| {
            google_calendar_error(&format!("Failed to parse create response: {}", e))
        })?;

        let link = created
            .get("htmlLink")
            .and_then(|l| l.as_str())
            .unwrap_or("")
            .to_string();

        info!("Created calendar event for '{}': {}", event.summary, link);

        Ok(link)
    }
}
