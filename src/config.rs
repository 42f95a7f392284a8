use crate::error::{config_error, env_error, AppResult};
use crate::schedule::builder::EventSettings;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

/// Default IANA timezone attached to event start and end times
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

/// Default Gemini model used for reminder extraction
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro-exp-03-25";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 6000;

/// Main configuration structure for the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Gemini API key for reminder extraction
    pub gemini_api_key: String,
    /// Gemini model name
    pub gemini_model: String,
    /// Google Calendar API client ID
    pub google_client_id: String,
    /// Google Calendar API client secret
    pub google_client_secret: String,
    /// Google Calendar ID to create events in
    pub google_calendar_id: String,
    /// Path of the cached OAuth token file
    pub token_file: String,
    /// IANA timezone label attached to created events
    pub timezone: String,
    /// Address invited to every created event
    pub attendee_email: String,
    /// HTTP port to listen on
    pub port: u16,
}

/// Optional file-based overrides for event settings
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    timezone: Option<String>,
    attendee_email: Option<String>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let gemini_api_key =
            env::var("GEMINI_API_KEY").map_err(|_| env_error("GEMINI_API_KEY"))?;
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;
        let attendee_email =
            env::var("ATTENDEE_EMAIL").map_err(|_| env_error("ATTENDEE_EMAIL"))?;

        // Optional environment variables with defaults
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| String::from(DEFAULT_GEMINI_MODEL));
        let google_calendar_id =
            env::var("GOOGLE_CALENDAR_ID").unwrap_or_else(|_| String::from("primary"));
        let token_file = env::var("TOKEN_FILE").unwrap_or_else(|_| String::from("token.json"));
        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from(DEFAULT_TIMEZONE));

        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| env_error("Invalid PORT format"))?,
            Err(_) => DEFAULT_PORT,
        };

        let mut config = Config {
            gemini_api_key,
            gemini_model,
            google_client_id,
            google_client_secret,
            google_calendar_id,
            token_file,
            timezone,
            attendee_email,
            port,
        };

        // Load event setting overrides from file if it exists
        if let Ok(content) = fs::read_to_string("config/settings.toml") {
            if let Ok(settings) = toml::from_str::<FileSettings>(&content) {
                if let Some(timezone) = settings.timezone {
                    config.timezone = timezone;
                }
                if let Some(attendee_email) = settings.attendee_email {
                    config.attendee_email = attendee_email;
                }
            }
        }

        // Google Calendar silently misplaces events on an unknown zone,
        // so reject the label up front
        config
            .timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|_| config_error(&format!("Unknown timezone: {}", config.timezone)))?;

        Ok(config)
    }

    /// Values the event builder needs from the configuration
    pub fn event_settings(&self) -> EventSettings {
        EventSettings {
            timezone: self.timezone.clone(),
            attendee_email: self.attendee_email.clone(),
        }
    }
}
