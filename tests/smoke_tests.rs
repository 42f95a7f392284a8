use dosecal::config::Config;
use dosecal::schedule::models::ReminderSpec;

/// Smoke test to verify that a config can be constructed and that the
/// event settings carry the configured values
#[test]
fn test_config_event_settings() {
    let config = Config {
        gemini_api_key: String::new(),
        gemini_model: "test_model".to_string(),
        google_client_id: String::new(),
        google_client_secret: String::new(),
        google_calendar_id: "primary".to_string(),
        token_file: "token.json".to_string(),
        timezone: "Asia/Kolkata".to_string(),
        attendee_email: "caregiver@example.com".to_string(),
        port: 6000,
    };

    let settings = config.event_settings();
    assert_eq!(settings.timezone, "Asia/Kolkata");
    assert_eq!(settings.attendee_email, "caregiver@example.com");
}

/// A reminder with every field absent deserializes cleanly
#[test]
fn test_reminder_spec_tolerates_nulls() {
    let json = r#"{
        "medication_name": null,
        "description": null,
        "dosage": null,
        "times": null,
        "frequency": null,
        "days_of_week": null,
        "duration": null,
        "relative_time": null,
        "notes": null
    }"#;

    let spec: ReminderSpec = serde_json::from_str(json).unwrap();
    assert!(spec.medication_name.is_none());
    assert!(spec.times.is_none());

    // Entirely empty objects work too
    let spec: ReminderSpec = serde_json::from_str("{}").unwrap();
    assert!(spec.frequency.is_none());
}
