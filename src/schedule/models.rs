use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structured reminder fields produced by the extraction step.
///
/// Every field is optional: the extractor returns null for anything the
/// user did not say, and the downstream logic must cope with any subset
/// being absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ReminderSpec {
    /// Name of the medicine (e.g. "Metformin", "thyroid pill")
    pub medication_name: Option<String>,
    /// Short summary sentence built from the user's own words
    pub description: Option<String>,
    /// Dosage text (e.g. "500mg"); passed through, never interpreted
    pub dosage: Option<String>,
    /// Explicit 24-hour clock times ("HH:MM"), in the order spoken
    pub times: Option<Vec<String>>,
    /// Repetition cadence text (e.g. "daily", "twice a day", "weekly")
    pub frequency: Option<String>,
    /// English weekday names (e.g. ["Monday", "Wednesday"])
    pub days_of_week: Option<Vec<String>>,
    /// Treatment length text (e.g. "5 days", "2 months")
    pub duration: Option<String>,
    /// Time-of-day or meal anchor ("morning", "30 mins before dinner")
    pub relative_time: Option<String>,
    /// Extra conditions; passed through, never interpreted
    pub notes: Option<String>,
}

/// Top-level shape the extraction collaborator returns
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionResult {
    #[serde(default)]
    pub reminders: Vec<ReminderSpec>,
}

/// Google Calendar v3 event body (the subset this service writes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    /// One-element RRULE string list, if the reminder repeats
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Vec<String>>,
    pub reminders: EventReminders,
    pub attendees: Vec<Attendee>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
}
