use super::models::{
    Attendee, CalendarEvent, EventDateTime, EventReminders, ReminderOverride, ReminderSpec,
};
use super::recurrence::{weekday_code, Frequency, RecurrenceRule};
use super::resolver::resolve_start;
use chrono::{Duration, NaiveDateTime, NaiveTime};
use tracing::debug;

/// Fixed labels used when the extraction step leaves a field empty
const DEFAULT_SUMMARY: &str = "Medication Reminder";
const DEFAULT_DESCRIPTION: &str = "Take your medicine";
const EVENT_LOCATION: &str = "Home";

/// Every reminder event spans 15 minutes and alerts 10 minutes before
const EVENT_DURATION_MINUTES: i64 = 15;
const ALERT_MINUTES_BEFORE: u32 = 10;

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Per-deployment values injected into the builder
#[derive(Debug, Clone)]
pub struct EventSettings {
    /// IANA timezone label attached to start and end times
    pub timezone: String,
    /// Address invited to every created event
    pub attendee_email: String,
}

/// How many distinct times per day a medication is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseSchedule {
    Single,
    TwiceDaily,
    ThriceDaily,
}

impl DoseSchedule {
    /// Detect multi-dose phrasing in the lower-cased frequency text
    pub fn from_frequency(frequency: &str) -> Self {
        const TWICE: [&str; 3] = ["twice", "two times", "2 times"];
        const THRICE: [&str; 3] = ["thrice", "three times", "3 times"];

        if TWICE.iter().any(|phrase| frequency.contains(phrase)) {
            DoseSchedule::TwiceDaily
        } else if THRICE.iter().any(|phrase| frequency.contains(phrase)) {
            DoseSchedule::ThriceDaily
        } else {
            DoseSchedule::Single
        }
    }

    /// Fixed per-day dose hours; empty for a single daily dose
    pub fn dose_hours(self) -> &'static [u32] {
        match self {
            DoseSchedule::Single => &[],
            DoseSchedule::TwiceDaily => &[8, 20],
            DoseSchedule::ThriceDaily => &[8, 13, 20],
        }
    }

    /// Occurrence-count multiplier (doses per day)
    pub fn multiplier(self) -> u32 {
        match self {
            DoseSchedule::Single => 1,
            DoseSchedule::TwiceDaily => 2,
            DoseSchedule::ThriceDaily => 3,
        }
    }
}

/// Outcome of reading the treatment-length text.
///
/// `NotGiven` and `Unparsable` both leave the rule without a COUNT, but
/// keeping them apart makes the silent omission diagnosable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationSpec {
    NotGiven,
    Unparsable,
    Days(u32),
}

impl DurationSpec {
    /// Parse "5 days" / "3 weeks" / "2 months" into a day count. The
    /// first integer anywhere in the text is taken; months count as 30
    /// days, weeks as 7.
    pub fn parse(duration: Option<&str>) -> Self {
        let Some(text) = duration else {
            return DurationSpec::NotGiven;
        };
        if text.trim().is_empty() {
            return DurationSpec::NotGiven;
        }
        let text = text.to_lowercase();

        let Some(number) = first_integer(&text) else {
            return DurationSpec::Unparsable;
        };

        let days = if text.contains("month") {
            number.checked_mul(30)
        } else if text.contains("week") {
            number.checked_mul(7)
        } else if text.contains("day") {
            Some(number)
        } else {
            None
        };

        match days {
            Some(days) if days > 0 => DurationSpec::Days(days),
            _ => DurationSpec::Unparsable,
        }
    }
}

/// First run of digits anywhere in the text
fn first_integer(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: &str = &text[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

/// Build one calendar event for one reminder.
///
/// Total over its inputs: malformed frequency or duration text only
/// drops the corresponding recurrence component, never fails the build.
/// `now` is captured once by the caller so the result is deterministic
/// and testable.
pub fn build_event(
    reminder: &ReminderSpec,
    now: NaiveDateTime,
    settings: &EventSettings,
) -> CalendarEvent {
    let frequency = reminder
        .frequency
        .as_deref()
        .unwrap_or("")
        .to_lowercase();

    // Nominal anchor from the resolver. Multi-dose schedules re-anchor
    // to 08:00 on the same date so the BYHOUR slots line up from day one.
    let mut start = resolve_start(reminder, now);
    let dose = DoseSchedule::from_frequency(&frequency);
    if dose != DoseSchedule::Single {
        start = start
            .date()
            .and_time(NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default());
    }
    let end = start + Duration::minutes(EVENT_DURATION_MINUTES);

    let mut rule = if frequency.contains("weekly") {
        RecurrenceRule::new(Frequency::Weekly, 1)
    } else if frequency.contains("alternate") {
        RecurrenceRule::new(Frequency::Daily, 2)
    } else {
        // Default cadence; multi-dose multiplicity is expressed through
        // BYHOUR slots, not the frequency unit
        RecurrenceRule::new(Frequency::Daily, 1)
    };

    rule.by_hour = dose.dose_hours().to_vec();

    if let Some(days) = &reminder.days_of_week {
        rule.by_day = days.iter().filter_map(|day| weekday_code(day)).collect();
    }

    match DurationSpec::parse(reminder.duration.as_deref()) {
        DurationSpec::Days(days) => {
            rule.count = Some(days.saturating_mul(dose.multiplier()));
        }
        DurationSpec::Unparsable => {
            debug!(
                duration = ?reminder.duration,
                "no occurrence count derived from duration text"
            );
        }
        DurationSpec::NotGiven => {}
    }

    let summary = reminder
        .medication_name
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| String::from(DEFAULT_SUMMARY));
    let description = reminder
        .description
        .clone()
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| String::from(DEFAULT_DESCRIPTION));

    CalendarEvent {
        summary,
        location: String::from(EVENT_LOCATION),
        description,
        start: EventDateTime {
            date_time: start.format(DATE_TIME_FORMAT).to_string(),
            time_zone: settings.timezone.clone(),
        },
        end: EventDateTime {
            date_time: end.format(DATE_TIME_FORMAT).to_string(),
            time_zone: settings.timezone.clone(),
        },
        recurrence: Some(vec![rule.to_rrule()]),
        reminders: EventReminders {
            use_default: false,
            overrides: vec![ReminderOverride {
                method: String::from("popup"),
                minutes: ALERT_MINUTES_BEFORE,
            }],
        },
        attendees: vec![Attendee {
            email: settings.attendee_email.clone(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dose_schedule_phrases() {
        assert_eq!(
            DoseSchedule::from_frequency("twice a day"),
            DoseSchedule::TwiceDaily
        );
        assert_eq!(
            DoseSchedule::from_frequency("2 times daily"),
            DoseSchedule::TwiceDaily
        );
        assert_eq!(
            DoseSchedule::from_frequency("thrice a day"),
            DoseSchedule::ThriceDaily
        );
        assert_eq!(
            DoseSchedule::from_frequency("three times a day"),
            DoseSchedule::ThriceDaily
        );
        assert_eq!(DoseSchedule::from_frequency("daily"), DoseSchedule::Single);
        assert_eq!(DoseSchedule::from_frequency(""), DoseSchedule::Single);
    }

    #[test]
    fn test_duration_parse() {
        assert_eq!(DurationSpec::parse(None), DurationSpec::NotGiven);
        assert_eq!(DurationSpec::parse(Some("")), DurationSpec::NotGiven);
        assert_eq!(DurationSpec::parse(Some("5 days")), DurationSpec::Days(5));
        assert_eq!(DurationSpec::parse(Some("3 weeks")), DurationSpec::Days(21));
        assert_eq!(
            DurationSpec::parse(Some("2 months")),
            DurationSpec::Days(60)
        );
        assert_eq!(
            DurationSpec::parse(Some("a fortnight")),
            DurationSpec::Unparsable
        );
        assert_eq!(
            DurationSpec::parse(Some("5 doses")),
            DurationSpec::Unparsable
        );
        assert_eq!(
            DurationSpec::parse(Some("0 days")),
            DurationSpec::Unparsable
        );
    }

    #[test]
    fn test_first_integer() {
        assert_eq!(first_integer("for 10 days"), Some(10));
        assert_eq!(first_integer("2 months"), Some(2));
        assert_eq!(first_integer("no digits here"), None);
    }
}
