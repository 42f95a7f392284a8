/// Repeat cadence for a recurrence rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
}

impl Frequency {
    fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
        }
    }
}

/// Recurrence rule for a repeating reminder.
///
/// Serialization order is fixed because the calendar service parses the
/// result as an RFC 5545 RRULE string: FREQ, INTERVAL (when > 1), the
/// BYHOUR/BYMINUTE pair, BYDAY, COUNT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub freq: Frequency,
    pub interval: u32,
    /// Per-day dose hours; paired with BYMINUTE=0 on output
    pub by_hour: Vec<u32>,
    /// Two-letter weekday codes, input order preserved
    pub by_day: Vec<&'static str>,
    /// Total occurrence bound; unbounded when absent
    pub count: Option<u32>,
}

impl RecurrenceRule {
    pub fn new(freq: Frequency, interval: u32) -> Self {
        Self {
            freq,
            interval,
            by_hour: Vec::new(),
            by_day: Vec::new(),
            count: None,
        }
    }

    /// Serialize as an "RRULE:" string for the event's recurrence list
    pub fn to_rrule(&self) -> String {
        let mut parts = vec![format!("FREQ={}", self.freq.as_str())];

        if self.interval > 1 {
            parts.push(format!("INTERVAL={}", self.interval));
        }

        if !self.by_hour.is_empty() {
            let hours: Vec<String> = self.by_hour.iter().map(u32::to_string).collect();
            parts.push(format!("BYHOUR={}", hours.join(",")));
            parts.push(String::from("BYMINUTE=0"));
        }

        if !self.by_day.is_empty() {
            parts.push(format!("BYDAY={}", self.by_day.join(",")));
        }

        if let Some(count) = self.count {
            parts.push(format!("COUNT={}", count));
        }

        format!("RRULE:{}", parts.join(";"))
    }
}

/// Map an English weekday name to its RRULE code. Names are matched
/// case-sensitively; anything unrecognized maps to None and is dropped
/// by the caller.
pub fn weekday_code(name: &str) -> Option<&'static str> {
    match name {
        "Monday" => Some("MO"),
        "Tuesday" => Some("TU"),
        "Wednesday" => Some("WE"),
        "Thursday" => Some("TH"),
        "Friday" => Some("FR"),
        "Saturday" => Some("SA"),
        "Sunday" => Some("SU"),
        _ => None,
    }
}
