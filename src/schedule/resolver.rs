use super::models::ReminderSpec;
use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Recognized time-of-day and meal anchors.
///
/// Each anchor maps to a fixed clock time. Matching happens in two
/// passes: an exact lookup over the canonical keyword table, then a
/// containment scan over an ordered phrase-priority list for looser
/// phrasing like "right after dinner, say around 9".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeAnchor {
    Morning,
    Afternoon,
    Noon,
    Evening,
    Night,
    Bedtime,
    Breakfast,
    Lunch,
    Dinner,
    BeforeBreakfast,
    AfterBreakfast,
    BeforeLunch,
    AfterLunch,
    BeforeDinner,
    AfterDinner,
}

impl TimeAnchor {
    /// Containment scan order. Compound phrases come before the bare
    /// meal words they contain, so "after dinner" wins over "dinner".
    const PHRASE_PRIORITY: [(&'static str, TimeAnchor); 12] = [
        ("before dinner", TimeAnchor::BeforeDinner),
        ("after dinner", TimeAnchor::AfterDinner),
        ("before lunch", TimeAnchor::BeforeLunch),
        ("after lunch", TimeAnchor::AfterLunch),
        ("before breakfast", TimeAnchor::BeforeBreakfast),
        ("after breakfast", TimeAnchor::AfterBreakfast),
        ("dinner", TimeAnchor::Dinner),
        ("lunch", TimeAnchor::Lunch),
        ("breakfast", TimeAnchor::Breakfast),
        ("morning", TimeAnchor::Morning),
        ("night", TimeAnchor::Night),
        ("bedtime", TimeAnchor::Bedtime),
    ];

    /// Fixed clock time the anchor resolves to
    pub fn clock_time(self) -> NaiveTime {
        let (hour, minute) = match self {
            TimeAnchor::Morning => (8, 0),
            TimeAnchor::Afternoon => (14, 0),
            TimeAnchor::Noon => (12, 0),
            TimeAnchor::Evening => (19, 0),
            TimeAnchor::Night => (21, 0),
            TimeAnchor::Bedtime => (23, 0),
            TimeAnchor::Breakfast => (8, 30),
            TimeAnchor::Lunch => (13, 30),
            TimeAnchor::Dinner => (20, 30),
            TimeAnchor::BeforeBreakfast => (8, 0),
            TimeAnchor::AfterBreakfast => (9, 0),
            TimeAnchor::BeforeLunch => (12, 30),
            TimeAnchor::AfterLunch => (13, 30),
            TimeAnchor::BeforeDinner => (19, 30),
            TimeAnchor::AfterDinner => (21, 0),
        };
        // All table values are in range
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
    }

    /// Exact match against the canonical keyword table (lower-cased input)
    pub fn from_exact(text: &str) -> Option<Self> {
        match text {
            "morning" => Some(TimeAnchor::Morning),
            "afternoon" => Some(TimeAnchor::Afternoon),
            "noon" => Some(TimeAnchor::Noon),
            "evening" => Some(TimeAnchor::Evening),
            "night" => Some(TimeAnchor::Night),
            "bedtime" => Some(TimeAnchor::Bedtime),
            "breakfast" => Some(TimeAnchor::Breakfast),
            "lunch" => Some(TimeAnchor::Lunch),
            "dinner" => Some(TimeAnchor::Dinner),
            "before breakfast" => Some(TimeAnchor::BeforeBreakfast),
            "after breakfast" => Some(TimeAnchor::AfterBreakfast),
            "before lunch" => Some(TimeAnchor::BeforeLunch),
            "after lunch" => Some(TimeAnchor::AfterLunch),
            "before dinner" => Some(TimeAnchor::BeforeDinner),
            "after dinner" => Some(TimeAnchor::AfterDinner),
            _ => None,
        }
    }

    /// Containment match over the phrase priority list, first hit wins
    pub fn from_phrase(text: &str) -> Option<Self> {
        Self::PHRASE_PRIORITY
            .iter()
            .find(|(phrase, _)| text.contains(phrase))
            .map(|&(_, anchor)| anchor)
    }
}

/// Scan free text for the first `<integer> <unit>` offset, where the
/// unit starts with "hour"/"hr" or "min" ("in 6 hours", "30 mins before
/// dinner"). A digit run not followed by a unit does not stop the scan.
/// Amounts too large for a `Duration` yield None.
pub fn parse_offset(text: &str) -> Option<Duration> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let mut unit_start = i;
        while unit_start < bytes.len() && bytes[unit_start].is_ascii_whitespace() {
            unit_start += 1;
        }
        if let Ok(amount) = text[start..i].parse::<i64>() {
            let rest = &text[unit_start..];
            if rest.starts_with("hour") || rest.starts_with("hr") {
                return Duration::try_hours(amount);
            }
            if rest.starts_with("min") {
                return Duration::try_minutes(amount);
            }
        }
    }
    None
}

/// Parse an explicit clock time, accepting "HH:MM" or "HH:MM:SS"
fn parse_clock_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    let padded;
    let text = if text.len() == 5 {
        padded = format!("{text}:00");
        &padded
    } else {
        text
    };
    NaiveTime::parse_from_str(text, "%H:%M:%S").ok()
}

/// Resolve the anchor timestamp a reminder's schedule is built from.
///
/// Total over its inputs: every reminder reaches a timestamp through the
/// fallback chain below, first matching rule wins.
///
/// 1. first explicit entry in `times`, on `now`'s date
/// 2. numeric offset in `relative_time` ("in 2 hours") added to `now`;
///    the only path that can land on a different calendar day
/// 3. exact keyword match on `relative_time`
/// 4. containment match over the phrase priority list
/// 5. 09:00 on `now`'s date
///
/// Rule 2 is deliberately checked before rules 3 and 4: "2 hours after
/// breakfast" resolves as `now + 2h`, never as breakfast's table time,
/// since the offset already encodes the meal-relative intent.
pub fn resolve_start(reminder: &ReminderSpec, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date();

    if let Some(time) = reminder.times.as_deref().and_then(|times| times.first()) {
        if let Some(parsed) = parse_clock_time(time) {
            return today.and_time(parsed);
        }
    }

    let relative = reminder
        .relative_time
        .as_deref()
        .unwrap_or("")
        .to_lowercase();

    if let Some(offset) = parse_offset(&relative) {
        // An offset too large for the calendar falls through to the
        // remaining rules instead of failing the resolution
        if let Some(shifted) = now.checked_add_signed(offset) {
            return shifted;
        }
    }
    if let Some(anchor) = TimeAnchor::from_exact(&relative) {
        return today.and_time(anchor.clock_time());
    }
    if let Some(anchor) = TimeAnchor::from_phrase(&relative) {
        return today.and_time(anchor.clock_time());
    }

    today.and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn reminder(times: Option<Vec<&str>>, relative_time: Option<&str>) -> ReminderSpec {
        ReminderSpec {
            times: times.map(|t| t.iter().map(|s| s.to_string()).collect()),
            relative_time: relative_time.map(|s| s.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_explicit_time_wins() {
        let now = at(2024, 3, 15, 17, 45, 12);
        let spec = reminder(Some(vec!["08:00"]), Some("evening"));
        assert_eq!(resolve_start(&spec, now), at(2024, 3, 15, 8, 0, 0));
    }

    #[test]
    fn test_explicit_time_with_seconds() {
        let now = at(2024, 3, 15, 17, 45, 12);
        let spec = reminder(Some(vec!["22:15:30"]), None);
        assert_eq!(resolve_start(&spec, now), at(2024, 3, 15, 22, 15, 30));
    }

    #[test]
    fn test_only_first_explicit_time_is_used() {
        let now = at(2024, 3, 15, 10, 0, 0);
        let spec = reminder(Some(vec!["06:30", "18:30"]), None);
        assert_eq!(resolve_start(&spec, now), at(2024, 3, 15, 6, 30, 0));
    }

    #[test]
    fn test_unparsable_explicit_time_falls_back() {
        let now = at(2024, 3, 15, 10, 0, 0);
        let spec = reminder(Some(vec!["around eight"]), Some("bedtime"));
        assert_eq!(resolve_start(&spec, now), at(2024, 3, 15, 23, 0, 0));
    }

    #[test]
    fn test_hour_offset() {
        let now = at(2024, 1, 1, 10, 30, 0);
        let spec = reminder(None, Some("in 6 hours"));
        assert_eq!(resolve_start(&spec, now), at(2024, 1, 1, 16, 30, 0));
    }

    #[test]
    fn test_hour_offset_crosses_midnight() {
        let now = at(2024, 1, 1, 23, 0, 0);
        let spec = reminder(None, Some("in 2 hours"));
        assert_eq!(resolve_start(&spec, now), at(2024, 1, 2, 1, 0, 0));
    }

    #[test]
    fn test_minute_offset() {
        let now = at(2024, 1, 1, 10, 0, 0);
        let spec = reminder(None, Some("after 30 mins"));
        assert_eq!(resolve_start(&spec, now), at(2024, 1, 1, 10, 30, 0));
    }

    #[test]
    fn test_offset_without_space_before_unit() {
        let now = at(2024, 1, 1, 10, 0, 0);
        let spec = reminder(None, Some("2hrs from now"));
        assert_eq!(resolve_start(&spec, now), at(2024, 1, 1, 12, 0, 0));
    }

    #[test]
    fn test_offset_beats_meal_anchor() {
        // The offset already encodes the meal-relative intent
        let now = at(2024, 1, 1, 10, 0, 0);
        let spec = reminder(None, Some("2 hours after breakfast"));
        assert_eq!(resolve_start(&spec, now), at(2024, 1, 1, 12, 0, 0));
    }

    #[test]
    fn test_digit_run_without_unit_does_not_stop_scan() {
        let now = at(2024, 1, 1, 10, 0, 0);
        let spec = reminder(None, Some("dose 2, in 45 minutes"));
        assert_eq!(resolve_start(&spec, now), at(2024, 1, 1, 10, 45, 0));
    }

    #[test]
    fn test_exact_keywords() {
        let now = at(2024, 1, 1, 10, 0, 0);
        let cases = [
            ("morning", (8, 0)),
            ("afternoon", (14, 0)),
            ("noon", (12, 0)),
            ("evening", (19, 0)),
            ("night", (21, 0)),
            ("bedtime", (23, 0)),
            ("breakfast", (8, 30)),
            ("lunch", (13, 30)),
            ("dinner", (20, 30)),
            ("before breakfast", (8, 0)),
            ("after breakfast", (9, 0)),
            ("before lunch", (12, 30)),
            ("after lunch", (13, 30)),
            ("before dinner", (19, 30)),
            ("after dinner", (21, 0)),
        ];
        for (keyword, (hour, minute)) in cases {
            let spec = reminder(None, Some(keyword));
            assert_eq!(
                resolve_start(&spec, now),
                at(2024, 1, 1, hour, minute, 0),
                "keyword: {keyword}"
            );
        }
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        let now = at(2024, 1, 1, 10, 0, 0);
        let spec = reminder(None, Some("Bedtime"));
        assert_eq!(resolve_start(&spec, now), at(2024, 1, 1, 23, 0, 0));
    }

    #[test]
    fn test_phrase_containment() {
        let now = at(2024, 1, 1, 10, 0, 0);
        let spec = reminder(None, Some("right after dinner, say around nine"));
        assert_eq!(resolve_start(&spec, now), at(2024, 1, 1, 21, 0, 0));
    }

    #[test]
    fn test_compound_phrase_beats_bare_meal_word() {
        assert_eq!(
            TimeAnchor::from_phrase("just before dinner tonight"),
            Some(TimeAnchor::BeforeDinner)
        );
        assert_eq!(
            TimeAnchor::from_phrase("with dinner"),
            Some(TimeAnchor::Dinner)
        );
    }

    #[test]
    fn test_default_fallback() {
        let now = at(2024, 1, 1, 17, 0, 0);
        let spec = reminder(None, None);
        assert_eq!(resolve_start(&spec, now), at(2024, 1, 1, 9, 0, 0));

        let spec = reminder(None, Some("whenever convenient"));
        assert_eq!(resolve_start(&spec, now), at(2024, 1, 1, 9, 0, 0));
    }

    #[test]
    fn test_parse_offset_units() {
        assert_eq!(parse_offset("1 hour"), Some(Duration::hours(1)));
        assert_eq!(parse_offset("3 hrs"), Some(Duration::hours(3)));
        assert_eq!(parse_offset("15 minutes"), Some(Duration::minutes(15)));
        assert_eq!(parse_offset("10 min"), Some(Duration::minutes(10)));
        assert_eq!(parse_offset("soon"), None);
        assert_eq!(parse_offset("take 2 pills"), None);
    }

    #[test]
    fn test_parse_offset_rejects_oversized_amounts() {
        // Beyond Duration's representable range
        assert_eq!(parse_offset("9999999999999 hours"), None);
        assert_eq!(parse_offset("9999999999999999 minutes"), None);
    }

    #[test]
    fn test_oversized_offset_falls_through_without_panicking() {
        let now = at(2024, 1, 1, 10, 0, 0);

        // Overflows Duration construction; no anchor left, so 09:00 default
        let spec = reminder(None, Some("in 9999999999999 hours"));
        assert_eq!(resolve_start(&spec, now), at(2024, 1, 1, 9, 0, 0));

        // Representable Duration, but the sum leaves the calendar range
        let spec = reminder(None, Some("in 9999999999 hours"));
        assert_eq!(resolve_start(&spec, now), at(2024, 1, 1, 9, 0, 0));

        // Representable Duration that still overflows the calendar when
        // added; the meal anchor takes over
        let spec = reminder(None, Some("9999999999 hours after dinner"));
        assert_eq!(resolve_start(&spec, now), at(2024, 1, 1, 21, 0, 0));
    }
}
