use chrono::{DateTime, TimeDelta, Utc};
use chrono_english::{parse_date_string, Dialect};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static COMPACT_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:in\s+)?(?:\d+\s*[a-z]+[\s,]*)+$").expect("compact duration regex")
});

static COMPACT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*([a-z]+)").expect("compact token regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("Unable to parse specified duration; invalid time!")]
    Unparsable,
    #[error("Duration provided must be in the future!")]
    NotInFuture,
}

/// Turns free text into an absolute instant, relative to `now`.
///
/// Implementations must be strict: anything they cannot fully account for is
/// `None`, never a best guess.
pub trait DateParser: Send + Sync {
    fn parse(&self, text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>>;
}

/// Production parser.
///
/// Accepts the short relative forms people type into moderation commands
/// (`30s`, `10m`, `1h30m`, `in 2 hours`) and hands everything else to
/// chrono-english, with UTC as the reference zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishDateParser;

impl EnglishDateParser {
    fn parse_compact(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if !COMPACT_FORM.is_match(text) {
            return None;
        }

        let mut total = TimeDelta::zero();
        for captures in COMPACT_TOKEN.captures_iter(text) {
            let value: i64 = captures[1].parse().ok()?;
            let unit_seconds = match captures[2].to_ascii_lowercase().as_str() {
                "s" | "sec" | "secs" | "second" | "seconds" => 1,
                "m" | "min" | "mins" | "minute" | "minutes" => 60,
                "h" | "hr" | "hrs" | "hour" | "hours" => 3_600,
                "d" | "day" | "days" => 86_400,
                "w" | "wk" | "wks" | "week" | "weeks" => 604_800,
                _ => return None,
            };
            let part = TimeDelta::try_seconds(value.checked_mul(unit_seconds)?)?;
            total = total.checked_add(&part)?;
        }

        now.checked_add_signed(total)
    }

    fn points_backwards(text: &str) -> bool {
        let lowered = text.to_ascii_lowercase();
        lowered
            .split_whitespace()
            .any(|word| matches!(word, "ago" | "last" | "yesterday"))
    }
}

impl DateParser for EnglishDateParser {
    fn parse(&self, text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Some(instant) = Self::parse_compact(text, now) {
            return Some(instant);
        }

        let parsed = parse_date_string(text, now, Dialect::Uk).ok()?;
        if parsed > now || Self::points_backwards(text) {
            return Some(parsed);
        }

        // "friday" or "10am" already behind us: prefer the next occurrence
        match parse_date_string(&format!("next {text}"), now, Dialect::Uk) {
            Ok(next) if next > now => Some(next),
            _ => Some(parsed),
        }
    }
}

/// Result of resolving a duration string against a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDuration {
    anchor: DateTime<Utc>,
    resolved: Result<DateTime<Utc>, TimeParseError>,
}

impl ParsedDuration {
    pub fn resolve(parser: &dyn DateParser, text: &str, now: DateTime<Utc>) -> Self {
        let resolved = match parser.parse(text, now) {
            None => Err(TimeParseError::Unparsable),
            Some(instant) if instant <= now => Err(TimeParseError::NotInFuture),
            Some(instant) => Ok(instant),
        };

        ParsedDuration {
            anchor: now,
            resolved,
        }
    }

    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    pub fn is_valid(&self) -> bool {
        self.resolved.is_ok()
    }

    pub fn instant(&self) -> Result<DateTime<Utc>, TimeParseError> {
        self.resolved
    }

    /// Time from the anchor to the resolved instant, rounded to the nearest
    /// second with halves rounded up.
    pub fn delta(&self) -> Result<TimeDelta, TimeParseError> {
        let exact = self.resolved? - self.anchor;

        let mut seconds = exact.num_seconds();
        if exact.subsec_nanos() >= 500_000_000 {
            seconds += 1;
        }

        if seconds <= 0 {
            return Err(TimeParseError::NotInFuture);
        }

        TimeDelta::try_seconds(seconds).ok_or(TimeParseError::Unparsable)
    }
}

/// Resolves `text` against the current time on the blocking pool.
pub async fn resolve_from_now(text: &str) -> ParsedDuration {
    let now = Utc::now();
    let owned = text.to_owned();

    match tokio::task::spawn_blocking(move || {
        ParsedDuration::resolve(&EnglishDateParser, &owned, now)
    })
    .await
    {
        Ok(parsed) => {
            if !parsed.is_valid() {
                tracing::debug!("Rejected duration {:?}", text);
            }
            parsed
        }
        Err(e) => {
            tracing::warn!("Duration parse task failed for {:?}: {}", text, e);
            ParsedDuration {
                anchor: now,
                resolved: Err(TimeParseError::Unparsable),
            }
        }
    }
}

pub fn human_readable(duration: TimeDelta) -> String {
    let seconds = duration.num_seconds();

    let (value, unit) = if seconds < 60 {
        (seconds, "second")
    } else if seconds < 3600 {
        (duration.num_minutes(), "minute")
    } else if seconds < 86400 {
        (duration.num_hours(), "hour")
    } else {
        (duration.num_days(), "day")
    };

    if value == 1 {
        format!("{} {}", value, unit)
    } else {
        format!("{} {}s", value, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FixedParser(Option<DateTime<Utc>>);

    impl DateParser for FixedParser {
        fn parse(&self, _text: &str, _now: DateTime<Utc>) -> Option<DateTime<Utc>> {
            self.0
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn unparsable_input_is_invalid() {
        let parsed = ParsedDuration::resolve(&FixedParser(None), "whenever", now());
        assert!(!parsed.is_valid());
        assert_eq!(parsed.instant(), Err(TimeParseError::Unparsable));
        assert_eq!(parsed.delta(), Err(TimeParseError::Unparsable));
    }

    #[test]
    fn past_and_present_instants_are_invalid() {
        for offset in [-3600, -1, 0] {
            let instant = now() + TimeDelta::seconds(offset);
            let parsed = ParsedDuration::resolve(&FixedParser(Some(instant)), "x", now());
            assert_eq!(parsed.instant(), Err(TimeParseError::NotInFuture));
        }
    }

    #[test]
    fn future_instant_is_kept_as_is() {
        let instant = now() + TimeDelta::minutes(90);
        let parsed = ParsedDuration::resolve(&FixedParser(Some(instant)), "x", now());
        assert!(parsed.is_valid());
        assert_eq!(parsed.anchor(), now());
        assert_eq!(parsed.instant(), Ok(instant));
        assert_eq!(parsed.delta(), Ok(TimeDelta::minutes(90)));
    }

    #[test]
    fn delta_rounds_to_nearest_second() {
        let cases = [
            (TimeDelta::milliseconds(10_400), 10),
            (TimeDelta::milliseconds(10_500), 11),
            (TimeDelta::milliseconds(10_600), 11),
            (TimeDelta::milliseconds(600), 1),
        ];

        for (offset, expected) in cases {
            let parsed =
                ParsedDuration::resolve(&FixedParser(Some(now() + offset)), "x", now());
            assert_eq!(parsed.delta(), Ok(TimeDelta::seconds(expected)));
        }
    }

    #[test]
    fn delta_rounding_to_zero_is_not_in_future() {
        let parsed = ParsedDuration::resolve(
            &FixedParser(Some(now() + TimeDelta::milliseconds(200))),
            "x",
            now(),
        );
        assert!(parsed.is_valid());
        assert_eq!(parsed.delta(), Err(TimeParseError::NotInFuture));
    }

    #[test]
    fn compact_forms() {
        let parser = EnglishDateParser;
        let cases = [
            ("30s", TimeDelta::seconds(30)),
            ("10m", TimeDelta::minutes(10)),
            ("2h", TimeDelta::hours(2)),
            ("7d", TimeDelta::days(7)),
            ("1w", TimeDelta::weeks(1)),
            ("1h30m", TimeDelta::minutes(90)),
            ("in 5 minutes", TimeDelta::minutes(5)),
            ("2 Hours", TimeDelta::hours(2)),
        ];

        for (text, expected) in cases {
            assert_eq!(parser.parse(text, now()), Some(now() + expected), "{text}");
        }
    }

    #[test]
    fn garbage_is_rejected() {
        let parser = EnglishDateParser;
        for text in ["", "   ", "10 parsecs", "5 in", "soonish"] {
            assert_eq!(parser.parse(text, now()), None, "{text}");
        }
    }

    #[test]
    fn resolve_with_real_parser() {
        let parsed = ParsedDuration::resolve(&EnglishDateParser, "45s", now());
        assert_eq!(parsed.delta(), Ok(TimeDelta::seconds(45)));
    }

    fn saturday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn weekday_prefers_the_next_occurrence() {
        let parsed = ParsedDuration::resolve(&EnglishDateParser, "friday", saturday());
        let instant = parsed.instant().unwrap();
        assert!(instant > saturday());
        assert_eq!(
            instant.date_naive(),
            chrono::NaiveDate::from_ymd_opt(2024, 3, 22).unwrap()
        );
    }

    #[test]
    fn backwards_phrases_are_not_retried() {
        let parsed = ParsedDuration::resolve(&EnglishDateParser, "2 hours ago", saturday());
        assert_eq!(parsed.instant(), Err(TimeParseError::NotInFuture));
    }

    #[test]
    fn trailing_garbage_after_a_date_is_rejected() {
        let parsed = ParsedDuration::resolve(&EnglishDateParser, "friday blah", saturday());
        assert_eq!(parsed.instant(), Err(TimeParseError::Unparsable));
    }

    #[tokio::test]
    async fn resolve_from_now_runs_off_thread() {
        let parsed = resolve_from_now("2h").await;
        assert_eq!(parsed.delta(), Ok(TimeDelta::hours(2)));

        let parsed = resolve_from_now("soonish").await;
        assert!(!parsed.is_valid());
    }

    #[test]
    fn human_readable_units() {
        assert_eq!(human_readable(TimeDelta::seconds(1)), "1 second");
        assert_eq!(human_readable(TimeDelta::seconds(45)), "45 seconds");
        assert_eq!(human_readable(TimeDelta::minutes(10)), "10 minutes");
        assert_eq!(human_readable(TimeDelta::hours(6)), "6 hours");
        assert_eq!(human_readable(TimeDelta::days(1)), "1 day");
    }
}
