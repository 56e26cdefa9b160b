use anyhow::{anyhow, Result};
use cadence_core::models::DurationUnit;
use cadence_core::recurrence::RecurrencePattern;
use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use chrono_english::{parse_date_string, Dialect};

/// The current date on the local clock, the base for relative dates.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses an ISO date (`2024-06-03`) or an English phrase such as
/// "tomorrow" or "next friday".
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    parse_date_string(input, Local::now(), Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", input, e))
}

/// Parses a time of day into a decimal hour (`9:30` → 9.5).
///
/// Accepts 24-hour and 12-hour clock formats, "noon", "midnight", and a bare
/// decimal hour.
pub fn parse_hour(input: &str) -> Result<f64> {
    let normalized = input.trim().to_lowercase();

    match normalized.as_str() {
        "noon" => return Ok(12.0),
        "midnight" => return Ok(0.0),
        _ => {}
    }

    if let Ok(hour) = normalized.parse::<f64>() {
        if (0.0..24.0).contains(&hour) {
            return Ok(hour);
        }
        return Err(anyhow!("Hour must be between 0 and 24, got {}", hour));
    }

    let formats = ["%H:%M", "%I:%M %p", "%I:%M%p"];
    for format in &formats {
        if let Ok(time) = NaiveTime::parse_from_str(&normalized, format) {
            return Ok(decimal_hour(time));
        }
    }

    // chrono needs minutes, so "2pm" / "9 am" are handled here
    for (suffix, offset) in [("am", 0.0), ("pm", 12.0)] {
        if let Some(hour) = normalized.strip_suffix(suffix) {
            if let Ok(hour) = hour.trim().parse::<u32>() {
                if (1..=12).contains(&hour) {
                    return Ok(f64::from(hour % 12) + offset);
                }
            }
        }
    }

    Err(anyhow!(
        "Invalid time format: '{}'\n\nSupported formats:\n  • 24-hour: '14:30', '09:00'\n  • 12-hour: '2:30 pm', '9am'\n  • Decimal: '9.5'\n  • Special: 'noon', 'midnight'",
        input
    ))
}

fn decimal_hour(time: NaiveTime) -> f64 {
    f64::from(time.hour()) + f64::from(time.minute()) / 60.0
}

/// Parses a duration like `45m`, `1.5h` or `2 days`.
pub fn parse_duration(input: &str) -> Result<(f64, DurationUnit)> {
    let input = input.trim();
    let split = input
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .ok_or_else(|| anyhow!("Duration '{}' needs a unit (m, h, d or w)", input))?;
    let (amount, unit) = input.split_at(split);

    let amount: f64 = amount
        .parse()
        .map_err(|_| anyhow!("Invalid duration amount in '{}'", input))?;
    let unit: DurationUnit = unit.trim().parse()?;
    Ok((amount, unit))
}

/// Builds a pattern from `--every` or `--on`, whichever was given.
pub fn parse_pattern(every: Option<&str>, on: Option<&str>) -> Result<Option<RecurrencePattern>> {
    let pattern = match (every, on) {
        (Some(code), _) => Some(code.parse::<RecurrencePattern>()?),
        (None, Some(days)) => Some(format!("days:{}", days).parse::<RecurrencePattern>()?),
        (None, None) => None,
    };
    Ok(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::recurrence::WeekdaySet;
    use chrono::Weekday;
    use rstest::rstest;

    #[test]
    fn iso_dates_parse_exactly() {
        assert_eq!(parse_date("2024-06-03").unwrap(), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[test]
    fn relative_dates_parse() {
        assert_eq!(parse_date("today").unwrap(), today());
        assert!(parse_date("not a date at all").is_err());
    }

    #[rstest]
    #[case("9:30", 9.5)]
    #[case("14:15", 14.25)]
    #[case("2pm", 14.0)]
    #[case("9:00 am", 9.0)]
    #[case("noon", 12.0)]
    #[case("7.5", 7.5)]
    fn hours_parse_to_decimal(#[case] input: &str, #[case] expected: f64) {
        assert_eq!(parse_hour(input).unwrap(), expected);
    }

    #[test]
    fn out_of_range_hour_is_rejected() {
        assert!(parse_hour("25").is_err());
        assert!(parse_hour("quarter past").is_err());
    }

    #[rstest]
    #[case("45m", 45.0, DurationUnit::Minutes)]
    #[case("1.5h", 1.5, DurationUnit::Hours)]
    #[case("2 days", 2.0, DurationUnit::Days)]
    #[case("1w", 1.0, DurationUnit::Weeks)]
    fn durations_parse(#[case] input: &str, #[case] amount: f64, #[case] unit: DurationUnit) {
        assert_eq!(parse_duration(input).unwrap(), (amount, unit));
    }

    #[test]
    fn duration_without_unit_is_rejected() {
        assert!(parse_duration("30").is_err());
        assert!(parse_duration("30 fortnights").is_err());
    }

    #[test]
    fn patterns_come_from_every_or_on() {
        assert_eq!(parse_pattern(Some("weekly"), None).unwrap(), Some(RecurrencePattern::Weekly));
        assert_eq!(
            parse_pattern(None, Some("mon,fri")).unwrap(),
            Some(RecurrencePattern::DaysOfWeek([Weekday::Mon, Weekday::Fri].into_iter().collect::<WeekdaySet>()))
        );
        assert_eq!(parse_pattern(None, None).unwrap(), None);
        assert!(parse_pattern(Some("fortnightly"), None).is_err());
    }
}
