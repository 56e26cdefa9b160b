//! Recurrence expansion and materialization planning.
//!
//! Everything in this module is pure: it turns an [`Action`] (or an explicit
//! start/end/pattern triple) into the ordered list of dates that must carry an
//! occurrence. Persisting those dates is the repository's job.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer};
use serde_with::SerializeDisplay;
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{Sqlite, SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::models::Action;

/// Upper bound on the number of dates a single expansion may produce.
pub const DEFAULT_MAX_OCCURRENCES: usize = 1000;

/// Pattern end used when neither a recurrence end nor a range end is given.
pub const DEFAULT_HORIZON_DAYS: u32 = 365;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

fn parse_weekday(name: &str) -> Result<Weekday, CoreError> {
    name.trim()
        .parse::<Weekday>()
        .map_err(|_| CoreError::InvalidRecurrencePattern(format!("unknown weekday '{}'", name)))
}

/// A set of weekdays, iterated Monday first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn weekdays() -> Self {
        WEEK[..5].iter().copied().collect()
    }

    pub fn weekends() -> Self {
        WEEK[5..].iter().copied().collect()
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.into_iter().filter(move |day| self.contains(*day))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

/// Which dates inside a range carry an occurrence.
///
/// Parsed once at the boundary. The canonical text form (`daily`, `weekly`,
/// `monthly`, `yearly`, `days:monday,friday`) is what gets stored and
/// serialized; deserialization additionally accepts a weekday-name array or a
/// weekday → bool map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay)]
pub enum RecurrencePattern {
    Daily,
    /// Every 7 days from the start date.
    Weekly,
    /// Same day of month, clamped to the month's last day.
    Monthly,
    /// Same month and day, Feb 29 clamped to Feb 28.
    Yearly,
    DaysOfWeek(WeekdaySet),
}

impl RecurrencePattern {
    pub fn days_of_week<I: IntoIterator<Item = Weekday>>(days: I) -> Result<Self, CoreError> {
        let set: WeekdaySet = days.into_iter().collect();
        if set.is_empty() {
            return Err(CoreError::InvalidRecurrencePattern(
                "day-of-week pattern needs at least one day".to_string(),
            ));
        }
        Ok(RecurrencePattern::DaysOfWeek(set))
    }

    /// The `step`-th date of an interval pattern, always computed from the
    /// anchor so month clamping never drifts (Jan 31 → Feb 29 → Mar 31).
    fn nth_after(&self, start: NaiveDate, step: u32) -> Option<NaiveDate> {
        match self {
            RecurrencePattern::Daily => start.checked_add_days(Days::new(u64::from(step))),
            RecurrencePattern::Weekly => start.checked_add_days(Days::new(u64::from(step) * 7)),
            RecurrencePattern::Monthly => start.checked_add_months(Months::new(step)),
            RecurrencePattern::Yearly => step
                .checked_mul(12)
                .and_then(|months| start.checked_add_months(Months::new(months))),
            RecurrencePattern::DaysOfWeek(_) => None,
        }
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrencePattern::Daily => write!(f, "daily"),
            RecurrencePattern::Weekly => write!(f, "weekly"),
            RecurrencePattern::Monthly => write!(f, "monthly"),
            RecurrencePattern::Yearly => write!(f, "yearly"),
            RecurrencePattern::DaysOfWeek(set) => {
                let names: Vec<&str> = set.iter().map(weekday_name).collect();
                write!(f, "days:{}", names.join(","))
            }
        }
    }
}

impl FromStr for RecurrencePattern {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if let Some(days) = normalized.strip_prefix("days:") {
            let days = days
                .split(',')
                .filter(|d| !d.trim().is_empty())
                .map(parse_weekday)
                .collect::<Result<Vec<_>, _>>()?;
            return RecurrencePattern::days_of_week(days);
        }

        match normalized.as_str() {
            "daily" => Ok(RecurrencePattern::Daily),
            "weekly" => Ok(RecurrencePattern::Weekly),
            "monthly" => Ok(RecurrencePattern::Monthly),
            "yearly" | "annually" => Ok(RecurrencePattern::Yearly),
            "weekdays" => Ok(RecurrencePattern::DaysOfWeek(WeekdaySet::weekdays())),
            "weekends" => Ok(RecurrencePattern::DaysOfWeek(WeekdaySet::weekends())),
            _ => Err(CoreError::InvalidRecurrencePattern(format!(
                "unrecognized pattern '{}'",
                s
            ))),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PatternRepr {
    Code(String),
    Days(Vec<String>),
    DayMap(BTreeMap<String, bool>),
    Structured { days: Vec<String> },
}

impl TryFrom<PatternRepr> for RecurrencePattern {
    type Error = CoreError;

    fn try_from(repr: PatternRepr) -> Result<Self, Self::Error> {
        match repr {
            PatternRepr::Code(code) => code.parse(),
            PatternRepr::Days(days) | PatternRepr::Structured { days } => {
                let days = days
                    .iter()
                    .map(|d| parse_weekday(d))
                    .collect::<Result<Vec<_>, _>>()?;
                RecurrencePattern::days_of_week(days)
            }
            PatternRepr::DayMap(map) => {
                let mut days = Vec::new();
                for (name, enabled) in map {
                    let day = parse_weekday(&name)?;
                    if enabled {
                        days.push(day);
                    }
                }
                RecurrencePattern::days_of_week(days)
            }
        }
    }
}

impl<'de> Deserialize<'de> for RecurrencePattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = PatternRepr::deserialize(deserializer)?;
        RecurrencePattern::try_from(repr).map_err(serde::de::Error::custom)
    }
}

impl sqlx::Type<Sqlite> for RecurrencePattern {
    fn type_info() -> SqliteTypeInfo {
        <String as sqlx::Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as sqlx::Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, Sqlite> for RecurrencePattern {
    fn encode_by_ref(&self, buf: &mut Vec<SqliteArgumentValue<'q>>) -> IsNull {
        <String as sqlx::Encode<'q, Sqlite>>::encode(self.to_string(), buf)
    }
}

impl<'r> sqlx::Decode<'r, Sqlite> for RecurrencePattern {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let text = <String as sqlx::Decode<'r, Sqlite>>::decode(value)?;
        Ok(text.parse()?)
    }
}

/// Expands `pattern` from `start` up to and including `pattern_end`.
///
/// The result is strictly ascending and every date lies in
/// `[start, pattern_end]`. `start > pattern_end` yields an empty list.
pub fn expand(
    start: NaiveDate,
    pattern_end: NaiveDate,
    pattern: &RecurrencePattern,
) -> Result<Vec<NaiveDate>, CoreError> {
    expand_bounded(start, pattern_end, pattern, DEFAULT_MAX_OCCURRENCES)
}

/// [`expand`] with an explicit cap; exceeding `limit` is an error rather than
/// a silently truncated schedule.
pub fn expand_bounded(
    start: NaiveDate,
    pattern_end: NaiveDate,
    pattern: &RecurrencePattern,
    limit: usize,
) -> Result<Vec<NaiveDate>, CoreError> {
    if start > pattern_end {
        return Ok(Vec::new());
    }

    if let RecurrencePattern::DaysOfWeek(days) = pattern {
        if days.is_empty() {
            return Err(CoreError::InvalidRecurrencePattern(
                "day-of-week pattern needs at least one day".to_string(),
            ));
        }
        let matching = start
            .iter_days()
            .take_while(|date| *date <= pattern_end)
            .filter(|date| days.contains(date.weekday()));
        return collect_bounded(matching, limit);
    }

    let mut dates = Vec::new();
    let mut step: u32 = 0;
    while let Some(current) = pattern.nth_after(start, step) {
        if current > pattern_end {
            break;
        }
        if dates.len() == limit {
            return Err(too_many(limit));
        }
        dates.push(current);
        step += 1;
    }
    Ok(dates)
}

/// Every calendar day in `[start, end]`, used for ranges without a pattern.
pub fn every_day_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|date| *date <= end).collect()
}

fn every_day_in_range_bounded(
    start: NaiveDate,
    end: NaiveDate,
    limit: usize,
) -> Result<Vec<NaiveDate>, CoreError> {
    collect_bounded(start.iter_days().take_while(|date| *date <= end), limit)
}

fn collect_bounded<I>(dates: I, limit: usize) -> Result<Vec<NaiveDate>, CoreError>
where
    I: Iterator<Item = NaiveDate>,
{
    let collected: Vec<NaiveDate> = dates.take(limit.saturating_add(1)).collect();
    if collected.len() > limit {
        return Err(too_many(limit));
    }
    Ok(collected)
}

fn too_many(limit: usize) -> CoreError {
    CoreError::InvalidInput(format!(
        "schedule would create more than {} occurrences; set an earlier end date",
        limit
    ))
}

// ============================================================================
// MaterializationManager
// ============================================================================

/// Configuration for materialization behavior
#[derive(Debug, Clone)]
pub struct MaterializationConfig {
    /// Pattern end, in days after the start, when no end date is given
    pub horizon_days: u32,
    /// Upper bound on occurrences generated for one action
    pub max_occurrences: usize,
    /// Re-attach notes to the regenerated occurrence on the same date
    pub preserve_notes: bool,
}

impl Default for MaterializationConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
            preserve_notes: true,
        }
    }
}

/// MaterializationManager: decides which dates an action occupies.
///
/// Responsibilities:
/// 1. Validate an action's schedule before anything is written
/// 2. Pick the single-date, plain-range or pattern expander
/// 3. Apply the default horizon when the schedule is open-ended
/// 4. Respect configured limits
#[derive(Debug, Clone, Default)]
pub struct MaterializationManager {
    config: MaterializationConfig,
}

impl MaterializationManager {
    /// Creates a new MaterializationManager with the given configuration.
    pub fn new(config: MaterializationConfig) -> Self {
        Self { config }
    }

    /// Creates a MaterializationManager with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(MaterializationConfig::default())
    }

    /// Gets the current configuration.
    pub fn config(&self) -> &MaterializationConfig {
        &self.config
    }

    /// Calculates the dates `action` must have occurrences on.
    ///
    /// # Behavior
    /// - Single-date actions yield `start_date` (or nothing when unset); a
    ///   pattern on a single-date action is ignored
    /// - Ranged actions with a pattern expand it up to
    ///   `recurrence_end_date`, else `end_date`, else `start + horizon`
    /// - Ranged actions without a pattern cover every day of the range; an
    ///   open range covers just the start date
    ///
    /// # Errors
    /// `InvalidInput` for a range without a start date, an end or recurrence
    /// end before the start, or a schedule over `max_occurrences`.
    pub fn plan(&self, action: &Action) -> Result<Vec<NaiveDate>, CoreError> {
        if !action.is_date_range {
            return Ok(action.start_date.into_iter().collect());
        }

        let start = action.start_date.ok_or_else(|| {
            CoreError::InvalidInput("a date-range action requires a start date".to_string())
        })?;

        if let Some(end) = action.end_date {
            if end < start {
                return Err(CoreError::InvalidInput(format!(
                    "end date {} is before start date {}",
                    end, start
                )));
            }
        }

        match &action.recurrence_pattern {
            Some(pattern) => {
                let pattern_end = action
                    .recurrence_end_date
                    .or(action.end_date)
                    .unwrap_or_else(|| self.default_pattern_end(start));
                if pattern_end < start {
                    return Err(CoreError::InvalidInput(format!(
                        "recurrence end date {} is before start date {}",
                        pattern_end, start
                    )));
                }
                expand_bounded(start, pattern_end, pattern, self.config.max_occurrences)
            }
            None => match action.end_date {
                Some(end) => every_day_in_range_bounded(start, end, self.config.max_occurrences),
                None => Ok(vec![start]),
            },
        }
    }

    /// Dates following `first` for a recurring calendar event, excluding
    /// `first` itself.
    pub fn plan_follow_ups(
        &self,
        first: NaiveDate,
        until: Option<NaiveDate>,
        pattern: &RecurrencePattern,
    ) -> Result<Vec<NaiveDate>, CoreError> {
        let pattern_end = until.unwrap_or_else(|| self.default_pattern_end(first));
        let mut dates = expand_bounded(first, pattern_end, pattern, self.config.max_occurrences)?;
        dates.retain(|date| *date != first);
        Ok(dates)
    }

    fn default_pattern_end(&self, start: NaiveDate) -> NaiveDate {
        start
            .checked_add_days(Days::new(u64::from(self.config.horizon_days)))
            .unwrap_or(NaiveDate::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod expand_tests {
        use super::*;

        #[test]
        fn single_day_daily_range_yields_start() {
            let d = date(2024, 5, 17);
            assert_eq!(expand(d, d, &RecurrencePattern::Daily).unwrap(), vec![d]);
        }

        #[test]
        fn weekly_is_anchored_on_start() {
            let dates = expand(date(2024, 1, 1), date(2024, 1, 10), &RecurrencePattern::Weekly).unwrap();
            assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 8)]);
        }

        #[test]
        fn monthly_clamps_to_month_end_without_drifting() {
            let dates = expand(date(2024, 1, 31), date(2024, 4, 30), &RecurrencePattern::Monthly).unwrap();
            assert_eq!(
                dates,
                vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)]
            );
        }

        #[test]
        fn yearly_clamps_leap_day() {
            let dates = expand(date(2024, 2, 29), date(2026, 3, 1), &RecurrencePattern::Yearly).unwrap();
            assert_eq!(dates, vec![date(2024, 2, 29), date(2025, 2, 28), date(2026, 2, 28)]);
        }

        #[test]
        fn start_after_end_is_empty() {
            let dates = expand(date(2024, 3, 2), date(2024, 3, 1), &RecurrencePattern::Daily).unwrap();
            assert!(dates.is_empty());
        }

        #[test]
        fn never_runs_past_the_end_bound() {
            let dates = expand(date(2024, 6, 3), date(2024, 6, 30), &RecurrencePattern::Weekly).unwrap();
            assert_eq!(
                dates,
                vec![date(2024, 6, 3), date(2024, 6, 10), date(2024, 6, 17), date(2024, 6, 24)]
            );
        }

        #[test]
        fn days_of_week_filters_each_day() {
            let pattern = RecurrencePattern::days_of_week([Weekday::Mon, Weekday::Wed]).unwrap();
            // 2024-06-03 is a Monday
            let dates = expand(date(2024, 6, 3), date(2024, 6, 12), &pattern).unwrap();
            assert_eq!(
                dates,
                vec![date(2024, 6, 3), date(2024, 6, 5), date(2024, 6, 10), date(2024, 6, 12)]
            );
        }

        #[test]
        fn days_of_week_may_skip_the_start_date() {
            let pattern = RecurrencePattern::days_of_week([Weekday::Fri]).unwrap();
            let dates = expand(date(2024, 6, 3), date(2024, 6, 9), &pattern).unwrap();
            assert_eq!(dates, vec![date(2024, 6, 7)]);
        }

        #[test]
        fn empty_weekday_set_is_rejected() {
            let result = expand(
                date(2024, 6, 3),
                date(2024, 6, 9),
                &RecurrencePattern::DaysOfWeek(WeekdaySet::empty()),
            );
            assert!(matches!(result, Err(CoreError::InvalidRecurrencePattern(_))));
        }

        #[test]
        fn exceeding_the_limit_is_an_error() {
            let result = expand_bounded(date(2024, 1, 1), date(2024, 12, 31), &RecurrencePattern::Daily, 10);
            assert!(matches!(result, Err(CoreError::InvalidInput(_))));
        }

        #[test]
        fn every_day_in_range_is_inclusive() {
            let dates = every_day_in_range(date(2024, 2, 27), date(2024, 3, 1));
            assert_eq!(
                dates,
                vec![date(2024, 2, 27), date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]
            );
        }
    }

    mod pattern_parsing_tests {
        use super::*;

        #[rstest]
        #[case("daily", RecurrencePattern::Daily)]
        #[case("Weekly", RecurrencePattern::Weekly)]
        #[case(" monthly ", RecurrencePattern::Monthly)]
        #[case("annually", RecurrencePattern::Yearly)]
        #[case("weekends", RecurrencePattern::DaysOfWeek(WeekdaySet::weekends()))]
        fn parses_codes(#[case] input: &str, #[case] expected: RecurrencePattern) {
            assert_eq!(input.parse::<RecurrencePattern>().unwrap(), expected);
        }

        #[rstest]
        #[case("fortnightly")]
        #[case("")]
        #[case("days:")]
        #[case("days:funday")]
        fn rejects_unknown_patterns(#[case] input: &str) {
            assert!(matches!(
                input.parse::<RecurrencePattern>(),
                Err(CoreError::InvalidRecurrencePattern(_))
            ));
        }

        #[test]
        fn canonical_form_round_trips() {
            let pattern = RecurrencePattern::days_of_week([Weekday::Fri, Weekday::Mon]).unwrap();
            assert_eq!(pattern.to_string(), "days:monday,friday");
            assert_eq!(pattern.to_string().parse::<RecurrencePattern>().unwrap(), pattern);
        }

        #[test]
        fn accepts_structured_weekday_forms() {
            let from_array: RecurrencePattern = serde_json::from_str(r#"["mon", "Thursday"]"#).unwrap();
            let from_map: RecurrencePattern =
                serde_json::from_str(r#"{"monday": true, "tuesday": false, "thursday": true}"#).unwrap();
            let from_object: RecurrencePattern =
                serde_json::from_str(r#"{"days": ["monday", "thursday"]}"#).unwrap();

            let expected = RecurrencePattern::days_of_week([Weekday::Mon, Weekday::Thu]).unwrap();
            assert_eq!(from_array, expected);
            assert_eq!(from_map, expected);
            assert_eq!(from_object, expected);
        }

        #[test]
        fn json_rejects_unknown_code_with_reason() {
            let err = serde_json::from_str::<RecurrencePattern>(r#""hourly""#).unwrap_err();
            assert!(err.to_string().contains("hourly"));
        }

        #[test]
        fn serializes_as_canonical_string() {
            let json = serde_json::to_string(&RecurrencePattern::Monthly).unwrap();
            assert_eq!(json, r#""monthly""#);
        }
    }

    mod materialization_manager_tests {
        use super::*;

        fn ranged(start: NaiveDate, end: Option<NaiveDate>, pattern: Option<RecurrencePattern>) -> Action {
            Action {
                text: "Test".to_string(),
                is_date_range: true,
                start_date: Some(start),
                end_date: end,
                recurrence_pattern: pattern,
                ..Default::default()
            }
        }

        #[test]
        fn with_defaults() {
            let manager = MaterializationManager::with_defaults();
            assert_eq!(manager.config().horizon_days, 365);
            assert_eq!(manager.config().max_occurrences, 1000);
            assert!(manager.config().preserve_notes);
        }

        #[test]
        fn single_date_action_plans_its_start_date() {
            let manager = MaterializationManager::with_defaults();
            let action = Action {
                start_date: Some(date(2024, 3, 1)),
                recurrence_pattern: Some(RecurrencePattern::Daily),
                ..Default::default()
            };
            assert_eq!(manager.plan(&action).unwrap(), vec![date(2024, 3, 1)]);
        }

        #[test]
        fn undated_single_action_plans_nothing() {
            let manager = MaterializationManager::with_defaults();
            assert!(manager.plan(&Action::default()).unwrap().is_empty());
        }

        #[test]
        fn plain_range_covers_every_day() {
            let manager = MaterializationManager::with_defaults();
            let action = ranged(date(2024, 3, 1), Some(date(2024, 3, 3)), None);
            assert_eq!(
                manager.plan(&action).unwrap(),
                vec![date(2024, 3, 1), date(2024, 3, 2), date(2024, 3, 3)]
            );
        }

        #[test]
        fn recurrence_end_takes_precedence_over_range_end() {
            let manager = MaterializationManager::with_defaults();
            let mut action = ranged(date(2024, 1, 1), Some(date(2024, 12, 31)), Some(RecurrencePattern::Monthly));
            action.recurrence_end_date = Some(date(2024, 3, 15));
            assert_eq!(
                manager.plan(&action).unwrap(),
                vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]
            );
        }

        #[test]
        fn open_pattern_uses_horizon() {
            let manager = MaterializationManager::new(MaterializationConfig {
                horizon_days: 14,
                ..Default::default()
            });
            let action = ranged(date(2024, 1, 1), None, Some(RecurrencePattern::Weekly));
            assert_eq!(
                manager.plan(&action).unwrap(),
                vec![date(2024, 1, 1), date(2024, 1, 8), date(2024, 1, 15)]
            );
        }

        #[test]
        fn range_without_start_is_rejected() {
            let manager = MaterializationManager::with_defaults();
            let mut action = ranged(date(2024, 1, 1), Some(date(2024, 1, 5)), None);
            action.start_date = None;
            assert!(matches!(manager.plan(&action), Err(CoreError::InvalidInput(_))));
        }

        #[test]
        fn inverted_range_is_rejected() {
            let manager = MaterializationManager::with_defaults();
            let action = ranged(date(2024, 1, 5), Some(date(2024, 1, 1)), None);
            assert!(matches!(manager.plan(&action), Err(CoreError::InvalidInput(_))));
        }

        #[test]
        fn recurrence_end_before_start_is_rejected() {
            let manager = MaterializationManager::with_defaults();
            let mut action = ranged(date(2024, 6, 10), Some(date(2024, 6, 30)), Some(RecurrencePattern::Weekly));
            action.recurrence_end_date = Some(date(2024, 6, 1));
            assert!(matches!(manager.plan(&action), Err(CoreError::InvalidInput(_))));
        }

        #[test]
        fn follow_ups_exclude_the_first_date() {
            let manager = MaterializationManager::with_defaults();
            let dates = manager
                .plan_follow_ups(date(2024, 6, 3), Some(date(2024, 6, 17)), &RecurrencePattern::Weekly)
                .unwrap();
            assert_eq!(dates, vec![date(2024, 6, 10), date(2024, 6, 17)]);
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_pattern() -> impl Strategy<Value = RecurrencePattern> {
            prop_oneof![
                Just(RecurrencePattern::Daily),
                Just(RecurrencePattern::Weekly),
                Just(RecurrencePattern::Monthly),
                Just(RecurrencePattern::Yearly),
                (1u8..128).prop_map(|bits| {
                    RecurrencePattern::DaysOfWeek(
                        WEEK.into_iter()
                            .filter(|d| bits & (1 << d.num_days_from_monday()) != 0)
                            .collect(),
                    )
                }),
            ]
        }

        proptest! {
            #[test]
            fn expansion_is_strictly_ascending_and_in_bounds(
                start_offset in 0i64..3000,
                span in -30i64..900,
                pattern in any_pattern(),
            ) {
                let epoch = date(2020, 1, 1);
                let start = epoch + chrono::Duration::days(start_offset);
                let end = start + chrono::Duration::days(span);
                let dates = expand(start, end, &pattern).unwrap();

                prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
                prop_assert!(dates.iter().all(|d| *d >= start && *d <= end));
                if span >= 0 && !matches!(pattern, RecurrencePattern::DaysOfWeek(_)) {
                    prop_assert_eq!(dates.first().copied(), Some(start));
                }
            }
        }
    }
}
