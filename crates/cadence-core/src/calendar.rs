//! Assembly of calendar read models from occurrence rows.
//!
//! The repository loads rows; the functions here group them by date, drop
//! orphans and duplicate actions, and order each day for rendering.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use uuid::Uuid;

use crate::models::{Action, CalendarEvent, Category, DayGroup, Note, Occurrence};

/// One occurrence row joined with whatever its foreign keys resolved to.
#[derive(Debug, Clone)]
pub struct CalendarEntry {
    pub occurrence: Occurrence,
    pub action: Option<Action>,
    pub category: Option<Category>,
}

/// Which record supplies the per-date schedule fields of an event.
#[derive(Debug, Clone, Copy)]
pub enum ScheduleSource<'a> {
    Action,
    Occurrence(&'a Occurrence),
}

/// Builds the denormalized event for `action` on `date`.
///
/// With an occurrence source each schedule field falls back to the action's
/// value when the occurrence leaves it unset.
pub fn build_event(
    action: &Action,
    date: NaiveDate,
    occurrence_id: Option<Uuid>,
    source: ScheduleSource<'_>,
    category: Option<Category>,
    notes: Vec<Note>,
) -> CalendarEvent {
    let (hour, location, duration_amount, duration_unit) = match source {
        ScheduleSource::Action => (
            action.hour,
            action.location.clone(),
            action.duration_amount,
            action.duration_unit,
        ),
        ScheduleSource::Occurrence(occurrence) => (
            occurrence.hour.or(action.hour),
            occurrence.location.clone().or_else(|| action.location.clone()),
            occurrence.duration_amount.or(action.duration_amount),
            occurrence.duration_unit.or(action.duration_unit),
        ),
    };

    CalendarEvent {
        id: occurrence_id.unwrap_or(action.id),
        action_id: action.id,
        occurrence_id,
        date,
        text: action.text.clone(),
        color: action.color.clone(),
        text_color: action.text_color.clone(),
        status: action.status,
        hour,
        location,
        duration_amount,
        duration_unit,
        leverage: action.leverage.clone(),
        is_date_range: action.is_date_range,
        start_date: action.start_date,
        end_date: action.end_date,
        recurrence_pattern: action.recurrence_pattern,
        recurrence_end_date: action.recurrence_end_date,
        category,
        notes,
    }
}

/// Orders by hour ascending; events without an hour sort after all timed ones.
pub fn compare_by_hour(a: &CalendarEvent, b: &CalendarEvent) -> Ordering {
    match (a.hour, b.hour) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Groups entries into ascending per-date buckets.
///
/// - entries without an action are skipped and logged
/// - the first entry for an action on a date wins; notes of later duplicates
///   are merged into it so nothing attached to the anomaly disappears
/// - events within a day are stably sorted with [`compare_by_hour`]
pub fn group_by_day(
    entries: Vec<CalendarEntry>,
    mut notes: HashMap<Uuid, Vec<Note>>,
) -> Vec<DayGroup> {
    let mut days: BTreeMap<NaiveDate, (HashSet<Uuid>, Vec<CalendarEvent>)> = BTreeMap::new();

    for entry in entries {
        let CalendarEntry {
            occurrence,
            action,
            category,
        } = entry;

        let Some(action) = action else {
            tracing::warn!(
                occurrence_id = %occurrence.id,
                action_id = %occurrence.action_id,
                "skipping orphaned occurrence"
            );
            continue;
        };

        let occurrence_notes = notes.remove(&occurrence.id).unwrap_or_default();
        let (seen, events) = days.entry(occurrence.date).or_default();

        if !seen.insert(action.id) {
            tracing::debug!(
                occurrence_id = %occurrence.id,
                action_id = %action.id,
                date = %occurrence.date,
                "dropping duplicate occurrence"
            );
            if let Some(kept) = events.iter_mut().find(|e| e.action_id == action.id) {
                kept.notes.extend(occurrence_notes);
            }
            continue;
        }

        events.push(build_event(
            &action,
            occurrence.date,
            Some(occurrence.id),
            ScheduleSource::Occurrence(&occurrence),
            category,
            occurrence_notes,
        ));
    }

    days.into_iter()
        .map(|(date, (_, mut events))| {
            events.sort_by(compare_by_hour);
            DayGroup { date, events }
        })
        .collect()
}

/// Buckets notes by their occurrence, keeping load order within a bucket.
pub fn index_notes(notes: Vec<Note>) -> HashMap<Uuid, Vec<Note>> {
    let mut index: HashMap<Uuid, Vec<Note>> = HashMap::new();
    for note in notes {
        index.entry(note.occurrence_id).or_default().push(note);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoteType, Schedule};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn action(text: &str, hour: Option<f64>) -> Action {
        Action {
            text: text.to_string(),
            hour,
            location: Some("Home".to_string()),
            ..Default::default()
        }
    }

    fn entry(action: &Action, date: NaiveDate) -> CalendarEntry {
        CalendarEntry {
            occurrence: Occurrence::new(action.id, date, action.schedule()),
            action: Some(action.clone()),
            category: None,
        }
    }

    fn note(occurrence_id: Uuid, text: &str) -> Note {
        Note {
            id: Uuid::now_v7(),
            occurrence_id,
            text: text.to_string(),
            note_type: Some(NoteType::Remark),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn groups_by_date_in_ascending_order() {
        let a = action("A", None);
        let entries = vec![entry(&a, date(2024, 6, 5)), entry(&a, date(2024, 6, 3))];

        let days = group_by_day(entries, HashMap::new());
        let dates: Vec<_> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(2024, 6, 3), date(2024, 6, 5)]);
    }

    #[test]
    fn duplicate_action_on_same_date_is_collapsed() {
        let a = action("A", Some(9.0));
        let first = entry(&a, date(2024, 6, 3));
        let second = entry(&a, date(2024, 6, 3));
        let first_id = first.occurrence.id;
        let second_id = second.occurrence.id;
        let notes = index_notes(vec![note(first_id, "one"), note(second_id, "two")]);

        let days = group_by_day(vec![first, second], notes);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].events.len(), 1);
        assert_eq!(days[0].events[0].occurrence_id, Some(first_id));
        assert_eq!(days[0].events[0].notes.len(), 2);
    }

    #[test]
    fn orphaned_entries_are_skipped() {
        let a = action("A", None);
        let mut orphan = entry(&a, date(2024, 6, 3));
        orphan.action = None;

        let days = group_by_day(vec![orphan], HashMap::new());
        assert!(days.is_empty());
    }

    #[test]
    fn untimed_events_sort_last() {
        let untimed = action("untimed", None);
        let late = action("late", Some(18.25));
        let early = action("early", Some(7.5));
        let d = date(2024, 6, 3);

        let days = group_by_day(
            vec![entry(&untimed, d), entry(&late, d), entry(&early, d)],
            HashMap::new(),
        );
        let texts: Vec<_> = days[0].events.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["early", "late", "untimed"]);
    }

    #[test]
    fn occurrence_overrides_win_and_fall_back_to_action() {
        let a = action("A", Some(9.0));
        let mut e = entry(&a, date(2024, 6, 3));
        e.occurrence.hour = Some(14.0);
        e.occurrence.location = None;

        let days = group_by_day(vec![e], HashMap::new());
        let event = &days[0].events[0];
        assert_eq!(event.hour, Some(14.0));
        assert_eq!(event.location.as_deref(), Some("Home"));
    }

    #[test]
    fn action_source_ignores_occurrence_fields() {
        let a = action("A", Some(9.0));
        let occurrence = Occurrence::new(
            a.id,
            date(2024, 6, 3),
            Schedule {
                hour: Some(20.0),
                ..Default::default()
            },
        );
        let event = build_event(&a, occurrence.date, Some(occurrence.id), ScheduleSource::Action, None, vec![]);
        assert_eq!(event.hour, Some(9.0));
        assert_eq!(event.id, occurrence.id);
    }
}
