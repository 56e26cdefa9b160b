use cadence_core::models::{ActionStatus, CalendarEvent, Category, DayGroup, Note, OccurrenceException};
use comfy_table::{Attribute, Cell, Color, Row, Table};

use crate::util::{format_hour, short_id};

pub fn display_days(days: &[DayGroup]) {
    if days.is_empty() {
        println!("No events found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Time", "ID", "Action", "Status", "Location", "Category", "Notes"]);

    for day in days {
        for (index, event) in day.events.iter().enumerate() {
            let mut row = Row::new();

            // Only the first event of a day carries the date
            let date_cell = if index == 0 {
                Cell::new(day.date.format("%a %Y-%m-%d")).add_attribute(Attribute::Bold)
            } else {
                Cell::new("")
            };
            row.add_cell(date_cell);
            add_event_cells(&mut row, event);
            table.add_row(row);
        }
    }

    println!("{table}");
}

fn add_event_cells(row: &mut Row, event: &CalendarEvent) {
    row.add_cell(Cell::new(event.hour.map(format_hour).unwrap_or_else(|| "-".to_string())));
    row.add_cell(Cell::new(short_id(&event.action_id)));

    let mut name = String::new();
    if event.recurrence_pattern.is_some() {
        name.push('↻');
        name.push(' ');
    }
    name.push_str(&event.text);
    row.add_cell(style_by_status(Cell::new(name), event.status));

    row.add_cell(status_cell(event.status));
    row.add_cell(Cell::new(event.location.as_deref().unwrap_or("")));
    row.add_cell(Cell::new(event.category.as_ref().map(|c| c.name.as_str()).unwrap_or("")));
    row.add_cell(Cell::new(if event.notes.is_empty() {
        String::new()
    } else {
        event.notes.len().to_string()
    }));
}

fn style_by_status(cell: Cell, status: ActionStatus) -> Cell {
    match status {
        ActionStatus::Completed | ActionStatus::Cancelled | ActionStatus::NotNeeded => cell
            .add_attribute(Attribute::CrossedOut)
            .fg(Color::DarkGrey),
        ActionStatus::InProgress => cell.fg(Color::Yellow).add_attribute(Attribute::Bold),
        _ => cell,
    }
}

fn status_cell(status: ActionStatus) -> Cell {
    let cell = Cell::new(status.to_string());
    match status {
        ActionStatus::Completed => cell.fg(Color::Green),
        ActionStatus::Cancelled | ActionStatus::NotNeeded => cell.fg(Color::DarkGrey),
        ActionStatus::InProgress => cell.fg(Color::Yellow),
        _ => cell,
    }
}

/// Detailed key/value view of a single resolved event.
pub fn display_event(day: &DayGroup) {
    for event in &day.events {
        let mut table = Table::new();
        table.set_header(vec!["Field", "Value"]);

        let mut add = |field: &str, value: String| {
            table.add_row(vec![Cell::new(field).add_attribute(Attribute::Bold), Cell::new(value)]);
        };

        add("Action", event.text.clone());
        add("Action ID", event.action_id.to_string());
        add(
            "Occurrence ID",
            event.occurrence_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
        );
        add("Date", day.date.to_string());
        add("Time", event.hour.map(format_hour).unwrap_or_else(|| "-".to_string()));
        add("Status", event.status.to_string());
        if let Some(location) = &event.location {
            add("Location", location.clone());
        }
        if let (Some(amount), Some(unit)) = (event.duration_amount, event.duration_unit) {
            add("Duration", format!("{} {}", amount, unit));
        }
        if event.is_date_range {
            let start = event.start_date.map(|d| d.to_string()).unwrap_or_default();
            let end = event.end_date.map(|d| d.to_string()).unwrap_or_else(|| "open".to_string());
            add("Range", format!("{} → {}", start, end));
        }
        if let Some(pattern) = &event.recurrence_pattern {
            let until = event
                .recurrence_end_date
                .map(|d| format!(" until {}", d))
                .unwrap_or_default();
            add("Repeats", format!("{}{}", pattern, until));
        }
        if let Some(category) = &event.category {
            add("Category", category.name.clone());
        }
        if let Some(leverage) = &event.leverage {
            add("Leverage", leverage.clone());
        }

        println!("{table}");
        display_notes(&event.notes);
    }
}

pub fn display_notes(notes: &[Note]) {
    if notes.is_empty() {
        println!("No notes.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Type", "Text", "Created At"]);

    for note in notes {
        let mut row = Row::new();
        row.add_cell(Cell::new(note.id.to_string()));
        row.add_cell(Cell::new(
            note.note_type.map(|t| format!("{:?}", t).to_lowercase()).unwrap_or_default(),
        ));
        row.add_cell(Cell::new(&note.text));
        row.add_cell(Cell::new(note.created_at.format("%Y-%m-%d %H:%M")));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_exceptions(exceptions: &[OccurrenceException]) {
    if exceptions.is_empty() {
        println!("No skipped dates.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Reason", "Notes"]);

    for exception in exceptions {
        let mut row = Row::new();
        row.add_cell(Cell::new(exception.date));
        row.add_cell(Cell::new(exception.reason.to_string()).fg(Color::Yellow));
        row.add_cell(Cell::new(exception.notes.as_deref().unwrap_or("")));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("No categories found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Color", "Created At"]);

    for category in categories {
        let mut row = Row::new();
        row.add_cell(Cell::new(category.id.to_string()));
        row.add_cell(Cell::new(&category.name));
        row.add_cell(Cell::new(category.color.as_deref().unwrap_or("")));
        row.add_cell(Cell::new(category.created_at.format("%Y-%m-%d")));
        table.add_row(row);
    }

    println!("{table}");
}
