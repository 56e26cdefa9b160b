mod helpers;

use helpers::CliTestHarness;
use predicates::prelude::*;

#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("calendar"))
        .stdout(predicate::str::contains("range"))
        .stdout(predicate::str::contains("serve"));

    harness.run_success(&["--version"]).stdout(predicate::str::contains("cadence"));
}

#[test]
fn test_add_weekly_action_shows_on_matching_days() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&[
            "add", "Standup", "--date", "2024-06-03", "--end", "2024-06-30", "--every", "weekly",
        ])
        .stdout(predicate::str::contains("Created action"))
        .stdout(predicate::str::contains("4 occurrences"));

    assert_eq!(
        harness.dates_in_range("2024-06-01", "2024-06-30"),
        vec!["2024-06-03", "2024-06-10", "2024-06-17", "2024-06-24"]
    );
}

#[test]
fn test_add_weekday_set_and_single_day() {
    let harness = CliTestHarness::new();

    harness.run_success(&[
        "add", "Gym", "--date", "2024-06-03", "--end", "2024-06-09", "--on", "mon,wed,fri",
    ]);
    harness.run_success(&["add", "Dentist", "--date", "2024-06-05", "--at", "2pm"]);

    let days = harness.range_json("2024-06-03", "2024-06-09");
    let dates: Vec<&str> = days.iter().map(|d| d["date"].as_str().unwrap()).collect();
    assert_eq!(dates, vec!["2024-06-03", "2024-06-05", "2024-06-07"]);

    // The timed dentist visit sorts ahead of the untimed gym session
    let wednesday = &days[1]["events"];
    assert_eq!(wednesday.as_array().unwrap().len(), 2);
    assert_eq!(wednesday[0]["text"], "Dentist");
    assert_eq!(wednesday[0]["hour"], 14.0);
    assert_eq!(wednesday[1]["text"], "Gym");
}

#[test]
fn test_invalid_input_is_rejected() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["add", "Bad", "--date", "2024-06-01", "--every", "fortnightly"])
        .stderr(predicate::str::contains("Invalid recurrence pattern"));

    harness
        .run_failure(&["add", "Backwards", "--date", "2024-06-10", "--end", "2024-06-01"])
        .stderr(predicate::str::contains("Error:"));

    harness
        .run_failure(&["range", "2024-06-10", "2024-06-01"])
        .stderr(predicate::str::contains("Invalid input"));

    // Nothing was written by the failed adds
    assert!(harness.dates_in_range("2024-01-01", "2024-12-31").is_empty());
}

#[test]
fn test_edit_regenerates_occurrences() {
    let harness = CliTestHarness::new();

    harness.run_success(&[
        "add", "Review", "--date", "2024-06-03", "--end", "2024-06-09", "--every", "daily",
    ]);
    let id = harness.first_action_id("2024-06-01", "2024-06-30");

    harness
        .run_success(&["edit", &id, "--end", "2024-06-05", "--text", "Daily review"])
        .stdout(predicate::str::contains("Updated action"));

    let days = harness.range_json("2024-06-01", "2024-06-30");
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["events"][0]["text"], "Daily review");
}

#[test]
fn test_show_accepts_short_and_full_ids() {
    let harness = CliTestHarness::new();

    harness.run_success(&["add", "Call mom", "--date", "2024-06-08", "--location", "Home"]);
    let id = harness.first_action_id("2024-06-08", "2024-06-08");
    let short = &id[id.len() - 8..];

    harness
        .run_success(&["show", short])
        .stdout(predicate::str::contains("Call mom"))
        .stdout(predicate::str::contains("Home"));

    harness
        .run_success(&["show", &id, "--json"])
        .stdout(predicate::str::contains(format!("\"actionId\": \"{}\"", id)));

    harness
        .run_failure(&["show", "00000000-0000-0000-0000-000000000000"])
        .stderr(predicate::str::contains("No action or occurrence"));
}

#[test]
fn test_skip_and_undo_a_date() {
    let harness = CliTestHarness::new();

    harness.run_success(&[
        "add", "Piano", "--date", "2024-06-03", "--end", "2024-06-05", "--every", "daily",
    ]);
    let id = harness.first_action_id("2024-06-03", "2024-06-05");

    harness
        .run_success(&["skip", &id, "2024-06-04", "--reason", "cancelled"])
        .stdout(predicate::str::contains("cancelled"));
    assert_eq!(
        harness.dates_in_range("2024-06-01", "2024-06-30"),
        vec!["2024-06-03", "2024-06-05"]
    );

    harness
        .run_success(&["skip", &id])
        .stdout(predicate::str::contains("2024-06-04"));

    harness.run_success(&["skip", &id, "2024-06-04", "--undo"]);
    assert_eq!(harness.dates_in_range("2024-06-01", "2024-06-30").len(), 3);
}

#[test]
fn test_notes_on_an_occurrence() {
    let harness = CliTestHarness::new();

    harness.run_success(&[
        "add", "Run", "--date", "2024-06-03", "--end", "2024-06-04", "--every", "daily",
    ]);
    let id = harness.first_action_id("2024-06-03", "2024-06-04");

    harness
        .run_success(&["note", "add", &id, "2024-06-04", "5k done", "--type", "progress"])
        .stdout(predicate::str::contains("Added note"));

    harness
        .run_success(&["note", "list", &id, "2024-06-04"])
        .stdout(predicate::str::contains("5k done"));

    let days = harness.range_json("2024-06-03", "2024-06-04");
    assert!(days[0]["events"][0]["notes"].as_array().unwrap().is_empty());
    assert_eq!(days[1]["events"][0]["notes"][0]["text"], "5k done");

    harness
        .run_failure(&["note", "add", &id, "2024-06-20", "too late"])
        .stderr(predicate::str::contains("no occurrence"));
}

#[test]
fn test_categories_and_forced_delete() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["category", "add", "Health", "--color", "#00ff00"])
        .stdout(predicate::str::contains("Created category"));
    harness.run_failure(&["category", "add", "Health"]);

    harness.run_success(&["add", "Yoga", "--date", "2024-06-10", "--category", "health"]);
    let days = harness.range_json("2024-06-10", "2024-06-10");
    assert_eq!(days[0]["events"][0]["category"]["name"], "Health");

    harness
        .run_success(&["category", "list"])
        .stdout(predicate::str::contains("Health"));

    let id = harness.first_action_id("2024-06-10", "2024-06-10");
    harness
        .run_success(&["delete", &id, "--force"])
        .stdout(predicate::str::contains("Deleted action"));
    assert!(harness.dates_in_range("2024-06-10", "2024-06-10").is_empty());

    harness.run_success(&["category", "delete", "Health"]);
    harness
        .run_failure(&["add", "Swim", "--date", "2024-06-11", "--category", "Health"])
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_repair_reports_every_action() {
    let harness = CliTestHarness::new();

    harness.run_success(&["add", "One", "--date", "2024-06-01"]);
    harness.run_success(&[
        "add", "Two", "--date", "2024-06-01", "--end", "2024-06-03", "--every", "daily",
    ]);

    harness
        .run_success(&["repair"])
        .stdout(predicate::str::contains("Regenerated"))
        .stdout(predicate::str::contains("action(s)"));

    assert_eq!(harness.dates_in_range("2024-06-01", "2024-06-03").len(), 3);
}

#[test]
fn test_default_range_starts_on_the_day_added_as_today() {
    let harness = CliTestHarness::new();

    harness.run_success(&["add", "Water plants", "--date", "today"]);

    let output = harness
        .command()
        .args(["range", "--json"])
        .output()
        .expect("Failed to run range");
    assert!(output.status.success());
    let days: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(days[0]["events"][0]["text"], "Water plants");
}
