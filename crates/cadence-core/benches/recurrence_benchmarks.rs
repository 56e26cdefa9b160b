use cadence_core::models::Action;
use cadence_core::recurrence::{expand, MaterializationManager, RecurrencePattern, WeekdaySet};
use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn create_test_action(pattern: Option<RecurrencePattern>, days: u64) -> Action {
    let start = start_date();
    Action {
        text: "Benchmark Action".to_string(),
        is_date_range: true,
        start_date: Some(start),
        end_date: Some(start + Days::new(days)),
        recurrence_pattern: pattern,
        ..Default::default()
    }
}

fn bench_pattern_expansion(c: &mut Criterion) {
    let patterns = [
        ("daily", RecurrencePattern::Daily),
        ("weekly", RecurrencePattern::Weekly),
        ("monthly", RecurrencePattern::Monthly),
        ("weekdays", RecurrencePattern::DaysOfWeek(WeekdaySet::weekdays())),
    ];

    let mut group = c.benchmark_group("pattern_expansion");

    for (name, pattern) in patterns.iter() {
        for days in [30u64, 365, 900].iter() {
            let end = start_date() + Days::new(*days);
            group.bench_with_input(BenchmarkId::new(*name, days), days, |b, _| {
                b.iter(|| expand(black_box(start_date()), black_box(end), black_box(pattern)).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_materialization_plan(c: &mut Criterion) {
    let manager = MaterializationManager::with_defaults();

    let mut group = c.benchmark_group("materialization_plan");

    let cases = [
        ("plain_range", create_test_action(None, 365)),
        ("weekly_pattern", create_test_action(Some(RecurrencePattern::Weekly), 365)),
        (
            "open_ended_daily",
            Action {
                end_date: None,
                ..create_test_action(Some(RecurrencePattern::Daily), 0)
            },
        ),
    ];

    for (name, action) in cases.iter() {
        group.bench_function(*name, |b| b.iter(|| manager.plan(black_box(action)).unwrap()));
    }
    group.finish();
}

fn bench_pattern_parsing(c: &mut Criterion) {
    let inputs = ["daily", "monthly", "weekdays", "days:monday,wednesday,friday"];

    c.bench_function("pattern_parsing", |b| {
        b.iter(|| {
            for input in inputs.iter() {
                black_box(input.parse::<RecurrencePattern>().unwrap());
            }
        })
    });
}

criterion_group!(
    benches,
    bench_pattern_expansion,
    bench_materialization_plan,
    bench_pattern_parsing
);
criterion_main!(benches);
