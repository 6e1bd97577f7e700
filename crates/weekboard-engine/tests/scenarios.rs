//! End-to-end expansion scenarios over the public engine API.

use weekboard_core::day::DayKey;
use weekboard_core::item::{Item, ItemKind, Recurrence};
use weekboard_core::time::TimeOfDay;
use weekboard_engine::{DayRange, EntryId, expand};

fn day(s: &str) -> DayKey {
    s.parse().unwrap()
}

fn window(start: &str, end: &str) -> DayRange {
    DayRange::new(day(start), day(end)).unwrap()
}

fn master(id: i64, anchor: &str, rule: &str, title: &str) -> Item {
    Item {
        id,
        user_id: 1,
        kind: ItemKind::Event,
        day: day(anchor),
        time_start: None,
        time_end: None,
        title: title.to_string(),
        details: None,
        status: None,
        recurrence: Some(Recurrence::from_rule(rule)),
        parent_id: None,
        occurrence_day: None,
    }
}

fn override_of(id: i64, parent: i64, on: &str, title: &str) -> Item {
    Item {
        id,
        user_id: 1,
        kind: ItemKind::Event,
        day: day(on),
        time_start: None,
        time_end: None,
        title: title.to_string(),
        details: None,
        status: None,
        recurrence: None,
        parent_id: Some(parent),
        occurrence_day: Some(day(on)),
    }
}

struct ExpandCase {
    name: &'static str,
    rule: &'static str,
    anchor: &'static str,
    window: (&'static str, &'static str),
    exdates: &'static [&'static str],
    expected_days: &'static [&'static str],
}

fn expand_cases() -> Vec<ExpandCase> {
    vec![
        ExpandCase {
            name: "daily_every_other_day",
            rule: "FREQ=DAILY;INTERVAL=2",
            anchor: "2024-01-01",
            window: ("2024-01-01", "2024-01-08"),
            exdates: &[],
            expected_days: &["2024-01-01", "2024-01-03", "2024-01-05", "2024-01-07"],
        },
        ExpandCase {
            name: "daily_with_exception",
            rule: "FREQ=DAILY;INTERVAL=2",
            anchor: "2024-01-01",
            window: ("2024-01-01", "2024-01-08"),
            exdates: &["2024-01-05"],
            expected_days: &["2024-01-01", "2024-01-03", "2024-01-07"],
        },
        ExpandCase {
            name: "weekly_monday_wednesday",
            rule: "FREQ=WEEKLY;BYDAY=MO,WE;INTERVAL=1",
            anchor: "2024-01-01",
            window: ("2024-01-01", "2024-01-14"),
            exdates: &[],
            expected_days: &["2024-01-01", "2024-01-03", "2024-01-08", "2024-01-10"],
        },
        ExpandCase {
            name: "monthly_day_31_skips_short_months",
            rule: "FREQ=MONTHLY;INTERVAL=1",
            anchor: "2024-01-31",
            window: ("2024-01-01", "2024-04-30"),
            exdates: &[],
            expected_days: &["2024-01-31", "2024-03-31"],
        },
        ExpandCase {
            name: "daily_count_limits_total_occurrences",
            rule: "FREQ=DAILY;COUNT=3",
            anchor: "2024-01-01",
            window: ("2024-01-01", "2024-01-31"),
            exdates: &[],
            expected_days: &["2024-01-01", "2024-01-02", "2024-01-03"],
        },
        ExpandCase {
            name: "daily_until_is_inclusive",
            rule: "FREQ=DAILY;UNTIL=20240104",
            anchor: "2024-01-01",
            window: ("2024-01-01", "2024-01-31"),
            exdates: &[],
            expected_days: &["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"],
        },
        ExpandCase {
            name: "master_anchored_before_window",
            rule: "FREQ=WEEKLY;BYDAY=FR",
            anchor: "2023-11-03",
            window: ("2024-01-01", "2024-01-14"),
            exdates: &[],
            expected_days: &["2024-01-05", "2024-01-12"],
        },
    ]
}

fn assert_case(case: &ExpandCase) {
    let mut item = master(1, case.anchor, case.rule, "Pills");
    if let Some(rec) = item.recurrence.as_mut() {
        for exdate in case.exdates {
            rec.add_exdate(day(exdate));
        }
    }
    let range = window(case.window.0, case.window.1);
    let entries = expand(&[item], range);
    let days: Vec<String> = entries.iter().map(|e| e.day.to_string()).collect();
    assert_eq!(days, case.expected_days, "case {}", case.name);
    for entry in &entries {
        assert!(entry.is_occurrence, "case {}", case.name);
        assert!(!entry.is_override, "case {}", case.name);
        assert_eq!(entry.source_id, Some(1), "case {}", case.name);
    }
}

#[test_log::test]
fn expansion_scenarios() {
    for case in expand_cases() {
        assert_case(&case);
    }
}

#[test]
fn override_replaces_generated_occurrence() {
    // Master expands every other day; 01-03 is overridden (which also
    // records the exception), 01-05 is a bare exception.
    let mut pills = master(1, "2024-01-01", "FREQ=DAILY;INTERVAL=2", "Pills");
    if let Some(rec) = pills.recurrence.as_mut() {
        rec.add_exdate(day("2024-01-03"));
        rec.add_exdate(day("2024-01-05"));
    }
    let double = override_of(9, 1, "2024-01-03", "Pills (double dose)");

    let entries = expand(&[pills, double], window("2024-01-01", "2024-01-08"));
    let days: Vec<String> = entries.iter().map(|e| e.day.to_string()).collect();
    assert_eq!(days, ["2024-01-01", "2024-01-03", "2024-01-07"]);

    let overridden = &entries[1];
    assert_eq!(overridden.id, EntryId::Item(9));
    assert_eq!(overridden.title, "Pills (double dose)");
    assert_eq!(overridden.source_id, Some(1));
    assert!(overridden.is_override);
    assert!(overridden.is_occurrence);

    // The surrounding occurrences stay generated and non-override.
    assert!(!entries[0].is_override);
    assert!(!entries[2].is_override);
    assert_eq!(entries[0].id.to_string(), "r:1:2024-01-01");
}

#[test]
fn no_generated_occurrence_coexists_with_override() {
    // Even without the exception recorded (a collaborator bug), the
    // override still wins on its day and only one entry comes out.
    let pills = master(1, "2024-01-01", "FREQ=DAILY", "Pills");
    let replacement = override_of(9, 1, "2024-01-02", "Replacement");

    let entries = expand(&[pills, replacement], window("2024-01-02", "2024-01-02"));
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, EntryId::Item(9));
    assert!(entries[0].is_override);
}

#[test]
fn count_conservation_across_any_window() {
    // COUNT=5 from the anchor: a window far wider than the rule still
    // sees five occurrences in total.
    let item = master(1, "2024-01-01", "FREQ=WEEKLY;BYDAY=MO,TH;COUNT=5", "Standup");
    let all = expand(&[item.clone()], window("2023-01-01", "2025-12-31"));
    assert_eq!(all.len(), 5);

    // A late window sees only what is left of the budget.
    let late = expand(&[item], window("2024-01-10", "2025-12-31"));
    let days: Vec<String> = late.iter().map(|e| e.day.to_string()).collect();
    assert_eq!(days, ["2024-01-11", "2024-01-15"]);
}

#[test]
fn master_level_end_conditions_apply_when_rule_has_none() {
    let mut item = master(1, "2024-01-01", "FREQ=DAILY", "Stretch");
    if let Some(rec) = item.recurrence.as_mut() {
        rec.count = Some(2);
    }
    let entries = expand(&[item.clone()], window("2024-01-01", "2024-01-31"));
    assert_eq!(entries.len(), 2);

    // Rule-level COUNT wins over the master-level value.
    if let Some(rec) = item.recurrence.as_mut() {
        rec.rule = "FREQ=DAILY;COUNT=4".to_string();
    }
    let entries = expand(&[item], window("2024-01-01", "2024-01-31"));
    assert_eq!(entries.len(), 4);
}

#[test]
fn master_level_until_applies_when_rule_has_none() {
    let mut item = master(1, "2024-01-01", "FREQ=DAILY", "Stretch");
    if let Some(rec) = item.recurrence.as_mut() {
        rec.until_day = Some(day("2024-01-03"));
    }
    let entries = expand(&[item], window("2024-01-01", "2024-01-31"));
    assert_eq!(entries.len(), 3);
}

#[test]
fn output_is_bounded_by_window_and_anchor() {
    let items = vec![
        master(1, "2024-01-10", "FREQ=DAILY;INTERVAL=3", "A"),
        master(2, "2023-06-01", "FREQ=WEEKLY;BYDAY=TU,SA", "B"),
        master(3, "2023-12-31", "FREQ=MONTHLY;BYMONTHDAY=5,20", "C"),
    ];
    let range = window("2024-01-08", "2024-02-08");
    for entry in expand(&items, range) {
        assert!(range.contains(entry.day), "{} outside window", entry.day);
        let source = entry.source_id.unwrap();
        let anchor = items.iter().find(|i| i.id == source).unwrap().day;
        assert!(entry.day >= anchor, "{} before anchor {anchor}", entry.day);
    }
}

#[test]
fn mixed_sources_sort_stably() {
    let untimed_master = master(1, "2024-01-01", "FREQ=DAILY", "Recurring untimed");
    let timed_master = Item {
        time_start: TimeOfDay::normalize("08:00"),
        ..master(2, "2024-01-01", "FREQ=DAILY", "Recurring timed")
    };
    let plain = Item {
        recurrence: None,
        time_start: TimeOfDay::normalize("09:00"),
        ..master(3, "2024-01-02", "FREQ=DAILY", "Plain nine")
    };

    let entries = expand(
        &[untimed_master, timed_master, plain],
        window("2024-01-01", "2024-01-02"),
    );
    let ids: Vec<String> = entries.iter().map(|e| e.id.to_string()).collect();
    assert_eq!(
        ids,
        [
            "r:2:2024-01-01", // 08:00
            "r:1:2024-01-01", // untimed after timed
            "r:2:2024-01-02", // 08:00
            "3",              // 09:00
            "r:1:2024-01-02", // untimed last
        ]
    );
}
