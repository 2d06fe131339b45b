//! Tests for the availability engine: working window, break, existing
//! bookings, and the degenerate days that must yield no slots.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use slot_engine::{
    compute_available_slots, slot_labels, slots_after, Appointment, AppointmentStatus, DayOfWeek,
    Service, Services, SlotError, WorkingHours,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Monday 2026-03-16.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    monday().and_time(t(h, m))
}

fn hours(open: (u32, u32), close: (u32, u32)) -> WorkingHours {
    WorkingHours {
        day_of_week: DayOfWeek::Monday,
        is_working_day: true,
        start_time: t(open.0, open.1),
        end_time: t(close.0, close.1),
        break_start_time: None,
        break_end_time: None,
    }
}

fn with_break(mut wh: WorkingHours, start: (u32, u32), end: (u32, u32)) -> WorkingHours {
    wh.break_start_time = Some(t(start.0, start.1));
    wh.break_end_time = Some(t(end.0, end.1));
    wh
}

fn booked(start: (u32, u32), end: (u32, u32)) -> Appointment {
    Appointment::starting_at(at(start.0, start.1))
        .with_end(at(end.0, end.1))
        .with_status(AppointmentStatus::Confirmed)
}

fn labels(
    duration: i64,
    wh: Option<&WorkingHours>,
    appointments: &[Appointment],
    services: &Services,
) -> Vec<String> {
    slot_labels(&compute_available_slots(monday(), duration, wh, appointments, services).unwrap())
}

// ── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn scenario_a_hour_service_in_morning_window() {
    let wh = hours((9, 0), (13, 0));
    let got = labels(60, Some(&wh), &[], &Services::new());
    assert_eq!(
        got,
        vec!["9:00", "9:30", "10:00", "10:30", "11:00", "11:30", "12:00"]
    );
}

#[test]
fn scenario_b_break_excludes_overlapping_slots_only() {
    let wh = with_break(hours((9, 0), (19, 0)), (13, 0), (14, 0));
    let got = labels(30, Some(&wh), &[], &Services::new());

    assert!(got.contains(&"12:30".to_string()), "ends at break start: allowed");
    assert!(!got.contains(&"13:00".to_string()));
    assert!(!got.contains(&"13:30".to_string()));
    assert!(got.contains(&"14:00".to_string()), "starts at break end: allowed");
    assert_eq!(got.len(), 18);
}

#[test]
fn scenario_c_existing_forty_five_minute_booking() {
    let services: Services = [Service {
        id: "beard".into(),
        name: Some("Beard trim".into()),
        duration_minutes: 45,
    }]
    .into_iter()
    .collect();
    let existing = vec![Appointment::starting_at(at(10, 0))
        .with_service("beard")
        .with_status(AppointmentStatus::Confirmed)];
    let wh = hours((9, 0), (13, 0));

    let got = labels(30, Some(&wh), &existing, &services);

    assert!(got.contains(&"9:30".to_string()), "ends exactly at 10:00");
    assert!(!got.contains(&"10:00".to_string()));
    assert!(!got.contains(&"10:30".to_string()), "starts before 10:45");
    assert!(got.contains(&"11:00".to_string()));
    assert!(
        slot_engine::find_conflicts(at(10, 45), 30, &existing, &services).is_empty(),
        "a start at the booking's end is not a conflict"
    );
    assert_eq!(
        slot_engine::find_conflicts(at(10, 15), 30, &existing, &services).len(),
        1
    );
}

#[test]
fn scenario_d_duration_longer_than_the_day() {
    let wh = hours((9, 0), (13, 0));
    assert!(labels(600, Some(&wh), &[], &Services::new()).is_empty());
}

// ── Window and break edge cases ─────────────────────────────────────────────

#[test]
fn closed_day_yields_no_slots() {
    let wh = WorkingHours::closed(DayOfWeek::Monday);
    let slots = compute_available_slots(monday(), 30, Some(&wh), &[], &Services::new()).unwrap();
    assert!(slots.is_empty());
}

#[test]
fn missing_schedule_uses_nine_to_seven_fallback() {
    let got = labels(30, None, &[], &Services::new());
    assert_eq!(got.first().map(String::as_str), Some("9:00"));
    assert_eq!(got.last().map(String::as_str), Some("18:30"));
    assert_eq!(got.len(), 20);
}

#[test]
fn reversed_window_degrades_to_empty() {
    let wh = hours((18, 0), (9, 0));
    assert!(labels(30, Some(&wh), &[], &Services::new()).is_empty());
}

#[test]
fn equal_break_bounds_are_ignored() {
    let wh = with_break(hours((9, 0), (11, 0)), (10, 0), (10, 0));
    assert_eq!(
        labels(30, Some(&wh), &[], &Services::new()),
        vec!["9:00", "9:30", "10:00", "10:30"]
    );
}

#[test]
fn reversed_break_is_ignored() {
    let wh = with_break(hours((9, 0), (11, 0)), (10, 30), (10, 0));
    assert_eq!(labels(30, Some(&wh), &[], &Services::new()).len(), 4);
}

#[test]
fn off_grid_opening_skips_half_hour_before_open() {
    let wh = hours((9, 15), (11, 0));
    assert_eq!(
        labels(30, Some(&wh), &[], &Services::new()),
        vec!["9:30", "10:00", "10:30"]
    );
}

#[test]
fn slot_may_end_exactly_at_close() {
    let wh = hours((9, 0), (10, 0));
    assert_eq!(labels(30, Some(&wh), &[], &Services::new()), vec!["9:00", "9:30"]);
    assert_eq!(labels(60, Some(&wh), &[], &Services::new()), vec!["9:00"]);
}

#[test]
fn slots_carry_end_and_duration() {
    let wh = hours((9, 0), (10, 0));
    let slots = compute_available_slots(monday(), 45, Some(&wh), &[], &Services::new()).unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start, t(9, 0));
    assert_eq!(slots[0].end, t(9, 45));
    assert_eq!(slots[0].duration_minutes, 45);
}

// ── Existing bookings ───────────────────────────────────────────────────────

#[test]
fn back_to_back_bookings_are_allowed() {
    let wh = hours((9, 0), (12, 0));
    let existing = vec![booked((10, 0), (10, 30))];
    let got = labels(30, Some(&wh), &existing, &Services::new());
    assert_eq!(got, vec!["9:00", "9:30", "10:30", "11:00", "11:30"]);
}

#[test]
fn cancelled_booking_never_blocks() {
    let wh = hours((9, 0), (12, 0));
    let existing = vec![booked((10, 0), (10, 30)).with_status(AppointmentStatus::Cancelled)];
    let got = labels(30, Some(&wh), &existing, &Services::new());
    assert!(got.contains(&"10:00".to_string()));
    assert_eq!(got.len(), 6);
}

#[test]
fn in_progress_and_no_show_bookings_block() {
    let wh = hours((9, 0), (11, 0));
    let existing = vec![
        booked((9, 0), (9, 30)).with_status(AppointmentStatus::InProgress),
        booked((10, 0), (10, 30)).with_status(AppointmentStatus::NoShow),
    ];
    assert_eq!(
        labels(30, Some(&wh), &existing, &Services::new()),
        vec!["9:30", "10:30"]
    );
}

#[test]
fn bookings_on_other_days_are_ignored() {
    let wh = hours((9, 0), (10, 0));
    let tomorrow = monday().succ_opt().unwrap();
    let existing = vec![Appointment::starting_at(tomorrow.and_time(t(9, 0)))
        .with_end(tomorrow.and_time(t(10, 0)))];
    assert_eq!(labels(30, Some(&wh), &existing, &Services::new()).len(), 2);
}

#[test]
fn booking_without_end_or_service_occupies_thirty_minutes() {
    let wh = hours((9, 0), (11, 0));
    let existing = vec![Appointment::starting_at(at(9, 30))];
    assert_eq!(
        labels(30, Some(&wh), &existing, &Services::new()),
        vec!["9:00", "10:00", "10:30"]
    );
}

#[test]
fn actual_duration_beats_service_duration() {
    let services: Services = [Service {
        id: "color".into(),
        name: None,
        duration_minutes: 120,
    }]
    .into_iter()
    .collect();
    let wh = hours((9, 0), (12, 0));
    let existing = vec![Appointment::starting_at(at(9, 0))
        .with_actual_duration(60)
        .with_service("color")];
    assert_eq!(
        labels(30, Some(&wh), &existing, &services),
        vec!["10:00", "10:30", "11:00", "11:30"]
    );
}

#[test]
fn overlapping_bookings_leave_gap_only_after_the_later_end() {
    let wh = hours((9, 0), (12, 0));
    let existing = vec![booked((9, 0), (10, 0)), booked((9, 30), (11, 0))];
    assert_eq!(
        labels(30, Some(&wh), &existing, &Services::new()),
        vec!["11:00", "11:30"]
    );
}

#[test]
fn fully_booked_day_is_empty_not_an_error() {
    let wh = hours((9, 0), (12, 0));
    let existing = vec![booked((9, 0), (12, 0))];
    assert!(labels(30, Some(&wh), &existing, &Services::new()).is_empty());
}

// ── Errors and purity ───────────────────────────────────────────────────────

#[test]
fn non_positive_duration_is_rejected() {
    for bad in [0, -30] {
        let err = compute_available_slots(monday(), bad, None, &[], &Services::new()).unwrap_err();
        assert_eq!(err, SlotError::InvalidDuration(bad));
    }
}

#[test]
fn repeated_calls_give_identical_output() {
    let wh = with_break(hours((9, 0), (17, 0)), (12, 0), (13, 0));
    let existing = vec![booked((10, 0), (11, 0)), booked((15, 0), (15, 45))];
    let first = compute_available_slots(monday(), 45, Some(&wh), &existing, &Services::new()).unwrap();
    let second = compute_available_slots(monday(), 45, Some(&wh), &existing, &Services::new()).unwrap();
    assert_eq!(first, second);
}

// ── Today view ──────────────────────────────────────────────────────────────

#[test]
fn slots_after_drops_started_slots_today_only() {
    let wh = hours((9, 0), (11, 0));
    let slots = compute_available_slots(monday(), 30, Some(&wh), &[], &Services::new()).unwrap();

    let today = slots_after(slots.clone(), monday(), at(9, 30));
    assert_eq!(slot_labels(&today), vec!["10:00", "10:30"]);

    let yesterday = monday().pred_opt().unwrap().and_time(t(23, 0));
    assert_eq!(slots_after(slots.clone(), monday(), yesterday), slots);
}

// ── Sub-minute timestamps ───────────────────────────────────────────────────

#[test]
fn booking_ending_mid_minute_blocks_the_next_grid_start() {
    // 09:30:00-10:00:30 on the fallback window.
    let existing = vec![Appointment::starting_at(at(9, 30))
        .with_end(monday().and_hms_opt(10, 0, 30).unwrap())
        .with_status(AppointmentStatus::Confirmed)];
    let services = Services::new();

    let slots = compute_available_slots(monday(), 30, None, &existing, &services).unwrap();
    let got = slot_labels(&slots);
    assert!(!got.contains(&"10:00".to_string()), "10:00 overlaps by 30 seconds");
    assert!(got.contains(&"10:30".to_string()));

    // Every offered slot must also pass the submission-time check.
    for slot in &slots {
        assert!(
            slot_engine::find_conflicts(slot.starts_at(monday()), 30, &existing, &services)
                .is_empty(),
            "offered {} but it conflicts",
            slot.label()
        );
    }
}

#[test]
fn booking_starting_mid_minute_still_allows_slot_ending_before_it() {
    let wh = hours((9, 0), (11, 0));
    let existing = vec![Appointment::starting_at(monday().and_hms_opt(10, 0, 30).unwrap())
        .with_end(at(10, 30))];
    assert_eq!(
        labels(30, Some(&wh), &existing, &Services::new()),
        vec!["9:00", "9:30", "10:30"]
    );
}

#[test]
fn break_ending_mid_minute_blocks_the_next_grid_start() {
    let mut wh = with_break(hours((9, 0), (11, 0)), (10, 0), (10, 0));
    wh.break_end_time = NaiveTime::from_hms_opt(10, 0, 30);
    assert_eq!(
        labels(30, Some(&wh), &[], &Services::new()),
        vec!["9:00", "9:30", "10:30"]
    );
}

// ── Oversized durations ─────────────────────────────────────────────────────

#[test]
fn huge_duration_is_empty_not_a_panic() {
    for duration in [i64::MAX, i64::MAX - 1, 1_000_000_000_000] {
        let slots = compute_available_slots(monday(), duration, None, &[], &Services::new()).unwrap();
        assert!(slots.is_empty(), "duration {} should fit nowhere", duration);
    }
}

#[test]
fn huge_duration_conflicts_with_every_later_booking() {
    let existing = vec![booked((9, 0), (9, 30)), booked((15, 0), (15, 30))];
    let conflicts =
        slot_engine::find_conflicts(at(10, 0), i64::MAX, &existing, &Services::new());
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].start_datetime, at(15, 0));
}
