use std::hint::black_box;

use chrono::{Duration, NaiveDate, NaiveTime};
use criterion::{criterion_group, criterion_main, Criterion};
use slot_engine::{compute_available_slots, Appointment, DayOfWeek, Services, WorkingHours};

fn busy_day() -> (NaiveDate, WorkingHours, Vec<Appointment>) {
    let day = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
    let hours = WorkingHours {
        break_start_time: NaiveTime::from_hms_opt(13, 0, 0),
        break_end_time: NaiveTime::from_hms_opt(14, 0, 0),
        ..WorkingHours::fallback(DayOfWeek::Monday)
    };
    let open = day.and_time(hours.start_time);
    // A 20-minute booking every 50 minutes across the day.
    let appointments = (0..12)
        .map(|i| {
            let start = open + Duration::minutes(i * 50);
            Appointment::starting_at(start).with_end(start + Duration::minutes(20))
        })
        .collect();
    (day, hours, appointments)
}

fn bench_slots(c: &mut Criterion) {
    let (day, hours, appointments) = busy_day();
    let services = Services::new();

    c.bench_function("slots_empty_day", |b| {
        b.iter(|| compute_available_slots(black_box(day), 30, Some(&hours), &[], &services))
    });

    c.bench_function("slots_busy_day", |b| {
        b.iter(|| {
            compute_available_slots(
                black_box(day),
                black_box(45),
                Some(&hours),
                black_box(&appointments),
                &services,
            )
        })
    });
}

criterion_group!(benches, bench_slots);
criterion_main!(benches);
