use chrono::{NaiveDate, NaiveDateTime};
use timeline_core::{
    count_calendar_ticks, generate_intervals, IntervalConfig, IntervalGenerator, IntervalTick,
    IntervalType, TimelineBounds,
};

fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn bounds(start: NaiveDateTime, end: NaiveDateTime) -> TimelineBounds {
    TimelineBounds::new(start, end).unwrap()
}

fn labels(ticks: &[IntervalTick]) -> Vec<&str> {
    ticks.iter().map(|tick| tick.label.as_str()).collect()
}

fn positions(ticks: &[IntervalTick]) -> Vec<f64> {
    ticks.iter().map(|tick| tick.position_percent).collect()
}

fn world_war_two() -> TimelineBounds {
    bounds(at(1939, 9, 1, 0), at(1945, 9, 2, 0))
}

#[test]
fn yearly_ticks_cover_every_touched_year() {
    let ticks = generate_intervals(&world_war_two(), IntervalType::Yearly, None);

    assert_eq!(
        labels(&ticks),
        ["1939", "1940", "1941", "1942", "1943", "1944", "1945"]
    );
    assert_eq!(ticks[0].date, at(1939, 1, 1, 0));
    assert_eq!(ticks[0].position_percent, 0.0);
    let last = ticks.last().unwrap().position_percent;
    assert!(last > 80.0 && last < 100.0, "1945-01-01 sat at {last}");
}

#[test]
fn even_ticks_split_span_linearly() {
    let ticks = generate_intervals(
        &bounds(at(2000, 1, 1, 0), at(2010, 1, 1, 0)),
        IntervalType::Even,
        Some(5),
    );

    let dates = ticks.iter().map(|tick| tick.date).collect::<Vec<_>>();
    assert_eq!(
        dates,
        [
            at(2000, 1, 1, 0),
            at(2002, 7, 2, 6),
            at(2004, 12, 31, 12),
            at(2007, 7, 2, 18),
            at(2010, 1, 1, 0),
        ]
    );
    for (tick, expected) in positions(&ticks).into_iter().zip([0.0, 25.0, 50.0, 75.0, 100.0]) {
        assert!((tick - expected).abs() < 1e-9, "{tick} != {expected}");
    }
    assert_eq!(
        labels(&ticks),
        ["Jan 2000", "Jul 2002", "Dec 2004", "Jul 2007", "Jan 2010"]
    );
}

#[test]
fn even_tick_count_is_exact_for_every_supported_count() {
    let span = bounds(at(1999, 3, 7, 13), at(2000, 11, 2, 5));

    for count in 2..=20 {
        let ticks = generate_intervals(&span, IntervalType::Even, Some(count));
        assert_eq!(ticks.len(), count as usize);
        assert_eq!(ticks.first().unwrap().date, span.start());
        assert_eq!(ticks.last().unwrap().date, span.end());
        assert_eq!(ticks.last().unwrap().position_percent, 100.0);
    }
}

#[test]
fn even_count_is_clamped_and_defaulted() {
    let span = bounds(at(2020, 1, 1, 0), at(2020, 1, 2, 0));

    assert_eq!(generate_intervals(&span, IntervalType::Even, Some(1)).len(), 2);
    assert_eq!(generate_intervals(&span, IntervalType::Even, Some(50)).len(), 20);
    assert_eq!(generate_intervals(&span, IntervalType::Even, None).len(), 5);

    let custom = IntervalGenerator::new(IntervalConfig {
        default_even_count: 8,
        ..IntervalConfig::default()
    });
    assert_eq!(custom.generate(&span, IntervalType::Even, None).len(), 8);
}

#[test]
fn even_labels_follow_span_length() {
    let short = generate_intervals(
        &bounds(at(2020, 5, 4, 8), at(2020, 5, 4, 16)),
        IntervalType::Even,
        Some(3),
    );
    assert_eq!(labels(&short), ["08:00", "12:00", "16:00"]);

    let week = generate_intervals(
        &bounds(at(2020, 5, 4, 0), at(2020, 5, 8, 0)),
        IntervalType::Even,
        Some(2),
    );
    assert_eq!(labels(&week), ["Mon 4", "Fri 8"]);
}

#[test]
fn daily_ticks_snap_last_day_to_end() {
    let ticks = generate_intervals(
        &bounds(at(2024, 3, 1, 10), at(2024, 3, 5, 8)),
        IntervalType::Daily,
        None,
    );

    assert_eq!(labels(&ticks), ["1 Mar", "2 Mar", "3 Mar", "4 Mar", "5 Mar"]);
    assert_eq!(ticks[0].position_percent, 0.0);
    assert_eq!(ticks[4].date, at(2024, 3, 5, 0));
    assert_eq!(ticks[4].position_percent, 100.0);
}

#[test]
fn weekly_ticks_start_on_iso_mondays() {
    let ticks = generate_intervals(
        &bounds(at(2024, 3, 6, 0), at(2024, 3, 27, 0)),
        IntervalType::Weekly,
        None,
    );

    let dates = ticks.iter().map(|tick| tick.date).collect::<Vec<_>>();
    assert_eq!(
        dates,
        [
            at(2024, 3, 4, 0),
            at(2024, 3, 11, 0),
            at(2024, 3, 18, 0),
            at(2024, 3, 25, 0),
        ]
    );
    assert_eq!(
        labels(&ticks),
        ["Week 10, 2024", "Week 11, 2024", "Week 12, 2024", "Week 13, 2024"]
    );
}

#[test]
fn monthly_ticks_cross_year_boundary() {
    let ticks = generate_intervals(
        &bounds(at(2023, 11, 15, 0), at(2024, 2, 1, 0)),
        IntervalType::Monthly,
        None,
    );

    assert_eq!(
        labels(&ticks),
        ["Nov 2023", "Dec 2023", "Jan 2024", "Feb 2024"]
    );
    assert_eq!(ticks[0].position_percent, 0.0);
    assert_eq!(ticks[3].position_percent, 100.0);
}

#[test]
fn decade_and_century_ticks_floor_to_bucket() {
    let span = bounds(at(1888, 5, 1, 0), at(2021, 1, 1, 0));

    let decades = generate_intervals(&span, IntervalType::Decade, None);
    assert_eq!(decades.len(), 15);
    assert_eq!(decades.first().unwrap().label, "1880s");
    assert_eq!(decades.last().unwrap().label, "2020s");

    let centuries = generate_intervals(&span, IntervalType::Century, None);
    assert_eq!(
        labels(&centuries),
        ["19th century", "20th century", "21st century"]
    );
}

#[test]
fn positions_stay_within_axis_and_never_decrease() {
    let spans = [
        world_war_two(),
        bounds(at(2024, 2, 28, 23), at(2024, 3, 2, 1)),
        bounds(at(1066, 10, 14, 0), at(1215, 6, 15, 0)),
    ];

    for span in &spans {
        for kind in IntervalType::ALL {
            let ticks = generate_intervals(span, kind, None);
            for pair in ticks.windows(2) {
                assert!(pair[0].position_percent <= pair[1].position_percent);
            }
            assert!(ticks
                .iter()
                .all(|tick| (0.0..=100.0).contains(&tick.position_percent)));
        }
    }
}

#[test]
fn counted_ticks_match_generated_ticks() {
    let spans = [
        world_war_two(),
        bounds(at(2023, 12, 30, 12), at(2024, 1, 9, 6)),
        bounds(at(1888, 5, 1, 0), at(2021, 1, 1, 0)),
    ];

    for span in &spans {
        for kind in IntervalType::ALL.into_iter().filter(|kind| kind.is_calendar()) {
            if kind == IntervalType::Daily && span.span_ms() > 10_000 * 86_400_000 {
                continue;
            }
            let generated = generate_intervals(span, kind, None).len() as u64;
            assert_eq!(
                count_calendar_ticks(span, kind),
                generated,
                "{kind} over {span:?}"
            );
        }
    }
}

#[test]
fn availability_offers_readable_calendar_units_and_even() {
    let generator = IntervalGenerator::default();

    assert_eq!(
        generator.available_types(&world_war_two()),
        [IntervalType::Even, IntervalType::Yearly, IntervalType::Decade]
    );

    let ten_days = bounds(at(2024, 1, 1, 0), at(2024, 1, 11, 0));
    assert_eq!(
        generator.available_types(&ten_days),
        [IntervalType::Even, IntervalType::Daily, IntervalType::Weekly]
    );
    assert!(!generator.is_available(&ten_days, IntervalType::Monthly));

    let daily = generator
        .availability(&ten_days, None)
        .into_iter()
        .find(|entry| entry.kind == IntervalType::Daily)
        .unwrap();
    assert_eq!(daily.tick_count, 11);
}

#[test]
fn even_availability_reports_requested_count() {
    let generator = IntervalGenerator::default();
    let span = world_war_two();

    let even = |requested| {
        generator
            .availability(&span, requested)
            .into_iter()
            .find(|entry| entry.kind == IntervalType::Even)
            .unwrap()
    };
    assert_eq!(even(None).tick_count, 5);
    assert_eq!(even(Some(12)).tick_count, 12);
    assert_eq!(even(Some(99)).tick_count, 20);
    assert!(even(Some(12)).available);
    assert_eq!(
        generator.tick_count(&span, IntervalType::Even, Some(12)),
        generate_intervals(&span, IntervalType::Even, Some(12)).len() as u64
    );
}

#[test]
fn earliest_calendar_dates_degrade_instead_of_panicking() {
    let earliest = at(-262143, 1, 1, 0);
    let short = bounds(earliest, at(-262143, 3, 1, 0));

    for kind in IntervalType::ALL.into_iter().filter(|kind| kind.is_calendar()) {
        let generated = generate_intervals(&short, kind, None).len() as u64;
        assert_eq!(count_calendar_ticks(&short, kind), generated, "{kind}");
    }
    assert_eq!(generate_intervals(&short, IntervalType::Daily, None).len(), 60);

    let long = bounds(earliest, at(2000, 1, 1, 0));
    let availability = IntervalGenerator::default().availability(&long, None);
    assert_eq!(availability.len(), IntervalType::ALL.len());
    assert!(availability
        .iter()
        .filter(|entry| entry.kind.is_calendar())
        .all(|entry| !entry.available));
}

#[test]
fn missing_or_reversed_bounds_yield_no_ticks() {
    let generator = IntervalGenerator::default();
    let start = at(2020, 1, 1, 0);
    let end = at(2021, 1, 1, 0);

    assert!(generator
        .generate_from_parts(None, Some(end), IntervalType::Monthly, None)
        .is_empty());
    assert!(generator
        .generate_from_parts(Some(end), Some(start), IntervalType::Even, None)
        .is_empty());
    assert_eq!(
        generator
            .generate_from_parts(Some(start), Some(end), IntervalType::Monthly, None)
            .len(),
        13
    );
}
