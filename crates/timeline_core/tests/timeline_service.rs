use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::collections::HashSet;
use timeline_core::db::migrations::latest_version;
use timeline_core::db::open_db_in_memory;
use timeline_core::{
    CreateTimelineRequest, EventRepository, EventSize, IntervalSettings, IntervalType,
    ModelValidationError, NewEventRequest, Orientation, RelayoutSummary, RepoError,
    SqliteEventRepository, SqliteTimelineRepository, Timeline, TimelineBounds, TimelineEvent,
    TimelineRepository, TimelineService, TimelineServiceError,
};
use uuid::Uuid;

type SqliteTimelineService<'conn> =
    TimelineService<SqliteTimelineRepository<'conn>, SqliteEventRepository<'conn>>;

fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn service(conn: &Connection) -> SqliteTimelineService<'_> {
    TimelineService::new(
        SqliteTimelineRepository::try_new(conn).unwrap(),
        SqliteEventRepository::try_new(conn).unwrap(),
    )
}

fn create_request() -> CreateTimelineRequest {
    CreateTimelineRequest {
        title: " Second World War ".to_string(),
        start: at(1939, 9, 1),
        end: at(1945, 9, 2),
        orientation: Orientation::Horizontal,
        interval: IntervalSettings::default(),
    }
}

fn new_event(timeline_id: Uuid, title: &str, date: Option<NaiveDateTime>) -> NewEventRequest {
    NewEventRequest {
        timeline_id,
        title: title.to_string(),
        description: String::new(),
        image_url: None,
        color: None,
        size: EventSize::Medium,
        date,
    }
}

fn y_offset(event: &TimelineEvent) -> f64 {
    event.offset.expect("event should have an offset").y
}

#[test]
fn timeline_repository_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTimelineRepository::try_new(&conn).unwrap();

    let bounds = TimelineBounds::new(at(1939, 9, 1), at(1945, 9, 2)).unwrap();
    let mut timeline = Timeline::new("Second World War", bounds);
    timeline.orientation = Orientation::Vertical;
    timeline.interval = IntervalSettings {
        kind: IntervalType::Yearly,
        even_count: 7,
    };
    let id = repo.create_timeline(&timeline).unwrap();

    let loaded = repo.get_timeline(id, false).unwrap().unwrap();
    assert_eq!(loaded, timeline);

    timeline.title = "WWII".to_string();
    timeline.interval.kind = IntervalType::Decade;
    repo.update_timeline(&timeline).unwrap();
    assert_eq!(repo.get_timeline(id, false).unwrap().unwrap(), timeline);

    repo.soft_delete_timeline(id).unwrap();
    assert!(repo.get_timeline(id, false).unwrap().is_none());
    assert!(repo.get_timeline(id, true).unwrap().unwrap().is_deleted);
    assert!(repo.list_timelines(false).unwrap().is_empty());
    assert_eq!(repo.list_timelines(true).unwrap().len(), 1);
}

#[test]
fn event_repository_roundtrip_preserves_position_fields() {
    let conn = open_db_in_memory().unwrap();
    let timelines = SqliteTimelineRepository::try_new(&conn).unwrap();
    let events = SqliteEventRepository::try_new(&conn).unwrap();

    let bounds = TimelineBounds::new(at(1939, 9, 1), at(1945, 9, 2)).unwrap();
    let timeline_id = timelines
        .create_timeline(&Timeline::new("WWII", bounds))
        .unwrap();

    let mut event = TimelineEvent::new(timeline_id, "D-Day", Some(at(1944, 6, 6)));
    event.description = "Normandy landings".to_string();
    event.image_url = Some("https://example.org/dday.jpg".to_string());
    event.size = EventSize::Large;
    event.apply_auto_offset(
        timeline_core::AutoOffset {
            perpendicular: -120.0,
            axis: 0.0,
        },
        Orientation::Horizontal,
    );
    let id = events.create_event(&event).unwrap();
    assert_eq!(events.get_event(id, false).unwrap().unwrap(), event);

    let undated = TimelineEvent::new(timeline_id, "Undated", None);
    events.create_event(&undated).unwrap();
    let listed = events.list_events(timeline_id).unwrap();
    assert_eq!(listed[0].uuid, undated.uuid);
    assert_eq!(listed[1].uuid, event.uuid);

    event.move_to(15.0, 80.0);
    assert_eq!(events.save_offsets(std::slice::from_ref(&event)).unwrap(), 1);
    let moved = events.get_event(id, false).unwrap().unwrap();
    assert!(moved.is_manually_positioned());
    assert_eq!(moved.auto_offset, None);

    events.soft_delete_event(id).unwrap();
    assert!(events.get_event(id, false).unwrap().is_none());
    assert_eq!(events.list_events(timeline_id).unwrap().len(), 1);
}

#[test]
fn event_repository_rejects_invalid_writes() {
    let conn = open_db_in_memory().unwrap();
    let events = SqliteEventRepository::try_new(&conn).unwrap();

    let mut event = TimelineEvent::new(Uuid::new_v4(), "Bad color", None);
    event.color = "blue".to_string();
    assert!(matches!(
        events.create_event(&event),
        Err(RepoError::Validation(ModelValidationError::InvalidColor(_)))
    ));

    let ghost = TimelineEvent::new(Uuid::new_v4(), "Ghost", None);
    assert!(matches!(
        events.update_event(&ghost),
        Err(RepoError::NotFound(id)) if id == ghost.uuid
    ));
    assert!(matches!(
        events.save_offsets(std::slice::from_ref(&ghost)),
        Err(RepoError::NotFound(_))
    ));
}

#[test]
fn repositories_reject_unmigrated_connections() {
    let raw = Connection::open_in_memory().unwrap();

    match SqliteTimelineRepository::try_new(&raw) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        }) => {
            assert_eq!(expected_version, latest_version());
            assert_eq!(actual_version, 0);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unmigrated connection must be rejected"),
    }
    assert!(SqliteEventRepository::try_new(&raw).is_err());
}

#[test]
fn adding_events_lays_out_and_persists_offsets() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let timeline = service.create_timeline(create_request()).unwrap();
    assert_eq!(timeline.title, "Second World War");

    let poland = service
        .add_event(new_event(timeline.uuid, "Poland", Some(at(1939, 9, 1))))
        .unwrap();
    assert!(poland.auto_layouted);
    assert_eq!(y_offset(&poland), -60.0);

    service
        .add_event(new_event(timeline.uuid, "Pearl Harbor", Some(at(1941, 12, 7))))
        .unwrap();
    service
        .add_event(new_event(timeline.uuid, "D-Day", Some(at(1944, 6, 6))))
        .unwrap();

    let offsets = service
        .list_events(timeline.uuid)
        .unwrap()
        .iter()
        .map(y_offset)
        .collect::<Vec<_>>();
    assert_eq!(offsets, [-60.0, 60.0, -60.0]);

    assert_eq!(
        service.relayout(timeline.uuid).unwrap(),
        RelayoutSummary {
            placed: 3,
            pinned: 0,
            persisted: 0,
        }
    );
}

#[test]
fn moved_events_stay_pinned_until_reset() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let timeline = service.create_timeline(create_request()).unwrap();

    service
        .add_event(new_event(timeline.uuid, "Poland", Some(at(1939, 9, 1))))
        .unwrap();
    let pearl = service
        .add_event(new_event(timeline.uuid, "Pearl Harbor", Some(at(1941, 12, 7))))
        .unwrap();
    service
        .add_event(new_event(timeline.uuid, "D-Day", Some(at(1944, 6, 6))))
        .unwrap();

    let pinned = service.move_event(pearl.uuid, 10.0, 200.0).unwrap();
    assert!(pinned.is_manually_positioned());

    let events = service.list_events(timeline.uuid).unwrap();
    let stored_pin = events.iter().find(|event| event.uuid == pearl.uuid).unwrap();
    let offset = stored_pin.offset.unwrap();
    assert_eq!((offset.x, offset.y), (10.0, 200.0));
    assert_eq!(y_offset(&events[0]), -60.0);
    assert_eq!(y_offset(&events[2]), 60.0);

    assert_eq!(
        service.relayout(timeline.uuid).unwrap(),
        RelayoutSummary {
            placed: 2,
            pinned: 1,
            persisted: 0,
        }
    );

    let reset = service.reset_event_position(pearl.uuid).unwrap();
    assert!(reset.auto_layouted);
    assert_eq!(y_offset(&reset), 60.0);
    assert_eq!(
        service
            .list_events(timeline.uuid)
            .unwrap()
            .iter()
            .map(y_offset)
            .collect::<Vec<_>>(),
        [-60.0, 60.0, -60.0]
    );
}

#[test]
fn moving_an_event_repacks_its_neighbours_immediately() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let timeline = service.create_timeline(create_request()).unwrap();

    let dunkirk = service
        .add_event(new_event(timeline.uuid, "Dunkirk", Some(at(1940, 5, 26))))
        .unwrap();
    service
        .add_event(new_event(timeline.uuid, "Battle of Britain", Some(at(1940, 7, 10))))
        .unwrap();
    service
        .add_event(new_event(timeline.uuid, "Blitz", Some(at(1940, 9, 7))))
        .unwrap();

    service.move_event(dunkirk.uuid, 0.0, 200.0).unwrap();
    let offsets = service
        .list_events(timeline.uuid)
        .unwrap()
        .iter()
        .map(y_offset)
        .collect::<Vec<_>>();
    assert_eq!(offsets, [200.0, -60.0, 60.0]);

    assert_eq!(service.relayout(timeline.uuid).unwrap().persisted, 0);
}

#[test]
fn content_edits_keep_position_and_relayout_on_date_change() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let timeline = service.create_timeline(create_request()).unwrap();

    let event = service
        .add_event(new_event(timeline.uuid, "Stalingrad", Some(at(1942, 8, 23))))
        .unwrap();
    service.move_event(event.uuid, 3.0, 4.0).unwrap();

    let mut edited = event.clone();
    edited.title = "Battle of Stalingrad".to_string();
    edited.color = "#aa0000".to_string();
    edited.offset = None;
    let saved = service.update_event_content(&edited).unwrap();

    assert_eq!(saved.title, "Battle of Stalingrad");
    assert_eq!(saved.color, "#aa0000");
    assert!(saved.is_manually_positioned());
    let offset = saved.offset.unwrap();
    assert_eq!((offset.x, offset.y), (3.0, 4.0));

    let mut redated = saved.clone();
    redated.date = Some(at(1943, 2, 2));
    let saved = service.update_event_content(&redated).unwrap();
    assert_eq!(saved.date, Some(at(1943, 2, 2)));
    assert!(saved.is_manually_positioned());
}

#[test]
fn deleting_events_frees_their_lanes() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let timeline = service.create_timeline(create_request()).unwrap();

    let first = service
        .add_event(new_event(timeline.uuid, "Dunkirk", Some(at(1940, 5, 26))))
        .unwrap();
    service
        .add_event(new_event(timeline.uuid, "Battle of Britain", Some(at(1940, 7, 10))))
        .unwrap();
    service
        .add_event(new_event(timeline.uuid, "Blitz", Some(at(1940, 9, 7))))
        .unwrap();

    let before = service.list_events(timeline.uuid).unwrap();
    assert_eq!(before.iter().map(y_offset).collect::<Vec<_>>(), [-60.0, 60.0, -120.0]);

    service.delete_event(first.uuid).unwrap();
    let after = service.list_events(timeline.uuid).unwrap();
    assert_eq!(after.len(), 2);
    assert_eq!(after.iter().map(y_offset).collect::<Vec<_>>(), [-60.0, 60.0]);

    assert!(matches!(
        service.get_event(first.uuid),
        Err(TimelineServiceError::EventNotFound(id)) if id == first.uuid
    ));
}

#[test]
fn orientation_and_bounds_changes_relayout() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let timeline = service.create_timeline(create_request()).unwrap();

    let event = service
        .add_event(new_event(timeline.uuid, "Midway", Some(at(1942, 6, 4))))
        .unwrap();

    service
        .set_orientation(timeline.uuid, Orientation::Vertical)
        .unwrap();
    let vertical = service.get_event(event.uuid).unwrap();
    let offset = vertical.offset.unwrap();
    assert_eq!((offset.x, offset.y), (-60.0, 0.0));

    let updated = service
        .update_bounds(timeline.uuid, at(1941, 12, 7), at(1945, 8, 15))
        .unwrap();
    assert_eq!(updated.bounds.start(), at(1941, 12, 7));
    assert!(matches!(
        service.update_bounds(timeline.uuid, at(1945, 1, 1), at(1940, 1, 1)),
        Err(TimelineServiceError::Bounds(_))
    ));
}

#[test]
fn interval_settings_drive_generated_ticks() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let timeline = service.create_timeline(create_request()).unwrap();

    assert_eq!(service.interval_ticks(timeline.uuid).unwrap().len(), 5);

    service
        .update_interval_settings(
            timeline.uuid,
            IntervalSettings {
                kind: IntervalType::Yearly,
                even_count: 5,
            },
        )
        .unwrap();
    let ticks = service.interval_ticks(timeline.uuid).unwrap();
    assert_eq!(ticks.len(), 7);
    assert_eq!(ticks[0].label, "1939");

    assert!(matches!(
        service.update_interval_settings(
            timeline.uuid,
            IntervalSettings {
                kind: IntervalType::Even,
                even_count: 1,
            },
        ),
        Err(TimelineServiceError::Validation(
            ModelValidationError::EvenCountOutOfRange(1)
        ))
    ));

    let offered = service
        .available_intervals(timeline.uuid)
        .unwrap()
        .into_iter()
        .filter(|entry| entry.available)
        .map(|entry| entry.kind)
        .collect::<HashSet<_>>();
    assert_eq!(
        offered,
        HashSet::from([IntervalType::Even, IntervalType::Yearly, IntervalType::Decade])
    );
}

#[test]
fn service_reports_missing_records_and_bad_input() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let missing = Uuid::new_v4();
    assert!(matches!(
        service.get_timeline(missing),
        Err(TimelineServiceError::TimelineNotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.add_event(new_event(missing, "Orphan", None)),
        Err(TimelineServiceError::TimelineNotFound(_))
    ));
    assert!(matches!(
        service.delete_timeline(missing),
        Err(TimelineServiceError::TimelineNotFound(_))
    ));

    let reversed = CreateTimelineRequest {
        start: at(1945, 9, 2),
        end: at(1939, 9, 1),
        ..create_request()
    };
    assert!(matches!(
        service.create_timeline(reversed),
        Err(TimelineServiceError::Bounds(_))
    ));

    let timeline = service.create_timeline(create_request()).unwrap();
    let mut bad_color = new_event(timeline.uuid, "Bad", None);
    bad_color.color = Some("nope".to_string());
    assert!(matches!(
        service.add_event(bad_color),
        Err(TimelineServiceError::Validation(ModelValidationError::InvalidColor(_)))
    ));

    let undated = service
        .add_event(new_event(timeline.uuid, "Undated", None))
        .unwrap();
    assert!(undated.auto_layouted);

    service.delete_timeline(timeline.uuid).unwrap();
    assert!(service.list_timelines().unwrap().is_empty());
}
