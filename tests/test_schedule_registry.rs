mod helpers;

use chrono::Weekday;
use helpers::*;
use work_calendar::domain::entities::{WeekdayFlags, WorkingHoursUpdate};
use work_calendar::CalendarError;

#[tokio::test]
async fn test_create_stores_schedule_with_setter() {
    let test_db = setup_test_db().await;
    let services = services_on(&test_db, date(2024, 1, 1));

    let created = create_office_hours(&services, "alice", date(2024, 1, 1), None).await;
    assert_eq!(created.set_by, "admin");

    let stored = services.schedules.get(&created.id).await.unwrap();
    assert_eq!(stored, created);
    assert!(services.schedules.weekday_enabled(&stored, Weekday::Sat));
    assert!(!services.schedules.weekday_enabled(&stored, Weekday::Fri));
    assert_eq!(services.schedules.weekly_hours(&stored), 40);

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_schedule_starting_inside_open_ended_one_overlaps() {
    let test_db = setup_test_db().await;
    let services = services_on(&test_db, date(2024, 1, 1));

    let existing = create_office_hours(&services, "alice", date(2024, 1, 1), None).await;

    let result = services
        .schedules
        .create(&admin(), office_hours("alice", date(2024, 3, 1), Some(date(2024, 4, 1))))
        .await;
    match result {
        Err(CalendarError::OverlappingSchedule { user_id, existing_id }) => {
            assert_eq!(user_id, "alice");
            assert_eq!(existing_id, existing.id);
        }
        other => panic!("expected OverlappingSchedule, got {:?}", other),
    }

    // Other owners are unaffected
    create_office_hours(&services, "bob", date(2024, 3, 1), None).await;

    let alice = services.schedules.list(Some("alice"), None).await.unwrap();
    assert_eq!(alice.len(), 1);

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_adjacent_ranges_do_not_overlap() {
    let test_db = setup_test_db().await;
    let services = services_on(&test_db, date(2024, 1, 1));

    create_office_hours(&services, "alice", date(2024, 1, 1), Some(date(2024, 2, 1))).await;
    create_office_hours(&services, "alice", date(2024, 2, 1), Some(date(2024, 3, 1))).await;
    // Open-ended schedule reaching into an existing one
    let too_early = services
        .schedules
        .create(&admin(), office_hours("alice", date(2024, 2, 15), None))
        .await;
    assert!(matches!(
        too_early,
        Err(CalendarError::OverlappingSchedule { .. })
    ));
    create_office_hours(&services, "alice", date(2024, 3, 1), None).await;

    let listed = services.schedules.list(Some("alice"), None).await.unwrap();
    let starts: Vec<_> = listed.iter().map(|s| s.effective_from).collect();
    assert_eq!(starts, vec![date(2024, 3, 1), date(2024, 2, 1), date(2024, 1, 1)]);

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_invalid_schedules_are_not_stored() {
    let test_db = setup_test_db().await;
    let services = services_on(&test_db, date(2024, 1, 1));

    let mut reversed = office_hours("alice", date(2024, 1, 1), None);
    reversed.end_time = time(8, 0);
    assert!(matches!(
        services.schedules.create(&admin(), reversed).await,
        Err(CalendarError::InvalidTimeRange(_))
    ));

    let mut bad_break = office_hours("alice", date(2024, 1, 1), None);
    bad_break.break_start = Some(time(13, 0));
    bad_break.break_end = Some(time(12, 0));
    assert!(matches!(
        services.schedules.create(&admin(), bad_break).await,
        Err(CalendarError::InvalidTimeRange(_))
    ));

    let empty_range = office_hours("alice", date(2024, 1, 1), Some(date(2024, 1, 1)));
    assert!(matches!(
        services.schedules.create(&admin(), empty_range).await,
        Err(CalendarError::InvalidRange { .. })
    ));

    assert!(services
        .schedules
        .list(Some("alice"), None)
        .await
        .unwrap()
        .is_empty());

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_update_excludes_itself_from_overlap() {
    let test_db = setup_test_db().await;
    let services = services_on(&test_db, date(2024, 1, 1));

    let first = create_office_hours(&services, "alice", date(2024, 1, 1), Some(date(2024, 6, 1))).await;
    let second = create_office_hours(&services, "alice", date(2024, 6, 1), None).await;

    let updated = services
        .schedules
        .update(
            &first.id,
            WorkingHoursUpdate {
                start_time: Some(time(8, 0)),
                weekdays: Some(WeekdayFlags::all()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.start_time, time(8, 0));
    // effective_to survives a partial update
    assert_eq!(updated.effective_to, Some(date(2024, 6, 1)));

    let clash = services
        .schedules
        .update(
            &first.id,
            WorkingHoursUpdate {
                effective_to: Some(None),
                ..Default::default()
            },
        )
        .await;
    match clash {
        Err(CalendarError::OverlappingSchedule { existing_id, .. }) => {
            assert_eq!(existing_id, second.id)
        }
        other => panic!("expected OverlappingSchedule, got {:?}", other),
    }

    let stored = services.schedules.get(&first.id).await.unwrap();
    assert_eq!(stored.effective_to, Some(date(2024, 6, 1)));
    assert_eq!(stored.start_time, time(8, 0));
    assert_eq!(stored.weekdays, WeekdayFlags::all());

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_active_for_picks_the_containing_schedule() {
    let test_db = setup_test_db().await;
    let services = services_on(&test_db, date(2024, 1, 1));

    let january = create_office_hours(&services, "alice", date(2024, 1, 1), Some(date(2024, 2, 1))).await;
    let rest = create_office_hours(&services, "alice", date(2024, 2, 1), None).await;

    let schedules = &services.schedules;
    let found = schedules.active_for("alice", date(2024, 1, 31)).await.unwrap();
    assert_eq!(found.map(|s| s.id), Some(january.id));
    let found = schedules.active_for("alice", date(2024, 2, 1)).await.unwrap();
    assert_eq!(found.map(|s| s.id), Some(rest.id));
    let found = schedules.active_for("alice", date(2023, 12, 31)).await.unwrap();
    assert!(found.is_none());

    let active = services
        .schedules
        .list(None, Some(date(2024, 1, 15)))
        .await
        .unwrap();
    assert_eq!(active.len(), 1);

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_missing_schedule_is_not_found() {
    let test_db = setup_test_db().await;
    let services = services_on(&test_db, date(2024, 1, 1));

    assert!(matches!(
        services.schedules.get("missing").await,
        Err(CalendarError::NotFound { .. })
    ));
    assert!(matches!(
        services
            .schedules
            .update("missing", WorkingHoursUpdate::default())
            .await,
        Err(CalendarError::NotFound { .. })
    ));

    let created = create_office_hours(&services, "alice", date(2024, 1, 1), None).await;
    services.schedules.delete(&created.id).await.unwrap();
    assert!(matches!(
        services.schedules.delete(&created.id).await,
        Err(CalendarError::NotFound { .. })
    ));

    teardown_test_db(test_db).await;
}
