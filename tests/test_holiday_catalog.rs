mod helpers;

use helpers::*;
use work_calendar::domain::entities::{CalendarType, HolidayFilter, NewHoliday};
use work_calendar::CalendarError;

#[tokio::test]
async fn test_generate_for_year_is_sorted_and_unique() {
    let test_db = setup_test_db().await;
    let services = services_on(&test_db, date(2024, 1, 1));

    let holidays = services.holidays.generate_for_year(2024).unwrap();
    assert!(holidays.windows(2).all(|w| w[0].date <= w[1].date));

    let mut keys: Vec<_> = holidays.iter().map(|h| (h.date, h.name.clone())).collect();
    let total = keys.len();
    keys.dedup();
    assert_eq!(keys.len(), total);

    let weekly = holidays
        .iter()
        .filter(|h| h.calendar_type == CalendarType::Weekly)
        .count();
    assert_eq!(weekly, 104);

    let without_weekly = services.holidays.generate_for_year_with(2024, false).unwrap();
    assert_eq!(without_weekly.len(), total - weekly);

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_generate_rejects_unsupported_year() {
    let test_db = setup_test_db().await;
    let services = services_on(&test_db, date(2024, 1, 1));

    let result = services.holidays.generate_for_year(1800);
    assert!(matches!(result, Err(CalendarError::InvalidRange { .. })));

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_second_seed_creates_nothing() {
    let test_db = setup_test_db().await;
    let services = services_on(&test_db, date(2024, 1, 1));

    let first = services.holidays.seed_year(&admin(), 2024, true).await.unwrap();
    assert!(first > 104);

    let second = services.holidays.seed_year(&admin(), 2024, true).await.unwrap();
    assert_eq!(second, 0);

    let stored = services
        .holidays
        .list(&HolidayFilter::year(2024))
        .await
        .unwrap();
    assert_eq!(stored.len(), first);

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_national_holidays_land_on_published_dates() {
    let test_db = setup_test_db().await;
    let services = services_on(&test_db, date(2024, 1, 1));

    services.holidays.seed_year(&admin(), 2024, false).await.unwrap();

    let national = services
        .holidays
        .list(&HolidayFilter {
            year: Some(2024),
            calendar_type: Some(CalendarType::National),
        })
        .await
        .unwrap();
    assert_eq!(national.len(), 10);

    let nowruz = national.iter().find(|h| h.name == "Nowruz").unwrap();
    assert_eq!(nowruz.date, date(2024, 3, 20));
    assert!(nowruz.is_recurring);
    assert_eq!(nowruz.solar_year, Some(1403));

    let revolution = national
        .iter()
        .find(|h| h.name == "Islamic Revolution Victory Day")
        .unwrap();
    assert_eq!(revolution.date, date(2024, 2, 11));
    assert_eq!(revolution.solar_year, Some(1402));

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_create_rejects_duplicate_name_and_date() {
    let test_db = setup_test_db().await;
    let services = services_on(&test_db, date(2024, 1, 1));

    let day = date(2024, 5, 1);
    let created = services
        .holidays
        .create(&admin(), NewHoliday::custom("Company Day", day))
        .await
        .unwrap();
    assert_eq!(created.created_by, "admin");
    assert_eq!(created.calendar_type, CalendarType::Custom);

    let dup = services
        .holidays
        .create(&admin(), NewHoliday::custom("Company Day", day))
        .await;
    match dup {
        Err(CalendarError::DuplicateHoliday { name, date: d }) => {
            assert_eq!(name, "Company Day");
            assert_eq!(d, day);
        }
        other => panic!("expected DuplicateHoliday, got {:?}", other),
    }

    // Same name on another date is a different holiday
    services
        .holidays
        .create(&admin(), NewHoliday::custom("Company Day", date(2025, 5, 1)))
        .await
        .unwrap();

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_bulk_create_skips_batch_duplicates() {
    let test_db = setup_test_db().await;
    let services = services_on(&test_db, date(2024, 1, 1));

    let batch = vec![
        NewHoliday::custom("Offsite", date(2024, 6, 1)),
        NewHoliday::custom("Offsite", date(2024, 6, 1)),
        NewHoliday::custom("Offsite", date(2024, 6, 2)),
    ];
    let created = services.holidays.bulk_create(&admin(), batch).await.unwrap();
    assert_eq!(created, 2);

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_lookup_and_delete() {
    let test_db = setup_test_db().await;
    let services = services_on(&test_db, date(2024, 1, 1));

    let first = services
        .holidays
        .create(&admin(), NewHoliday::custom("Spring Break", date(2024, 4, 2)))
        .await
        .unwrap();
    services
        .holidays
        .create(&admin(), NewHoliday::custom("Founders Day", date(2024, 9, 9)))
        .await
        .unwrap();

    assert!(services.holidays.is_holiday(date(2024, 4, 2)).await.unwrap());
    assert!(!services.holidays.is_holiday(date(2024, 4, 3)).await.unwrap());
    assert_eq!(services.holidays.holidays_on(date(2024, 4, 2)).await.unwrap().len(), 1);

    let next = services.holidays.next_holiday(date(2024, 4, 2)).await.unwrap();
    assert_eq!(next.map(|h| h.name), Some("Founders Day".to_string()));
    assert!(services
        .holidays
        .next_holiday(date(2024, 9, 9))
        .await
        .unwrap()
        .is_none());

    assert_eq!(services.holidays.get(&first.id).await.unwrap().name, "Spring Break");
    services.holidays.delete(&first.id).await.unwrap();
    assert!(matches!(
        services.holidays.delete(&first.id).await,
        Err(CalendarError::NotFound { .. })
    ));
    assert!(matches!(
        services.holidays.get(&first.id).await,
        Err(CalendarError::NotFound { .. })
    ));

    teardown_test_db(test_db).await;
}
