use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::sync::Arc;
use work_calendar::bootstrap::{build_services_with_clock, CalendarServices};
use work_calendar::domain::ports::Clock;
use work_calendar::infrastructure::persistence::Database;

pub struct TestDatabase {
    db: Database,
    path: String,
}

impl TestDatabase {
    pub fn db(&self) -> Database {
        self.db.clone()
    }
}

pub async fn setup_test_db() -> TestDatabase {
    // Use file-based SQLite for tests (unique UUID per test for parallel execution)
    let path = format!("test_{}.db", uuid::Uuid::new_v4());
    let db_url = format!("sqlite://{}?mode=rwc", path);

    let db = Database::connect(&db_url)
        .await
        .expect("Failed to connect to test database");
    db.run_migrations()
        .await
        .expect("Failed to run migrations");

    TestDatabase { db, path }
}

pub async fn teardown_test_db(test_db: TestDatabase) {
    test_db.db.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", test_db.path, suffix));
    }
}

/// Clock pinned to midnight UTC of a given date
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn on(date: NaiveDate) -> Self {
        let now = Utc
            .from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("midnight exists"));
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

/// Services over the test database with "today" fixed at `today`
pub fn services_on(test_db: &TestDatabase, today: NaiveDate) -> CalendarServices {
    build_services_with_clock(&test_db.db, Arc::new(FixedClock::on(today)))
}
