use crate::domain::ports::Clock;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Wall clock; "today" is the civil date in the calendar's timezone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.timezone).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_today_follows_the_configured_zone() {
        let tehran = SystemClock::new(chrono_tz::Asia::Tehran);
        let offset_days = (tehran.today() - Utc::now().date_naive()).num_days();
        assert!((-1..=1).contains(&offset_days));
    }
}
