use chrono_tz::Tz;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub timezone: Tz,
    pub max_range_days: i64,
    pub include_weekly_holidays: bool,
    pub system_actor_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://work_calendar.db?mode=rwc".to_string());

        let timezone_name =
            env::var("CALENDAR_TIMEZONE").unwrap_or_else(|_| "Asia/Tehran".to_string());
        let timezone = timezone_name
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(timezone_name))?;

        let max_range_days = env::var("MAX_RANGE_DAYS")
            .unwrap_or_else(|_| "366".to_string())
            .parse::<i64>()
            .ok()
            .filter(|days| *days > 0)
            .ok_or(ConfigError::InvalidMaxRangeDays)?;

        let include_weekly_holidays = match env::var("INCLUDE_WEEKLY_HOLIDAYS") {
            Ok(value) => parse_flag(&value)
                .ok_or(ConfigError::InvalidFlag("INCLUDE_WEEKLY_HOLIDAYS"))?,
            Err(_) => true,
        };

        let system_actor_id =
            env::var("SYSTEM_ACTOR_ID").unwrap_or_else(|_| "system".to_string());

        Ok(Config {
            database_url,
            timezone,
            max_range_days,
            include_weekly_holidays,
            system_actor_id,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown timezone in CALENDAR_TIMEZONE: {0}")]
    InvalidTimezone(String),

    #[error("MAX_RANGE_DAYS must be a positive integer")]
    InvalidMaxRangeDays,

    #[error("{0} must be true or false")]
    InvalidFlag(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
