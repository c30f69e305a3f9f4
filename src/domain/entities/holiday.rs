use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarType {
    /// Fixed date on the solar calendar
    National,
    /// Variable date anchored on the lunar calendar
    Religious,
    /// Regional weekly rest day
    Weekly,
    /// Entered manually
    Custom,
}

impl fmt::Display for CalendarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarType::National => write!(f, "national"),
            CalendarType::Religious => write!(f, "religious"),
            CalendarType::Weekly => write!(f, "weekly"),
            CalendarType::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for CalendarType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "national" => Ok(CalendarType::National),
            "religious" => Ok(CalendarType::Religious),
            "weekly" => Ok(CalendarType::Weekly),
            "custom" => Ok(CalendarType::Custom),
            other => Err(format!("unknown calendar type '{}'", other)),
        }
    }
}

/// Coordinates of a date on the solar calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// Coordinates of a date on the lunar calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    pub calendar_type: CalendarType,
    pub is_recurring: bool,
    pub solar_year: Option<i32>,
    pub solar_month: Option<u32>,
    pub solar_day: Option<u32>,
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: String,
}

impl Holiday {
    pub fn new(holiday: NewHoliday, created_by: &str) -> Self {
        let (solar_year, solar_month, solar_day) = match holiday.solar {
            Some(s) => (Some(s.year), Some(s.month), Some(s.day)),
            None => (None, None, None),
        };
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: holiday.name,
            date: holiday.date,
            calendar_type: holiday.calendar_type,
            is_recurring: holiday.is_recurring,
            solar_year,
            solar_month,
            solar_day,
            description: holiday.description,
            created_by: created_by.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn solar(&self) -> Option<SolarDate> {
        match (self.solar_year, self.solar_month, self.solar_day) {
            (Some(year), Some(month), Some(day)) => Some(SolarDate { year, month, day }),
            _ => None,
        }
    }
}

/// Holiday as produced by generation or entered by an operator, before storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHoliday {
    pub name: String,
    pub date: NaiveDate,
    pub calendar_type: CalendarType,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub solar: Option<SolarDate>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewHoliday {
    pub fn custom(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
            calendar_type: CalendarType::Custom,
            is_recurring: false,
            solar: None,
            description: None,
        }
    }

    /// Natural key used for deduplication
    pub fn key(&self) -> (NaiveDate, &str) {
        (self.date, self.name.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolidayFilter {
    pub year: Option<i32>,
    pub calendar_type: Option<CalendarType>,
}

impl HolidayFilter {
    pub fn year(year: i32) -> Self {
        Self {
            year: Some(year),
            calendar_type: None,
        }
    }

    /// Inclusive civil date bounds implied by the year filter
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let year = self.year?;
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
        Some((start, end))
    }

    pub fn matches(&self, holiday: &Holiday) -> bool {
        self.year.map_or(true, |y| holiday.date.year() == y)
            && self
                .calendar_type
                .map_or(true, |t| holiday.calendar_type == t)
    }
}
