//! Conversions between the civil (Gregorian) calendar and the two calendars
//! used to anchor holidays: the Persian solar calendar for fixed national
//! holidays and the Hijri lunar calendar (Umm al-Qura reckoning) for
//! religious ones.
//!
//! All functions are pure. Arithmetic is delegated to `icu_calendar`.

use chrono::{Datelike, NaiveDate, Weekday};
use icu_calendar::islamic::IslamicUmmAlQura;
use icu_calendar::persian::Persian;
use icu_calendar::{Date, Iso};

use crate::domain::entities::{CalendarType, LunarDate, NewHoliday, SolarDate};
use crate::domain::errors::{CalendarError, CalendarResult};

pub const MIN_SUPPORTED_YEAR: i32 = 1900;
pub const MAX_SUPPORTED_YEAR: i32 = 2100;

/// Offset between civil and solar year numbers after Nowruz
const SOLAR_YEAR_OFFSET: i32 = 621;

pub const SOLAR_MONTH_NAMES: [&str; 12] = [
    "Farvardin",
    "Ordibehesht",
    "Khordad",
    "Tir",
    "Mordad",
    "Shahrivar",
    "Mehr",
    "Aban",
    "Azar",
    "Dey",
    "Bahman",
    "Esfand",
];

/// Fixed-date national holidays keyed by (solar month, solar day)
pub const NATIONAL_HOLIDAYS: [((u32, u32), &str); 10] = [
    ((1, 1), "Nowruz"),
    ((1, 2), "Nowruz (day 2)"),
    ((1, 3), "Nowruz (day 3)"),
    ((1, 4), "Nowruz (day 4)"),
    ((1, 12), "Islamic Republic Day"),
    ((1, 13), "Nature Day"),
    ((3, 14), "Demise of Imam Khomeini"),
    ((3, 15), "Khordad 15 Uprising"),
    ((11, 22), "Islamic Revolution Victory Day"),
    ((12, 29), "Oil Industry Nationalization Day"),
];

/// Variable-date religious holidays keyed by (lunar month, lunar day)
pub const RELIGIOUS_HOLIDAYS: [((u32, u32), &str); 16] = [
    ((1, 9), "Tasua"),
    ((1, 10), "Ashura"),
    ((2, 20), "Arbaeen"),
    ((2, 28), "Demise of the Prophet"),
    ((3, 8), "Martyrdom of Imam Hasan Askari"),
    ((3, 17), "Birth of the Prophet"),
    ((6, 3), "Martyrdom of Fatimah"),
    ((7, 13), "Birth of Imam Ali"),
    ((7, 27), "Mab'ath"),
    ((8, 15), "Birth of Imam Mahdi"),
    ((9, 21), "Martyrdom of Imam Ali"),
    ((10, 1), "Eid al-Fitr"),
    ((10, 2), "Eid al-Fitr (day 2)"),
    ((10, 25), "Martyrdom of Imam Sadiq"),
    ((12, 10), "Eid al-Adha"),
    ((12, 18), "Eid al-Ghadir"),
];

/// Regional weekly rest days
pub const WEEKLY_HOLIDAYS: [(Weekday, &str); 2] = [
    (Weekday::Thu, "Weekly holiday (Thursday)"),
    (Weekday::Fri, "Weekly holiday (Friday)"),
];

pub fn ensure_supported_year(year: i32) -> CalendarResult<()> {
    if (MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(CalendarError::invalid_range(
            format!("year {}", year),
            format!("supported years {}..={}", MIN_SUPPORTED_YEAR, MAX_SUPPORTED_YEAR),
        ))
    }
}

fn to_iso(date: NaiveDate) -> CalendarResult<Date<Iso>> {
    ensure_supported_year(date.year())?;
    Date::try_new_iso_date(date.year(), date.month() as u8, date.day() as u8)
        .map_err(|e| CalendarError::invalid_input("date", e.to_string()))
}

fn from_iso(iso: Date<Iso>) -> CalendarResult<NaiveDate> {
    NaiveDate::from_ymd_opt(
        iso.year().number,
        iso.month().ordinal,
        iso.day_of_month().0,
    )
    .ok_or_else(|| CalendarError::invalid_input("date", "not representable as a civil date"))
}

pub fn civil_to_solar(date: NaiveDate) -> CalendarResult<SolarDate> {
    let persian = to_iso(date)?.to_calendar(Persian::new());
    Ok(SolarDate {
        year: persian.year().number,
        month: persian.month().ordinal,
        day: persian.day_of_month().0,
    })
}

/// Fails with `InvalidRange` for implausible years and `InvalidInput` for
/// coordinates that do not exist in the given solar year.
pub fn solar_to_civil(year: i32, month: u32, day: u32) -> CalendarResult<NaiveDate> {
    let min = MIN_SUPPORTED_YEAR - SOLAR_YEAR_OFFSET - 1;
    let max = MAX_SUPPORTED_YEAR - SOLAR_YEAR_OFFSET;
    if !(min..=max).contains(&year) {
        return Err(CalendarError::invalid_range(
            format!("solar year {}", year),
            format!("supported solar years {}..={}", min, max),
        ));
    }
    let month =
        u8::try_from(month).map_err(|_| CalendarError::invalid_input("solar_month", "out of range"))?;
    let day =
        u8::try_from(day).map_err(|_| CalendarError::invalid_input("solar_day", "out of range"))?;
    let persian = Date::try_new_persian_date(year, month, day).map_err(|e| {
        CalendarError::invalid_input("solar_date", format!("{}/{}/{}: {}", year, month, day, e))
    })?;
    from_iso(persian.to_iso())
}

pub fn civil_to_lunar(date: NaiveDate) -> CalendarResult<LunarDate> {
    let hijri = to_iso(date)?.to_calendar(IslamicUmmAlQura::new());
    Ok(LunarDate {
        year: hijri.year().number,
        month: hijri.month().ordinal,
        day: hijri.day_of_month().0,
    })
}

pub fn solar_month_name(month: u32) -> Option<&'static str> {
    SOLAR_MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

pub fn weekly_holiday_name(date: NaiveDate) -> Option<&'static str> {
    WEEKLY_HOLIDAYS
        .iter()
        .find(|(weekday, _)| *weekday == date.weekday())
        .map(|(_, name)| *name)
}

pub fn is_weekly_holiday(date: NaiveDate) -> bool {
    weekly_holiday_name(date).is_some()
}

/// Every civil day of `year`, in order
pub fn days_of_year(year: i32) -> CalendarResult<impl Iterator<Item = NaiveDate>> {
    ensure_supported_year(year)?;
    let first = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| CalendarError::invalid_input("year", year.to_string()))?;
    Ok(first.iter_days().take_while(move |d| d.year() == year))
}

/// Solar-table holidays falling inside civil `year`. Two solar years
/// straddle every civil year, so both are converted and filtered.
pub fn national_holidays(year: i32) -> CalendarResult<Vec<NewHoliday>> {
    ensure_supported_year(year)?;
    let mut holidays = Vec::new();

    for solar_year in [year - SOLAR_YEAR_OFFSET - 1, year - SOLAR_YEAR_OFFSET] {
        for ((month, day), name) in NATIONAL_HOLIDAYS {
            let date = match solar_to_civil(solar_year, month, day) {
                Ok(date) => date,
                Err(e) => {
                    tracing::debug!(
                        "Skipping national holiday '{}' for solar year {}: {}",
                        name,
                        solar_year,
                        e
                    );
                    continue;
                }
            };
            if date.year() != year {
                continue;
            }
            holidays.push(NewHoliday {
                name: name.to_string(),
                date,
                calendar_type: CalendarType::National,
                is_recurring: true,
                solar: Some(SolarDate {
                    year: solar_year,
                    month,
                    day,
                }),
                description: None,
            });
        }
    }

    holidays.sort_by_key(|h| h.date);
    Ok(holidays)
}

/// Lunar-table holidays inside civil `year`, found by converting each day.
pub fn religious_holidays(year: i32) -> CalendarResult<Vec<NewHoliday>> {
    let mut holidays = Vec::new();

    for date in days_of_year(year)? {
        let lunar = civil_to_lunar(date)?;
        for ((month, day), name) in RELIGIOUS_HOLIDAYS {
            if month == lunar.month && day == lunar.day {
                holidays.push(NewHoliday {
                    name: name.to_string(),
                    date,
                    calendar_type: CalendarType::Religious,
                    is_recurring: false,
                    solar: None,
                    description: Some(format!(
                        "{}/{}/{} AH",
                        lunar.year, lunar.month, lunar.day
                    )),
                });
            }
        }
    }

    Ok(holidays)
}

pub fn weekly_holidays(year: i32) -> CalendarResult<Vec<NewHoliday>> {
    Ok(days_of_year(year)?
        .filter_map(|date| {
            weekly_holiday_name(date).map(|name| NewHoliday {
                name: name.to_string(),
                date,
                calendar_type: CalendarType::Weekly,
                is_recurring: true,
                solar: None,
                description: None,
            })
        })
        .collect())
}
