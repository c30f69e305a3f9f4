use crate::domain::entities::{Actor, Holiday, HolidayFilter, NewHoliday};
use crate::domain::errors::{CalendarError, CalendarResult};
use crate::domain::ports::HolidayRepository;
use crate::domain::services::calendar_converter;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;

/// Generates and stores the holiday catalog
#[derive(Clone)]
pub struct HolidayCatalog {
    holiday_repo: Arc<dyn HolidayRepository>,
}

impl HolidayCatalog {
    pub fn new(holiday_repo: Arc<dyn HolidayRepository>) -> Self {
        Self { holiday_repo }
    }

    /// National, religious and weekly holidays of a civil year, date-ordered
    pub fn generate_for_year(&self, year: i32) -> CalendarResult<Vec<NewHoliday>> {
        self.generate_for_year_with(year, true)
    }

    pub fn generate_for_year_with(
        &self,
        year: i32,
        include_weekly: bool,
    ) -> CalendarResult<Vec<NewHoliday>> {
        let mut all = calendar_converter::national_holidays(year)?;
        all.extend(calendar_converter::religious_holidays(year)?);
        if include_weekly {
            all.extend(calendar_converter::weekly_holidays(year)?);
        }

        let mut seen = HashSet::new();
        all.retain(|h| seen.insert((h.date, h.name.clone())));
        all.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));

        tracing::debug!("Generated {} holidays for {}", all.len(), year);
        Ok(all)
    }

    pub async fn create(&self, actor: &Actor, holiday: NewHoliday) -> CalendarResult<Holiday> {
        if holiday.name.trim().is_empty() {
            return Err(CalendarError::invalid_input("name", "must not be empty"));
        }
        if self
            .holiday_repo
            .find_holiday(holiday.date, &holiday.name)
            .await?
            .is_some()
        {
            tracing::warn!(
                "Rejected duplicate holiday '{}' on {}",
                holiday.name,
                holiday.date
            );
            return Err(CalendarError::DuplicateHoliday {
                name: holiday.name,
                date: holiday.date,
            });
        }

        let holiday = Holiday::new(holiday, &actor.user_id);
        self.holiday_repo.create_holiday(&holiday).await?;
        Ok(holiday)
    }

    /// Store each holiday not already present. Not atomic: a failure part way
    /// leaves earlier rows in place. Returns the number of rows written.
    pub async fn bulk_create(
        &self,
        actor: &Actor,
        holidays: Vec<NewHoliday>,
    ) -> CalendarResult<usize> {
        let mut seen = HashSet::new();
        let mut created = 0;

        for new in holidays {
            if !seen.insert((new.date, new.name.clone())) {
                continue;
            }
            let holiday = Holiday::new(new, &actor.user_id);
            if self.holiday_repo.insert_holiday_if_absent(&holiday).await? {
                created += 1;
            } else {
                tracing::debug!(
                    "Skipping existing holiday '{}' on {}",
                    holiday.name,
                    holiday.date
                );
            }
        }

        tracing::info!("Bulk holiday import by {}: {} created", actor.user_id, created);
        Ok(created)
    }

    /// Generate a year and store it
    pub async fn seed_year(
        &self,
        actor: &Actor,
        year: i32,
        include_weekly: bool,
    ) -> CalendarResult<usize> {
        let holidays = self.generate_for_year_with(year, include_weekly)?;
        self.bulk_create(actor, holidays).await
    }

    pub async fn list(&self, filter: &HolidayFilter) -> CalendarResult<Vec<Holiday>> {
        self.holiday_repo.list_holidays(filter).await
    }

    pub async fn get(&self, id: &str) -> CalendarResult<Holiday> {
        self.holiday_repo
            .get_holiday(id)
            .await?
            .ok_or_else(|| CalendarError::not_found("Holiday", id))
    }

    pub async fn delete(&self, id: &str) -> CalendarResult<()> {
        if !self.holiday_repo.delete_holiday(id).await? {
            return Err(CalendarError::not_found("Holiday", id));
        }
        tracing::info!("Holiday deleted: id={}", id);
        Ok(())
    }

    pub async fn holidays_on(&self, date: NaiveDate) -> CalendarResult<Vec<Holiday>> {
        self.holiday_repo.list_holidays_between(date, date).await
    }

    pub async fn is_holiday(&self, date: NaiveDate) -> CalendarResult<bool> {
        Ok(!self.holidays_on(date).await?.is_empty())
    }

    /// First stored holiday strictly after `date`
    pub async fn next_holiday(&self, after: NaiveDate) -> CalendarResult<Option<Holiday>> {
        self.holiday_repo.next_holiday_after(after).await
    }
}
