use serde::{Deserialize, Serialize};
use time::{Date, Duration, format_description::BorrowedFormatItem, macros::format_description};

/// Calendar day format used for storage and the CLI (`2025-03-14`).
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn format_date(date: Date) -> crate::Result<String> {
    Ok(date.format(DATE_FORMAT)?)
}

pub fn parse_date(value: &str) -> crate::Result<Date> {
    Ok(Date::parse(value.trim(), DATE_FORMAT)?)
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> crate::Result<Self> {
        if end < start {
            crate::bail!("End date {end} is before start date {start}");
        }

        Ok(Self { start, end })
    }

    /// Monday to Sunday of the week containing `date`.
    pub fn week_of(date: Date) -> Self {
        let start = date - Duration::days(date.weekday().number_days_from_monday().into());
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn single(date: Date) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = Date> + use<> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |day| {
            day.next_day().filter(|next| *next <= end)
        })
    }
}
