//! Pay periods - the 21st-to-20th date ranges used for grouping and reporting.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// A pay period: the 21st of one month through the 20th of the next.
///
/// Derived from record dates on demand and used purely as a grouping key;
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PayPeriod {
    /// First day of the period (always the 21st of some month)
    pub start: NaiveDate,

    /// Last day of the period, inclusive (always the 20th of the following month)
    pub end: NaiveDate,
}

impl PayPeriod {
    /// Get the period a date falls into.
    ///
    /// Days 1-20 belong to the period that started on the 21st of the
    /// previous month; days 21 and later open a new period. Total over all
    /// valid dates.
    pub fn containing(date: NaiveDate) -> Self {
        let mut start_year = date.year();
        let mut start_month = date.month();

        if date.day() <= 20 {
            if start_month == 1 {
                start_month = 12;
                start_year -= 1;
            } else {
                start_month -= 1;
            }
        }

        // Day 21 and day 20 exist in every month, so these cannot fail.
        let start = NaiveDate::from_ymd_opt(start_year, start_month, 21).unwrap();
        let (end_year, end_month) = if start_month == 12 {
            (start_year + 1, 1)
        } else {
            (start_year, start_month + 1)
        };
        let end = NaiveDate::from_ymd_opt(end_year, end_month, 20).unwrap();

        Self { start, end }
    }

    /// Check if a date falls within this period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Human-readable label embedding the start and end dates.
    pub fn label(&self) -> String {
        format!("Period: {} to {}", self.start, self.end)
    }
}

/// Partition records into pay-period buckets.
///
/// The partition is stable: each record keeps its relative order inside its
/// bucket, and buckets appear in first-seen order. Callers that want
/// reverse-chronological buckets pre-sort records by descending date.
pub fn group_by_period<T, F>(records: Vec<T>, date_of: F) -> Vec<(PayPeriod, Vec<T>)>
where
    F: Fn(&T) -> NaiveDate,
{
    let mut buckets: Vec<(PayPeriod, Vec<T>)> = Vec::new();

    for record in records {
        let period = PayPeriod::containing(date_of(&record));
        match buckets.iter_mut().find(|(p, _)| *p == period) {
            Some((_, items)) => items.push(record),
            None => buckets.push((period, vec![record])),
        }
    }

    buckets
}
