use chrono::NaiveDate;
use serde::Serialize;

/// Inclusive `[start_date, end_date]` range of history used to build the
/// throughput model. Always satisfies `start_date <= end_date`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoricalWindow {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl HistoricalWindow {
    /// Returns `None` when `start_date` is after `end_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Option<Self> {
        if start_date > end_date {
            return None;
        }
        Some(Self {
            start_date,
            end_date,
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Every calendar day in the window, both ends included.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end_date = self.end_date;
        self.start_date
            .iter_days()
            .take_while(move |date| *date <= end_date)
    }

    pub fn number_of_days(&self) -> usize {
        (self.end_date - self.start_date).num_days() as usize + 1
    }

    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d")
        )
    }
}
