use chrono::{Datelike, Days, NaiveDate};
use tracing::debug;

use crate::domain::duration_policy::DurationPolicy;
use crate::domain::window::HistoricalWindow;
use crate::domain::work_item::CleanedRecord;
use crate::services::forecast_error::ForecastError;

/// Computes the historical window for a named duration policy.
///
/// Day-count policies are anchored on the latest end date in the data so a
/// frozen snapshot always yields the same window; `YTD` and
/// `Last Calendar Year` are anchored on `as_of`. Every start date is clamped to
/// the earliest end date present.
pub fn select_window(
    duration_policy: &str,
    as_of: NaiveDate,
    records: &[CleanedRecord],
) -> Result<HistoricalWindow, ForecastError> {
    let policy = DurationPolicy::from_name(duration_policy)
        .ok_or_else(|| ForecastError::UnsupportedDurationPolicy(duration_policy.to_string()))?;
    window_for_policy(policy, as_of, records)
}

pub fn window_for_policy(
    policy: DurationPolicy,
    as_of: NaiveDate,
    records: &[CleanedRecord],
) -> Result<HistoricalWindow, ForecastError> {
    let (earliest, latest) = end_date_bounds(records).ok_or(ForecastError::NoUsableRecords)?;
    let out_of_range = || ForecastError::WindowOutOfRange {
        policy: policy.to_string(),
        as_of,
    };

    let (start_date, end_date) = match policy {
        DurationPolicy::All => (earliest, latest),
        DurationPolicy::LastDays(days) => {
            let start = latest
                .checked_sub_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDate::MIN);
            (start, latest)
        }
        DurationPolicy::LastCalendarYear => {
            let last_year = as_of.year() - 1;
            let start = NaiveDate::from_ymd_opt(last_year, 1, 1).ok_or_else(out_of_range)?;
            let end = NaiveDate::from_ymd_opt(last_year, 12, 31).ok_or_else(out_of_range)?;
            (start, end)
        }
        DurationPolicy::YearToDate => {
            let start = NaiveDate::from_ymd_opt(as_of.year(), 1, 1).ok_or_else(out_of_range)?;
            (start, as_of)
        }
    };

    let clamped_start = start_date.max(earliest);
    if clamped_start != start_date {
        debug!(
            requested = %start_date,
            clamped = %clamped_start,
            "historical window starts before any data, clamping"
        );
    }

    let window = HistoricalWindow::new(clamped_start, end_date).ok_or(
        ForecastError::EmptyHistoricalWindow {
            start_date: clamped_start,
            end_date,
        },
    )?;
    debug!(%policy, window = %window.label(), "selected historical window");
    Ok(window)
}

/// Earliest and latest end dates among finished records.
pub fn end_date_bounds(records: &[CleanedRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let mut end_dates = records.iter().filter_map(|record| record.end_date);
    let first = end_dates.next()?;
    Some(end_dates.fold((first, first), |(earliest, latest), date| {
        (earliest.min(date), latest.max(date))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::duration_policy::SUPPORTED_DAY_COUNTS;
    use crate::test_support::{finished, on_date};
    use proptest::prelude::*;

    fn records() -> Vec<CleanedRecord> {
        vec![
            finished("A2", on_date(2021, 10, 2), on_date(2021, 11, 1)),
            finished("A1", on_date(2021, 11, 10), on_date(2021, 12, 1)),
            finished("C3", on_date(2021, 5, 1), on_date(2022, 1, 5)),
            finished("Z6", on_date(2021, 12, 2), on_date(2022, 2, 10)),
            CleanedRecord {
                id: "Z7".to_string(),
                start_date: on_date(2022, 1, 3),
                end_date: None,
            },
        ]
    }

    fn window(start: NaiveDate, end: NaiveDate) -> HistoricalWindow {
        HistoricalWindow::new(start, end).unwrap()
    }

    #[test]
    fn all_spans_earliest_to_latest_end_date() {
        let result = select_window("All", on_date(2022, 3, 1), &records()).unwrap();
        assert_eq!(result, window(on_date(2021, 11, 1), on_date(2022, 2, 10)));
    }

    #[test]
    fn last_days_counts_back_from_latest_end_date() {
        let result = select_window("Last Month", on_date(2030, 1, 1), &records()).unwrap();
        assert_eq!(result, window(on_date(2022, 1, 11), on_date(2022, 2, 10)));
    }

    #[test]
    fn last_days_is_clamped_to_earliest_end_date() {
        let result = select_window("Last 365 Days", on_date(2022, 3, 1), &records()).unwrap();
        assert_eq!(result, window(on_date(2021, 11, 1), on_date(2022, 2, 10)));
    }

    #[test]
    fn last_calendar_year_uses_the_year_before_as_of() {
        let result =
            select_window("Last Calendar Year", on_date(2022, 6, 15), &records()).unwrap();
        assert_eq!(result, window(on_date(2021, 11, 1), on_date(2021, 12, 31)));
    }

    #[test]
    fn ytd_runs_from_january_first_to_as_of() {
        let result = select_window("YTD", on_date(2022, 2, 1), &records()).unwrap();
        assert_eq!(result, window(on_date(2022, 1, 1), on_date(2022, 2, 1)));
    }

    #[test]
    fn calendar_policies_before_any_data_fail_with_empty_window() {
        let error = select_window("YTD", on_date(2021, 6, 1), &records()).unwrap_err();
        assert_eq!(
            error,
            ForecastError::EmptyHistoricalWindow {
                start_date: on_date(2021, 11, 1),
                end_date: on_date(2021, 6, 1),
            }
        );
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let error = select_window("Last Fortnight", on_date(2022, 2, 1), &records()).unwrap_err();
        assert_eq!(
            error,
            ForecastError::UnsupportedDurationPolicy("Last Fortnight".to_string())
        );
    }

    #[test]
    fn calendar_year_beyond_the_date_range_is_reported() {
        let error =
            select_window("Last Calendar Year", NaiveDate::MIN, &records()).unwrap_err();
        assert_eq!(
            error,
            ForecastError::WindowOutOfRange {
                policy: "Last Calendar Year".to_string(),
                as_of: NaiveDate::MIN,
            }
        );
    }

    #[test]
    fn records_without_end_dates_have_no_window() {
        let records = vec![CleanedRecord {
            id: "Z7".to_string(),
            start_date: on_date(2022, 1, 3),
            end_date: None,
        }];
        assert_eq!(
            select_window("All", on_date(2022, 2, 1), &records),
            Err(ForecastError::NoUsableRecords)
        );
    }

    proptest! {
        #[test]
        fn last_days_window_never_starts_before_the_data(
            offsets in prop::collection::vec(0u64..2000, 1..40),
            policy_index in 0usize..SUPPORTED_DAY_COUNTS.len(),
        ) {
            let base = on_date(2020, 1, 1);
            let records: Vec<_> = offsets
                .iter()
                .map(|offset| {
                    let end = base + Days::new(*offset);
                    finished("X", base, end)
                })
                .collect();
            let (earliest, latest) = end_date_bounds(&records).unwrap();

            let policy = DurationPolicy::LastDays(SUPPORTED_DAY_COUNTS[policy_index]);
            let result = window_for_policy(policy, on_date(2030, 1, 1), &records).unwrap();

            prop_assert!(result.start_date() >= earliest);
            prop_assert_eq!(result.end_date(), latest);
        }
    }
}
