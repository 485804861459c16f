use std::fmt;

/// Day counts accepted by the `Last N Days` policy.
pub const SUPPORTED_DAY_COUNTS: [u32; 6] = [30, 70, 140, 182, 210, 365];

/// How far back in history the throughput model looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationPolicy {
    /// Every completion present in the data.
    All,
    /// The N days before the latest completion in the data.
    LastDays(u32),
    /// January 1st to December 31st of the year before the as-of date.
    LastCalendarYear,
    /// January 1st of the as-of year up to the as-of date.
    YearToDate,
}

impl DurationPolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let policy = match name.to_ascii_lowercase().as_str() {
            "all" => Self::All,
            "last month" => Self::LastDays(30),
            "last 10 weeks" => Self::LastDays(70),
            "last 20 weeks" => Self::LastDays(140),
            "last 30 weeks" => Self::LastDays(210),
            "last 6 months" => Self::LastDays(182),
            "last 12 months" => Self::LastDays(365),
            "last calendar year" | "last year" => Self::LastCalendarYear,
            "ytd" => Self::YearToDate,
            other => return Self::parse_last_days(other),
        };
        Some(policy)
    }

    fn parse_last_days(name: &str) -> Option<Self> {
        let days: u32 = name
            .strip_prefix("last ")?
            .strip_suffix(" days")?
            .trim()
            .parse()
            .ok()?;
        SUPPORTED_DAY_COUNTS
            .contains(&days)
            .then_some(Self::LastDays(days))
    }

    /// Explains how the window was derived, for the run's assumption list.
    pub fn describe(&self) -> String {
        match self {
            Self::All => "Historical duration covers every completion in the data".to_string(),
            Self::LastDays(days) => format!(
                "Historical duration was calculated {days} days back from the latest end date in the data"
            ),
            Self::LastCalendarYear => {
                "Historical duration was calculated as the last calendar year".to_string()
            }
            Self::YearToDate => {
                "Historical duration was calculated as 01/01 of this year to the as-of date"
                    .to_string()
            }
        }
    }
}

impl fmt::Display for DurationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::LastDays(days) => write!(f, "Last {days} Days"),
            Self::LastCalendarYear => write!(f, "Last Calendar Year"),
            Self::YearToDate => write!(f, "YTD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_policies() {
        let test_cases = vec![
            ("All", DurationPolicy::All),
            ("YTD", DurationPolicy::YearToDate),
            ("Last Calendar Year", DurationPolicy::LastCalendarYear),
            ("Last Year", DurationPolicy::LastCalendarYear),
            ("Last Month", DurationPolicy::LastDays(30)),
            ("Last 10 Weeks", DurationPolicy::LastDays(70)),
            ("Last 20 Weeks", DurationPolicy::LastDays(140)),
            ("Last 30 Weeks", DurationPolicy::LastDays(210)),
            ("Last 6 Months", DurationPolicy::LastDays(182)),
            ("Last 12 Months", DurationPolicy::LastDays(365)),
            ("Last 182 Days", DurationPolicy::LastDays(182)),
            ("  last 70 days ", DurationPolicy::LastDays(70)),
        ];

        for (name, expected) in test_cases {
            assert_eq!(
                DurationPolicy::from_name(name),
                Some(expected),
                "Expected {name:?} to parse as {expected:?}"
            );
        }
    }

    #[test]
    fn rejects_unknown_policies_and_day_counts() {
        for name in ["", "Forever", "Last 31 Days", "Last Days", "Last -30 Days", "Last Decade"] {
            assert_eq!(DurationPolicy::from_name(name), None, "{name:?} should be rejected");
        }
    }

    #[test]
    fn display_round_trips_through_from_name() {
        for policy in [
            DurationPolicy::All,
            DurationPolicy::LastDays(365),
            DurationPolicy::LastCalendarYear,
            DurationPolicy::YearToDate,
        ] {
            assert_eq!(DurationPolicy::from_name(&policy.to_string()), Some(policy));
        }
    }
}
