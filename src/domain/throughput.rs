use chrono::NaiveDate;
use serde::Serialize;

/// Number of items that reached the end state on a single calendar day.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Throughput {
    pub date: NaiveDate,
    pub completed_items: usize,
}

/// Empirical probability of completing exactly `count` items in one day,
/// indexed by `count`. Covers every count from 0 to the maximum observed one,
/// with unobserved counts in between at probability 0.
#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputDistribution {
    probabilities: Vec<f64>,
}

/// One line of the human-readable distribution table.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DistributionRow {
    pub count: usize,
    pub probability: f64,
    pub percentage: String,
}

impl ThroughputDistribution {
    /// Builds the distribution from a zero-filled daily series. Returns `None`
    /// for an empty series.
    pub fn from_daily_throughput(daily: &[Throughput]) -> Option<Self> {
        let max_count = daily.iter().map(|day| day.completed_items).max()?;

        let mut occurrences = vec![0usize; max_count + 1];
        for day in daily {
            occurrences[day.completed_items] += 1;
        }

        let number_of_days = daily.len() as f64;
        let probabilities = occurrences
            .into_iter()
            .map(|occurred| occurred as f64 / number_of_days)
            .collect();
        Some(Self { probabilities })
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn probability(&self, count: usize) -> f64 {
        self.probabilities.get(count).copied().unwrap_or(0.0)
    }

    pub fn max_count(&self) -> usize {
        self.probabilities.len().saturating_sub(1)
    }

    pub fn percentage_table(&self, precision: u32) -> Vec<DistributionRow> {
        let precision = precision as usize;
        self.probabilities
            .iter()
            .enumerate()
            .map(|(count, probability)| DistributionRow {
                count,
                probability: *probability,
                percentage: format!("{:.*}%", precision, probability * 100.0),
            })
            .collect()
    }
}
