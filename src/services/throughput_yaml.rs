use std::io::{self, Write};

use serde::Serialize;

use crate::domain::throughput::{DistributionRow, Throughput};
use crate::domain::window::HistoricalWindow;

#[derive(Serialize)]
struct ThroughputRecord {
    date: String,
    completed_items: usize,
}

#[derive(Serialize)]
struct DistributionRecord<'a> {
    historical_window: String,
    distribution: &'a [DistributionRow],
    daily_throughput: Vec<ThroughputRecord>,
}

/// Writes the daily throughput series of a window together with its
/// distribution table.
pub fn serialize_distribution_to_yaml<W: Write>(
    writer: &mut W,
    window: &HistoricalWindow,
    daily: &[Throughput],
    distribution: &[DistributionRow],
) -> io::Result<()> {
    let record = DistributionRecord {
        historical_window: window.label(),
        distribution,
        daily_throughput: daily
            .iter()
            .map(|t| ThroughputRecord {
                date: t.date.format("%Y-%m-%d").to_string(),
                completed_items: t.completed_items,
            })
            .collect(),
    };

    let yaml = serde_yaml::to_string(&record).map_err(io::Error::other)?;
    writer.write_all(yaml.as_bytes())
}
