use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::domain::throughput::ThroughputDistribution;
use crate::services::forecast_error::ForecastError;

/// Default oversampling factor for the "when" horizon. The horizon has to be
/// longer than the slowest plausible days-to-target for the historical
/// throughput, otherwise runs fail with `SimulationHorizonExceeded`.
pub const DEFAULT_HORIZON_MULTIPLIER: usize = 20;

/// Source of simulated daily completion counts.
pub trait DailySampler {
    fn sample_days(
        &mut self,
        distribution: &ThroughputDistribution,
        days: usize,
    ) -> Result<Vec<usize>, ForecastError>;
}

/// Draws independent daily counts weighted by the distribution's probabilities.
pub struct RandomSampler<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomSampler<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> DailySampler for RandomSampler<R> {
    fn sample_days(
        &mut self,
        distribution: &ThroughputDistribution,
        days: usize,
    ) -> Result<Vec<usize>, ForecastError> {
        let index = WeightedIndex::new(distribution.probabilities())
            .map_err(|e| ForecastError::InvalidDistribution(e.to_string()))?;
        Ok((0..days).map(|_| index.sample(&mut self.rng)).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationParameters {
    pub iterations: usize,
    /// Length of the fixed "how many" window, in days.
    pub simulation_days: usize,
    pub target_item_count: usize,
    pub horizon_multiplier: usize,
}

impl SimulationParameters {
    pub fn horizon_days(&self) -> usize {
        self.simulation_days.saturating_mul(self.horizon_multiplier)
    }

    fn validate(&self) -> Result<(), ForecastError> {
        if self.iterations == 0 {
            return Err(ForecastError::InvalidIterations);
        }
        if self.target_item_count == 0 {
            return Err(ForecastError::InvalidTargetCount);
        }
        if self.simulation_days == 0 {
            return Err(ForecastError::InvalidSimulationDays);
        }
        if self.horizon_multiplier == 0 {
            return Err(ForecastError::InvalidHorizonMultiplier);
        }
        Ok(())
    }
}

/// Result of a single trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationOutcome {
    pub total_completed: usize,
    pub days_elapsed: usize,
}

/// Both outcome series of a run, one entry per iteration in iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationOutcomes {
    pub total_completed: Vec<usize>,
    pub days_elapsed: Vec<usize>,
}

impl SimulationOutcomes {
    fn with_capacity(iterations: usize) -> Self {
        Self {
            total_completed: Vec::with_capacity(iterations),
            days_elapsed: Vec::with_capacity(iterations),
        }
    }

    fn push(&mut self, outcome: SimulationOutcome) {
        self.total_completed.push(outcome.total_completed);
        self.days_elapsed.push(outcome.days_elapsed);
    }

    pub fn len(&self) -> usize {
        self.total_completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_completed.is_empty()
    }
}

/// Runs `iterations` independent trials. The whole run is aborted as soon as
/// one trial cannot reach the target within the horizon.
pub fn run<S: DailySampler + ?Sized>(
    distribution: &ThroughputDistribution,
    parameters: &SimulationParameters,
    sampler: &mut S,
) -> Result<SimulationOutcomes, ForecastError> {
    parameters.validate()?;
    let horizon_days = parameters.horizon_days();

    let mut outcomes = SimulationOutcomes::with_capacity(parameters.iterations);
    for iteration in 0..parameters.iterations {
        let daily_completed = sampler.sample_days(distribution, horizon_days)?;
        let outcome = simulate_single_run(
            &daily_completed,
            parameters.simulation_days,
            parameters.target_item_count,
        )
        .ok_or_else(|| {
            warn!(
                iteration,
                horizon_days,
                target = parameters.target_item_count,
                "reached the end of the sampled days before completing the target"
            );
            ForecastError::SimulationHorizonExceeded {
                target: parameters.target_item_count,
                horizon_days,
            }
        })?;
        outcomes.push(outcome);
    }

    debug!(
        iterations = outcomes.len(),
        horizon_days, "finished monte carlo simulation"
    );
    Ok(outcomes)
}

/// Evaluates one trial over a pre-drawn sequence of daily counts. Returns
/// `None` when the running total never reaches `target_item_count`.
pub fn simulate_single_run(
    daily_completed: &[usize],
    simulation_days: usize,
    target_item_count: usize,
) -> Option<SimulationOutcome> {
    let total_completed = daily_completed.iter().take(simulation_days).sum();
    let days_elapsed = days_to_reach(daily_completed, target_item_count)?;
    Some(SimulationOutcome {
        total_completed,
        days_elapsed,
    })
}

/// 1-based number of days until the running total reaches `target`.
fn days_to_reach(daily_completed: &[usize], target: usize) -> Option<usize> {
    let mut completed = 0;
    for (index, count) in daily_completed.iter().enumerate() {
        completed += count;
        if completed >= target {
            return Some(index + 1);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::throughput::Throughput;
    use crate::test_support::{FixedSampler, on_date};

    fn distribution(counts: &[usize]) -> ThroughputDistribution {
        let daily: Vec<_> = counts
            .iter()
            .enumerate()
            .map(|(offset, completed_items)| Throughput {
                date: on_date(2026, 1, 1 + offset as u32),
                completed_items: *completed_items,
            })
            .collect();
        ThroughputDistribution::from_daily_throughput(&daily).unwrap()
    }

    fn parameters(iterations: usize, simulation_days: usize, target: usize) -> SimulationParameters {
        SimulationParameters {
            iterations,
            simulation_days,
            target_item_count: target,
            horizon_multiplier: DEFAULT_HORIZON_MULTIPLIER,
        }
    }

    #[test]
    fn constant_sampler_yields_expected_outcomes() {
        let distribution = distribution(&[2, 0, 1]);
        let mut sampler = FixedSampler::new(&[1]);

        let outcomes = run(&distribution, &parameters(1, 3, 2), &mut sampler).unwrap();

        assert_eq!(outcomes.total_completed, vec![3]);
        assert_eq!(outcomes.days_elapsed, vec![2]);
    }

    #[test]
    fn first_day_meeting_the_target_counts_as_one_day() {
        let outcome = simulate_single_run(&[5, 0, 0], 2, 3).unwrap();
        assert_eq!(outcome.days_elapsed, 1);

        let outcome = simulate_single_run(&[3, 0, 0], 2, 3).unwrap();
        assert_eq!(outcome.days_elapsed, 1);
        assert_eq!(outcome.total_completed, 3);
    }

    #[test]
    fn how_many_only_sums_the_simulation_window() {
        let outcome = simulate_single_run(&[1, 2, 3, 4, 5], 2, 10).unwrap();
        assert_eq!(outcome.total_completed, 3);
        assert_eq!(outcome.days_elapsed, 4);
    }

    #[test]
    fn unreachable_target_aborts_the_whole_run() {
        let distribution = distribution(&[0, 1]);
        let mut sampler = FixedSampler::new(&[0]);

        let error = run(&distribution, &parameters(10, 2, 1), &mut sampler).unwrap_err();
        assert_eq!(
            error,
            ForecastError::SimulationHorizonExceeded {
                target: 1,
                horizon_days: 40,
            }
        );
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let distribution = distribution(&[1]);
        let mut sampler = FixedSampler::new(&[1]);

        let test_cases = vec![
            (parameters(0, 3, 2), ForecastError::InvalidIterations),
            (parameters(1, 3, 0), ForecastError::InvalidTargetCount),
            (parameters(1, 0, 2), ForecastError::InvalidSimulationDays),
            (
                SimulationParameters {
                    horizon_multiplier: 0,
                    ..parameters(1, 3, 2)
                },
                ForecastError::InvalidHorizonMultiplier,
            ),
        ];

        for (parameters, expected) in test_cases {
            assert_eq!(run(&distribution, &parameters, &mut sampler), Err(expected));
        }
    }

    #[test]
    fn random_sampler_only_draws_observed_counts() {
        let distribution = distribution(&[0, 3, 3, 0]);
        let mut sampler = RandomSampler::seeded(7);

        let days = sampler.sample_days(&distribution, 500).unwrap();
        assert_eq!(days.len(), 500);
        assert!(days.iter().all(|count| *count == 0 || *count == 3));
        assert!(days.contains(&0));
        assert!(days.contains(&3));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let distribution = distribution(&[0, 1, 2, 4, 1, 0, 3]);
        let parameters = parameters(200, 14, 10);

        let first = run(&distribution, &parameters, &mut RandomSampler::seeded(42)).unwrap();
        let second = run(&distribution, &parameters, &mut RandomSampler::seeded(42)).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 200);
    }
}
