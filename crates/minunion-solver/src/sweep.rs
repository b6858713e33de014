// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::{
    config::{GreedyConfig, Threshold},
    framework::UnionSolver,
    greedy::GreedyUnionSolver,
};
use minunion_core::{
    Element, WeightVariable,
    percent::Percent,
    weight::{Weight, ceil_snapped},
};
use minunion_model::{
    collection::WeightedSetCollection, err::InvalidInputError, result::UnionResult,
};
use num_traits::Zero;
use rayon::{ThreadPool, ThreadPoolBuildError, prelude::*};
use std::fmt::Display;
use tracing::{info, instrument};

#[derive(Debug)]
pub enum SweepError<W: WeightVariable> {
    InvalidInput(InvalidInputError<W>),
    ThreadPool(ThreadPoolBuildError),
}

impl<W: WeightVariable> From<InvalidInputError<W>> for SweepError<W> {
    fn from(value: InvalidInputError<W>) -> Self {
        SweepError::InvalidInput(value)
    }
}

impl<W: WeightVariable> From<ThreadPoolBuildError> for SweepError<W> {
    fn from(value: ThreadPoolBuildError) -> Self {
        SweepError::ThreadPool(value)
    }
}

impl<W: WeightVariable> Display for SweepError<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepError::InvalidInput(e) => write!(f, "Invalid sweep input: {}", e),
            SweepError::ThreadPool(e) => write!(f, "Failed to build worker pool: {}", e),
        }
    }
}

impl<W: WeightVariable + 'static> std::error::Error for SweepError<W> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SweepError::InvalidInput(e) => Some(e),
            SweepError::ThreadPool(e) => Some(e),
        }
    }
}

/// Upper bound on the number of thresholds in one sweep.
pub const MAX_SWEEP_STEPS: usize = 100_000;

/// Percents `step, 2·step, …, K·step` where `K·step` is the first multiple
/// reaching the coverage the collection can achieve against `total_weight`.
/// That coverage may exceed 100 when the collection outweighs the total.
/// Always yields at least one percent.
pub fn sweep_percents<W: WeightVariable>(
    collection_weight: Weight<W>,
    total_weight: Weight<W>,
    step_percent: f64,
) -> Result<Vec<Percent>, InvalidInputError<W>> {
    if !step_percent.is_finite() || step_percent <= 0.0 {
        return Err(InvalidInputError::NonPositiveStep(step_percent));
    }
    if total_weight <= Weight::zero() {
        return Err(InvalidInputError::NonPositiveTotalWeight(total_weight));
    }
    let max_coverage = collection_weight
        .fraction_of(total_weight)
        .map(|f| f * 100.0)
        .unwrap_or(0.0);
    let raw_steps = ceil_snapped(max_coverage / step_percent);
    if raw_steps > MAX_SWEEP_STEPS as f64 {
        return Err(InvalidInputError::SweepTooFine {
            step: step_percent,
            max_steps: MAX_SWEEP_STEPS,
        });
    }
    let steps = (raw_steps as usize).max(1);
    (1..=steps)
        .map(|k| {
            Percent::new(k as f64 * step_percent)
                .ok_or(InvalidInputError::NonPositiveStep(step_percent))
        })
        .collect()
}

/// Solves one collection at many thresholds on a caller-owned worker pool.
///
/// Every threshold is an independent task. The collection is shared
/// read-only and each task builds its own working state.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdSweepRunner<'p, S> {
    pool: &'p ThreadPool,
    solver: S,
}

impl<'p> ThresholdSweepRunner<'p, GreedyUnionSolver> {
    pub fn greedy(pool: &'p ThreadPool, config: GreedyConfig) -> Self {
        Self::new(pool, GreedyUnionSolver::with_config(config))
    }
}

impl<'p, S> ThresholdSweepRunner<'p, S> {
    pub fn new(pool: &'p ThreadPool, solver: S) -> Self {
        Self { pool, solver }
    }

    #[inline]
    pub fn pool(&self) -> &'p ThreadPool {
        self.pool
    }

    #[inline]
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Solves at every sweep percent and returns the results ascending by
    /// threshold.
    #[instrument(
        skip_all,
        fields(rows = collection.len(), total = %total_weight, step = step_percent),
        err(Display)
    )]
    pub fn sweep<E, W>(
        &self,
        collection: &WeightedSetCollection<E, W>,
        total_weight: Weight<W>,
        step_percent: f64,
    ) -> Result<Vec<UnionResult<E, W>>, SweepError<W>>
    where
        E: Element,
        W: WeightVariable,
        S: UnionSolver<E, W, Error = InvalidInputError<W>> + Sync,
    {
        let percents = sweep_percents(collection.total_weight(), total_weight, step_percent)?;
        let thresholds = percents
            .iter()
            .map(|&p| {
                Weight::percent_of(total_weight, p).ok_or(InvalidInputError::ThresholdOverflow(p))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let results = self
            .solve_thresholds(collection, &thresholds)
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            thresholds = results.len(),
            max_covered = %results.last().map(|r| r.covered_weight()).unwrap_or_else(Weight::zero),
            "Sweep finished"
        );
        Ok(results)
    }

    /// One result per requested threshold, in request order. A failing
    /// threshold only fails its own slot.
    pub fn solve_thresholds<E, W>(
        &self,
        collection: &WeightedSetCollection<E, W>,
        thresholds: &[Weight<W>],
    ) -> Vec<Result<UnionResult<E, W>, InvalidInputError<W>>>
    where
        E: Element,
        W: WeightVariable,
        S: UnionSolver<E, W, Error = InvalidInputError<W>> + Sync,
    {
        self.pool.install(|| {
            thresholds
                .par_iter()
                .map(|&threshold| self.solver.solve(collection, threshold))
                .collect()
        })
    }

    /// Solves every `(collection, total_weight)` pair at `percent`, in parallel.
    pub fn solve_percent_each<E, W>(
        &self,
        periods: &[(&WeightedSetCollection<E, W>, Weight<W>)],
        percent: f64,
    ) -> Vec<Result<UnionResult<E, W>, InvalidInputError<W>>>
    where
        E: Element,
        W: WeightVariable,
        S: UnionSolver<E, W, Error = InvalidInputError<W>> + Sync,
    {
        self.pool.install(|| {
            periods
                .par_iter()
                .map(|&(collection, total)| -> Result<_, InvalidInputError<W>> {
                    let threshold = Threshold::Percent(percent).resolve(total)?;
                    self.solver.solve(collection, threshold)
                })
                .collect()
        })
    }
}
