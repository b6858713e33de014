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

//! Greedy weighted minimum-union solver.
//!
//! Each iteration selects the live row whose remaining elements satisfy the
//! most weight per element. Once a row's raw weight alone would reach the
//! threshold, the solver instead takes the smallest row whose dominance
//! closes the remaining gap.

use crate::{
    config::{GreedyConfig, Threshold},
    dominance::DominanceIndex,
    framework::UnionSolver,
    intern::ElementInterner,
    row::WorkingRow,
};
use minunion_core::{Element, WeightVariable, weight::Weight};
use minunion_model::{
    collection::WeightedSetCollection,
    err::{InvalidInputError, NegativeThresholdError},
    result::UnionResult,
};
use num_traits::Zero;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// What one iteration of a [`UnionState`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport<E: Element, W: WeightVariable> {
    pub iteration: usize,
    /// Index of the selected row in the input collection.
    pub origin: usize,
    pub new_elements: Vec<E>,
    pub dominance: Weight<W>,
    pub density: f64,
    pub threshold_crossing: bool,
    pub satisfied_rows: usize,
    pub covered_weight: Weight<W>,
}

/// Step-wise solver state over a borrowed collection.
///
/// Every intermediate state is a valid partial answer: the weight reported
/// by [`UnionState::snapshot`] is always covered by its selected elements.
#[derive(Debug, Clone)]
pub struct UnionState<'c, E: Element, W: WeightVariable> {
    interner: ElementInterner<'c, E>,
    rows: Vec<WorkingRow<W>>,
    threshold: Weight<W>,
    covered: Weight<W>,
    selected: Vec<u32>,
    iterations: usize,
}

impl<'c, E: Element, W: WeightVariable> UnionState<'c, E, W> {
    pub fn new(
        collection: &'c WeightedSetCollection<E, W>,
        threshold: Weight<W>,
    ) -> Result<Self, InvalidInputError<W>> {
        if threshold.is_negative() {
            return Err(NegativeThresholdError::new(threshold).into());
        }
        let interner = ElementInterner::from_collection(collection);
        let mut rows = Vec::with_capacity(collection.len());
        for (origin, set) in collection.iter().enumerate() {
            let remaining: Vec<u32> = set
                .elements()
                .iter()
                .filter_map(|e| interner.id(e))
                .collect();
            rows.push(WorkingRow::new(origin, remaining, set.weight()));
        }
        Ok(Self {
            interner,
            rows,
            threshold,
            covered: Weight::zero(),
            selected: Vec::new(),
            iterations: 0,
        })
    }

    #[inline]
    pub fn threshold(&self) -> Weight<W> {
        self.threshold
    }

    #[inline]
    pub fn covered_weight(&self) -> Weight<W> {
        self.covered
    }

    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    #[inline]
    pub fn live_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.covered >= self.threshold || self.rows.is_empty()
    }

    /// Runs one iteration. Returns `None` once the state is finished.
    pub fn step(&mut self) -> Option<IterationReport<E, W>> {
        if self.is_finished() {
            return None;
        }
        let index = DominanceIndex::compute(&self.rows);
        let mut pick = index.densest()?;
        let mut threshold_crossing = false;
        if self.covered + self.rows[pick].weight() >= self.threshold {
            let gap = self.threshold - self.covered;
            if let Some(closing) = index.cheapest_closing(gap) {
                pick = closing;
                threshold_crossing = true;
            }
        }

        let density = index.density(pick);
        let origin = self.rows[pick].origin();
        let new_ids = self.rows[pick].remaining().to_vec();
        self.selected.extend_from_slice(&new_ids);

        let mut gained = Weight::zero();
        let mut satisfied_rows = 0;
        self.rows.retain_mut(|row| {
            if row.remove_all(&new_ids) {
                gained += row.weight();
                satisfied_rows += 1;
                false
            } else {
                true
            }
        });
        self.covered += gained;
        self.iterations += 1;

        debug!(
            iteration = self.iterations,
            origin,
            added = new_ids.len(),
            dominance = %density.dominance(),
            threshold_crossing,
            satisfied_rows,
            covered = %self.covered,
            live_rows = self.rows.len(),
            "Selected row"
        );

        Some(IterationReport {
            iteration: self.iterations,
            origin,
            new_elements: new_ids
                .iter()
                .map(|&id| self.interner.element(id).clone())
                .collect(),
            dominance: density.dominance(),
            density: density.as_f64(),
            threshold_crossing,
            satisfied_rows,
            covered_weight: self.covered,
        })
    }

    /// The best result reached so far.
    pub fn snapshot(&self) -> UnionResult<E, W> {
        UnionResult::new(self.selected_elements(), self.covered, self.threshold)
    }

    pub fn into_result(self) -> UnionResult<E, W> {
        self.snapshot()
    }

    fn selected_elements(&self) -> Vec<E> {
        self.selected
            .iter()
            .map(|&id| self.interner.element(id).clone())
            .collect()
    }
}

impl<'c, E: Element, W: WeightVariable> Iterator for UnionState<'c, E, W> {
    type Item = IterationReport<E, W>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GreedyUnionSolver {
    config: GreedyConfig,
}

impl GreedyUnionSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GreedyConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &GreedyConfig {
        &self.config
    }

    /// Starts a step-wise solve without running any iteration.
    pub fn start<'c, E, W>(
        &self,
        collection: &'c WeightedSetCollection<E, W>,
        threshold: Weight<W>,
    ) -> Result<UnionState<'c, E, W>, InvalidInputError<W>>
    where
        E: Element,
        W: WeightVariable,
    {
        UnionState::new(collection, threshold)
    }

    #[instrument(
        skip_all,
        fields(rows = collection.len(), threshold = %threshold),
        err(Display)
    )]
    pub fn solve<E, W>(
        &self,
        collection: &WeightedSetCollection<E, W>,
        threshold: Weight<W>,
    ) -> Result<UnionResult<E, W>, InvalidInputError<W>>
    where
        E: Element,
        W: WeightVariable,
    {
        let mut state = UnionState::new(collection, threshold)?;
        let deadline = self.config.time_budget().map(|b| Instant::now() + b);

        while !state.is_finished() {
            if let Some(max) = self.config.max_iterations
                && state.iterations() >= max
            {
                warn!(
                    max_iterations = max,
                    covered = %state.covered_weight(),
                    "Iteration budget exhausted; returning partial result"
                );
                break;
            }
            if let Some(deadline) = deadline
                && Instant::now() >= deadline
            {
                warn!(
                    iterations = state.iterations(),
                    covered = %state.covered_weight(),
                    "Time budget exhausted; returning partial result"
                );
                break;
            }
            state.step();
        }

        let result = state.into_result();
        info!(
            selected = result.len(),
            covered = %result.covered_weight(),
            reached = result.reached_threshold(),
            "Solve finished"
        );
        Ok(result)
    }

    /// Solves at `ceil(total_weight * percent / 100)` with `percent` in
    /// `(0, 100]`.
    pub fn solve_percent<E, W>(
        &self,
        collection: &WeightedSetCollection<E, W>,
        total_weight: Weight<W>,
        percent: f64,
    ) -> Result<UnionResult<E, W>, InvalidInputError<W>>
    where
        E: Element,
        W: WeightVariable,
    {
        self.solve_request(collection, total_weight, Threshold::Percent(percent))
    }

    pub fn solve_request<E, W>(
        &self,
        collection: &WeightedSetCollection<E, W>,
        total_weight: Weight<W>,
        request: Threshold<W>,
    ) -> Result<UnionResult<E, W>, InvalidInputError<W>>
    where
        E: Element,
        W: WeightVariable,
    {
        let threshold = request.resolve(total_weight)?;
        self.solve(collection, threshold)
    }
}

impl<E, W> UnionSolver<E, W> for GreedyUnionSolver
where
    E: Element,
    W: WeightVariable,
{
    type Error = InvalidInputError<W>;

    fn solve(
        &self,
        collection: &WeightedSetCollection<E, W>,
        threshold: Weight<W>,
    ) -> Result<UnionResult<E, W>, Self::Error> {
        GreedyUnionSolver::solve(self, collection, threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn collection(pairs: &[(&[&str], i64)]) -> WeightedSetCollection<String, i64> {
        WeightedSetCollection::try_from_pairs(
            pairs
                .iter()
                .map(|(set, w)| (set.iter().map(|s| s.to_string()), *w)),
        )
        .expect("non-negative weights")
    }

    fn solve(c: &WeightedSetCollection<String, i64>, threshold: i64) -> (Vec<String>, i64) {
        let (selected, covered, _) = GreedyUnionSolver::new()
            .solve(c, Weight::new(threshold))
            .expect("valid input")
            .into_parts();
        (selected, covered.value())
    }

    fn names(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    fn random_collection(rng: &mut ChaCha8Rng) -> WeightedSetCollection<u32, i64> {
        let rows = rng.random_range(1..20);
        WeightedSetCollection::try_from_pairs((0..rows).map(|_| {
            let size = rng.random_range(1..4);
            let set: Vec<u32> = (0..size).map(|_| rng.random_range(0..10)).collect();
            (set, rng.random_range(0..100i64))
        }))
        .unwrap()
    }

    #[test]
    fn test_single_elements_by_weight() {
        let c = collection(&[(&["1"], 100), (&["2"], 200), (&["3"], 200), (&["4"], 150)]);
        assert_eq!(solve(&c, 700), (names(&["2", "3", "4", "1"]), 650));
    }

    #[test]
    fn test_overlapping_sets() {
        let c = collection(&[
            (&["1"], 100),
            (&["2", "3"], 200),
            (&["3,5"], 200),
            (&["4"], 150),
            (&["6", "7"], 100),
        ]);
        assert_eq!(
            solve(&c, 800),
            (names(&["3,5", "4", "1", "2", "3", "6", "7"]), 750)
        );
    }

    #[test]
    fn test_duplicate_elements_across_sets() {
        let c = collection(&[
            (&["1"], 100),
            (&["2", "3,5"], 200),
            (&["3,5"], 200),
            (&["4", "2", "3,5"], 150),
            (&["6", "7", "2"], 100),
            (&["8", "9"], 100),
        ]);
        assert_eq!(
            solve(&c, 900),
            (names(&["3,5", "2", "4", "1", "6", "7", "8", "9"]), 850)
        );
    }

    #[test]
    fn test_threshold_crossing_prefers_smaller_closing_row() {
        let c = collection(&[(&["1"], 150), (&["1", "2", "3"], 200), (&["1", "4"], 80)]);
        assert_eq!(solve(&c, 200), (names(&["1", "4"]), 230));
        assert_eq!(solve(&c, 500), (names(&["1", "2", "3", "4"]), 430));
    }

    #[test]
    fn test_other_sets_are_counted_when_covered() {
        let c = collection(&[
            (&["2"], 100),
            (&["1", "2"], 200),
            (&["3"], 140),
            (&["3", "1"], 20),
            (&["4"], 150),
        ]);
        assert_eq!(solve(&c, 500), (names(&["4", "1", "2", "3"]), 610));
    }

    #[test]
    fn test_empty_collection_and_zero_threshold() {
        let empty = WeightedSetCollection::<String, i64>::new();
        assert_eq!(solve(&empty, 100), (vec![], 0));
        let c = collection(&[(&["a"], 5)]);
        assert_eq!(solve(&c, 0), (vec![], 0));
    }

    #[test]
    fn test_negative_threshold_is_rejected() {
        let c = collection(&[(&["a"], 5)]);
        let err = GreedyUnionSolver::new()
            .solve(&c, Weight::new(-1))
            .unwrap_err();
        assert!(matches!(err, InvalidInputError::NegativeThreshold(_)));
    }

    #[test]
    fn test_solve_percent() {
        let c = collection(&[(&["1"], 100), (&["2"], 200), (&["3"], 200), (&["4"], 150)]);
        let solver = GreedyUnionSolver::new();
        let r = solver.solve_percent(&c, Weight::new(1000), 50.0).unwrap();
        assert_eq!(r.threshold().value(), 500);
        assert_eq!(r.selected_elements(), names(&["2", "3", "4"]).as_slice());
        assert!(matches!(
            solver.solve_percent(&c, Weight::new(1000), 0.0),
            Err(InvalidInputError::PercentOutOfRange(_))
        ));
        assert!(matches!(
            solver.solve_percent(&c, Weight::new(1000), 101.0),
            Err(InvalidInputError::PercentOutOfRange(_))
        ));
    }

    #[test]
    fn test_step_reports_and_snapshot() {
        let c = collection(&[(&["1"], 150), (&["1", "2", "3"], 200), (&["1", "4"], 80)]);
        let mut state = GreedyUnionSolver::new()
            .start(&c, Weight::new(200))
            .unwrap();
        assert!(state.snapshot().is_empty());

        let first = state.step().expect("first iteration");
        assert_eq!(first.iteration, 1);
        assert_eq!(first.origin, 0);
        assert_eq!(first.new_elements, names(&["1"]));
        assert!(!first.threshold_crossing);
        assert_eq!(first.covered_weight.value(), 150);
        assert_eq!(state.snapshot().covered_weight().value(), 150);

        let second = state.step().expect("second iteration");
        assert_eq!(second.origin, 2);
        assert_eq!(second.new_elements, names(&["4"]));
        assert!(second.threshold_crossing);
        assert_eq!(second.satisfied_rows, 1);
        assert!(state.is_finished());
        assert!(state.step().is_none());
        assert_eq!(state.live_rows(), 1);
    }

    #[test]
    fn test_iteration_budget_returns_lower_bound() {
        let c = collection(&[(&["1"], 100), (&["2"], 200), (&["3"], 200), (&["4"], 150)]);
        let solver = GreedyUnionSolver::with_config(GreedyConfig {
            max_iterations: Some(2),
            time_budget_ms: None,
        });
        let r = solver.solve(&c, Weight::new(700)).unwrap();
        assert_eq!(r.selected_elements(), names(&["2", "3"]).as_slice());
        assert_eq!(r.covered_weight().value(), 400);
        assert!(!r.reached_threshold());
    }

    #[test]
    fn test_idempotent_resolve() {
        let c = collection(&[
            (&["1"], 100),
            (&["2", "3"], 200),
            (&["3,5"], 200),
            (&["4"], 150),
        ]);
        let solver = GreedyUnionSolver::new();
        let a = solver.solve(&c, Weight::new(450)).unwrap();
        let b = solver.solve(&c, Weight::new(450)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_instances_hold_coverage_invariants() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let solver = GreedyUnionSolver::new();
        for _ in 0..200 {
            let c = random_collection(&mut rng);
            let total = c.total_weight();
            let threshold = Weight::new(rng.random_range(0..=total.value() + 20));
            let r = solver.solve(&c, threshold).unwrap();

            let provisioned: HashSet<u32> = r.selected_elements().iter().copied().collect();
            assert_eq!(provisioned.len(), r.len(), "no element selected twice");
            assert_eq!(c.covered_weight_by(&provisioned), r.covered_weight());
            assert!(r.covered_weight() <= total);
            if total >= threshold {
                assert!(r.covered_weight() >= threshold);
            } else {
                assert_eq!(r.covered_weight(), total);
            }
        }
    }

    #[test]
    fn test_monotonic_coverage_in_threshold() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let solver = GreedyUnionSolver::new();
        for _ in 0..50 {
            let c = random_collection(&mut rng);
            let mut last = Weight::new(0i64);
            for t in 0..=c.total_weight().value() {
                let covered = solver.solve(&c, Weight::new(t)).unwrap().covered_weight();
                assert!(covered >= last, "coverage dropped at threshold {t}");
                last = covered;
            }
        }
    }

    #[test]
    fn test_solver_trait_delegates() {
        let c = collection(&[(&["1"], 100), (&["2"], 200)]);
        let solver = GreedyUnionSolver::new();
        let via_trait = <GreedyUnionSolver as UnionSolver<String, i64>>::solve(
            &solver,
            &c,
            Weight::new(150),
        )
        .unwrap();
        assert_eq!(via_trait.selected_elements(), names(&["2"]).as_slice());
    }
}
