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

use crate::{framework::UnionSolver, sweep::ThresholdSweepRunner};
use minunion_core::{Element, WeightVariable, weight::Weight};
use minunion_model::{
    collection::WeightedSetCollection, err::InvalidInputError, result::UnionResult,
};
use num_traits::Zero;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// One period of a progression: its collection, the total weight its
/// fractions are measured against, and the union solved for it.
#[derive(Debug, Clone)]
pub struct Period<'a, E: Element, W: WeightVariable> {
    pub collection: &'a WeightedSetCollection<E, W>,
    pub total_weight: Weight<W>,
    pub result: &'a UnionResult<E, W>,
}

impl<'a, E: Element, W: WeightVariable> Period<'a, E, W> {
    pub fn new(
        collection: &'a WeightedSetCollection<E, W>,
        total_weight: Weight<W>,
        result: &'a UnionResult<E, W>,
    ) -> Self {
        Self {
            collection,
            total_weight,
            result,
        }
    }
}

/// Coverage fractions per period.
///
/// `carried_over[i]` is the share of period `i` already covered by the
/// elements selected in all earlier periods. It is `None` for the first
/// period.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoverageProgression {
    same_period: Vec<f64>,
    carried_over: Vec<Option<f64>>,
}

impl CoverageProgression {
    #[inline]
    pub fn same_period(&self) -> &[f64] {
        &self.same_period
    }

    #[inline]
    pub fn carried_over(&self) -> &[Option<f64>] {
        &self.carried_over
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.same_period.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.same_period.is_empty()
    }

    /// Both series scaled to percent.
    pub fn as_percentages(&self) -> (Vec<f64>, Vec<Option<f64>>) {
        (
            self.same_period.iter().map(|f| f * 100.0).collect(),
            self.carried_over
                .iter()
                .map(|f| f.map(|f| f * 100.0))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageProgressionAnalyzer;

impl CoverageProgressionAnalyzer {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all, fields(periods = periods.len()), err(Display))]
    pub fn analyze<E, W>(
        &self,
        periods: &[Period<'_, E, W>],
    ) -> Result<CoverageProgression, InvalidInputError<W>>
    where
        E: Element,
        W: WeightVariable,
    {
        if let Some(bad) = periods.iter().find(|p| p.total_weight <= Weight::zero()) {
            return Err(InvalidInputError::NonPositiveTotalWeight(bad.total_weight));
        }

        let mut provisioned: HashSet<E> = HashSet::new();
        let mut same_period = Vec::with_capacity(periods.len());
        let mut carried_over = Vec::with_capacity(periods.len());

        for (i, period) in periods.iter().enumerate() {
            let same = period
                .result
                .covered_weight()
                .fraction_of(period.total_weight)
                .unwrap_or(0.0);
            let carried = if i == 0 {
                None
            } else {
                provisioned.extend(periods[i - 1].result.selected_elements().iter().cloned());
                Some(
                    period
                        .collection
                        .covered_weight_by(&provisioned)
                        .fraction_of(period.total_weight)
                        .unwrap_or(0.0),
                )
            };
            debug!(period = i, same, ?carried, provisioned = provisioned.len(), "Period analyzed");
            same_period.push(same);
            carried_over.push(carried);
        }

        info!(periods = same_period.len(), "Coverage progression finished");
        Ok(CoverageProgression {
            same_period,
            carried_over,
        })
    }

    /// Solves every period at `percent` on the runner's pool, then analyzes
    /// the progression of the results.
    #[instrument(skip_all, fields(periods = periods.len(), percent = percent), err(Display))]
    pub fn analyze_with_solver<E, W, S>(
        &self,
        runner: &ThresholdSweepRunner<'_, S>,
        periods: &[(&WeightedSetCollection<E, W>, Weight<W>)],
        percent: f64,
    ) -> Result<(Vec<UnionResult<E, W>>, CoverageProgression), InvalidInputError<W>>
    where
        E: Element,
        W: WeightVariable,
        S: UnionSolver<E, W, Error = InvalidInputError<W>> + Sync,
    {
        if let Some(&(_, bad)) = periods.iter().find(|(_, total)| *total <= Weight::zero()) {
            return Err(InvalidInputError::NonPositiveTotalWeight(bad));
        }
        let results = runner
            .solve_percent_each(periods, percent)
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        let progression = {
            let inputs: Vec<Period<'_, E, W>> = periods
                .iter()
                .zip(&results)
                .map(|(&(collection, total), result)| Period::new(collection, total, result))
                .collect();
            self.analyze(&inputs)?
        };
        Ok((results, progression))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::GreedyConfig, greedy::GreedyUnionSolver};
    use rayon::ThreadPoolBuilder;

    fn collection(pairs: &[(&[&str], i64)]) -> WeightedSetCollection<String, i64> {
        WeightedSetCollection::try_from_pairs(
            pairs
                .iter()
                .map(|(set, w)| (set.iter().map(|s| s.to_string()), *w)),
        )
        .expect("non-negative weights")
    }

    fn periods() -> Vec<(WeightedSetCollection<String, i64>, Weight<i64>)> {
        vec![
            (
                collection(&[(&["a"], 50), (&["b"], 30), (&["c"], 20)]),
                Weight::new(100),
            ),
            (
                collection(&[(&["a"], 40), (&["a", "b"], 30), (&["d"], 30)]),
                Weight::new(100),
            ),
            (
                collection(&[(&["b"], 10), (&["d"], 90)]),
                Weight::new(200),
            ),
        ]
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn test_analyze_fractions() {
        let data = periods();
        let solver = GreedyUnionSolver::new();
        let results: Vec<_> = data
            .iter()
            .map(|(c, total)| solver.solve_percent(c, *total, 50.0).unwrap())
            .collect();
        let inputs: Vec<_> = data
            .iter()
            .zip(&results)
            .map(|((c, total), r)| Period::new(c, *total, r))
            .collect();

        let progression = CoverageProgressionAnalyzer::new().analyze(&inputs).unwrap();
        assert_eq!(progression.len(), 3);
        assert_close(progression.same_period()[0], 0.5);
        assert_close(progression.same_period()[1], 0.7);
        assert_close(progression.same_period()[2], 0.5);
        assert_eq!(progression.carried_over()[0], None);
        assert_close(progression.carried_over()[1].unwrap(), 0.4);
        assert_close(progression.carried_over()[2].unwrap(), 0.05);

        let (same, carried) = progression.as_percentages();
        assert_close(same[1], 70.0);
        assert_close(carried[2].unwrap(), 5.0);
    }

    #[test]
    fn test_analyze_with_solver_matches_manual_analysis() {
        let data = periods();
        let pool = ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let runner = ThresholdSweepRunner::greedy(&pool, GreedyConfig::default());
        let refs: Vec<_> = data.iter().map(|(c, t)| (c, *t)).collect();
        let (results, progression) = CoverageProgressionAnalyzer::new()
            .analyze_with_solver(&runner, &refs, 50.0)
            .unwrap();

        let selected: Vec<Vec<&str>> = results
            .iter()
            .map(|r| r.selected_elements().iter().map(String::as_str).collect())
            .collect();
        assert_eq!(selected, vec![vec!["a"], vec!["a", "b"], vec!["d", "b"]]);
        assert_close(progression.carried_over()[2].unwrap(), 0.05);
    }

    #[test]
    fn test_non_positive_total_is_rejected() {
        let c = collection(&[(&["a"], 1)]);
        let r = UnionResult::empty(Weight::new(0));
        let err = CoverageProgressionAnalyzer::new()
            .analyze(&[Period::new(&c, Weight::new(1), &r), Period::new(&c, Weight::new(0), &r)])
            .unwrap_err();
        assert_eq!(err, InvalidInputError::NonPositiveTotalWeight(Weight::new(0)));
    }

    #[test]
    fn test_empty_progression() {
        let progression = CoverageProgressionAnalyzer::new()
            .analyze::<String, i64>(&[])
            .unwrap();
        assert!(progression.is_empty());
    }
}
