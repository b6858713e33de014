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

//! # Minimum Union Solver (`minunion-solver`)
//!
//! Greedy solver for the weighted minimum-union problem, a parallel threshold
//! sweep on top of it, and coverage progression analysis across periods.
//!
//! - [`greedy::GreedyUnionSolver`] solves one collection at one threshold,
//!   either in one go or step by step through [`greedy::UnionState`].
//! - [`sweep::ThresholdSweepRunner`] solves a collection at a series of
//!   percent thresholds on a caller-owned rayon pool.
//! - [`progression::CoverageProgressionAnalyzer`] measures how well the
//!   elements selected for earlier periods cover later ones.

pub mod config;
pub mod dominance;
pub mod framework;
pub mod greedy;
mod intern;
pub mod progression;
mod row;
pub mod sweep;

pub mod prelude {
    pub use crate::config::{GreedyConfig, SweepConfig, SweepConfigBuilder, Threshold};
    pub use crate::framework::UnionSolver;
    pub use crate::greedy::{GreedyUnionSolver, IterationReport, UnionState};
    pub use crate::progression::{CoverageProgression, CoverageProgressionAnalyzer, Period};
    pub use crate::sweep::{SweepError, ThresholdSweepRunner, sweep_percents};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(GreedyUnionSolver: Send, Sync, Copy);
    assert_impl_all!(UnionState<'static, String, i64>: Send, Sync);
    assert_impl_all!(ThresholdSweepRunner<'static, GreedyUnionSolver>: Send, Sync);
    assert_impl_all!(SweepError<i64>: std::error::Error, Send, Sync);
    assert_impl_all!(CoverageProgression: Send, Sync, Clone);
}
