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

use minunion_core::{WeightVariable, percent::Percent, weight::Weight};
use minunion_model::err::{
    InvalidInputError, NegativeThresholdError, PercentOutOfRangeError,
};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::{fmt::Display, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GreedyConfig {
    pub max_iterations: Option<usize>,
    pub time_budget_ms: Option<u64>,
}

impl GreedyConfig {
    #[inline]
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}

pub const DEFAULT_STEP_PERCENT: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    pub step_percent: f64,
    pub threads: Option<usize>,
    pub greedy: GreedyConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            step_percent: DEFAULT_STEP_PERCENT,
            threads: None,
            greedy: GreedyConfig::default(),
        }
    }
}

impl SweepConfig {
    #[inline]
    pub fn builder() -> SweepConfigBuilder {
        SweepConfigBuilder::new()
    }

    /// Worker count: the configured one, or the available hardware
    /// parallelism.
    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Builds the worker pool a [`crate::sweep::ThresholdSweepRunner`] runs on.
    pub fn build_pool(&self) -> Result<ThreadPool, ThreadPoolBuildError> {
        ThreadPoolBuilder::new()
            .num_threads(self.thread_count())
            .thread_name(|i| format!("minunion-sweep-{i}"))
            .build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepConfigBuildError {
    InvalidStep(f64),
    ZeroThreads,
}

impl Display for SweepConfigBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepConfigBuildError::InvalidStep(step) => {
                write!(f, "Sweep step {} must be finite and positive", step)
            }
            SweepConfigBuildError::ZeroThreads => {
                write!(f, "Thread count must be at least one")
            }
        }
    }
}

impl std::error::Error for SweepConfigBuildError {}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfigBuilder {
    config: SweepConfig,
}

impl Default for SweepConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SweepConfig::default(),
        }
    }

    pub fn step_percent(mut self, step: f64) -> Self {
        self.config.step_percent = step;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.config.threads = Some(threads);
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.greedy.max_iterations = Some(max_iterations);
        self
    }

    pub fn time_budget_ms(mut self, ms: u64) -> Self {
        self.config.greedy.time_budget_ms = Some(ms);
        self
    }

    pub fn build(self) -> Result<SweepConfig, SweepConfigBuildError> {
        let step = self.config.step_percent;
        if !step.is_finite() || step <= 0.0 {
            return Err(SweepConfigBuildError::InvalidStep(step));
        }
        if self.config.threads == Some(0) {
            return Err(SweepConfigBuildError::ZeroThreads);
        }
        Ok(self.config)
    }
}

/// A single-threshold request in absolute or percentage form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold<W: WeightVariable> {
    Absolute(Weight<W>),
    /// Percent of a total weight, in `(0, 100]`.
    Percent(f64),
}

impl<W: WeightVariable> Threshold<W> {
    /// The absolute weight this request stands for against `total_weight`.
    pub fn resolve(self, total_weight: Weight<W>) -> Result<Weight<W>, InvalidInputError<W>> {
        match self {
            Threshold::Absolute(threshold) => {
                if threshold.is_negative() {
                    return Err(NegativeThresholdError::new(threshold).into());
                }
                Ok(threshold)
            }
            Threshold::Percent(value) => {
                if !(value > 0.0 && value <= 100.0) {
                    return Err(PercentOutOfRangeError::new(value).into());
                }
                let percent =
                    Percent::new(value).ok_or(PercentOutOfRangeError::new(value))?;
                Weight::percent_of(total_weight, percent)
                    .ok_or(InvalidInputError::ThresholdOverflow(percent))
            }
        }
    }
}

impl<W: WeightVariable> From<Weight<W>> for Threshold<W> {
    fn from(value: Weight<W>) -> Self {
        Threshold::Absolute(value)
    }
}
