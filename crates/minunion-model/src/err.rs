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
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NegativeWeightError<W: WeightVariable> {
    weight: Weight<W>,
}

impl<W: WeightVariable> NegativeWeightError<W> {
    #[inline]
    pub fn new(weight: Weight<W>) -> Self {
        Self { weight }
    }

    #[inline]
    pub fn weight(&self) -> Weight<W> {
        self.weight
    }
}

impl<W: WeightVariable> Display for NegativeWeightError<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Weighted set has negative weight {}", self.weight)
    }
}

impl<W: WeightVariable> std::error::Error for NegativeWeightError<W> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NegativeThresholdError<W: WeightVariable> {
    threshold: Weight<W>,
}

impl<W: WeightVariable> NegativeThresholdError<W> {
    #[inline]
    pub fn new(threshold: Weight<W>) -> Self {
        Self { threshold }
    }

    #[inline]
    pub fn threshold(&self) -> Weight<W> {
        self.threshold
    }
}

impl<W: WeightVariable> Display for NegativeThresholdError<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Requested threshold {} is negative", self.threshold)
    }
}

impl<W: WeightVariable> std::error::Error for NegativeThresholdError<W> {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentOutOfRangeError {
    percent: f64,
}

impl PercentOutOfRangeError {
    #[inline]
    pub fn new(percent: f64) -> Self {
        Self { percent }
    }

    #[inline]
    pub fn percent(&self) -> f64 {
        self.percent
    }
}

impl Display for PercentOutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Coverage percent {} is outside of the range (0, 100]",
            self.percent
        )
    }
}

impl std::error::Error for PercentOutOfRangeError {}

/// Input rejected before any solving begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidInputError<W: WeightVariable> {
    NegativeWeight(NegativeWeightError<W>),
    NegativeThreshold(NegativeThresholdError<W>),
    PercentOutOfRange(PercentOutOfRangeError),
    NonPositiveStep(f64),
    NonPositiveTotalWeight(Weight<W>),
    SweepTooFine {
        step: f64,
        max_steps: usize,
    },
    ThresholdOverflow(Percent),
}

impl<W: WeightVariable> From<NegativeWeightError<W>> for InvalidInputError<W> {
    fn from(value: NegativeWeightError<W>) -> Self {
        InvalidInputError::NegativeWeight(value)
    }
}

impl<W: WeightVariable> From<NegativeThresholdError<W>> for InvalidInputError<W> {
    fn from(value: NegativeThresholdError<W>) -> Self {
        InvalidInputError::NegativeThreshold(value)
    }
}

impl<W: WeightVariable> From<PercentOutOfRangeError> for InvalidInputError<W> {
    fn from(value: PercentOutOfRangeError) -> Self {
        InvalidInputError::PercentOutOfRange(value)
    }
}

impl<W: WeightVariable> Display for InvalidInputError<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use InvalidInputError::*;
        match self {
            NegativeWeight(e) => write!(f, "{}", e),
            NegativeThreshold(e) => write!(f, "{}", e),
            PercentOutOfRange(e) => write!(f, "{}", e),
            NonPositiveStep(step) => write!(f, "Sweep step {} must be positive", step),
            NonPositiveTotalWeight(total) => {
                write!(f, "Total weight {} must be positive", total)
            }
            SweepTooFine { step, max_steps } => write!(
                f,
                "Sweep step {} would need more than {} thresholds",
                step, max_steps
            ),
            ThresholdOverflow(percent) => write!(
                f,
                "Threshold for {} is not representable in the weight type",
                percent
            ),
        }
    }
}

impl<W: WeightVariable> std::error::Error for InvalidInputError<W> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EmptyMergeError;

impl Display for EmptyMergeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cannot merge an empty list of collections")
    }
}

impl std::error::Error for EmptyMergeError {}

/// A summed weight left the range of the weight type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeightOverflowError;

impl Display for WeightOverflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Summed weight overflows the weight type")
    }
}

impl std::error::Error for WeightOverflowError {}
