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

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorConfigBuildError {
    ZeroElements,
    ZeroRows,
    InvalidSetSizeRange { min: usize, max: usize },
    SetSizeExceedsUniverse { max: usize, elements: usize },
    InvalidExponent(f64),
    InvalidMaxWeight(i64),
    InvalidDrift(f64),
}

impl Display for GeneratorConfigBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use GeneratorConfigBuildError::*;
        match self {
            ZeroElements => write!(f, "element_count must be positive"),
            ZeroRows => write!(f, "row_count must be positive"),
            InvalidSetSizeRange { min, max } => {
                write!(f, "Invalid set size range [{}, {}]", min, max)
            }
            SetSizeExceedsUniverse { max, elements } => write!(
                f,
                "max_set_size {} exceeds the number of elements {}",
                max, elements
            ),
            InvalidExponent(s) => write!(f, "Zipf exponent {} must be finite and >= 0", s),
            InvalidMaxWeight(w) => write!(f, "max_weight {} must be positive", w),
            InvalidDrift(d) => write!(f, "drift {} must be within [0, 1]", d),
        }
    }
}

impl std::error::Error for GeneratorConfigBuildError {}
