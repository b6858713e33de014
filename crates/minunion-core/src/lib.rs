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

//! Foundational primitives shared by the minimum-union crates.
//!
//! - [`weight::Weight`]: a checked numeric newtype for event weights.
//! - [`WeightVariable`]: the primitive integer types a weight may wrap.
//! - [`Element`]: the bound every provisionable identifier has to satisfy.

use num_traits::{PrimInt, Signed, Zero};
use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

pub mod percent;
pub mod weight;

pub trait WeightVariable: PrimInt + Signed + Zero + Send + Sync + Debug + Display {}
impl<T> WeightVariable for T where T: PrimInt + Signed + Zero + Send + Sync + Debug + Display {}

/// An opaque identifier an event may require.
///
/// The `Ord` implementation is the fixed total order used whenever a batch of
/// newly selected elements is appended to a result.
pub trait Element: Clone + Eq + Hash + Ord + Send + Sync + Debug {}
impl<T> Element for T where T: Clone + Eq + Hash + Ord + Send + Sync + Debug {}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(i32: WeightVariable);
    assert_impl_all!(i64: WeightVariable);
    assert_impl_all!(i128: WeightVariable);
    assert_impl_all!(String: Element);
    assert_impl_all!(u32: Element);
    assert_impl_all!(&'static str: Element);
}
