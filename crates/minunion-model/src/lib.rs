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

//! # Minimum Union Model (`minunion-model`)
//!
//! Data model for weighted minimum-union problems: which identifiers have to
//! be provisioned so that the events whose required identifiers are all
//! provisioned make up a given share of the total event weight.
//!
//! ## Key Data Structures
//!
//! - **`WeightedSet<E, W>`**: a set of elements together with the total
//!   weight of all events requiring exactly that set.
//!
//! - **`WeightedSetCollection<E, W>`**: a table of weighted sets with pairwise
//!   distinct element sets. Identical sets are merged by summing weights,
//!   events requiring no element are tracked as a separate total.
//!
//! - **`MetaCounters`**: additive scalar totals accompanying a collection,
//!   e.g. the number of analyzed events.
//!
//! - **`UnionResult<E, W>`**: the ordered elements a solver selected and the
//!   weight they cover.
//!
//! ## Ingestion and Synthetic Data
//!
//! The [`io`] module reads the tab-separated `<name>.tsv` / `<name>_meta.tsv`
//! pairs; the [`generator`] module produces synthetic workloads for tests and
//! benchmarks.

pub mod collection;
pub mod err;
pub mod generator;
pub mod io;
pub mod meta;
pub mod result;
pub mod set;
pub mod stats;

pub mod prelude {
    pub use crate::collection::WeightedSetCollection;
    pub use crate::err::{
        EmptyMergeError, InvalidInputError, NegativeThresholdError, NegativeWeightError,
        PercentOutOfRangeError,
    };
    pub use crate::io::{Dataset, LoadError};
    pub use crate::meta::MetaCounters;
    pub use crate::result::UnionResult;
    pub use crate::set::WeightedSet;
    pub use crate::stats::CollectionStats;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(WeightedSetCollection<String, i64>: Send, Sync, Clone);
    assert_impl_all!(UnionResult<String, i64>: Send, Sync, Clone);
    assert_impl_all!(MetaCounters: Send, Sync);
    assert_impl_all!(LoadError: std::error::Error, Send, Sync);
}
