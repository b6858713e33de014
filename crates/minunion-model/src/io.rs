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

//! Reading the tab-separated inputs produced by the log analysis.
//!
//! A dataset `<name>` consists of two files in the same directory:
//!
//! - `<name>.tsv`: one header line, then one row per element set:
//!   `<json array of strings>\t<weight>`.
//! - `<name>_meta.tsv`: one row per counter: `<key>\t<value>`, no header.

use crate::{
    collection::WeightedSetCollection,
    err::{EmptyMergeError, NegativeWeightError, WeightOverflowError},
    meta::MetaCounters,
    set::WeightedSet,
};
use minunion_core::weight::Weight;
use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    MissingColumn {
        path: PathBuf,
        line: usize,
    },
    InvalidNumber {
        path: PathBuf,
        line: usize,
        value: String,
    },
    InvalidSet {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
    NegativeWeight {
        path: PathBuf,
        line: usize,
        source: NegativeWeightError<i64>,
    },
    WeightOverflow {
        path: PathBuf,
        line: usize,
    },
    MergeOverflow(WeightOverflowError),
    NoDatasets(EmptyMergeError),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use LoadError::*;
        match self {
            Io { path, source } => write!(f, "Cannot read {}: {}", path.display(), source),
            MissingColumn { path, line } => write!(
                f,
                "{}:{}: expected two tab-separated columns",
                path.display(),
                line
            ),
            InvalidNumber { path, line, value } => write!(
                f,
                "{}:{}: `{}` is not an integer",
                path.display(),
                line,
                value
            ),
            InvalidSet { path, line, source } => write!(
                f,
                "{}:{}: element set is not a JSON string array: {}",
                path.display(),
                line,
                source
            ),
            NegativeWeight { path, line, source } => {
                write!(f, "{}:{}: {}", path.display(), line, source)
            }
            WeightOverflow { path, line } => write!(
                f,
                "{}:{}: summed weight overflows a 64-bit integer",
                path.display(),
                line
            ),
            MergeOverflow(e) => write!(f, "Cannot combine datasets: {}", e),
            NoDatasets(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::InvalidSet { source, .. } => Some(source),
            LoadError::NegativeWeight { source, .. } => Some(source),
            LoadError::MergeOverflow(e) => Some(e),
            LoadError::NoDatasets(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EmptyMergeError> for LoadError {
    fn from(value: EmptyMergeError) -> Self {
        LoadError::NoDatasets(value)
    }
}

/// A loaded dataset: its weighted sets and the counters that came with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    collection: WeightedSetCollection<String, i64>,
    meta: MetaCounters,
}

impl Dataset {
    #[inline]
    pub fn new(
        name: impl Into<String>,
        collection: WeightedSetCollection<String, i64>,
        meta: MetaCounters,
    ) -> Self {
        Self {
            name: name.into(),
            collection,
            meta,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn collection(&self) -> &WeightedSetCollection<String, i64> {
        &self.collection
    }

    #[inline]
    pub fn meta(&self) -> &MetaCounters {
        &self.meta
    }

    #[inline]
    pub fn into_parts(self) -> (String, WeightedSetCollection<String, i64>, MetaCounters) {
        (self.name, self.collection, self.meta)
    }

    /// The denominator for coverage percentages.
    ///
    /// Uses `VALID_QUERIES` when present, otherwise everything the dataset
    /// knows about: row weight plus element-free weight.
    pub fn total_weight(&self) -> Weight<i64> {
        match self.meta.valid_queries() {
            Some(v) => Weight::new(v),
            None => {
                let empty = self
                    .meta
                    .empty_graph_pattern()
                    .map(Weight::new)
                    .unwrap_or(self.collection.empty_weight());
                self.collection.total_weight().saturating_add(empty)
            }
        }
    }
}

fn read_to_string(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn split_columns<'a>(
    path: &Path,
    line_no: usize,
    line: &'a str,
) -> Result<(&'a str, &'a str), LoadError> {
    line.split_once('\t').ok_or_else(|| LoadError::MissingColumn {
        path: path.to_path_buf(),
        line: line_no,
    })
}

fn parse_i64(path: &Path, line_no: usize, raw: &str) -> Result<i64, LoadError> {
    let value = raw.split('\t').next().unwrap_or(raw).trim();
    value.parse::<i64>().map_err(|_| LoadError::InvalidNumber {
        path: path.to_path_buf(),
        line: line_no,
        value: value.to_string(),
    })
}

/// Reads a single `<name>.tsv` file. Identical sets are merged, element-free
/// rows are folded into the collection's empty weight.
pub fn load_weighted_set_file(
    path: &Path,
) -> Result<WeightedSetCollection<String, i64>, LoadError> {
    let content = read_to_string(path)?;
    let mut collection = WeightedSetCollection::new();

    // First line is the header.
    for (idx, raw) in content.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let (set_col, weight_col) = split_columns(path, line_no, line)?;
        let elements: Vec<String> =
            serde_json::from_str(set_col).map_err(|source| LoadError::InvalidSet {
                path: path.to_path_buf(),
                line: line_no,
                source,
            })?;
        let weight = parse_i64(path, line_no, weight_col)?;
        let set = WeightedSet::new(elements, Weight::new(weight)).map_err(|source| {
            LoadError::NegativeWeight {
                path: path.to_path_buf(),
                line: line_no,
                source,
            }
        })?;
        collection
            .try_insert(set)
            .map_err(|_| LoadError::WeightOverflow {
                path: path.to_path_buf(),
                line: line_no,
            })?;
    }

    debug!(
        path = %path.display(),
        rows = collection.len(),
        total = %collection.total_weight(),
        "Loaded weighted sets"
    );
    Ok(collection)
}

fn merge_checked(
    parts: Vec<WeightedSetCollection<String, i64>>,
) -> Result<WeightedSetCollection<String, i64>, LoadError> {
    let mut parts = parts.into_iter();
    let mut merged = parts.next().ok_or(EmptyMergeError)?;
    for part in parts {
        merged.try_merge(part).map_err(LoadError::MergeOverflow)?;
    }
    Ok(merged)
}

/// Reads and merges several `<name>.tsv` files, sorts the rows heaviest
/// first and keeps at most `limit` of them.
pub fn load_weighted_sets<P: AsRef<Path>>(
    paths: &[P],
    limit: Option<usize>,
) -> Result<WeightedSetCollection<String, i64>, LoadError> {
    let parts = paths
        .iter()
        .map(|p| load_weighted_set_file(p.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let mut merged = merge_checked(parts)?;
    merged.sort_by_weight_desc();
    Ok(match limit {
        Some(limit) => merged.truncated(limit),
        None => merged,
    })
}

pub fn load_meta_file(path: &Path) -> Result<MetaCounters, LoadError> {
    let content = read_to_string(path)?;
    let mut meta = MetaCounters::new();
    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let (key, value) = split_columns(path, line_no, line)?;
        meta.add(key, parse_i64(path, line_no, value)?);
    }
    Ok(meta)
}

/// Reads several `<name>_meta.tsv` files and sums the counters per key.
pub fn load_meta<P: AsRef<Path>>(paths: &[P]) -> Result<MetaCounters, LoadError> {
    let mut meta = MetaCounters::new();
    for p in paths {
        meta.merge(&load_meta_file(p.as_ref())?);
    }
    Ok(meta)
}

#[inline]
pub fn weighted_set_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.tsv"))
}

#[inline]
pub fn meta_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}_meta.tsv"))
}

/// Loads `<dir>/<name>.tsv` together with `<dir>/<name>_meta.tsv`.
///
/// If the meta file has no `EMPTY_GRAPH_PATTERN` counter it is filled in with
/// the weight of the element-free rows of the set file.
pub fn load_dataset(dir: &Path, name: &str, limit: Option<usize>) -> Result<Dataset, LoadError> {
    let collection = load_weighted_set_file(&weighted_set_path(dir, name))?;
    let mut meta = load_meta_file(&meta_path(dir, name))?;
    if !meta.contains(MetaCounters::EMPTY_GRAPH_PATTERN) {
        meta.insert(
            MetaCounters::EMPTY_GRAPH_PATTERN,
            collection.empty_weight().value(),
        );
    }

    let mut collection = collection;
    collection.sort_by_weight_desc();
    let collection = match limit {
        Some(limit) => collection.truncated(limit),
        None => collection,
    };

    info!(
        dataset = name,
        rows = collection.len(),
        total = %collection.total_weight(),
        "Loaded dataset"
    );
    Ok(Dataset::new(name, collection, meta))
}

/// Loads several datasets and combines them into one: rows are merged,
/// counters summed, and `limit` is applied to the combined rows.
pub fn load_combined<S: AsRef<str>>(
    dir: &Path,
    names: &[S],
    combined_name: &str,
    limit: Option<usize>,
) -> Result<Dataset, LoadError> {
    let mut collections = Vec::with_capacity(names.len());
    let mut meta = MetaCounters::new();
    for name in names {
        let (_, c, m) = load_dataset(dir, name.as_ref(), None)?.into_parts();
        collections.push(c);
        meta.merge(&m);
    }
    let mut collection = merge_checked(collections)?;
    collection.sort_by_weight_desc();
    let collection = match limit {
        Some(limit) => collection.truncated(limit),
        None => collection,
    };
    Ok(Dataset::new(combined_name, collection, meta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        collections::BTreeSet,
        sync::atomic::{AtomicUsize, Ordering},
    };

    static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

    fn fixture_dir() -> PathBuf {
        let n = NEXT_DIR.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "minunion-io-test-{}-{}",
            std::process::id(),
            n
        ));
        fs::create_dir_all(&dir).expect("create fixture dir");
        dir
    }

    fn write(dir: &Path, file: &str, content: &str) {
        fs::write(dir.join(file), content).expect("write fixture");
    }

    fn key(elements: &[&str]) -> BTreeSet<String> {
        elements.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_dataset_parses_sets_and_meta() {
        let dir = fixture_dir();
        write(
            &dir,
            "day1.tsv",
            "set\tweight\n[\"a\",\"b\"]\t10\n[\"c\"]\t5\n[]\t3\n\n[\"b\",\"a\"]\t2\n",
        );
        write(&dir, "day1_meta.tsv", "VALID_QUERIES\t40\nINVALID\t7\n");

        let ds = load_dataset(&dir, "day1", None).expect("load");
        assert_eq!(ds.name(), "day1");
        assert_eq!(ds.collection().len(), 2);
        assert_eq!(
            ds.collection().get(&key(&["a", "b"])).unwrap().weight(),
            Weight::new(12)
        );
        assert_eq!(ds.collection().empty_weight(), Weight::new(3));
        assert_eq!(ds.meta().empty_graph_pattern(), Some(3));
        assert_eq!(ds.meta().get("INVALID"), Some(7));
        assert_eq!(ds.total_weight(), Weight::new(40));
    }

    #[test]
    fn test_total_weight_without_valid_queries() {
        let dir = fixture_dir();
        write(&dir, "d.tsv", "h\n[\"a\"]\t10\n[]\t4\n");
        write(&dir, "d_meta.tsv", "OTHER\t1\n");
        let ds = load_dataset(&dir, "d", None).unwrap();
        assert_eq!(ds.total_weight(), Weight::new(14));
    }

    #[test]
    fn test_existing_empty_counter_is_kept() {
        let dir = fixture_dir();
        write(&dir, "d.tsv", "h\n[]\t4\n[\"a\"]\t1\n");
        write(&dir, "d_meta.tsv", "EMPTY_GRAPH_PATTERN\t99\n");
        let ds = load_dataset(&dir, "d", None).unwrap();
        assert_eq!(ds.meta().empty_graph_pattern(), Some(99));
    }

    #[test]
    fn test_limit_keeps_heaviest_rows() {
        let dir = fixture_dir();
        write(
            &dir,
            "d.tsv",
            "h\n[\"a\"]\t1\n[\"b\"]\t30\n[\"c\"]\t20\n[\"d\"]\t10\n",
        );
        let c = load_weighted_sets(&[dir.join("d.tsv")], Some(2)).unwrap();
        let heads: Vec<_> = c
            .iter()
            .map(|r| r.elements().iter().next().unwrap().clone())
            .collect();
        assert_eq!(heads, ["b", "c"]);
    }

    #[test]
    fn test_load_combined_merges_rows_and_meta() {
        let dir = fixture_dir();
        write(&dir, "p1.tsv", "h\n[\"a\"]\t1\n[\"b\"]\t2\n");
        write(&dir, "p1_meta.tsv", "VALID_QUERIES\t10\n");
        write(&dir, "p2.tsv", "h\n[\"b\"]\t5\n[]\t1\n");
        write(&dir, "p2_meta.tsv", "VALID_QUERIES\t20\n");

        let ds = load_combined(&dir, &["p1", "p2"], "all", None).unwrap();
        assert_eq!(ds.name(), "all");
        assert_eq!(ds.meta().valid_queries(), Some(30));
        assert_eq!(ds.meta().empty_graph_pattern(), Some(1));
        assert_eq!(
            ds.collection().get(&key(&["b"])).unwrap().weight(),
            Weight::new(7)
        );
        assert_eq!(
            ds.collection().iter().next().unwrap().elements(),
            &key(&["b"])
        );
    }

    #[test]
    fn test_load_meta_sums_files() {
        let dir = fixture_dir();
        write(&dir, "a_meta.tsv", "K\t1\n");
        write(&dir, "b_meta.tsv", "K\t2\nL\t3\n");
        let m = load_meta(&[dir.join("a_meta.tsv"), dir.join("b_meta.tsv")]).unwrap();
        assert_eq!(m.get("K"), Some(3));
        assert_eq!(m.get("L"), Some(3));
    }

    #[test]
    fn test_malformed_lines_report_position() {
        let dir = fixture_dir();
        write(&dir, "bad.tsv", "h\n[\"a\"]\t1\n[\"a\"\t2\n");
        match load_weighted_set_file(&dir.join("bad.tsv")).unwrap_err() {
            LoadError::InvalidSet { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error {other}"),
        }

        write(&dir, "neg.tsv", "h\n[\"a\"]\t-1\n");
        assert!(matches!(
            load_weighted_set_file(&dir.join("neg.tsv")).unwrap_err(),
            LoadError::NegativeWeight { line: 2, .. }
        ));

        write(&dir, "nocol.tsv", "h\n[\"a\"]\n");
        assert!(matches!(
            load_weighted_set_file(&dir.join("nocol.tsv")).unwrap_err(),
            LoadError::MissingColumn { line: 2, .. }
        ));

        write(&dir, "num.tsv", "h\n[\"a\"]\tmany\n");
        assert!(matches!(
            load_weighted_set_file(&dir.join("num.tsv")).unwrap_err(),
            LoadError::InvalidNumber { line: 2, .. }
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = fixture_dir();
        assert!(matches!(
            load_meta_file(&dir.join("nope_meta.tsv")).unwrap_err(),
            LoadError::Io { .. }
        ));
    }

    #[test]
    fn test_load_weighted_sets_without_paths_fails() {
        let none: [PathBuf; 0] = [];
        assert!(matches!(
            load_weighted_sets(&none, None).unwrap_err(),
            LoadError::NoDatasets(_)
        ));
    }

    #[test]
    fn test_overflowing_weights_report_position() {
        let dir = fixture_dir();
        write(&dir, "big.tsv", "h\n[\"a\"]\t9223372036854775807\n[\"a\"]\t1\n");
        assert!(matches!(
            load_weighted_set_file(&dir.join("big.tsv")).unwrap_err(),
            LoadError::WeightOverflow { line: 3, .. }
        ));

        write(&dir, "wide.tsv", "h\n[\"a\"]\t9223372036854775807\n[\"b\"]\t1\n");
        assert!(matches!(
            load_weighted_set_file(&dir.join("wide.tsv")).unwrap_err(),
            LoadError::WeightOverflow { line: 3, .. }
        ));
    }

    #[test]
    fn test_combining_overflowing_datasets_fails() {
        let dir = fixture_dir();
        write(&dir, "x.tsv", "h\n[\"a\"]\t9223372036854775807\n");
        write(&dir, "y.tsv", "h\n[\"a\"]\t1\n");
        assert!(matches!(
            load_weighted_sets(&[dir.join("x.tsv"), dir.join("y.tsv")], None).unwrap_err(),
            LoadError::MergeOverflow(_)
        ));
    }
}
