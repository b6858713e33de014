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

use minunion_core::weight::Weight;
use minunion_model::{
    io::{load_combined, load_dataset},
    prelude::*,
};
use minunion_solver::{
    config::SweepConfig,
    greedy::GreedyUnionSolver,
    progression::CoverageProgressionAnalyzer,
    sweep::{SweepError, ThresholdSweepRunner},
};
use serde::Serialize;
use std::{
    fmt::Display,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LIMIT: usize = 10_000;

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Clone, PartialEq)]
struct CliConfig {
    prefix: PathBuf,
    datasets: Vec<String>,
    limit: Option<usize>,
    sweep: SweepConfig,
    combined: Option<String>,
    progression: Option<f64>,
    output: PathBuf,
}

fn print_help() {
    println!(
        "minunion: minimum unions of weighted sets

USAGE:
    minunion [OPTIONS] <DATASET>...

OPTIONS:
    --prefix <DIR>            Directory holding <DATASET>.tsv and <DATASET>_meta.tsv [default: .]
    --limit <N>               Keep only the N heaviest sets per dataset, 0 keeps all [default: {DEFAULT_LIMIT}]
    --step <PERCENT>          Sweep step in percent [default: 2]
    --threads <N>             Worker threads [default: available parallelism]
    --combined <NAME>         Also sweep all datasets merged into one named NAME
    --progression <PERCENT>   Analyze coverage progression across the datasets in the given order
    --output <DIR>            Directory for JSON reports [default: .]
    -h, --help                Print this help

Set RUST_LOG to adjust log output, e.g. RUST_LOG=minunion_solver=debug."
    );
}

fn take_value<'a>(flag: &str, iter: &mut impl Iterator<Item = &'a String>) -> Result<&'a str, String> {
    iter.next()
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_number<T: std::str::FromStr>(flag: &str, raw: &str) -> Result<T, String> {
    raw.parse::<T>()
        .map_err(|_| format!("invalid value for {flag}: {raw}"))
}

fn parse_args(args: &[String]) -> Result<Option<CliConfig>, String> {
    let mut prefix = PathBuf::from(".");
    let mut output = PathBuf::from(".");
    let mut datasets = Vec::new();
    let mut limit = Some(DEFAULT_LIMIT);
    let mut builder = SweepConfig::builder();
    let mut combined = None;
    let mut progression = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--prefix" => prefix = PathBuf::from(take_value(arg, &mut iter)?),
            "--output" => output = PathBuf::from(take_value(arg, &mut iter)?),
            "--limit" => {
                let n: usize = parse_number(arg, take_value(arg, &mut iter)?)?;
                limit = (n > 0).then_some(n);
            }
            "--step" => {
                builder = builder.step_percent(parse_number(arg, take_value(arg, &mut iter)?)?);
            }
            "--threads" => {
                builder = builder.threads(parse_number(arg, take_value(arg, &mut iter)?)?);
            }
            "--combined" => combined = Some(take_value(arg, &mut iter)?.to_string()),
            "--progression" => {
                let p: f64 = parse_number(arg, take_value(arg, &mut iter)?)?;
                if !(p > 0.0 && p <= 100.0) {
                    return Err(format!("--progression must be in (0, 100], got {p}"));
                }
                progression = Some(p);
            }
            flag if flag.starts_with('-') => return Err(format!("unknown option: {flag}")),
            name => datasets.push(name.to_string()),
        }
    }

    if datasets.is_empty() {
        return Err("at least one dataset is required".to_string());
    }
    let sweep = builder.build().map_err(|e| e.to_string())?;
    Ok(Some(CliConfig {
        prefix,
        datasets,
        limit,
        sweep,
        combined,
        progression,
        output,
    }))
}

#[derive(Debug)]
enum AppError {
    Load(LoadError),
    Sweep(SweepError<i64>),
    InvalidInput(InvalidInputError<i64>),
    Write { path: PathBuf, source: std::io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Load(e) => write!(f, "{}", e),
            AppError::Sweep(e) => write!(f, "{}", e),
            AppError::InvalidInput(e) => write!(f, "{}", e),
            AppError::Write { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            AppError::Json { path, source } => {
                write!(f, "Failed to serialize {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl From<LoadError> for AppError {
    fn from(value: LoadError) -> Self {
        AppError::Load(value)
    }
}

impl From<SweepError<i64>> for AppError {
    fn from(value: SweepError<i64>) -> Self {
        AppError::Sweep(value)
    }
}

impl From<InvalidInputError<i64>> for AppError {
    fn from(value: InvalidInputError<i64>) -> Self {
        AppError::InvalidInput(value)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsSnapshot {
    rows: usize,
    distinct_elements: usize,
    empty_weight: i64,
    p50_row_weight: f64,
    p90_row_weight: f64,
    p50_set_size: f64,
    p90_set_size: f64,
    max_set_size: usize,
}

impl From<CollectionStats<i64>> for StatsSnapshot {
    fn from(s: CollectionStats<i64>) -> Self {
        Self {
            rows: s.rows(),
            distinct_elements: s.distinct_elements(),
            empty_weight: s.empty_weight().value(),
            p50_row_weight: s.p50_row_weight(),
            p90_row_weight: s.p90_row_weight(),
            p50_set_size: s.p50_set_size(),
            p90_set_size: s.p90_set_size(),
            max_set_size: s.max_set_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Partition {
    percent: f64,
    threshold: i64,
    weight_sum: i64,
    coverage_percent: f64,
    elements: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MinimumUnionReport {
    dataset: String,
    total_weight: i64,
    collection_weight: i64,
    step_percent: f64,
    elapsed_ms: u128,
    stats: StatsSnapshot,
    optimal_partitions: Vec<Partition>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressionReport {
    percent: f64,
    datasets: Vec<String>,
    same_period: Vec<f64>,
    carried_over: Vec<Option<f64>>,
    unions: Vec<Vec<String>>,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Wrote report");
    Ok(())
}

fn sweep_dataset(
    runner: &ThresholdSweepRunner<'_, GreedyUnionSolver>,
    dataset: &Dataset,
    config: &CliConfig,
) -> Result<(), AppError> {
    let total: Weight<i64> = dataset.total_weight();
    let step = config.sweep.step_percent;
    let started = Instant::now();
    let results = runner.sweep(dataset.collection(), total, step)?;
    let elapsed = started.elapsed();

    let optimal_partitions = results
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let coverage_percent = r.coverage_of(total).unwrap_or(0.0) * 100.0;
            let (elements, covered, threshold) = r.into_parts();
            Partition {
                percent: (i + 1) as f64 * step,
                threshold: threshold.value(),
                weight_sum: covered.value(),
                coverage_percent,
                elements,
            }
        })
        .collect();

    let report = MinimumUnionReport {
        dataset: dataset.name().to_string(),
        total_weight: total.value(),
        collection_weight: dataset.collection().total_weight().value(),
        step_percent: step,
        elapsed_ms: elapsed.as_millis(),
        stats: dataset.collection().stats().into(),
        optimal_partitions,
    };
    let path = config
        .output
        .join(format!("{}_minimum_unions.json", dataset.name()));
    write_json(&path, &report)
}

fn run(config: &CliConfig) -> Result<(), AppError> {
    fs::create_dir_all(&config.output).map_err(|source| AppError::Write {
        path: config.output.clone(),
        source,
    })?;

    let pool = config.sweep.build_pool().map_err(SweepError::<i64>::from)?;
    let runner = ThresholdSweepRunner::greedy(&pool, config.sweep.greedy);
    info!(
        threads = pool.current_num_threads(),
        step = config.sweep.step_percent,
        "Worker pool ready"
    );

    let mut datasets = Vec::with_capacity(config.datasets.len());
    for name in &config.datasets {
        let dataset = load_dataset(&config.prefix, name, config.limit)?;
        sweep_dataset(&runner, &dataset, config)?;
        datasets.push(dataset);
    }

    if let Some(name) = &config.combined {
        let combined = load_combined(&config.prefix, &config.datasets, name, config.limit)?;
        sweep_dataset(&runner, &combined, config)?;
    }

    if let Some(percent) = config.progression {
        let periods: Vec<_> = datasets
            .iter()
            .map(|d| (d.collection(), d.total_weight()))
            .collect();
        let (results, progression) =
            CoverageProgressionAnalyzer::new().analyze_with_solver(&runner, &periods, percent)?;
        let (same_period, carried_over) = progression.as_percentages();
        let report = ProgressionReport {
            percent,
            datasets: config.datasets.clone(),
            same_period,
            carried_over,
            unions: results
                .into_iter()
                .map(|r| r.into_parts().0)
                .collect(),
        };
        write_json(&config.output.join("coverage_progression.json"), &report)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match parse_args(&args) {
        Ok(Some(config)) => config,
        Ok(None) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("run with --help for usage");
            return ExitCode::from(2);
        }
    };

    enable_tracing();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults() {
        let config = parse_args(&args(&["train"])).unwrap().unwrap();
        assert_eq!(config.datasets, vec!["train".to_string()]);
        assert_eq!(config.prefix, PathBuf::from("."));
        assert_eq!(config.limit, Some(DEFAULT_LIMIT));
        assert_eq!(config.sweep.step_percent, 2.0);
        assert_eq!(config.sweep.threads, None);
        assert_eq!(config.combined, None);
        assert_eq!(config.progression, None);
    }

    #[test]
    fn test_parse_all_options() {
        let config = parse_args(&args(&[
            "--prefix", "data", "--limit", "0", "--step", "5", "--threads", "3",
            "--combined", "all", "--progression", "80", "--output", "out", "a", "b",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(config.prefix, PathBuf::from("data"));
        assert_eq!(config.output, PathBuf::from("out"));
        assert_eq!(config.limit, None);
        assert_eq!(config.sweep.step_percent, 5.0);
        assert_eq!(config.sweep.threads, Some(3));
        assert_eq!(config.combined.as_deref(), Some("all"));
        assert_eq!(config.progression, Some(80.0));
        assert_eq!(config.datasets, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["--step"])).is_err());
        assert!(parse_args(&args(&["--step", "x", "a"])).is_err());
        assert!(parse_args(&args(&["--step", "0", "a"])).is_err());
        assert!(parse_args(&args(&["--threads", "0", "a"])).is_err());
        assert!(parse_args(&args(&["--progression", "120", "a"])).is_err());
        assert!(parse_args(&args(&["--bogus", "a"])).is_err());
        assert_eq!(parse_args(&args(&["--help"])), Ok(None));
    }

    #[test]
    fn test_run_writes_reports() {
        let dir = std::env::temp_dir().join(format!("minunion-main-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("p0.tsv"),
            "set\tweight\n[\"a\"]\t50\n[\"b\"]\t30\n[\"c\"]\t20\n",
        )
        .unwrap();
        fs::write(dir.join("p0_meta.tsv"), "VALID_QUERIES\t100\n").unwrap();
        fs::write(
            dir.join("p1.tsv"),
            "set\tweight\n[\"a\"]\t40\n[\"a\",\"b\"]\t30\n[\"d\"]\t30\n",
        )
        .unwrap();
        fs::write(dir.join("p1_meta.tsv"), "VALID_QUERIES\t100\n").unwrap();

        let out = dir.join("out");
        let config = parse_args(&args(&[
            "--prefix",
            dir.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
            "--step",
            "25",
            "--threads",
            "2",
            "--combined",
            "both",
            "--progression",
            "50",
            "p0",
            "p1",
        ]))
        .unwrap()
        .unwrap();
        run(&config).unwrap();

        let report: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(out.join("p0_minimum_unions.json")).unwrap(),
        )
        .unwrap();
        let partitions = report["optimalPartitions"].as_array().unwrap();
        assert_eq!(partitions.len(), 4);
        assert_eq!(partitions[1]["threshold"], 50);
        assert_eq!(partitions[1]["weightSum"], 50);
        assert!(out.join("p1_minimum_unions.json").exists());
        assert!(out.join("both_minimum_unions.json").exists());

        let progression: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(out.join("coverage_progression.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(progression["carriedOver"][0], serde_json::Value::Null);
        assert_eq!(progression["unions"][1], serde_json::json!(["a", "b"]));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_json_complete_or_reports_path() {
        let dir = std::env::temp_dir().join(format!("minunion-main-json-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let path = dir.join("report.json");
        let value = serde_json::json!({ "unions": [["a", "b"], ["c"]] });
        write_json(&path, &value).unwrap();
        let read: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read, value);

        let missing = dir.join("missing").join("report.json");
        match write_json(&missing, &value) {
            Err(AppError::Write { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected write error, got {:?}", other.map(|_| ())),
        }
        fs::remove_dir_all(&dir).ok();
    }
}
