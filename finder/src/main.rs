use anyhow::{bail, Result};
use clap::Parser;
use repfind_core::{
    collect_documents, find_repeats, read_file_list, DocSpec, InvertedIndex, RepeatsResults,
    SearchConfig, MAX_SUBSTRING_LEN,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "repfind")]
#[command(
    about = "Find the longest substrings repeated a required number of times in every document",
    long_about = None
)]
struct Cli {
    /// File list: one document path per line, `#` starts a comment; each
    /// path encodes its required repeat count as repeats=<N>
    filelist: PathBuf,
    /// Longest substring length to consider
    #[arg(long, default_value_t = MAX_SUBSTRING_LEN)]
    max_len: usize,
    /// Use the non-overlapping occurrence count when detecting exact matches
    #[arg(long, default_value_t = false)]
    exact_nonoverlapping: bool,
    /// Print a JSON summary instead of plain text
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Repeat the search and report wall-clock statistics
    #[arg(long, default_value_t = 1)]
    runs: u32,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let names = read_file_list(&cli.filelist)?;
    if names.is_empty() {
        bail!("no documents listed in {}", cli.filelist.display());
    }
    let specs = collect_documents(&names)?;
    if specs.is_empty() {
        bail!("no usable documents in {}", cli.filelist.display());
    }

    let config = SearchConfig {
        max_len: cli.max_len,
        exact_nonoverlapping: cli.exact_nonoverlapping,
    };

    let runs = cli.runs.max(1);
    let mut durations = Vec::with_capacity(runs as usize);
    for run in 0..runs {
        if runs > 1 {
            tracing::info!(run, total = runs, "starting run");
        }
        durations.push(run_search(specs.clone(), &config, cli.json)?);
    }
    if durations.len() > 1 {
        report_durations(&durations);
    }
    Ok(())
}

fn run_search(specs: Vec<DocSpec>, config: &SearchConfig, json: bool) -> Result<f64> {
    let start = Instant::now();
    let index = InvertedIndex::build(specs)?;
    index.show("initial");
    let results = find_repeats(&index, config);
    let duration = start.elapsed().as_secs_f64();
    if json {
        print_json(&results, duration)?;
    } else {
        print_plain(&results, duration);
    }
    Ok(duration)
}

fn print_plain(results: &RepeatsResults, duration: f64) {
    if !results.exact.is_empty() {
        println!(
            "Found {} exactly repeated strings of length {}",
            results.exact.len(),
            results.exact[0].len()
        );
        for term in &results.exact {
            tracing::debug!(term = %term.escape_ascii(), "exact");
        }
    }
    if !results.longest.is_empty() {
        println!(
            "Found {} repeated strings of length {}",
            results.longest.len(),
            results.longest[0].len()
        );
        for term in &results.longest {
            tracing::debug!(term = %term.escape_ascii(), "longest");
        }
    }
    if !results.converged {
        println!("stopped at the length cap without converging");
    }
    println!("duration = {duration:.3}");
}

fn print_json(results: &RepeatsResults, duration: f64) -> Result<()> {
    let lossy = |terms: &[Vec<u8>]| -> Vec<String> {
        terms
            .iter()
            .map(|t| String::from_utf8_lossy(t).into_owned())
            .collect()
    };
    let summary = serde_json::json!({
        "converged": results.converged,
        "longest_len": results.longest.first().map_or(0, |t| t.len()),
        "longest": lossy(&results.longest),
        "exact_len": results.exact.first().map_or(0, |t| t.len()),
        "exact": lossy(&results.exact),
        "duration_s": duration,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn report_durations(durations: &[f64]) {
    let mut sorted = durations.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
    let median = sorted[sorted.len() / 2];
    println!("min={min:.3}, max={max:.3}, mean={mean:.3}, median={median:.3}");
}
