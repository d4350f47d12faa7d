use anyhow::Result;
use bench_plot::chart::generate_charts;
use bench_plot::config::PlotConfig;
use bench_plot::results::{parse_results_with_logging, print_summary};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Benchmarks are expected to be laid out as one TEST_CASE per figure, one
/// SECTION per x-axis position (e.g. the input size) and one BENCHMARK per
/// plotted series.
#[derive(Parser)]
#[command(name = "bench-plot")]
#[command(about = "Plots the benchmark statistics of a given Catch2 XML file")]
struct Cli {
    /// The benchmark XML file. Create one by running the Catch2 binary with
    /// '--reporter XML::out=filename.xml'
    file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = PlotConfig::default();

    let document = parse_results_with_logging(&cli.file, true)?;
    print_summary(&document, config.time_unit);

    println!("\nGenerating charts...");
    generate_charts(&document, &config, Path::new("."))?;

    Ok(())
}
