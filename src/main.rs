use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueHint};
use log::{error, info, LevelFilter};

use icecore_resample::text::{read_table, write_output_csv, OutputLayout};
use icecore_resample::{
    plan_batch, run_batch, BatchResult, ResampleBy, Resampler, ResultOrder, RunCounting,
    SeriesTable,
};

/// Resample ice core data by depth, year or both onto fixed increments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dataset to resample, a .csv, .txt or .xlsx file inside the data directory
    #[arg(value_hint = ValueHint::FilePath)]
    file: PathBuf,

    /// What to resample by: depth, year (age, time) or all (both)
    by: ResampleBy,

    /// Increment amounts to resample the data by
    #[arg(required = true, num_args = 1..)]
    increments: Vec<f64>,

    /// Directory the dataset is read from
    #[arg(long, default_value = "data", value_hint = ValueHint::DirPath)]
    data_dir: PathBuf,

    /// Directory the resampled files are written under
    #[arg(long, default_value = "output_files", value_hint = ValueHint::DirPath)]
    output_dir: PathBuf,

    /// Row order of the resampled tables
    #[arg(long, default_value_t = ResultOrder::Descending)]
    order: ResultOrder,

    /// Whether a gap between empty windows resets the sparse-region run counter
    #[arg(long, default_value_t = RunCounting::Reset)]
    run_counting: RunCounting,

    /// Consecutive empty window steps that end a resampled series
    #[arg(long, default_value_t = icecore_resample::sparse::DEFAULT_RUN_LENGTH)]
    run_length: usize,

    /// Skip drawing the overlay plots
    #[arg(long, action = ArgAction::SetTrue)]
    no_plot: bool,

    /// Increase logging verbosity
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

#[cfg(feature = "plot")]
fn write_plots(raw: &SeriesTable, result: &BatchResult, stem: &std::path::Path) -> Result<()> {
    if let Ok(outcome) = &result.outcome {
        icecore_resample::plot::write_output_plots(raw, outcome, stem)
            .with_context(|| format!("Drawing plots for {}", result.job))?;
    }
    Ok(())
}

#[cfg(not(feature = "plot"))]
fn write_plots(_raw: &SeriesTable, _result: &BatchResult, _stem: &std::path::Path) -> Result<()> {
    log::warn!("Plotting requires the `plot` feature, skipping figures");
    Ok(())
}

fn write_result(cli: &Cli, layout: &OutputLayout, raw: &SeriesTable, result: &BatchResult) -> Result<()> {
    let outcome = match &result.outcome {
        Ok(outcome) => outcome,
        Err(e) => bail!("Resampling by {} failed: {e}", result.job),
    };
    let stem = layout
        .create(result.job.axis, &outcome.key, outcome.increment)
        .with_context(|| format!("Creating output folders under {}", layout.root.display()))?;
    let csv_path = write_output_csv(&outcome.table, &stem)?;
    info!("Creating output csv file : {}", csv_path.display());
    if !cli.no_plot {
        info!("Creating output plot files : {}", stem.display());
        write_plots(raw, result, &stem)?;
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<bool> {
    let path = cli.data_dir.join(&cli.file);
    let raw = read_table(&path).with_context(|| format!("Reading {}", path.display()))?;
    info!(
        "Read {} rows and {} numeric columns from {}",
        raw.len(),
        raw.width(),
        path.display()
    );

    info!("Resample by {}", cli.by);
    let jobs = plan_batch(&raw, cli.by, &cli.increments);
    if jobs.is_empty() {
        bail!("No column of {} matches {}", path.display(), cli.by);
    }

    let mut builder = Resampler::builder();
    builder
        .order(cli.order)
        .run_counting(cli.run_counting)
        .run_length(cli.run_length)
        .parallel(cfg!(feature = "parallelism"));
    let resampler = builder.build();

    let start = Instant::now();
    let results = run_batch(&resampler, &raw, &jobs);
    info!(
        "Resampled {} combinations in {} milliseconds",
        results.len(),
        start.elapsed().as_millis()
    );

    let layout = OutputLayout::for_input(&cli.output_dir, &cli.file);
    let mut all_ok = true;
    for result in results.iter() {
        if let Err(e) = write_result(cli, &layout, &raw, result) {
            error!("{e:#}");
            all_ok = false;
        }
    }
    Ok(all_ok)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
