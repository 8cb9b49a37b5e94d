mod app;
mod color;
mod state;
mod ui;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use app::{BenchPandaApp, CaptureOutcome};
use bench_panda::config::PlotConfig;
use bench_panda::data::aggregate::{aggregate, AggregateOptions, SourceSpec};
use bench_panda::data::label::{resolve_title, split_list};
use bench_panda::data::model::SeriesReport;
use bench_panda::data::units::{Conversion, SizeUnit};
use bench_panda::render::{default_output_path, PlotDocument, PlotKind};
use clap::{Args, Parser, Subcommand};
use eframe::egui;
use state::AppState;

/// Summarize benchmark logs and plot them side by side.
#[derive(Debug, Parser)]
#[command(name = "bench-panda", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scatter or line plot of one or more logs over time.
    Plot(PlotArgs),
    /// Run time and summary statistics of a single log.
    Stats {
        /// Path to the CSV file.
        csv_file: PathBuf,
    },
    /// Side-by-side box plots of several logs.
    Boxplot(BoxplotArgs),
}

#[derive(Debug, Args)]
struct PlotArgs {
    /// Comma-delimited paths to the CSV file(s).
    data_files: String,
    /// Comma-delimited labels, one per data file.
    #[arg(long)]
    labels: Option<String>,
    /// Label for the y-axis. Defaults to the label of the first file.
    #[arg(long)]
    yaxis: Option<String>,
    /// Plot title. Defaults to the label of the first file.
    #[arg(long)]
    title: Option<String>,
    /// Output image. Defaults to data/<title>.png.
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long = "type", value_enum)]
    kind: Option<PlotKind>,
    /// Add a regression line per data file.
    #[arg(long)]
    regression: bool,
    #[command(flatten)]
    values: ValueArgs,
    /// Print the reports as JSON instead of text.
    #[arg(long)]
    json: bool,
    #[command(flatten)]
    view: ViewArgs,
    /// TOML file with defaults for the options above.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct BoxplotArgs {
    /// Comma-delimited paths to the CSV file(s).
    csv_files: String,
    /// Comma-delimited labels, one per file.
    labels: String,
    /// Y-axis label.
    yaxis: String,
    /// Plot title.
    title: String,
    /// Output image. Defaults to data/<title>.png.
    #[arg(long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    values: ValueArgs,
    #[command(flatten)]
    view: ViewArgs,
}

/// How the value column is interpreted.
#[derive(Debug, Args)]
struct ValueArgs {
    /// Units of the value column.
    #[arg(long, value_enum)]
    inunits: Option<SizeUnit>,
    /// Units shown on the y-axis.
    #[arg(long, value_enum)]
    yunits: Option<SizeUnit>,
    /// Values are microsecond latencies; implies --drop-zeros.
    #[arg(long, conflicts_with_all = ["inunits", "yunits"])]
    latency: bool,
    /// Drop zero values as incomplete samples.
    #[arg(long, conflicts_with = "keep_zeros")]
    drop_zeros: bool,
    /// Keep zero values even for latency logs.
    #[arg(long)]
    keep_zeros: bool,
}

#[derive(Debug, Args)]
struct ViewArgs {
    /// Open an interactive window instead of writing an image.
    #[arg(long, conflicts_with = "no_render")]
    interactive: bool,
    /// Only print statistics.
    #[arg(long)]
    no_render: bool,
}

impl ValueArgs {
    fn conversion(&self, cfg: &PlotConfig) -> Conversion {
        if self.latency || cfg.latency {
            return Conversion::Latency;
        }
        Conversion::Size {
            from: self.inunits.or(cfg.inunits).unwrap_or_default(),
            to: self.yunits.or(cfg.yunits).unwrap_or_default(),
        }
    }

    fn drop_zero_values(&self, cfg: &PlotConfig) -> bool {
        if self.drop_zeros {
            return true;
        }
        if self.keep_zeros {
            return false;
        }
        cfg.drop_zero_values.unwrap_or(self.latency || cfg.latency)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Plot(args) => plot(args),
        Command::Stats { csv_file } => stats(&csv_file),
        Command::Boxplot(args) => boxplot(args),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn plot(args: PlotArgs) -> Result<()> {
    let cfg = match &args.config {
        Some(path) => PlotConfig::load_from_file(path)?,
        None => PlotConfig::default(),
    };

    let paths: Vec<PathBuf> = split_list(&args.data_files).into_iter().map(PathBuf::from).collect();
    let labels = args.labels.as_deref().map(split_list);
    let conversion = args.values.conversion(&cfg);
    let drop_zero_values = args.values.drop_zero_values(&cfg);
    let template = SourceSpec {
        conversion,
        drop_zero_values,
        ..SourceSpec::new("")
    };
    let options = AggregateOptions {
        regression: args.regression || cfg.regression,
    };

    let specs = SourceSpec::batch(&paths, labels.as_deref(), conversion, drop_zero_values)?;
    let reports = aggregate(&specs, options).context("aggregating benchmark logs")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            match &report.summary {
                Some(s) => println!("File: {} Average: {}", report.path.display(), s.mean),
                None => println!("File: {} Average: n/a", report.path.display()),
            }
            println!("{report}");
        }
    }

    let first_default = reports.first().map(|r| r.series.default_label.as_str());
    let title = resolve_title(args.title.as_deref().or(cfg.title.as_deref()), first_default);
    let y_label = resolve_title(args.yaxis.as_deref().or(cfg.yaxis.as_deref()), first_default);
    let kind = args.kind.or(cfg.kind).unwrap_or_default();
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(cfg.output_dir.as_deref(), &title));

    let document = PlotDocument::time_series(title, y_label, kind, reports);
    render(AppState::new(document, template, options), &args.view, output)
}

fn stats(path: &Path) -> Result<()> {
    let reports = aggregate(&[SourceSpec::new(path)], AggregateOptions::default())?;
    let report = &reports[0];

    let Some(summary) = &report.summary else {
        println!("No valid data found in the CSV file.");
        return Ok(());
    };

    println!("Title: {}", report.series.default_label);
    println!(
        "Total Run Time: {:.2} minutes",
        report.series.duration_minutes().unwrap_or_default()
    );
    println!("Mean: {:.4}", summary.mean);
    if summary.geometric_mean.is_nan() {
        println!("Geometric Mean: undefined");
    } else {
        println!("Geometric Mean: {:.4}", summary.geometric_mean);
    }
    println!("Standard Deviation: {:.4}", summary.stdev);
    Ok(())
}

fn boxplot(args: BoxplotArgs) -> Result<()> {
    let cfg = PlotConfig::default();
    let paths: Vec<PathBuf> = split_list(&args.csv_files).into_iter().map(PathBuf::from).collect();
    let labels = split_list(&args.labels);
    let conversion = args.values.conversion(&cfg);
    let drop_zero_values = args.values.drop_zero_values(&cfg);

    let specs = SourceSpec::batch(&paths, Some(&labels), conversion, drop_zero_values)?;
    let reports = aggregate(&specs, AggregateOptions::default()).context("aggregating benchmark logs")?;
    if reports.iter().all(SeriesReport::is_empty) {
        bail!("none of the data files contain usable values");
    }

    for report in &reports {
        println!("\n=== Statistics for {} ===", report.series.label);
        match &report.summary {
            Some(summary) => print!("{summary}"),
            None => println!("no usable data points"),
        }
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(None, &args.title));
    let mut document = PlotDocument::time_series(args.title, args.yaxis, PlotKind::Box, reports);
    document.x_label = String::new();

    let template = SourceSpec {
        conversion,
        drop_zero_values,
        ..SourceSpec::new("")
    };
    render(AppState::new(document, template, AggregateOptions::default()), &args.view, output)
}

// ---------------------------------------------------------------------------
// Rendering sink
// ---------------------------------------------------------------------------

fn render(state: AppState, view: &ViewArgs, output: PathBuf) -> Result<()> {
    if view.no_render {
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 600.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    if view.interactive {
        return eframe::run_native(
            "Bench Panda – Benchmark Viewer",
            options,
            Box::new(move |_cc| Ok(Box::new(BenchPandaApp::interactive(state)))),
        )
        .map_err(|e| anyhow::anyhow!("viewer failed: {e}"));
    }

    let outcome: CaptureOutcome = Rc::new(RefCell::new(None));
    let app_outcome = Rc::clone(&outcome);
    eframe::run_native(
        "Bench Panda – Benchmark Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(BenchPandaApp::capture(state, output, app_outcome)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))?;

    let result = outcome.borrow_mut().take();
    match result {
        Some(Ok(path)) => {
            log::info!("Wrote {}", path.display());
            Ok(())
        }
        Some(Err(e)) => Err(e),
        None => bail!("window closed before the plot was saved"),
    }
}
