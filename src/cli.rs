//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use log::{error, info};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::png_chart::{ChartConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH, Figure};
use crate::adapters::yahoo_adapter::{DEFAULT_BASE_URL, YahooAdapter};
use crate::domain::error::StockgridError;
use crate::domain::series::SymbolSeries;
use crate::domain::symbol_grid::{SymbolGrid, parse_grid};
use crate::domain::trading_window::TradingWindow;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

/// Upper bound for either figure dimension, in pixels.
pub const MAX_DIMENSION: i64 = 16_384;

#[derive(Parser, Debug)]
#[command(
    name = "stockgrid",
    about = "Render a grid of intraday boxplot charts for a set of tickers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch today's bars and write the chart PNG
    Render {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Symbol grid, e.g. "GME,AMC/MSFT,NOK"
        #[arg(short, long)]
        symbols: Option<String>,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Read <SYMBOL>.csv files from this directory instead of the provider
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Show the window, grid and output file without fetching
    Plan {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        symbols: Option<String>,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub subplots: usize,
    pub boxplots: usize,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Render {
            config,
            symbols,
            output_dir,
            data_dir,
        } => run_render(
            config.as_ref(),
            symbols.as_deref(),
            output_dir.as_ref(),
            data_dir.as_ref(),
        ),
        Command::Plan {
            config,
            symbols,
            output_dir,
        } => run_plan(config.as_ref(), symbols.as_deref(), output_dir.as_ref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, StockgridError> {
    match path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            FileConfigAdapter::from_file(path).map_err(|e| StockgridError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// `--symbols` wins over `[symbols] grid`, which wins over the built-in grid.
pub fn resolve_grid(
    symbols_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<SymbolGrid, StockgridError> {
    let (source, key) = match symbols_override {
        Some(s) => (s.to_string(), "--symbols"),
        None => match config.get_string("symbols", "grid") {
            Some(s) => (s, "grid"),
            None => return Ok(SymbolGrid::default()),
        },
    };
    parse_grid(&source).map_err(|e| StockgridError::ConfigInvalid {
        section: "symbols".into(),
        key: key.into(),
        reason: e.to_string(),
    })
}

pub fn build_chart_config(config: &dyn ConfigPort) -> Result<ChartConfig, StockgridError> {
    let dimension = |key: &str, default: u32| -> Result<u32, StockgridError> {
        let invalid = |reason: String| StockgridError::ConfigInvalid {
            section: "chart".into(),
            key: key.into(),
            reason,
        };
        if let Some(raw) = config.get_string("chart", key) {
            if raw.trim().parse::<i64>().is_err() {
                return Err(invalid(format!("not an integer: {:?}", raw)));
            }
        }
        let value = config.get_int("chart", key, i64::from(default));
        if !(1..=MAX_DIMENSION).contains(&value) {
            return Err(invalid(format!("must be between 1 and {}", MAX_DIMENSION)));
        }
        Ok(value as u32)
    };
    Ok(ChartConfig {
        width: dimension("width", DEFAULT_WIDTH)?,
        height: dimension("height", DEFAULT_HEIGHT)?,
    })
}

pub fn resolve_output_dir(dir_override: Option<&PathBuf>, config: &dyn ConfigPort) -> PathBuf {
    dir_override
        .cloned()
        .or_else(|| config.get_string("chart", "output_dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn resolve_base_url(config: &dyn ConfigPort) -> String {
    config
        .get_string("provider", "base_url")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

fn run_render(
    config_path: Option<&PathBuf>,
    symbols: Option<&str>,
    output_dir: Option<&PathBuf>,
    data_dir: Option<&PathBuf>,
) -> Result<(), StockgridError> {
    let config = load_config(config_path)?;
    let grid = resolve_grid(symbols, &config)?;
    let chart = build_chart_config(&config)?;
    let output_dir = resolve_output_dir(output_dir, &config);
    let window = TradingWindow::today();

    let summary = match data_dir {
        Some(dir) => {
            info!("Reading bars from {}", dir.display());
            let port = CsvAdapter::new(dir.clone());
            run_chart_pipeline(&port, &grid, &window, &chart, &output_dir)?
        }
        None => {
            let port = YahooAdapter::new(&resolve_base_url(&config))?;
            run_chart_pipeline(&port, &grid, &window, &chart, &output_dir)?
        }
    };

    println!("{}", summary.path.display());
    Ok(())
}

fn run_plan(
    config_path: Option<&PathBuf>,
    symbols: Option<&str>,
    output_dir: Option<&PathBuf>,
) -> Result<(), StockgridError> {
    let config = load_config(config_path)?;
    let plan = build_plan(&config, symbols, output_dir, &TradingWindow::today())?;
    print!("{}", plan);
    Ok(())
}

/// What `render` would do for the given settings, without fetching.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub window: TradingWindow,
    pub grid: SymbolGrid,
    pub chart: ChartConfig,
    pub source: String,
    pub output: PathBuf,
}

impl fmt::Display for RenderPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.grid.shape();
        writeln!(f, "window:  {}", self.window)?;
        writeln!(f, "symbols: {}", self.grid)?;
        writeln!(
            f,
            "layout:  {} x {} at {}x{} px",
            rows, cols, self.chart.width, self.chart.height
        )?;
        writeln!(f, "source:  {}", self.source)?;
        writeln!(f, "output:  {}", self.output.display())
    }
}

pub fn build_plan(
    config: &dyn ConfigPort,
    symbols: Option<&str>,
    output_dir: Option<&PathBuf>,
    window: &TradingWindow,
) -> Result<RenderPlan, StockgridError> {
    let grid = resolve_grid(symbols, config)?;
    let chart = build_chart_config(config)?;
    let output = resolve_output_dir(output_dir, config).join(grid.output_filename(window.date()));
    Ok(RenderPlan {
        window: *window,
        grid,
        chart,
        source: resolve_base_url(config),
        output,
    })
}

/// Fetches every symbol in grid order, draws its subplot, then saves the
/// figure once. The first failure aborts the run before anything is written.
pub fn run_chart_pipeline(
    data_port: &dyn DataPort,
    grid: &SymbolGrid,
    window: &TradingWindow,
    chart: &ChartConfig,
    output_dir: &Path,
) -> Result<RenderSummary, StockgridError> {
    info!("Trading window: {}", window);
    let date = window.date();
    let mut figure = Figure::new(chart, grid.shape());

    for cell in grid.cells() {
        let bars = data_port.fetch_bars(cell.symbol, window)?;
        info!("  {}: {} bars", cell.symbol, bars.len());

        let series = SymbolSeries::from_bars(&bars);
        let title = format!("{} Stock Values {}", cell.symbol, date);
        figure.draw_subplot(cell.row, cell.col, &title, &series);
    }

    let summary = RenderSummary {
        path: output_dir.join(grid.output_filename(date)),
        subplots: figure.subplot_count(),
        boxplots: figure.boxplot_count(),
    };
    figure.save(&summary.path)?;
    info!(
        "Chart written to: {} ({} subplots, {} boxplots)",
        summary.path.display(),
        summary.subplots,
        summary.boxplots
    );
    Ok(summary)
}
