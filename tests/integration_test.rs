//! End-to-end pipeline tests with a mock data port.
//!
//! Tests cover:
//! - Five synthetic bars for one symbol produce five boxplots and a PNG
//! - Fetch order follows the symbol grid
//! - Output filename encodes date and symbols
//! - Any fetch failure aborts the run and writes nothing

mod common;

use chrono::TimeDelta;
use common::*;
use stockgrid::adapters::png_chart::ChartConfig;
use stockgrid::cli::run_chart_pipeline;
use stockgrid::domain::error::StockgridError;
use stockgrid::domain::series::SymbolSeries;
use stockgrid::domain::symbol_grid::{SymbolGrid, parse_grid};
use stockgrid::domain::ticks::hour_ticks;
use tempfile::TempDir;

fn small_chart() -> ChartConfig {
    ChartConfig {
        width: 640,
        height: 400,
    }
}

mod full_pipeline {
    use super::*;

    #[test]
    fn five_bars_give_five_boxplots_and_a_png() {
        let dir = TempDir::new().unwrap();
        // 09:56 .. 10:04 at -05:00, so one bar sits on 10:00
        let start = session_open_utc() + TimeDelta::minutes(26);
        let port = MockDataPort::new().with_bars("GME", generate_bars(start, 5, 100.0));
        let grid = parse_grid("GME").unwrap();

        let summary =
            run_chart_pipeline(&port, &grid, &sample_window(), &small_chart(), dir.path()).unwrap();

        assert_eq!(summary.subplots, 1);
        assert_eq!(summary.boxplots, 5);
        assert_eq!(
            summary.path,
            dir.path().join("StockValues_2021-02-26_GME_.png")
        );
        let meta = std::fs::metadata(&summary.path).unwrap();
        assert!(meta.len() > 0);

        let img = image::open(&summary.path).unwrap();
        assert_eq!((img.width(), img.height()), (640, 400));
    }

    #[test]
    fn default_grid_fetches_in_order() {
        let dir = TempDir::new().unwrap();
        let start = session_open_utc();
        let port = MockDataPort::new()
            .with_bars("GME", generate_bars(start, 10, 100.0))
            .with_bars("AMC", generate_bars(start, 8, 10.0))
            .with_bars("MSFT", generate_bars(start, 12, 230.0))
            .with_bars("NOK", generate_bars(start, 6, 4.0));

        let summary = run_chart_pipeline(
            &port,
            &SymbolGrid::default(),
            &sample_window(),
            &small_chart(),
            dir.path(),
        )
        .unwrap();

        assert_eq!(port.calls(), vec!["GME", "AMC", "MSFT", "NOK"]);
        assert_eq!(summary.subplots, 4);
        assert_eq!(summary.boxplots, 10 + 8 + 12 + 6);
        assert_eq!(
            summary.path.file_name().unwrap(),
            "StockValues_2021-02-26_GME_AMC_MSFT_NOK_.png"
        );
    }

    #[test]
    fn existing_file_is_overwritten() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("StockValues_2021-02-26_GME_.png");
        std::fs::write(&target, b"stale").unwrap();

        let port =
            MockDataPort::new().with_bars("GME", generate_bars(session_open_utc(), 3, 50.0));
        run_chart_pipeline(
            &port,
            &parse_grid("GME").unwrap(),
            &sample_window(),
            &small_chart(),
            dir.path(),
        )
        .unwrap();

        let bytes = std::fs::read(&target).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}

mod failures {
    use super::*;

    #[test]
    fn fetch_error_stops_before_later_symbols() {
        let dir = TempDir::new().unwrap();
        let port = MockDataPort::new()
            .with_bars("GME", generate_bars(session_open_utc(), 5, 100.0))
            .with_error("AMC", "connection reset")
            .with_bars("MSFT", generate_bars(session_open_utc(), 5, 230.0))
            .with_bars("NOK", generate_bars(session_open_utc(), 5, 4.0));

        let err = run_chart_pipeline(
            &port,
            &SymbolGrid::default(),
            &sample_window(),
            &small_chart(),
            dir.path(),
        )
        .unwrap_err();

        assert!(matches!(err, StockgridError::Fetch { ref symbol, .. } if symbol == "AMC"));
        assert_eq!(port.calls(), vec!["GME", "AMC"]);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn empty_result_is_no_data_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let port = MockDataPort::new().with_bars("GME", vec![]);

        let err = run_chart_pipeline(
            &port,
            &parse_grid("GME").unwrap(),
            &sample_window(),
            &small_chart(),
            dir.path(),
        )
        .unwrap_err();

        assert!(matches!(err, StockgridError::NoData { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_output_dir_is_io_error() {
        let dir = TempDir::new().unwrap();
        let port =
            MockDataPort::new().with_bars("GME", generate_bars(session_open_utc(), 2, 100.0));

        let err = run_chart_pipeline(
            &port,
            &parse_grid("GME").unwrap(),
            &sample_window(),
            &small_chart(),
            &dir.path().join("does/not/exist"),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            StockgridError::Image(_) | StockgridError::Io(_)
        ));
    }
}

mod series_and_ticks {
    use super::*;

    #[test]
    fn full_session_series_and_hour_ticks() {
        let bars = generate_bars(session_open_utc(), 196, 100.0);
        let series = SymbolSeries::from_bars(&bars);
        assert_eq!(series.len(), 196);
        assert_eq!(series.ohlc_averages.len(), 196);

        let ticks = hour_ticks(&series.timestamps);
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00"]
        );
    }
}
