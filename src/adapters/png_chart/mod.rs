//! PNG figure with one boxplot subplot per symbol.
//!
//! A [`Figure`] is created once per run with the grid shape, receives every
//! subplot through [`Figure::draw_subplot`], and is written out by
//! [`Figure::save`], which consumes it.

pub mod canvas;
pub mod font;

use crate::domain::boxplot::{BoxStats, candle_colors};
use crate::domain::error::StockgridError;
use crate::domain::series::SymbolSeries;
use crate::domain::ticks::hour_ticks;
use canvas::{colors, fill_rect, horizontal_line, rgb, stroke_rect, vertical_line};
use font::{GLYPH_HEIGHT, draw_text, draw_text_vertical, text_width};
use image::RgbImage;
use log::debug;
use std::path::Path;

/// 16x10 inches at 100 dpi.
pub const DEFAULT_WIDTH: u32 = 1600;
pub const DEFAULT_HEIGHT: u32 = 1000;

const TEXT_SCALE: i64 = 2;
const MARGIN_LEFT: i64 = 110;
const MARGIN_RIGHT: i64 = 24;
const MARGIN_TOP: i64 = 40;
const MARGIN_BOTTOM: i64 = 64;
const TICK_LEN: i64 = 5;
const Y_TICKS: usize = 5;
/// Box width in bar units.
const BOX_WIDTH: f64 = 0.5;
/// Cap width relative to the box.
const CAP_RATIO: f64 = 0.5;
/// Fraction of the price range added above and below.
const Y_PAD: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

pub struct Figure {
    img: RgbImage,
    rows: usize,
    cols: usize,
    subplots: usize,
    boxplots: usize,
}

/// Pixel rectangle of one subplot's data area plus its value range.
struct PlotArea {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
    bars: usize,
    y_min: f64,
    y_max: f64,
}

impl PlotArea {
    /// Centre of bar `pos`; the x range is [-0.5, bars - 0.5].
    fn x(&self, pos: f64) -> i64 {
        let w = (self.right - self.left) as f64;
        self.left + ((pos + 0.5) / self.bars.max(1) as f64 * w).round() as i64
    }

    fn y(&self, value: f64) -> i64 {
        let h = (self.bottom - self.top) as f64;
        let t = (value - self.y_min) / (self.y_max - self.y_min);
        self.bottom - (t * h).round() as i64
    }

    fn unit_px(&self) -> f64 {
        (self.right - self.left) as f64 / self.bars.max(1) as f64
    }
}

impl Figure {
    pub fn new(config: &ChartConfig, shape: (usize, usize)) -> Self {
        let (rows, cols) = shape;
        Self {
            img: RgbImage::from_pixel(config.width.max(1), config.height.max(1), colors::WHITE),
            rows: rows.max(1),
            cols: cols.max(1),
            subplots: 0,
            boxplots: 0,
        }
    }

    pub fn subplot_count(&self) -> usize {
        self.subplots
    }

    pub fn boxplot_count(&self) -> usize {
        self.boxplots
    }

    pub fn image(&self) -> &RgbImage {
        &self.img
    }

    /// Draws the subplot at (row, col) and returns how many boxplots it holds.
    pub fn draw_subplot(
        &mut self,
        row: usize,
        col: usize,
        title: &str,
        series: &SymbolSeries,
    ) -> usize {
        let cell_w = i64::from(self.img.width()) / self.cols as i64;
        let cell_h = i64::from(self.img.height()) / self.rows as i64;
        let cell_x = col as i64 * cell_w;
        let cell_y = row as i64 * cell_h;

        let (y_min, y_max) = padded_range(series.price_range());
        let left = cell_x + MARGIN_LEFT;
        let top = cell_y + MARGIN_TOP;
        let area = PlotArea {
            left,
            top,
            right: (cell_x + cell_w - MARGIN_RIGHT).max(left + 1),
            bottom: (cell_y + cell_h - MARGIN_BOTTOM).max(top + 1),
            bars: series.len(),
            y_min,
            y_max,
        };

        self.draw_decorations(&area, cell_x, cell_w, cell_y, title);
        self.draw_y_ticks(&area);
        self.draw_x_ticks(&area, series);

        let mut drawn = 0;
        for (i, sample) in series.ohlc.iter().enumerate() {
            let Some(stats) = BoxStats::from_sample(sample) else {
                debug!("{}: bar {} has no drawable sample", title, i);
                continue;
            };
            let candle = candle_colors(series.opens[i], series.closes[i]);
            self.draw_boxplot(&area, i, &stats, candle.outline, candle.fill);
            drawn += 1;
        }

        stroke_rect(
            &mut self.img,
            area.left,
            area.top,
            area.right,
            area.bottom,
            colors::BLACK,
        );

        self.subplots += 1;
        self.boxplots += drawn;
        drawn
    }

    fn draw_decorations(
        &mut self,
        area: &PlotArea,
        cell_x: i64,
        cell_w: i64,
        cell_y: i64,
        title: &str,
    ) {
        let title_x = cell_x + (cell_w - text_width(title, TEXT_SCALE)) / 2;
        let title_y = cell_y + (MARGIN_TOP - GLYPH_HEIGHT * TEXT_SCALE) / 2;
        draw_text(&mut self.img, title_x, title_y, title, TEXT_SCALE, colors::BLACK);

        let x_label = "Time";
        let x_label_x = (area.left + area.right - text_width(x_label, TEXT_SCALE)) / 2;
        let x_label_y = area.bottom + TICK_LEN + 2 * GLYPH_HEIGHT * TEXT_SCALE + 2;
        draw_text(&mut self.img, x_label_x, x_label_y, x_label, TEXT_SCALE, colors::BLACK);

        let y_label = "Value";
        let y_label_y = (area.top + area.bottom + text_width(y_label, TEXT_SCALE)) / 2;
        draw_text_vertical(&mut self.img, cell_x + 4, y_label_y, y_label, TEXT_SCALE, colors::BLACK);
    }

    fn draw_y_ticks(&mut self, area: &PlotArea) {
        for k in 0..Y_TICKS {
            let value = area.y_min + (area.y_max - area.y_min) * k as f64 / (Y_TICKS - 1) as f64;
            let y = area.y(value);
            horizontal_line(&mut self.img, y, area.left + 1, area.right - 1, colors::GRID_GRAY);
            horizontal_line(&mut self.img, y, area.left - TICK_LEN, area.left, colors::BLACK);

            let label = format!("{:.2}", value);
            let lx = area.left - TICK_LEN - 4 - text_width(&label, TEXT_SCALE);
            let ly = y - GLYPH_HEIGHT * TEXT_SCALE / 2;
            draw_text(&mut self.img, lx, ly, &label, TEXT_SCALE, colors::BLACK);
        }
    }

    fn draw_x_ticks(&mut self, area: &PlotArea, series: &SymbolSeries) {
        for tick in hour_ticks(&series.timestamps) {
            let x = area.x(tick.position as f64);
            vertical_line(&mut self.img, x, area.bottom, area.bottom + TICK_LEN, colors::BLACK);

            let lx = x - text_width(&tick.label, TEXT_SCALE) / 2;
            let ly = area.bottom + TICK_LEN + 3;
            draw_text(&mut self.img, lx, ly, &tick.label, TEXT_SCALE, colors::BLACK);
        }
    }

    fn draw_boxplot(
        &mut self,
        area: &PlotArea,
        pos: usize,
        stats: &BoxStats,
        outline: [u8; 3],
        fill: [u8; 3],
    ) {
        let outline = rgb(outline);
        let fill = rgb(fill);
        let cx = area.x(pos as f64);
        let half_box = ((BOX_WIDTH * area.unit_px()) / 2.0).round().max(1.0) as i64;
        let half_cap = ((half_box as f64) * CAP_RATIO).round().max(1.0) as i64;

        let (y_q1, y_q3) = (area.y(stats.q1), area.y(stats.q3));
        let (y_lo, y_hi) = (area.y(stats.whisker_low), area.y(stats.whisker_high));

        vertical_line(&mut self.img, cx, y_q1, y_lo, outline);
        vertical_line(&mut self.img, cx, y_q3, y_hi, outline);
        horizontal_line(&mut self.img, y_lo, cx - half_cap, cx + half_cap, outline);
        horizontal_line(&mut self.img, y_hi, cx - half_cap, cx + half_cap, outline);

        fill_rect(&mut self.img, cx - half_box, y_q3, cx + half_box, y_q1, fill);
        stroke_rect(&mut self.img, cx - half_box, y_q3, cx + half_box, y_q1, outline);
        horizontal_line(&mut self.img, area.y(stats.median), cx - half_box, cx + half_box, outline);
    }

    /// Writes the figure as PNG, replacing any existing file.
    pub fn save(self, path: &Path) -> Result<(), StockgridError> {
        self.img.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

fn padded_range(range: Option<(f64, f64)>) -> (f64, f64) {
    match range {
        Some((lo, hi)) if hi > lo => {
            let pad = (hi - lo) * Y_PAD;
            (lo - pad, hi + pad)
        }
        Some((v, _)) if v.is_finite() => {
            let pad = if v == 0.0 { 1.0 } else { v.abs() * Y_PAD };
            (v - pad, v + pad)
        }
        _ => (0.0, 1.0),
    }
}
