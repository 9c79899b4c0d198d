//! Core domain types and logic.

pub mod boxplot;
pub mod error;
pub mod ohlcv;
pub mod series;
pub mod symbol_grid;
pub mod ticks;
pub mod trading_window;
