//! Symbol grid: which tickers to chart and where each subplot goes.
//!
//! Each group becomes one row of the figure; the symbols of a group are laid
//! out left to right. Groups may have different lengths, the figure is as
//! wide as the longest one.

use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;

pub const GROUP_SEPARATOR: &str = "/";

pub const DEFAULT_GRID: &[&[&str]] = &[&["GME", "AMC"], &["MSFT", "NOK"]];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolGrid {
    groups: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("symbol grid is empty")]
    EmptyGrid,

    #[error("empty group in symbol grid")]
    EmptyGroup,

    #[error("empty symbol in symbol grid")]
    EmptySymbol,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

/// One subplot slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell<'a> {
    pub row: usize,
    pub col: usize,
    pub symbol: &'a str,
}

impl SymbolGrid {
    pub fn new(groups: Vec<Vec<String>>) -> Result<Self, GridError> {
        if groups.is_empty() {
            return Err(GridError::EmptyGrid);
        }
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(groups.len());
        for group in groups {
            if group.is_empty() {
                return Err(GridError::EmptyGroup);
            }
            let mut row = Vec::with_capacity(group.len());
            for symbol in group {
                let symbol = symbol.trim().to_uppercase();
                if symbol.is_empty() {
                    return Err(GridError::EmptySymbol);
                }
                if !seen.insert(symbol.clone()) {
                    return Err(GridError::DuplicateSymbol(symbol));
                }
                row.push(symbol);
            }
            normalized.push(row);
        }
        Ok(Self { groups: normalized })
    }

    /// Symbols in fetch order: group by group, left to right.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().flatten().map(String::as_str)
    }

    pub fn count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// (rows, cols) of the subplot layout.
    pub fn shape(&self) -> (usize, usize) {
        let cols = self.groups.iter().map(Vec::len).max().unwrap_or(0);
        (self.groups.len(), cols)
    }

    pub fn cells(&self) -> impl Iterator<Item = GridCell<'_>> {
        self.groups.iter().enumerate().flat_map(|(row, group)| {
            group.iter().enumerate().map(move |(col, symbol)| GridCell {
                row,
                col,
                symbol: symbol.as_str(),
            })
        })
    }

    /// `StockValues_<date>_<SYM>_..._.png`; every symbol is followed by `_`.
    pub fn output_filename(&self, date: NaiveDate) -> String {
        let mut name = format!("StockValues_{}_", date.format("%Y-%m-%d"));
        for symbol in self.symbols() {
            name.push_str(symbol);
            name.push('_');
        }
        name.push_str(".png");
        name
    }
}

impl Default for SymbolGrid {
    fn default() -> Self {
        Self {
            groups: DEFAULT_GRID
                .iter()
                .map(|g| g.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }
}

impl fmt::Display for SymbolGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self.groups.iter().map(|g| g.join(",")).collect();
        write!(f, "{}", rows.join(GROUP_SEPARATOR))
    }
}

/// Parses `"GME,AMC/MSFT,NOK"`: groups split on `/`, symbols on `,`.
pub fn parse_grid(input: &str) -> Result<SymbolGrid, GridError> {
    if input.trim().is_empty() {
        return Err(GridError::EmptyGrid);
    }
    let groups = input
        .split(GROUP_SEPARATOR)
        .map(|group| {
            if group.trim().is_empty() {
                return Err(GridError::EmptyGroup);
            }
            Ok(group.split(',').map(str::to_string).collect())
        })
        .collect::<Result<Vec<Vec<String>>, GridError>>()?;
    SymbolGrid::new(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(groups: &[&[&str]]) -> SymbolGrid {
        SymbolGrid::new(
            groups
                .iter()
                .map(|g| g.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn filename_for_default_grid() {
        let date = NaiveDate::from_ymd_opt(2021, 2, 26).unwrap();
        let g = grid(&[&["GME", "AMC"], &["MSFT", "NOK"]]);
        assert_eq!(
            g.output_filename(date),
            "StockValues_2021-02-26_GME_AMC_MSFT_NOK_.png"
        );
        assert_eq!(SymbolGrid::default(), g);
    }

    #[test]
    fn filename_single_symbol() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(
            grid(&[&["AAPL"]]).output_filename(date),
            "StockValues_2024-01-02_AAPL_.png"
        );
    }

    #[test]
    fn symbols_flatten_in_grid_order() {
        let g = grid(&[&["GME", "AMC"], &["MSFT", "NOK"]]);
        let symbols: Vec<&str> = g.symbols().collect();
        assert_eq!(symbols, vec!["GME", "AMC", "MSFT", "NOK"]);
        assert_eq!(g.count(), 4);
    }

    #[test]
    fn cells_are_row_major() {
        let g = grid(&[&["GME", "AMC"], &["MSFT", "NOK"]]);
        let cells: Vec<(usize, usize, &str)> =
            g.cells().map(|c| (c.row, c.col, c.symbol)).collect();
        assert_eq!(
            cells,
            vec![(0, 0, "GME"), (0, 1, "AMC"), (1, 0, "MSFT"), (1, 1, "NOK")]
        );
    }

    #[test]
    fn shape_uses_longest_group() {
        let g = grid(&[&["GME"], &["MSFT", "NOK", "AAPL"]]);
        assert_eq!(g.shape(), (2, 3));
    }

    #[test]
    fn parse_grid_basic() {
        let g = parse_grid("GME,AMC/MSFT,NOK").unwrap();
        assert_eq!(g, SymbolGrid::default());
    }

    #[test]
    fn parse_grid_trims_and_uppercases() {
        let g = parse_grid("  gme , amc /  msft,nok ").unwrap();
        assert_eq!(g, SymbolGrid::default());
        assert_eq!(g.to_string(), "GME,AMC/MSFT,NOK");
    }

    #[test]
    fn parse_grid_single_group() {
        let g = parse_grid("TSLA").unwrap();
        assert_eq!(g.shape(), (1, 1));
    }

    #[test]
    fn parse_grid_empty_input() {
        assert_eq!(parse_grid("   "), Err(GridError::EmptyGrid));
    }

    #[test]
    fn parse_grid_empty_group() {
        assert_eq!(parse_grid("GME//NOK"), Err(GridError::EmptyGroup));
    }

    #[test]
    fn parse_grid_empty_symbol() {
        assert_eq!(parse_grid("GME,,AMC"), Err(GridError::EmptySymbol));
    }

    #[test]
    fn parse_grid_duplicate() {
        assert_eq!(
            parse_grid("GME,AMC/gme"),
            Err(GridError::DuplicateSymbol("GME".into()))
        );
    }
}
