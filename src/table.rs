//! Solution tables and their record-shaped labels.
//!
//! A [`SolutionTable`] is a sequence of sequences of scalar [`Cell`]s. Each inner
//! sequence becomes one column group of a Graphviz record label, so for a table
//! stored row by row set `transpose` to turn rows into column groups:
//!
//! ```text
//! {top label|{{v1|0|1}|{v2|1|1}|{count|3|5}}|bottom label}
//! ```
//!
//! Large tables are shortened rather than cut: surplus lines and columns are
//! replaced by a single `...` line or column, and the last line and column are
//! always kept (the last column usually holds the per-row result, e.g. a model count).

use std::fmt;

use num_bigint::BigInt;
use serde::Deserialize;

use crate::error::{Result, VisuError};

const FILL: &str = "...";

/// A scalar value in a solution table.
///
/// JSON integers above `i64::MAX` land in [`Cell::UInt`]; larger counts are
/// passed as decimal strings and still summed exactly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// The value as an arbitrary precision integer, if it is one.
    pub fn as_bigint(&self) -> Option<BigInt> {
        match self {
            Cell::Int(i) => Some(BigInt::from(*i)),
            Cell::UInt(u) => Some(BigInt::from(*u)),
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::UInt(u) => write!(f, "{}", u),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::UInt(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// Truncation limits for rendered tables. Non-positive values disable a limit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TableLimits {
    /// Maximum number of leading lines kept in each column group.
    pub lines_max: i64,
    /// Maximum number of column groups (including the kept last one).
    pub columns_max: i64,
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            lines_max: 100,
            columns_max: 20,
        }
    }
}

/// A solution table bound to one timeline step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolutionTable {
    header: Option<Vec<Cell>>,
    sequences: Vec<Vec<Cell>>,
    top: Option<String>,
    bottom: Option<String>,
    transpose: bool,
}

impl SolutionTable {
    pub fn new(sequences: Vec<Vec<Cell>>) -> Self {
        Self {
            sequences,
            ..Self::default()
        }
    }

    /// Sets a header sequence placed before all other sequences.
    pub fn with_header(mut self, header: Vec<Cell>) -> Self {
        self.header = Some(header);
        self
    }

    pub fn with_top(mut self, top: impl Into<String>) -> Self {
        self.top = Some(top.into());
        self
    }

    pub fn with_bottom(mut self, bottom: impl Into<String>) -> Self {
        self.bottom = Some(bottom.into());
        self
    }

    pub fn with_transpose(mut self, transpose: bool) -> Self {
        self.transpose = transpose;
        self
    }

    pub fn top(&self) -> Option<&str> {
        self.top.as_deref()
    }

    pub fn bottom(&self) -> Option<&str> {
        self.bottom.as_deref()
    }

    pub fn transpose(&self) -> bool {
        self.transpose
    }

    /// Header (if any) followed by the data sequences, as stored.
    pub fn sequences(&self) -> impl Iterator<Item = &Vec<Cell>> {
        self.header.iter().chain(self.sequences.iter())
    }

    /// Checks that all sequences (header included) have equal length.
    pub fn check_shape(&self) -> Result<()> {
        let mut sequences = self.sequences();
        let expected = match sequences.next() {
            Some(first) => first.len(),
            None => return Ok(()),
        };
        for (row, seq) in sequences.enumerate() {
            if seq.len() != expected {
                return Err(VisuError::TableShape {
                    row: row + 1,
                    expected,
                    found: seq.len(),
                });
            }
        }
        Ok(())
    }

    /// Returns the table with rows and columns swapped.
    ///
    /// The header is folded into the data. The `transpose` flag and the labels are
    /// kept unchanged, so transposing twice restores shape and content of a table
    /// without header.
    pub fn transposed(&self) -> Result<Self> {
        self.check_shape()?;
        Ok(Self {
            header: None,
            sequences: swap_axes(self.sequences().cloned().collect()),
            top: self.top.clone(),
            bottom: self.bottom.clone(),
            transpose: self.transpose,
        })
    }

    /// The column groups as rendered: header and data, transposed if requested.
    pub fn rendered_groups(&self) -> Result<Vec<Vec<Cell>>> {
        self.check_shape()?;
        let groups: Vec<Vec<Cell>> = self.sequences().cloned().collect();
        Ok(if self.transpose { swap_axes(groups) } else { groups })
    }

    /// Renders the table as a record label.
    ///
    /// # Errors
    ///
    /// [`VisuError::TableShape`] if the sequences have different lengths.
    pub fn format(&self, limits: TableLimits) -> Result<String> {
        let groups = self.rendered_groups()?;

        let mut result = String::from("{");
        if let Some(top) = self.top.as_deref().filter(|s| !s.is_empty()) {
            result.push_str(&escape_record(top));
            result.push('|');
        }

        if groups.is_empty() || groups[0].is_empty() {
            result.push_str("empty");
        } else {
            let columns = truncate(groups, limits.columns_max, |first| vec![Cell::from(FILL); first.len()]);
            let rendered: Vec<String> = columns
                .iter()
                .map(|column| {
                    let lines: Vec<String> = column.iter().map(|cell| escape_record(&cell.to_string())).collect();
                    let lines = truncate(lines, limits.lines_max.saturating_add(1), |_| FILL.to_string());
                    format!("{{{}}}", lines.join("|"))
                })
                .collect();
            result.push('{');
            result.push_str(&rendered.join("|"));
            result.push('}');
        }

        if let Some(bottom) = self.bottom.as_deref().filter(|s| !s.is_empty()) {
            result.push('|');
            result.push_str(&escape_record(bottom));
        }
        result.push('}');
        Ok(result)
    }
}

/// Keeps at most `max` entries: the first `max - 1`, one filler, and the last one.
///
/// The filler is built from the first entry and only inserted when something is
/// dropped; `max <= 0` keeps all. For line truncation the caller passes
/// `lines_max + 1`, so `lines_max` leading lines survive next to the last one.
fn truncate<T: Clone>(items: Vec<T>, max: i64, filler: impl Fn(&T) -> T) -> Vec<T> {
    if max <= 0 || items.len() as i64 <= max {
        return items;
    }
    let keep = (max - 1) as usize;
    let mut result: Vec<T> = items[..keep].to_vec();
    result.push(filler(&items[0]));
    if let Some(last) = items.last() {
        result.push(last.clone());
    }
    result
}

fn swap_axes(sequences: Vec<Vec<Cell>>) -> Vec<Vec<Cell>> {
    let width = sequences.first().map_or(0, Vec::len);
    (0..width)
        .map(|i| sequences.iter().map(|seq| seq[i].clone()).collect())
        .collect()
}

/// Escapes characters with a meaning inside record labels.
pub fn escape_record(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '{' | '}' | '|' | '<' | '>' | '\\') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// Footer computed from the last column of a solution table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Summary {
    /// Sum of all counts, e.g. the model count of #SAT: `"sum: N"`.
    Sum,
    /// Smallest value, e.g. the minimum vertex cover size: `"min-size: N"`.
    Min,
}

impl Summary {
    /// Summarizes the integer cells of the last rendered column.
    ///
    /// Non-integer cells (such as a column name) are skipped. Returns `None` for
    /// [`Summary::Min`] if there is no integer cell.
    pub fn footer(self, table: &SolutionTable) -> Result<Option<String>> {
        let groups = table.rendered_groups()?;
        let values: Vec<BigInt> = groups
            .last()
            .map(|column| column.iter().filter_map(Cell::as_bigint).collect())
            .unwrap_or_default();
        Ok(match self {
            Summary::Sum => Some(format!("sum: {}", values.iter().sum::<BigInt>())),
            Summary::Min => values.into_iter().min().map(|min| format!("min-size: {}", min)),
        })
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn text(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|&v| Cell::from(v)).collect()
    }

    fn grid(columns: usize, lines: usize) -> SolutionTable {
        SolutionTable::new(
            (0..columns)
                .map(|c| (0..lines).map(|l| Cell::from(format!("{}L{}C", l, c))).collect())
                .collect(),
        )
    }

    #[test]
    fn test_join_table() {
        let table = SolutionTable::new(vec![text(&["v1"]), vec![Cell::Int(0)], vec![Cell::Int(1)]])
            .with_top("sol Join 3~4")
            .with_bottom("sum: 2");
        let label = table.format(TableLimits::default()).unwrap();
        assert_eq!(label, "{sol Join 3~4|{{v1}|{0}|{1}}|sum: 2}");
    }

    #[test]
    fn test_transpose_flag() {
        let table = SolutionTable::new(vec![text(&["v1", "v2", "n"]), vec![Cell::Int(0), Cell::Int(1), Cell::Int(3)]])
            .with_transpose(true);
        let label = table.format(TableLimits::default()).unwrap();
        assert_eq!(label, "{{{v1|0}|{v2|1}|{n|3}}}");
    }

    #[test]
    fn test_empty() {
        let table = SolutionTable::new(vec![]).with_top("top");
        assert_eq!(table.format(TableLimits::default()).unwrap(), "{top|empty}");
    }

    #[test]
    fn test_jagged() {
        let table = SolutionTable::new(vec![text(&["a", "b"]), text(&["c"])]);
        let err = table.format(TableLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            VisuError::TableShape {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_truncate_lines() {
        let limits = TableLimits {
            lines_max: 2,
            columns_max: 0,
        };
        let label = grid(1, 5).format(limits).unwrap();
        assert_eq!(label, "{{{0L0C|1L0C|...|4L0C}}}");

        // Exactly lines_max + 1 lines fit without filler.
        let label = grid(1, 3).format(limits).unwrap();
        assert_eq!(label, "{{{0L0C|1L0C|2L0C}}}");
    }

    #[test]
    fn test_truncate_columns() {
        let limits = TableLimits {
            lines_max: 0,
            columns_max: 3,
        };
        let label = grid(5, 2).format(limits).unwrap();
        assert_eq!(label, "{{{0L0C|1L0C}|{0L1C|1L1C}|{...|...}|{0L4C|1L4C}}}");

        let label = grid(3, 2).format(limits).unwrap();
        assert_eq!(label.matches('{').count(), 2 + 3);
    }

    #[test]
    fn test_truncate_both() {
        let limits = TableLimits {
            lines_max: 1,
            columns_max: 2,
        };
        let label = grid(4, 4).format(limits).unwrap();
        assert_eq!(label, "{{{0L0C|...|3L0C}|{...|...|...}|{0L3C|...|3L3C}}}");
    }

    #[test]
    fn test_escape() {
        let table = SolutionTable::new(vec![text(&["a|b", "{c}"])]).with_bottom("x<y");
        let label = table.format(TableLimits::default()).unwrap();
        assert_eq!(label, r"{{{a\|b|\{c\}}}|x\<y}");
    }

    #[test]
    fn test_transposed_twice() {
        let table = grid(3, 4);
        let back = table.transposed().unwrap().transposed().unwrap();
        assert_eq!(back, table);
        assert_eq!(table.transposed().unwrap().sequences().count(), 4);
    }

    #[test]
    fn test_header() {
        let table = SolutionTable::new(vec![vec![Cell::Int(0), Cell::Int(5)]])
            .with_header(text(&["v1", "n"]))
            .with_transpose(true);
        assert_eq!(table.format(TableLimits::default()).unwrap(), "{{{v1|0}|{n|5}}}");
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Null.to_string(), "");
        assert_eq!(Cell::Bool(true).to_string(), "true");
        assert_eq!(Cell::Float(1.5).to_string(), "1.5");
        let cells: Vec<Cell> = serde_json::from_str(r#"[null, false, 3, 2.5, "x"]"#).unwrap();
        assert_eq!(
            cells,
            vec![Cell::Null, Cell::Bool(false), Cell::Int(3), Cell::Float(2.5), Cell::from("x")]
        );
    }

    #[test]
    fn test_summary() {
        // Row-major table: header row plus two rows, transposed into columns.
        let table = SolutionTable::new(vec![
            text(&["v1", "model_count"]),
            vec![Cell::Int(0), Cell::from("18446744073709551615")],
            vec![Cell::Int(1), Cell::Int(1)],
        ])
        .with_transpose(true);

        let sum = Summary::Sum.footer(&table).unwrap();
        assert_eq!(sum.as_deref(), Some("sum: 18446744073709551616"));
        let min = Summary::Min.footer(&table).unwrap();
        assert_eq!(min.as_deref(), Some("min-size: 1"));

        let empty = SolutionTable::new(vec![]);
        assert_eq!(Summary::Sum.footer(&empty).unwrap().as_deref(), Some("sum: 0"));
        assert_eq!(Summary::Min.footer(&empty).unwrap(), None);
    }

    #[test]
    fn test_unsigned_cell() {
        let rows: Vec<Vec<Cell>> =
            serde_json::from_str(r#"[["v1", "count"], [0, 18446744073709551615], [1, 1]]"#).unwrap();
        assert_eq!(rows[1][1], Cell::UInt(u64::MAX));
        assert_eq!(rows[2][1], Cell::Int(1));

        let table = SolutionTable::new(rows).with_transpose(true);
        let label = table.format(TableLimits::default()).unwrap();
        assert_eq!(label, "{{{v1|0|1}|{count|18446744073709551615|1}}}");
        let sum = Summary::Sum.footer(&table).unwrap();
        assert_eq!(sum.as_deref(), Some("sum: 18446744073709551616"));
        let min = Summary::Min.footer(&table).unwrap();
        assert_eq!(min.as_deref(), Some("min-size: 1"));
    }
}
