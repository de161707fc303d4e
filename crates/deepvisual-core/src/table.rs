//! Relation tables: ordered `from`/`to` rows, identified by 1-based position.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A raw table cell. Numbers are kept as their textual form; whether they are labels or row
/// references is decided later by [`crate::ReferenceSyntax`].
///
/// Only integer cells read as bare row numbers. Floats always keep a fractional part or an
/// exponent (`1.0` stays `"1.0"`), so they are labels under either syntax.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum Cell {
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl Cell {
    fn into_raw(self) -> String {
        match self {
            Cell::Int(v) => v.to_string(),
            Cell::UInt(v) => v.to_string(),
            Cell::Float(v) => format!("{v:?}"),
            Cell::Text(s) => s,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RowRepr {
    Named { from: Cell, to: Cell },
    Pair(Cell, Cell),
    // The triplet layout keeps a middle `verb` column; link-doublet rows ignore it.
    Triple(Cell, Cell, Cell),
}

impl From<RowRepr> for Row {
    fn from(value: RowRepr) -> Self {
        match value {
            RowRepr::Named { from, to } | RowRepr::Pair(from, to) | RowRepr::Triple(from, _, to) => {
                Row::new(from.into_raw(), to.into_raw())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RowRepr")]
pub struct Row {
    pub from: String,
    pub to: String,
}

impl Row {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            rows: pairs.into_iter().map(|(a, b)| Row::new(a, b)).collect(),
        }
    }

    /// Parses a JSON array of rows. Each row is either `{"from": .., "to": ..}` or a
    /// `[from, to]` / `[from, verb, to]` array; cells may be strings or numbers.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidTable {
            message: e.to_string(),
        })
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates rows together with their 1-based relation id.
    pub fn iter_with_ids(&self) -> impl Iterator<Item = (u32, &Row)> {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| ((idx + 1) as u32, row))
    }
}

#[cfg(test)]
mod tests {
    use super::{Row, Table};

    #[test]
    fn parses_named_and_positional_rows() {
        let table = Table::from_json_str(
            r##"[
                {"from": "A", "to": "A"},
                ["B", "B"],
                {"from": 1, "to": 2},
                ["#1", "rel", "#2"]
            ]"##,
        )
        .unwrap();
        assert_eq!(
            table.rows(),
            &[
                Row::new("A", "A"),
                Row::new("B", "B"),
                Row::new("1", "2"),
                Row::new("#1", "#2"),
            ]
        );
    }

    #[test]
    fn float_cells_never_look_like_integers() {
        let table = Table::from_json_str(r#"[[1.0, 2.5], [1e20, -0.0]]"#).unwrap();
        assert_eq!(
            table.rows(),
            &[Row::new("1.0", "2.5"), Row::new("1e20", "-0.0")]
        );
    }

    #[test]
    fn large_unsigned_cells_stay_exact() {
        let table = Table::from_json_str(r#"[[18446744073709551615, 7]]"#).unwrap();
        assert_eq!(table.rows(), &[Row::new("18446744073709551615", "7")]);
    }

    #[test]
    fn float_cells_are_not_positional_references() {
        let table = Table::from_json_str(r#"[["A", "A"], ["B", "B"], [1.0, 2.0]]"#).unwrap();
        let res = crate::resolve_tiers(&table, crate::ReferenceSyntax::Positional);
        assert_eq!(res.tier_of(3), None);
        assert_eq!(res.unresolved_ids(), vec![3]);
    }

    #[test]
    fn rejects_rows_without_two_columns() {
        let err = Table::from_json_str(r#"[["A"]]"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid relation table"));
    }

    #[test]
    fn ids_are_one_based_row_positions() {
        let table = Table::from_pairs([("A", "A"), ("B", "B")]);
        let ids: Vec<u32> = table.iter_with_ids().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
