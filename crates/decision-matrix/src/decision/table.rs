use serde::Serialize;

use super::engine::{DecisionEngine, RankedResult};

/// Placeholder shown for a (choice, criterion) pair without an explicit score.
pub const UNSCORED: &str = "-";

/// Rendering-agnostic result grid.
///
/// Rows are, in order: the header of choice names (first cell blank), the rank row, one row per
/// registered criterion, and the total row with scores rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DataTable {
    rows: Vec<Vec<String>>,
}

impl DataTable {
    pub(crate) fn build(engine: &DecisionEngine, results: &[RankedResult]) -> Self {
        let mut rows = Vec::with_capacity(engine.criteria().len() + 3);

        let mut header = vec![String::new()];
        header.extend(results.iter().map(|result| result.choice.name.clone()));
        rows.push(header);

        let mut ranks = vec!["Rank".to_string()];
        ranks.extend((1..=results.len()).map(|rank| format!("#{rank}")));
        rows.push(ranks);

        for criterion in engine.criteria() {
            let mut row = vec![criterion.label()];
            row.extend(results.iter().map(|result| {
                engine
                    .score_for(result.choice.id, criterion.id)
                    .map(|score| score.to_string())
                    .unwrap_or_else(|| UNSCORED.to_string())
            }));
            rows.push(row);
        }

        let mut totals = vec!["Score".to_string()];
        totals.extend(results.iter().map(|result| format_total(result.score)));
        rows.push(totals);

        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    /// Serialize the grid as CSV, one record per row.
    pub fn to_csv(&self) -> Result<String, csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| csv::Error::from(err.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Plain-text rendering with padded columns, used by the CLI.
    pub fn to_text(&self) -> String {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let widths: Vec<usize> = (0..columns)
            .map(|column| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(column))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        for row in &self.rows {
            let line = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ");
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

/// Totals are always shown with two decimals.
pub fn format_total(value: f64) -> String {
    format!("{value:.2}")
}
