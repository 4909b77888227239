use crate::file::TextExtractor;
use crate::models::ExtractOptions;
use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::debug;

/// Excel workbook handler (.xlsx and .xls)
///
/// Cells are read as stored values; formulas contribute their cached result,
/// never the formula text.
pub struct SpreadsheetExtractor;

impl SpreadsheetExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Render one sheet: a `Sheet: <name>` header, one line per non-empty row, then a blank line
    pub fn render_sheet<I, R>(name: &str, rows: I) -> Vec<String>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = String>,
    {
        let mut lines = vec![format!("Sheet: {}", name)];
        for row in rows {
            let cells: Vec<String> = row
                .into_iter()
                .filter(|cell| !cell.trim().is_empty())
                .collect();
            if !cells.is_empty() {
                lines.push(cells.join(" "));
            }
        }
        lines.push(String::new());
        lines
    }

    fn cell_text(cell: &Data) -> String {
        match cell {
            Data::Empty => String::new(),
            other => other.to_string(),
        }
    }
}

impl Default for SpreadsheetExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for SpreadsheetExtractor {
    fn extract(&self, path: &Path, _options: &ExtractOptions) -> Result<String> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

        let mut lines = Vec::new();
        for name in workbook.sheet_names() {
            let rows: Vec<Vec<String>> = match workbook.worksheet_range(&name) {
                Ok(range) => range
                    .rows()
                    .map(|row| row.iter().map(Self::cell_text).collect())
                    .collect(),
                Err(e) => {
                    debug!(sheet = %name, error = %e, "Skipping unreadable worksheet");
                    Vec::new()
                }
            };
            lines.extend(Self::render_sheet(&name, rows));
        }

        Ok(lines.join("\n"))
    }

    fn name(&self) -> &'static str {
        "calamine"
    }
}
