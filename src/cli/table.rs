//! Table formatting utilities for CLI list commands
//!
//! Every list command builds [`TableRow`]s of typed [`CellValue`]s and hands
//! them to a [`TableFormatter`], which renders aligned columns, CSV,
//! Markdown or bare keys.

use chrono::NaiveDate;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{styled_label, truncate_str};
use crate::cli::OutputFormat;
use crate::core::entity::{Labeled, Tone};

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Show summary line after table (e.g., "5 part(s) found")
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { show_summary: true }
    }
}

impl TableConfig {
    /// Create config optimized for piping (no summary)
    pub fn for_pipe() -> Self {
        Self {
            show_summary: false,
        }
    }
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Entity key (cyan colored)
    Key(String),
    /// Plain text, truncated to the column width
    Text(String),
    /// Enumeration label coloured by its tone
    Badge(&'static str, Tone),
    Date(NaiveDate),
    Number(i64),
    /// Completion percentage (green at 100, yellow above 0)
    Percent(u8),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Badge for any labeled enumeration
    pub fn badge<L: Labeled>(value: L) -> Self {
        CellValue::Badge(value.label(), value.tone())
    }

    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Text, or `Empty` when absent or blank
    pub fn opt_text(s: Option<&str>) -> Self {
        match s.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => CellValue::Text(s.to_string()),
            None => CellValue::Empty,
        }
    }

    pub fn opt_date(d: Option<NaiveDate>) -> Self {
        d.map_or(CellValue::Empty, CellValue::Date)
    }

    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        let raw = self.raw();
        let pad = width.saturating_sub(raw.chars().count());
        match self {
            CellValue::Key(k) => format!("{}{}", style(k).cyan(), " ".repeat(pad)),
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width);
                let pad = width.saturating_sub(truncated.chars().count());
                format!("{}{}", truncated, " ".repeat(pad))
            }
            CellValue::Badge(label, tone) => {
                format!("{}{}", styled_label(label, *tone), " ".repeat(pad))
            }
            CellValue::Number(_) => format!("{}{}", " ".repeat(pad), raw),
            CellValue::Percent(p) => {
                let styled = match p {
                    100 => style(&raw).green(),
                    0 => style(&raw).dim(),
                    _ => style(&raw).yellow(),
                };
                format!("{}{}", " ".repeat(pad), styled)
            }
            CellValue::Date(_) => format!("{}{}", raw, " ".repeat(pad)),
            CellValue::Empty => format!("{}{}", style("-").dim(), " ".repeat(width.saturating_sub(1))),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        match self {
            CellValue::Empty => "-".to_string(),
            _ => self.raw().replace('|', "\\|"),
        }
    }

    /// Get raw string value (no formatting, for CSV and ID output)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Key(k) => k.clone(),
            CellValue::Text(s) => s.clone(),
            CellValue::Badge(label, _) => label.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Percent(p) => format!("{}%", p),
            CellValue::Empty => String::new(),
        }
    }

    /// Get the display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Empty => 1,
            _ => self.raw().chars().count(),
        }
    }
}

/// Column definition with header label and maximum width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
pub struct TableRow {
    pub key: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(key: impl ToString) -> Self {
        Self {
            key: key.to_string(),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            config: TableConfig::default(),
        }
    }

    /// Configure the formatter with custom settings
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Output rows in the specified format
    ///
    /// JSON and YAML are handled by the caller, which serializes the
    /// entities themselves rather than their table projection.
    pub fn output<I>(&self, rows: I, format: OutputFormat) -> Result<()>
    where
        I: IntoIterator<Item = TableRow>,
    {
        let rows: Vec<TableRow> = rows.into_iter().collect();

        match format {
            OutputFormat::Csv => self.output_csv(&rows),
            OutputFormat::Md => {
                self.output_md(&rows);
                Ok(())
            }
            OutputFormat::Id => {
                for row in &rows {
                    println!("{}", row.key);
                }
                Ok(())
            }
            _ => {
                self.output_tsv(&rows);
                Ok(())
            }
        }
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);
                col.header
                    .chars()
                    .count()
                    .max(max_content.min(col.width))
            })
            .collect()
    }

    fn output_tsv(&self, rows: &[TableRow]) {
        let widths = self.calculate_widths(rows);

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| {
                let pad = w.saturating_sub(col.header.chars().count());
                format!("{}{}", style(col.header).bold(), " ".repeat(pad))
            })
            .collect();
        println!("{}", header.join("  ").trim_end());

        let total_width: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        println!("{}", "-".repeat(total_width));

        for row in rows {
            let parts: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, w)| match row.get(col.key) {
                    Some(value) => value.format_tsv(*w),
                    None => CellValue::Empty.format_tsv(*w),
                })
                .collect();
            println!("{}", parts.join("  ").trim_end());
        }

        if self.config.show_summary {
            println!();
            println!(
                "{} {}(s) found.",
                style(rows.len()).cyan(),
                self.entity_name
            );
        }
    }

    fn output_csv(&self, rows: &[TableRow]) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        wtr.write_record(self.columns.iter().map(|c| c.key))
            .into_diagnostic()?;
        for row in rows {
            wtr.write_record(
                self.columns
                    .iter()
                    .map(|c| row.get(c.key).map(CellValue::raw).unwrap_or_default()),
            )
            .into_diagnostic()?;
        }
        wtr.flush().into_diagnostic()
    }

    fn output_md(&self, rows: &[TableRow]) {
        let headers: Vec<&str> = self.columns.iter().map(|c| c.header).collect();
        println!("| {} |", headers.join(" | "));
        let separators: Vec<&str> = headers.iter().map(|_| "---").collect();
        println!("|{}|", separators.join("|"));

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|c| {
                    row.get(c.key)
                        .map(CellValue::format_md)
                        .unwrap_or_else(|| "-".to_string())
                })
                .collect();
            println!("| {} |", values.join(" | "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::part::PartStatus;

    #[test]
    fn test_cell_value_text_format() {
        let cell = CellValue::text("Hello World");
        let tsv = cell.format_tsv(20);
        assert!(tsv.contains("Hello World"));
        assert_eq!(cell.raw(), "Hello World");
        assert_eq!(cell.format_md(), "Hello World");
    }

    #[test]
    fn test_text_truncated_to_width() {
        let cell = CellValue::text("Sistema de Navegação");
        assert_eq!(console::strip_ansi_codes(&cell.format_tsv(10)), "Sistema...");
    }

    #[test]
    fn test_badge_uses_label() {
        let cell = CellValue::badge(PartStatus::InMaintenance);
        assert_eq!(cell.raw(), "EM MANUTENÇÃO");
        assert_eq!(cell.display_width(), 13);
    }

    #[test]
    fn test_empty_and_optional_cells() {
        assert_eq!(CellValue::opt_text(Some("  ")).format_md(), "-");
        assert_eq!(CellValue::opt_text(None).raw(), "");
        assert_eq!(CellValue::opt_date(None).format_md(), "-");
    }

    #[test]
    fn test_percent_and_number() {
        assert_eq!(CellValue::Percent(50).raw(), "50%");
        let n = console::strip_ansi_codes(&CellValue::Number(88).format_tsv(5)).to_string();
        assert_eq!(n, "   88");
    }

    #[test]
    fn test_cell_value_md_escapes_pipes() {
        let cell = CellValue::text("a|b|c");
        assert_eq!(cell.format_md(), "a\\|b\\|c");
    }

    #[test]
    fn test_table_row_builder() {
        let row = TableRow::new(104)
            .cell("name", CellValue::text("Seção Central"))
            .cell("status", CellValue::badge(PartStatus::InUse));

        assert_eq!(row.key, "104");
        assert!(row.get("name").is_some());
        assert!(row.get("missing").is_none());
    }

    #[test]
    fn test_widths_follow_content_up_to_cap() {
        const COLUMNS: &[ColumnDef] = &[
            ColumnDef::new("id", "ID", 6),
            ColumnDef::new("name", "NAME", 8),
        ];
        let rows = vec![TableRow::new(1)
            .cell("id", CellValue::Key("1".into()))
            .cell("name", CellValue::text("Montagem Fuselagem"))];
        let widths = TableFormatter::new(COLUMNS, "stage").calculate_widths(&rows);
        assert_eq!(widths, vec![2, 8]);
    }

    #[test]
    fn test_table_config_for_pipe() {
        assert!(TableConfig::default().show_summary);
        assert!(!TableConfig::for_pipe().show_summary);
    }
}
