//! Shared compose specification models.

use std::fmt;

use serde::Deserialize;

use crate::error::{ComposeError, Result};

////////////////////////////////////////////////////////////////////////////////
// #region InputSpecification

/// Top-level payload: output file name plus ordered sheet declarations.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecWorkbookInput {
    /// Requested output file name (informational for the engine).
    pub file_name: String,
    /// Sheets in document order. The first maps onto the default sheet.
    pub sheets: Vec<SpecSheetInput>,
}

/// One declared sheet.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecSheetInput {
    /// Sheet name. Empty means auto-generate from the sheet index.
    pub name: String,
    /// Merge regions as `(top_left, bottom_right)` A1-style pairs.
    pub merged_cells: Vec<(String, String)>,
    /// Individually styled rich-text cells.
    pub cell_data: Vec<SpecStyledCellInput>,
    /// Optional auto-laid-out table block.
    pub table_export: Option<SpecTableExport>,
}

/// A single rich-text cell declaration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecStyledCellInput {
    /// A1-style target reference.
    pub cell: String,
    /// Cell text.
    pub text: String,
    /// Font family; empty keeps the writer default.
    pub font_family: String,
    /// Font size in points; zero keeps the writer default.
    pub font_size: f64,
    /// Bold style.
    pub is_bold: bool,
    /// Italic style.
    pub is_italic: bool,
    /// Font color as hex (`#RRGGBB`); empty keeps the writer default.
    pub color: String,
}

/// Serial-number column settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecSerialNumbers {
    /// Inject a leftmost serial-number column.
    pub auto_add: bool,
    /// Header text of the serial column.
    pub title: String,
}

/// Table heading settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecTableHeading {
    /// When set, the first data row doubles as the header row.
    pub first_row_of_table_data: bool,
    /// Standalone header titles (ignored when the first row is the header).
    pub heading_titles: Vec<String>,
    /// Bold style for header cells.
    pub is_bold: bool,
}

/// Table block laid out from a start cell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecTableExport {
    /// A1-style top-left anchor, including the serial column.
    pub table_starts: String,
    /// Serial-number column settings.
    pub serial_numbers: SpecSerialNumbers,
    /// Heading settings.
    pub table_heading: SpecTableHeading,
    /// Raw rows; may be ragged.
    pub table_data: Vec<Vec<String>>,
}

impl SpecTableExport {
    /// `true` when the block declares nothing at all.
    ///
    /// Clients serialize an empty `tableExport` object for sheets without a
    /// table; such blocks are skipped rather than decoded.
    pub fn is_blank(&self) -> bool {
        self.table_starts.is_empty()
            && !self.serial_numbers.auto_add
            && self.table_heading.heading_titles.is_empty()
            && self.table_data.is_empty()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellSpecification

/// 1-indexed `(column, row)` cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellReference {
    /// Column number, `A` = 1.
    pub col: u32,
    /// Row number, first row = 1.
    pub row: u32,
}

impl CellReference {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::util::format_cell_name(*self))
    }
}

/// Typed value stored in a plain cell.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Whole number.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// Literal text.
    Text(String),
}

/// Font attributes of one rich-text run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecFontStyle {
    /// Font family name.
    pub family: Option<String>,
    /// Font size in points.
    pub size: Option<f64>,
    /// Bold style.
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
    /// Font color as hex string.
    pub color: Option<String>,
}

impl SpecFontStyle {
    /// Font with only the bold flag set, as used by table header cells.
    pub fn with_bold(bold: bool) -> Self {
        Self {
            bold,
            ..Default::default()
        }
    }
}

/// Single styled text run written into one cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecRichTextRun {
    /// Run text.
    pub text: String,
    /// Run font.
    pub font: SpecFontStyle,
}

impl From<&SpecStyledCellInput> for SpecRichTextRun {
    fn from(cell: &SpecStyledCellInput) -> Self {
        Self {
            text: cell.text.clone(),
            font: SpecFontStyle {
                family: Some(cell.font_family.clone()).filter(|val| !val.is_empty()),
                size: Some(cell.font_size).filter(|val| *val > 0.0),
                bold: cell.is_bold,
                italic: cell.is_italic,
                color: Some(cell.color.clone()).filter(|val| !val.is_empty()),
            },
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ComposeOptions

/// Storage policy for raw table values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumValueInferMode {
    /// Store integers and floats as numbers, everything else as text.
    #[default]
    Infer,
    /// Store every table value as literal text.
    Text,
}

/// Options shared by one compose call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecComposeOptions {
    /// Prefix for auto-generated sheet names (`Sheet` -> `Sheet2`).
    pub sheet_name_prefix: String,
    /// Table value storage policy.
    pub value_infer_mode: EnumValueInferMode,
}

impl Default for SpecComposeOptions {
    fn default() -> Self {
        crate::conf::derive_default_compose_options()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LayoutSpecification

/// Mutable write position of one table layout run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecLayoutCursor {
    /// Current column (1-indexed).
    pub col: u32,
    /// Current row (1-indexed).
    pub row: u32,
}

impl SpecLayoutCursor {
    /// Cursor positioned on `cell`.
    pub fn at(cell: CellReference) -> Self {
        Self {
            col: cell.col,
            row: cell.row,
        }
    }

    /// Cell under the cursor.
    pub fn cell(&self) -> CellReference {
        CellReference::new(self.col, self.row)
    }

    /// Cursor moved one column right.
    pub fn next_col(self) -> Result<Self> {
        let col = self
            .col
            .checked_add(1)
            .ok_or_else(|| self.derive_out_of_range())?;
        Ok(Self { col, ..self })
    }

    /// Cursor moved to the next row, back on `col_start`.
    pub fn next_row(self, col_start: u32) -> Result<Self> {
        let row = self
            .row
            .checked_add(1)
            .ok_or_else(|| self.derive_out_of_range())?;
        Ok(Self {
            col: col_start,
            row,
        })
    }

    fn derive_out_of_range(&self) -> ComposeError {
        ComposeError::CellOutOfRange {
            reference: self.cell().to_string(),
        }
    }
}

/// Where the table header ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumHeaderPlacement {
    /// No header was written.
    None,
    /// Header row written from `headingTitles`.
    Standalone,
    /// First data row rendered with header styling.
    FirstDataRow,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-table layout report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecTableReport {
    /// Table anchor.
    pub cell_start: CellReference,
    /// Header placement.
    pub header: EnumHeaderPlacement,
    /// Data rows written in the plain branch.
    pub cnt_rows_data: usize,
    /// Last serial number written, `0` when none.
    pub n_serial_last: i64,
    /// Total cells written by the layout.
    pub cnt_cells: usize,
    /// Bottom-right cell touched, `None` for an empty table.
    pub cell_end: Option<CellReference>,
}

/// Per-sheet compose report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetReport {
    /// Effective sheet name.
    pub sheet_name: String,
    /// Merge regions issued.
    pub cnt_merges: usize,
    /// Styled cells written.
    pub cnt_styled_cells: usize,
    /// Table layout report, `None` when the sheet has no table.
    pub table: Option<SpecTableReport>,
}

/// Per-document compose report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecComposeReport {
    /// Sheet reports in input order.
    pub sheets: Vec<SpecSheetReport>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecComposeReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }

    /// Total cells written by table layouts.
    pub fn cnt_table_cells(&self) -> usize {
        self.sheets
            .iter()
            .filter_map(|sheet| sheet.table.as_ref())
            .map(|table| table.cnt_cells)
            .sum()
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} sheets={} merges={} styled={} table_cells={} warnings={}",
            self.sheets.len(),
            self.sheets.iter().map(|sheet| sheet.cnt_merges).sum::<usize>(),
            self.sheets
                .iter()
                .map(|sheet| sheet.cnt_styled_cells)
                .sum::<usize>(),
            self.cnt_table_cells(),
            self.warnings.len()
        )
    }
}

impl fmt::Display for SpecComposeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[COMPOSE]"))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
