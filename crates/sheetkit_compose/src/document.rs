//! Spreadsheet document seam consumed by the composer.
//!
//! The composer never tracks an implicit "active sheet"; every write names its
//! target through a [`SheetHandle`] issued by the document.

use std::collections::BTreeMap;

use crate::conf::C_SHEET_NAME_DEFAULT;
use crate::error::{ComposeError, Result};
use crate::spec::{CellReference, EnumCellValue, SpecRichTextRun};

/// Index of a sheet inside one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SheetHandle(pub usize);

/// Primitives a spreadsheet writer must expose.
///
/// A fresh document holds exactly one default sheet, reachable through
/// [`SheetDocument::default_sheet`].
pub trait SheetDocument {
    /// Handle of the pre-existing default sheet.
    fn default_sheet(&self) -> SheetHandle {
        SheetHandle(0)
    }

    /// Current name of `sheet`.
    fn sheet_name(&self, sheet: SheetHandle) -> Result<&str>;

    /// Rename `sheet`.
    fn rename_sheet(&mut self, sheet: SheetHandle, name: &str) -> Result<()>;

    /// Append a new sheet named `name`.
    fn add_sheet(&mut self, name: &str) -> Result<SheetHandle>;

    /// Mark `sheet` as the active (selected) sheet of the document.
    fn set_active_sheet(&mut self, sheet: SheetHandle) -> Result<()>;

    /// Merge the rectangle spanned by two corners.
    fn merge_cells(
        &mut self,
        sheet: SheetHandle,
        top_left: CellReference,
        bottom_right: CellReference,
    ) -> Result<()>;

    /// Write a single-run rich-text value.
    fn set_cell_rich_text(
        &mut self,
        sheet: SheetHandle,
        cell: CellReference,
        run: &SpecRichTextRun,
    ) -> Result<()>;

    /// Write a plain typed value.
    fn set_cell_value(
        &mut self,
        sheet: SheetHandle,
        cell: CellReference,
        value: &EnumCellValue,
    ) -> Result<()>;
}

////////////////////////////////////////////////////////////////////////////////
// #region MemoryDocument

/// Content recorded for one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumMemoryCell {
    /// Plain typed value.
    Value(EnumCellValue),
    /// Rich-text run.
    RichText(SpecRichTextRun),
}

impl EnumMemoryCell {
    /// Displayed text of the cell.
    pub fn text(&self) -> String {
        match self {
            EnumMemoryCell::Value(EnumCellValue::Integer(val)) => val.to_string(),
            EnumMemoryCell::Value(EnumCellValue::Float(val)) => val.to_string(),
            EnumMemoryCell::Value(EnumCellValue::Text(val)) => val.clone(),
            EnumMemoryCell::RichText(run) => run.text.clone(),
        }
    }
}

/// One recorded sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemorySheet {
    pub name: String,
    /// Merge regions in issue order.
    pub merges: Vec<(CellReference, CellReference)>,
    /// Cells keyed by `(row, col)` so iteration runs row-major.
    pub cells: BTreeMap<(u32, u32), EnumMemoryCell>,
}

impl MemorySheet {
    /// Cell at `cell`, if written.
    pub fn cell(&self, cell: CellReference) -> Option<&EnumMemoryCell> {
        self.cells.get(&(cell.row, cell.col))
    }

    /// Plain value at `cell`, if it holds one.
    pub fn value(&self, cell: CellReference) -> Option<&EnumCellValue> {
        match self.cell(cell) {
            Some(EnumMemoryCell::Value(val)) => Some(val),
            _ => None,
        }
    }

    /// Rich-text run at `cell`, if it holds one.
    pub fn rich_text(&self, cell: CellReference) -> Option<&SpecRichTextRun> {
        match self.cell(cell) {
            Some(EnumMemoryCell::RichText(run)) => Some(run),
            _ => None,
        }
    }
}

/// In-memory document that records every primitive call.
///
/// Performs no validation: duplicate sheet names and overlapping merges are
/// stored as given.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDocument {
    sheets: Vec<MemorySheet>,
    idx_active: usize,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Document holding the default sheet only.
    pub fn new() -> Self {
        Self {
            sheets: vec![MemorySheet {
                name: C_SHEET_NAME_DEFAULT.to_string(),
                ..Default::default()
            }],
            idx_active: 0,
        }
    }

    /// All sheets in document order.
    pub fn sheets(&self) -> &[MemorySheet] {
        &self.sheets
    }

    /// Sheet by handle.
    pub fn sheet(&self, sheet: SheetHandle) -> Option<&MemorySheet> {
        self.sheets.get(sheet.0)
    }

    /// Sheet by name (first match).
    pub fn sheet_by_name(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Handle of the active sheet.
    pub fn active_sheet(&self) -> SheetHandle {
        SheetHandle(self.idx_active)
    }

    fn sheet_mut(&mut self, sheet: SheetHandle) -> Result<&mut MemorySheet> {
        self.sheets
            .get_mut(sheet.0)
            .ok_or(ComposeError::SheetNotFound(sheet.0))
    }
}

impl SheetDocument for MemoryDocument {
    fn sheet_name(&self, sheet: SheetHandle) -> Result<&str> {
        self.sheets
            .get(sheet.0)
            .map(|val| val.name.as_str())
            .ok_or(ComposeError::SheetNotFound(sheet.0))
    }

    fn rename_sheet(&mut self, sheet: SheetHandle, name: &str) -> Result<()> {
        self.sheet_mut(sheet)?.name = name.to_string();
        Ok(())
    }

    fn add_sheet(&mut self, name: &str) -> Result<SheetHandle> {
        self.sheets.push(MemorySheet {
            name: name.to_string(),
            ..Default::default()
        });
        Ok(SheetHandle(self.sheets.len() - 1))
    }

    fn set_active_sheet(&mut self, sheet: SheetHandle) -> Result<()> {
        self.sheet_mut(sheet)?;
        self.idx_active = sheet.0;
        Ok(())
    }

    fn merge_cells(
        &mut self,
        sheet: SheetHandle,
        top_left: CellReference,
        bottom_right: CellReference,
    ) -> Result<()> {
        self.sheet_mut(sheet)?.merges.push((top_left, bottom_right));
        Ok(())
    }

    fn set_cell_rich_text(
        &mut self,
        sheet: SheetHandle,
        cell: CellReference,
        run: &SpecRichTextRun,
    ) -> Result<()> {
        self.sheet_mut(sheet)?
            .cells
            .insert((cell.row, cell.col), EnumMemoryCell::RichText(run.clone()));
        Ok(())
    }

    fn set_cell_value(
        &mut self,
        sheet: SheetHandle,
        cell: CellReference,
        value: &EnumCellValue,
    ) -> Result<()> {
        self.sheet_mut(sheet)?
            .cells
            .insert((cell.row, cell.col), EnumMemoryCell::Value(value.clone()));
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
