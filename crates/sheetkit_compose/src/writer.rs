//! `rust_xlsxwriter`-backed document.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::conf::{C_SHEET_NAME_DEFAULT, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
use crate::document::{SheetDocument, SheetHandle};
use crate::error::{ComposeError, Result};
use crate::spec::{CellReference, EnumCellValue, SpecFontStyle, SpecRichTextRun};

/// Workbook document buffered in memory until saved.
pub struct XlsxDocument {
    workbook: Workbook,
    l_sheet_names: Vec<String>,
    idx_active: usize,
}

impl Default for XlsxDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl XlsxDocument {
    /// Create a workbook holding the default sheet only.
    pub fn new() -> Self {
        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_active(true);
        Self {
            workbook,
            l_sheet_names: vec![C_SHEET_NAME_DEFAULT.to_string()],
            idx_active: 0,
        }
    }

    /// Sheet names in document order.
    pub fn sheet_names(&self) -> &[String] {
        &self.l_sheet_names
    }

    /// Serialize the workbook to `.xlsx` bytes.
    pub fn save_to_buffer(&mut self) -> Result<Vec<u8>> {
        Ok(self.workbook.save_to_buffer()?)
    }

    /// Serialize the workbook to `path`.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.workbook.save(path)?;
        Ok(())
    }

    fn worksheet(&mut self, sheet: SheetHandle) -> Result<&mut Worksheet> {
        if sheet.0 >= self.l_sheet_names.len() {
            return Err(ComposeError::SheetNotFound(sheet.0));
        }
        Ok(self.workbook.worksheet_from_index(sheet.0)?)
    }
}

impl SheetDocument for XlsxDocument {
    fn sheet_name(&self, sheet: SheetHandle) -> Result<&str> {
        self.l_sheet_names
            .get(sheet.0)
            .map(String::as_str)
            .ok_or(ComposeError::SheetNotFound(sheet.0))
    }

    fn rename_sheet(&mut self, sheet: SheetHandle, name: &str) -> Result<()> {
        self.worksheet(sheet)?.set_name(name)?;
        self.l_sheet_names[sheet.0] = name.to_string();
        Ok(())
    }

    fn add_sheet(&mut self, name: &str) -> Result<SheetHandle> {
        self.workbook.add_worksheet().set_name(name)?;
        self.l_sheet_names.push(name.to_string());
        Ok(SheetHandle(self.l_sheet_names.len() - 1))
    }

    fn set_active_sheet(&mut self, sheet: SheetHandle) -> Result<()> {
        if sheet.0 == self.idx_active {
            self.worksheet(sheet)?.set_active(true);
            return Ok(());
        }
        self.worksheet(sheet)?;
        let idx_previous = self.idx_active;
        self.worksheet(SheetHandle(idx_previous))?
            .set_active(false)
            .set_selected(false);
        self.worksheet(sheet)?.set_active(true);
        self.idx_active = sheet.0;
        Ok(())
    }

    fn merge_cells(
        &mut self,
        sheet: SheetHandle,
        top_left: CellReference,
        bottom_right: CellReference,
    ) -> Result<()> {
        let (n_row_first, n_col_first) = cast_row_col(top_left)?;
        let (n_row_last, n_col_last) = cast_row_col(bottom_right)?;
        self.worksheet(sheet)?.merge_range(
            n_row_first,
            n_col_first,
            n_row_last,
            n_col_last,
            "",
            &Format::new(),
        )?;
        Ok(())
    }

    fn set_cell_rich_text(
        &mut self,
        sheet: SheetHandle,
        cell: CellReference,
        run: &SpecRichTextRun,
    ) -> Result<()> {
        let (n_row, n_col) = cast_row_col(cell)?;
        let format = derive_rust_xlsx_format(&run.font);
        let worksheet = self.worksheet(sheet)?;
        if run.text.is_empty() {
            worksheet.write_blank(n_row, n_col, &format)?;
        } else {
            worksheet.write_rich_string(n_row, n_col, &[(&format, run.text.as_str())])?;
        }
        Ok(())
    }

    fn set_cell_value(
        &mut self,
        sheet: SheetHandle,
        cell: CellReference,
        value: &EnumCellValue,
    ) -> Result<()> {
        let (n_row, n_col) = cast_row_col(cell)?;
        let worksheet = self.worksheet(sheet)?;
        match value {
            EnumCellValue::Integer(val) => {
                worksheet.write_number(n_row, n_col, *val as f64)?;
            }
            EnumCellValue::Float(val) => {
                worksheet.write_number(n_row, n_col, *val)?;
            }
            EnumCellValue::Text(val) => {
                worksheet.write_string(n_row, n_col, val.as_str())?;
            }
        }
        Ok(())
    }
}

fn derive_rust_xlsx_format(font: &SpecFontStyle) -> Format {
    let mut format = Format::new();

    if let Some(val) = &font.family {
        format = format.set_font_name(val.as_str());
    }
    if let Some(val) = font.size {
        format = format.set_font_size(val);
    }
    if font.bold {
        format = format.set_bold();
    }
    if font.italic {
        format = format.set_italic();
    }
    if let Some(val) = &font.color {
        format = format.set_font_color(val.as_str());
    }

    format
}

/// Convert a 1-indexed cell into the writer's 0-indexed `(row, col)`.
fn cast_row_col(cell: CellReference) -> Result<(u32, u16)> {
    let err_out_of_range = || ComposeError::CellOutOfRange {
        reference: cell.to_string(),
    };
    if cell.row == 0 || cell.col == 0 || cell.row > N_NROWS_EXCEL_MAX || cell.col > N_NCOLS_EXCEL_MAX
    {
        return Err(err_out_of_range());
    }
    let n_col = u16::try_from(cell.col - 1).map_err(|_| err_out_of_range())?;
    Ok((cell.row - 1, n_col))
}
