//! Table layout: optional header row, serial-number column and typed data rows.

use tracing::{debug, warn};

use crate::document::{SheetDocument, SheetHandle};
use crate::error::Result;
use crate::spec::{
    CellReference, EnumCellValue, EnumHeaderPlacement, EnumValueInferMode, SpecComposeReport,
    SpecFontStyle, SpecLayoutCursor, SpecRichTextRun, SpecTableExport, SpecTableReport,
};
use crate::util::{convert_cell_value, parse_cell_name};

/// Lays out one table block onto one sheet.
///
/// Owns the cursor for the duration of a single [`TableLayoutEngine::run`];
/// nothing is shared across tables, sheets or documents.
pub struct TableLayoutEngine<'a, D: SheetDocument> {
    document: &'a mut D,
    sheet: SheetHandle,
    table: &'a SpecTableExport,
    value_infer_mode: EnumValueInferMode,
    cursor: SpecLayoutCursor,
    n_col_start: u32,
    n_serial: i64,
    if_header_emitted: bool,
    cnt_cells: usize,
    cell_end: Option<CellReference>,
}

impl<'a, D: SheetDocument> TableLayoutEngine<'a, D> {
    /// Bind a table to its target sheet. Fails when `tableStarts` is malformed.
    pub fn new(
        document: &'a mut D,
        sheet: SheetHandle,
        table: &'a SpecTableExport,
        value_infer_mode: EnumValueInferMode,
    ) -> Result<Self> {
        let cell_start = parse_cell_name(&table.table_starts)?;
        Ok(Self {
            document,
            sheet,
            table,
            value_infer_mode,
            cursor: SpecLayoutCursor::at(cell_start),
            n_col_start: cell_start.col,
            n_serial: 1,
            if_header_emitted: false,
            cnt_cells: 0,
            cell_end: None,
        })
    }

    /// Emit the header (if any) and every data row.
    pub fn run(mut self, report: &mut SpecComposeReport) -> Result<SpecTableReport> {
        let cell_start = self.cursor.cell();
        let mut header = EnumHeaderPlacement::None;
        let mut cnt_rows_data = 0usize;

        if !self.table.table_heading.first_row_of_table_data {
            self.emit_standalone_header()?;
            header = EnumHeaderPlacement::Standalone;
        }

        let table = self.table;
        let n_width_heading = table.table_heading.heading_titles.len();
        for (idx_row, l_row) in table.table_data.iter().enumerate() {
            self.cursor = SpecLayoutCursor {
                col: self.n_col_start,
                row: self.cursor.row,
            };

            if idx_row == 0 && !self.if_header_emitted {
                self.emit_header_styled_row(l_row)?;
                header = EnumHeaderPlacement::FirstDataRow;
            } else {
                if header == EnumHeaderPlacement::Standalone && l_row.len() != n_width_heading {
                    let c_msg = format!(
                        "table at {cell_start}: row {} has {} values but {} heading titles",
                        idx_row + 1,
                        l_row.len(),
                        n_width_heading
                    );
                    warn!("{c_msg}");
                    report.warn(c_msg);
                }
                self.emit_data_row(l_row)?;
                cnt_rows_data += 1;
            }

            self.cursor = self.cursor.next_row(self.n_col_start)?;
        }

        debug!(
            table = %cell_start,
            rows = cnt_rows_data,
            cells = self.cnt_cells,
            "table layout finished"
        );

        Ok(SpecTableReport {
            cell_start,
            header,
            cnt_rows_data,
            n_serial_last: self.n_serial - 1,
            cnt_cells: self.cnt_cells,
            cell_end: self.cell_end,
        })
    }

    fn emit_standalone_header(&mut self) -> Result<()> {
        let table = self.table;
        let font_header = SpecFontStyle::with_bold(table.table_heading.is_bold);

        if table.serial_numbers.auto_add {
            self.write_header_cell(&table.serial_numbers.title, &font_header)?;
        }
        for c_title in &table.table_heading.heading_titles {
            self.write_header_cell(c_title, &font_header)?;
        }

        self.cursor = self.cursor.next_row(self.n_col_start)?;
        self.if_header_emitted = true;
        Ok(())
    }

    /// First data row doubling as the header: the serial cell shows the serial
    /// title and the serial counter does not advance.
    fn emit_header_styled_row(&mut self, l_row: &[String]) -> Result<()> {
        let table = self.table;
        let font_header = SpecFontStyle::with_bold(table.table_heading.is_bold);

        if table.serial_numbers.auto_add {
            self.write_header_cell(&table.serial_numbers.title, &font_header)?;
        }
        for c_value in l_row {
            self.write_header_cell(c_value, &font_header)?;
        }
        Ok(())
    }

    fn emit_data_row(&mut self, l_row: &[String]) -> Result<()> {
        if self.table.serial_numbers.auto_add {
            self.write_value_cell(&EnumCellValue::Integer(self.n_serial))?;
            self.n_serial += 1;
        }
        for c_value in l_row {
            let value = convert_cell_value(c_value, self.value_infer_mode);
            self.write_value_cell(&value)?;
        }
        Ok(())
    }

    fn write_header_cell(&mut self, text: &str, font: &SpecFontStyle) -> Result<()> {
        let run = SpecRichTextRun {
            text: text.to_string(),
            font: font.clone(),
        };
        self.document
            .set_cell_rich_text(self.sheet, self.cursor.cell(), &run)?;
        self.advance()
    }

    fn write_value_cell(&mut self, value: &EnumCellValue) -> Result<()> {
        self.document
            .set_cell_value(self.sheet, self.cursor.cell(), value)?;
        self.advance()
    }

    fn advance(&mut self) -> Result<()> {
        let cell = self.cursor.cell();
        self.cell_end = Some(match self.cell_end {
            Some(cell_end) => {
                CellReference::new(cell_end.col.max(cell.col), cell_end.row.max(cell.row))
            }
            None => cell,
        });
        self.cnt_cells += 1;
        self.cursor = self.cursor.next_col()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::document::{EnumMemoryCell, MemoryDocument, MemorySheet};
    use crate::spec::{SpecSerialNumbers, SpecTableHeading};

    fn cell(name: &str) -> CellReference {
        parse_cell_name(name).unwrap()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|val| val.to_string()).collect()
    }

    fn table(
        starts: &str,
        serial: Option<&str>,
        first_row_is_data: bool,
        titles: &[&str],
        rows: &[&[&str]],
    ) -> SpecTableExport {
        SpecTableExport {
            table_starts: starts.to_string(),
            serial_numbers: SpecSerialNumbers {
                auto_add: serial.is_some(),
                title: serial.unwrap_or_default().to_string(),
            },
            table_heading: SpecTableHeading {
                first_row_of_table_data: first_row_is_data,
                heading_titles: strings(titles),
                is_bold: true,
            },
            table_data: rows.iter().map(|row| strings(row)).collect(),
        }
    }

    fn run_layout(spec: &SpecTableExport) -> (MemorySheet, SpecTableReport, SpecComposeReport) {
        let mut doc = MemoryDocument::new();
        let sheet = doc.default_sheet();
        let mut report = SpecComposeReport::default();
        let table_report = TableLayoutEngine::new(&mut doc, sheet, spec, EnumValueInferMode::Infer)
            .unwrap()
            .run(&mut report)
            .unwrap();
        (doc.sheet(sheet).unwrap().clone(), table_report, report)
    }

    fn header_text(sheet: &MemorySheet, name: &str) -> (String, bool) {
        let run = sheet.rich_text(cell(name)).expect(name);
        (run.text.clone(), run.font.bold)
    }

    #[test]
    fn test_standalone_header_and_data_row() {
        let spec = table(
            "A6",
            Some("Sr. No"),
            false,
            &["Name", "Email", "City"],
            &[&["Kishan Gor", "me@kishan.co", "Pune"]],
        );
        let (sheet, table_report, report) = run_layout(&spec);

        assert_eq!(header_text(&sheet, "A6"), ("Sr. No".to_string(), true));
        assert_eq!(header_text(&sheet, "B6"), ("Name".to_string(), true));
        assert_eq!(header_text(&sheet, "C6"), ("Email".to_string(), true));
        assert_eq!(header_text(&sheet, "D6"), ("City".to_string(), true));

        assert_eq!(sheet.value(cell("A7")), Some(&EnumCellValue::Integer(1)));
        assert_eq!(
            sheet.value(cell("B7")),
            Some(&EnumCellValue::Text("Kishan Gor".to_string()))
        );
        assert_eq!(
            sheet.value(cell("C7")),
            Some(&EnumCellValue::Text("me@kishan.co".to_string()))
        );
        assert_eq!(
            sheet.value(cell("D7")),
            Some(&EnumCellValue::Text("Pune".to_string()))
        );
        assert_eq!(sheet.cells.len(), 8);

        assert_eq!(
            table_report,
            SpecTableReport {
                cell_start: cell("A6"),
                header: EnumHeaderPlacement::Standalone,
                cnt_rows_data: 1,
                n_serial_last: 1,
                cnt_cells: 8,
                cell_end: Some(cell("D7")),
            }
        );
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_serial_numbers_count_from_one_with_standalone_header() {
        let spec = table(
            "B2",
            Some("#"),
            false,
            &["Qty"],
            &[&["10"], &["20"], &["30"]],
        );
        let (sheet, table_report, _) = run_layout(&spec);

        assert_eq!(sheet.value(cell("B3")), Some(&EnumCellValue::Integer(1)));
        assert_eq!(sheet.value(cell("B4")), Some(&EnumCellValue::Integer(2)));
        assert_eq!(sheet.value(cell("B5")), Some(&EnumCellValue::Integer(3)));
        assert_eq!(sheet.value(cell("C5")), Some(&EnumCellValue::Integer(30)));
        assert_eq!(table_report.n_serial_last, 3);
    }

    #[test]
    fn test_first_row_as_header_shows_serial_title_and_delays_counter() {
        let spec = table(
            "A1",
            Some("Sr. No"),
            true,
            &[],
            &[&["Name", "Score"], &["Asha", "9.5"], &["Ravi", "8"]],
        );
        let (sheet, table_report, _) = run_layout(&spec);

        assert_eq!(header_text(&sheet, "A1"), ("Sr. No".to_string(), true));
        assert_eq!(header_text(&sheet, "B1"), ("Name".to_string(), true));
        assert_eq!(header_text(&sheet, "C1"), ("Score".to_string(), true));

        assert_eq!(sheet.value(cell("A2")), Some(&EnumCellValue::Integer(1)));
        assert_eq!(sheet.value(cell("C2")), Some(&EnumCellValue::Float(9.5)));
        assert_eq!(sheet.value(cell("A3")), Some(&EnumCellValue::Integer(2)));
        assert_eq!(sheet.value(cell("C3")), Some(&EnumCellValue::Integer(8)));

        assert_eq!(table_report.header, EnumHeaderPlacement::FirstDataRow);
        assert_eq!(table_report.cnt_rows_data, 2);
        assert_eq!(table_report.n_serial_last, 2);
    }

    #[test]
    fn test_first_row_as_header_keeps_raw_text_without_inference() {
        let spec = table("C3", None, true, &[], &[&["2024", "1.5"]]);
        let (sheet, _, _) = run_layout(&spec);

        assert_eq!(header_text(&sheet, "C3"), ("2024".to_string(), true));
        assert_eq!(header_text(&sheet, "D3"), ("1.5".to_string(), true));
        assert_eq!(sheet.value(cell("C3")), None);
    }

    #[test]
    fn test_heading_titles_ignored_when_first_row_is_header() {
        let spec = table("A1", None, true, &["Unused"], &[&["H"], &["1"]]);
        let (sheet, _, _) = run_layout(&spec);

        assert_eq!(header_text(&sheet, "A1"), ("H".to_string(), true));
        assert_eq!(sheet.value(cell("A2")), Some(&EnumCellValue::Integer(1)));
        assert_eq!(sheet.cells.len(), 2);
    }

    #[test]
    fn test_empty_table_data_writes_only_standalone_header() {
        let spec = table("A1", Some("No"), false, &["A", "B"], &[]);
        let (sheet, table_report, _) = run_layout(&spec);

        assert_eq!(sheet.cells.len(), 3);
        assert!(sheet
            .cells
            .values()
            .all(|val| matches!(val, EnumMemoryCell::RichText(_))));
        assert_eq!(table_report.cnt_rows_data, 0);
        assert_eq!(table_report.n_serial_last, 0);
        assert_eq!(table_report.cell_end, Some(cell("C1")));
    }

    #[test]
    fn test_empty_table_with_first_row_header_writes_nothing() {
        let spec = table("A1", Some("No"), true, &["A"], &[]);
        let (sheet, table_report, _) = run_layout(&spec);

        assert!(sheet.cells.is_empty());
        assert_eq!(table_report.header, EnumHeaderPlacement::None);
        assert_eq!(table_report.cell_end, None);
    }

    #[test]
    fn test_ragged_rows_are_written_as_is_and_reported() {
        let spec = table(
            "A1",
            None,
            false,
            &["A", "B"],
            &[&["1"], &["1", "2", "3"], &["x", "y"]],
        );
        let (sheet, _, report) = run_layout(&spec);

        assert_eq!(sheet.value(cell("A2")), Some(&EnumCellValue::Integer(1)));
        assert_eq!(sheet.cell(cell("B2")), None);
        assert_eq!(sheet.value(cell("C3")), Some(&EnumCellValue::Integer(3)));
        assert_eq!(
            sheet.value(cell("B4")),
            Some(&EnumCellValue::Text("y".to_string()))
        );
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_non_bold_heading_and_no_serial_column() {
        let mut spec = table("D10", None, false, &["Only"], &[&["v"]]);
        spec.table_heading.is_bold = false;
        let (sheet, _, _) = run_layout(&spec);

        assert_eq!(header_text(&sheet, "D10"), ("Only".to_string(), false));
        assert_eq!(
            sheet.value(cell("D11")),
            Some(&EnumCellValue::Text("v".to_string()))
        );
    }

    #[test]
    fn test_text_mode_stores_values_as_text() {
        let spec = table("A1", Some("#"), false, &["N"], &[&["42"]]);
        let mut doc = MemoryDocument::new();
        let sheet = doc.default_sheet();
        TableLayoutEngine::new(&mut doc, sheet, &spec, EnumValueInferMode::Text)
            .unwrap()
            .run(&mut SpecComposeReport::default())
            .unwrap();

        let sheet_mem = doc.sheet(sheet).unwrap();
        assert_eq!(sheet_mem.value(cell("A2")), Some(&EnumCellValue::Integer(1)));
        assert_eq!(
            sheet_mem.value(cell("B2")),
            Some(&EnumCellValue::Text("42".to_string()))
        );
    }

    #[test]
    fn test_table_past_last_row_fails_instead_of_wrapping() {
        let spec = table("A4294967295", None, false, &["x"], &[&["1"]]);
        let mut doc = MemoryDocument::new();
        let sheet = doc.default_sheet();
        let result = TableLayoutEngine::new(&mut doc, sheet, &spec, EnumValueInferMode::Infer)
            .unwrap()
            .run(&mut SpecComposeReport::default());

        assert!(matches!(
            result,
            Err(crate::error::ComposeError::CellOutOfRange { .. })
        ));
    }

    #[test]
    fn test_malformed_table_start_is_rejected() {
        let spec = table("6A", None, false, &[], &[]);
        let mut doc = MemoryDocument::new();
        let sheet = doc.default_sheet();
        let result = TableLayoutEngine::new(&mut doc, sheet, &spec, EnumValueInferMode::Infer);
        assert!(matches!(
            result,
            Err(crate::error::ComposeError::MalformedReference { .. })
        ));
    }
}
