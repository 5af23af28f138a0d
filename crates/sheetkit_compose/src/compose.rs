//! Sheet and document composition.

use std::path::Path;

use tracing::{debug, info};

use crate::document::{SheetDocument, SheetHandle};
use crate::error::{ComposeError, Result};
use crate::layout::TableLayoutEngine;
use crate::spec::{
    SpecComposeOptions, SpecComposeReport, SpecRichTextRun, SpecSheetInput, SpecSheetReport,
    SpecStyledCellInput, SpecWorkbookInput,
};
use crate::util::{derive_effective_sheet_name, parse_cell_name};
use crate::writer::XlsxDocument;

////////////////////////////////////////////////////////////////////////////////
// #region SheetSteps

/// Resolve the target sheet for the declaration at `idx_sheet`.
///
/// Sheet 0 reuses the default sheet (renamed only when the name differs); every
/// later sheet is created. The returned sheet is also made active.
pub fn resolve_sheet<D: SheetDocument>(
    document: &mut D,
    idx_sheet: usize,
    declared_name: &str,
    options: &SpecComposeOptions,
) -> Result<(SheetHandle, String)> {
    let c_name = derive_effective_sheet_name(idx_sheet, declared_name, &options.sheet_name_prefix);

    let sheet = if idx_sheet == 0 {
        let sheet_default = document.default_sheet();
        if document.sheet_name(sheet_default)? != c_name {
            document.rename_sheet(sheet_default, &c_name)?;
        }
        sheet_default
    } else {
        document.add_sheet(&c_name)?
    };
    document.set_active_sheet(sheet)?;

    Ok((sheet, c_name))
}

/// Issue one merge per declared range, in order. No overlap or corner-order checks.
pub fn apply_merged_cells<D: SheetDocument>(
    document: &mut D,
    sheet: SheetHandle,
    merged_cells: &[(String, String)],
) -> Result<usize> {
    for (c_top_left, c_bottom_right) in merged_cells {
        let top_left = parse_cell_name(c_top_left)?;
        let bottom_right = parse_cell_name(c_bottom_right)?;
        document.merge_cells(sheet, top_left, bottom_right)?;
    }
    Ok(merged_cells.len())
}

/// Write each styled cell as a single rich-text run. Last write to a cell wins.
pub fn write_styled_cells<D: SheetDocument>(
    document: &mut D,
    sheet: SheetHandle,
    cell_data: &[SpecStyledCellInput],
) -> Result<usize> {
    for cell_input in cell_data {
        let cell = parse_cell_name(&cell_input.cell)?;
        document.set_cell_rich_text(sheet, cell, &SpecRichTextRun::from(cell_input))?;
    }
    Ok(cell_data.len())
}

/// Compose one sheet: resolve, merge, styled cells, then table layout.
pub fn compose_sheet<D: SheetDocument>(
    document: &mut D,
    idx_sheet: usize,
    sheet_input: &SpecSheetInput,
    options: &SpecComposeOptions,
    report: &mut SpecComposeReport,
) -> Result<SpecSheetReport> {
    let (sheet, sheet_name) = resolve_sheet(document, idx_sheet, &sheet_input.name, options)?;

    let cnt_merges = apply_merged_cells(document, sheet, &sheet_input.merged_cells)?;
    let cnt_styled_cells = write_styled_cells(document, sheet, &sheet_input.cell_data)?;
    debug!(
        sheet = %sheet_name,
        merges = cnt_merges,
        styled_cells = cnt_styled_cells,
        "sheet decorations applied"
    );

    let table = match &sheet_input.table_export {
        Some(table) if !table.is_blank() => Some(
            TableLayoutEngine::new(document, sheet, table, options.value_infer_mode)?
                .run(report)?,
        ),
        _ => None,
    };

    info!(sheet = %sheet_name, index = idx_sheet, "sheet composed");

    Ok(SpecSheetReport {
        sheet_name,
        cnt_merges,
        cnt_styled_cells,
        table,
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DocumentComposition

/// Compose every declared sheet into `document`, in input order.
///
/// The document is handed back only when the whole pass succeeds; on failure it
/// is dropped together with any partially written sheet.
pub fn compose_document<D: SheetDocument>(
    mut document: D,
    input: &SpecWorkbookInput,
    options: &SpecComposeOptions,
) -> Result<(D, SpecComposeReport)> {
    let mut report = SpecComposeReport::default();

    for (idx_sheet, sheet_input) in input.sheets.iter().enumerate() {
        let sheet_report = compose_sheet(&mut document, idx_sheet, sheet_input, options, &mut report)
            .map_err(|err| ComposeError::Sheet {
                index: idx_sheet,
                name: sheet_input.name.clone(),
                source: Box::new(err),
            })?;
        report.sheets.push(sheet_report);
    }

    info!(
        file_name = %input.file_name,
        sheets = report.sheets.len(),
        warnings = report.warnings.len(),
        "document composed"
    );
    Ok((document, report))
}

/// Decode a JSON workbook payload.
pub fn parse_workbook_input(payload: &str) -> Result<SpecWorkbookInput> {
    Ok(serde_json::from_str(payload)?)
}

/// Compose `input` into `.xlsx` bytes.
pub fn compose_xlsx_bytes(
    input: &SpecWorkbookInput,
    options: &SpecComposeOptions,
) -> Result<(Vec<u8>, SpecComposeReport)> {
    let (mut document, report) = compose_document(XlsxDocument::new(), input, options)?;
    Ok((document.save_to_buffer()?, report))
}

/// Compose `input` into an `.xlsx` file at `path`.
pub fn compose_xlsx_file(
    input: &SpecWorkbookInput,
    path: &Path,
    options: &SpecComposeOptions,
) -> Result<SpecComposeReport> {
    let (mut document, report) = compose_document(XlsxDocument::new(), input, options)?;
    document.save(path)?;
    Ok(report)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
