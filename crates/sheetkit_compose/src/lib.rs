//! `sheetkit_compose` v1:
//! Declarative workbook composition kernel.
//!
//! Module layout:
//! - `conf`     : constants and default presets
//! - `spec`     : input models, options, reports
//! - `error`    : error taxonomy
//! - `util`     : A1 codec, value inference, sheet naming
//! - `document` : document seam and in-memory document
//! - `writer`   : `rust_xlsxwriter`-backed document
//! - `layout`   : table layout engine
//! - `compose`  : sheet/document orchestration
pub mod compose;
pub mod conf;
pub mod document;
pub mod error;
pub mod layout;
pub mod spec;
pub mod util;
pub mod writer;

pub use compose::{
    apply_merged_cells, compose_document, compose_sheet, compose_xlsx_bytes, compose_xlsx_file,
    parse_workbook_input, resolve_sheet, write_styled_cells,
};
pub use conf::{C_FILE_NAME_FALLBACK, C_SHEET_NAME_DEFAULT, C_SHEET_NAME_PREFIX};
pub use document::{EnumMemoryCell, MemoryDocument, MemorySheet, SheetDocument, SheetHandle};
pub use error::{ComposeError, Result};
pub use layout::TableLayoutEngine;
pub use spec::{
    CellReference, EnumCellValue, EnumHeaderPlacement, EnumValueInferMode, SpecComposeOptions,
    SpecComposeReport, SpecFontStyle, SpecRichTextRun, SpecSheetInput, SpecSheetReport,
    SpecStyledCellInput, SpecTableExport, SpecTableReport, SpecWorkbookInput,
};
pub use util::{format_cell_name, infer_cell_value, parse_cell_name};
pub use writer::XlsxDocument;
