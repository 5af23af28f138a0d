//! Compose constants and default preset factories.

use crate::spec::{EnumValueInferMode, SpecComposeOptions};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: u32 = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: u32 = 16_384;
/// Name of the sheet every new document starts with.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";
/// Prefix used to auto-name sheets declared without a name.
pub const C_SHEET_NAME_PREFIX: &str = "Sheet";
/// Output file name used when the payload does not carry one.
pub const C_FILE_NAME_FALLBACK: &str = "output.xlsx";

/// Build default compose options.
pub fn derive_default_compose_options() -> SpecComposeOptions {
    SpecComposeOptions {
        sheet_name_prefix: C_SHEET_NAME_PREFIX.to_string(),
        value_infer_mode: EnumValueInferMode::Infer,
    }
}
