//! Stateless helpers: A1 reference codec, value inference and sheet naming.

use crate::error::{ComposeError, Result};
use crate::spec::{CellReference, EnumCellValue, EnumValueInferMode};

////////////////////////////////////////////////////////////////////////////////
// #region CellReferenceCodec

/// Decode an A1-style reference (`"C4"`, `"$AA$10"`, `"b2"`) into a 1-indexed cell.
///
/// `$` markers are dropped and letters match case-insensitively. Whitespace is
/// not trimmed. Sheet limits are not checked here; the writer owns them.
pub fn parse_cell_name(name: &str) -> Result<CellReference> {
    let bytes = name.as_bytes();
    let mut n_pos = 0;

    if bytes.first() == Some(&b'$') {
        n_pos += 1;
    }

    let n_pos_col_start = n_pos;
    let mut n_col: u32 = 0;
    while n_pos < bytes.len() && bytes[n_pos].is_ascii_alphabetic() {
        let n_letter = u32::from(bytes[n_pos].to_ascii_uppercase() - b'A') + 1;
        n_col = n_col
            .checked_mul(26)
            .and_then(|val| val.checked_add(n_letter))
            .ok_or_else(|| ComposeError::malformed(name, "column number overflow"))?;
        n_pos += 1;
    }
    if n_pos == n_pos_col_start {
        return Err(ComposeError::malformed(name, "no column letters"));
    }

    if bytes.get(n_pos) == Some(&b'$') {
        n_pos += 1;
    }

    // Every byte consumed so far is ASCII, so this slice is on a char boundary.
    let c_row = &name[n_pos..];
    if c_row.is_empty() {
        return Err(ComposeError::malformed(name, "no row number"));
    }
    if !c_row.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ComposeError::malformed(name, "invalid row number"));
    }
    let n_row: u32 = c_row
        .parse()
        .map_err(|_| ComposeError::malformed(name, "row number overflow"))?;
    if n_row == 0 {
        return Err(ComposeError::malformed(name, "row numbers start at 1"));
    }

    Ok(CellReference::new(n_col, n_row))
}

/// Encode a 1-indexed column number as letters (`1` -> `A`, `27` -> `AA`).
pub fn format_column_letters(col: u32) -> String {
    let mut l_letters = Vec::new();
    let mut n_col = col;
    while n_col > 0 {
        let n_rem = (n_col - 1) % 26;
        l_letters.push(char::from(b'A' + n_rem as u8));
        n_col = (n_col - 1) / 26;
    }
    l_letters.iter().rev().collect()
}

/// Encode a cell as its canonical A1-style name.
pub fn format_cell_name(cell: CellReference) -> String {
    format!("{}{}", format_column_letters(cell.col), cell.row)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ValueInference

/// Decide how a raw table value is stored.
///
/// Order: whole-string `i64`, then whole-string finite `f64`, else the text
/// unchanged. Never fails.
pub fn infer_cell_value(raw: &str) -> EnumCellValue {
    if let Ok(val) = raw.parse::<i64>() {
        return EnumCellValue::Integer(val);
    }
    if let Ok(val) = raw.parse::<f64>()
        && val.is_finite()
    {
        return EnumCellValue::Float(val);
    }
    EnumCellValue::Text(raw.to_string())
}

/// Convert a raw table value according to the configured policy.
pub fn convert_cell_value(raw: &str, mode: EnumValueInferMode) -> EnumCellValue {
    match mode {
        EnumValueInferMode::Infer => infer_cell_value(raw),
        EnumValueInferMode::Text => EnumCellValue::Text(raw.to_string()),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNaming

/// Effective name for the sheet at `idx_sheet` (0-based).
///
/// A declared name wins; an empty one becomes `prefix + (idx_sheet + 1)`.
pub fn derive_effective_sheet_name(idx_sheet: usize, declared: &str, prefix: &str) -> String {
    if declared.is_empty() {
        format!("{prefix}{}", idx_sheet + 1)
    } else {
        declared.to_string()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_parse_cell_name_basic() {
        assert_eq!(parse_cell_name("A1").unwrap(), CellReference::new(1, 1));
        assert_eq!(parse_cell_name("Z9").unwrap(), CellReference::new(26, 9));
        assert_eq!(parse_cell_name("AA10").unwrap(), CellReference::new(27, 10));
        assert_eq!(parse_cell_name("XFD1048576").unwrap(), CellReference::new(16_384, 1_048_576));
    }

    #[test]
    fn test_parse_cell_name_accepts_absolute_markers_and_lowercase() {
        assert_eq!(parse_cell_name("$B$2").unwrap(), CellReference::new(2, 2));
        assert_eq!(parse_cell_name("b$7").unwrap(), CellReference::new(2, 7));
        assert_eq!(parse_cell_name("ab3").unwrap(), CellReference::new(28, 3));
    }

    #[test]
    fn test_parse_cell_name_rejects_malformed_input() {
        for c_name in ["", "A", "12", "A0", "A-1", "A+1", " A1", "A1 ", "A1B", "$$A1", "Ä1"] {
            let err = parse_cell_name(c_name).expect_err(c_name);
            assert!(
                matches!(err, ComposeError::MalformedReference { .. }),
                "{c_name:?} -> {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_cell_name_rejects_overflow() {
        assert!(parse_cell_name("A99999999999").is_err());
        assert!(parse_cell_name("ZZZZZZZZZZ1").is_err());
    }

    #[test]
    fn test_format_cell_name() {
        assert_eq!(format_cell_name(CellReference::new(1, 1)), "A1");
        assert_eq!(format_cell_name(CellReference::new(26, 4)), "Z4");
        assert_eq!(format_cell_name(CellReference::new(27, 4)), "AA4");
        assert_eq!(format_cell_name(CellReference::new(52, 4)), "AZ4");
        assert_eq!(format_cell_name(CellReference::new(703, 4)), "AAA4");
    }

    proptest! {
        #[test]
        fn prop_cell_name_round_trip(col in 1u32..=16_384, row in 1u32..=1_048_576) {
            let cell = CellReference::new(col, row);
            let c_name = format_cell_name(cell);
            prop_assert_eq!(parse_cell_name(&c_name).unwrap(), cell);
            prop_assert_eq!(format_cell_name(parse_cell_name(&c_name).unwrap()), c_name);
        }

        #[test]
        fn prop_infer_recovers_integers(n in any::<i64>()) {
            prop_assert_eq!(infer_cell_value(&n.to_string()), EnumCellValue::Integer(n));
        }

        #[test]
        fn prop_infer_recovers_fractional_floats(
            val in (-1.0e12f64..1.0e12).prop_filter("non-integral", |v| v.fract() != 0.0)
        ) {
            prop_assert_eq!(infer_cell_value(&val.to_string()), EnumCellValue::Float(val));
        }
    }

    #[test]
    fn test_infer_cell_value_kinds() {
        assert_eq!(infer_cell_value("42"), EnumCellValue::Integer(42));
        assert_eq!(infer_cell_value("-17"), EnumCellValue::Integer(-17));
        assert_eq!(infer_cell_value("3.14"), EnumCellValue::Float(3.14));
        assert_eq!(infer_cell_value("abc"), EnumCellValue::Text("abc".to_string()));
        assert_eq!(infer_cell_value(""), EnumCellValue::Text(String::new()));
    }

    #[test]
    fn test_infer_cell_value_pinned_edge_cases() {
        assert_eq!(infer_cell_value("007"), EnumCellValue::Integer(7));
        assert_eq!(infer_cell_value("+5"), EnumCellValue::Integer(5));
        assert_eq!(infer_cell_value("1e3"), EnumCellValue::Float(1000.0));
        assert_eq!(infer_cell_value("1,000"), EnumCellValue::Text("1,000".to_string()));
        assert_eq!(infer_cell_value(" 42"), EnumCellValue::Text(" 42".to_string()));
        assert_eq!(infer_cell_value("42 "), EnumCellValue::Text("42 ".to_string()));
        assert_eq!(infer_cell_value("12%"), EnumCellValue::Text("12%".to_string()));
        assert_eq!(
            infer_cell_value("99999999999999999999"),
            EnumCellValue::Float(1e20)
        );
        for c_raw in ["inf", "NaN", "infinity", "-inf"] {
            assert_eq!(infer_cell_value(c_raw), EnumCellValue::Text(c_raw.to_string()));
        }
    }

    #[test]
    fn test_convert_cell_value_text_mode_keeps_numbers_as_text() {
        assert_eq!(
            convert_cell_value("42", EnumValueInferMode::Text),
            EnumCellValue::Text("42".to_string())
        );
        assert_eq!(
            convert_cell_value("42", EnumValueInferMode::Infer),
            EnumCellValue::Integer(42)
        );
    }

    #[test]
    fn test_derive_effective_sheet_name() {
        assert_eq!(derive_effective_sheet_name(0, "", "Sheet"), "Sheet1");
        assert_eq!(derive_effective_sheet_name(1, "", "Sheet"), "Sheet2");
        assert_eq!(derive_effective_sheet_name(1, "Users", "Sheet"), "Users");
        assert_eq!(derive_effective_sheet_name(2, "", "Page"), "Page3");
    }
}
