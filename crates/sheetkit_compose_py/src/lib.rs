use std::path::PathBuf;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;
use sheetkit_compose::{
    ComposeError, EnumValueInferMode, SpecComposeOptions, compose_xlsx_bytes, compose_xlsx_file,
    parse_workbook_input,
};

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "sheetkit.compose.v1";

/// Compose a JSON workbook payload into `(file_name, xlsx_bytes)`.
#[pyfunction]
#[pyo3(signature = (payload, infer_values = true, sheet_name_prefix = None))]
fn compose_xlsx<'py>(
    py: Python<'py>,
    payload: &str,
    infer_values: bool,
    sheet_name_prefix: Option<String>,
) -> PyResult<(String, Bound<'py, PyBytes>)> {
    let input = parse_workbook_input(payload).map_err(derive_py_error)?;
    let options = derive_compose_options(infer_values, sheet_name_prefix);

    let (v_bytes, _report) = py
        .allow_threads(|| compose_xlsx_bytes(&input, &options))
        .map_err(derive_py_error)?;

    Ok((input.file_name, PyBytes::new(py, &v_bytes)))
}

/// Compose a JSON workbook payload into the file at `file_out`.
///
/// Returns the non-fatal warnings collected during layout.
#[pyfunction]
#[pyo3(signature = (payload, file_out, infer_values = true, sheet_name_prefix = None))]
fn compose_xlsx_to_file(
    py: Python<'_>,
    payload: &str,
    file_out: String,
    infer_values: bool,
    sheet_name_prefix: Option<String>,
) -> PyResult<Vec<String>> {
    let input = parse_workbook_input(payload).map_err(derive_py_error)?;
    let options = derive_compose_options(infer_values, sheet_name_prefix);
    let path_file_out = PathBuf::from(file_out);

    let report = py
        .allow_threads(|| compose_xlsx_file(&input, &path_file_out, &options))
        .map_err(derive_py_error)?;

    Ok(report.warnings)
}

fn derive_compose_options(
    infer_values: bool,
    sheet_name_prefix: Option<String>,
) -> SpecComposeOptions {
    let mut options = SpecComposeOptions::default();
    if !infer_values {
        options.value_infer_mode = EnumValueInferMode::Text;
    }
    if let Some(c_prefix) = sheet_name_prefix {
        options.sheet_name_prefix = c_prefix;
    }
    options
}

fn derive_py_error(err: ComposeError) -> PyErr {
    if err.is_input_error() {
        PyValueError::new_err(err.to_string())
    } else {
        PyRuntimeError::new_err(err.to_string())
    }
}

#[pymodule]
fn _sheetkit_compose_rs(_py: Python<'_>, module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_function(wrap_pyfunction!(compose_xlsx, module)?)?;
    module.add_function(wrap_pyfunction!(compose_xlsx_to_file, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    Ok(())
}
