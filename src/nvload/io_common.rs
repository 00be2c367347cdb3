use snafu::prelude::*;
use std::path::Path;

use crate::nvload::*;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    /// Comma separated values, in Latin-1.
    Csv,
    /// First worksheet of an Excel workbook.
    Xlsx,
}

impl InputType {
    /// Uses the explicit type if there is one, otherwise the file extension.
    pub fn resolve(explicit: Option<&str>, path: &str) -> NvResult<InputType> {
        match explicit.map(|s| s.trim().to_lowercase()) {
            Some(s) if s == "csv" => Ok(InputType::Csv),
            Some(s) if s == "xlsx" => Ok(InputType::Xlsx),
            Some(s) => UnknownInputTypeSnafu { input_type: s }.fail(),
            None => {
                let ext = Path::new(path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_lowercase());
                match ext.as_deref() {
                    Some("xlsx") => Ok(InputType::Xlsx),
                    // The pre-processed files are all CSV, whatever their name.
                    _ => Ok(InputType::Csv),
                }
            }
        }
    }
}

pub fn simplify_file_name(path: &str) -> NvResult<String> {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .whatever_context(format!("No file name in path {:?}", path))
}
