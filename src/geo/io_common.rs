use std::path::{Path, PathBuf};

use crate::geo::*;

/// The formats of source tables that can be read.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

impl InputType {
    pub fn from_name(name: &str) -> GeoResult<InputType> {
        match name.trim().to_lowercase().as_str() {
            "csv" => Ok(InputType::Csv),
            "xlsx" | "excel" => Ok(InputType::Xlsx),
            _ => UnknownInputTypeSnafu {
                input_type: name.to_string(),
            }
            .fail(),
        }
    }

    /// Workbooks are recognized by their extension, everything else is read as CSV.
    pub fn infer(path: &str) -> InputType {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("xlsx") | Some("xlsm") => InputType::Xlsx,
            _ => InputType::Csv,
        }
    }
}

/// Paths from a config file are relative to the directory of this file.
pub fn resolve_path(root_path: Option<&Path>, file_path: &str) -> String {
    match root_path {
        Some(root) if Path::new(file_path).is_relative() => {
            let p: PathBuf = [root, Path::new(file_path)].iter().collect();
            p.as_path().display().to_string()
        }
        _ => file_path.to_string(),
    }
}

pub fn parse_delimiter(delimiter: char) -> GeoResult<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        whatever!("The CSV delimiter must be an ASCII character, got {:?}", delimiter)
    }
}
