use crate::geo::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    /// csv or xlsx
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "departmentColumn")]
    _department_column: Option<JSValue>,
    #[serde(rename = "cityColumn")]
    _city_column: Option<JSValue>,
    pub delimiter: Option<String>,
}

impl FileSource {
    pub fn department_column(&self) -> GeoResult<Option<FieldId>> {
        read_js_field(&self._department_column)
    }

    pub fn city_column(&self) -> GeoResult<Option<FieldId>> {
        read_js_field(&self._city_column)
    }

    pub fn delimiter_char(&self) -> GeoResult<Option<char>> {
        match self.delimiter.as_deref() {
            None => Ok(None),
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Some(c)),
                    _ => whatever!("The delimiter must be a single character, got {:?}", s),
                }
            }
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    pub source: FileSource,
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
}

pub fn read_config(path: &str) -> GeoResult<GeoConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: GeoConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(config)
}

/// Reads a document to compare against.
pub fn read_summary(path: &str) -> GeoResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

// Numbers are column numbers (starting at 1), strings follow the syntax of FieldId::parse
fn read_js_field(x: &Option<JSValue>) -> GeoResult<Option<FieldId>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        Some(JSValue::Number(n)) => match n.as_u64() {
            Some(x) if x >= 1 => Ok(Some(FieldId::Index((x - 1) as usize))),
            _ => whatever!("Column numbers start at 1, got {}", n),
        },
        Some(JSValue::String(s)) => FieldId::parse(s).map(Some).context(GroupingSnafu {}),
        Some(v) => whatever!("Cannot understand column {}", v),
    }
}
