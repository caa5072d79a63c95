// ********* Input data structures ***********

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::Display;

/// A table of cells, as read from a delimited text file or a worksheet.
///
/// All the cells are already converted to text. Rows are not required to
/// have the same width as the header: missing trailing cells are read as empty.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The identifier of a column in a [Table].
///
/// The two known source formats label the same columns differently (a named header
/// in the CSV export, generic labels in the workbook), so columns are always
/// provided by the caller.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum FieldId {
    /// The name of the column, as found in the header row.
    Name(String),
    /// The position of the column, starting at 0.
    Index(usize),
}

impl FieldId {
    /// Parses a column identifier written by a user.
    ///
    /// - `"3"` is the third column (numbers start at 1, as in spreadsheets)
    /// - `"$C"` is also the third column, using spreadsheet letters
    /// - anything else is the name of a column in the header
    ///
    /// ```
    /// use geo_grouping::FieldId;
    ///
    /// assert_eq!(FieldId::parse("Municipio"), Ok(FieldId::Name("Municipio".to_string())));
    /// assert_eq!(FieldId::parse("2"), Ok(FieldId::Index(1)));
    /// assert_eq!(FieldId::parse("$AA"), Ok(FieldId::Index(26)));
    /// ```
    pub fn parse(s: &str) -> Result<FieldId, GroupingErrors> {
        let s = s.trim();
        if s.is_empty() {
            return Err(GroupingErrors::InvalidFieldId(s.to_string()));
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            return match s.parse::<usize>() {
                Ok(x) if x >= 1 => Ok(FieldId::Index(x - 1)),
                _ => Err(GroupingErrors::InvalidFieldId(s.to_string())),
            };
        }
        if let Some(letters) = s.strip_prefix('$') {
            return column_letters_to_index(letters)
                .map(FieldId::Index)
                .ok_or_else(|| GroupingErrors::InvalidFieldId(s.to_string()));
        }
        Ok(FieldId::Name(s.to_string()))
    }
}

impl Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldId::Name(name) => write!(f, "{:?}", name),
            FieldId::Index(idx) => write!(f, "column {} (${})", idx + 1, column_letters(*idx)),
        }
    }
}

/// Converts spreadsheet column letters (`A`, `Z`, `AA`, ...) to a zero-based index.
///
/// At most 3 letters are accepted, which covers all the columns of an xlsx sheet.
pub fn column_letters_to_index(letters: &str) -> Option<usize> {
    if letters.is_empty() || letters.len() > 3 || !letters.chars().all(|c| c.is_ascii_alphabetic())
    {
        return None;
    }
    let mut acc: usize = 0;
    for c in letters.chars() {
        let digit = (c.to_ascii_uppercase() as usize) - ('A' as usize) + 1;
        acc = acc * 26 + digit;
    }
    Some(acc - 1)
}

/// The spreadsheet letters for a zero-based column index.
pub fn column_letters(index: usize) -> String {
    let mut res: Vec<char> = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        res.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    res.iter().rev().collect()
}

// ******** Output data structures *********

/// One department and the names of its cities.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    /// Unique names, sorted.
    pub cities: Vec<String>,
}

/// The persisted output: all the departments, in the order in which they
/// were first found in the source.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeographyDocument {
    pub departments: Vec<Department>,
}

impl GeographyDocument {
    /// The total number of cities, across all the departments.
    pub fn num_cities(&self) -> usize {
        self.departments.iter().map(|d| d.cities.len()).sum()
    }

    pub fn department(&self, name: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.name == name)
    }
}

/// Errors that prevent the grouping from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum GroupingErrors {
    /// The table has no header row.
    EmptyHeader,
    /// The requested column is not part of the header.
    MissingField(FieldId),
    /// The text could not be understood as a column identifier.
    InvalidFieldId(String),
}

impl Error for GroupingErrors {}

impl Display for GroupingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupingErrors::EmptyHeader => write!(f, "the source table has no header row"),
            GroupingErrors::MissingField(fid) => {
                write!(f, "field {} not found in the source header", fid)
            }
            GroupingErrors::InvalidFieldId(s) => write!(f, "invalid column identifier {:?}", s),
        }
    }
}
