// Primitives for reading CSV files.

use crate::geo::*;

const UTF8_BOM: char = '\u{feff}';

/// Reads a delimited text file. The first record is the header.
///
/// Records may have fewer fields than the header.
pub fn read_csv_table(path: &str, delimiter: u8) -> GeoResult<Table> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;

    let mut header: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvRecordSnafu { path, lineno })?;
        let cells: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        if idx == 0 {
            header = cells;
            if let Some(first) = header.first_mut() {
                if let Some(stripped) = first.strip_prefix(UTF8_BOM) {
                    *first = stripped.to_string();
                }
            }
            debug!("read_csv_table: header: {:?}", header);
        } else {
            rows.push(cells);
        }
    }
    info!("Read {} rows from {:?}", rows.len(), path);
    Ok(Table { header, rows })
}
