// Primitives for reading Excel workbooks.

use calamine::DataType;

use crate::geo::*;

/// The worksheet of the DIVIPOLA listing that contains the municipalities.
pub const DEFAULT_WORKSHEET: &str = "Municipios";

/// Reads a worksheet of an xlsx file. The first row of the worksheet is the header.
///
/// Columns keep their position in the worksheet: if the first columns are empty,
/// they are still part of the table, so that `$B` always refers to column B.
pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> GeoResult<Table> {
    let wrange = get_range(path, worksheet_name)?;
    let (start_row, start_col) = wrange.start().context(EmptyWorksheetSnafu { path })?;
    debug!(
        "read_excel_table: path: {:?} start: {:?} size: {:?}",
        path,
        (start_row, start_col),
        wrange.get_size()
    );

    let mut iter = wrange.rows();
    let header_cells = iter.next().context(EmptyWorksheetSnafu { path })?;
    let header = read_row(header_cells, start_col as usize);
    debug!("read_excel_table: header: {:?}", header);

    let rows: Vec<Vec<String>> = iter
        .map(|row| read_row(row, start_col as usize))
        .collect();
    info!("Read {} rows from {:?}", rows.len(), path);
    Ok(Table { header, rows })
}

fn read_row(cells: &[DataType], offset: usize) -> Vec<String> {
    let mut res: Vec<String> = vec![String::new(); offset];
    res.extend(cells.iter().map(read_cell));
    res
}

// Every cell has a text form, even the ones that are not read by the conversion
// (codes, dates, formulas in error).
fn read_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Empty => String::new(),
        // Codes are often stored as numbers
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        // As displayed by Excel: #N/A, #DIV/0!, ...
        DataType::Error(e) => e.to_string(),
        _ => format!("{:?}", cell),
    }
}

pub fn worksheet_names(path: &str) -> GeoResult<Vec<String>> {
    let workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    Ok(workbook.sheet_names().to_vec())
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> GeoResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let available: Vec<String> = workbook.sheet_names().to_vec();

    let worksheet_name: String = match worksheet_name_o {
        // A worksheet name was provided, use it.
        Some(name) => name.to_string(),
        None if available.iter().any(|n| n == DEFAULT_WORKSHEET) => DEFAULT_WORKSHEET.to_string(),
        None => match available.as_slice() {
            [name] => name.clone(),
            [] => return EmptyWorksheetSnafu { path }.fail(),
            _ => {
                return AmbiguousWorksheetSnafu {
                    path,
                    available: available.clone(),
                }
                .fail()
            }
        },
    };
    debug!("get_range: using worksheet {:?}", worksheet_name);

    workbook
        .worksheet_range(&worksheet_name)
        .context(MissingWorksheetSnafu {
            path,
            name: worksheet_name.clone(),
            available: available.clone(),
        })?
        .context(OpeningExcelSnafu { path })
}
