/*!

Groups the cities of a municipal geography table under their department.

The input is a [Table] of text cells, read by the caller from any tabular source
(a CSV export, a worksheet, ...). The output is a [GeographyDocument], which
serializes to:

```json
{
  "departments": [
    { "name": "Antioquia", "cities": ["Itagüí", "Medellín"] }
  ]
}
```

Departments keep the order in which they first appear in the table. The cities
of each department are unique and sorted.

```
use geo_grouping::*;

let table = Table {
    header: vec!["Departamento".to_string(), "Municipio".to_string()],
    rows: vec![
        vec!["Antioquia".to_string(), "Medellín".to_string()],
        vec!["Chocó".to_string(), "Quibdó".to_string()],
    ],
};
let doc = convert(
    &table,
    &FieldId::Name("Departamento".to_string()),
    &FieldId::Name("Municipio".to_string()),
)?;
assert_eq!(doc.departments[1].name, "Chocó");
# Ok::<(), GroupingErrors>(())
```

See the [manual] for the command line tool built on top of this library.
*/

mod config;
use log::{debug, info};

pub mod builder;
pub mod manual;

pub use crate::config::*;

use crate::builder::Builder;

/// Finds the position of a column in the header.
pub fn resolve_field(header: &[String], field: &FieldId) -> Result<usize, GroupingErrors> {
    if header.is_empty() {
        return Err(GroupingErrors::EmptyHeader);
    }
    match field {
        FieldId::Index(idx) if *idx < header.len() => Ok(*idx),
        FieldId::Index(_) => Err(GroupingErrors::MissingField(field.clone())),
        FieldId::Name(name) => header
            .iter()
            .position(|h| h.trim() == name.as_str())
            .ok_or_else(|| GroupingErrors::MissingField(field.clone())),
    }
}

/// Groups the cities of a table by department.
///
/// Arguments:
/// * `source` the table to read. It is not modified.
/// * `department_field` the column holding the department names
/// * `city_field` the column holding the city names
///
/// Names are trimmed, rows with an empty department or city are skipped, and
/// duplicate cities within a department are dropped.
pub fn convert(
    source: &Table,
    department_field: &FieldId,
    city_field: &FieldId,
) -> Result<GeographyDocument, GroupingErrors> {
    let dept_idx = resolve_field(&source.header, department_field)?;
    let city_idx = resolve_field(&source.header, city_field)?;
    debug!(
        "convert: department column: {} city column: {}",
        dept_idx, city_idx
    );

    let mut builder = Builder::new();
    let mut num_added: usize = 0;
    for row in source.rows.iter() {
        let dept = row.get(dept_idx).map(|s| s.as_str()).unwrap_or("");
        let city = row.get(city_idx).map(|s| s.as_str()).unwrap_or("");
        if builder.add_row(dept, city) {
            num_added += 1;
        }
    }
    info!(
        "Processed {} rows: {} departments, {} unique cities",
        source.rows.len(),
        builder.num_departments(),
        num_added
    );
    Ok(builder.build())
}
