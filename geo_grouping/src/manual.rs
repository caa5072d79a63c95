/*!

This is the long-form manual for `geo_grouping` and `divipola`.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values, with a header row
* `xlsx` Excel workbooks

The format is inferred from the extension of the input file (`.xlsx` and `.xlsm`
are read as workbooks, everything else as CSV). It can be forced with `--input-type`.

### `csv`

The first row is the header. The file must be encoded in UTF-8. A byte order mark
at the start of the file is ignored. The delimiter defaults to `,` and can be
changed with `--delimiter` (for example `;` for exports from a spanish locale).

Default columns: `Departamento` and `Municipio`, as in the DANE export.

### `xlsx`

The first row of the worksheet is the header. All the cells are converted to text:
numbers as they are written (`5001`, `5001.5`), booleans as `true` and `false`, cells
in error as Excel shows them (`#N/A`, `#DIV/0!`). A cell in error in a column that is
not used does not change the result.

The worksheet is selected with `--excel-worksheet-name`. If the option is missing,
the worksheet is found in this order:
1. the worksheet named `Municipios`, if the workbook has one
2. the only worksheet, if the workbook has a single one
3. otherwise the conversion stops and lists the available worksheets

Default columns: `Columna2` (department) and `Columna4` (city), which are the
labels of the DIVIPOLA listing table.

## Columns

Columns can be referred to in three ways:
* by name: `Municipio` is the column whose header is `Municipio`
* by number, starting at 1: `4` is the fourth column
* by spreadsheet letter, with a `$` prefix: `$D` is also the fourth column

Use `--inspect` to list the columns of a new file:

```bash
divipola -i Listados_DIVIPOLA.xlsx --excel-worksheet-name Municipios --inspect
```

## Configuration file

All the options can also be stored in a JSON file, passed with `--config`:

```json
{
  "source": {
    "provider": "xlsx",
    "filePath": "Listados_DIVIPOLA.xlsx",
    "excelWorksheetName": "Municipios",
    "departmentColumn": "Columna2",
    "cityColumn": 4
  },
  "outputSettings": {
    "outputPath": "colombia_cities.json"
  }
}
```

Paths are relative to the directory of the configuration file. Numbers are column
numbers (starting at 1). The options of the command line take precedence over
the configuration file.

## Output

The output is a JSON document, with a two-space indentation. Accented characters
are written as they are.

```json
{
  "departments": [
    {
      "name": "Antioquia",
      "cities": [
        "Itagüí",
        "Medellín"
      ]
    }
  ]
}
```

The output file is replaced on each run. It is only written once the whole input
has been read successfully. Use `--out stdout` to print the document instead.

With `--reference`, the output is compared with an existing document and the
differences are printed on the error output, so that it can be combined with
`--out stdout`. The run fails if the two documents differ.
*/
