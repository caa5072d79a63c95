use clap::Parser;

/// Converts a table of departments and municipalities into a JSON document
/// that groups the cities by department.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the source table and the output.
    /// The paths in this file are relative to the directory of the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the expected output. If provided, divipola will
    /// check that the generated document matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path or 'stdout', default colombia_cities.json) Where the JSON document is written.
    /// Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) The source table. Setting this option overrides the file that may be
    /// specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx) The type of the input. By default, it is inferred from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// The column containing the names of the departments: a header name, a column number
    /// (starting at 1) or a column letter prefixed with '$' (for example '$B').
    #[clap(long, value_parser)]
    pub department_column: Option<String>,

    /// The column containing the names of the cities. Same format as --department-column.
    #[clap(long, value_parser)]
    pub city_column: Option<String>,

    /// (default Municipios) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default ',') The delimiter of a CSV file.
    #[clap(long, value_parser)]
    pub delimiter: Option<char>,

    /// If passed as an argument, lists the columns and the first rows of the source
    /// instead of converting it.
    #[clap(long, takes_value = false)]
    pub inspect: bool,

    /// (default 10) The number of rows shown by --inspect.
    #[clap(long, value_parser)]
    pub inspect_rows: Option<usize>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
