use log::{debug, info, warn};

use geo_grouping::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use calamine::{open_workbook, Reader, Xlsx};

use text_diff::{diff, Difference};

use crate::args::Args;
use crate::geo::config_reader::*;
use crate::geo::io_common::*;

mod config_reader;
mod inspect;
mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
pub enum GeoError {
    #[snafu(display("Error opening CSV file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvRecord {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {name:?} not found in {path} (available worksheets: {available:?})"))]
    MissingWorksheet {
        path: String,
        name: String,
        available: Vec<String>,
    },
    #[snafu(display(
        "The worksheet must be provided for {path} (available worksheets: {available:?})"
    ))]
    AmbiguousWorksheet {
        path: String,
        available: Vec<String>,
    },
    #[snafu(display("No data found in {path}"))]
    EmptyWorksheet { path: String },
    #[snafu(display("Error grouping the source table"))]
    Grouping { source: GroupingErrors },
    #[snafu(display("Unknown input type {input_type:?} (expected csv or xlsx)"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("No input file: use --input or --config"))]
    MissingInput {},
    #[snafu(display("Error serializing the document"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between the generated document and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type GeoResult<T> = Result<T, GeoError>;

pub const DEFAULT_OUTPUT: &str = "colombia_cities.json";
pub const DEFAULT_INSPECT_ROWS: usize = 10;

// Column labels of the two known sources
const CSV_DEPARTMENT_COLUMN: &str = "Departamento";
const CSV_CITY_COLUMN: &str = "Municipio";
const XLSX_DEPARTMENT_COLUMN: &str = "Columna2";
const XLSX_CITY_COLUMN: &str = "Columna4";

/// Where the document goes.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum OutputTarget {
    Stdout,
    File(String),
}

/// All the settings of a run, after merging the command line and the config file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ConversionSettings {
    pub input_path: String,
    pub input_type: InputType,
    pub worksheet_name: Option<String>,
    pub delimiter: u8,
    pub department_field: FieldId,
    pub city_field: FieldId,
    pub output: OutputTarget,
}

fn parse_field(cli: &Option<String>) -> GeoResult<Option<FieldId>> {
    match cli {
        Some(s) => FieldId::parse(s).map(Some).context(GroupingSnafu {}),
        None => Ok(None),
    }
}

/// Merges the command line with the config file, if any. The command line wins.
pub fn resolve_settings(args: &Args) -> GeoResult<ConversionSettings> {
    let config_o = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            info!("config: {:?}", config);
            Some(config)
        }
        None => None,
    };
    let root_p: Option<&Path> = args.config.as_deref().and_then(|p| Path::new(p).parent());
    let source_o = config_o.as_ref().map(|c| &c.source);

    let input_path = match (&args.input, source_o) {
        (Some(p), _) => p.clone(),
        (None, Some(source)) => resolve_path(root_p, &source.file_path),
        (None, None) => return MissingInputSnafu {}.fail(),
    };

    let input_type = match args
        .input_type
        .clone()
        .or_else(|| source_o.and_then(|s| s.provider.clone()))
    {
        Some(name) => InputType::from_name(&name)?,
        None => InputType::infer(&input_path),
    };

    let worksheet_name = args
        .excel_worksheet_name
        .clone()
        .or_else(|| source_o.and_then(|s| s.excel_worksheet_name.clone()));

    let delimiter_c = match (args.delimiter, source_o) {
        (Some(c), _) => c,
        (None, Some(source)) => source.delimiter_char()?.unwrap_or(','),
        (None, None) => ',',
    };
    let delimiter = parse_delimiter(delimiter_c)?;

    let (default_dept, default_city) = match input_type {
        InputType::Csv => (CSV_DEPARTMENT_COLUMN, CSV_CITY_COLUMN),
        InputType::Xlsx => (XLSX_DEPARTMENT_COLUMN, XLSX_CITY_COLUMN),
    };
    let config_dept = match source_o {
        Some(source) => source.department_column()?,
        None => None,
    };
    let config_city = match source_o {
        Some(source) => source.city_column()?,
        None => None,
    };
    let department_field = parse_field(&args.department_column)?
        .or(config_dept)
        .unwrap_or_else(|| FieldId::Name(default_dept.to_string()));
    let city_field = parse_field(&args.city_column)?
        .or(config_city)
        .unwrap_or_else(|| FieldId::Name(default_city.to_string()));

    let output = match (&args.out, config_o.as_ref()) {
        (Some(p), _) if p == "stdout" => OutputTarget::Stdout,
        (Some(p), _) => OutputTarget::File(p.clone()),
        (None, Some(config)) => match &config.output_settings.output_path {
            Some(p) => OutputTarget::File(resolve_path(root_p, p)),
            None => OutputTarget::File(resolve_path(root_p, DEFAULT_OUTPUT)),
        },
        (None, None) => OutputTarget::File(DEFAULT_OUTPUT.to_string()),
    };

    Ok(ConversionSettings {
        input_path,
        input_type,
        worksheet_name,
        delimiter,
        department_field,
        city_field,
        output,
    })
}

pub fn read_table(settings: &ConversionSettings) -> GeoResult<Table> {
    info!(
        "Attempting to read {:?} file {:?}",
        settings.input_type, settings.input_path
    );
    match settings.input_type {
        InputType::Csv => io_csv::read_csv_table(&settings.input_path, settings.delimiter),
        InputType::Xlsx => io_excel::read_excel_table(
            &settings.input_path,
            settings.worksheet_name.as_deref(),
        ),
    }
}

/// The document as written to disk: two-space indentation, UTF-8 characters
/// written as they are, and a final newline.
pub fn render_document(doc: &GeographyDocument) -> GeoResult<String> {
    let mut s = serde_json::to_string_pretty(doc).context(SerializingJsonSnafu {})?;
    s.push('\n');
    Ok(s)
}

fn log_summary(doc: &GeographyDocument) {
    for dept in doc.departments.iter() {
        debug!("{}: {}", dept.name, dept.cities.join(", "));
    }
    info!(
        "{} departments, {} cities",
        doc.departments.len(),
        doc.num_cities()
    );
}

/// A line diff between the reference and the generated document: removed lines start
/// with '-', added lines with '+'.
fn render_diff(reference: &str, generated: &str) -> String {
    let (_, changes) = diff(reference, generated, "\n");
    let mut res = String::new();
    for change in changes.iter() {
        let (prefix, chunk) = match change {
            Difference::Same(s) => (' ', s),
            Difference::Add(s) => ('+', s),
            Difference::Rem(s) => ('-', s),
        };
        for line in chunk.split('\n') {
            res.push(prefix);
            res.push(' ');
            res.push_str(line);
            res.push('\n');
        }
    }
    res
}

fn check_reference(doc: &GeographyDocument, summary_p: &str) -> GeoResult<()> {
    let summary_ref = read_summary(summary_p)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
    // Going through a JSON value on both sides, so that the keys are ordered the same way.
    let doc_js = serde_json::to_value(doc).context(SerializingJsonSnafu {})?;
    let pretty_js_doc = serde_json::to_string_pretty(&doc_js).context(SerializingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_doc {
        warn!("Found differences with the reference {:?}", summary_p);
        // The document itself may be on stdout.
        eprint!("{}", render_diff(&pretty_js_summary_ref, &pretty_js_doc));
        return ReferenceMismatchSnafu { path: summary_p }.fail();
    }
    info!("The document matches the reference {:?}", summary_p);
    Ok(())
}

/// Runs one conversion, or one inspection.
pub fn run(args: &Args) -> GeoResult<()> {
    let settings = resolve_settings(args)?;
    debug!("settings: {:?}", settings);

    if args.inspect {
        if settings.input_type == InputType::Xlsx {
            let names = io_excel::worksheet_names(&settings.input_path)?;
            println!("Worksheets: {}", names.join(", "));
        }
        let table = read_table(&settings)?;
        let num_rows = args.inspect_rows.unwrap_or(DEFAULT_INSPECT_ROWS);
        println!("{}", inspect::describe_table(&table, num_rows));
        return Ok(());
    }

    let doc = convert_file(&settings)?;
    let rendered = render_document(&doc)?;

    match &settings.output {
        OutputTarget::Stdout => {
            print!("{}", rendered);
        }
        OutputTarget::File(path) => {
            fs::write(path, rendered.as_bytes()).context(WritingOutputSnafu { path })?;
            println!("File {} generated successfully.", path);
        }
    }

    // The reference document, if provided for comparison
    if let Some(summary_p) = &args.reference {
        check_reference(&doc, summary_p)?;
    }

    Ok(())
}

/// Reads the source table and groups it, without writing anything.
pub fn convert_file(settings: &ConversionSettings) -> GeoResult<GeographyDocument> {
    let table = read_table(settings)?;
    let doc = convert(&table, &settings.department_field, &settings.city_field)
        .context(GroupingSnafu {})?;
    log_summary(&doc);
    Ok(doc)
}

#[cfg(test)]
fn test_dir() -> String {
    option_env!("DIVIPOLA_TEST_DIR")
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{}/tests/data", env!("CARGO_MANIFEST_DIR")))
}

#[cfg(test)]
fn run_conversion_test(test_name: &str, config_lpath: &str, summary_lpath: &str) -> GeoResult<()> {
    let test_dir = test_dir();
    info!("Running test {}", test_name);
    let out = std::env::temp_dir().join(format!("divipola-{}.json", test_name));
    let args = Args {
        config: Some(format!("{}/{}/{}", test_dir, test_name, config_lpath)),
        reference: Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
        out: Some(out.display().to_string()),
        ..Args::default()
    };
    let res = run(&args);
    if let Err(e) = &res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured {}", e);
        if let Some(bt) = snafu::ErrorCompat::backtrace(e) {
            eprintln!("trace: {}", bt);
        }
    }
    res
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    let res = run_conversion_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    );
    assert!(res.is_ok(), "test {} failed: {:?}", test_name, res);
}

#[cfg(test)]
mod tests {

    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn csv_dane() {
        init();
        test_wrapper("csv_dane");
    }

    #[test]
    fn csv_semicolon() {
        init();
        test_wrapper("csv_semicolon");
    }

    #[test]
    fn xlsx_divipola() {
        init();
        test_wrapper("xlsx_divipola");
    }

    #[test]
    fn xlsx_single_sheet() {
        init();
        test_wrapper("xlsx_single_sheet");
    }

    #[test]
    fn missing_column_fails_without_output() {
        init();
        let out = std::env::temp_dir().join("divipola-missing-column.json");
        let _ = fs::remove_file(&out);
        let args = Args {
            input: Some(format!("{}/csv_dane/municipios_colombia.csv", test_dir())),
            city_column: Some("Ciudad".to_string()),
            out: Some(out.display().to_string()),
            ..Args::default()
        };
        let res = run(&args);
        assert!(matches!(
            res,
            Err(GeoError::Grouping {
                source: GroupingErrors::MissingField(_)
            })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn reference_mismatch() {
        init();
        let out = std::env::temp_dir().join("divipola-reference-mismatch.json");
        let args = Args {
            input: Some(format!("{}/csv_semicolon/municipios.csv", test_dir())),
            delimiter: Some(';'),
            department_column: Some("DEP".to_string()),
            city_column: Some("MUN".to_string()),
            reference: Some(format!(
                "{}/csv_dane/csv_dane_expected_summary.json",
                test_dir()
            )),
            out: Some(out.display().to_string()),
            ..Args::default()
        };
        let res = run(&args);
        assert!(matches!(res, Err(GeoError::ReferenceMismatch { .. })));
    }

    #[test]
    fn reference_diff_lines() {
        let reference = "{\n  \"a\": 1,\n  \"b\": 2\n}";
        let generated = "{\n  \"a\": 1,\n  \"b\": 3\n}";
        let d = render_diff(reference, generated);
        let lines: Vec<&str> = d.lines().collect();
        assert!(lines.contains(&"-   \"b\": 2"));
        assert!(lines.contains(&"+   \"b\": 3"));
        assert!(lines.contains(&"    \"a\": 1,"));
        assert!(render_diff(reference, reference).lines().all(|l| l.starts_with(' ')));
    }

    #[test]
    fn reference_with_stdout_output() {
        init();
        let args = Args {
            config: Some(format!("{}/csv_dane/csv_dane_config.json", test_dir())),
            reference: Some(format!(
                "{}/csv_dane/csv_dane_expected_summary.json",
                test_dir()
            )),
            out: Some("stdout".to_string()),
            ..Args::default()
        };
        run(&args).unwrap();
    }

    #[test]
    fn xlsx_mixed_cells() {
        init();
        test_wrapper("xlsx_mixed_cells");
    }

    #[test]
    fn inspect_writes_no_output() {
        init();
        let out = std::env::temp_dir().join("divipola-inspect.json");
        let _ = fs::remove_file(&out);
        let args = Args {
            input: Some(format!(
                "{}/xlsx_divipola/Listados_DIVIPOLA.xlsx",
                test_dir()
            )),
            excel_worksheet_name: Some("Municipios".to_string()),
            inspect: true,
            inspect_rows: Some(3),
            out: Some(out.display().to_string()),
            ..Args::default()
        };
        run(&args).unwrap();
        assert!(!out.exists());

        // The same inspection, on a CSV source
        let args = Args {
            input: Some(format!("{}/csv_dane/municipios_colombia.csv", test_dir())),
            inspect: true,
            out: Some(out.display().to_string()),
            ..Args::default()
        };
        run(&args).unwrap();
        assert!(!out.exists());
    }

    #[test]
    fn inspect_unknown_worksheet() {
        init();
        let args = Args {
            input: Some(format!(
                "{}/xlsx_divipola/Listados_DIVIPOLA.xlsx",
                test_dir()
            )),
            excel_worksheet_name: Some("Departamentos".to_string()),
            inspect: true,
            ..Args::default()
        };
        assert!(matches!(
            run(&args),
            Err(GeoError::MissingWorksheet { .. })
        ));
    }

    #[test]
    fn written_document_round_trips() {
        init();
        let out = std::env::temp_dir().join("divipola-round-trip.json");
        let args = Args {
            input: Some(format!("{}/csv_dane/municipios_colombia.csv", test_dir())),
            out: Some(out.display().to_string()),
            ..Args::default()
        };
        run(&args).unwrap();
        let contents = fs::read_to_string(&out).unwrap();
        // Accents are not escaped
        assert!(contents.contains("\"Medellín\""));
        assert!(contents.starts_with("{\n  \"departments\": [\n"));
        assert!(contents.ends_with("}\n"));
        let parsed: GeographyDocument = serde_json::from_str(&contents).unwrap();
        let settings = resolve_settings(&args).unwrap();
        assert_eq!(parsed, convert_file(&settings).unwrap());
    }

    #[test]
    fn settings_defaults() {
        let args = Args {
            input: Some("municipios_colombia.csv".to_string()),
            ..Args::default()
        };
        let s = resolve_settings(&args).unwrap();
        assert_eq!(s.input_type, InputType::Csv);
        assert_eq!(s.delimiter, b',');
        assert_eq!(s.department_field, FieldId::Name("Departamento".to_string()));
        assert_eq!(s.city_field, FieldId::Name("Municipio".to_string()));
        assert_eq!(s.output, OutputTarget::File(DEFAULT_OUTPUT.to_string()));

        let args = Args {
            input: Some("Listados_DIVIPOLA.xlsx".to_string()),
            out: Some("stdout".to_string()),
            ..Args::default()
        };
        let s = resolve_settings(&args).unwrap();
        assert_eq!(s.input_type, InputType::Xlsx);
        assert_eq!(s.worksheet_name, None);
        assert_eq!(s.department_field, FieldId::Name("Columna2".to_string()));
        assert_eq!(s.city_field, FieldId::Name("Columna4".to_string()));
        assert_eq!(s.output, OutputTarget::Stdout);
    }

    #[test]
    fn command_line_overrides_config() {
        let config = format!("{}/xlsx_divipola/xlsx_divipola_config.json", test_dir());
        let args = Args {
            config: Some(config.clone()),
            city_column: Some("$C".to_string()),
            excel_worksheet_name: Some("Portada".to_string()),
            ..Args::default()
        };
        let s = resolve_settings(&args).unwrap();
        let root = Path::new(&config).parent().unwrap();
        assert_eq!(
            s.input_path,
            root.join("Listados_DIVIPOLA.xlsx").display().to_string()
        );
        assert_eq!(s.input_type, InputType::Xlsx);
        assert_eq!(s.worksheet_name.as_deref(), Some("Portada"));
        assert_eq!(s.department_field, FieldId::Name("Columna2".to_string()));
        assert_eq!(s.city_field, FieldId::Index(2));
        assert_eq!(
            s.output,
            OutputTarget::File(root.join("colombia_cities.json").display().to_string())
        );
    }

    #[test]
    fn missing_input() {
        let res = resolve_settings(&Args::default());
        assert!(matches!(res, Err(GeoError::MissingInput {})));
    }

    #[test]
    fn unknown_input_type() {
        let args = Args {
            input: Some("municipios.ods".to_string()),
            input_type: Some("ods".to_string()),
            ..Args::default()
        };
        assert!(matches!(
            resolve_settings(&args),
            Err(GeoError::UnknownInputType { .. })
        ));
    }
}
