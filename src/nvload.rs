use log::{debug, info, warn};

use nv_results::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use text_diff::print_diff;

use crate::args::Args;
use crate::nvload::config_reader::*;
use crate::nvload::io_common::*;
use crate::nvload::sink::JsonLinesSink;

mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;
mod sink;

#[derive(Debug, Snafu)]
pub enum NvLoadError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook has no worksheet"))]
    EmptyExcel {},
    #[snafu(display("Excel line {lineno}: unexpected cell {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading the header of the CSV file"))]
    CsvHeader { source: csv::Error },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Missing parent directory"))]
    MissingParentDir {},
    #[snafu(display("Missing argument --{name} (or use --config)"))]
    MissingArgument { name: String },
    #[snafu(display("Unknown input type {input_type:?}"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Failed to load {path}: {source}"))]
    Loading {
        source: nv_results::LoadError,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type NvResult<T> = Result<T, NvLoadError>;

/// Loads one file into the sink.
fn load_file(
    root_path: &Path,
    source: &FileSource,
    loader_config: &LoaderConfig,
    sink: &mut JsonLinesSink<Vec<u8>>,
) -> NvResult<LoadSummary> {
    let p: PathBuf = root_path.join(&source.file_path);
    let path = p.as_path().display().to_string();

    let mut mapping = source.mapping.clone();
    if mapping.generated_filename.is_none() {
        mapping.generated_filename = Some(simplify_file_name(&path)?);
    }
    let loader = Loader::select(&mapping, loader_config);
    debug!("load_file: loader {:?}", loader);
    // Unsupported formats fail before the file is touched.
    if loader.reporting_level().is_none() {
        let summary = loader
            .load(std::iter::empty::<LoadResult<RawRow>>(), sink)
            .context(LoadingSnafu { path })?;
        return Ok(summary);
    }

    let input_type = InputType::resolve(source.input_type.as_deref(), &path)?;
    info!("Attempting to load {:?} as {:?}", path, input_type);

    let summary = match input_type {
        InputType::Csv => {
            let rows = io_csv::open_latin1_csv(&path)?;
            debug!("load_file: columns {:?}", rows.headers());
            loader.load(rows, sink)
        }
        InputType::Xlsx => {
            let rows = io_xlsx::read_xlsx_rows(&path)?;
            loader.load(rows.into_iter().map(Ok), sink)
        }
    }
    .context(LoadingSnafu { path })?;
    Ok(summary)
}

fn write_output(out: Option<&str>, text: &str) -> NvResult<()> {
    match out {
        None | Some("stdout") => {
            print!("{}", text);
            Ok(())
        }
        Some(path) => fs::write(path, text).context(WritingOutputSnafu { path }),
    }
}

fn check_reference(reference_path: &str, text: &str) -> NvResult<()> {
    let reference = read_reference(reference_path)?;
    if reference.trim_end() != text.trim_end() {
        warn!("Found differences with the reference file {:?}", reference_path);
        print_diff(reference.trim_end(), text.trim_end(), "\n");
        whatever!("Difference detected between the loaded results and the reference results")
    }
    info!("Results match the reference {:?}", reference_path);
    Ok(())
}

/// Runs all the loads described by the arguments, then writes the records.
pub fn run(args: &Args) -> NvResult<()> {
    let (config, root_p) = match args.config.as_deref() {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root_p = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root_p)
        }
        None => (config_from_args(args)?, PathBuf::new()),
    };
    debug!("run: config: {:?}", config);

    let loader_config = config.loader_config();
    let mut sink = JsonLinesSink::new(Vec::new());
    let mut total = LoadSummary::default();
    for source in config.elections.iter() {
        let summary = load_file(&root_p, source, &loader_config, &mut sink)?;
        total.rows_read += summary.rows_read;
        total.rows_skipped += summary.rows_skipped;
    }
    info!(
        "run: {} files, {} rows read, {} skipped, {} results written",
        config.elections.len(),
        total.rows_read,
        total.rows_skipped,
        sink.written()
    );

    let text = match String::from_utf8(sink.into_inner()) {
        Ok(s) => s,
        Err(e) => whatever!("Output is not valid UTF-8: {}", e),
    };
    write_output(args.out.as_deref(), &text)?;

    if let Some(reference_path) = args.reference.as_deref() {
        check_reference(reference_path, &text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nvload::io_csv::latin1_csv_rows;

    const PRECINCT_CSV: &[u8] = b"precinct,office,candidate,party,votes\n\
        Ward 3,GOVERNOR (DEM),Jane Doe,,\"4,500\"\n\
        Ward 3,COUNTY SHERIFF (DEM),John Roe,,12\n\
        Pe\xf1a 1,\"STATE SENATE, DISTRICT 5 (REP)\",Ann Poe,,\n";

    const COUNTY_CSV: &[u8] = b"office,candidate,party,votes\n\
        \"STATE SENATE, DISTRICT 5\",John Roe,REP,\"1,001\"\n\
        GOVERNOR,Jane Doe,&nbsp;,17\n";

    fn mapping(election: &str, pre_processed_url: &str) -> ElectionMapping {
        ElectionMapping {
            election: election.to_string(),
            raw_url: "".to_string(),
            pre_processed_url: pre_processed_url.to_string(),
            ocd_id: "ocd-division/country:us/state:nv/county:washoe".to_string(),
            name: "Washoe".to_string(),
            generated_filename: Some("test.csv".to_string()),
        }
    }

    fn load_lines(csv: &[u8], m: &ElectionMapping) -> Vec<serde_json::Value> {
        let loader = Loader::select(m, &LoaderConfig::default());
        let mut sink = JsonLinesSink::new(Vec::new());
        loader
            .load(latin1_csv_rows(csv).unwrap(), &mut sink)
            .unwrap();
        String::from_utf8(sink.into_inner())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn precinct_csv_end_to_end() {
        let lines = load_lines(
            PRECINCT_CSV,
            &mapping("nv-2010-06-08-primary", "washoe__precinct.csv"),
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["office"], "GOVERNOR");
        assert_eq!(lines[0]["party"], "DEM");
        assert_eq!(lines[0]["primary_party"], "DEM");
        assert_eq!(lines[0]["full_name"], "Jane Doe");
        assert_eq!(lines[0]["votes"], 4500);
        assert_eq!(lines[0]["jurisdiction"], "Ward 3");
        assert_eq!(lines[0]["reporting_level"], "precinct");
        assert_eq!(lines[0].get("district"), None);
        assert_eq!(lines[1]["jurisdiction"], "Peña 1");
        assert_eq!(
            lines[1]["ocd_id"],
            "ocd-division/country:us/state:nv/county:washoe/precinct:peña_1"
        );
        assert_eq!(lines[1]["district"], "DISTRICT 5");
        assert_eq!(lines[1]["votes"], "N/A");
    }

    #[test]
    fn county_csv_end_to_end() {
        let lines = load_lines(COUNTY_CSV, &mapping("nv-2010-11-02-general", "washoe.csv"));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["office"], "STATE SENATE");
        assert_eq!(lines[0]["district"], "DISTRICT 5");
        assert_eq!(lines[0]["party"], "REP");
        assert_eq!(lines[0]["votes"], 1001);
        assert_eq!(lines[0]["jurisdiction"], "Washoe");
        assert_eq!(lines[1].get("party"), None);
        assert_eq!(lines[1]["election_type"], "general");
    }

    #[test]
    fn xml_sources_are_not_implemented() {
        let source = FileSource {
            mapping: ElectionMapping {
                raw_url: "http://example.org/results.xml".to_string(),
                ..mapping("nv-2014-11-04-general", "")
            },
            file_path: "/nonexistent/nvload/results.xml".to_string(),
            input_type: Some("csv".to_string()),
        };
        let mut sink = JsonLinesSink::new(Vec::new());
        match load_file(Path::new(""), &source, &LoaderConfig::default(), &mut sink) {
            Err(NvLoadError::Loading { source, .. }) => {
                assert!(matches!(source, LoadError::UnsupportedFormat { .. }))
            }
            x => panic!("unexpected {:?}", x),
        }
        assert_eq!(sink.written(), 0);
    }

    #[test]
    fn county_blank_votes_fail_the_file() {
        let csv: &[u8] = b"office,candidate,party,votes\n\
            GOVERNOR,Jane Doe,DEM,17\n\
            \"STATE SENATE, DISTRICT 5\",John Roe,,\n";
        let loader = Loader::select(
            &mapping("nv-2010-11-02-general", "washoe.csv"),
            &LoaderConfig::default(),
        );
        let mut sink = JsonLinesSink::new(Vec::new());
        let err = loader
            .load(latin1_csv_rows(csv).unwrap(), &mut sink)
            .unwrap_err();
        assert!(matches!(err.root(), LoadError::NonNumericVoteCount { .. }));
        assert!(sink.into_inner().is_empty());
    }
}
