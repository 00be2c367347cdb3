use log::{debug, info};
use snafu::prelude::*;

use crate::builder::{Jurisdiction, RecordBuilder};
use crate::config::*;
use crate::filter::OfficeFilter;
use crate::parser::OfficeFormat;

// ********* Persistence boundary ***********

/// Where the records of a file end up. Called once per file, with every record.
pub trait ResultSink {
    fn insert_many(&mut self, results: Vec<NormalizedResult>) -> LoadResult<()>;
}

/// Keeps the batches in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub batches: Vec<Vec<NormalizedResult>>,
}

impl MemorySink {
    pub fn new() -> MemorySink {
        MemorySink::default()
    }

    pub fn results(&self) -> impl Iterator<Item = &NormalizedResult> {
        self.batches.iter().flatten()
    }
}

impl ResultSink for MemorySink {
    fn insert_many(&mut self, results: Vec<NormalizedResult>) -> LoadResult<()> {
        self.batches.push(results);
        Ok(())
    }
}

// ********* Election identifiers ***********

/// The parts of an election id such as `nv-2004-09-07-primary`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionId {
    pub year: Option<i32>,
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// Whatever follows the date: `primary`, `general`, `special-general`...
    pub election_type: Option<String>,
    pub is_primary: bool,
}

impl ElectionId {
    pub fn parse(election_id: &str) -> ElectionId {
        let parts: Vec<&str> = election_id.split('-').collect();
        let date_parts = parts.get(1..4).filter(|ps| {
            ps.iter()
                .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
        });
        let (year, start_date, election_type) = match date_parts {
            Some(ps) => {
                let kind = parts[4..].join("-");
                (
                    ps[0].parse::<i32>().ok(),
                    Some(ps.join("-")),
                    if kind.is_empty() { None } else { Some(kind) },
                )
            }
            None => (None, None, None),
        };
        ElectionId {
            year,
            start_date,
            election_type,
            is_primary: election_id.contains("primary"),
        }
    }

    pub fn office_format(&self, legacy_district_years: &[i32]) -> OfficeFormat {
        if self.is_primary {
            OfficeFormat::Primary {
                legacy_district: self
                    .year
                    .map(|y| legacy_district_years.contains(&y))
                    .unwrap_or(false),
            }
        } else {
            OfficeFormat::General
        }
    }
}

// ********* Loaders ***********

/// Counters for one file.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub results_inserted: usize,
}

/// The loader for one results file, chosen from the file metadata.
///
/// ```
/// use nv_results::*;
///
/// let mapping = ElectionMapping {
///     election: "nv-2012-06-12-primary".to_string(),
///     raw_url: "".to_string(),
///     pre_processed_url: "20120612__nv__primary__clark__precinct.csv".to_string(),
///     ocd_id: "ocd-division/country:us/state:nv/county:clark".to_string(),
///     name: "Clark".to_string(),
///     generated_filename: None,
/// };
/// let loader = Loader::select(&mapping, &LoaderConfig::default());
/// assert_eq!(loader.reporting_level(), Some(ReportingLevel::Precinct));
///
/// let rows = vec![
///     Ok(RawRow::from_pairs([
///         ("office", "GOVERNOR (DEM)"),
///         ("candidate", "Jane Doe"),
///         ("votes", "4,500"),
///         ("precinct", "Ward 3"),
///     ])),
///     Ok(RawRow::from_pairs([
///         ("office", "COUNTY SHERIFF (DEM)"),
///         ("candidate", "John Roe"),
///         ("votes", "12"),
///         ("precinct", "Ward 3"),
///     ])),
/// ];
/// let mut sink = MemorySink::new();
/// let summary = loader.load(rows, &mut sink)?;
/// assert_eq!(summary.rows_skipped, 1);
/// assert_eq!(sink.batches.len(), 1);
/// # Ok::<(), LoadError>(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Loader {
    Precinct(RecordBuilder, OfficeFilter),
    County(RecordBuilder, OfficeFilter),
    /// Structured XML results, for the given election id. Not implemented.
    Xml(String),
}

impl Loader {
    /// Picks the loader: files with a structured version are XML, otherwise the
    /// pre-processed file name tells precinct and county files apart.
    pub fn select(mapping: &ElectionMapping, config: &LoaderConfig) -> Loader {
        let election = ElectionId::parse(&mapping.election);
        let common = CommonFields {
            election_id: mapping.election.clone(),
            state: config.state.to_uppercase(),
            source: mapping
                .generated_filename
                .clone()
                .unwrap_or_else(|| mapping.pre_processed_url.clone()),
            start_date: election.start_date.clone(),
            election_type: election.election_type.clone(),
        };
        let jurisdiction = Jurisdiction {
            name: mapping.name.clone(),
            ocd_id: mapping.ocd_id.clone(),
        };
        let format = election.office_format(&config.legacy_district_years);
        let filter = OfficeFilter::new(&config.tracked_offices).for_format(format);
        let builder = |level| RecordBuilder::new(common.clone(), level, jurisdiction.clone(), format);

        let loader = if !mapping.raw_url.is_empty() {
            Loader::Xml(mapping.election.clone())
        } else if mapping.pre_processed_url.contains("precinct") {
            Loader::Precinct(builder(ReportingLevel::Precinct), filter)
        } else {
            Loader::County(builder(ReportingLevel::County), filter)
        };
        debug!(
            "select: election {:?} -> {:?} ({:?})",
            mapping.election,
            loader.reporting_level(),
            format
        );
        loader
    }

    /// The reporting level of the records, or nothing if the format is not supported.
    pub fn reporting_level(&self) -> Option<ReportingLevel> {
        match self {
            Loader::Precinct(b, _) | Loader::County(b, _) => Some(b.reporting_level()),
            Loader::Xml(_) => None,
        }
    }

    /// True if the row is not loaded. Nothing is loaded from XML files.
    pub fn skip_row(&self, row: &RawRow) -> bool {
        match self {
            Loader::Precinct(_, f) | Loader::County(_, f) => f.skip_row(row),
            Loader::Xml(_) => true,
        }
    }

    /// Reads all the rows, then hands every record to the sink in one call.
    ///
    /// Nothing reaches the sink if any row fails.
    pub fn load<I, S>(&self, rows: I, sink: &mut S) -> LoadResult<LoadSummary>
    where
        I: IntoIterator<Item = LoadResult<RawRow>>,
        S: ResultSink + ?Sized,
    {
        let builder = match self {
            Loader::Precinct(b, _) | Loader::County(b, _) => b,
            Loader::Xml(election_id) => {
                return UnsupportedFormatSnafu {
                    format: format!("xml ({})", election_id),
                }
                .fail()
            }
        };

        let mut summary = LoadSummary::default();
        let mut results: Vec<NormalizedResult> = Vec::new();
        for (idx, row_r) in rows.into_iter().enumerate() {
            // Line 1 is the header.
            let lineno = idx + 2;
            let row = row_r.context(AtLineSnafu { lineno })?;
            summary.rows_read += 1;
            if self.skip_row(&row) {
                summary.rows_skipped += 1;
                continue;
            }
            let res = builder.build(&row).context(AtLineSnafu { lineno })?;
            results.push(res);
        }

        summary.results_inserted = results.len();
        sink.insert_many(results)?;
        info!(
            "load: {} ({:?}): {} rows read, {} skipped, {} results inserted",
            builder._common.source,
            builder.reporting_level(),
            summary.rows_read,
            summary.rows_skipped,
            summary.results_inserted
        );
        Ok(summary)
    }
}
