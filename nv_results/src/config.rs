// ********* Input data structures ***********

use serde::{Deserialize, Serialize, Serializer};
use snafu::prelude::*;

/// One line of a results file, as a mapping from field name to raw text.
///
/// The field names come from the first row of the file and their order is not
/// fixed from one file to the next, so the parsing code only addresses fields
/// by name. Names are trimmed and lowercased when they are inserted and when
/// they are looked up.
///
/// ```
/// use nv_results::RawRow;
///
/// let row = RawRow::from_pairs([("Office ", "GOVERNOR"), ("votes", "1,234")]);
/// assert_eq!(row.get("office"), Some("GOVERNOR"));
/// assert_eq!(row.get("precinct"), None);
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RawRow {
    fields: Vec<(String, String)>,
}

fn normalize_field_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl RawRow {
    pub fn new() -> RawRow {
        RawRow { fields: Vec::new() }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> RawRow
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut row = RawRow::new();
        for (k, v) in pairs {
            row.insert(k.as_ref(), v);
        }
        row
    }

    /// Sets a field. A name that is already present keeps its position and
    /// takes the new value.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let key = normalize_field_name(name);
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let key = normalize_field_name(name);
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Like `get`, but a missing field is an error.
    pub fn field(&self, name: &str) -> LoadResult<&str> {
        self.get(name).context(MissingFieldSnafu { field: name })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The metadata describing one results file, as listed by the data source.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionMapping {
    /// Election identifier, for example `nv-2004-09-07-primary`.
    pub election: String,
    /// Location of the structured (XML) version of the results, if any.
    #[serde(rename = "rawUrl", default)]
    pub raw_url: String,
    #[serde(rename = "preProcessedUrl", default)]
    pub pre_processed_url: String,
    /// OCD division of the jurisdiction the file covers.
    #[serde(rename = "ocdId")]
    pub ocd_id: String,
    /// Display name of the jurisdiction, for example `Washoe`.
    pub name: String,
    #[serde(rename = "generatedFilename")]
    pub generated_filename: Option<String>,
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingLevel {
    Precinct,
    County,
}

/// The contest part of a row, as extracted from the office text.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ContestAttributes {
    pub office: String,
    pub district: Option<String>,
    pub primary_party: Option<String>,
    /// Always equal to `primary_party`. County files may override it later
    /// with the content of their own party column.
    pub party: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateAttributes {
    pub full_name: String,
}

/// A vote count that is either a number or explicitly missing.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum VoteCount {
    Count(u64),
    /// Precinct files leave the vote cell empty when no data was reported.
    NotApplicable,
}

impl Serialize for VoteCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VoteCount::Count(n) => serializer.serialize_u64(*n),
            VoteCount::NotApplicable => serializer.serialize_str("N/A"),
        }
    }
}

/// The fields shared by every record produced from one file.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct CommonFields {
    pub election_id: String,
    pub state: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub election_type: Option<String>,
}

/// The canonical result record: one candidate, in one contest, in one jurisdiction.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct NormalizedResult {
    #[serde(flatten)]
    pub common: CommonFields,
    pub reporting_level: ReportingLevel,
    pub office: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_party: Option<String>,
    pub full_name: String,
    pub jurisdiction: String,
    pub ocd_id: String,
    pub votes: VoteCount,
}

/// Errors that stop a file from being loaded.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LoadError {
    #[snafu(display("Malformed office field {office:?}: {reason}"))]
    MalformedOfficeField { office: String, reason: String },

    #[snafu(display("Non-numeric vote count {value:?}"))]
    NonNumericVoteCount {
        value: String,
        source: std::num::ParseIntError,
    },

    #[snafu(display("Format not implemented: {format}"))]
    UnsupportedFormat { format: String },

    #[snafu(display("Missing field {field:?}"))]
    MissingField { field: String },

    #[snafu(display("Line {lineno}: {source}"))]
    AtLine {
        lineno: usize,
        #[snafu(source(from(LoadError, Box::new)))]
        source: Box<LoadError>,
    },

    #[snafu(display("Failed to read row: {source}"))]
    RowSource {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[snafu(display("Failed to store results: {source}"))]
    Sink {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl LoadError {
    /// Strips the line number wrapper, if any.
    pub fn root(&self) -> &LoadError {
        match self {
            LoadError::AtLine { source, .. } => source.root(),
            e => e,
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

// ********* Configuration **********

/// The offices that are loaded. Everything else in a file is skipped.
pub const TRACKED_OFFICES: [&str; 12] = [
    "PRESIDENT AND VICE PRESIDENT OF THE UNITED STATES",
    "PRESIDENT",
    "UNITED STATES SENATOR",
    "U.S. REPRESENTATIVE IN CONGRESS",
    "GOVERNOR",
    "LIEUTENANT GOVERNOR",
    "SECRETARY OF STATE",
    "STATE TREASURER",
    "STATE CONTROLLER",
    "ATTORNEY GENERAL",
    "STATE SENATE",
    "STATE ASSEMBLY",
];

/// The 2004 primary files write the district right after the office, without a comma.
pub const LEGACY_DISTRICT_YEARS: [i32; 1] = [2004];

/// Settings shared by all the loaders of a run.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LoaderConfig {
    pub state: String,
    pub tracked_offices: Vec<String>,
    pub legacy_district_years: Vec<i32>,
}

impl LoaderConfig {
    pub const DEFAULT_STATE: &'static str = "NV";
}

impl Default for LoaderConfig {
    fn default() -> LoaderConfig {
        LoaderConfig {
            state: LoaderConfig::DEFAULT_STATE.to_string(),
            tracked_offices: TRACKED_OFFICES.iter().map(|s| s.to_string()).collect(),
            legacy_district_years: LEGACY_DISTRICT_YEARS.to_vec(),
        }
    }
}
