use log::debug;
use nv_results::{ElectionMapping, LoaderConfig};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use std::fs;

use crate::args::Args;
use crate::nvload::*;

const DEFAULT_OCD_ID: &str = "ocd-division/country:us/state:nv";
const DEFAULT_NAME: &str = "Nevada";

/// One file to load, with the metadata of its election.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    #[serde(flatten)]
    pub mapping: ElectionMapping,
    #[serde(rename = "filePath")]
    pub file_path: String,
    /// `csv` or `xlsx`. Guessed from the file extension when missing.
    #[serde(rename = "inputType")]
    pub input_type: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct NvConfig {
    pub state: Option<String>,
    #[serde(rename = "legacyDistrictYears")]
    pub legacy_district_years: Option<Vec<i32>>,
    #[serde(rename = "trackedOffices")]
    pub tracked_offices: Option<Vec<String>>,
    pub elections: Vec<FileSource>,
}

impl NvConfig {
    pub fn loader_config(&self) -> LoaderConfig {
        let default = LoaderConfig::default();
        LoaderConfig {
            state: self.state.clone().unwrap_or(default.state),
            tracked_offices: self
                .tracked_offices
                .clone()
                .unwrap_or(default.tracked_offices),
            legacy_district_years: self
                .legacy_district_years
                .clone()
                .unwrap_or(default.legacy_district_years),
        }
    }
}

pub fn parse_config(contents: &str, path: &str) -> NvResult<NvConfig> {
    serde_json::from_str(contents).context(ParsingJsonSnafu { path })
}

pub fn read_config(path: &str) -> NvResult<NvConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config = parse_config(&contents, path)?;
    debug!("read_config: {} elections in {:?}", config.elections.len(), path);
    Ok(config)
}

/// The reference output, in JSON lines.
pub fn read_reference(path: &str) -> NvResult<String> {
    fs::read_to_string(path).context(OpeningJsonSnafu { path })
}

/// Builds a configuration with a single file from the command line flags.
pub fn config_from_args(args: &Args) -> NvResult<NvConfig> {
    let input = args
        .input
        .clone()
        .context(MissingArgumentSnafu { name: "input" })?;
    let election = args
        .election
        .clone()
        .context(MissingArgumentSnafu { name: "election" })?;
    let mapping = ElectionMapping {
        election,
        raw_url: args.raw_url.clone().unwrap_or_default(),
        pre_processed_url: input.clone(),
        ocd_id: args
            .ocd_id
            .clone()
            .unwrap_or_else(|| DEFAULT_OCD_ID.to_string()),
        name: args.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_string()),
        generated_filename: None,
    };
    Ok(NvConfig {
        state: None,
        legacy_district_years: None,
        tracked_offices: None,
        elections: vec![FileSource {
            mapping,
            file_path: input,
            input_type: args.input_type.clone(),
        }],
    })
}
