use log::debug;
use std::collections::HashSet;

use crate::config::*;
use crate::parser::OfficeFormat;

/// Decides which rows of a file are loaded, based on the office they report.
///
/// Only the part of the office text before the first comma is looked at, so the
/// decision does not depend on the district or party layout of the file. A party
/// suffix (`GOVERNOR (DEM)`) is ignored as well. A district written without a
/// comma (`STATE SENATE DISTRICT 5`) is only recognized in the legacy primary
/// layout, see [`OfficeFilter::for_format`].
///
/// ```
/// use nv_results::{OfficeFilter, RawRow};
///
/// let filter = OfficeFilter::default();
/// assert!(!filter.skip_row(&RawRow::from_pairs([("office", "State Senate, District 5")])));
/// assert!(filter.skip_row(&RawRow::from_pairs([("office", "COUNTY SHERIFF")])));
/// ```
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct OfficeFilter {
    tracked: HashSet<String>,
    legacy_district: bool,
}

const DISTRICT_SUFFIX: &str = " DISTRICT";

fn office_key(office: &str) -> String {
    office.trim().to_uppercase()
}

fn office_prefix(office: &str) -> &str {
    let prefix = office.split(',').next().unwrap_or(office);
    prefix.split('(').next().unwrap_or(prefix)
}

impl OfficeFilter {
    pub fn new<I, S>(offices: I) -> OfficeFilter
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        OfficeFilter {
            tracked: offices.into_iter().map(|s| office_key(s.as_ref())).collect(),
            legacy_district: false,
        }
    }

    /// Adapts the filter to the office layout of a file. Only the legacy primary
    /// layout writes districts without a comma; elsewhere such rows are skipped.
    pub fn for_format(mut self, format: OfficeFormat) -> OfficeFilter {
        self.legacy_district = matches!(
            format,
            OfficeFormat::Primary {
                legacy_district: true
            }
        );
        self
    }

    pub fn is_tracked(&self, office: &str) -> bool {
        self.tracked.contains(&office_key(office))
    }

    /// True if the row does not report one of the tracked offices.
    pub fn skip_row(&self, row: &RawRow) -> bool {
        match row.get("office") {
            Some(office) => {
                let key = office_key(office_prefix(office));
                let tracked = self.tracked.contains(&key)
                    || (self.legacy_district
                        && key
                            .find(DISTRICT_SUFFIX)
                            .map(|idx| self.tracked.contains(key[..idx].trim_end()))
                            .unwrap_or(false));
                !tracked
            }
            None => {
                debug!("skip_row: no office field in {:?}", row);
                true
            }
        }
    }
}

impl Default for OfficeFilter {
    fn default() -> OfficeFilter {
        OfficeFilter::new(TRACKED_OFFICES)
    }
}
