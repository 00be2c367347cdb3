use log::debug;

pub use crate::config::*;
use crate::parser::{parse_candidate, parse_contest, parse_vote_count, OfficeFormat};
use crate::text::ocd_type_id;

/// Placeholder left in the party column by the HTML to CSV conversion.
const NBSP_PLACEHOLDER: &str = "&nbsp;";

/// The jurisdiction a results file covers.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Jurisdiction {
    pub name: String,
    /// OCD division id. Precinct ids are built under it.
    pub ocd_id: String,
}

/// Assembles result records from the rows of one file.
///
/// All the context that does not come from the row itself is fixed at
/// construction, so building the same row twice gives the same record.
///
/// ```
/// use nv_results::builder::*;
/// use nv_results::parser::OfficeFormat;
///
/// let common = CommonFields {
///     election_id: "nv-2012-11-06-general".to_string(),
///     state: "NV".to_string(),
///     source: "20121106__nv__general__washoe__precinct.csv".to_string(),
///     start_date: Some("2012-11-06".to_string()),
///     election_type: Some("general".to_string()),
/// };
/// let jurisdiction = Jurisdiction {
///     name: "Washoe".to_string(),
///     ocd_id: "ocd-division/country:us/state:nv/county:washoe".to_string(),
/// };
/// let builder = RecordBuilder::new(common, ReportingLevel::Precinct, jurisdiction, OfficeFormat::General);
///
/// let row = RawRow::from_pairs([
///     ("office", "GOVERNOR"),
///     ("candidate", "Jane Doe"),
///     ("votes", "1,204"),
///     ("precinct", "Ward 3"),
/// ]);
/// let result = builder.build(&row)?;
/// assert_eq!(result.votes, VoteCount::Count(1204));
/// assert_eq!(result.ocd_id, "ocd-division/country:us/state:nv/county:washoe/precinct:ward_3");
/// # Ok::<(), LoadError>(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RecordBuilder {
    pub(crate) _common: CommonFields,
    pub(crate) _level: ReportingLevel,
    pub(crate) _jurisdiction: Jurisdiction,
    pub(crate) _format: OfficeFormat,
}

impl RecordBuilder {
    pub fn new(
        common: CommonFields,
        level: ReportingLevel,
        jurisdiction: Jurisdiction,
        format: OfficeFormat,
    ) -> RecordBuilder {
        RecordBuilder {
            _common: common,
            _level: level,
            _jurisdiction: jurisdiction,
            _format: format,
        }
    }

    pub fn reporting_level(&self) -> ReportingLevel {
        self._level
    }

    pub fn format(&self) -> OfficeFormat {
        self._format
    }

    pub fn build(&self, row: &RawRow) -> LoadResult<NormalizedResult> {
        let contest = parse_contest(row, self._format)?;
        let candidate = parse_candidate(row)?;

        let (jurisdiction, ocd_id, party, votes) = match self._level {
            ReportingLevel::Precinct => {
                let jurisdiction = row.field("precinct")?.trim().to_string();
                let ocd_id = format!(
                    "{}/precinct:{}",
                    self._jurisdiction.ocd_id,
                    ocd_type_id(&jurisdiction)
                );
                let raw_votes = row.field("votes")?;
                let votes = if raw_votes.trim().is_empty() {
                    VoteCount::NotApplicable
                } else {
                    VoteCount::Count(parse_vote_count(raw_votes)?)
                };
                (jurisdiction, ocd_id, contest.party, votes)
            }
            ReportingLevel::County => {
                let votes = VoteCount::Count(parse_vote_count(row.field("votes")?)?);
                (
                    self._jurisdiction.name.clone(),
                    self._jurisdiction.ocd_id.clone(),
                    county_party(row),
                    votes,
                )
            }
        };

        let res = NormalizedResult {
            common: self._common.clone(),
            reporting_level: self._level,
            office: contest.office,
            district: contest.district,
            party,
            primary_party: contest.primary_party,
            full_name: candidate.full_name,
            jurisdiction,
            ocd_id,
            votes,
        };
        debug!("build: {:?}", res);
        Ok(res)
    }
}

// County files carry the party in its own column.
fn county_party(row: &RawRow) -> Option<String> {
    match row.get("party").map(str::trim) {
        Some(p) if !p.is_empty() && p != NBSP_PLACEHOLDER => Some(p.to_string()),
        _ => None,
    }
}
