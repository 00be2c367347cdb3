//! Extraction of the contest and candidate attributes from a raw row.
//!
//! The office column packs three pieces of information into one string and
//! the layout changed over the years:
//!
//! | election        | example                                  |
//! |-----------------|------------------------------------------|
//! | general         | `STATE SENATE, DISTRICT 5`               |
//! | primary         | `STATE SENATE, DISTRICT 5 (DEM)`         |
//! | 2004 primary    | `STATE SENATE DISTRICT 5 (DEM)`          |
//!
//! All the functions here are pure.

use log::debug;
use snafu::prelude::*;

use crate::config::*;

/// How the office text of a file is laid out.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum OfficeFormat {
    /// `OFFICE[, DISTRICT N] (PARTY)`
    Primary {
        /// The district may follow the office without a comma.
        legacy_district: bool,
    },
    /// `OFFICE[, DISTRICT N]`
    General,
}

impl OfficeFormat {
    pub fn is_primary(&self) -> bool {
        matches!(self, OfficeFormat::Primary { .. })
    }
}

const DISTRICT_TOKEN: &str = "DISTRICT";
const DISTRICT_SEPARATOR: &str = ", ";

fn has_district_token(text: &str) -> bool {
    text.to_ascii_uppercase().contains(DISTRICT_TOKEN)
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Splits the office text into office, district and primary party.
///
/// ```
/// use nv_results::parser::{parse_office, OfficeFormat};
///
/// let c = parse_office("STATE SENATE, DISTRICT 5 (DEM)", OfficeFormat::Primary { legacy_district: false })?;
/// assert_eq!(c.office, "STATE SENATE");
/// assert_eq!(c.district.as_deref(), Some("DISTRICT 5"));
/// assert_eq!(c.primary_party.as_deref(), Some("DEM"));
///
/// let c = parse_office("GOVERNOR", OfficeFormat::General)?;
/// assert_eq!(c.district, None);
/// # Ok::<(), nv_results::LoadError>(())
/// ```
pub fn parse_office(text: &str, format: OfficeFormat) -> LoadResult<ContestAttributes> {
    let res = match format {
        OfficeFormat::Primary { legacy_district } => parse_primary_office(text, legacy_district),
        OfficeFormat::General => parse_general_office(text),
    }?;
    ensure!(
        !res.office.is_empty(),
        MalformedOfficeFieldSnafu {
            office: text,
            reason: "empty office name"
        }
    );
    debug!("parse_office: {:?} -> {:?}", text, res);
    Ok(res)
}

fn parse_primary_office(text: &str, legacy_district: bool) -> LoadResult<ContestAttributes> {
    let (head, rest) = text.split_once('(').context(MalformedOfficeFieldSnafu {
        office: text,
        reason: "missing party suffix",
    })?;
    let (party, _) = rest.split_once(')').context(MalformedOfficeFieldSnafu {
        office: text,
        reason: "unclosed party suffix",
    })?;
    let party = non_empty(party).context(MalformedOfficeFieldSnafu {
        office: text,
        reason: "empty party suffix",
    })?;

    let (office, district) = match head.split_once(DISTRICT_SEPARATOR) {
        Some((office, district)) if has_district_token(text) => (office, non_empty(district)),
        Some((office, _)) => (office, None),
        None if has_district_token(head) && legacy_district => split_at_district_token(head)
            .context(MalformedOfficeFieldSnafu {
                office: text,
                reason: "district token not found before the party suffix",
            })?,
        None if has_district_token(text) => {
            return MalformedOfficeFieldSnafu {
                office: text,
                reason: "district without a separator",
            }
            .fail()
        }
        None => (head, None),
    };

    Ok(ContestAttributes {
        office: office.trim().to_string(),
        district,
        primary_party: Some(party.clone()),
        party: Some(party),
    })
}

// The 2004 layout: `STATE SENATE DISTRICT 5`.
fn split_at_district_token(head: &str) -> Option<(&str, Option<String>)> {
    // ASCII uppercasing keeps the byte offsets valid for `head`.
    let idx = head.to_ascii_uppercase().find(DISTRICT_TOKEN)?;
    let (office, district) = head.split_at(idx);
    Some((office, non_empty(district)))
}

fn parse_general_office(text: &str) -> LoadResult<ContestAttributes> {
    let (office, district) = if has_district_token(text) {
        let (office, district) =
            text.split_once(DISTRICT_SEPARATOR)
                .context(MalformedOfficeFieldSnafu {
                    office: text,
                    reason: "district without a separator",
                })?;
        (office, non_empty(district))
    } else {
        (text, None)
    };
    Ok(ContestAttributes {
        office: office.trim().to_string(),
        district,
        primary_party: None,
        party: None,
    })
}

/// Reads the office column of a row and parses it.
pub fn parse_contest(row: &RawRow, format: OfficeFormat) -> LoadResult<ContestAttributes> {
    parse_office(row.field("office")?, format)
}

pub fn parse_candidate(row: &RawRow) -> LoadResult<CandidateAttributes> {
    Ok(CandidateAttributes {
        full_name: row.field("candidate")?.trim().to_string(),
    })
}

/// Parses a vote count written with thousands separators (`1,234`).
pub fn parse_vote_count(raw: &str) -> LoadResult<u64> {
    raw.replace(',', "")
        .trim()
        .parse::<u64>()
        .context(NonNumericVoteCountSnafu { value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIMARY: OfficeFormat = OfficeFormat::Primary {
        legacy_district: false,
    };
    const PRIMARY_2004: OfficeFormat = OfficeFormat::Primary {
        legacy_district: true,
    };

    fn contest(office: &str, district: Option<&str>, party: Option<&str>) -> ContestAttributes {
        ContestAttributes {
            office: office.to_string(),
            district: district.map(|s| s.to_string()),
            primary_party: party.map(|s| s.to_string()),
            party: party.map(|s| s.to_string()),
        }
    }

    fn is_malformed(r: LoadResult<ContestAttributes>) -> bool {
        matches!(r, Err(LoadError::MalformedOfficeField { .. }))
    }

    #[test]
    fn primary_office_and_party() {
        assert_eq!(
            parse_office("GOVERNOR (DEM)", PRIMARY).unwrap(),
            contest("GOVERNOR", None, Some("DEM"))
        );
        assert_eq!(
            parse_office("  UNITED STATES SENATOR ( REP ) ", PRIMARY).unwrap(),
            contest("UNITED STATES SENATOR", None, Some("REP"))
        );
    }

    #[test]
    fn primary_with_district() {
        assert_eq!(
            parse_office("STATE ASSEMBLY, DISTRICT 12 (REP)", PRIMARY).unwrap(),
            contest("STATE ASSEMBLY", Some("DISTRICT 12"), Some("REP"))
        );
        assert_eq!(
            parse_office("state senate, district 5 (dem)", PRIMARY).unwrap(),
            contest("state senate", Some("district 5"), Some("dem"))
        );
    }

    #[test]
    fn primary_with_district_in_2004_layout() {
        assert_eq!(
            parse_office("STATE SENATE DISTRICT 5 (DEM)", PRIMARY_2004).unwrap(),
            contest("STATE SENATE", Some("DISTRICT 5"), Some("DEM"))
        );
        // The comma layout is still understood that year.
        assert_eq!(
            parse_office("STATE SENATE, DISTRICT 5 (DEM)", PRIMARY_2004).unwrap(),
            contest("STATE SENATE", Some("DISTRICT 5"), Some("DEM"))
        );
        assert!(is_malformed(parse_office(
            "STATE SENATE DISTRICT 5 (DEM)",
            PRIMARY
        )));
        assert!(is_malformed(parse_office("DISTRICT 5 (DEM)", PRIMARY_2004)));
    }

    #[test]
    fn primary_without_party_is_malformed() {
        assert!(is_malformed(parse_office("GOVERNOR", PRIMARY)));
        assert!(is_malformed(parse_office("GOVERNOR (DEM", PRIMARY)));
        assert!(is_malformed(parse_office("GOVERNOR ( )", PRIMARY)));
        assert!(is_malformed(parse_office("(DEM)", PRIMARY)));
    }

    #[test]
    fn general_office() {
        assert_eq!(
            parse_office(" GOVERNOR ", OfficeFormat::General).unwrap(),
            contest("GOVERNOR", None, None)
        );
        assert_eq!(
            parse_office("STATE SENATE, DISTRICT 5", OfficeFormat::General).unwrap(),
            contest("STATE SENATE", Some("DISTRICT 5"), None)
        );
        // Only the first separator counts.
        assert_eq!(
            parse_office(
                "U.S. REPRESENTATIVE IN CONGRESS, DISTRICT 3, UNEXPIRED TERM",
                OfficeFormat::General
            )
            .unwrap(),
            contest(
                "U.S. REPRESENTATIVE IN CONGRESS",
                Some("DISTRICT 3, UNEXPIRED TERM"),
                None
            )
        );
        assert!(is_malformed(parse_office(
            "STATE SENATE DISTRICT 5",
            OfficeFormat::General
        )));
    }

    #[test]
    fn general_without_district_keeps_commas() {
        assert_eq!(
            parse_office("SECRETARY OF STATE, SHORT TERM", OfficeFormat::General).unwrap(),
            contest("SECRETARY OF STATE, SHORT TERM", None, None)
        );
    }

    #[test]
    fn vote_counts() {
        assert_eq!(parse_vote_count("1,234").unwrap(), 1234);
        assert_eq!(parse_vote_count(" 1,234,567 ").unwrap(), 1234567);
        assert_eq!(parse_vote_count("0").unwrap(), 0);
        for bad in ["", " ", "12a", "-4", "1.5", "N/A"] {
            match parse_vote_count(bad) {
                Err(LoadError::NonNumericVoteCount { value, .. }) => assert_eq!(value, bad),
                x => panic!("unexpected {:?} for {:?}", x, bad),
            }
        }
    }

    #[test]
    fn candidate_name_is_trimmed() {
        let row = RawRow::from_pairs([("candidate", "  Jane Doe ")]);
        assert_eq!(parse_candidate(&row).unwrap().full_name, "Jane Doe");
        assert!(matches!(
            parse_candidate(&RawRow::new()),
            Err(LoadError::MissingField { .. })
        ));
    }
}
