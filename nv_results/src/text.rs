use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SEPARATOR_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").unwrap());

/// Lowercases the text, removes punctuation and joins the words with `substitute`.
///
/// ```
/// use nv_results::text::slugify;
///
/// assert_eq!(slugify("First Street & Oak Ave.", "-"), "first-street-oak-ave");
/// ```
pub fn slugify(text: &str, substitute: &str) -> String {
    let cleaned = NON_SLUG_CHARS.replace_all(text, "");
    let cleaned = cleaned.trim().to_lowercase();
    SEPARATOR_RUNS
        .replace_all(&cleaned, substitute)
        .into_owned()
}

/// Formats a jurisdiction name as the type id segment of an OCD division,
/// for example `precinct:ward_3`.
///
/// Leading zeros are dropped so that `007` and `7` name the same precinct.
pub fn ocd_type_id(text: &str) -> String {
    slugify(text.trim_start_matches('0'), "_")
}
