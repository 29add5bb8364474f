// Sequential invoice numbering scoped by issue year+month.
//
// Numbers look like FAC-202608-14: the suffix restarts at 1 each period
// and is derived from the highest suffix already stored for that period.
// The scan and the insert share one transaction and the number column is
// UNIQUE, so a same-period collision surfaces as an error instead of a
// duplicate number.

use chrono::NaiveDate;

const NUMBER_PREFIX: &str = "FAC";

/// Period tag for an issue date, e.g. 202608
pub fn period_tag(issued_on: NaiveDate) -> String {
    issued_on.format("%Y%m").to_string()
}

/// SQL LIKE pattern matching every number of the issue period
pub fn period_pattern(issued_on: NaiveDate) -> String {
    format!("{}-{}-%", NUMBER_PREFIX, period_tag(issued_on))
}

/// Format a full invoice number for a period and sequence value
pub fn format_number(issued_on: NaiveDate, sequence: u32) -> String {
    format!("{}-{}-{}", NUMBER_PREFIX, period_tag(issued_on), sequence)
}

/// Extract the numeric suffix from a stored invoice number.
///
/// Returns None when the number does not follow the FAC-YYYYMM-N shape;
/// callers treat that the same as "no previous number" (suffix restarts
/// at 1 on parse failure).
pub fn parse_suffix(number: &str) -> Option<u32> {
    number.rsplit_once('-').and_then(|(_, s)| s.parse().ok())
}

/// Compute the next sequence value from the numbers already stored for
/// the period.
pub fn next_sequence<'a, I>(existing: I) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    existing
        .into_iter()
        .filter_map(parse_suffix)
        .max()
        .map_or(1, |highest| highest + 1)
}
