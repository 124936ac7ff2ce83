//! Team name abbreviation

use once_cell::sync::Lazy;
use regex::Regex;

static CLUB_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(FC|CF|CLUB|FOOTBALL|SOCCER)$").unwrap());

const ABBREVIATION_LENGTH: usize = 3;

/// Convert a team name to a three letter code
///
/// A trailing club suffix (`FC`, `CF`, `Club`, `Football`, `Soccer`) is
/// dropped, then the first three characters of the first word are
/// uppercased.
pub fn team_abbreviation(team_name: &str) -> String {
    let cleaned = CLUB_SUFFIX.replace(team_name, "");
    let cleaned = cleaned.trim().to_uppercase();

    cleaned
        .split_whitespace()
        .next()
        .unwrap_or("")
        .chars()
        .take(ABBREVIATION_LENGTH)
        .collect()
}
