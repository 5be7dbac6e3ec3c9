//! Best-effort postal address decomposition.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A postcode-led line: up to three letters, three to five digits,
/// whitespace, then the city name.
static POSTCODE_CITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{0,3}[0-9]{3,5})\s+(.+)$").expect("valid regex"));

/// One postal address split into checkout form components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitAddress {
    /// First non-blank line of the address.
    pub line1: String,
    pub city: String,
    pub postcode: String,
}

/// Split a multi-line provider address into street line, city, and postcode.
///
/// Lines are separated by CR, LF, or CRLF. The first non-blank line becomes
/// `line1`; the remaining lines are scanned in reverse for a short
/// alphanumeric code followed by text (e.g. `10562 Athens`), and the first
/// hit supplies `postcode` and `city`.
///
/// This is a heuristic for the address strings VAT registries return, not a
/// general postal parser — addresses that do not follow the pattern yield an
/// empty `city`/`postcode`.
#[must_use]
pub fn split_address(raw: &str) -> SplitAddress {
    let lines: Vec<&str> = raw
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let line1 = lines.first().copied().unwrap_or_default().to_string();

    let mut city = String::new();
    let mut postcode = String::new();
    for line in lines.iter().rev() {
        if let Some(caps) = POSTCODE_CITY.captures(line) {
            postcode = caps[1].to_string();
            city = caps[2].trim().to_string();
            break;
        }
    }

    SplitAddress {
        line1,
        city,
        postcode,
    }
}
