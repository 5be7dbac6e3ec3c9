//! VAT input normalization.

use super::types::VatQuery;

/// Minimum digit count before a lookup against a remote registry is worth
/// issuing. Shorter inputs are still being typed.
pub const MIN_LOOKUP_DIGITS: usize = 7;

/// Normalize a raw user-entered VAT string into a [`VatQuery`].
///
/// All non-alphanumeric characters are stripped and the remainder is
/// uppercased. A leading pair of ASCII letters is taken as the country code
/// and the rest as the number; otherwise the code comes from the first two
/// letters of `fallback_country` (typically the billing-country selection)
/// and the whole stripped input is the number. The Greek ISO code `GR` is
/// rewritten to `EL`, the prefix the VAT services expect.
///
/// Fails softly: when no country code can be determined the returned query
/// has an empty `country_code`, and callers must treat it as invalid input.
///
/// ```rust
/// use timologio::core::parse_vat_input;
///
/// let q = parse_vat_input("GR123456789", None);
/// assert_eq!((q.country_code.as_str(), q.number.as_str()), ("EL", "123456789"));
///
/// let q = parse_vat_input("123456789", Some("DE"));
/// assert_eq!((q.country_code.as_str(), q.number.as_str()), ("DE", "123456789"));
/// ```
#[must_use]
pub fn parse_vat_input(raw: &str, fallback_country: Option<&str>) -> VatQuery {
    let cleaned: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_uppercase();

    let has_prefix = cleaned.len() >= 2
        && cleaned.as_bytes()[0].is_ascii_alphabetic()
        && cleaned.as_bytes()[1].is_ascii_alphabetic();

    let (country_code, number) = if has_prefix {
        (cleaned[..2].to_string(), cleaned[2..].to_string())
    } else {
        let fallback: String = fallback_country
            .unwrap_or_default()
            .chars()
            .filter(char::is_ascii_alphabetic)
            .take(2)
            .collect::<String>()
            .to_uppercase();
        let code = if fallback.len() == 2 {
            fallback
        } else {
            String::new()
        };
        (code, cleaned)
    };

    VatQuery {
        country_code: apply_greek_alias(country_code),
        number,
    }
}

fn apply_greek_alias(code: String) -> String {
    if code == "GR" { "EL".into() } else { code }
}

/// Remove a single leading `EL` prefix (any case) from a VAT string.
///
/// The AADE registry takes the bare nine-digit ΑΦΜ, while buyers routinely
/// type the number with the VIES prefix.
#[must_use]
pub fn strip_greek_prefix(raw: &str) -> &str {
    let trimmed = raw.trim();
    // Byte-wise check keeps the slice on a char boundary for any input.
    let bytes = trimmed.as_bytes();
    if bytes.len() >= 2 && bytes[0].eq_ignore_ascii_case(&b'E') && bytes[1].eq_ignore_ascii_case(&b'L') {
        &trimmed[2..]
    } else {
        trimmed
    }
}

/// Map a VAT-service country code back to its ISO 3166 form.
///
/// The only divergence is Greece: VAT services use `EL`, billing-country
/// selectors use `GR`.
#[must_use]
pub fn iso_country_code(vat_country: &str) -> &str {
    if vat_country == "EL" { "GR" } else { vat_country }
}

/// Count of ASCII digits in a raw VAT string.
///
/// Front ends gate remote lookups on [`MIN_LOOKUP_DIGITS`] to avoid firing
/// requests on half-typed numbers.
#[must_use]
pub fn digit_count(raw: &str) -> usize {
    raw.chars().filter(char::is_ascii_digit).count()
}
