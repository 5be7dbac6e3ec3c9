//! Shared types and the pure-string plumbing every lookup path relies on:
//! VAT input normalization and best-effort address splitting.

mod address;
mod error;
mod parse;
mod types;

pub use address::{SplitAddress, split_address};
pub use error::ValidationError;
pub use parse::{
    MIN_LOOKUP_DIGITS, digit_count, iso_country_code, parse_vat_input, strip_greek_prefix,
};
pub use types::{LookupResult, VatQuery};
