use serde::{Deserialize, Serialize};

/// A user-entered VAT string normalized into its two components.
///
/// Produced by [`parse_vat_input`](super::parse_vat_input); immutable once
/// parsed. The country code is either empty (could not be determined) or
/// exactly two uppercase ASCII letters, with `GR` always rewritten to `EL`
/// before use against VIES-style services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatQuery {
    /// 2-letter country code, or empty when none could be determined.
    pub country_code: String,
    /// The VAT number without its country prefix.
    pub number: String,
}

impl VatQuery {
    /// Both parts present — the query can be sent to a validation service.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.country_code.is_empty() && !self.number.is_empty()
    }
}

/// Company details produced by a lookup client.
///
/// Providers differ in what they return; fields a provider does not supply
/// stay empty rather than failing the lookup. `valid: false` is a definitive
/// provider answer ("this number is not registered"), which clients keep
/// distinct from transport errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    /// Whether the provider reports the number as currently registered.
    pub valid: bool,
    /// 2-letter code of the registry that answered (Greece is `EL`).
    pub country_code: String,
    /// The VAT number the provider confirmed, without country prefix.
    pub vat_number: String,
    /// Registered company name.
    pub name: String,
    /// Street address as returned by the provider, possibly multi-line.
    pub address: String,
    pub city: String,
    pub postcode: String,
    /// Greek tax office (ΔΟΥ) — supplied by AADE only.
    pub tax_office: String,
    /// Registered business-activity descriptions — supplied by AADE only.
    pub activities: Vec<String>,
}
