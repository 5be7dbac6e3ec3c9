//! Invoice-versus-receipt checkout rules.
//!
//! A Greek shop issues either a receipt ("απόδειξη") or an invoice
//! ("τιμολόγιο") per order, and invoice orders must carry the buyer's tax
//! details. This module owns the order-type state, the conditional
//! validation of the extra fields, and the mapping of submitted values onto
//! order metadata. Showing and hiding the fields while the buyer flips the
//! selector is a rendering concern; only validation is enforced here.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::ValidationError;

/// Form key carrying the order-type selection.
pub const FIELD_TYPE_OF_ORDER: &str = "type_of_order";

/// Checkout form keys for the invoice fields.
pub const FIELD_BILLING_VAT: &str = "billing_vat";
/// Tax office (ΔΟΥ).
pub const FIELD_BILLING_IRS: &str = "billing_irs";
pub const FIELD_BILLING_COMPANY: &str = "billing_company";
pub const FIELD_BILLING_ACTIVITY: &str = "billing_activity";

/// Fields that must be filled before an invoice order may be placed,
/// with the labels used in buyer-facing notices.
pub const REQUIRED_INVOICE_FIELDS: &[(&str, &str)] = &[
    (FIELD_BILLING_VAT, "ΑΦΜ"),
    (FIELD_BILLING_IRS, "ΔΟΥ"),
];

/// Order metadata keys and the form fields they are copied from.
pub const ORDER_META_FIELDS: &[(&str, &str)] = &[
    ("_type_of_order", FIELD_TYPE_OF_ORDER),
    ("_billing_vat_id", FIELD_BILLING_VAT),
    ("_billing_company", FIELD_BILLING_COMPANY),
    ("_billing_activity", FIELD_BILLING_ACTIVITY),
];

/// Metadata keys shown on an order's admin view, with display labels.
pub const ADMIN_DISPLAY_FIELDS: &[(&str, &str)] = &[
    ("_billing_vat_id", "AFM"),
    ("_billing_activity", "Activity"),
    ("_billing_company", "Company Name"),
];

/// Whether an order gets a receipt or an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Receipt — the default for consumer orders.
    #[default]
    Apodeixi,
    /// Invoice — requires the buyer's tax details.
    Timologio,
}

/// Raised when a string is neither `apodeixi` nor `timologio`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOrderType(pub String);

impl fmt::Display for UnknownOrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order type '{}'", self.0)
    }
}

impl std::error::Error for UnknownOrderType {}

impl OrderType {
    /// The wire value used in form fields and order metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apodeixi => "apodeixi",
            Self::Timologio => "timologio",
        }
    }

    /// Invoice orders show and require the extra tax fields.
    #[must_use]
    pub const fn requires_invoice_fields(self) -> bool {
        matches!(self, Self::Timologio)
    }

    /// Read the order type out of a submitted form value.
    ///
    /// Absent or unrecognized values fall back to the receipt default, the
    /// same way an untouched selector does.
    #[must_use]
    pub fn from_form_value(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = UnknownOrderType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apodeixi" => Ok(Self::Apodeixi),
            "timologio" => Ok(Self::Timologio),
            other => Err(UnknownOrderType(other.to_string())),
        }
    }
}

/// Validate a checkout submission.
///
/// Receipt orders pass unconditionally. Invoice orders must carry every
/// field in [`REQUIRED_INVOICE_FIELDS`]; one error per missing field is
/// returned so the buyer sees the full list of gaps, not just the first.
#[must_use]
pub fn validate_submission(
    order_type: OrderType,
    fields: &HashMap<String, String>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if !order_type.requires_invoice_fields() {
        return errors;
    }

    for &(key, label) in REQUIRED_INVOICE_FIELDS {
        let missing = fields.get(key).is_none_or(|v| v.trim().is_empty());
        if missing {
            errors.push(ValidationError::new(
                key,
                format!("Please fill in the {label} field."),
            ));
        }
    }
    errors
}

/// Copy the submitted values that belong on the order into metadata pairs.
///
/// Only fields present in the submission are copied; the write itself (and
/// any failure of it) belongs to the order store.
#[must_use]
pub fn collect_order_meta(fields: &HashMap<String, String>) -> Vec<(String, String)> {
    ORDER_META_FIELDS
        .iter()
        .filter_map(|&(meta_key, form_key)| {
            fields
                .get(form_key)
                .map(|value| (meta_key.to_string(), value.clone()))
        })
        .collect()
}

/// Label/value pairs for the populated invoice fields of an order.
///
/// Blank fields are skipped rather than shown empty.
#[must_use]
pub fn admin_display_lines(meta: &HashMap<String, String>) -> Vec<(&'static str, String)> {
    ADMIN_DISPLAY_FIELDS
        .iter()
        .filter_map(|&(key, label)| {
            meta.get(key)
                .filter(|value| !value.trim().is_empty())
                .map(|value| (label, value.clone()))
        })
        .collect()
}
