//! HTTP lookup endpoint.
//!
//! A single POST route, `/fetch-vat-details`, speaks the wire contract the
//! checkout field-sync scripts expect: a form-encoded request carrying the
//! VAT number and a shared security token, answered with JSON `{"success":
//! …, "data": …}`. The HTTP status is 200 for lookup failures too — clients
//! key off the `success` flag, and a failed lookup is a normal answer, not
//! a broken request.

mod config;

pub use config::{ConfigError, LookupSource, ServerConfig};

use std::sync::Arc;

use axum::{Form, Router, extract::State, response::Json, routing::post};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use crate::aade::{AadeClient, AadeCredentials};
use crate::core::{LookupResult, iso_country_code, parse_vat_input, split_address, strip_greek_prefix};
use crate::vies::{ViesClient, ViesError};

/// Shared state behind the lookup routes.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<StateInner>,
}

struct StateInner {
    config: ServerConfig,
    aade: Option<AadeClient>,
    vies: ViesClient,
}

impl AppState {
    /// Build the state from configuration, constructing the production
    /// clients. The AADE client exists only when credentials are configured.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let aade = (!config.aade_username.is_empty()).then(|| {
            AadeClient::new(AadeCredentials {
                username: config.aade_username.clone(),
                password: config.aade_password.expose_secret().to_string(),
            })
        });
        Self::with_clients(config, aade, ViesClient::new())
    }

    /// Build the state around pre-constructed clients (tests, alternative
    /// endpoints).
    #[must_use]
    pub fn with_clients(config: ServerConfig, aade: Option<AadeClient>, vies: ViesClient) -> Self {
        Self {
            inner: Arc::new(StateInner { config, aade, vies }),
        }
    }
}

/// Form payload of a lookup request.
#[derive(Debug, Deserialize)]
pub struct VatDetailsRequest {
    #[serde(default)]
    pub vat_number: String,
    /// ISO code of the selected billing country, used as the parser
    /// fallback when the VAT string carries no prefix.
    #[serde(default)]
    pub billing_country: Option<String>,
    /// Shared security token.
    #[serde(default)]
    pub security: String,
}

/// JSON payload of a successful lookup, keyed the way the checkout scripts
/// read it.
#[derive(Debug, Default, Serialize)]
pub struct VatDetailsPayload {
    /// Tax office — AADE lookups only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doy: Option<String>,
    /// Company name.
    pub epwnymia: String,
    /// Business-activity descriptions — AADE lookups only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drastiriotita: Option<Vec<String>>,
    /// Full address as the provider returned it.
    pub address: String,
    /// First address line — VIES lookups only, from the address splitter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    /// ISO country code for the billing-country selector.
    pub country: String,
    pub city: String,
    pub postcode: String,
}

/// Build the lookup router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/fetch-vat-details", post(fetch_vat_details))
        .with_state(state)
}

/// Resolve a VAT number into company details for the checkout form.
#[instrument(skip(state, form), fields(source = ?state.inner.config.source))]
async fn fetch_vat_details(
    State(state): State<AppState>,
    Form(form): Form<VatDetailsRequest>,
) -> Json<Value> {
    let config = &state.inner.config;

    if form.security.as_str() != config.security_token.expose_secret() {
        tracing::warn!("lookup request with a bad security token");
        return failure("Security check failed.");
    }

    if form.vat_number.trim().is_empty() {
        return failure("VAT number not provided.");
    }

    if !config.enabled {
        return failure("VAT lookup is disabled.");
    }

    match config.source {
        LookupSource::Aade => aade_details(&state, form.vat_number.trim()).await,
        LookupSource::Vies => vies_details(&state, &form).await,
        LookupSource::None => failure("VAT lookup is disabled."),
    }
}

async fn aade_details(state: &AppState, vat_number: &str) -> Json<Value> {
    let Some(client) = &state.inner.aade else {
        return failure("AADE lookup is not configured.");
    };

    let vat_id = strip_greek_prefix(vat_number);
    match client.company_details(vat_id).await {
        Ok(result) if result.valid => success(VatDetailsPayload {
            doy: Some(result.tax_office),
            epwnymia: result.name,
            drastiriotita: Some(result.activities),
            address: result.address,
            address_line1: None,
            country: "GR".into(),
            city: result.city,
            postcode: result.postcode,
        }),
        Ok(_) => failure("VAT number not valid."),
        Err(err) => {
            tracing::warn!(error = %err, "AADE lookup failed");
            failure("VAT lookup temporarily unavailable. Please try again.")
        }
    }
}

async fn vies_details(state: &AppState, form: &VatDetailsRequest) -> Json<Value> {
    let query = parse_vat_input(&form.vat_number, form.billing_country.as_deref());
    if !query.is_complete() {
        return failure("Could not determine the country code and VAT number.");
    }

    match state
        .inner
        .vies
        .check_vat(&query.country_code, &query.number)
        .await
    {
        Ok(result) if result.valid => success(vies_payload(result)),
        Ok(_) => failure("VAT number not valid."),
        Err(ViesError::MissingInput) => failure(ViesError::MissingInput.to_string()),
        Err(err) => {
            tracing::warn!(error = %err, "VIES lookup failed");
            failure(format!("VAT lookup temporarily unavailable: {err}"))
        }
    }
}

fn vies_payload(result: LookupResult) -> VatDetailsPayload {
    let split = split_address(&result.address);
    VatDetailsPayload {
        doy: None,
        epwnymia: result.name,
        drastiriotita: None,
        country: iso_country_code(&result.country_code).to_string(),
        address: result.address,
        address_line1: Some(split.line1),
        city: split.city,
        postcode: split.postcode,
    }
}

fn success(data: VatDetailsPayload) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

fn failure(message: impl Into<String>) -> Json<Value> {
    Json(json!({ "success": false, "data": { "message": message.into() } }))
}
