//! Client for the AADE business-registry SOAP service (`RgWsPublic2`).
//!
//! Looks up a Greek VAT number (ΑΦΜ) and returns the registry record:
//! company name, tax office (ΔΟΥ), postal address, and registered business
//! activities. Cleaned response bodies are cached for one hour per VAT
//! number, so repeated checkout edits do not hammer the registry.

mod envelope;
mod extract;

pub use extract::{extract_activities, extract_field, strip_namespace_prefixes};

use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;

use crate::core::LookupResult;

const AADE_ENDPOINT: &str = "https://www1.gsis.gr/wsaade/RgWsPublic2/RgWsPublic2";
const CACHE_TTL: Duration = Duration::from_secs(60 * 60);
const CACHE_CAPACITY: u64 = 10_000;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Credentials for the registry's WS-Security header.
///
/// Issued per shop by AADE. Injected at client construction; `Debug` output
/// redacts the password.
#[derive(Clone)]
pub struct AadeCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AadeCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AadeCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Error from the AADE registry client.
///
/// All variants mean "the answer is unavailable right now" — an invalid VAT
/// number is not an error but a [`LookupResult`] with `valid: false`.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum AadeError {
    /// Network or HTTP error.
    #[error("AADE network error: {0}")]
    Network(String),
    /// The registry returned a body no record could be read from.
    #[error("AADE parse error: {0}")]
    Parse(String),
    /// SOAP envelope construction failed.
    #[error("SOAP envelope error: {0}")]
    Envelope(String),
}

/// AADE registry client with a one-hour response cache.
#[derive(Clone)]
pub struct AadeClient {
    endpoint: String,
    timeout: Duration,
    credentials: AadeCredentials,
    cache: Cache<String, String>,
}

impl std::fmt::Debug for AadeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AadeClient")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl AadeClient {
    /// Create a client for the production registry endpoint.
    #[must_use]
    pub fn new(credentials: AadeCredentials) -> Self {
        Self {
            endpoint: AADE_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            credentials,
            cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    /// Override the service URL (tests, proxies).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the cache time-to-live. Rebuilds the cache, dropping any
    /// entries already stored.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(ttl)
            .build();
        self
    }

    /// Fetch the registry record for a VAT number, returning the cleaned
    /// XML body.
    ///
    /// A cached body is returned when one exists for the number; otherwise
    /// the SOAP request is issued once, with no retry, and a successful
    /// response is cached for one hour. The cache holds no lock across the
    /// network call, so two concurrent first-time lookups for the same
    /// number may both reach the registry; the lookup is idempotent and the
    /// second write wins.
    ///
    /// Namespace prefixes are stripped from the body before caching so that
    /// [`extract_field`] can stay namespace-naive.
    ///
    /// # Errors
    ///
    /// [`AadeError::Network`] on connection failures, timeouts, and
    /// non-success HTTP statuses. Callers must surface these as "registry
    /// unavailable", never as "VAT not valid".
    pub async fn lookup(&self, vat_id: &str) -> Result<String, AadeError> {
        if let Some(cached) = self.cache.get(vat_id).await {
            tracing::debug!(vat_id, "AADE cache hit");
            return Ok(cached);
        }

        let envelope = envelope::afm_request(&self.credentials, vat_id)?;

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| AadeError::Network(e.to_string()))?;

        tracing::debug!(vat_id, endpoint = %self.endpoint, "querying AADE registry");
        let response = http
            .post(&self.endpoint)
            // The service expects an empty content type.
            .header(reqwest::header::CONTENT_TYPE, "")
            .body(envelope)
            .send()
            .await
            .map_err(|e| AadeError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AadeError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(AadeError::Network(format!("HTTP {status}")));
        }

        let cleaned = strip_namespace_prefixes(&body);
        self.cache.insert(vat_id.to_string(), cleaned.clone()).await;
        Ok(cleaned)
    }

    /// Look up a VAT number and extract the company record.
    ///
    /// A record without a non-empty `deactivation_flag` means the number is
    /// not an active registration; the result then carries `valid: false`
    /// with all detail fields empty, distinct from the transport errors.
    pub async fn company_details(&self, vat_id: &str) -> Result<LookupResult, AadeError> {
        let xml = self.lookup(vat_id).await?;

        let registered = extract_field(&xml, "deactivation_flag").is_some_and(|f| !f.is_empty());
        if !registered {
            return Ok(LookupResult {
                country_code: "EL".into(),
                vat_number: vat_id.to_string(),
                ..LookupResult::default()
            });
        }

        let field = |name: &str| extract_field(&xml, name).unwrap_or_default();

        let street = field("postal_address");
        let street_no = field("postal_address_no");
        let address = [street, street_no]
            .iter()
            .filter(|part| !part.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");

        Ok(LookupResult {
            valid: true,
            country_code: "EL".into(),
            vat_number: vat_id.to_string(),
            name: field("onomasia"),
            address,
            city: field("postal_area_description"),
            postcode: field("postal_zip_code"),
            tax_office: field("doy_descr"),
            activities: extract_activities(&xml),
        })
    }
}
