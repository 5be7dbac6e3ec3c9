//! EU VIES SOAP client for VAT number validation.
//!
//! Speaks the `checkVat` operation of the VIES service directly. VIES
//! answers for every member state, so this is the path for non-Greek VAT
//! numbers; Greek numbers usually go through the richer AADE registry.

use std::time::Duration;

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

use crate::core::LookupResult;
use crate::soap::{EnvelopeWriter, SoapResult, local_name};

const VIES_ENDPOINT: &str = "https://ec.europa.eu/taxation_customs/vies/services/checkVatService";
const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const CHECK_VAT_NS: &str = "urn:ec.europa.eu:taxud:vies:services:checkVat:types";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(6);

/// Error from the VIES service.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ViesError {
    /// Input precondition failed; nothing was sent over the network.
    #[error("Country code and VAT number are required.")]
    MissingInput,
    /// Network or HTTP error.
    #[error("VIES network error: {0}")]
    Network(String),
    /// The service reported a fault (e.g. a member state is unavailable).
    #[error("VIES service error: {0}")]
    Service(String),
    /// Failed to parse the response.
    #[error("VIES parse error: {0}")]
    Parse(String),
    /// SOAP envelope construction failed.
    #[error("SOAP envelope error: {0}")]
    Envelope(String),
}

/// VIES `checkVat` client.
#[derive(Debug, Clone)]
pub struct ViesClient {
    endpoint: String,
    timeout: Duration,
}

impl Default for ViesClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ViesClient {
    /// Create a client for the production VIES endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoint: VIES_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
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

    /// Check a VAT number against the VIES `checkVat` operation.
    ///
    /// `country_code` is the 2-letter prefix VIES expects (Greece is `EL`),
    /// `vat_number` the number without prefix. A result with `valid: false`
    /// is a definitive provider answer, distinct from every error case.
    ///
    /// # Errors
    ///
    /// [`ViesError::MissingInput`] when either argument is empty (no
    /// network call is attempted), [`ViesError::Service`] when the service
    /// answers with a SOAP fault, [`ViesError::Network`] /
    /// [`ViesError::Parse`] on transport and decoding failures. Callers
    /// surface all of these as temporary errors, never as "invalid VAT".
    pub async fn check_vat(
        &self,
        country_code: &str,
        vat_number: &str,
    ) -> Result<LookupResult, ViesError> {
        if country_code.is_empty() || vat_number.is_empty() {
            return Err(ViesError::MissingInput);
        }

        let envelope = check_vat_envelope(&country_code.to_uppercase(), vat_number)?;

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ViesError::Network(e.to_string()))?;

        tracing::debug!(country_code, vat_number, "querying VIES");
        let response = http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", "")
            .body(envelope)
            .send()
            .await
            .map_err(|e| ViesError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ViesError::Network(e.to_string()))?;

        parse_check_vat_response(&body, status.is_success())
    }
}

fn check_vat_envelope(country_code: &str, vat_number: &str) -> Result<String, ViesError> {
    build_envelope(country_code, vat_number).map_err(|e| ViesError::Envelope(e.to_string()))
}

fn build_envelope(country_code: &str, vat_number: &str) -> SoapResult<String> {
    let mut w = EnvelopeWriter::new();
    w.start_element_with_attrs(
        "soapenv:Envelope",
        &[("xmlns:soapenv", SOAP_ENV_NS), ("xmlns:urn", CHECK_VAT_NS)],
    )?;
    w.empty_element("soapenv:Header")?;
    w.start_element("soapenv:Body")?;
    w.start_element("urn:checkVat")?;
    w.text_element("urn:countryCode", country_code)?;
    w.text_element("urn:vatNumber", vat_number)?;
    w.end_element("urn:checkVat")?;
    w.end_element("soapenv:Body")?;
    w.end_element("soapenv:Envelope")?;
    w.into_string()
}

/// Decode a `checkVatResponse` body into a [`LookupResult`].
///
/// A `faultstring` anywhere in the document wins over everything else;
/// otherwise the flat response fields are collected by local name. The
/// placeholder `---` VIES uses for withheld fields reads as empty.
fn parse_check_vat_response(body: &str, http_ok: bool) -> Result<LookupResult, ViesError> {
    let mut valid: Option<bool> = None;
    let mut fault: Option<String> = None;
    let mut result = LookupResult::default();

    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut current = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => current = local_name(e.name().as_ref()),
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().trim().to_string();
                match current.as_str() {
                    "valid" => valid = Some(text == "true"),
                    "name" => result.name = filter_placeholder(text),
                    "address" => result.address = filter_placeholder(text),
                    "countryCode" => result.country_code = text,
                    "vatNumber" => result.vat_number = text,
                    "faultstring" => fault = Some(text),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => current.clear(),
            Ok(Event::Eof) => break,
            Err(e) => return Err(ViesError::Parse(e.to_string())),
            _ => {}
        }
    }

    if let Some(fault) = fault {
        return Err(ViesError::Service(fault));
    }
    match valid {
        Some(valid) => {
            result.valid = valid;
            Ok(result)
        }
        None if http_ok => Err(ViesError::Parse(
            "response carries no checkVat result".into(),
        )),
        None => Err(ViesError::Network("HTTP error status".into())),
    }
}

fn filter_placeholder(text: String) -> String {
    if text == "---" { String::new() } else { text }
}
