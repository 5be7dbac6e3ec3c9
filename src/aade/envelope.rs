//! SOAP 1.2 envelope for the `rgWsPublic2AfmMethod` lookup, carrying a
//! WS-Security `UsernameToken` header.

use crate::soap::{EnvelopeWriter, SoapResult};

use super::{AadeCredentials, AadeError};

const ENV_NS: &str = "http://www.w3.org/2003/05/soap-envelope";
const WSSE_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";
const SERVICE_NS: &str = "http://rgwspublic2/RgWsPublic2Service";
const RECORD_NS: &str = "http://rgwspublic2/RgWsPublic2";

pub(super) fn afm_request(
    credentials: &AadeCredentials,
    vat_id: &str,
) -> Result<String, AadeError> {
    build(credentials, vat_id).map_err(|e| AadeError::Envelope(e.to_string()))
}

fn build(credentials: &AadeCredentials, vat_id: &str) -> SoapResult<String> {
    let mut w = EnvelopeWriter::new();
    w.start_element_with_attrs(
        "env:Envelope",
        &[
            ("xmlns:env", ENV_NS),
            ("xmlns:ns1", WSSE_NS),
            ("xmlns:ns2", SERVICE_NS),
            ("xmlns:ns3", RECORD_NS),
        ],
    )?;
    w.start_element("env:Header")?;
    w.start_element("ns1:Security")?;
    w.start_element("ns1:UsernameToken")?;
    w.text_element("ns1:Username", &credentials.username)?;
    w.text_element("ns1:Password", &credentials.password)?;
    w.end_element("ns1:UsernameToken")?;
    w.end_element("ns1:Security")?;
    w.end_element("env:Header")?;
    w.start_element("env:Body")?;
    w.start_element("ns2:rgWsPublic2AfmMethod")?;
    w.start_element("ns2:INPUT_REC")?;
    // afm_called_by stays empty: the query is made on the shop's own behalf.
    w.empty_element("ns3:afm_called_by")?;
    w.text_element("ns3:afm_called_for", vat_id)?;
    w.end_element("ns2:INPUT_REC")?;
    w.end_element("ns2:rgWsPublic2AfmMethod")?;
    w.end_element("env:Body")?;
    w.end_element("env:Envelope")?;
    w.into_string()
}
