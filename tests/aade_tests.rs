#![cfg(feature = "aade")]

use std::time::Duration;

use timologio::aade::{AadeClient, AadeCredentials, AadeError, extract_field};

fn credentials() -> AadeCredentials {
    AadeCredentials {
        username: "shopuser".into(),
        password: "shoppass".into(),
    }
}

const REGISTERED: &str = r#"<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope">
  <env:Body>
    <srvc:rgWsPublic2AfmMethodResponse xmlns:srvc="http://rgwspublic2/RgWsPublic2Service" xmlns:rg="http://rgwspublic2/RgWsPublic2">
      <srvc:result>
        <rg:rg_ws_public2_result_rtType>
          <rg:basic_rec>
            <rg:afm>123456789</rg:afm>
            <rg:deactivation_flag>1</rg:deactivation_flag>
            <rg:onomasia>Test Company</rg:onomasia>
            <rg:doy_descr>Α' ΑΘΗΝΩΝ</rg:doy_descr>
            <rg:postal_address>STADIOU</rg:postal_address>
            <rg:postal_address_no>5</rg:postal_address_no>
            <rg:postal_area_description>ΑΘΗΝΑ</rg:postal_area_description>
            <rg:postal_zip_code>10562</rg:postal_zip_code>
          </rg:basic_rec>
          <rg:firm_act_tab>
            <rg:item>
              <rg:firm_act_descr>Software publishing</rg:firm_act_descr>
            </rg:item>
            <rg:item>
              <rg:firm_act_descr>Consulting</rg:firm_act_descr>
            </rg:item>
          </rg:firm_act_tab>
        </rg:rg_ws_public2_result_rtType>
      </srvc:result>
    </srvc:rgWsPublic2AfmMethodResponse>
  </env:Body>
</env:Envelope>"#;

const NOT_REGISTERED: &str = r#"<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope">
  <env:Body>
    <srvc:rgWsPublic2AfmMethodResponse xmlns:srvc="http://rgwspublic2/RgWsPublic2Service">
      <srvc:result>
        <srvc:rg_ws_public2_result_rtType>
          <srvc:error_rec>
            <srvc:error_descr>Ο ΑΦΜ δεν είναι έγκυρος</srvc:error_descr>
          </srvc:error_rec>
        </srvc:rg_ws_public2_result_rtType>
      </srvc:result>
    </srvc:rgWsPublic2AfmMethodResponse>
  </env:Body>
</env:Envelope>"#;

// ---------------------------------------------------------------------------
// Record Extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn registered_record_is_fully_mapped() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(REGISTERED)
        .create_async()
        .await;

    let client = AadeClient::new(credentials()).with_endpoint(server.url());
    let result = client.company_details("123456789").await.unwrap();

    assert!(result.valid);
    assert_eq!(result.country_code, "EL");
    assert_eq!(result.vat_number, "123456789");
    assert_eq!(result.name, "Test Company");
    assert_eq!(result.tax_office, "Α' ΑΘΗΝΩΝ");
    assert_eq!(result.address, "STADIOU 5");
    assert_eq!(result.city, "ΑΘΗΝΑ");
    assert_eq!(result.postcode, "10562");
    assert_eq!(result.activities, vec!["Software publishing", "Consulting"]);
}

#[tokio::test]
async fn missing_deactivation_flag_means_not_valid() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(NOT_REGISTERED)
        .create_async()
        .await;

    let client = AadeClient::new(credentials()).with_endpoint(server.url());
    let result = client.company_details("000000000").await.unwrap();

    assert!(!result.valid);
    assert_eq!(result.name, "");
    assert!(result.activities.is_empty());
}

#[tokio::test]
async fn html_error_page_reads_as_not_valid_not_panic() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body("<html><body><h1>Maintenance</h1></body></html>")
        .create_async()
        .await;

    let client = AadeClient::new(credentials()).with_endpoint(server.url());
    let result = client.company_details("123456789").await.unwrap();
    assert!(!result.valid);
}

// ---------------------------------------------------------------------------
// Caching
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_lookup_within_ttl_hits_the_cache() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(REGISTERED)
        .expect(1)
        .create_async()
        .await;

    let client = AadeClient::new(credentials()).with_endpoint(server.url());
    let first = client.lookup("123456789").await.unwrap();
    let second = client.lookup("123456789").await.unwrap();

    assert_eq!(first, second);
    mock.assert_async().await;
}

#[tokio::test]
async fn different_vat_numbers_do_not_share_cache_entries() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(REGISTERED)
        .expect(2)
        .create_async()
        .await;

    let client = AadeClient::new(credentials()).with_endpoint(server.url());
    client.lookup("123456789").await.unwrap();
    client.lookup("987654321").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn expired_entry_is_fetched_again() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(REGISTERED)
        .expect(2)
        .create_async()
        .await;

    let client = AadeClient::new(credentials())
        .with_endpoint(server.url())
        .with_cache_ttl(Duration::from_millis(50));
    client.lookup("123456789").await.unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;
    client.lookup("123456789").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn cached_body_has_prefixes_stripped() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(REGISTERED)
        .create_async()
        .await;

    let client = AadeClient::new(credentials()).with_endpoint(server.url());
    let body = client.lookup("123456789").await.unwrap();
    assert!(body.contains("<basic_rec>"));
    assert!(!body.contains("<rg:basic_rec>"));
    assert_eq!(
        extract_field(&body, "onomasia").as_deref(),
        Some("Test Company")
    );
}

// ---------------------------------------------------------------------------
// Transport Errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn http_error_status_is_a_network_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(503)
        .with_body("unavailable")
        .create_async()
        .await;

    let client = AadeClient::new(credentials()).with_endpoint(server.url());
    let err = client.lookup("123456789").await.unwrap_err();
    assert!(matches!(err, AadeError::Network(_)));
}

#[tokio::test]
async fn failed_lookups_are_not_cached() {
    let mut server = mockito::Server::new_async().await;
    let failing = server
        .mock("POST", "/")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let client = AadeClient::new(credentials()).with_endpoint(server.url());
    client.lookup("123456789").await.unwrap_err();
    failing.assert_async().await;

    // Once the registry recovers, the next call goes through.
    let recovered = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(REGISTERED)
        .expect(1)
        .create_async()
        .await;
    let result = client.company_details("123456789").await.unwrap();
    assert!(result.valid);
    recovered.assert_async().await;
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_error() {
    let client = AadeClient::new(credentials())
        .with_endpoint("http://127.0.0.1:1")
        .with_timeout(Duration::from_millis(300));
    let err = client.lookup("123456789").await.unwrap_err();
    assert!(matches!(err, AadeError::Network(_)));
}

// ---------------------------------------------------------------------------
// Request Shape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn request_carries_credentials_and_vat_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::Regex("<ns1:Username>shopuser</ns1:Username>".into()),
            mockito::Matcher::Regex("<ns3:afm_called_for>123456789</ns3:afm_called_for>".into()),
        ]))
        .with_status(200)
        .with_body(REGISTERED)
        .create_async()
        .await;

    let client = AadeClient::new(credentials()).with_endpoint(server.url());
    client.lookup("123456789").await.unwrap();
    mock.assert_async().await;
}
