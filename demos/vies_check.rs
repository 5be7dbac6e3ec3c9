use timologio::core::parse_vat_input;
use timologio::vies::ViesClient;

/// Live check of a VAT number against VIES.
///
/// Usage: `cargo run --example vies_check --features vies -- EL123456789`
#[tokio::main]
async fn main() {
    let raw = std::env::args().nth(1).unwrap_or_else(|| "EL123456789".into());

    let query = parse_vat_input(&raw, None);
    if !query.is_complete() {
        eprintln!("could not determine country code and number from {raw:?}");
        return;
    }

    let client = ViesClient::new();
    match client.check_vat(&query.country_code, &query.number).await {
        Ok(result) if result.valid => {
            println!("VALID: {} ({})", result.name, result.country_code);
            println!("{}", result.address);
        }
        Ok(_) => println!("NOT VALID: {}{}", query.country_code, query.number),
        Err(e) => eprintln!("lookup failed: {e}"),
    }
}
