use timologio::core::*;

fn main() {
    // VAT input normalization (no network required)
    println!("=== VAT Input Normalization ===\n");

    let inputs = [
        ("GR123456789", None),
        ("el 123 456 789", None),
        ("DE 123.456.789", None),
        ("123456789", Some("GR")),
        ("123456789", None), // no prefix, no fallback
    ];

    for (raw, fallback) in &inputs {
        let q = parse_vat_input(raw, *fallback);
        if q.is_complete() {
            println!("  {raw:?} (fallback {fallback:?}) => country={} number={}", q.country_code, q.number);
        } else {
            println!("  {raw:?} (fallback {fallback:?}) => UNUSABLE: {q:?}");
        }
    }

    // Provider address splitting
    println!("\n=== Address Splitting ===\n");

    let addresses = [
        "Odos 12\n12345 Athens",
        "STADIOU 5\r\n10562 ATHINA",
        "Somewhere without a code",
    ];

    for raw in &addresses {
        let a = split_address(raw);
        println!(
            "  {:?} => line1={:?} postcode={:?} city={:?}",
            raw, a.line1, a.postcode, a.city
        );
    }
}
