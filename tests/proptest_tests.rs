use proptest::prelude::*;

use timologio::core::*;

proptest! {
    /// The parser accepts anything a buyer can type without panicking, and
    /// its country-code invariant always holds: empty, or exactly two
    /// uppercase ASCII letters, never the raw `GR` alias.
    #[test]
    fn parser_never_panics_and_holds_invariants(
        raw in ".{0,64}",
        fallback in proptest::option::of("[a-zA-Z]{0,4}"),
    ) {
        let q = parse_vat_input(&raw, fallback.as_deref());

        prop_assert!(q.country_code.is_empty() || q.country_code.len() == 2);
        prop_assert!(q.country_code.chars().all(|c| c.is_ascii_uppercase()));
        prop_assert_ne!(q.country_code.as_str(), "GR");
        prop_assert!(q.number.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    /// A well-formed prefixed input always round-trips into its parts.
    #[test]
    fn prefixed_input_always_splits(
        cc in "[A-Z]{2}",
        number in "[0-9]{2,12}",
    ) {
        let q = parse_vat_input(&format!("{cc}{number}"), None);
        let expected = if cc == "GR" { "EL".to_string() } else { cc };
        prop_assert_eq!(q.country_code, expected);
        prop_assert_eq!(q.number, number);
    }

    /// The splitter handles arbitrary multi-line text without panicking and
    /// never invents a postcode that was not in the input.
    #[test]
    fn splitter_never_panics(raw in "(?s).{0,128}") {
        let a = split_address(&raw);
        prop_assert!(a.postcode.is_empty() || raw.contains(&a.postcode));
        prop_assert!(!a.line1.contains('\n'));
        prop_assert!(!a.line1.contains('\r'));
    }

    /// Stripping the Greek prefix never grows the input.
    #[test]
    fn greek_prefix_strip_shrinks(raw in ".{0,32}") {
        prop_assert!(strip_greek_prefix(&raw).len() <= raw.len());
    }
}
