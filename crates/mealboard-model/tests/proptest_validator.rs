use mealboard_model::{parse_precondition, ResourceKind, Validator};
use proptest::prelude::*;

fn department_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,16}"
}

proptest! {
    #[test]
    fn scoped_validator_roundtrips(
        tenant in 1_u64..10_000,
        dep in department_strategy(),
        year in 2000_u16..=2100,
        week in 1_u8..=53,
        version in 0_u64..1_000_000,
    ) {
        let identity = format!("{tenant}:{dep}:{year}:{week}");
        let v = Validator::scoped(ResourceKind::Registration, &identity, version);
        let parsed = parse_precondition(v.as_str(), ResourceKind::Registration, &identity)
            .expect("roundtrip");
        prop_assert_eq!(parsed, version);
        let parsed_etag = parse_precondition(&v.etag(), ResourceKind::Registration, &identity)
            .expect("etag roundtrip");
        prop_assert_eq!(parsed_etag, version);
    }

    #[test]
    fn arbitrary_input_never_panics(raw in ".{0,128}") {
        let _ = parse_precondition(&raw, ResourceKind::Registration, "1:west:2025:47");
        let _ = parse_precondition(&raw, ResourceKind::Aggregate, "1:2025:47");
        let _ = parse_precondition(&raw, ResourceKind::MenuChoice, "west:47");
    }

    #[test]
    fn version_mismatch_still_parses_to_asserted_version(
        asserted in 0_u64..1000,
        stored in 0_u64..1000,
    ) {
        // parse_precondition only extracts the asserted version; freshness
        // against the stored version is the store's decision.
        let identity = "7:north:2026:12";
        let v = Validator::scoped(ResourceKind::Registration, identity, asserted);
        let parsed = parse_precondition(v.as_str(), ResourceKind::Registration, identity)
            .expect("parse");
        prop_assert_eq!(parsed, asserted);
        prop_assert_eq!(parsed == stored, asserted == stored);
    }
}
