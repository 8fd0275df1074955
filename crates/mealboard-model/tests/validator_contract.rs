use mealboard_model::{
    parse_precondition, ChoiceScope, DepartmentId, IsoWeek, PreconditionDefect,
    RegistrationScope, ResourceKind, TenantId, Validator, Year,
};

fn scope() -> RegistrationScope {
    RegistrationScope::new(
        TenantId::parse("1").expect("tenant"),
        DepartmentId::parse("west").expect("department"),
        Year::parse("2025").expect("year"),
        IsoWeek::parse("47").expect("week"),
    )
}

#[test]
fn scoped_validator_is_deterministic() {
    let a = Validator::scoped(ResourceKind::Registration, &scope().identity(), 3);
    let b = Validator::scoped(ResourceKind::Registration, &scope().identity(), 3);
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "mealboard:reg:1:west:2025:47:v3");
    assert_eq!(a.etag(), "\"mealboard:reg:1:west:2025:47:v3\"");
}

#[test]
fn distinct_identities_never_collide() {
    let a = Validator::scoped(ResourceKind::Registration, &scope().identity(), 1);
    let other = RegistrationScope::new(
        TenantId::parse("1").expect("tenant"),
        DepartmentId::parse("west-2").expect("department"),
        Year::parse("2025").expect("year"),
        IsoWeek::parse("47").expect("week"),
    );
    let b = Validator::scoped(ResourceKind::Registration, &other.identity(), 1);
    assert_ne!(a, b);

    let choice = ChoiceScope::new(DepartmentId::parse("west").expect("department"), IsoWeek::parse("47").expect("week"));
    let c = Validator::scoped(ResourceKind::MenuChoice, &choice.identity(), 1);
    assert_ne!(a, c);
}

#[test]
fn aggregate_validator_encodes_max_and_sum() {
    let v = Validator::aggregate("1:2025:47", 3, 7);
    assert_eq!(v.as_str(), "mealboard:agg:1:2025:47:v3.7");
    // Same max, different sum: still a different validator.
    let w = Validator::aggregate("1:2025:47", 3, 8);
    assert_ne!(v, w);
}

#[test]
fn format_suffix_extends_the_base_validator() {
    let base = Validator::aggregate("1:2025:47", 3, 7);
    let csv = base.with_format_suffix("delimited-text");
    let xml = base.with_format_suffix("spreadsheet");
    assert_eq!(csv.as_str(), "mealboard:agg:1:2025:47:v3.7:fmt-delimited-text");
    assert_ne!(csv, xml);
}

#[test]
fn precondition_roundtrip_accepts_quoted_and_weak_forms() {
    let identity = scope().identity();
    let v = Validator::scoped(ResourceKind::Registration, &identity, 12);
    for raw in [
        v.as_str().to_string(),
        v.etag(),
        format!("W/{}", v.etag()),
        format!("  {}  ", v.etag()),
    ] {
        let version = parse_precondition(&raw, ResourceKind::Registration, &identity)
            .expect("fresh parse");
        assert_eq!(version, 12);
    }
}

#[test]
fn wrong_identity_or_kind_is_malformed() {
    let identity = scope().identity();
    let v = Validator::scoped(ResourceKind::Registration, &identity, 2);

    let other_identity = "1:east:2025:47";
    match parse_precondition(v.as_str(), ResourceKind::Registration, other_identity) {
        Err(PreconditionDefect::Malformed(_)) => {}
        other => panic!("expected malformed, got {other:?}"),
    }
    match parse_precondition(v.as_str(), ResourceKind::MenuChoice, &identity) {
        Err(PreconditionDefect::Malformed(_)) => {}
        other => panic!("expected malformed, got {other:?}"),
    }
}

#[test]
fn garbage_versions_are_malformed_and_empty_is_missing() {
    let identity = scope().identity();
    for raw in [
        "mealboard:reg:1:west:2025:47:v",
        "mealboard:reg:1:west:2025:47:v1x",
        "mealboard:reg:1:west:2025:47:v-1",
        "etag-from-another-system",
        "mealboard:reg:1:west:2025:47:v99999999999999999999999999",
    ] {
        match parse_precondition(raw, ResourceKind::Registration, &identity) {
            Err(PreconditionDefect::Malformed(_)) => {}
            other => panic!("expected malformed for {raw:?}, got {other:?}"),
        }
    }
    match parse_precondition("\"\"", ResourceKind::Registration, &identity) {
        Err(PreconditionDefect::Missing) => {}
        other => panic!("expected missing, got {other:?}"),
    }
}
