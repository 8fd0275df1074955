use mealboard_model::{
    check_menu_choice, parse_day_of_week, DayOfWeek, DepartmentId, DietTypeId, IsoWeek, Meal,
    MenuChoice, TenantId, Year, DEPARTMENT_MAX_LEN,
};

#[test]
fn tenant_parsing_is_strict() {
    assert_eq!(TenantId::parse("1").expect("tenant").get(), 1);
    assert!(TenantId::parse("0").is_err());
    assert!(TenantId::parse("-3").is_err());
    assert!(TenantId::parse("abc").is_err());
}

#[test]
fn department_charset_is_enforced() {
    assert!(DepartmentId::parse("west-2").is_ok());
    assert!(DepartmentId::parse("X").is_ok());
    assert!(DepartmentId::parse("").is_err());
    assert!(DepartmentId::parse("west wing").is_err());
    assert!(DepartmentId::parse("a:b").is_err());
    let too_long = "d".repeat(DEPARTMENT_MAX_LEN + 1);
    assert!(DepartmentId::parse(&too_long).is_err());
}

#[test]
fn diet_type_rejects_empty_and_colon() {
    assert!(DietTypeId::parse("gluten").is_ok());
    assert!(DietTypeId::parse("").is_err());
    assert!(DietTypeId::parse("glu:ten").is_err());
}

#[test]
fn week_and_year_bounds_hold() {
    assert!(IsoWeek::parse("1").is_ok());
    assert!(IsoWeek::parse("53").is_ok());
    assert!(IsoWeek::parse("0").is_err());
    assert!(IsoWeek::parse("54").is_err());
    assert!(Year::parse("2025").is_ok());
    assert!(Year::parse("1999").is_err());
    assert!(Year::parse("2101").is_err());
}

#[test]
fn day_of_week_range_and_weekend() {
    for raw in 1..=7 {
        let day = parse_day_of_week(raw).expect("day");
        assert_eq!(day.is_weekend(), raw >= 6);
    }
    assert!(parse_day_of_week(0).is_err());
    assert!(parse_day_of_week(8).is_err());
}

#[test]
fn meal_and_choice_wire_values() {
    assert_eq!(Meal::parse("lunch").expect("lunch"), Meal::Lunch);
    assert_eq!(Meal::parse("dinner").expect("dinner"), Meal::Dinner);
    assert!(Meal::parse("breakfast").is_err());
    assert_eq!(MenuChoice::parse("alt1").expect("alt1"), MenuChoice::Alt1);
    assert_eq!(MenuChoice::parse("Alt2").expect("alt2"), MenuChoice::Alt2);
    assert!(MenuChoice::parse("soup").is_err());
}

#[test]
fn weekend_rule_rejects_alt2_only() {
    let dep = DepartmentId::parse("west").expect("department");
    let week = IsoWeek::new(47).expect("week");
    let saturday = DayOfWeek::new(6).expect("saturday");
    let monday = DayOfWeek::new(1).expect("monday");
    assert!(check_menu_choice(&dep, week, saturday, MenuChoice::Alt2).is_err());
    assert!(check_menu_choice(&dep, week, saturday, MenuChoice::Alt1).is_ok());
    assert!(check_menu_choice(&dep, week, monday, MenuChoice::Alt2).is_ok());
}

#[test]
fn day_of_week_serde_uses_numbers() {
    let day: DayOfWeek = serde_json::from_str("3").expect("day 3");
    assert_eq!(day.get(), 3);
    assert!(serde_json::from_str::<DayOfWeek>("9").is_err());
    assert_eq!(serde_json::to_string(&day).expect("json"), "3");
}
