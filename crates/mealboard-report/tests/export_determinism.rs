// SPDX-License-Identifier: Apache-2.0

use mealboard_model::{
    DayOfWeek, DepartmentId, DietTypeId, IsoWeek, Mark, Meal, RegistrationFacts, ResidentCount,
    TenantId, TenantWeek, Year,
};
use mealboard_report::{render, weekly_report, DepartmentFacts, ExportFormat};
use std::collections::BTreeMap;

fn sample_report() -> mealboard_model::WeeklyReport {
    let week = TenantWeek::new(
        TenantId::new(1).unwrap(),
        Year::new(2025).unwrap(),
        IsoWeek::new(47).unwrap(),
    );
    let diet = |id: &str| DietTypeId::parse(id).unwrap();
    let facts = RegistrationFacts {
        marks: vec![
            Mark {
                day: DayOfWeek::new(1).unwrap(),
                meal: Meal::Lunch,
                diet_type: diet("lactose"),
                marked: true,
            },
            Mark {
                day: DayOfWeek::new(2).unwrap(),
                meal: Meal::Lunch,
                diet_type: diet("gluten"),
                marked: true,
            },
        ],
        resident_counts: vec![ResidentCount {
            day: DayOfWeek::new(1).unwrap(),
            meal: Meal::Lunch,
            count: 9,
        }],
        alt2_days: vec![],
    };
    let names = BTreeMap::from([
        (diet("gluten"), "Gluten-free".to_string()),
        (diet("lactose"), "Lactose & more".to_string()),
    ]);
    weekly_report(
        &week,
        &[DepartmentFacts {
            department: DepartmentId::parse("west").unwrap(),
            department_name: "West <Wing>".to_string(),
            facts,
        }],
        &names,
    )
}

#[test]
fn format_parsing_accepts_only_the_two_tokens() {
    assert_eq!(
        ExportFormat::parse("delimited-text").unwrap(),
        ExportFormat::DelimitedText
    );
    assert_eq!(
        ExportFormat::parse("spreadsheet").unwrap(),
        ExportFormat::Spreadsheet
    );
    assert!(ExportFormat::parse("pdf").is_err());
    assert!(ExportFormat::parse("Spreadsheet").is_err());
}

#[test]
fn rendering_twice_is_byte_identical() {
    let report = sample_report();
    for format in [ExportFormat::DelimitedText, ExportFormat::Spreadsheet] {
        assert_eq!(render(&report, format), render(&report, format));
    }
}

#[test]
fn delimited_rows_carry_canonical_specials_encoding() {
    let report = sample_report();
    let text = String::from_utf8(render(&report, ExportFormat::DelimitedText)).unwrap();
    assert!(text.contains("[departments]\n"));
    assert!(text.contains("[totals]\n"));
    // Sorted by diet id, not by display order.
    assert!(text.contains("west;West <Wing>;lunch;9;7;gluten=1|lactose=1"));
    assert!(text.contains("\nlunch;9;7;gluten=1|lactose=1"));
    // Dinner has no data but still gets a row.
    assert!(text.contains("west;West <Wing>;dinner;0;0;"));
}

#[test]
fn spreadsheet_escapes_markup_in_names() {
    let report = sample_report();
    let xml = String::from_utf8(render(&report, ExportFormat::Spreadsheet)).unwrap();
    assert!(xml.contains("West &lt;Wing&gt;"));
    assert!(xml.contains("ss:Name=\"Departments\""));
    assert!(xml.contains("ss:Name=\"Totals\""));
    assert!(!xml.contains("West <Wing>"));
}
