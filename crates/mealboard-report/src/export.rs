// SPDX-License-Identifier: Apache-2.0

use mealboard_model::{DepartmentSummary, MealSummary, ValidationError, WeeklyReport};
use std::fmt::Write as _;

/// Supported export renderings. The token doubles as the query value and
/// the validator format suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    DelimitedText,
    Spreadsheet,
}

impl ExportFormat {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "delimited-text" => Ok(Self::DelimitedText),
            "spreadsheet" => Ok(Self::Spreadsheet),
            other => Err(ValidationError(format!(
                "format must be delimited-text or spreadsheet, got {other:?}"
            ))),
        }
    }

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::DelimitedText => "delimited-text",
            Self::Spreadsheet => "spreadsheet",
        }
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::DelimitedText => "text/plain; charset=utf-8",
            Self::Spreadsheet => "application/vnd.ms-excel",
        }
    }
}

/// Renders the report in the requested format. Both renderers are pure
/// functions of the report value, so repeated calls are byte-identical.
#[must_use]
pub fn render(report: &WeeklyReport, format: ExportFormat) -> Vec<u8> {
    match format {
        ExportFormat::DelimitedText => render_delimited(report).into_bytes(),
        ExportFormat::Spreadsheet => render_spreadsheet(report).into_bytes(),
    }
}

/// Canonical specials encoding: `diet=count` pairs joined with '|', sorted
/// by diet-type id regardless of display ordering in the report body.
fn encode_specials(summary: &MealSummary) -> String {
    let mut pairs: Vec<(&str, u32)> = summary
        .specials
        .iter()
        .map(|s| (s.diet_type.as_str(), s.count))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
        .iter()
        .map(|(id, count)| format!("{id}={count}"))
        .collect::<Vec<_>>()
        .join("|")
}

fn render_delimited(report: &WeeklyReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# mealboard weekly export tenant={} year={} week={}",
        report.tenant, report.year, report.week
    );
    out.push_str("[departments]\n");
    out.push_str("department;name;meal;residents;normal;specials\n");
    for dep in &report.departments {
        for meal in &dep.meals {
            let _ = writeln!(
                out,
                "{};{};{};{};{};{}",
                dep.department,
                dep.department_name,
                meal.meal,
                meal.residents_total,
                meal.normal_diet_count,
                encode_specials(meal)
            );
        }
    }
    out.push_str("[totals]\n");
    out.push_str("meal;residents;normal;specials\n");
    for meal in &report.totals {
        let _ = writeln!(
            out,
            "{};{};{};{}",
            meal.meal,
            meal.residents_total,
            meal.normal_diet_count,
            encode_specials(meal)
        );
    }
    out
}

fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

fn push_cell_string(out: &mut String, value: &str) {
    let _ = writeln!(
        out,
        "    <Cell><Data ss:Type=\"String\">{}</Data></Cell>",
        xml_escape(value)
    );
}

fn push_cell_number(out: &mut String, value: u32) {
    let _ = writeln!(
        out,
        "    <Cell><Data ss:Type=\"Number\">{value}</Data></Cell>"
    );
}

fn push_department_rows(out: &mut String, dep: &DepartmentSummary) {
    for meal in &dep.meals {
        out.push_str("   <Row>\n");
        push_cell_string(out, dep.department.as_str());
        push_cell_string(out, &dep.department_name);
        push_cell_string(out, meal.meal.as_str());
        push_cell_number(out, meal.residents_total);
        push_cell_number(out, meal.normal_diet_count);
        push_cell_string(out, &encode_specials(meal));
        out.push_str("   </Row>\n");
    }
}

fn push_header_row(out: &mut String, headers: &[&str]) {
    out.push_str("   <Row>\n");
    for header in headers {
        push_cell_string(out, header);
    }
    out.push_str("   </Row>\n");
}

/// SpreadsheetML 2003: one workbook, a Departments sheet and a Totals
/// sheet. Element order is fixed, so the output is byte-deterministic.
fn render_spreadsheet(report: &WeeklyReport) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<?mso-application progid=\"Excel.Sheet\"?>\n");
    out.push_str(
        "<Workbook xmlns=\"urn:schemas-microsoft-com:office:spreadsheet\" \
         xmlns:ss=\"urn:schemas-microsoft-com:office:spreadsheet\">\n",
    );

    out.push_str(" <Worksheet ss:Name=\"Departments\">\n  <Table>\n");
    push_header_row(
        &mut out,
        &[
            "Department",
            "Name",
            "Meal",
            "Residents",
            "Normal",
            "Specials",
        ],
    );
    for dep in &report.departments {
        push_department_rows(&mut out, dep);
    }
    out.push_str("  </Table>\n </Worksheet>\n");

    out.push_str(" <Worksheet ss:Name=\"Totals\">\n  <Table>\n");
    push_header_row(&mut out, &["Meal", "Residents", "Normal", "Specials"]);
    for meal in &report.totals {
        out.push_str("   <Row>\n");
        push_cell_string(&mut out, meal.meal.as_str());
        push_cell_number(&mut out, meal.residents_total);
        push_cell_number(&mut out, meal.normal_diet_count);
        push_cell_string(&mut out, &encode_specials(meal));
        out.push_str("   </Row>\n");
    }
    out.push_str("  </Table>\n </Worksheet>\n</Workbook>\n");
    out
}
