// SPDX-License-Identifier: Apache-2.0

use mealboard_model::{
    DepartmentId, DietCount, DietTypeId, Meal, MealSummary, RegistrationFacts, TenantWeek,
    WeeklyReport,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Input to the aggregation engine: one department's stored facts plus its
/// display name from the registry.
#[derive(Debug, Clone)]
pub struct DepartmentFacts {
    pub department: DepartmentId,
    pub department_name: String,
    pub facts: RegistrationFacts,
}

/// Per-meal working numbers before ordering is applied.
#[derive(Default)]
struct MealTally {
    residents_total: u32,
    specials: BTreeMap<DietTypeId, u32>,
}

impl MealTally {
    fn add_facts(&mut self, meal: Meal, facts: &RegistrationFacts) {
        for count in &facts.resident_counts {
            if count.meal == meal {
                self.residents_total = self.residents_total.saturating_add(count.count);
            }
        }
        for mark in &facts.marks {
            if mark.meal == meal && mark.marked {
                *self.specials.entry(mark.diet_type.clone()).or_insert(0) += 1;
            }
        }
    }

    /// Specials ordered count-desc then name-asc; normal-diet remainder is
    /// the head count minus every special portion, clamped at zero.
    fn into_summary(self, meal: Meal, diet_names: &BTreeMap<DietTypeId, String>) -> MealSummary {
        let special_total: u32 = self.specials.values().sum();
        MealSummary {
            meal,
            residents_total: self.residents_total,
            normal_diet_count: self.residents_total.saturating_sub(special_total),
            specials: ordered_diet_counts(self.specials, diet_names),
        }
    }
}

/// Named, ordered diet lines from a raw count map. Diet types missing from
/// the registry fall back to their id as the display name.
fn ordered_diet_counts(
    counts: BTreeMap<DietTypeId, u32>,
    diet_names: &BTreeMap<DietTypeId, String>,
) -> Vec<DietCount> {
    let mut specials: Vec<DietCount> = counts
        .into_iter()
        .map(|(diet_type, count)| {
            let diet_name = diet_names
                .get(&diet_type)
                .cloned()
                .unwrap_or_else(|| diet_type.as_str().to_string());
            DietCount {
                diet_type,
                diet_name,
                count,
            }
        })
        .collect();
    specials.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.diet_name.cmp(&b.diet_name))
    });
    specials
}

/// Builds the weekly report from already-loaded facts. Pure: the same
/// inputs always yield the same report, so export determinism reduces to
/// renderer determinism.
#[must_use]
pub fn weekly_report(
    week: &TenantWeek,
    departments: &[DepartmentFacts],
    diet_names: &BTreeMap<DietTypeId, String>,
) -> WeeklyReport {
    let mut department_summaries = Vec::with_capacity(departments.len());

    let mut ordered: Vec<&DepartmentFacts> = departments.iter().collect();
    ordered.sort_by(|a, b| a.department.cmp(&b.department));

    for input in ordered {
        let mut meals = Vec::with_capacity(Meal::ALL.len());
        for meal in Meal::ALL {
            let mut tally = MealTally::default();
            tally.add_facts(meal, &input.facts);
            meals.push(tally.into_summary(meal, diet_names));
        }
        department_summaries.push(mealboard_model::DepartmentSummary {
            department: input.department.clone(),
            department_name: input.department_name.clone(),
            meals,
        });
    }

    // Site totals sum the already-derived per-department numbers, merging
    // shared diet types before ordering is applied again.
    let totals = Meal::ALL
        .into_iter()
        .enumerate()
        .map(|(idx, meal)| {
            let mut residents_total: u32 = 0;
            let mut normal_diet_count: u32 = 0;
            let mut merged: BTreeMap<DietTypeId, u32> = BTreeMap::new();
            for dep in &department_summaries {
                let summary = &dep.meals[idx];
                residents_total = residents_total.saturating_add(summary.residents_total);
                normal_diet_count = normal_diet_count.saturating_add(summary.normal_diet_count);
                for special in &summary.specials {
                    *merged.entry(special.diet_type.clone()).or_insert(0) += special.count;
                }
            }
            MealSummary {
                meal,
                residents_total,
                normal_diet_count,
                specials: ordered_diet_counts(merged, diet_names),
            }
        })
        .collect();

    debug!(
        week = %week,
        departments = department_summaries.len(),
        "weekly report built"
    );
    WeeklyReport {
        tenant: week.tenant,
        year: week.year,
        week: week.week,
        departments: department_summaries,
        totals,
    }
}
