// ============================================================
// Layer 4 — Default Value Table
// ============================================================
// Neutral fallback values for model columns the request never
// supplies (department, gender, tenure, income, ...). Used by the
// SchemaReconciler only when the EncodedRecord lacks a column.
//
// The built-in table is created once per process and never
// mutated. Configuration can overlay extra entries, producing a
// new table that is frozen before the first request is served.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::domain::fields::NUMERIC_FIELDS;

/// Neutral values for columns outside every input variant
const NEUTRAL_VALUES: &[(&str, f64)] = &[
    ("Department_Research & Development", 1.0),
    ("EducationField_Life Sciences",      1.0),
    ("Gender_Male",                       1.0),
    ("WorkLifeBalance",                   3.0),
    ("PerformanceRating",                 3.0),
    ("RelationshipSatisfaction",          3.0),
    ("TrainingTimesLastYear",             2.0),
    ("StandardHours",                     80.0),
    ("Over18_Y",                          1.0),
    ("EmployeeCount",                     1.0),
    ("PercentSalaryHike",                 12.0),
    ("DistanceFromHome",                  10.0),
    ("NumCompaniesWorked",                3.0),
    ("YearsSinceLastPromotion",           2.0),
    ("TotalWorkingYears",                 10.0),
    ("YearsAtCompany",                    7.0),
    ("MonthlyIncome",                     6000.0),
];

static BUILTIN: Lazy<DefaultValueTable> = Lazy::new(|| {
    let mut values: BTreeMap<String, f64> = NEUTRAL_VALUES
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect();

    // Numeric inputs a variant does not read still get their
    // API default rather than 0
    for field in NUMERIC_FIELDS.iter() {
        values.entry(field.name.to_string()).or_insert(field.default);
    }

    DefaultValueTable { values }
});

#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValueTable {
    values: BTreeMap<String, f64>,
}

impl DefaultValueTable {
    /// The process-wide built-in table
    pub fn builtin() -> &'static DefaultValueTable {
        &BUILTIN
    }

    /// An explicit table, mostly for tests
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let values = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self { values }
    }

    /// A copy of this table with `overrides` replacing or adding entries
    pub fn with_overrides(&self, overrides: &BTreeMap<String, f64>) -> Self {
        let mut values = self.values.clone();
        for (k, v) in overrides {
            values.insert(k.clone(), *v);
        }
        Self { values }
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
