// ============================================================
// Layer 4 — Schema Reconciler
// ============================================================
// Projects an EncodedRecord onto the model's column order.
//
// For every column name in the schema, in schema order:
//   1. value from the EncodedRecord, if present
//   2. else value from the DefaultValueTable, if present
//   3. else 0.0
// Record columns the schema does not name are dropped.
//
// The schema is read from the loaded model on every call and is
// never hardcoded, so a retrained model with added, removed or
// reordered columns works unchanged as long as the default table
// covers anything new.
//
// Degraded path:
//   When the model exposes no schema, the caller-supplied
//   fallback order is used instead and a warning is logged. The
//   result is tagged SchemaOrigin::Fallback so it can never be
//   mistaken for a fully aligned prediction.

use std::sync::Arc;

use crate::data::defaults::DefaultValueTable;
use crate::data::encoded_record::EncodedRecord;
use crate::domain::prediction::SchemaOrigin;
use crate::error::SchemaUnavailableError;

/// Column order of the training frame after one-hot encoding.
/// Only used when the model artifact carries no feature names.
pub const TRAINING_COLUMNS: &[&str] = &[
    "Age",
    "DistanceFromHome",
    "EnvironmentSatisfaction",
    "JobInvolvement",
    "JobLevel",
    "JobSatisfaction",
    "MonthlyIncome",
    "NumCompaniesWorked",
    "PercentSalaryHike",
    "PerformanceRating",
    "RelationshipSatisfaction",
    "StockOptionLevel",
    "TotalWorkingYears",
    "TrainingTimesLastYear",
    "WorkLifeBalance",
    "YearsAtCompany",
    "YearsSinceLastPromotion",
    "BusinessTravel_Non-Travel",
    "BusinessTravel_Travel_Frequently",
    "BusinessTravel_Travel_Rarely",
    "Department_Human Resources",
    "Department_Research & Development",
    "Department_Sales",
    "EducationField_Human Resources",
    "EducationField_Life Sciences",
    "EducationField_Marketing",
    "EducationField_Medical",
    "EducationField_Other",
    "EducationField_Technical Degree",
    "Gender_Female",
    "Gender_Male",
    "JobRole_Healthcare Representative",
    "JobRole_Human Resources",
    "JobRole_Laboratory Technician",
    "JobRole_Manager",
    "JobRole_Manufacturing Director",
    "JobRole_Research Director",
    "JobRole_Research Scientist",
    "JobRole_Sales Executive",
    "JobRole_Sales Representative",
    "MaritalStatus_Divorced",
    "MaritalStatus_Married",
    "MaritalStatus_Single",
    "OverTime_No",
    "OverTime_Yes",
];

// ─── FeatureVector ────────────────────────────────────────────────────────────
/// The ordered row handed to the classifier.
/// `columns[i]` names `values[i]`; both always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    columns: Vec<String>,
    values:  Vec<f64>,
}

impl FeatureVector {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the first column called `name`
    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values[i])
    }
}

/// A FeatureVector together with where its order came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub vector: FeatureVector,
    pub origin: SchemaOrigin,
}

// ─── SchemaReconciler ─────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct SchemaReconciler {
    defaults: Arc<DefaultValueTable>,
    fallback: Arc<[String]>,
}

impl SchemaReconciler {
    pub fn new(defaults: Arc<DefaultValueTable>, fallback: Vec<String>) -> Self {
        Self { defaults, fallback: fallback.into() }
    }

    /// Reconciler with the training-time column order as fallback
    pub fn with_training_fallback(defaults: Arc<DefaultValueTable>) -> Self {
        let fallback = TRAINING_COLUMNS.iter().map(|c| c.to_string()).collect();
        Self::new(defaults, fallback)
    }

    pub fn fallback_schema(&self) -> &[String] {
        &self.fallback
    }

    /// Align `record` to the model schema, or to the fallback order
    /// if the schema could not be read.
    pub fn reconcile(
        &self,
        record: &EncodedRecord,
        schema: Result<&[String], SchemaUnavailableError>,
    ) -> Reconciled {
        match schema {
            Ok(columns) => Reconciled {
                vector: self.project(record, columns),
                origin: SchemaOrigin::Model,
            },
            Err(e) => {
                tracing::warn!(
                    "{}; falling back to fixed order of {} columns",
                    e,
                    self.fallback.len()
                );
                Reconciled {
                    vector: self.project(record, &self.fallback),
                    origin: SchemaOrigin::Fallback { reason: e.reason },
                }
            }
        }
    }

    /// Explicit ordered projection keyed by column name.
    pub fn project(&self, record: &EncodedRecord, schema: &[String]) -> FeatureVector {
        let mut values    = Vec::with_capacity(schema.len());
        let mut defaulted = 0usize;
        let mut zeroed    = 0usize;

        for column in schema {
            let value = match record.get(column) {
                Some(v) => v,
                None => match self.defaults.get(column) {
                    Some(v) => {
                        defaulted += 1;
                        v
                    }
                    None => {
                        zeroed += 1;
                        0.0
                    }
                },
            };
            values.push(value);
        }

        let dropped = record.iter().filter(|(c, _)| !schema.iter().any(|s| s == c)).count();
        tracing::debug!(
            "Reconciled {} columns: {} from input, {} defaulted, {} zero-filled, {} input columns dropped",
            schema.len(),
            schema.len() - defaulted - zeroed,
            defaulted,
            zeroed,
            dropped
        );

        FeatureVector { columns: schema.to_vec(), values }
    }
}
