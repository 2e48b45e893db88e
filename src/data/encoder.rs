// ============================================================
// Layer 4 — Category Encoder
// ============================================================
// One-hot encodes a categorical field against its fixed domain.
//
// Example, JobRole = "Manager" (9-label domain):
//   JobRole_Human Resources           0.0
//   JobRole_Healthcare Representative 0.0
//   ...
//   JobRole_Manager                   1.0
//   ...
//
// Unknown-value policy:
//   A value that matches no label (missing, null, empty, a
//   number, any non-string JSON value, a typo, different
//   casing) produces ALL ZEROS for that field. It never fails
//   the request. The model then sees the field as "none of the
//   known categories".
//
// Matching is exact after trimming surrounding whitespace.

use crate::data::encoded_record::EncodedRecord;
use crate::domain::fields::CategoricalField;
use crate::domain::raw_input::RawValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryEncoder;

impl CategoryEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Indicator columns for one field, in domain order.
    pub fn encode(&self, field: &CategoricalField, raw: Option<&RawValue>) -> Vec<(String, f64)> {
        let hit = self.match_label(field, raw);

        field.labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let value = if hit == Some(i) { 1.0 } else { 0.0 };
                (field.column(label), value)
            })
            .collect()
    }

    /// Same as `encode`, writing straight into a record
    pub fn encode_into(
        &self,
        field:  &CategoricalField,
        raw:    Option<&RawValue>,
        record: &mut EncodedRecord,
    ) {
        for (column, value) in self.encode(field, raw) {
            record.insert(column, value);
        }
    }

    fn match_label(&self, field: &CategoricalField, raw: Option<&RawValue>) -> Option<usize> {
        let raw = raw?;
        let hit = raw.as_label().and_then(|label| field.index_of(label));

        if hit.is_none() {
            let shown = raw.to_string();
            if !shown.trim().is_empty() {
                tracing::debug!(
                    "Unrecognised {} value {:?}; all indicator columns set to 0",
                    field.name,
                    shown
                );
            }
        }
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields::{BUSINESS_TRAVEL, EDUCATION_FIELD, JOB_ROLE, MARITAL_STATUS, OVER_TIME};

    fn hot_count(cols: &[(String, f64)]) -> usize {
        cols.iter().filter(|(_, v)| *v == 1.0).count()
    }

    #[test]
    fn test_every_label_sets_exactly_one_column() {
        let enc = CategoryEncoder::new();
        for field in [&OVER_TIME, &MARITAL_STATUS, &JOB_ROLE, &BUSINESS_TRAVEL, &EDUCATION_FIELD] {
            for label in field.labels {
                let raw  = RawValue::from(*label);
                let cols = enc.encode(field, Some(&raw));

                assert_eq!(cols.len(), field.labels.len());
                assert_eq!(hot_count(&cols), 1, "{} = {}", field.name, label);

                let hot = cols.iter().find(|(_, v)| *v == 1.0).unwrap();
                assert_eq!(hot.0, field.column(label));
                // the rest are exactly 0.0
                assert!(cols.iter().all(|(_, v)| *v == 0.0 || *v == 1.0));
            }
        }
    }

    #[test]
    fn test_unrecognised_values_are_all_zero() {
        let enc = CategoryEncoder::new();
        let cases = [
            None,
            Some(RawValue::Null),
            Some(RawValue::from("")),
            Some(RawValue::from("single")),
            Some(RawValue::from("Widowed")),
            Some(RawValue::from(1i64)),
            Some(RawValue::Other(serde_json::Value::Bool(true))),
            Some(RawValue::Other(serde_json::json!(["Single"]))),
        ];
        for raw in cases {
            let cols = enc.encode(&MARITAL_STATUS, raw.as_ref());
            assert_eq!(cols.len(), 3);
            assert_eq!(hot_count(&cols), 0, "{raw:?}");
        }
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let enc  = CategoryEncoder::new();
        let raw  = RawValue::from("  Travel_Rarely ");
        let cols = enc.encode(&BUSINESS_TRAVEL, Some(&raw));
        assert_eq!(cols[1], ("BusinessTravel_Travel_Rarely".to_string(), 1.0));
    }

    #[test]
    fn test_encode_into_record() {
        let enc = CategoryEncoder::new();
        let mut record = EncodedRecord::new();
        enc.encode_into(&OVER_TIME, Some(&RawValue::from("No")), &mut record);
        assert_eq!(record.get("OverTime_No"),  Some(1.0));
        assert_eq!(record.get("OverTime_Yes"), Some(0.0));
        assert_eq!(record.len(), 2);
    }
}
