// ============================================================
// Layer 4 — Feature Encoder
// ============================================================
// Turns one RawInput into one EncodedRecord for a given input
// variant. This is the single place where raw fields meet the
// Category Encoder and the Numeric Normalizer; the form path and
// the API path differ only in their MissingPolicy.
//
//   RawInput ──┬─ categorical fields → CategoryEncoder  ─┐
//              └─ numeric fields     → NumericNormalizer ─┴→ EncodedRecord
//
// Fields outside the variant are ignored. Numeric fields outside
// the variant are left out of the record so the reconciler can
// fill them from the DefaultValueTable.

use crate::data::encoded_record::EncodedRecord;
use crate::data::encoder::CategoryEncoder;
use crate::data::normalizer::{MissingPolicy, NumericNormalizer};
use crate::domain::fields::{Field, InputVariant};
use crate::domain::raw_input::RawInput;
use crate::error::EncodingError;

#[derive(Debug, Clone, Copy)]
pub struct FeatureEncoder {
    variant:    InputVariant,
    categories: CategoryEncoder,
    numbers:    NumericNormalizer,
}

impl FeatureEncoder {
    pub fn new(variant: InputVariant, policy: MissingPolicy) -> Self {
        Self {
            variant,
            categories: CategoryEncoder::new(),
            numbers:    NumericNormalizer::new(policy),
        }
    }

    /// Encode every field of the active variant.
    /// Stops at the first malformed numeric field.
    pub fn encode(&self, input: &RawInput) -> Result<EncodedRecord, EncodingError> {
        let mut record = EncodedRecord::new();

        for field in self.variant.fields() {
            let raw = input.get(field.name());
            match field {
                Field::Categorical(cat) => {
                    self.categories.encode_into(cat, raw, &mut record);
                }
                Field::Numeric(num) => {
                    let value = self.numbers.normalize(num, raw)?;
                    record.insert(num.name, value);
                }
            }
        }

        let known = self.variant.field_names();
        let ignored: Vec<&str> = input
            .field_names()
            .filter(|name| !known.iter().any(|k| k == name))
            .collect();
        if !ignored.is_empty() {
            tracing::debug!(
                "Ignoring fields outside the {} variant: {:?}",
                self.variant,
                ignored
            );
        }

        Ok(record)
    }
}
