// ============================================================
// Layer 4 — Numeric Normalizer
// ============================================================
// Coerces a raw numeric-like value to f64.
//
//   present, numeric          → the number
//   present, not numeric      → ConversionError (always),
//                               including bools, arrays, objects
//   present, NaN / ±inf       → ConversionError (always)
//   absent (missing or null)  → per-field default   (Lenient)
//                             → ConversionError     (Strict)
//
// Lenient is the JSON API behaviour; Strict is the form
// behaviour, where every field of the variant is submitted.

use crate::domain::fields::NumericField;
use crate::domain::raw_input::RawValue;
use crate::error::ConversionError;

/// What to do when a numeric field is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Missing is an error
    Strict,
    /// Missing takes the field's documented default
    #[default]
    Lenient,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NumericNormalizer {
    policy: MissingPolicy,
}

impl NumericNormalizer {
    pub fn new(policy: MissingPolicy) -> Self {
        Self { policy }
    }

    pub fn normalize(
        &self,
        field: &NumericField,
        raw:   Option<&RawValue>,
    ) -> Result<f64, ConversionError> {
        let value = match raw {
            Some(RawValue::Number(n)) => n
                .as_f64()
                .ok_or_else(|| ConversionError::not_numeric(field.name, n.to_string()))?,
            Some(RawValue::Text(s))   => parse_number(field.name, s)?,
            Some(RawValue::Other(v))  => {
                return Err(ConversionError::not_numeric(field.name, v.to_string()));
            }
            Some(RawValue::Null) | None => {
                return match self.policy {
                    MissingPolicy::Lenient => Ok(field.default),
                    MissingPolicy::Strict  => Err(ConversionError::missing(field.name)),
                };
            }
        };

        if !value.is_finite() {
            return Err(ConversionError::not_finite(field.name, value.to_string()));
        }
        Ok(value)
    }
}

fn parse_number(field: &str, text: &str) -> Result<f64, ConversionError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ConversionError::not_numeric(field, text))
}
