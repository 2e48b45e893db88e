// ============================================================
// Layer 3 — Input Fields and Variants
// ============================================================
// The fixed set of raw input fields the model was trained on.
//
// Categorical fields are one-hot encoded into one column per
// domain label, named "{Field}_{Label}" (the same names
// pandas.get_dummies produced at training time), e.g.
//   MaritalStatus = "Single"
//     → MaritalStatus_Single   = 1.0
//       MaritalStatus_Married  = 0.0
//       MaritalStatus_Divorced = 0.0
//
// Numeric fields pass straight through under their own name.
//
// Two input variants exist. Standard (10 fields) is the one the
// serving form and API use; Legacy (8 fields) is the older
// shape that carried EducationField and no Age.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ─── Field definitions ───────────────────────────────────────────────────────

/// A categorical input with a fixed, ordered label domain.
#[derive(Debug, PartialEq, Eq)]
pub struct CategoricalField {
    pub name:   &'static str,
    pub labels: &'static [&'static str],
}

impl CategoricalField {
    /// Encoded column name for one label of this field
    pub fn column(&self, label: &str) -> String {
        format!("{}_{}", self.name, label)
    }

    /// All indicator column names, in domain order
    pub fn columns(&self) -> Vec<String> {
        self.labels.iter().map(|l| self.column(l)).collect()
    }

    /// Position of `label` in the domain, exact match
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| *l == label)
    }
}

/// A numeric input. `default` is used when the API path omits it;
/// the sample bounds drive the random form pre-fill.
#[derive(Debug, PartialEq)]
pub struct NumericField {
    pub name:       &'static str,
    pub default:    f64,
    pub sample_min: i64,
    pub sample_max: i64,
}

pub static OVER_TIME: CategoricalField = CategoricalField {
    name:   "OverTime",
    labels: &["Yes", "No"],
};

pub static MARITAL_STATUS: CategoricalField = CategoricalField {
    name:   "MaritalStatus",
    labels: &["Single", "Married", "Divorced"],
};

pub static JOB_ROLE: CategoricalField = CategoricalField {
    name:   "JobRole",
    labels: &[
        "Human Resources",
        "Healthcare Representative",
        "Research Scientist",
        "Sales Executive",
        "Manager",
        "Laboratory Technician",
        "Research Director",
        "Manufacturing Director",
        "Sales Representative",
    ],
};

pub static BUSINESS_TRAVEL: CategoricalField = CategoricalField {
    name:   "BusinessTravel",
    labels: &["Non-Travel", "Travel_Rarely", "Travel_Frequently"],
};

pub static EDUCATION_FIELD: CategoricalField = CategoricalField {
    name:   "EducationField",
    labels: &[
        "Life Sciences",
        "Medical",
        "Marketing",
        "Technical Degree",
        "Human Resources",
        "Other",
    ],
};

pub static AGE: NumericField = NumericField {
    name: "Age", default: 35.0, sample_min: 25, sample_max: 45,
};

pub static STOCK_OPTION_LEVEL: NumericField = NumericField {
    name: "StockOptionLevel", default: 1.0, sample_min: 0, sample_max: 3,
};

pub static JOB_LEVEL: NumericField = NumericField {
    name: "JobLevel", default: 2.0, sample_min: 1, sample_max: 5,
};

pub static ENVIRONMENT_SATISFACTION: NumericField = NumericField {
    name: "EnvironmentSatisfaction", default: 3.0, sample_min: 1, sample_max: 4,
};

pub static JOB_INVOLVEMENT: NumericField = NumericField {
    name: "JobInvolvement", default: 3.0, sample_min: 1, sample_max: 4,
};

pub static JOB_SATISFACTION: NumericField = NumericField {
    name: "JobSatisfaction", default: 3.0, sample_min: 1, sample_max: 4,
};

/// Every numeric field the model knows about, whichever variant is active
pub static NUMERIC_FIELDS: [&NumericField; 6] = [
    &AGE,
    &STOCK_OPTION_LEVEL,
    &JOB_LEVEL,
    &ENVIRONMENT_SATISFACTION,
    &JOB_INVOLVEMENT,
    &JOB_SATISFACTION,
];

// ─── Field ────────────────────────────────────────────────────────────────────

/// One raw input field of a variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    Categorical(&'static CategoricalField),
    Numeric(&'static NumericField),
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Categorical(f) => f.name,
            Field::Numeric(f)     => f.name,
        }
    }
}

static STANDARD_FIELDS: [Field; 10] = [
    Field::Categorical(&OVER_TIME),
    Field::Numeric(&STOCK_OPTION_LEVEL),
    Field::Numeric(&JOB_LEVEL),
    Field::Numeric(&ENVIRONMENT_SATISFACTION),
    Field::Numeric(&JOB_INVOLVEMENT),
    Field::Categorical(&MARITAL_STATUS),
    Field::Numeric(&JOB_SATISFACTION),
    Field::Categorical(&JOB_ROLE),
    Field::Categorical(&BUSINESS_TRAVEL),
    Field::Numeric(&AGE),
];

static LEGACY_FIELDS: [Field; 8] = [
    Field::Categorical(&OVER_TIME),
    Field::Numeric(&STOCK_OPTION_LEVEL),
    Field::Numeric(&JOB_LEVEL),
    Field::Categorical(&MARITAL_STATUS),
    Field::Numeric(&JOB_SATISFACTION),
    Field::Categorical(&JOB_ROLE),
    Field::Categorical(&BUSINESS_TRAVEL),
    Field::Categorical(&EDUCATION_FIELD),
];

// ─── InputVariant ─────────────────────────────────────────────────────────────

/// Which raw input shape the caller is sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputVariant {
    /// 10 fields, no EducationField. Authoritative.
    #[default]
    Standard,
    /// 8 fields including EducationField, no Age.
    Legacy,
}

impl InputVariant {
    /// The raw fields this variant reads, in form order
    pub fn fields(&self) -> &'static [Field] {
        match self {
            InputVariant::Standard => &STANDARD_FIELDS,
            InputVariant::Legacy   => &LEGACY_FIELDS,
        }
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields().iter().map(Field::name).collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputVariant::Standard => "standard",
            InputVariant::Legacy   => "legacy",
        }
    }
}

impl fmt::Display for InputVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "10" => Ok(InputVariant::Standard),
            "legacy"   | "8"  => Ok(InputVariant::Legacy),
            other => Err(format!(
                "unknown input variant '{other}' (expected 'standard' or 'legacy')"
            )),
        }
    }
}
