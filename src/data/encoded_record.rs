use std::collections::BTreeMap;

/// Encoded column name → value, as produced by the FeatureEncoder.
///
/// Holds one-hot indicator columns (0.0 / 1.0) and numeric
/// passthrough columns. Column order here carries no meaning;
/// the SchemaReconciler decides the final order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedRecord {
    columns: BTreeMap<String, f64>,
}

impl EncodedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: f64) {
        self.columns.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for EncodedRecord {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let columns = iter.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self { columns }
    }
}
