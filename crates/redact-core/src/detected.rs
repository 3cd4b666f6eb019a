//! Detected data returned by the backend detector

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::SensitiveType;

/// Detected values grouped by type.
///
/// Types and values keep the order of the detector response. Duplicate
/// values are distinct occurrences; nothing is deduplicated here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectedData(IndexMap<SensitiveType, Vec<String>>);

impl DetectedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Types in response order
    pub fn types(&self) -> impl Iterator<Item = &SensitiveType> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SensitiveType, &[String])> {
        self.0.iter().map(|(ty, values)| (ty, values.as_slice()))
    }

    /// Values for one type; empty when the type was not detected
    pub fn values(&self, ty: &SensitiveType) -> &[String] {
        self.0.get(ty).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_type(&self, ty: &SensitiveType) -> bool {
        self.0.contains_key(ty)
    }

    /// Total number of occurrences across all types
    pub fn total_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Number of types with at least one occurrence
    pub fn type_count(&self) -> usize {
        self.0.values().filter(|values| !values.is_empty()).count()
    }

    /// True when there is nothing to redact
    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }
}

impl FromIterator<(SensitiveType, Vec<String>)> for DetectedData {
    fn from_iter<I: IntoIterator<Item = (SensitiveType, Vec<String>)>>(iter: I) -> Self {
        let mut map: IndexMap<SensitiveType, Vec<String>> = IndexMap::new();
        for (ty, values) in iter {
            map.entry(ty).or_default().extend(values);
        }
        Self(map)
    }
}

impl From<IndexMap<SensitiveType, Vec<String>>> for DetectedData {
    fn from(map: IndexMap<SensitiveType, Vec<String>>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_response_order() {
        let json = r#"{"Phone": ["9876543210"], "Aadhaar": ["2345 6789 0123"], "Email": ["a@b.com"]}"#;
        let data: DetectedData = serde_json::from_str(json).unwrap();

        let types: Vec<_> = data.types().map(|t| t.wire_name().to_string()).collect();
        assert_eq!(types, vec!["Phone", "Aadhaar", "Email"]);
    }

    #[test]
    fn test_duplicates_are_distinct_occurrences() {
        let data: DetectedData = [(
            SensitiveType::Email,
            vec!["a@b.com".to_string(), "a@b.com".to_string()],
        )]
        .into_iter()
        .collect();

        assert_eq!(data.total_count(), 2);
        assert_eq!(data.values(&SensitiveType::Email).len(), 2);
    }

    #[test]
    fn test_empty_categories_do_not_count() {
        let data: DetectedData = [(SensitiveType::Pan, Vec::<String>::new())].into_iter().collect();
        assert!(data.is_empty());
        assert_eq!(data.type_count(), 0);
    }

    #[test]
    fn test_unknown_types_accepted() {
        let data: DetectedData = serde_json::from_str(r#"{"Passport": ["K1234567"]}"#).unwrap();
        assert_eq!(data.total_count(), 1);
        assert!(data.contains_type(&SensitiveType::Other("Passport".to_string())));
    }

    #[test]
    fn test_case_variant_keys_stay_separate() {
        let data: DetectedData =
            serde_json::from_str(r#"{"Email": ["a@b.com"], "email": ["c@d.com"]}"#).unwrap();

        assert_eq!(data.total_count(), 2);
        assert_eq!(data.values(&SensitiveType::Email), ["a@b.com".to_string()]);
        let lower = SensitiveType::Other("email".to_string());
        assert_eq!(data.values(&lower), ["c@d.com".to_string()]);

        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"Email":["a@b.com"],"email":["c@d.com"]}"#);
    }
}
