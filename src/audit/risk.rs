//! Transform risk taxonomy
//!
//! Per AUDIT.md §4: a static lookup from transform name to risk category,
//! consulted by the auditor only. Transforms carry no risk knowledge of
//! their own, so auditing stays decoupled from transform implementations.

use std::collections::BTreeMap;

use super::report::RiskCategory;

/// Static mapping from transform name to risk category.
#[derive(Debug, Clone)]
pub struct RiskTaxonomy {
    entries: BTreeMap<String, RiskCategory>,
}

impl Default for RiskTaxonomy {
    /// The built-in taxonomy.
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert("ocr".to_string(), RiskCategory::OcrDerived);
        entries.insert(
            "normalize_aggressive".to_string(),
            RiskCategory::AggressiveNormalization,
        );
        entries.insert("translation".to_string(), RiskCategory::TranslationDrift);
        entries.insert(
            "summarization".to_string(),
            RiskCategory::SummarizationLoss,
        );
        Self { entries }
    }
}

impl RiskTaxonomy {
    /// An empty taxonomy; flags nothing.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds or overrides one mapping.
    pub fn with_entry(mut self, transform: impl Into<String>, category: RiskCategory) -> Self {
        self.entries.insert(transform.into(), category);
        self
    }

    pub fn lookup(&self, transform: &str) -> Option<RiskCategory> {
        self.entries.get(transform).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_taxonomy_entries() {
        let taxonomy = RiskTaxonomy::default();
        assert_eq!(taxonomy.lookup("ocr"), Some(RiskCategory::OcrDerived));
        assert_eq!(
            taxonomy.lookup("normalize_aggressive"),
            Some(RiskCategory::AggressiveNormalization)
        );
        assert_eq!(taxonomy.lookup("chunk_fixed"), None);
        assert_eq!(taxonomy.len(), 4);
    }

    #[test]
    fn test_custom_entry_overrides() {
        let taxonomy =
            RiskTaxonomy::default().with_entry("machine_translate", RiskCategory::TranslationDrift);
        assert_eq!(
            taxonomy.lookup("machine_translate"),
            Some(RiskCategory::TranslationDrift)
        );
    }
}
