//! Intermediate record model produced by the extractor and consumed by the
//! graph builder.

use serde::Serialize;

/// Stand-in for an `id` attribute that is missing from the source XML.
///
/// The conversion keeps going with this literal text in the scheme or
/// concept id, so a missing scheme id ends up as `cs_None` in the URI and
/// `iqb_csNone.ttl` as the file name.
pub const MISSING_ID_FALLBACK: &str = "None";

/// A text value with an optional language tag, e.g. `("Mathematisch argumentieren", "de")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LangString {
    pub value: String,
    pub lang: Option<String>,
}

impl LangString {
    pub fn new(value: impl Into<String>, lang: Option<&str>) -> Self {
        Self {
            value: value.into(),
            lang: lang.map(str::to_string),
        }
    }
}

/// One child of an `MDDefMetadata` block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MetadataEntry {
    /// The `cat` attribute
    pub category: Option<String>,
    /// The `def` attribute
    pub definition_flag: Option<String>,
    /// Text content of the element
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptRecord {
    pub id: String,
    pub label: Option<LangString>,
    pub definition: Option<LangString>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptSchemeRecord {
    pub id: String,
    pub label: Option<LangString>,
    pub definition: Option<LangString>,
    /// Concepts in document order
    pub concepts: Vec<ConceptRecord>,
    /// Metadata entries in document order
    pub metadata: Vec<MetadataEntry>,
}

impl ConceptSchemeRecord {
    /// Formats the `skos:definition` summary of the scheme.
    ///
    /// Only the last metadata entry contributes. Without any entries, or
    /// with an entry missing a field, the corresponding parts are empty.
    pub fn metadata_summary(&self) -> String {
        let last = self.metadata.last().cloned().unwrap_or_default();
        format!(
            "cat: {} Def:{} Value:{}",
            last.category.unwrap_or_default(),
            last.definition_flag.unwrap_or_default(),
            last.value.unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme_with_metadata(metadata: Vec<MetadataEntry>) -> ConceptSchemeRecord {
        ConceptSchemeRecord {
            id: "1".to_string(),
            label: Some(LangString::new("Kompetenzen", Some("de"))),
            definition: None,
            concepts: Vec::new(),
            metadata,
        }
    }

    fn entry(cat: &str, def: &str, value: &str) -> MetadataEntry {
        MetadataEntry {
            category: Some(cat.to_string()),
            definition_flag: Some(def.to_string()),
            value: Some(value.to_string()),
        }
    }

    #[test]
    fn test_metadata_summary_uses_last_entry() {
        let scheme = scheme_with_metadata(vec![entry("A", "X", "1"), entry("B", "Y", "2")]);
        assert_eq!(scheme.metadata_summary(), "cat: B Def:Y Value:2");
    }

    #[test]
    fn test_metadata_summary_without_entries() {
        let scheme = scheme_with_metadata(Vec::new());
        assert_eq!(scheme.metadata_summary(), "cat:  Def: Value:");
    }

    #[test]
    fn test_metadata_summary_with_missing_fields() {
        let scheme = scheme_with_metadata(vec![MetadataEntry {
            category: Some("Fach".to_string()),
            definition_flag: None,
            value: None,
        }]);
        assert_eq!(scheme.metadata_summary(), "cat: Fach Def: Value:");
    }
}
