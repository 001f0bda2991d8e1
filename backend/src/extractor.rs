//! Extracts concept scheme records from a metadata-definition document
//!
//! Document shape:
//! - `<MDDef id="..">` anywhere in the tree → one concept scheme
//! - `<Label xml:lang="..">` / `<Description xml:lang="..">` → label / definition
//! - `<MDDefMetadata>` children (any tag, `cat` and `def` attributes) → metadata entries
//! - `<Value id="..">` with its own Label / Description → concepts

use crate::logger;
use crate::types::{ConceptRecord, ConceptSchemeRecord, LangString, MISSING_ID_FALLBACK, MetadataEntry};
use crate::xml_tree::{XmlDocument, XmlElement};

pub const SCHEME_TAG: &str = "MDDef";
pub const CONCEPT_TAG: &str = "Value";
pub const METADATA_TAG: &str = "MDDefMetadata";
pub const LABEL_TAG: &str = "Label";
pub const DESCRIPTION_TAG: &str = "Description";

const ID_ATTR: &str = "id";
const LANG_ATTR: &str = "xml:lang";
const CATEGORY_ATTR: &str = "cat";
const DEFINITION_FLAG_ATTR: &str = "def";

/// All concept schemes of the document, in document order.
pub fn extract_concept_schemes(doc: &XmlDocument) -> Vec<ConceptSchemeRecord> {
    doc.select_all(SCHEME_TAG)
        .into_iter()
        .map(extract_scheme)
        .collect()
}

fn extract_scheme(element: &XmlElement) -> ConceptSchemeRecord {
    let id = read_id(element, SCHEME_TAG);

    let metadata: Vec<MetadataEntry> = element
        .find(METADATA_TAG)
        .map(|block| block.children().iter().map(read_metadata_entry).collect())
        .unwrap_or_default();

    let concepts: Vec<ConceptRecord> = element
        .find_all(CONCEPT_TAG)
        .map(|value| ConceptRecord {
            id: read_id(value, CONCEPT_TAG),
            label: read_lang_string(value, LABEL_TAG),
            definition: read_lang_string(value, DESCRIPTION_TAG),
        })
        .collect();

    logger::debug(&format!(
        "Extracted concept scheme '{}': {} concepts, {} metadata entries",
        id,
        concepts.len(),
        metadata.len()
    ));

    ConceptSchemeRecord {
        label: read_lang_string(element, LABEL_TAG),
        definition: read_lang_string(element, DESCRIPTION_TAG),
        id,
        concepts,
        metadata,
    }
}

fn read_id(element: &XmlElement, kind: &str) -> String {
    match element.attribute(ID_ATTR) {
        Some(id) => id.to_string(),
        None => {
            logger::warn(&format!(
                "<{}> without id attribute, using '{}'",
                kind, MISSING_ID_FALLBACK
            ));
            MISSING_ID_FALLBACK.to_string()
        }
    }
}

/// Text and `xml:lang` of the first child named `tag`, `None` if there is no such child.
fn read_lang_string(element: &XmlElement, tag: &str) -> Option<LangString> {
    element
        .find(tag)
        .map(|child| LangString::new(child.text().unwrap_or_default(), child.attribute(LANG_ATTR)))
}

fn read_metadata_entry(element: &XmlElement) -> MetadataEntry {
    MetadataEntry {
        category: element.attribute(CATEGORY_ATTR).map(str::to_string),
        definition_flag: element.attribute(DEFINITION_FLAG_ATTR).map(str::to_string),
        value: element.text().map(str::to_string),
    }
}
