//! URIs and file names derived from concept scheme ids

use oxrdf::NamedNode;

use crate::error::{ConvertError, Result};

/// Namespace root every concept scheme lives under.
pub const NAMESPACE_ROOT: &str = "http://example.org/iqb/";

const SCHEME_SEGMENT_PREFIX: &str = "cs_";
const OUTPUT_FILE_PREFIX: &str = "iqb_cs";
const OUTPUT_FILE_EXTENSION: &str = "ttl";

/// Builds the IRIs of one concept scheme and its concepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeUris {
    base: NamedNode,
}

impl SchemeUris {
    /// `http://example.org/iqb/cs_<scheme_id>/`, the id taken verbatim.
    pub fn new(scheme_id: &str) -> Result<Self> {
        let base = named_node(format!("{NAMESPACE_ROOT}{SCHEME_SEGMENT_PREFIX}{scheme_id}/"))?;
        Ok(Self { base })
    }

    pub fn base(&self) -> &NamedNode {
        &self.base
    }

    /// The concept id appended to the base IRI with no separator of its own.
    pub fn concept(&self, concept_id: &str) -> Result<NamedNode> {
        named_node(format!("{}{}", self.base.as_str(), concept_id))
    }
}

fn named_node(iri: String) -> Result<NamedNode> {
    NamedNode::new(iri.as_str()).map_err(|e| ConvertError::InvalidIri {
        message: e.to_string(),
        iri,
    })
}

/// Output file name for a scheme: `iqb_cs<scheme_id>.ttl`.
///
/// Ids that would leave the output directory or are not valid file name
/// characters are rejected.
pub fn output_file_name(scheme_id: &str) -> Result<String> {
    let unsafe_char = |c: char| matches!(c, '/' | '\\' | '\0') || c.is_control();
    if scheme_id.chars().any(unsafe_char) {
        return Err(ConvertError::UnsafeSchemeId {
            scheme_id: scheme_id.to_string(),
        });
    }
    Ok(format!("{OUTPUT_FILE_PREFIX}{scheme_id}.{OUTPUT_FILE_EXTENSION}"))
}
