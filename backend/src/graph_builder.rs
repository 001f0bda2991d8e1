//! Maps one concept scheme record onto SKOS and Dublin Core triples

use std::collections::HashSet;

use oxrdf::{Literal, NamedNode, NamedNodeRef, Term, Triple};

use crate::error::{ConvertError, Result};
use crate::types::{ConceptSchemeRecord, LangString};
use crate::uri::SchemeUris;
use crate::vocab::{dcterms, rdf, skos};

pub const CREATOR: &str = "IQB - Institut zur Qualitätsentwicklung im Bildungswesen";
pub const RELATED_MATCH: &str = "https://huaning-yang.github.io/test-repo-core/index.de.html";
/// Language of the fixed literals
pub const FIXED_LITERAL_LANG: &str = "de";

/// Triples of one concept scheme, in insertion order, without duplicates.
#[derive(Debug, Clone)]
pub struct SchemeGraph {
    uris: SchemeUris,
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
}

impl SchemeGraph {
    pub fn new(uris: SchemeUris) -> Self {
        Self {
            uris,
            triples: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn base(&self) -> &NamedNode {
        self.uris.base()
    }

    /// Returns false if the triple was already present.
    pub fn add(&mut self, subject: &NamedNode, predicate: NamedNodeRef<'_>, object: impl Into<Term>) -> bool {
        let triple = Triple::new(subject.clone(), predicate, object);
        if self.seen.contains(&triple) {
            return false;
        }
        self.seen.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn contains(&self, subject: &NamedNode, predicate: NamedNodeRef<'_>, object: impl Into<Term>) -> bool {
        self.seen.contains(&Triple::new(subject.clone(), predicate, object))
    }
}

fn lang_literal(value: &str, lang: Option<&str>) -> Result<Literal> {
    match lang {
        Some(lang) => Literal::new_language_tagged_literal(value, lang).map_err(|e| {
            ConvertError::InvalidLanguageTag {
                tag: lang.to_string(),
                message: e.to_string(),
            }
        }),
        None => Ok(Literal::new_simple_literal(value)),
    }
}

fn literal_of(text: &LangString) -> Result<Literal> {
    lang_literal(&text.value, text.lang.as_deref())
}

fn german(value: &str) -> Literal {
    Literal::new_language_tagged_literal_unchecked(value, FIXED_LITERAL_LANG)
}

/// Builds the graph of one concept scheme.
///
/// Fails with `MissingSchemeLabel` / `MissingConceptLabel` when a label the
/// output requires is absent.
pub fn build_scheme_graph(record: &ConceptSchemeRecord) -> Result<SchemeGraph> {
    let uris = SchemeUris::new(&record.id)?;
    let base = uris.base().clone();
    let mut graph = SchemeGraph::new(uris.clone());

    let label = record
        .label
        .as_ref()
        .ok_or_else(|| ConvertError::MissingSchemeLabel {
            scheme_id: record.id.clone(),
        })?;

    graph.add(&base, rdf::TYPE, skos::CONCEPT_SCHEME.into_owned());
    graph.add(&base, dcterms::CREATOR, german(CREATOR));
    graph.add(&base, dcterms::TITLE, literal_of(label)?);

    if let Some(definition) = &record.definition {
        graph.add(&base, dcterms::DESCRIPTION, literal_of(definition)?);
        graph.add(&base, skos::DEFINITION, german(&record.metadata_summary()));
        graph.add(&base, skos::RELATED_MATCH, german(RELATED_MATCH));
    }

    for concept in &record.concepts {
        let concept_uri = uris.concept(&concept.id)?;
        let label = concept
            .label
            .as_ref()
            .ok_or_else(|| ConvertError::MissingConceptLabel {
                scheme_id: record.id.clone(),
                concept_id: concept.id.clone(),
            })?;

        graph.add(&concept_uri, rdf::TYPE, skos::CONCEPT.into_owned());
        graph.add(&concept_uri, skos::PREF_LABEL, literal_of(label)?);
        if let Some(definition) = &concept.definition {
            graph.add(&concept_uri, skos::DEFINITION, literal_of(definition)?);
        }
        graph.add(&concept_uri, skos::TOP_CONCEPT_OF, base.clone());
        graph.add(&base, skos::HAS_TOP_CONCEPT, concept_uri);
    }

    Ok(graph)
}
