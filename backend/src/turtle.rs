//! Turtle serialization of a scheme graph
//!
//! Writing is done by `oxttl`. Triples are handed over grouped by subject,
//! then by predicate, in first-seen order, so the serializer can use `;` and
//! `,` and the same graph always serializes to the same bytes.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use oxrdf::{NamedNode, Subject, Triple};

use crate::error::{ConvertError, Result};

/// Configuration for serialization
#[derive(Debug, Clone, Default)]
pub struct TurtleConfig {
    /// Base IRI, written as `@base` and used for relative IRIs
    pub base_iri: Option<String>,
    /// Prefix declarations
    pub prefixes: Vec<(String, String)>,
}

impl TurtleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        self.prefixes.push((prefix.into(), iri.into()));
        self
    }
}

pub struct TurtleSerializer {
    inner: oxttl::TurtleSerializer,
}

impl TurtleSerializer {
    /// Fails with `InvalidIri` if the base or a prefix is not an absolute IRI.
    pub fn new(config: TurtleConfig) -> Result<Self> {
        let invalid_iri = |iri: &str, e: oxrdf::IriParseError| ConvertError::InvalidIri {
            iri: iri.to_string(),
            message: e.to_string(),
        };

        let mut inner = oxttl::TurtleSerializer::new();
        if let Some(base) = &config.base_iri {
            inner = inner.with_base_iri(base.as_str()).map_err(|e| invalid_iri(base, e))?;
        }
        for (prefix, iri) in &config.prefixes {
            inner = inner
                .with_prefix(prefix.as_str(), iri.as_str())
                .map_err(|e| invalid_iri(iri, e))?;
        }

        Ok(Self { inner })
    }

    /// Serialize triples to a writer, returning the writer
    pub fn serialize<W: Write>(&self, triples: &[Triple], writer: W) -> io::Result<W> {
        let mut serializer = self.inner.clone().for_writer(writer);
        for triple in group_by_subject(triples) {
            serializer.serialize_triple(triple)?;
        }
        serializer.finish()
    }

    pub fn serialize_to_string(&self, triples: &[Triple]) -> io::Result<String> {
        let buf = self.serialize(triples, Vec::new())?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Serialize to a UTF-8 file, replacing any existing file
    pub fn serialize_to_path(&self, triples: &[Triple], path: &Path) -> Result<()> {
        let write_error = |source| ConvertError::WriteOutput {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(write_error)?;
        let mut writer = self.serialize(triples, BufWriter::new(file)).map_err(write_error)?;
        writer.flush().map_err(write_error)
    }
}

type PredicateTriples<'a> = Vec<(&'a NamedNode, Vec<&'a Triple>)>;

/// Orders triples by subject, then by predicate, keeping first-seen order.
fn group_by_subject(triples: &[Triple]) -> Vec<&Triple> {
    let mut groups: Vec<(&Subject, PredicateTriples<'_>)> = Vec::new();

    for triple in triples {
        let index = match groups.iter().position(|(s, _)| *s == &triple.subject) {
            Some(index) => index,
            None => {
                groups.push((&triple.subject, Vec::new()));
                groups.len() - 1
            }
        };
        let predicates = &mut groups[index].1;

        match predicates.iter().position(|(p, _)| *p == &triple.predicate) {
            Some(i) => predicates[i].1.push(triple),
            None => predicates.push((&triple.predicate, vec![triple])),
        }
    }

    groups
        .into_iter()
        .flat_map(|(_, predicates)| predicates)
        .flat_map(|(_, triples)| triples)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::Literal;
    use oxrdf::vocab::rdf;

    const BASE: &str = "http://example.org/iqb/cs_7/";

    fn config() -> TurtleConfig {
        TurtleConfig::new()
            .with_base_iri(BASE)
            .with_prefix("dct", "http://purl.org/dc/terms/")
            .with_prefix("skos", "http://www.w3.org/2004/02/skos/core#")
    }

    fn node(iri: &str) -> NamedNode {
        NamedNode::new(iri).unwrap()
    }

    fn serialize(triples: &[Triple]) -> String {
        TurtleSerializer::new(config()).unwrap().serialize_to_string(triples).unwrap()
    }

    fn parse(ttl: &str) -> Vec<Triple> {
        oxttl::TurtleParser::new()
            .for_slice(ttl.as_bytes())
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_serialize_groups_by_subject() {
        let base = node(BASE);
        let concept = node("http://example.org/iqb/cs_7/1");
        let title = node("http://purl.org/dc/terms/title");
        let has_top = node("http://www.w3.org/2004/02/skos/core#hasTopConcept");
        let concept_class = node("http://www.w3.org/2004/02/skos/core#Concept");
        let concept2 = node("http://example.org/iqb/cs_7/2");

        let triples = vec![
            Triple::new(base.clone(), title, Literal::new_language_tagged_literal_unchecked("Test", "de")),
            Triple::new(concept.clone(), rdf::TYPE, concept_class),
            Triple::new(base.clone(), has_top.clone(), concept),
            Triple::new(base, has_top, concept2),
        ];

        let out = serialize(&triples);
        assert!(out.starts_with("@base <http://example.org/iqb/cs_7/> .\n"));
        assert!(out.contains("<> dct:title \"Test\"@de ;\n\tskos:hasTopConcept <1> , <2> .\n<1> a skos:Concept .\n"));
    }

    #[test]
    fn test_output_parses_back_to_the_same_triples() {
        let base = node(BASE);
        let triples = vec![
            Triple::new(base.clone(), node("http://purl.org/dc/terms/title"), Literal::new_simple_literal("a \"b\"\n\\")),
            Triple::new(base.clone(), rdf::TYPE, node("http://www.w3.org/2004/02/skos/core#ConceptScheme")),
        ];

        let mut parsed = parse(&serialize(&triples));
        let mut expected = triples.clone();
        parsed.sort_by_key(|t| t.to_string());
        expected.sort_by_key(|t| t.to_string());
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_dot_segments_are_not_relativized() {
        let label = node("http://www.w3.org/2004/02/skos/core#prefLabel");
        let triples: Vec<Triple> = [".", "..", "a/../b", "K1.2"]
            .iter()
            .map(|id| Triple::new(node(&format!("{BASE}{id}")), label.clone(), Literal::new_simple_literal(*id)))
            .collect();

        let out = serialize(&triples);
        assert!(out.contains("<http://example.org/iqb/cs_7/..>"));
        assert!(out.contains("<K1.2>"));

        for triple in parse(&out) {
            let oxrdf::Term::Literal(id) = &triple.object else {
                panic!("unexpected object {}", triple.object);
            };
            assert_eq!(triple.subject.to_string(), format!("<{BASE}{}>", id.value()));
        }
    }

    #[test]
    fn test_invalid_base_is_rejected() {
        let result = TurtleSerializer::new(TurtleConfig::new().with_base_iri("not an iri"));
        assert!(matches!(result, Err(ConvertError::InvalidIri { .. })));
    }
}
