//! High-level conversion API
//!
//! Finds the input file, extracts every concept scheme, and writes one
//! Turtle file per scheme into the output directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use walkdir::WalkDir;

use crate::config::{ConversionConfig, FailurePolicy};
use crate::encoding::read_xml_file;
use crate::error::{ConvertError, Result};
use crate::extractor::extract_concept_schemes;
use crate::graph_builder::{SchemeGraph, build_scheme_graph};
use crate::logger;
use crate::turtle::{TurtleConfig, TurtleSerializer};
use crate::types::ConceptSchemeRecord;
use crate::uri::output_file_name;
use crate::vocab::{dcterms, skos};
use crate::xml_tree::XmlDocument;

pub const INPUT_EXTENSION: &str = ".xml";

/// Statistics from a conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Number of concept schemes found in the input
    pub schemes_found: usize,
    /// Files written, in document order
    pub files_written: Vec<PathBuf>,
    /// Total number of triples across all written files
    pub triples_written: usize,
    /// Schemes that failed under `FailurePolicy::KeepGoing`
    pub schemes_failed: usize,
}

/// The single `.xml` file directly inside `dir`.
pub fn find_input_file(dir: &Path) -> Result<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| ConvertError::ReadInputDir {
            dir: dir.to_path_buf(),
            source,
        })?;

        let is_xml = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(INPUT_EXTENSION));

        if is_xml && entry.path().is_file() {
            files.push(entry.into_path());
        }
    }

    match files.len() {
        0 => Err(ConvertError::NoInputFile { dir: dir.to_path_buf() }),
        1 => Ok(files.remove(0)),
        _ => Err(ConvertError::MultipleInputFiles {
            dir: dir.to_path_buf(),
            files,
        }),
    }
}

pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| ConvertError::CreateOutputDir {
            dir: dir.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Read, decode and parse the input document.
pub fn load_document(path: &Path) -> Result<XmlDocument> {
    let content = read_xml_file(path)?;
    XmlDocument::parse_str(&content).map_err(|source| ConvertError::XmlParse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn extract_from_file(path: &Path) -> Result<Vec<ConceptSchemeRecord>> {
    let doc = load_document(path)?;
    Ok(extract_concept_schemes(&doc))
}

/// Turtle settings for one scheme: `@base` at the scheme IRI, `dct:` and `skos:` bound.
pub fn turtle_config_for(graph: &SchemeGraph) -> TurtleConfig {
    TurtleConfig::new()
        .with_base_iri(graph.base().as_str())
        .with_prefix(dcterms::PREFIX, dcterms::NAMESPACE)
        .with_prefix(skos::PREFIX, skos::NAMESPACE)
}

/// Render one scheme as Turtle without touching the file system.
pub fn scheme_to_turtle(record: &ConceptSchemeRecord) -> Result<String> {
    let graph = build_scheme_graph(record)?;
    TurtleSerializer::new(turtle_config_for(&graph))?
        .serialize_to_string(graph.triples())
        .map_err(|source| ConvertError::Serialize {
            scheme_id: record.id.clone(),
            source,
        })
}

/// Build the graph of one scheme and write it to `<output_dir>/iqb_cs<id>.ttl`.
///
/// Returns the written path and the number of triples.
pub fn write_scheme(record: &ConceptSchemeRecord, output_dir: &Path) -> Result<(PathBuf, usize)> {
    let path = output_dir.join(output_file_name(&record.id)?);
    let graph = build_scheme_graph(record)?;

    TurtleSerializer::new(turtle_config_for(&graph))?.serialize_to_path(graph.triples(), &path)?;

    Ok((path, graph.len()))
}

/// Discovery and extraction only.
pub fn inspect(config: &ConversionConfig) -> Result<Vec<ConceptSchemeRecord>> {
    let input = find_input_file(&config.input_dir)?;
    logger::info(&format!("Reading {:?}", input));
    extract_from_file(&input)
}

/// Run the whole conversion.
pub fn run_conversion(config: &ConversionConfig) -> Result<ConversionStats> {
    let start = Instant::now();

    let input = find_input_file(&config.input_dir)?;
    ensure_output_dir(&config.output_dir)?;

    logger::info(&format!("Reading {:?}", input));
    let schemes = extract_from_file(&input)?;
    logger::info(&format!("Found {} concept schemes", schemes.len()));

    let mut stats = ConversionStats {
        schemes_found: schemes.len(),
        ..Default::default()
    };

    for record in &schemes {
        match write_scheme(record, &config.output_dir) {
            Ok((path, triples)) => {
                logger::info(&format!("Wrote {:?} ({} triples)", path, triples));
                stats.triples_written += triples;
                stats.files_written.push(path);
            }
            Err(e) => match config.failure_policy {
                FailurePolicy::Abort => return Err(e),
                FailurePolicy::KeepGoing => {
                    logger::error(&format!("Skipping concept scheme '{}': {}", record.id, e));
                    stats.schemes_failed += 1;
                }
            },
        }
    }

    logger::info(&format!(
        "Converted {} of {} concept schemes in {}",
        stats.files_written.len(),
        stats.schemes_found,
        logger::format_duration(start.elapsed())
    ));

    if stats.schemes_failed > 0 {
        return Err(ConvertError::SchemesFailed {
            failed: stats.schemes_failed,
            total: stats.schemes_found,
        });
    }

    Ok(stats)
}
