use std::path::PathBuf;

use thiserror::Error;

use crate::xml_tree::XmlTreeError;

pub type Result<T> = std::result::Result<T, ConvertError>;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("No .xml file found in {dir:?}, there should be exactly one")]
    NoInputFile { dir: PathBuf },

    #[error("Found {} .xml files in {dir:?}, there should be exactly one: {files:?}", .files.len())]
    MultipleInputFiles { dir: PathBuf, files: Vec<PathBuf> },

    #[error("Failed to read input directory {dir:?}")]
    ReadInputDir {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read input file {path:?}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input file {path:?} is not valid {encoding}")]
    InvalidEncoding { path: PathBuf, encoding: &'static str },

    #[error("Input file {path:?} declares unsupported encoding '{label}'")]
    UnsupportedEncoding { path: PathBuf, label: String },

    #[error("Failed to parse XML in {path:?}")]
    XmlParse {
        path: PathBuf,
        #[source]
        source: XmlTreeError,
    },

    #[error("Concept scheme '{scheme_id}' has no Label element")]
    MissingSchemeLabel { scheme_id: String },

    #[error("Concept '{concept_id}' in scheme '{scheme_id}' has no Label element")]
    MissingConceptLabel { scheme_id: String, concept_id: String },

    #[error("Invalid IRI <{iri}>: {message}")]
    InvalidIri { iri: String, message: String },

    #[error("Invalid language tag '{tag}': {message}")]
    InvalidLanguageTag { tag: String, message: String },

    #[error("Concept scheme id '{scheme_id}' cannot be used in a file name")]
    UnsafeSchemeId { scheme_id: String },

    #[error("Failed to serialize concept scheme '{scheme_id}'")]
    Serialize {
        scheme_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory {dir:?}")]
    CreateOutputDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path:?}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{failed} of {total} concept schemes failed to convert")]
    SchemesFailed { failed: usize, total: usize },
}
