use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use xml2skos_backend::{ConversionConfig, FailurePolicy};

/// One scheme with one concept and no description.
pub const SCENARIO_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MDDefs>
    <MDDef id="7">
        <Label xml:lang="de">Test</Label>
        <Value id="1">
            <Label xml:lang="de">Foo</Label>
        </Value>
    </MDDef>
</MDDefs>
"#;

#[allow(dead_code)]
pub const SCENARIO_TTL: &str = "@base <http://example.org/iqb/cs_7/> .
@prefix dct: <//purl.org/dc/terms/> .
@prefix skos: <//www.w3.org/2004/02/skos/core#> .
<> a skos:ConceptScheme ;
\tdct:creator \"IQB - Institut zur Qualitätsentwicklung im Bildungswesen\"@de ;
\tdct:title \"Test\"@de ;
\tskos:hasTopConcept <1> .
<1> a skos:Concept ;
\tskos:prefLabel \"Foo\"@de ;
\tskos:topConceptOf <> .
";

/// Two schemes, the first one fully described, the second one with two concepts.
#[allow(dead_code)]
pub const TWO_SCHEMES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MDDefs>
    <MDDef id="12">
        <Label xml:lang="de">Kompetenzen</Label>
        <Description xml:lang="de">Allgemeine Kompetenzen</Description>
        <MDDefMetadata>
            <Entry cat="Fach" def="true">Mathematik</Entry>
            <Entry cat="Stufe" def="false">Primar</Entry>
        </MDDefMetadata>
        <Value id="1">
            <Label xml:lang="de">K1</Label>
            <Description xml:lang="de">Argumentieren</Description>
        </Value>
    </MDDef>
    <Group>
        <MDDef id="13">
            <Label xml:lang="de">Leitideen</Label>
            <Value id="1"><Label xml:lang="de">L1</Label></Value>
            <Value id="2"><Label xml:lang="de">L2</Label></Value>
        </MDDef>
    </Group>
</MDDefs>
"#;

pub struct Workspace {
    // Keeps the directory alive for the duration of the test
    _dir: TempDir,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().to_path_buf();
        let output_dir = dir.path().join("data");
        Workspace { _dir: dir, input_dir, output_dir }
    }

    pub fn with_input(xml: &str) -> Self {
        let ws = Self::new();
        ws.write_input("metadata.xml", xml.as_bytes());
        ws
    }

    pub fn write_input(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.input_dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn config(&self) -> ConversionConfig {
        ConversionConfig::new()
            .with_input_dir(&self.input_dir)
            .with_output_dir(&self.output_dir)
    }

    #[allow(dead_code)]
    pub fn keep_going_config(&self) -> ConversionConfig {
        self.config().with_failure_policy(FailurePolicy::KeepGoing)
    }

    #[allow(dead_code)]
    pub fn output(&self, scheme_id: &str) -> PathBuf {
        self.output_dir.join(format!("iqb_cs{}.ttl", scheme_id))
    }

    #[allow(dead_code)]
    pub fn read_output(&self, scheme_id: &str) -> String {
        fs::read_to_string(self.output(scheme_id)).unwrap()
    }

    #[allow(dead_code)]
    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.output_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
