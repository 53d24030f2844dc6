// Metadata extraction for scanned files.
//
// The extractor set is a closed enum: adding a format means adding a
// variant, not registering into a global table. The dispatcher owns an
// explicit list, runs every applicable extractor, and records per-extractor
// failures without aborting the file.

mod cad;
mod error;
mod general;
mod image;
mod office;
mod pdf;
mod summary;
mod text;

pub use error::{Error, Result};

use aecscan_naming::NamingResult;
use aecscan_types::FileDescriptor;
use std::collections::BTreeMap;

/// Key/value metadata produced by one extractor.
pub type Fields = BTreeMap<String, serde_json::Value>;

/// The closed set of extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    /// Category and MIME classification; applies to every file.
    General,
    /// PDF header/trailer sniff.
    Pdf,
    /// DWG/DXF version detection.
    Cad,
    /// OOXML document properties.
    Office,
    /// PNG/JPEG/TIFF dimensions and layout.
    Image,
    /// Plain-text and CSV structure.
    Text,
    /// Always fails; lets tests prove one bad extractor cannot sink a file.
    #[cfg(test)]
    Failing,
}

impl Extractor {
    pub fn name(&self) -> &'static str {
        match self {
            Extractor::General => "general",
            Extractor::Pdf => "pdf",
            Extractor::Cad => "cad",
            Extractor::Office => "office",
            Extractor::Image => "image",
            Extractor::Text => "text",
            #[cfg(test)]
            Extractor::Failing => "failing",
        }
    }

    /// Version of the extractor's field layout. Bumped when an extractor
    /// changes what it writes, so stored payloads can be told apart from
    /// fresh ones.
    pub fn version(&self) -> &'static str {
        match self {
            Extractor::General => general::VERSION,
            Extractor::Pdf => pdf::VERSION,
            Extractor::Cad => cad::VERSION,
            Extractor::Office => office::VERSION,
            Extractor::Image => image::VERSION,
            Extractor::Text => text::VERSION,
            #[cfg(test)]
            Extractor::Failing => "0",
        }
    }

    pub fn applies(&self, extension: &str) -> bool {
        match self {
            Extractor::General => general::applies(extension),
            Extractor::Pdf => pdf::applies(extension),
            Extractor::Cad => cad::applies(extension),
            Extractor::Office => office::applies(extension),
            Extractor::Image => image::applies(extension),
            Extractor::Text => text::applies(extension),
            #[cfg(test)]
            Extractor::Failing => true,
        }
    }

    pub fn run(&self, descriptor: &FileDescriptor) -> Result<Fields> {
        match self {
            Extractor::General => general::extract(descriptor),
            Extractor::Pdf => pdf::extract(descriptor),
            Extractor::Cad => cad::extract(descriptor),
            Extractor::Office => office::extract(descriptor),
            Extractor::Image => image::extract(descriptor),
            Extractor::Text => text::extract(descriptor),
            #[cfg(test)]
            Extractor::Failing => Err(Error::Malformed("synthetic failure".into())),
        }
    }
}

/// Fields produced by one extractor, kept separate so each extractor's
/// contribution can be stored and replaced independently.
#[derive(Debug, Clone)]
pub struct ExtractorOutput {
    pub extractor: &'static str,
    pub version: &'static str,
    pub fields: Fields,
}

/// Result of running the dispatch over one file.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// True when at least one extractor produced fields.
    pub success: bool,
    /// Per-extractor field sets, in dispatch order.
    pub outputs: Vec<ExtractorOutput>,
    /// All fields merged; later extractors win on key collisions.
    pub fields: Fields,
    /// "extractor: message" per failed extractor, in dispatch order.
    pub errors: Vec<String>,
    /// One-line description assembled from content and fields.
    pub summary: Option<String>,
    /// Naming-convention classification of the bare filename.
    pub naming: NamingResult,
}

/// Runs an explicit, ordered extractor list over descriptors.
pub struct ExtractionDispatch {
    extractors: Vec<Extractor>,
}

impl Default for ExtractionDispatch {
    fn default() -> Self {
        Self::standard()
    }
}

impl ExtractionDispatch {
    /// The full production set, general first so every file gets at least
    /// a category.
    pub fn standard() -> Self {
        Self::new(vec![
            Extractor::General,
            Extractor::Pdf,
            Extractor::Cad,
            Extractor::Office,
            Extractor::Image,
            Extractor::Text,
        ])
    }

    pub fn new(extractors: Vec<Extractor>) -> Self {
        Self { extractors }
    }

    pub fn extract(&self, descriptor: &FileDescriptor) -> Extraction {
        let mut outputs = Vec::new();
        let mut fields = Fields::new();
        let mut errors = Vec::new();

        for extractor in &self.extractors {
            if !extractor.applies(&descriptor.extension) {
                continue;
            }
            match extractor.run(descriptor) {
                Ok(extracted) => {
                    fields.extend(extracted.clone());
                    outputs.push(ExtractorOutput {
                        extractor: extractor.name(),
                        version: extractor.version(),
                        fields: extracted,
                    });
                }
                Err(err) => errors.push(format!("{}: {}", extractor.name(), err)),
            }
        }

        let summary = summary::summarize(descriptor, &fields);
        Extraction {
            success: !outputs.is_empty(),
            outputs,
            fields,
            errors,
            summary,
            naming: aecscan_naming::parse(&descriptor.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn descriptor_for(path: PathBuf, ext: &str) -> FileDescriptor {
        FileDescriptor {
            name: path.file_name().unwrap().to_string_lossy().into_owned(),
            extension: ext.into(),
            size: 0,
            created: None,
            modified: None,
            accessed: None,
            parent: PathBuf::new(),
            depth: 0,
            content_hash: None,
            path,
        }
    }

    #[test]
    fn pdf_file_gets_general_and_pdf_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CD_A_DWG_001_R3_031524.pdf");
        std::fs::write(&path, b"%PDF-1.6\ncontent\n%%EOF").unwrap();

        let extraction = ExtractionDispatch::standard().extract(&descriptor_for(path, ".pdf"));
        assert!(extraction.success);
        assert_eq!(extraction.fields["file_category"], json!("document"));
        assert_eq!(extraction.fields["pdf_version"], json!("1.6"));
        assert!(extraction.errors.is_empty());
        assert!(extraction.naming.is_standard);

        let names: Vec<_> = extraction.outputs.iter().map(|o| o.extractor).collect();
        assert_eq!(names, vec!["general", "pdf"]);
        assert!(extraction.outputs.iter().all(|o| o.version == "1"));
        assert!(extraction.summary.unwrap().starts_with("PDF 1.6 document"));
    }

    #[test]
    fn one_failing_extractor_does_not_sink_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.txt");
        std::fs::write(&path, b"hello\n").unwrap();

        let dispatch = ExtractionDispatch::new(vec![
            Extractor::Failing,
            Extractor::General,
            Extractor::Text,
        ]);
        let extraction = dispatch.extract(&descriptor_for(path, ".txt"));
        assert!(extraction.success);
        assert_eq!(extraction.errors.len(), 1);
        assert!(extraction.errors[0].starts_with("failing:"));
        assert_eq!(extraction.fields["line_count"], json!(1));
    }

    #[test]
    fn all_extractors_failing_is_not_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.bin");
        std::fs::write(&path, b"\x00").unwrap();

        let dispatch = ExtractionDispatch::new(vec![Extractor::Failing]);
        let extraction = dispatch.extract(&descriptor_for(path, ".bin"));
        assert!(!extraction.success);
        assert_eq!(extraction.errors.len(), 1);
    }

    #[test]
    fn inapplicable_extractors_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.xyz");
        std::fs::write(&path, b"data").unwrap();

        let extraction = ExtractionDispatch::standard().extract(&descriptor_for(path, ".xyz"));
        // Only the general extractor applies to an unknown extension.
        assert!(extraction.success);
        assert!(extraction.errors.is_empty());
        assert_eq!(extraction.fields["file_category"], json!("other"));
    }
}
