use crate::Fields;
use crate::error::Result;
use aecscan_types::FileDescriptor;
use serde_json::json;
use std::io::Read;
use zip::ZipArchive;

pub const VERSION: &str = "1";

pub fn applies(extension: &str) -> bool {
    matches!(extension, ".docx" | ".xlsx" | ".pptx")
}

/// OOXML documents are zip containers; the authorship and statistics
/// properties live in two well-known XML members. A valid archive with
/// neither member yields empty fields, not an error.
pub fn extract(descriptor: &FileDescriptor) -> Result<Fields> {
    let file = std::fs::File::open(&descriptor.path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut fields = Fields::new();
    if let Some(core) = read_member(&mut archive, "docProps/core.xml")? {
        copy_tag(&core, "dc:title", "title", &mut fields);
        copy_tag(&core, "dc:creator", "author", &mut fields);
        copy_tag(&core, "cp:lastModifiedBy", "last_modified_by", &mut fields);
        copy_tag(&core, "dcterms:created", "doc_created", &mut fields);
        copy_tag(&core, "dcterms:modified", "doc_modified", &mut fields);
        copy_tag(&core, "cp:revision", "doc_revision", &mut fields);
    }
    if let Some(app) = read_member(&mut archive, "docProps/app.xml")? {
        copy_numeric_tag(&app, "Pages", "page_count", &mut fields);
        copy_numeric_tag(&app, "Words", "word_count", &mut fields);
        copy_tag(&app, "Application", "application", &mut fields);
        copy_tag(&app, "Company", "company", &mut fields);
    }

    Ok(fields)
}

fn read_member<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>> {
    match archive.by_name(name) {
        Ok(mut member) => {
            let mut xml = String::new();
            member.read_to_string(&mut xml)?;
            Ok(Some(xml))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Pull the text content of `<tag ...>text</tag>`. The docProps members
/// are flat enough that tag-level matching beats pulling in an XML parser.
fn tag_text<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = xml.find(&format!("<{tag}"))?;
    let content_start = xml[open..].find('>')? + open + 1;
    let content_end = xml[content_start..].find(&format!("</{tag}>"))? + content_start;
    let text = xml[content_start..content_end].trim();
    (!text.is_empty()).then_some(text)
}

fn copy_tag(xml: &str, tag: &str, key: &str, fields: &mut Fields) {
    if let Some(text) = tag_text(xml, tag) {
        fields.insert(key.to_owned(), json!(text));
    }
}

fn copy_numeric_tag(xml: &str, tag: &str, key: &str, fields: &mut Fields) {
    if let Some(value) = tag_text(xml, tag).and_then(|t| t.parse::<i64>().ok()) {
        fields.insert(key.to_owned(), json!(value));
    }
}
