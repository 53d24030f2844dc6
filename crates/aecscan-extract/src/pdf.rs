use crate::Fields;
use crate::error::{Error, Result};
use aecscan_types::FileDescriptor;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde_json::json;
use std::io::{Read, Seek, SeekFrom};

pub const VERSION: &str = "1";

static HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^%PDF-(\d\.\d)").unwrap());
static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/Title\s*\(([^)]+)\)").unwrap());
static AUTHOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"/Author\s*\(([^)]+)\)").unwrap());
// \b keeps /Type /Pages (the page-tree root) out of the count.
static PAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/Type\s*/Page\b").unwrap());

const TRAILER_WINDOW: u64 = 2048;
// Info dictionary and page objects can sit anywhere; cap how much of a
// large file we are willing to scan for them.
const SCAN_WINDOW: usize = 4 * 1024 * 1024;

pub fn applies(extension: &str) -> bool {
    extension == ".pdf"
}

/// Structural sniff. Reads the version from the leading magic, counts
/// page objects and pulls literal-string Info entries from a capped
/// window, and looks for an encryption dictionary near the end of the
/// file; never parses the object graph.
pub fn extract(descriptor: &FileDescriptor) -> Result<Fields> {
    let mut file = std::fs::File::open(&descriptor.path)?;
    let mut body = vec![0u8; SCAN_WINDOW];
    let n = read_up_to(&mut file, &mut body)?;
    body.truncate(n);

    let caps = HEADER
        .captures(&body)
        .ok_or_else(|| Error::Malformed("missing %PDF header".into()))?;
    let version = String::from_utf8_lossy(&caps[1]).into_owned();

    let len = file.seek(SeekFrom::End(0))?;
    let window = TRAILER_WINDOW.min(len);
    file.seek(SeekFrom::End(-(window as i64)))?;
    let mut tail = Vec::with_capacity(window as usize);
    file.read_to_end(&mut tail)?;
    let encrypted = tail.windows(8).any(|w| w == b"/Encrypt");

    let mut fields = Fields::new();
    fields.insert("pdf_version".into(), json!(version));
    fields.insert("encrypted".into(), json!(encrypted));

    let page_count = PAGE.find_iter(&body).count();
    if page_count > 0 {
        fields.insert("page_count".into(), json!(page_count));
    }
    if let Some(title) = literal_string(&TITLE, &body) {
        fields.insert("title".into(), json!(title));
    }
    if let Some(author) = literal_string(&AUTHOR, &body) {
        fields.insert("author".into(), json!(author));
    }
    Ok(fields)
}

fn read_up_to(file: &mut std::fs::File, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    loop {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 || filled + n == buf.len() {
            return Ok(filled + n);
        }
        filled += n;
    }
}

/// First capture of `re`, taken only when it is plain printable text.
/// UTF-16 and escaped Info strings exist; skipping them beats mangling
/// them.
fn literal_string(re: &Regex, body: &[u8]) -> Option<String> {
    let raw = re.captures(body)?.get(1)?.as_bytes();
    let text = std::str::from_utf8(raw).ok()?.trim();
    (!text.is_empty() && text.chars().all(|c| !c.is_control() && c != '\\'))
        .then(|| text.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn descriptor_for(path: PathBuf) -> FileDescriptor {
        FileDescriptor {
            name: path.file_name().unwrap().to_string_lossy().into_owned(),
            extension: ".pdf".into(),
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
    fn reads_version_from_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.pdf");
        std::fs::write(&path, b"%PDF-1.7\nsome content\n%%EOF").unwrap();
        let fields = extract(&descriptor_for(path)).unwrap();
        assert_eq!(fields["pdf_version"], json!("1.7"));
        assert_eq!(fields["encrypted"], json!(false));
    }

    #[test]
    fn counts_page_objects_and_reads_info_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(
            &path,
            b"%PDF-1.5\n\
              1 0 obj << /Type /Pages /Kids [2 0 R 3 0 R] >> endobj\n\
              2 0 obj << /Type /Page >> endobj\n\
              3 0 obj << /Type /Page >> endobj\n\
              4 0 obj << /Title (Site Survey) /Author (K. Lane) >> endobj\n\
              %%EOF",
        )
        .unwrap();
        let fields = extract(&descriptor_for(path)).unwrap();
        // The /Pages tree root must not count as a page.
        assert_eq!(fields["page_count"], json!(2));
        assert_eq!(fields["title"], json!("Site Survey"));
        assert_eq!(fields["author"], json!("K. Lane"));
    }

    #[test]
    fn non_literal_info_strings_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hex.pdf");
        std::fs::write(&path, b"%PDF-1.4\n<< /Title (\\376\\377odd) >>\n%%EOF").unwrap();
        let fields = extract(&descriptor_for(path)).unwrap();
        assert_eq!(fields.get("title"), None);
    }

    #[test]
    fn flags_encrypted_trailer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.pdf");
        std::fs::write(&path, b"%PDF-1.4\nbody\ntrailer << /Encrypt 5 0 R >>\n%%EOF").unwrap();
        let fields = extract(&descriptor_for(path)).unwrap();
        assert_eq!(fields["encrypted"], json!(true));
    }

    #[test]
    fn rejects_non_pdf_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();
        assert!(matches!(
            extract(&descriptor_for(path)),
            Err(Error::Malformed(_))
        ));
    }
}
