use crate::Fields;
use aecscan_types::FileDescriptor;
use std::io::Read;

// A summary is a hint for browsing, not a transcript.
const MAX_SUMMARY_CHARS: usize = 240;
const TEXT_SAMPLE_BYTES: usize = 4 * 1024;

/// One-line description of a file, assembled from whatever the extractors
/// learned. Text formats get a leading excerpt of their content; binary
/// formats get a sentence built from their fields.
pub fn summarize(descriptor: &FileDescriptor, fields: &Fields) -> Option<String> {
    let summary = match descriptor.extension.as_str() {
        ".txt" | ".md" | ".csv" | ".log" => text_excerpt(descriptor)?,
        ".pdf" => pdf_summary(fields),
        ".dwg" | ".dxf" => cad_summary(fields),
        ".docx" | ".xlsx" | ".pptx" => office_summary(fields),
        ".png" | ".jpg" | ".jpeg" | ".tif" | ".tiff" => image_summary(fields),
        _ => {
            let category = fields.get("file_category")?.as_str()?;
            format!("{category} file")
        }
    };
    Some(truncate(&summary))
}

fn text_excerpt(descriptor: &FileDescriptor) -> Option<String> {
    let mut file = std::fs::File::open(&descriptor.path).ok()?;
    let mut sample = vec![0u8; TEXT_SAMPLE_BYTES];
    let n = file.read(&mut sample).ok()?;
    let text = String::from_utf8_lossy(&sample[..n]);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

fn pdf_summary(fields: &Fields) -> String {
    let mut parts = vec![match fields.get("pdf_version").and_then(|v| v.as_str()) {
        Some(version) => format!("PDF {version} document"),
        None => "PDF document".to_owned(),
    }];
    if let Some(pages) = fields.get("page_count").and_then(|v| v.as_i64()) {
        parts.push(format!("{pages} pages"));
    }
    if let Some(title) = fields.get("title").and_then(|v| v.as_str()) {
        parts.push(format!("\"{title}\""));
    }
    if let Some(author) = fields.get("author").and_then(|v| v.as_str()) {
        parts.push(format!("by {author}"));
    }
    parts.join(", ")
}

fn cad_summary(fields: &Fields) -> String {
    let format = fields
        .get("cad_format")
        .and_then(|v| v.as_str())
        .unwrap_or("CAD");
    let mut summary = match fields.get("cad_release").and_then(|v| v.as_str()) {
        Some(release) => format!("{format} drawing (AutoCAD {release})"),
        None => format!("{format} drawing"),
    };
    if let Some(total) = fields.get("entity_total").and_then(|v| v.as_i64()) {
        summary.push_str(&format!(", {total} entities"));
    }
    summary
}

fn office_summary(fields: &Fields) -> String {
    let mut parts = vec!["office document".to_owned()];
    if let Some(pages) = fields.get("page_count").and_then(|v| v.as_i64()) {
        parts.push(format!("{pages} pages"));
    }
    if let Some(title) = fields.get("title").and_then(|v| v.as_str()) {
        parts.push(format!("\"{title}\""));
    }
    if let Some(author) = fields.get("author").and_then(|v| v.as_str()) {
        parts.push(format!("by {author}"));
    }
    parts.join(", ")
}

fn image_summary(fields: &Fields) -> String {
    let format = fields
        .get("image_format")
        .and_then(|v| v.as_str())
        .unwrap_or("image");
    match (
        fields.get("width").and_then(|v| v.as_i64()),
        fields.get("height").and_then(|v| v.as_i64()),
    ) {
        (Some(width), Some(height)) => format!("{width}x{height} {format} image"),
        _ => format!("{format} image"),
    }
}

fn truncate(summary: &str) -> String {
    if summary.chars().count() <= MAX_SUMMARY_CHARS {
        return summary.to_owned();
    }
    let cut: String = summary.chars().take(MAX_SUMMARY_CHARS - 3).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn pdf_summary_folds_in_title_and_pages() {
        let mut fields = Fields::new();
        fields.insert("pdf_version".into(), json!("1.7"));
        fields.insert("page_count".into(), json!(12));
        fields.insert("title".into(), json!("Structural Notes"));
        assert_eq!(
            pdf_summary(&fields),
            "PDF 1.7 document, 12 pages, \"Structural Notes\""
        );
    }

    #[test]
    fn text_files_are_excerpted_and_capped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, format!("word {}\n", "x".repeat(500))).unwrap();
        let descriptor = FileDescriptor {
            name: "notes.txt".into(),
            extension: ".txt".into(),
            size: 0,
            created: None,
            modified: None,
            accessed: None,
            parent: dir.path().to_path_buf(),
            depth: 0,
            content_hash: None,
            path,
        };
        let summary = summarize(&descriptor, &Fields::new()).unwrap();
        assert!(summary.starts_with("word x"));
        assert!(summary.ends_with("..."));
        assert!(summary.chars().count() <= MAX_SUMMARY_CHARS);
    }

    #[test]
    fn unknown_formats_fall_back_to_category() {
        let mut fields = Fields::new();
        fields.insert("file_category".into(), json!("archive"));
        let descriptor = FileDescriptor {
            name: "x.zip".into(),
            extension: ".zip".into(),
            size: 0,
            created: None,
            modified: None,
            accessed: None,
            parent: PathBuf::new(),
            depth: 0,
            content_hash: None,
            path: PathBuf::from("/nope/x.zip"),
        };
        assert_eq!(summarize(&descriptor, &fields).as_deref(), Some("archive file"));
    }
}
