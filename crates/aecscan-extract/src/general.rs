use crate::Fields;
use crate::error::Result;
use aecscan_types::FileDescriptor;
use serde_json::json;

pub const VERSION: &str = "1";

/// Broad family a file belongs to, keyed by extension. Always available,
/// so every extraction carries at least this much.
fn category(ext: &str) -> &'static str {
    match ext {
        ".dwg" | ".dxf" | ".dgn" | ".rvt" | ".rfa" | ".skp" => "cad",
        ".ifc" | ".nwd" | ".nwc" | ".3ds" => "model",
        ".pdf" | ".doc" | ".docx" | ".rtf" | ".odt" => "document",
        ".xls" | ".xlsx" | ".csv" | ".ods" => "spreadsheet",
        ".ppt" | ".pptx" => "presentation",
        ".jpg" | ".jpeg" | ".png" | ".tif" | ".tiff" | ".bmp" | ".gif" => "image",
        ".txt" | ".md" | ".log" => "text",
        ".zip" | ".rar" | ".7z" => "archive",
        _ => "other",
    }
}

fn mime_type(ext: &str) -> &'static str {
    match ext {
        ".pdf" => "application/pdf",
        ".dwg" => "image/vnd.dwg",
        ".dxf" => "image/vnd.dxf",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ".pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".png" => "image/png",
        ".tif" | ".tiff" => "image/tiff",
        ".txt" => "text/plain",
        ".csv" => "text/csv",
        ".zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

pub fn applies(_extension: &str) -> bool {
    true
}

pub fn extract(descriptor: &FileDescriptor) -> Result<Fields> {
    let mut fields = Fields::new();
    fields.insert("file_category".into(), json!(category(&descriptor.extension)));
    fields.insert("mime_type".into(), json!(mime_type(&descriptor.extension)));
    if let Some(hash) = &descriptor.content_hash {
        fields.insert("content_hash".into(), json!(hash));
    }
    Ok(fields)
}
