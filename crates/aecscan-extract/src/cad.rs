use crate::Fields;
use crate::error::{Error, Result};
use aecscan_types::FileDescriptor;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use std::io::Read;

pub const VERSION: &str = "1";

static VERSION_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"AC\d{4}").unwrap());

// Enough for the header plus a useful slice of the ENTITIES section.
const DXF_SCAN_WINDOW: usize = 4 * 1024 * 1024;

/// AutoCAD drawing database version code -> release year.
fn release_name(code: &str) -> Option<&'static str> {
    match code {
        "AC1009" => Some("R12"),
        "AC1012" => Some("R13"),
        "AC1014" => Some("R14"),
        "AC1015" => Some("2000"),
        "AC1018" => Some("2004"),
        "AC1021" => Some("2007"),
        "AC1024" => Some("2010"),
        "AC1027" => Some("2013"),
        "AC1032" => Some("2018"),
        _ => None,
    }
}

pub fn applies(extension: &str) -> bool {
    matches!(extension, ".dwg" | ".dxf")
}

pub fn extract(descriptor: &FileDescriptor) -> Result<Fields> {
    match descriptor.extension.as_str() {
        ".dwg" => extract_dwg(descriptor),
        ".dxf" => extract_dxf(descriptor),
        other => Err(Error::Malformed(format!("not a CAD extension: {other}"))),
    }
}

/// Binary DWG files begin with a six-byte version code.
fn extract_dwg(descriptor: &FileDescriptor) -> Result<Fields> {
    let mut file = std::fs::File::open(&descriptor.path)?;
    let mut magic = [0u8; 6];
    file.read_exact(&mut magic)
        .map_err(|_| Error::Malformed("DWG header too short".into()))?;
    let code = std::str::from_utf8(&magic)
        .ok()
        .filter(|c| VERSION_CODE.is_match(c))
        .ok_or_else(|| Error::Malformed("missing DWG version code".into()))?;

    Ok(version_fields("dwg", code))
}

/// Text DXF files carry the version as the $ACADVER header variable and
/// their drawing content as an ENTITIES section of (code, value) pairs.
fn extract_dxf(descriptor: &FileDescriptor) -> Result<Fields> {
    let mut file = std::fs::File::open(&descriptor.path)?;
    let mut head = vec![0u8; DXF_SCAN_WINDOW];
    let n = file.read(&mut head)?;
    let text = String::from_utf8_lossy(&head[..n]);

    let after_var = text
        .split("$ACADVER")
        .nth(1)
        .ok_or_else(|| Error::Malformed("missing $ACADVER variable".into()))?;
    let code = VERSION_CODE
        .find(after_var)
        .ok_or_else(|| Error::Malformed("missing DXF version code".into()))?
        .as_str();

    let mut fields = version_fields("dxf", code);
    if let Some(counts) = count_entities(&text) {
        let total: i64 = counts.values().sum();
        fields.insert("entity_counts".into(), json!(counts));
        fields.insert("entity_total".into(), json!(total));
    }
    Ok(fields)
}

/// Tally entity types in the ENTITIES section. DXF text alternates a
/// group-code line and a value line; code 0 inside the section starts an
/// entity. Returns None when the file has no ENTITIES section at all.
fn count_entities(text: &str) -> Option<std::collections::BTreeMap<String, i64>> {
    let mut counts = std::collections::BTreeMap::new();
    let mut saw_section = false;
    let mut in_entities = false;
    let mut lines = text.lines().map(str::trim);
    while let (Some(code), Some(value)) = (lines.next(), lines.next()) {
        match (code, value) {
            ("2", "ENTITIES") => {
                saw_section = true;
                in_entities = true;
            }
            ("0", "ENDSEC") if in_entities => in_entities = false,
            ("0", name) if in_entities => {
                *counts.entry(name.to_owned()).or_insert(0) += 1;
            }
            _ => {}
        }
    }
    saw_section.then_some(counts)
}

fn version_fields(format: &str, code: &str) -> Fields {
    let mut fields = Fields::new();
    fields.insert("cad_format".into(), json!(format));
    fields.insert("cad_version_code".into(), json!(code));
    if let Some(release) = release_name(code) {
        fields.insert("cad_release".into(), json!(release));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn reads_dwg_version_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.dwg");
        std::fs::write(&path, b"AC1032rest-of-binary-drawing").unwrap();
        let fields = extract(&descriptor_for(path, ".dwg")).unwrap();
        assert_eq!(fields["cad_version_code"], json!("AC1032"));
        assert_eq!(fields["cad_release"], json!("2018"));
    }

    #[test]
    fn reads_dxf_acadver_variable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.dxf");
        std::fs::write(&path, "0\nSECTION\n2\nHEADER\n9\n$ACADVER\n1\nAC1027\n0\nENDSEC\n")
            .unwrap();
        let fields = extract(&descriptor_for(path, ".dxf")).unwrap();
        assert_eq!(fields["cad_format"], json!("dxf"));
        assert_eq!(fields["cad_release"], json!("2013"));
    }

    #[test]
    fn tallies_dxf_entities_by_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floor.dxf");
        std::fs::write(
            &path,
            "0\nSECTION\n2\nHEADER\n9\n$ACADVER\n1\nAC1032\n0\nENDSEC\n\
             0\nSECTION\n2\nENTITIES\n\
             0\nLINE\n8\n0\n0\nLINE\n8\n0\n0\nCIRCLE\n8\n0\n\
             0\nENDSEC\n0\nEOF\n",
        )
        .unwrap();
        let fields = extract(&descriptor_for(path, ".dxf")).unwrap();
        assert_eq!(fields["entity_total"], json!(3));
        assert_eq!(fields["entity_counts"], json!({"CIRCLE": 1, "LINE": 2}));
    }

    #[test]
    fn dxf_without_entities_section_omits_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hdr.dxf");
        std::fs::write(&path, "0\nSECTION\n2\nHEADER\n9\n$ACADVER\n1\nAC1027\n0\nENDSEC\n")
            .unwrap();
        let fields = extract(&descriptor_for(path, ".dxf")).unwrap();
        assert_eq!(fields.get("entity_total"), None);
    }

    #[test]
    fn truncated_dwg_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stub.dwg");
        std::fs::write(&path, b"AC").unwrap();
        assert!(matches!(
            extract(&descriptor_for(path, ".dwg")),
            Err(Error::Malformed(_))
        ));
    }
}
