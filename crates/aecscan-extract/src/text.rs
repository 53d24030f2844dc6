use crate::Fields;
use crate::error::Result;
use aecscan_types::FileDescriptor;
use serde_json::json;
use std::io::Read;

pub const VERSION: &str = "1";

// Enough to sniff encoding and structure without reading huge logs whole.
const SAMPLE_BYTES: usize = 256 * 1024;

const CSV_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

pub fn applies(extension: &str) -> bool {
    matches!(extension, ".txt" | ".csv" | ".md")
}

pub fn extract(descriptor: &FileDescriptor) -> Result<Fields> {
    let mut file = std::fs::File::open(&descriptor.path)?;
    let mut sample = vec![0u8; SAMPLE_BYTES];
    let n = file.read(&mut sample)?;
    sample.truncate(n);

    let mut fields = Fields::new();
    fields.insert("encoding".into(), json!(sniff_encoding(&sample)));

    let text = String::from_utf8_lossy(&sample);
    fields.insert("line_count".into(), json!(text.lines().count()));
    fields.insert("word_count".into(), json!(text.split_whitespace().count()));
    fields.insert("char_count".into(), json!(text.chars().count()));
    fields.insert("sampled".into(), json!(n == SAMPLE_BYTES));

    if descriptor.extension == ".csv" {
        if let Some((delimiter, columns)) = sniff_csv(&text) {
            fields.insert("csv_delimiter".into(), json!(delimiter.to_string()));
            fields.insert("csv_columns".into(), json!(columns));
        }
    }
    Ok(fields)
}

fn sniff_encoding(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        "utf-8-bom"
    } else if bytes.starts_with(&[0xFF, 0xFE]) {
        "utf-16-le"
    } else if bytes.starts_with(&[0xFE, 0xFF]) {
        "utf-16-be"
    } else if bytes.is_ascii() {
        "ascii"
    } else if std::str::from_utf8(bytes).is_ok() {
        "utf-8"
    } else {
        "binary"
    }
}

/// Pick the delimiter that splits the header line into the most columns,
/// provided it splits it at all.
fn sniff_csv(text: &str) -> Option<(char, usize)> {
    let header = text.lines().next()?;
    CSV_DELIMITERS
        .iter()
        .map(|&d| (d, header.split(d).count()))
        .filter(|&(_, columns)| columns > 1)
        .max_by_key(|&(_, columns)| columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_sniffing() {
        assert_eq!(sniff_encoding(b"plain ascii"), "ascii");
        assert_eq!(sniff_encoding(&[0xEF, 0xBB, 0xBF, b'h', b'i']), "utf-8-bom");
        assert_eq!(sniff_encoding("héllo".as_bytes()), "utf-8");
        assert_eq!(sniff_encoding(&[0xFF, 0xFE, 0x00]), "utf-16-le");
    }

    #[test]
    fn csv_delimiter_detection() {
        assert_eq!(sniff_csv("a,b,c\n1,2,3"), Some((',', 3)));
        assert_eq!(sniff_csv("a;b;c;d\n"), Some((';', 4)));
        assert_eq!(sniff_csv("no delimiters here"), None);
    }

    #[test]
    fn counts_lines_in_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "one\ntwo\nthree\n").unwrap();
        let descriptor = FileDescriptor {
            name: "notes.txt".into(),
            extension: ".txt".into(),
            size: 14,
            created: None,
            modified: None,
            accessed: None,
            parent: dir.path().to_path_buf(),
            depth: 0,
            content_hash: None,
            path,
        };
        let fields = extract(&descriptor).unwrap();
        assert_eq!(fields["line_count"], json!(3));
        assert_eq!(fields["word_count"], json!(3));
        assert_eq!(fields["char_count"], json!(14));
        assert_eq!(fields["encoding"], json!("ascii"));
        assert_eq!(fields["sampled"], json!(false));
    }
}
