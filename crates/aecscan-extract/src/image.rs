use crate::Fields;
use crate::error::{Error, Result};
use aecscan_types::FileDescriptor;
use serde_json::json;
use std::io::Read;

pub const VERSION: &str = "1";

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub fn applies(extension: &str) -> bool {
    matches!(extension, ".png" | ".jpg" | ".jpeg" | ".tif" | ".tiff")
}

pub fn extract(descriptor: &FileDescriptor) -> Result<Fields> {
    let mut file = std::fs::File::open(&descriptor.path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    match descriptor.extension.as_str() {
        ".png" => extract_png(&bytes),
        ".jpg" | ".jpeg" => extract_jpeg(&bytes),
        ".tif" | ".tiff" => extract_tiff(&bytes),
        other => Err(Error::Malformed(format!("not an image extension: {other}"))),
    }
}

/// PNG dimensions are fixed fields of the IHDR chunk that immediately
/// follows the signature.
fn extract_png(bytes: &[u8]) -> Result<Fields> {
    if bytes.len() < 29 || bytes[..8] != PNG_SIGNATURE || &bytes[12..16] != b"IHDR" {
        return Err(Error::Malformed("missing PNG IHDR".into()));
    }
    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    let bit_depth = bytes[24];

    let mut fields = Fields::new();
    fields.insert("image_format".into(), json!("png"));
    fields.insert("width".into(), json!(width));
    fields.insert("height".into(), json!(height));
    fields.insert("bit_depth".into(), json!(bit_depth));
    Ok(fields)
}

/// Walk JPEG marker segments until a start-of-frame marker carries the
/// dimensions.
fn extract_jpeg(bytes: &[u8]) -> Result<Fields> {
    if bytes.len() < 4 || bytes[0] != 0xFF || bytes[1] != 0xD8 {
        return Err(Error::Malformed("missing JPEG SOI marker".into()));
    }
    let mut pos = 2usize;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return Err(Error::Malformed("desynchronized JPEG marker stream".into()));
        }
        let marker = bytes[pos + 1];
        // SOF0..SOF15 carry frame dimensions, except the arithmetic-coding
        // and huffman-table markers that share the range.
        let is_sof = (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        let segment_len = usize::from(u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]));
        if is_sof {
            if pos + 9 > bytes.len() {
                break;
            }
            let height = u16::from_be_bytes([bytes[pos + 5], bytes[pos + 6]]);
            let width = u16::from_be_bytes([bytes[pos + 7], bytes[pos + 8]]);
            let mut fields = Fields::new();
            fields.insert("image_format".into(), json!("jpeg"));
            fields.insert("width".into(), json!(width));
            fields.insert("height".into(), json!(height));
            return Ok(fields);
        }
        pos += 2 + segment_len;
    }
    Err(Error::Malformed("no JPEG frame header found".into()))
}

/// TIFF magic is the byte-order mark plus the number 42 in that order.
/// Dimensions live in IFD tags scattered through the file, so we stop at
/// the header.
fn extract_tiff(bytes: &[u8]) -> Result<Fields> {
    let byte_order = match bytes.get(..4) {
        Some([b'I', b'I', 0x2A, 0x00]) => "little_endian",
        Some([b'M', b'M', 0x00, 0x2A]) => "big_endian",
        _ => return Err(Error::Malformed("missing TIFF header".into())),
    };
    let mut fields = Fields::new();
    fields.insert("image_format".into(), json!("tiff"));
    fields.insert("byte_order".into(), json!(byte_order));
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&[8, 2, 0, 0, 0]);
        bytes
    }

    #[test]
    fn png_dimensions_from_ihdr() {
        let fields = extract_png(&png_bytes(640, 480)).unwrap();
        assert_eq!(fields["width"], json!(640));
        assert_eq!(fields["height"], json!(480));
        assert_eq!(fields["bit_depth"], json!(8));
    }

    #[test]
    fn jpeg_dimensions_from_sof() {
        // SOI, APP0 (minimal), SOF0 with 480x640, EOI
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00]);
        bytes.extend_from_slice(&[
            0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x01, 0xE0, 0x02, 0x80, 0x01, 0x01, 0x11, 0x00,
        ]);
        bytes.extend_from_slice(&[0xFF, 0xD9]);
        let fields = extract_jpeg(&bytes).unwrap();
        assert_eq!(fields["height"], json!(480));
        assert_eq!(fields["width"], json!(640));
    }

    #[test]
    fn tiff_byte_order_from_magic() {
        let fields = extract_tiff(b"II\x2A\x00rest").unwrap();
        assert_eq!(fields["byte_order"], json!("little_endian"));
        let fields = extract_tiff(b"MM\x00\x2Arest").unwrap();
        assert_eq!(fields["byte_order"], json!("big_endian"));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(extract_png(b"oops"), Err(Error::Malformed(_))));
        assert!(matches!(extract_jpeg(b"oops"), Err(Error::Malformed(_))));
        assert!(matches!(extract_tiff(b"oops"), Err(Error::Malformed(_))));
    }
}
