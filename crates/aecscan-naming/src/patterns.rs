use once_cell::sync::Lazy;
use regex::Regex;

// Primary six-field grammar:
//   PHASE_DISC_TYPE_SHEET_REV_MMDDYY.ext
// Searched, not anchored, so a prefixed variant (e.g. a leading project
// number) still matches as long as the six fields appear verbatim. The
// revision slot accepts C/R revisions or a bare letters-only token; the
// parser rejects letter tokens outside the issue-code vocabulary.
pub static PRIMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)([A-Z]{2})_([A-Z]{1,2})_([A-Z0-9]{2,6})_([A-Z0-9]{1,8})_([CR]\d{1,2}|[A-Z]{2,6})_(\d{6})\.([A-Z0-9]{2,4})",
    )
    .unwrap()
});

// Special-case grammars. These carry their own leading literal token so
// they cannot collide with the primary form.
pub static MEETING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)MTG_(\d{6})_([A-Z]+)\.([A-Z]{3,4})").unwrap()
});

pub static TRANSMITTAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)TXM_([A-Z]{2,4})_(\d{3})_(\d{6})\.([A-Z]{3})").unwrap()
});

pub static SHOP_DRAWING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)SHOP_([A-Z]{1,2})_([A-Z]+)_([A-Z]+)_([CR]\d{1,2})_(\d{6})\.([A-Z]{3})").unwrap()
});

pub static AS_BUILT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)AB_([A-Z]{1,2})_([A-Z0-9]{1,4})_(\d{6})\.([A-Z]{3})").unwrap()
});

// Legacy token shapes. The legacy path tokenizes the stem on underscores
// and classifies each token against these whole-token patterns, so a 'P'
// inside PROJ123 can never be mistaken for the plumbing discipline.
pub static LEGACY_PROJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-Z]{3,5}\d{1,6}$").unwrap());

pub static LEGACY_SHEET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-Z]{0,2}\d{1,4}$").unwrap());

pub static CHECK_PRINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^C\d{1,2}$").unwrap());
pub static CLEAN_REVISION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^R\d{1,2}$").unwrap());

pub static DATE_MMDDYY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").unwrap());

pub static CSI_DIVISION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(0\d|1[0-6]|[2-4]\d)$").unwrap());

// Special document identifiers may appear anywhere in the stem.
pub static SPECIAL_IDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(SUB|RFI|CO|SK)-(\d{3})\b").unwrap());

/// Free-text keywords the legacy path records when present in the stem.
pub const KEYWORDS: &[&str] = &[
    "final", "draft", "preliminary", "revised", "superseded", "void", "record", "asbuilt",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_matches_canonical_form() {
        let caps = PRIMARY.captures("CD_A_DWG_001_R3_031524.pdf").unwrap();
        assert_eq!(&caps[1], "CD");
        assert_eq!(&caps[5], "R3");
        assert_eq!(&caps[6], "031524");
    }

    #[test]
    fn primary_rejects_non_numeric_dates() {
        assert!(
            !PRIMARY.is_match("PROJ123_CD_S_DWG_S201_IFC_2024-05-01.pdf"),
            "ISO dates must not satisfy the MMDDYY slot"
        );
    }

    #[test]
    fn legacy_token_shapes() {
        assert!(LEGACY_PROJECT.is_match("PROJ123"));
        assert!(!LEGACY_PROJECT.is_match("S201"));
        assert!(LEGACY_SHEET.is_match("S201"));
        assert!(LEGACY_SHEET.is_match("001"));
        assert!(!LEGACY_SHEET.is_match("PROJ123"));
    }
}
