use aecscan_types::RevisionKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which grammar claimed the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grammar {
    Primary,
    Meeting,
    Transmittal,
    ShopDrawing,
    AsBuilt,
    Legacy,
}

impl Grammar {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grammar::Primary => "primary",
            Grammar::Meeting => "meeting",
            Grammar::Transmittal => "transmittal",
            Grammar::ShopDrawing => "shop_drawing",
            Grammar::AsBuilt => "as_built",
            Grammar::Legacy => "legacy",
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A special document identifier recovered by the legacy path
/// (submittal / RFI / change-order / sketch numbers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialIdentifier {
    pub kind: String,
    pub value: String,
}

/// Everything the parser could recover from one filename.
///
/// Field values are stored in their canonical uppercase form; `*_name`
/// fields are resolved from the fixed vocabularies and absent for codes
/// outside them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamingResult {
    pub is_standard: bool,
    pub grammar: Option<Grammar>,
    pub project_number: Option<String>,
    pub phase_code: Option<String>,
    pub phase_name: Option<String>,
    pub discipline_code: Option<String>,
    pub discipline_name: Option<String>,
    pub document_type: Option<String>,
    pub document_type_name: Option<String>,
    pub sheet_number: Option<String>,
    pub revision: Option<String>,
    pub revision_kind: Option<RevisionKind>,
    pub issue_code: Option<String>,
    /// MMDDYY as it appeared in the filename.
    pub date_issued: Option<String>,
    pub csi_division: Option<String>,
    pub csi_section: Option<String>,
    pub special_identifiers: Vec<SpecialIdentifier>,
    pub keywords: Vec<String>,
}

impl NamingResult {
    /// Number of distinct fields recovered. The legacy path deems a file
    /// standard only when this reaches two.
    pub fn field_count(&self) -> usize {
        let singles = [
            self.project_number.is_some(),
            self.phase_code.is_some(),
            self.discipline_code.is_some(),
            self.document_type.is_some(),
            self.sheet_number.is_some(),
            self.revision.is_some() || self.issue_code.is_some(),
            self.date_issued.is_some(),
            self.csi_division.is_some(),
            self.csi_section.is_some(),
        ];
        singles.iter().filter(|b| **b).count() + usize::from(!self.special_identifiers.is_empty())
    }
}
