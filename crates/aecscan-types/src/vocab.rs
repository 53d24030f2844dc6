//! Fixed AEC vocabularies.
//!
//! These tables are project-naming-convention constants, not inferred data.
//! Codes are matched case-insensitively; lookups take the uppercased form.

/// Discipline code -> full discipline name.
pub const DISCIPLINES: &[(&str, &str)] = &[
    ("A", "Architectural"),
    ("S", "Structural"),
    ("G", "Geotechnical"),
    ("C", "Civil"),
    ("M", "Mechanical"),
    ("E", "Electrical"),
    ("P", "Plumbing"),
    ("H", "Hydraulic"),
    ("F", "Fire Protection"),
    ("L", "Landscape"),
    ("I", "Interiors"),
    ("T", "Transportation"),
    ("EN", "Environmental"),
    ("SU", "Survey"),
    ("PM", "Project Management"),
    ("GE", "General/Multi-Discipline"),
];

/// Project lifecycle phase code -> full phase name.
pub const PHASES: &[(&str, &str)] = &[
    ("PD", "Pre-Design/Programming"),
    ("SD", "Schematic Design"),
    ("DD", "Design Development"),
    ("CD", "Construction Documents"),
    ("CA", "Construction Administration"),
    ("CO", "Closeout"),
];

/// Document type code -> full document type name.
pub const DOCUMENT_TYPES: &[(&str, &str)] = &[
    // Drawings
    ("DWG", "Drawing"),
    ("PLN", "Plan"),
    ("SEC", "Section"),
    ("DTL", "Detail"),
    ("SCH", "Schedule"),
    // Calculations
    ("CALC", "Calculation"),
    ("LOAD", "Load Calculation"),
    ("SIZE", "Sizing Calculation"),
    ("PAR", "Parameter Calculation"),
    // Reports
    ("RPT", "Report"),
    ("MEMO", "Memorandum"),
    ("STUDY", "Study"),
    ("EVAL", "Evaluation"),
    // Specifications
    ("SPEC", "Specification"),
    ("DIV", "Division"),
    // Correspondence
    ("RFI", "Request for Information"),
    ("SUB", "Submittal"),
    ("CO", "Change Order"),
    ("TXM", "Transmittal"),
    ("LTR", "Letter"),
    // Models
    ("BIM", "Building Information Model"),
    ("3D", "3D Model"),
    ("CAD", "CAD File"),
    // Photos
    ("PHO", "Photograph"),
    ("IMG", "Image"),
    // Permits
    ("PER", "Permit"),
    ("APP", "Application"),
    // Special formats
    ("MTG", "Meeting"),
    ("SHOP", "Shop Drawing"),
    ("AB", "As-Built"),
];

/// Issue codes accepted in the primary grammar's revision slot.
pub const ISSUE_CODES: &[&str] = &[
    "IFC", "IFB", "IFP", "AB", "RFI", "PCO", "FOR", "CONST", "RECORD",
];

fn lookup(table: &[(&str, &'static str)], code: &str) -> Option<&'static str> {
    let code = code.to_ascii_uppercase();
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

pub fn discipline_name(code: &str) -> Option<&'static str> {
    lookup(DISCIPLINES, code)
}

pub fn phase_name(code: &str) -> Option<&'static str> {
    lookup(PHASES, code)
}

pub fn document_type_name(code: &str) -> Option<&'static str> {
    lookup(DOCUMENT_TYPES, code)
}

pub fn is_issue_code(token: &str) -> bool {
    let token = token.to_ascii_uppercase();
    ISSUE_CODES.iter().any(|c| *c == token)
}
