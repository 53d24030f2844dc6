use crate::patterns;
use crate::result::{Grammar, NamingResult, SpecialIdentifier};
use aecscan_types::{RevisionKind, vocab};

pub fn parse(filename: &str) -> NamingResult {
    if let Some(result) = match_primary(filename) {
        return result;
    }
    if let Some(result) = match_meeting(filename) {
        return result;
    }
    if let Some(result) = match_transmittal(filename) {
        return result;
    }
    if let Some(result) = match_shop_drawing(filename) {
        return result;
    }
    if let Some(result) = match_as_built(filename) {
        return result;
    }
    match_legacy(filename)
}

/// Canonical revision-token classification, shared by every path that
/// encounters a revision slot: check prints (C-prefixed) take precedence
/// over clean revisions (R-prefixed), which take precedence over issue
/// codes. Letter tokens outside the issue vocabulary classify as nothing.
fn classify_revision(token: &str, out: &mut NamingResult) -> bool {
    let upper = token.to_ascii_uppercase();
    if patterns::CHECK_PRINT.is_match(&upper) {
        out.revision = Some(upper);
        out.revision_kind = Some(RevisionKind::CheckPrint);
        true
    } else if patterns::CLEAN_REVISION.is_match(&upper) {
        out.revision = Some(upper);
        out.revision_kind = Some(RevisionKind::Clean);
        true
    } else if vocab::is_issue_code(&upper) {
        out.issue_code = Some(upper);
        out.revision_kind = Some(RevisionKind::IssueCode);
        true
    } else {
        false
    }
}

fn resolve_names(out: &mut NamingResult) {
    if let Some(code) = &out.phase_code {
        out.phase_name = vocab::phase_name(code).map(str::to_owned);
    }
    if let Some(code) = &out.discipline_code {
        out.discipline_name = vocab::discipline_name(code).map(str::to_owned);
    }
    if let Some(code) = &out.document_type {
        out.document_type_name = vocab::document_type_name(code).map(str::to_owned);
    }
}

fn match_primary(filename: &str) -> Option<NamingResult> {
    let caps = patterns::PRIMARY.captures(filename)?;
    let mut out = NamingResult {
        is_standard: true,
        grammar: Some(Grammar::Primary),
        phase_code: Some(caps[1].to_ascii_uppercase()),
        discipline_code: Some(caps[2].to_ascii_uppercase()),
        document_type: Some(caps[3].to_ascii_uppercase()),
        sheet_number: Some(caps[4].to_ascii_uppercase()),
        date_issued: Some(caps[6].to_owned()),
        ..NamingResult::default()
    };
    // A letters-only token outside the issue vocabulary disqualifies the
    // whole primary match rather than being stored as a bogus revision.
    if !classify_revision(&caps[5], &mut out) {
        return None;
    }
    resolve_names(&mut out);
    Some(out)
}

fn match_meeting(filename: &str) -> Option<NamingResult> {
    let caps = patterns::MEETING.captures(filename)?;
    let mut out = NamingResult {
        is_standard: true,
        grammar: Some(Grammar::Meeting),
        document_type: Some("MTG".to_owned()),
        date_issued: Some(caps[1].to_owned()),
        keywords: vec![caps[2].to_ascii_lowercase()],
        ..NamingResult::default()
    };
    resolve_names(&mut out);
    Some(out)
}

fn match_transmittal(filename: &str) -> Option<NamingResult> {
    let caps = patterns::TRANSMITTAL.captures(filename)?;
    let mut out = NamingResult {
        is_standard: true,
        grammar: Some(Grammar::Transmittal),
        document_type: Some("TXM".to_owned()),
        sheet_number: Some(caps[2].to_owned()),
        date_issued: Some(caps[3].to_owned()),
        special_identifiers: vec![SpecialIdentifier {
            kind: "recipient".to_owned(),
            value: caps[1].to_ascii_uppercase(),
        }],
        ..NamingResult::default()
    };
    resolve_names(&mut out);
    Some(out)
}

fn match_shop_drawing(filename: &str) -> Option<NamingResult> {
    let caps = patterns::SHOP_DRAWING.captures(filename)?;
    let mut out = NamingResult {
        is_standard: true,
        grammar: Some(Grammar::ShopDrawing),
        document_type: Some("SHOP".to_owned()),
        discipline_code: Some(caps[1].to_ascii_uppercase()),
        date_issued: Some(caps[5].to_owned()),
        keywords: vec![caps[2].to_ascii_lowercase(), caps[3].to_ascii_lowercase()],
        ..NamingResult::default()
    };
    classify_revision(&caps[4], &mut out);
    resolve_names(&mut out);
    Some(out)
}

fn match_as_built(filename: &str) -> Option<NamingResult> {
    let caps = patterns::AS_BUILT.captures(filename)?;
    let mut out = NamingResult {
        is_standard: true,
        grammar: Some(Grammar::AsBuilt),
        document_type: Some("AB".to_owned()),
        discipline_code: Some(caps[1].to_ascii_uppercase()),
        sheet_number: Some(caps[2].to_ascii_uppercase()),
        date_issued: Some(caps[3].to_owned()),
        issue_code: Some("AB".to_owned()),
        revision_kind: Some(RevisionKind::IssueCode),
        ..NamingResult::default()
    };
    resolve_names(&mut out);
    Some(out)
}

/// Accept only plausible MMDDYY strings so six-digit CSI section numbers
/// are not mistaken for dates.
fn is_mmddyy(token: &str) -> bool {
    if !patterns::DATE_MMDDYY.is_match(token) {
        return false;
    }
    let month: u32 = token[0..2].parse().unwrap_or(0);
    let day: u32 = token[2..4].parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

fn phase_code(token: &str) -> Option<String> {
    vocab::PHASES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(token))
        .map(|(c, _)| (*c).to_owned())
}

fn discipline_code(token: &str) -> Option<String> {
    vocab::DISCIPLINES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(token))
        .map(|(c, _)| (*c).to_owned())
}

fn document_type_code(token: &str) -> Option<String> {
    vocab::DOCUMENT_TYPES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(token))
        .map(|(c, _)| (*c).to_owned())
}

/// Best-effort fallback: tokenize the stem on underscores and classify
/// each token against the field shapes, taking the first unclaimed match
/// per field. Two or more recovered fields make the name standard.
fn match_legacy(filename: &str) -> NamingResult {
    let stem = filename.rsplit_once('.').map_or(filename, |(s, _)| s);
    let mut out = NamingResult::default();

    for token in stem.split('_').filter(|t| !t.is_empty()) {
        let upper = token.to_ascii_uppercase();
        if out.phase_code.is_none() {
            if let Some(code) = phase_code(&upper) {
                out.phase_code = Some(code);
                continue;
            }
        }
        if out.discipline_code.is_none() {
            if let Some(code) = discipline_code(&upper) {
                out.discipline_code = Some(code);
                continue;
            }
        }
        if out.document_type.is_none() {
            if let Some(code) = document_type_code(&upper) {
                out.document_type = Some(code);
                continue;
            }
        }
        if out.revision_kind.is_none() && classify_revision(&upper, &mut out) {
            continue;
        }
        if out.project_number.is_none() && patterns::LEGACY_PROJECT.is_match(&upper) {
            out.project_number = Some(upper);
            continue;
        }
        if out.date_issued.is_none() && is_mmddyy(&upper) {
            out.date_issued = Some(upper);
            continue;
        }
        if out.csi_section.is_none() && patterns::DATE_MMDDYY.is_match(&upper) {
            out.csi_section = Some(upper);
            continue;
        }
        if out.csi_division.is_none() && patterns::CSI_DIVISION.is_match(&upper) {
            out.csi_division = Some(upper);
            continue;
        }
        if out.sheet_number.is_none() && patterns::LEGACY_SHEET.is_match(&upper) {
            out.sheet_number = Some(upper);
        }
    }

    for caps in patterns::SPECIAL_IDS.captures_iter(stem) {
        out.special_identifiers.push(SpecialIdentifier {
            kind: caps[1].to_ascii_uppercase(),
            value: caps[2].to_owned(),
        });
    }

    let lower = stem.to_ascii_lowercase();
    for keyword in patterns::KEYWORDS {
        if lower.contains(keyword) {
            out.keywords.push((*keyword).to_owned());
        }
    }

    if out.field_count() >= 2 {
        out.is_standard = true;
        out.grammar = Some(Grammar::Legacy);
        resolve_names(&mut out);
    }
    out
}
