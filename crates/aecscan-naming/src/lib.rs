// Stateless filename classifier for AEC naming conventions.
//
// Grammar matching is strictly ordered: the primary six-field grammar wins
// over the special-case grammars, which win over the legacy fallback. The
// first grammar that matches stops the search. Matching is case-insensitive
// throughout; a filename that satisfies no grammar is not an error, it just
// carries `is_standard = false`.

mod parser;
mod patterns;
mod result;

pub use result::{Grammar, NamingResult, SpecialIdentifier};

/// Parse a bare filename (no directory components) against the naming
/// convention grammars.
pub fn parse(filename: &str) -> NamingResult {
    parser::parse(filename)
}
