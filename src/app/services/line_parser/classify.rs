//! Header-variant sniffing and line-type token classification
//!
//! Current-format files went through two historical header revisions before
//! settling on the full 24-field shape. The first line of each file names its
//! columns, so the variant is detected once per file and every data line is
//! normalized to the same 24-field header. Legacy files have no header line
//! but may embed a threshold suffix directly in the line-type token.

use crate::app::models::HeaderVariant;

/// Sniff the header variant from the column-name line of a current-format file
///
/// Absence of a `DESC` column selects the 21-field variant, absence of
/// `FCST_UNITS` the 22-field variant, otherwise the full 24-field header.
pub fn detect_header_variant(header_line: &str) -> HeaderVariant {
    let upper = header_line.to_uppercase();
    let columns: Vec<&str> = upper.split_whitespace().collect();

    if !columns.contains(&"DESC") {
        HeaderVariant::Short
    } else if !columns.contains(&"FCST_UNITS") {
        HeaderVariant::Mid
    } else {
        HeaderVariant::Long
    }
}

/// Split an embedded threshold suffix off a legacy line-type token
///
/// A token beginning with `F` and longer than three characters carries a
/// threshold appended to its three-character base code (for example
/// `FHO>0.5`). Returns the base token and the captured suffix, if any.
pub fn split_line_type_token(token: &str) -> (String, Option<String>) {
    if token.starts_with('F') && token.len() > 3 {
        let base = token[..3].to_string();
        let threshold = token[3..].to_string();
        (base, Some(threshold))
    } else {
        (token.to_string(), None)
    }
}
