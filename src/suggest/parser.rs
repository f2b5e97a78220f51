//! Section parsing for AI responses
//!
//! Extracts the three rewritten situation paragraphs from free-form model
//! output in the format:
//! ```text
//! Current Financial Situation:
//! ...
//!
//! Employment Circumstances:
//! ...
//!
//! Reason for Applying:
//! ...
//! ```
//! Each heading is located independently (ASCII case-insensitive), so the
//! sections may come back in any order. A heading only counts when it opens
//! a line, optionally after whitespace or markdown `*`/`#` markers; the same
//! phrase inside a sentence is ordinary text.

use super::prompt::{EMPLOYMENT_HEADING, FINANCIAL_HEADING, REASON_HEADING};
use crate::application::{SituationInfo, SuggestionResult};

const HEADINGS: [&str; 3] = [FINANCIAL_HEADING, EMPLOYMENT_HEADING, REASON_HEADING];

/// Parse the three sections out of `raw`, falling back to `original`
///
/// Never fails. A section whose heading is missing, or whose captured text is
/// blank, keeps the corresponding `original` value.
pub fn parse_sections(raw: &str, original: &SituationInfo) -> SuggestionResult {
    SuggestionResult {
        current_financial: extract_section(raw, FINANCIAL_HEADING)
            .unwrap_or_else(|| original.current_financial.clone()),
        employment_circumstances: extract_section(raw, EMPLOYMENT_HEADING)
            .unwrap_or_else(|| original.employment_circumstances.clone()),
        reason: extract_section(raw, REASON_HEADING).unwrap_or_else(|| original.reason.clone()),
    }
}

/// Text between `heading` and the next known heading (or end of text)
///
/// Returns `None` when the heading is absent or the section is blank.
pub fn extract_section(raw: &str, heading: &str) -> Option<String> {
    let start = find_heading(raw, heading, 0)?.heading_end;

    let end = HEADINGS
        .iter()
        .filter_map(|h| find_heading(raw, h, start))
        .map(|found| found.line_start)
        .min()
        .unwrap_or(raw.len());

    // Models often bold headings ("**Reason for Applying:**")
    let section = raw[start..end].trim_matches(|c: char| c.is_whitespace() || c == '*');

    if section.is_empty() {
        None
    } else {
        Some(section.to_string())
    }
}

/// A heading occurrence that opens a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeadingMatch {
    /// Start of the line holding the heading, markdown markers included
    line_start: usize,
    /// First byte after the heading text
    heading_end: usize,
}

/// First occurrence of `heading` at or after `from` that opens a line
fn find_heading(raw: &str, heading: &str, from: usize) -> Option<HeadingMatch> {
    let mut search_from = from;
    while let Some(at) = find_ignore_ascii_case(raw, heading, search_from) {
        let line_start = raw[..at].rfind('\n').map_or(0, |nl| nl + 1);
        let opens_line = raw[line_start..at]
            .chars()
            .all(|c| c.is_whitespace() || c == '*' || c == '#');

        if opens_line {
            return Some(HeadingMatch {
                line_start: line_start.max(from),
                heading_end: at + heading.len(),
            });
        }
        search_from = at + 1;
    }
    None
}

/// Byte offset of the first ASCII case-insensitive match of `needle` at or after `from`
///
/// `needle` must be ASCII, which keeps every returned offset on a char boundary.
fn find_ignore_ascii_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || from > hay.len() || hay.len() - from < needle.len() {
        return None;
    }

    (from..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod parser_tests;
