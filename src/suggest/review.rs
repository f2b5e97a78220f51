//! Review flow for accepted suggestions
//!
//! A suggestion is shown as one editable block of text. Accepting re-parses
//! whatever the applicant left in that block, keeping their current drafts
//! for any section they removed.

use super::parser::parse_sections;
use super::prompt::{EMPLOYMENT_HEADING, FINANCIAL_HEADING, REASON_HEADING};
use crate::application::{SituationInfo, SuggestionResult};

/// Render a suggestion as the review text shown before accepting
pub fn render_review_text(result: &SuggestionResult) -> String {
    [
        (FINANCIAL_HEADING, &result.current_financial),
        (EMPLOYMENT_HEADING, &result.employment_circumstances),
        (REASON_HEADING, &result.reason),
    ]
    .iter()
    .map(|(heading, text)| format!("{}\n{}", heading, text))
    .collect::<Vec<_>>()
    .join("\n\n")
}

/// Reconcile (possibly edited) review text with the current drafts
pub fn accept_review(text: &str, current: &SituationInfo) -> SituationInfo {
    parse_sections(text, current)
}
