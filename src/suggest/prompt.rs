//! Prompt template generation
//!
//! Builds the single user message sent to the completion endpoint. The three
//! section headings are shared with the parser, which finds each rewritten
//! paragraph by its literal heading.

use crate::application::{ApplicationData, FamilyInfo, PersonalInfo, SituationInfo};

pub const FINANCIAL_HEADING: &str = "Current Financial Situation:";
pub const EMPLOYMENT_HEADING: &str = "Employment Circumstances:";
pub const REASON_HEADING: &str = "Reason for Applying:";

/// Rendered in place of any empty string field
pub const EMPTY_PLACEHOLDER: &str = "[none provided]";

/// Build the suggestion prompt for an application
///
/// Pure and infallible: every field is interpolated as-is, empty strings
/// become [`EMPTY_PLACEHOLDER`].
pub fn build_prompt(data: &ApplicationData) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are an expert social support advisor. ");
    prompt.push_str("Below is everything the applicant has provided so far. ");
    prompt.push_str(
        "Improve and rewrite only the three situation sections, each under its original heading exactly, ",
    );
    prompt.push_str("taking their personal and family context into account.\n\n");

    push_personal(&mut prompt, &data.personal);
    push_family(&mut prompt, &data.family);
    push_situation(&mut prompt, &data.situation);

    prompt.push_str("Rewrite and improve each of these three sections. ");
    prompt.push_str("Return your answer in the following exact format (no extra text):\n\n");
    for heading in [FINANCIAL_HEADING, EMPLOYMENT_HEADING, REASON_HEADING] {
        prompt.push_str(heading);
        prompt.push_str("\n[rewritten paragraph here]\n\n");
    }

    prompt.truncate(prompt.trim_end().len());
    prompt
}

fn push_personal(prompt: &mut String, personal: &PersonalInfo) {
    prompt.push_str("Personal Information:\n");
    push_field(prompt, "Name", &personal.name);
    push_field(prompt, "National ID", &personal.national_id);
    push_field(prompt, "Date of Birth", &personal.dob);
    push_field(prompt, "Gender", &personal.gender);

    let address: Vec<&str> = [
        &personal.address,
        &personal.city,
        &personal.state,
        &personal.country,
    ]
    .into_iter()
    .map(|part| part.trim())
    .filter(|part| !part.is_empty())
    .collect();
    push_field(prompt, "Address", &address.join(", "));

    push_field(prompt, "Phone", &personal.phone);
    push_field(prompt, "Email", &personal.email);
    prompt.push('\n');
}

fn push_family(prompt: &mut String, family: &FamilyInfo) {
    prompt.push_str("Family & Financial Info:\n");
    push_field(prompt, "Marital Status", &family.marital_status);
    push_field(prompt, "Dependents", &family.dependents.to_string());
    push_field(prompt, "Employment Status", &family.employment_status);
    push_field(prompt, "Monthly Income", &family.monthly_income.to_string());
    push_field(prompt, "Housing Status", &family.housing_status);
    prompt.push('\n');
}

fn push_situation(prompt: &mut String, situation: &SituationInfo) {
    prompt.push_str("Situation Descriptions (current):\n");
    prompt.push_str(&format!(
        "  {} {}\n",
        FINANCIAL_HEADING,
        or_placeholder(&situation.current_financial)
    ));
    prompt.push_str(&format!(
        "  {} {}\n",
        EMPLOYMENT_HEADING,
        or_placeholder(&situation.employment_circumstances)
    ));
    prompt.push_str(&format!(
        "  {} {}\n\n",
        REASON_HEADING,
        or_placeholder(&situation.reason)
    ));
}

fn push_field(prompt: &mut String, label: &str, value: &str) {
    prompt.push_str(&format!("  {}: {}\n", label, or_placeholder(value)));
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        EMPTY_PLACEHOLDER
    } else {
        value
    }
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod prompt_tests;
