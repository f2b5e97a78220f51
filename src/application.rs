//! Application data model
//!
//! The three records collected by the intake form. Only `SituationInfo` is
//! subject to AI suggestions; the personal and family records are context
//! for the prompt and part of the cache key.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Minimum length the form accepts for each situation field
pub const MIN_SITUATION_LEN: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub national_id: String,
    pub dob: String,
    pub gender: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FamilyInfo {
    pub marital_status: String,
    pub dependents: u32,
    pub employment_status: String,
    pub monthly_income: f64,
    pub housing_status: String,
}

/// The three free-text fields that suggestions rewrite
///
/// Also the shape of a parsed suggestion (`SuggestionResult`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SituationInfo {
    pub current_financial: String,
    pub employment_circumstances: String,
    pub reason: String,
}

/// Parsed AI suggestion, one rewritten paragraph per situation field
pub type SuggestionResult = SituationInfo;

/// A situation field that failed the form's length check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl SituationInfo {
    pub fn new(
        current_financial: impl Into<String>,
        employment_circumstances: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            current_financial: current_financial.into(),
            employment_circumstances: employment_circumstances.into(),
            reason: reason.into(),
        }
    }

    /// Check every field against the form's minimum length
    ///
    /// Length is counted in characters, not bytes.
    pub fn validate(&self) -> Vec<FieldIssue> {
        [
            ("currentFinancial", &self.current_financial),
            ("employmentCircumstances", &self.employment_circumstances),
            ("reason", &self.reason),
        ]
        .into_iter()
        .filter(|(_, value)| value.chars().count() < MIN_SITUATION_LEN)
        .map(|(field, _)| FieldIssue {
            field,
            message: format!("Please describe at least {} characters.", MIN_SITUATION_LEN),
        })
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationData {
    pub personal: PersonalInfo,
    pub family: FamilyInfo,
    pub situation: SituationInfo,
}

impl ApplicationData {
    /// Parse application data from its JSON form
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json).map_err(|e| AppError::InvalidApplication(e.to_string()))
    }

    /// Deterministic serialization used to memoize suggestions
    ///
    /// Struct fields serialize in declaration order, so two values with
    /// identical fields always produce the same key, and any difference
    /// (whitespace included) produces a different one.
    pub fn cache_key(&self) -> String {
        // Plain structs of strings and numbers cannot fail to serialize
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }

    /// Copy of this application with the situation replaced
    pub fn with_situation(&self, situation: SituationInfo) -> Self {
        Self {
            situation,
            ..self.clone()
        }
    }
}
