//! intake-assist library - AI-assisted drafting for support applications
//!
//! Exposes the suggestion orchestrator and its building blocks so front ends
//! and tests can drive them directly.

pub mod application;
pub mod config;
pub mod error;
pub mod suggest;

// Re-export commonly used types for convenience
pub use application::{ApplicationData, SituationInfo, SuggestionResult};
pub use config::Config;
pub use error::AppError;
pub use suggest::{SuggestError, SuggestionOrchestrator};
