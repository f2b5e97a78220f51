//! Suggestion assistant for intake-assist
//!
//! Requests AI rewrites of the three free-text situation fields and reconciles
//! them with what the applicant already typed. A request flows through the
//! throttle gate, the per-input cache, the prompt builder, the retrying
//! executor and finally the section parser.

pub mod cache;
pub mod executor;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod provider;
pub mod review;
pub mod throttle;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::SuggestionCache;
pub use executor::{RequestExecutor, RetryPolicy};
pub use orchestrator::{Generated, SuggestEvent, SuggestState, SuggestionOrchestrator};
pub use parser::parse_sections;
pub use prompt::build_prompt;
pub use provider::{CompletionTransport, SuggestError};
pub use review::{accept_review, render_review_text};
pub use throttle::Throttler;
