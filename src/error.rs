use thiserror::Error;

/// Fatal errors that abort startup or input handling
///
/// Per-request failures live in `suggest::SuggestError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(
        "Suggestions not configured: {message}\n\nSet OPENAI_API_KEY or add 'api_key' to the [assist] section of ~/.config/intake-assist/config.toml"
    )]
    NotConfigured { message: String },

    #[error("Invalid application data: {0}")]
    InvalidApplication(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
