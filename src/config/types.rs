// Configuration type definitions

use serde::Deserialize;

use super::assist_types::AssistConfig;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub assist: AssistConfig,
}
