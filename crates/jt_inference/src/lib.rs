pub mod models;

pub use models::template::fallback_line;
pub use models::{create_model, Extraction, ScriptModel};

/// Everything a model backend might need. Each backend picks the fields it
/// cares about and ignores the rest.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub ollama_host: Option<String>,
    pub ollama_model: Option<String>,
}

pub mod prelude {
    pub use super::models::{create_model, Extraction, ScriptModel};
    pub use super::Config;
    pub use jt_core::{Article, Error, Result};
}
