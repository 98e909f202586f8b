pub mod gemini;

pub use gemini::GeminiTranslator;

use crate::error::Result;
use async_trait::async_trait;

/// Target language for all translations.
pub const TARGET_LANGUAGE: &str = "Traditional Chinese";

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a single text segment to Traditional Chinese.
    async fn translate(&self, text: &str) -> Result<String>;

    /// Cheap ping to verify the API key and endpoint before a run.
    async fn check_connection(&self) -> Result<()>;

    fn name(&self) -> &'static str;
}
