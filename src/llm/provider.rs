use crate::review::report::ReviewReport;
use crate::utils::error::CritiqError;
use async_trait::async_trait;

/// A model backend that reviews one batch prompt at a time.
///
/// The pipeline treats submission as an external collaborator: it hands
/// over a fully assembled prompt and receives structured findings back
/// (or nothing, when the model raised no concerns).
#[async_trait]
pub trait ReviewProvider: Send + Sync {
    /// Submit one batch prompt and return the model's findings, if any.
    async fn review(&self, prompt: &str) -> Result<Option<ReviewReport>, CritiqError>;

    fn model(&self) -> &str;
}
