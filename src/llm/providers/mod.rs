// Copyright (c) 2025-2026 the critiq contributors
// SPDX-License-Identifier: Apache-2.0

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "openai")]
pub mod openai;

use crate::llm::provider::ReviewProvider;
use crate::utils::error::CritiqError;

/// Construct a provider by name, reading its API key from the environment.
pub fn create_provider(
    name: &str,
    model: Option<&str>,
) -> Result<Box<dyn ReviewProvider>, CritiqError> {
    match name {
        #[cfg(feature = "anthropic")]
        "anthropic" => Ok(Box::new(anthropic::AnthropicProvider::from_env(model)?)),
        #[cfg(feature = "openai")]
        "openai" => Ok(Box::new(openai::OpenAiProvider::from_env(model)?)),
        _ => Err(CritiqError::invalid_provider(name)),
    }
}

/// Default model for a provider, resolvable before any API key is read.
pub fn default_model(name: &str) -> Result<&'static str, CritiqError> {
    match name {
        #[cfg(feature = "anthropic")]
        "anthropic" => Ok(anthropic::DEFAULT_MODEL),
        #[cfg(feature = "openai")]
        "openai" => Ok(openai::DEFAULT_MODEL),
        _ => Err(CritiqError::invalid_provider(name)),
    }
}

/// Context window for a provider's model, the source of the prompt budget.
pub fn context_window(name: &str, model: &str) -> Result<usize, CritiqError> {
    match name {
        #[cfg(feature = "anthropic")]
        "anthropic" => {
            let _ = model;
            Ok(anthropic::CONTEXT_WINDOW)
        }
        #[cfg(feature = "openai")]
        "openai" => Ok(openai::context_window_for(model)),
        _ => Err(CritiqError::invalid_provider(name)),
    }
}
