// Copyright (c) 2025-2026 the critiq contributors
// SPDX-License-Identifier: Apache-2.0

//! Provider-specific tokenizers for counting tokens in text.
//!
//! This module provides a trait-based abstraction for token counting, so
//! the batch planner can be driven by any estimator (including
//! deterministic stubs in tests) without knowing tokenizer internals.
//!
//! # Example
//!
//! ```
//! use critiq::llm::tokenizer::{Tokenizer, TiktokenTokenizer, TokenizerModel};
//!
//! let tokenizer = TiktokenTokenizer::new(TokenizerModel::Gpt4o).unwrap();
//! let count = tokenizer.count_tokens("Hello, world!");
//! ```

use crate::utils::error::CritiqError;
use tiktoken_rs::{cl100k_base, o200k_base};

/// Trait for counting tokens in text.
///
/// Different LLM providers use different tokenization schemes. This trait
/// provides a unified interface for token counting across providers.
/// Implementations must be deterministic for identical input.
pub trait Tokenizer: Send + Sync {
    /// Count the number of tokens in the given text.
    fn count_tokens(&self, text: &str) -> usize;
}

/// Model types that determine which encoding to use for tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerModel {
    /// GPT-4, GPT-3.5-turbo (uses cl100k_base)
    Gpt4,
    /// GPT-4o, GPT-4o-mini (uses o200k_base)
    Gpt4o,
    /// Claude models (uses cl100k_base as approximation)
    Claude,
}

impl TokenizerModel {
    /// Map a model name string to the appropriate encoding family.
    pub fn from_model_name(model: &str) -> Self {
        let model_lower = model.to_lowercase();

        // GPT-4o variants use o200k_base
        if model_lower.contains("gpt-4o") || model_lower.contains("o1") {
            return Self::Gpt4o;
        }

        // Claude models use cl100k_base as approximation
        if model_lower.contains("claude") {
            return Self::Claude;
        }

        if model_lower.contains("gpt-4") || model_lower.contains("gpt-3.5") {
            return Self::Gpt4;
        }

        // Default to Gpt4 (cl100k_base) for unknown models
        Self::Gpt4
    }
}

/// Tokenizer using tiktoken encodings.
///
/// Uses the appropriate encoding based on the model:
/// - cl100k_base: GPT-4, GPT-3.5-turbo, Claude (approximation)
/// - o200k_base: GPT-4o, GPT-4o-mini
pub struct TiktokenTokenizer {
    encoding: tiktoken_rs::CoreBPE,
}

impl TiktokenTokenizer {
    /// Create a new tiktoken tokenizer for the specified model type.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoding cannot be loaded.
    pub fn new(model: TokenizerModel) -> Result<Self, CritiqError> {
        let encoding = match model {
            TokenizerModel::Gpt4 | TokenizerModel::Claude => {
                cl100k_base().map_err(|e| CritiqError::Config(e.to_string()))?
            }
            TokenizerModel::Gpt4o => {
                o200k_base().map_err(|e| CritiqError::Config(e.to_string()))?
            }
        };

        Ok(Self { encoding })
    }

    /// Create a tiktoken tokenizer from a model name string.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoding cannot be loaded.
    pub fn from_model_name(model_name: &str) -> Result<Self, CritiqError> {
        let model = TokenizerModel::from_model_name(model_name);
        Self::new(model)
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.encoding.encode_with_special_tokens(text).len()
    }
}
