//! Supported model catalog for ChatRelay
//!
//! This module defines the closed set of backend language models a user can
//! select. Model identifiers travel over the wire as plain strings, so the
//! enum round-trips through its canonical string form via `FromStr`,
//! `Display`, and serde.

use crate::error::ChatRelayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a selectable backend language model
///
/// The set is closed: parsing any string outside it fails with
/// [`ChatRelayError::InvalidModel`]. One variant per vendor/tier mirrors the
/// catalog exposed by the completion gateway.
///
/// # Examples
///
/// ```
/// use chatrelay::models::ModelId;
///
/// let model: ModelId = "gpt-4o".parse().unwrap();
/// assert_eq!(model, ModelId::Gpt4o);
/// assert_eq!(model.as_str(), "gpt-4o");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelId {
    /// Anthropic Claude 3.5 Sonnet
    #[serde(rename = "claude-3-5-sonnet-20240620")]
    Claude35Sonnet,
    /// Anthropic Claude 3 Opus
    #[serde(rename = "claude-3-opus-20240229")]
    Claude3Opus,
    /// OpenAI GPT-4o
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    /// OpenAI o1 preview
    #[serde(rename = "o1-preview")]
    O1Preview,
    /// Google Gemini 1.5 Flash (experimental)
    #[serde(rename = "gemini-1.5-flash-exp-0827")]
    Gemini15Flash,
    /// Google Gemini 1.5 Pro (experimental)
    #[serde(rename = "gemini-1.5-pro-exp-0827")]
    Gemini15Pro,
    /// xAI Grok 2
    #[serde(rename = "grok-2")]
    Grok2,
    /// xAI Grok 2 mini
    #[serde(rename = "grok-2-mini")]
    Grok2Mini,
}

/// All supported models, in catalog order
pub const ALL_MODELS: [ModelId; 8] = [
    ModelId::Claude35Sonnet,
    ModelId::Claude3Opus,
    ModelId::Gpt4o,
    ModelId::O1Preview,
    ModelId::Gemini15Flash,
    ModelId::Gemini15Pro,
    ModelId::Grok2,
    ModelId::Grok2Mini,
];

impl ModelId {
    /// Canonical wire string for this model
    ///
    /// This is the exact identifier sent to the completion gateway and
    /// accepted by `/api/model/set`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claude35Sonnet => "claude-3-5-sonnet-20240620",
            Self::Claude3Opus => "claude-3-opus-20240229",
            Self::Gpt4o => "gpt-4o",
            Self::O1Preview => "o1-preview",
            Self::Gemini15Flash => "gemini-1.5-flash-exp-0827",
            Self::Gemini15Pro => "gemini-1.5-pro-exp-0827",
            Self::Grok2 => "grok-2",
            Self::Grok2Mini => "grok-2-mini",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = ChatRelayError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ALL_MODELS
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ChatRelayError::InvalidModel(s.to_string()))
    }
}
