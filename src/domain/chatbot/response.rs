//! The structured reply handed back to the embedding app.

use serde::{Deserialize, Serialize};

use super::intent::{IntentLabel, IntentMatch};

/// Reply used when the completion service cannot be reached.
pub const APOLOGY_REPLY: &str =
    "I'm having trouble connecting right now, but I'm here for you. Can you try again in a moment?";

/// Action tags attached to the apology.
pub const APOLOGY_ACTIONS: &[&str] = &["retry_connection", "offline_support"];

/// A selectable choice rendered under a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpOption {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "displayText", alias = "label")]
    pub text: String,
    #[serde(default, alias = "icon")]
    pub emoji: String,
}

impl FollowUpOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            emoji: emoji.into(),
        }
    }

    /// The user message to send when this option is picked.
    ///
    /// Carries the selection marker so the next turn gets guidance rather
    /// than another round of choices.
    pub fn selection_message(&self) -> String {
        format!(
            "I chose: {}. Please provide detailed step-by-step guidance.",
            self.text
        )
    }
}

/// One turn's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotResponse {
    pub reply: String,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_options: Option<Vec<FollowUpOption>>,
    pub intent: IntentLabel,
    pub confidence: f32,
}

impl ChatbotResponse {
    /// Creates a plain reply tagged with the classified intent.
    pub fn new(reply: impl Into<String>, intent: &IntentMatch) -> Self {
        Self {
            reply: reply.into(),
            actions: Vec::new(),
            follow_up_options: None,
            intent: intent.intent,
            confidence: intent.confidence,
        }
    }

    pub fn with_actions(mut self, actions: Vec<String>) -> Self {
        self.actions = actions;
        self
    }

    /// Attaches options; an empty list is stored as `None`.
    pub fn with_follow_up_options(mut self, options: Vec<FollowUpOption>) -> Self {
        self.follow_up_options = if options.is_empty() {
            None
        } else {
            Some(options)
        };
        self
    }

    /// The fixed reply for a turn whose completion call failed.
    pub fn apology() -> Self {
        Self {
            reply: APOLOGY_REPLY.to_string(),
            actions: APOLOGY_ACTIONS.iter().map(|a| a.to_string()).collect(),
            follow_up_options: None,
            intent: IntentLabel::GeneralSupport,
            confidence: 1.0,
        }
    }

    /// Returns true if the reply offers choices.
    pub fn offers_choices(&self) -> bool {
        self.follow_up_options
            .as_ref()
            .is_some_and(|options| !options.is_empty())
    }
}
